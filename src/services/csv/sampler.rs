use rand::Rng;

use super::types::{Dataset, Record};

/// Datasets up to this size are sent whole.
const FULL_DATASET_LIMIT: usize = 30;
const MEDIUM_DATASET_LIMIT: usize = 100;
/// Sampling ratios in tenths: 30% for medium datasets, 20% above that.
const MEDIUM_RATIO_TENTHS: usize = 3;
const LARGE_RATIO_TENTHS: usize = 2;

/// Number of records to include in the prompt for a dataset of `n` records.
pub fn sample_size(n: usize) -> usize {
    match n {
        0..=FULL_DATASET_LIMIT => n,
        n if n <= MEDIUM_DATASET_LIMIT => ceil_tenths(n, MEDIUM_RATIO_TENTHS),
        n => ceil_tenths(n, LARGE_RATIO_TENTHS),
    }
}

// ceil(n * tenths / 10) without floating point drift (150 * 0.2 must be 30, not 31)
fn ceil_tenths(n: usize, tenths: usize) -> usize {
    (n * tenths).div_ceil(10)
}

pub fn sample_records(dataset: &Dataset) -> Vec<&Record> {
    sample_records_with(dataset, &mut rand::thread_rng())
}

/// Picks `sample_size(len)` distinct records uniformly at random.
///
/// Candidates are positions, so textually identical rows are still separate
/// candidates. The dataset itself is left untouched.
pub fn sample_records_with<'a, R>(dataset: &'a Dataset, rng: &mut R) -> Vec<&'a Record>
where
    R: Rng + ?Sized,
{
    let records = dataset.records();
    let amount = sample_size(records.len());
    if amount == records.len() {
        return records.iter().collect();
    }

    rand::seq::index::sample(rng, records.len(), amount)
        .into_iter()
        .map(|idx| &records[idx])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::csv::parse_csv;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn dataset_of(n: usize) -> Dataset {
        let mut text = String::from("id,group\n");
        for i in 0..n {
            text.push_str(&format!("{},g{}\n", i, i % 4));
        }
        parse_csv(&text).unwrap()
    }

    #[test]
    fn tiered_sizes() {
        assert_eq!(sample_size(0), 0);
        assert_eq!(sample_size(1), 1);
        assert_eq!(sample_size(30), 30);
        assert_eq!(sample_size(31), 10);
        assert_eq!(sample_size(100), 30);
        assert_eq!(sample_size(101), 21);
        assert_eq!(sample_size(150), 30);
        assert_eq!(sample_size(1000), 200);
    }

    #[test]
    fn small_dataset_is_returned_whole() {
        let dataset = dataset_of(3);
        let sample = sample_records(&dataset);
        assert_eq!(sample.len(), 3);
        assert!(sample.iter().zip(dataset.records()).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn large_dataset_draws_without_replacement() {
        let dataset = dataset_of(150);
        let sample = sample_records(&dataset);

        assert_eq!(sample.len(), 30);
        let ids: HashSet<&str> = sample.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(ids.len(), 30);
        assert!(sample.iter().all(|r| dataset.records().contains(r)));
    }

    #[test]
    fn identical_rows_are_distinct_candidates() {
        let mut text = String::from("k\n");
        for _ in 0..40 {
            text.push_str("same\n");
        }
        let dataset = parse_csv(&text).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let sample = sample_records_with(&dataset, &mut rng);
        assert_eq!(sample.len(), 12);
        let positions: HashSet<*const Record> = sample.iter().map(|r| *r as *const Record).collect();
        assert_eq!(positions.len(), 12);
    }

    #[test]
    fn medium_dataset_size_with_custom_rng() {
        let dataset = dataset_of(31);
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(sample_records_with(&dataset, &mut rng).len(), 10);
    }
}
