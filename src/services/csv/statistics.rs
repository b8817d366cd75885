use std::collections::HashMap;

use super::types::{Dataset, FieldDistribution, ValueCount};

/// Value frequencies for every header field, in header order.
///
/// Values are grouped by exact string equality. Within a field the entries
/// are sorted by descending count; equal counts keep first-seen order.
pub fn calculate_statistics(dataset: &Dataset) -> Vec<FieldDistribution> {
    let total = dataset.len();

    dataset
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let mut counts = ValueCounter::default();
            for record in dataset.records() {
                counts.add(record.get(idx).unwrap_or_default());
            }

            let mut values: Vec<ValueCount> = counts
                .into_entries()
                .into_iter()
                .map(|(value, count)| ValueCount {
                    value,
                    count,
                    percentage: percentage(count, total),
                })
                .collect();
            // sort_by is stable, so ties stay in encounter order
            values.sort_by(|a, b| b.count.cmp(&a.count));

            FieldDistribution {
                field: field.clone(),
                values,
            }
        })
        .collect()
}

/// Renders distributions as the `{field}分布：` blocks used in the prompt.
pub fn render_statistics(distributions: &[FieldDistribution]) -> String {
    distributions
        .iter()
        .map(|dist| {
            let lines = dist
                .values
                .iter()
                .map(|v| format!("  - {}: {}条 ({:.1}%)", v.value, v.count, v.percentage))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}分布：\n{}", dist.field, lines)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Insertion-ordered counting map.
#[derive(Default)]
struct ValueCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl ValueCounter {
    fn add(&mut self, value: &str) {
        match self.index.get(value) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(value.to_string(), self.entries.len());
                self.entries.push((value.to_string(), 1));
            }
        }
    }

    fn into_entries(self) -> Vec<(String, usize)> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::csv::parse_csv;
    use pretty_assertions::assert_eq;

    fn counts(dist: &FieldDistribution) -> Vec<(&str, usize, f64)> {
        dist.values
            .iter()
            .map(|v| (v.value.as_str(), v.count, v.percentage))
            .collect()
    }

    #[test]
    fn city_distribution() {
        let dataset = parse_csv("name,city\nAlice,NY\nBob,NY\nCarol,LA\n").unwrap();
        let stats = calculate_statistics(&dataset);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[1].field, "city");
        assert_eq!(counts(&stats[1]), vec![("NY", 2, 66.7), ("LA", 1, 33.3)]);
    }

    #[test]
    fn counts_sum_to_record_count() {
        let dataset = parse_csv("k,v\na,1\nb,2\na,3\nc,1\nb,1\na,2\n").unwrap();
        for dist in calculate_statistics(&dataset) {
            assert_eq!(dist.total(), dataset.len(), "field {}", dist.field);
        }
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let dataset = parse_csv("k\nz\ny\nx\ny\nz\nw\n").unwrap();
        let stats = calculate_statistics(&dataset);

        let order: Vec<&str> = stats[0].values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(order, vec!["z", "y", "x", "w"]);
    }

    #[test]
    fn grouping_is_case_and_whitespace_sensitive() {
        let dataset = parse_csv("k\nNY\nny\n NY\nNY\n").unwrap();
        let stats = calculate_statistics(&dataset);
        assert_eq!(stats[0].values.len(), 3);
        assert_eq!(stats[0].values[0].count, 2);
    }

    #[test]
    fn renders_field_blocks() {
        let dataset = parse_csv("name,city\nAlice,NY\nBob,NY\nCarol,LA\n").unwrap();
        let rendered = render_statistics(&calculate_statistics(&dataset));

        assert_eq!(
            rendered,
            "name分布：\n  - Alice: 1条 (33.3%)\n  - Bob: 1条 (33.3%)\n  - Carol: 1条 (33.3%)\n\n\
             city分布：\n  - NY: 2条 (66.7%)\n  - LA: 1条 (33.3%)"
        );
    }

    #[test]
    fn whole_share_renders_one_decimal() {
        let dataset = parse_csv("k\nx\nx\n").unwrap();
        let rendered = render_statistics(&calculate_statistics(&dataset));
        assert!(rendered.contains("x: 2条 (100.0%)"));
    }
}
