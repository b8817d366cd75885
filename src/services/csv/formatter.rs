use super::sampler::sample_records;
use super::statistics::{calculate_statistics, render_statistics};
use super::types::{Dataset, FieldDistribution, Record};

/// Statistics over the full dataset plus a random sample, formatted for the prompt.
pub fn summarize(dataset: &Dataset) -> String {
    if dataset.is_empty() {
        return String::new();
    }
    let statistics = calculate_statistics(dataset);
    let sample = sample_records(dataset);
    format_dataset(dataset, &statistics, &sample)
}

/// Lays out the overview, the statistics block and the sampled rows, in that order.
pub fn format_dataset(
    dataset: &Dataset,
    statistics: &[FieldDistribution],
    sample: &[&Record],
) -> String {
    if dataset.is_empty() {
        return String::new();
    }

    let sample_lines = sample
        .iter()
        .map(|record| format!("[{}]", record.values().join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "数据概要：\n\
         - 总记录数：{}条\n\
         - 数据字段：{}\n\
         \n\
         统计信息：\n\
         {}\n\
         \n\
         采样数据（{}条）：\n\
         {}",
        dataset.len(),
        dataset.headers().join(", "),
        render_statistics(statistics),
        sample.len(),
        sample_lines
    )
}
