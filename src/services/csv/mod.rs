pub mod formatter;
pub mod parser;
pub mod sampler;
pub mod statistics;
pub mod types;

pub use formatter::{format_dataset, summarize};
pub use parser::parse_csv;
pub use sampler::{sample_records, sample_records_with, sample_size};
pub use statistics::{calculate_statistics, render_statistics};
pub use types::{Dataset, FieldDistribution, Record, ValueCount};
