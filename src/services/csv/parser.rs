use std::collections::HashSet;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::types::{Dataset, Record};
use crate::error::AppError;

const BOM: char = '\u{feff}';

/// Parses comma-separated text whose first non-empty row is the header.
///
/// Rows shorter than the header are padded with empty strings; rows longer
/// than the header are rejected. Values are kept verbatim (no trimming, no
/// type inference).
pub fn parse_csv(text: &str) -> Result<Dataset, AppError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    if text.trim().is_empty() {
        return Err(AppError::Parse("CSV内容为空，无法解析".to_string()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;
        if is_blank_line(&row) {
            continue;
        }

        let Some(header) = headers.as_ref() else {
            headers = Some(read_header(&row)?);
            continue;
        };

        if row.len() > header.len() {
            return Err(AppError::Parse(format!(
                "第{}行有{}列，超过表头的{}列",
                line_of(&row),
                row.len(),
                header.len()
            )));
        }

        let mut values: Vec<String> = row.iter().map(str::to_string).collect();
        values.resize(header.len(), String::new());
        records.push(Record::new(values));
    }

    let headers = headers.ok_or_else(|| AppError::Parse("CSV缺少表头".to_string()))?;
    tracing::debug!("Parsed {} records with {} fields", records.len(), headers.len());

    Ok(Dataset::new(headers, records))
}

fn read_header(row: &StringRecord) -> Result<Vec<String>, AppError> {
    let mut seen = HashSet::new();
    let mut header = Vec::with_capacity(row.len());
    for name in row.iter() {
        if !seen.insert(name) {
            return Err(AppError::Parse(format!("表头字段重复: {}", name)));
        }
        header.push(name.to_string());
    }
    Ok(header)
}

fn is_blank_line(row: &StringRecord) -> bool {
    row.len() == 1 && row[0].is_empty()
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map_or(0, |p| p.line())
}
