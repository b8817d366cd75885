/// One data row. Values are stored positionally in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

/// Parsed CSV: the header plus every record, each record exactly as wide as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub(crate) fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        debug_assert!(records.iter().all(|r| r.values.len() == headers.len()));
        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == field)
    }

    /// Looks a value up by field name.
    pub fn value<'a>(&self, record: &'a Record, field: &str) -> Option<&'a str> {
        self.column_index(field).and_then(|idx| record.get(idx))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
    /// Share of all records, rounded to one decimal place.
    pub percentage: f64,
}

/// Frequency breakdown of one field, most frequent value first.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDistribution {
    pub field: String,
    pub values: Vec<ValueCount>,
}

impl FieldDistribution {
    pub fn total(&self) -> usize {
        self.values.iter().map(|v| v.count).sum()
    }
}
