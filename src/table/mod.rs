// src/table/mod.rs

mod record;

pub use record::Record;

use crate::error::{ResolveError, ResolveResult};
use tracing::debug;

/// A parsed CSV export: the header plus one [`Record`] per data line.
///
/// Splitting is naive on purpose: no quoting or escaping is understood, so a
/// comma inside a field is a delimiter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    /// Parse raw CSV text. The first line is the header; header names are
    /// trimmed, field values are kept verbatim. Empty lines are skipped and a
    /// trailing `\r` is dropped from every line.
    pub fn parse(raw: &str) -> Self {
        let mut lines = raw.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

        let headers: Vec<String> = lines
            .next()
            .map(|h| h.split(',').map(|name| name.trim().to_string()).collect())
            .unwrap_or_default();

        let records: Vec<Record> = lines
            .filter(|line| !line.is_empty())
            .map(|line| {
                let values: Vec<&str> = line.split(',').collect();
                Record::zip(&headers, &values)
            })
            .collect();

        debug!(
            columns = headers.len(),
            rows = records.len(),
            "parsed csv table"
        );
        Self { headers, records }
    }

    /// Parse a body that may be missing altogether.
    pub fn from_body(raw: Option<String>) -> ResolveResult<Self> {
        raw.as_deref()
            .map(Self::parse)
            .ok_or_else(|| ResolveError::Input("no csv text to parse".to_string()))
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

    /// First record, in source order, whose `column` equals `value` exactly.
    pub fn find_by(&self, column: &str, value: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.get(column) == Some(value))
    }
}

/// `prefix` followed by the record's `column` value, with no encoding.
///
/// `None` when the field is absent or empty.
pub fn derive_redirect_url(record: &Record, column: &str, prefix: &str) -> Option<String> {
    record
        .get(column)
        .filter(|v| !v.is_empty())
        .map(|v| format!("{}{}", prefix, v))
}
