//! Schema inference from CSV samples.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::types::SchemaColumn;

/// Options for building a schema version from a sample file.
#[derive(Debug, Clone)]
pub struct SampleSchemaOptions {
    /// Status of the created schema version (`draft` or `current`).
    pub status: String,
    /// 1-based row holding the column names.
    pub header_row: usize,
    /// Maximum number of data rows inspected.
    pub sample_size: usize,
}

impl Default for SampleSchemaOptions {
    fn default() -> Self {
        Self {
            status: "draft".to_string(),
            header_row: 1,
            sample_size: 100,
        }
    }
}

impl SampleSchemaOptions {
    /// Parser options sent alongside the inferred columns.
    pub(crate) fn parsing_options(&self) -> Value {
        json!({ "delimiter": ",", "headerRow": self.header_row.max(1) })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Boolean,
    Integer,
    Float,
    Date,
    DateTime,
    Text,
}

impl ValueKind {
    fn detect(value: &str) -> Self {
        if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
            ValueKind::Boolean
        } else if value.parse::<i64>().is_ok() {
            ValueKind::Integer
        } else if value.parse::<f64>().is_ok_and(f64::is_finite) {
            ValueKind::Float
        } else if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
            ValueKind::Date
        } else if DateTime::parse_from_rfc3339(value).is_ok()
            || NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
            || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        {
            ValueKind::DateTime
        } else {
            ValueKind::Text
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (ValueKind::Integer, ValueKind::Float) | (ValueKind::Float, ValueKind::Integer) => {
                ValueKind::Float
            }
            (ValueKind::Date, ValueKind::DateTime) | (ValueKind::DateTime, ValueKind::Date) => {
                ValueKind::DateTime
            }
            _ => ValueKind::Text,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "int",
            ValueKind::Float => "float",
            ValueKind::Date => "date",
            ValueKind::DateTime => "datetime",
            ValueKind::Text => "string",
        }
    }
}

#[derive(Default)]
struct ColumnStats {
    kind: Option<ValueKind>,
    has_empty: bool,
}

/// Infer schema columns from CSV text.
///
/// Names come from `header_row`; types come from at most `sample_size`
/// rows after it. A column is required when every sampled row fills it.
pub fn infer_columns(
    sample: &[u8],
    header_row: usize,
    sample_size: usize,
) -> Result<Vec<SchemaColumn>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(sample);
    let mut records = reader.records();

    let header = records
        .by_ref()
        .nth(header_row.max(1) - 1)
        .transpose()?
        .ok_or_else(|| Error::Sample(format!("No header at row {}", header_row.max(1))))?;
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if name.is_empty() {
                format!("column_{}", i + 1)
            } else {
                name.to_string()
            }
        })
        .collect();
    if names.is_empty() {
        return Err(Error::Sample("Header row has no columns".to_string()));
    }

    let mut stats: Vec<ColumnStats> = names.iter().map(|_| ColumnStats::default()).collect();
    let mut rows = 0usize;
    for record in records.take(sample_size) {
        let record = record?;
        rows += 1;
        for (i, column) in stats.iter_mut().enumerate() {
            let value = record.get(i).unwrap_or("");
            if value.is_empty() {
                column.has_empty = true;
                continue;
            }
            let kind = ValueKind::detect(value);
            column.kind = Some(column.kind.map_or(kind, |seen| seen.merge(kind)));
        }
    }

    Ok(names
        .into_iter()
        .zip(stats)
        .map(|(name, column)| SchemaColumn {
            name,
            column_type: column.kind.unwrap_or(ValueKind::Text).label().to_string(),
            required: Some(rows > 0 && !column.has_empty),
            description: None,
        })
        .collect())
}
