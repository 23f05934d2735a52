//! Pure projections over successful find/create responses.
//!
//! These helpers never touch the network or the session; they borrow a slice
//! of [`Record`] values and produce a new projection, leaving the input
//! untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use fmdata::extract::{field_data, record_id, transform, TransformOptions};
//!
//! let found = client.find("Heroes", json!({"name": "yoda"}), None).await?;
//! let ids = record_id(&found.data);
//! let fields = field_data(&found.data);
//! let typed = transform(&found.data, &TransformOptions::default());
//! ```

mod container;

pub use container::{container_data, ContainerResult};

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Number, Value};

use crate::clients::response::Record;

/// Projects each record to its id, preserving order.
///
/// The result always has the same length as the input.
#[must_use]
pub fn record_id(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| r.record_id.clone()).collect()
}

/// Projects each record to its field-name to value mapping, dropping record
/// metadata (ids, modification counters, portal data).
#[must_use]
pub fn field_data(records: &[Record]) -> Vec<Map<String, Value>> {
    records.iter().map(|r| r.field_data.clone()).collect()
}

/// Options for [`transform`].
#[derive(Clone, Copy, Debug)]
pub struct TransformOptions {
    /// When `true` (the default), string field values that look numeric or
    /// like FileMaker dates/timestamps are converted to native JSON numbers
    /// and ISO-8601 strings. When `false`, field data is returned exactly as
    /// received.
    pub convert: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self { convert: true }
    }
}

/// Reshapes each record into one object holding its field data plus its
/// portal data, optionally coercing recognized value patterns.
///
/// With `convert: true`, string values are coerced in this order: integer
/// text to a JSON integer, decimal text to a JSON float, `MM/dd/yyyy` to an
/// ISO date string, `MM/dd/yyyy HH:MM:SS` to an ISO timestamp string.
/// Portal rows are converted recursively. With `convert: false` the field
/// values come back byte-identical to the response. The input is never
/// mutated.
#[must_use]
pub fn transform(records: &[Record], options: &TransformOptions) -> Vec<Value> {
    records
        .iter()
        .map(|record| {
            let mut shaped = Map::new();
            for (name, value) in &record.field_data {
                let value = if options.convert {
                    convert_value(value)
                } else {
                    value.clone()
                };
                shaped.insert(name.clone(), value);
            }
            for (portal, rows) in &record.portal_data {
                let rows = if options.convert {
                    convert_tree(rows)
                } else {
                    rows.clone()
                };
                shaped.insert(portal.clone(), rows);
            }
            Value::Object(shaped)
        })
        .collect()
}

/// Coerces one leaf value, leaving anything unrecognized untouched.
fn convert_value(value: &Value) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    if text.is_empty() {
        return value.clone();
    }
    if let Ok(integer) = text.parse::<i64>() {
        return Value::Number(Number::from(integer));
    }
    if let Ok(float) = text.parse::<f64>() {
        if let Some(number) = Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, "%m/%d/%Y %H:%M:%S") {
        return Value::String(timestamp.format("%Y-%m-%dT%H:%M:%S").to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%m/%d/%Y") {
        return Value::String(date.format("%Y-%m-%d").to_string());
    }
    value.clone()
}

/// Recursively coerces leaves through arrays and objects (portal rows).
fn convert_tree(value: &Value) -> Value {
    match value {
        Value::Array(entries) => Value::Array(entries.iter().map(convert_tree).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), convert_tree(value)))
                .collect(),
        ),
        leaf => convert_value(leaf),
    }
}
