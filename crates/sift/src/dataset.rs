//! Data sources a [`Query`](crate::Query) runs against.
//!
//! A dataset is only an ordered sequence of records. Queries borrow it and
//! never copy or modify it.

use std::str::FromStr;

use crate::error::{Result, SiftError};
use crate::record::Record;

/// An ordered sequence of records.
pub trait Dataset {
    /// The record type.
    type Record: Record;

    /// The records, in stable dataset order.
    fn records(&self) -> &[Self::Record];
}

impl<R: Record> Dataset for [R] {
    type Record = R;

    fn records(&self) -> &[R] {
        self
    }
}

impl<R: Record> Dataset for Vec<R> {
    type Record = R;

    fn records(&self) -> &[R] {
        self
    }
}

/// A JSON record set: an array of objects.
///
/// # Example
///
/// ```
/// use sift::{JsonDataset, Query};
///
/// let books: JsonDataset = r#"[
///     {"title": "The Hobbit", "author": "Tolkien"},
///     {"title": "Tehanu", "author": "LeGuin"}
/// ]"#.parse().unwrap();
///
/// let query = Query::new(&books)
///     .filter_with(|_| sift::Filter::new().with("author", "LeGuin"))
///     .unwrap();
/// assert_eq!(query.count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonDataset {
    records: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl JsonDataset {
    /// Builds a dataset from a JSON array of objects.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        let items = match json {
            serde_json::Value::Array(items) => items,
            other => {
                let found = json_kind(&other);
                tracing::debug!(found, "dataset is not a sequence");
                return Err(SiftError::NonSequenceDataset { found });
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                serde_json::Value::Object(map) => Ok(map),
                _ => {
                    tracing::debug!(index, "dataset record is not a mapping");
                    Err(SiftError::NonMappingRecord { index })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(JsonDataset { records })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromStr for JsonDataset {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        JsonDataset::from_json(serde_json::from_str(s)?)
    }
}

impl Dataset for JsonDataset {
    type Record = serde_json::Map<String, serde_json::Value>;

    fn records(&self) -> &[Self::Record] {
        &self.records
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
