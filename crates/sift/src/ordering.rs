//! Ordering types for query result sorting.
//!
//! [`OrderSpec`] is what callers hand to `Query::order`; it is resolved
//! eagerly into a list of [`OrderBy`] keys so that a malformed spec fails at
//! configuration time rather than during iteration.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Result, SiftError};
use crate::record::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    ///
    /// Descending negates each comparison; it does not reverse the sequence,
    /// so ties keep their relative order.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl FromStr for Dir {
    type Err = String;

    /// Accepts `asc`, `ascending`, `desc` and `descending`, in any case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            _ => Err(format!("unknown direction {s:?}")),
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sort key: an attribute and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The attribute to sort by.
    pub attribute: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Ascending key for the given attribute.
    pub fn asc(attribute: impl Into<String>) -> Self {
        OrderBy::new(attribute, Dir::Asc)
    }

    /// Descending key for the given attribute.
    pub fn desc(attribute: impl Into<String>) -> Self {
        OrderBy::new(attribute, Dir::Desc)
    }

    /// Key with an explicit direction.
    pub fn new(attribute: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            attribute: attribute.into(),
            dir,
        }
    }

    /// Compares two attribute values according to this key.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.dir.apply(compare_values(a, b))
    }
}

/// Natural ordering of two attribute values for sorting.
///
/// Values of the same kind compare naturally. Values that cannot be compared
/// with each other fall back to a fixed rank by kind, so the ordering stays
/// total: booleans, numbers, strings, timestamps, opaque values, `NaN`, and
/// nulls last.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    a.compare(b)
        .unwrap_or_else(|| sort_rank(a).cmp(&sort_rank(b)))
}

fn sort_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(n) if n.is_nan() => 5,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Timestamp(_) => 3,
        Value::Opaque => 4,
        Value::Null => 6,
    }
}

/// Compares two records key by key, left to right.
///
/// The first key that does not compare equal decides; if all keys tie the
/// records are equal and a stable sort keeps their original order.
pub fn compare_records<R: Record + ?Sized>(a: &R, b: &R, keys: &[OrderBy]) -> Ordering {
    keys.iter()
        .map(|key| key.compare(&a.attribute(&key.attribute), &b.attribute(&key.attribute)))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Caller-facing ordering specification.
///
/// Build one with `From`: a single name, a list of names (all ascending),
/// `(name, direction)` pairs, [`OrderBy`] keys, or a JSON value.
///
/// ```
/// use sift::{Dir, OrderBy, OrderSpec};
///
/// let keys = OrderSpec::from([("author", "asc"), ("year", "desc")]).resolve().unwrap();
/// assert_eq!(keys, vec![OrderBy::asc("author"), OrderBy::desc("year")]);
///
/// assert!(OrderSpec::from(("title", "sideways")).resolve().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum OrderSpec {
    /// One attribute, ascending.
    Attribute(String),
    /// Several attributes, all ascending.
    Attributes(Vec<String>),
    /// Attribute to direction pairs; directions are parsed on resolve.
    Mapping(Vec<(String, String)>),
    /// Already-resolved keys.
    Keys(Vec<OrderBy>),
    /// A JSON string, array or object.
    Json(serde_json::Value),
}

impl OrderSpec {
    /// Resolves the spec into sort keys, validating names and directions.
    pub fn resolve(self) -> Result<Vec<OrderBy>> {
        let keys = match &self {
            OrderSpec::Attribute(name) => vec![OrderBy::asc(name.clone())],
            OrderSpec::Attributes(names) => names.iter().map(OrderBy::asc).collect(),
            OrderSpec::Mapping(pairs) => pairs
                .iter()
                .map(|(name, dir)| {
                    let dir = dir.parse().map_err(|reason| self.invalid(reason))?;
                    Ok(OrderBy::new(name.clone(), dir))
                })
                .collect::<Result<Vec<_>>>()?,
            OrderSpec::Keys(keys) => keys.clone(),
            OrderSpec::Json(json) => resolve_json(json).map_err(|reason| self.invalid(reason))?,
        };

        if keys.is_empty() {
            return Err(self.invalid("no attributes given".to_string()));
        }
        if keys.iter().any(|key| key.attribute.is_empty()) {
            return Err(self.invalid("attribute names must not be empty".to_string()));
        }

        Ok(keys)
    }

    fn invalid(&self, reason: String) -> SiftError {
        let spec = match self {
            OrderSpec::Json(json) => json.to_string(),
            other => format!("{other:?}"),
        };
        tracing::debug!(%spec, %reason, "rejected order spec");
        SiftError::InvalidOrder { spec, reason }
    }
}

fn resolve_json(json: &serde_json::Value) -> std::result::Result<Vec<OrderBy>, String> {
    match json {
        serde_json::Value::String(name) => Ok(vec![OrderBy::asc(name.clone())]),
        serde_json::Value::Array(items) => {
            let mut keys = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    serde_json::Value::String(name) => keys.push(OrderBy::asc(name.clone())),
                    serde_json::Value::Object(map) => keys.extend(resolve_json_mapping(map)?),
                    other => return Err(format!("{other} is not an attribute name")),
                }
            }
            Ok(keys)
        }
        serde_json::Value::Object(map) => resolve_json_mapping(map),
        _ => Err("expected an attribute name, a list of names or a name to direction mapping".to_string()),
    }
}

fn resolve_json_mapping(
    map: &serde_json::Map<String, serde_json::Value>,
) -> std::result::Result<Vec<OrderBy>, String> {
    map.iter()
        .map(|(name, dir)| match dir {
            serde_json::Value::String(dir) => Ok(OrderBy::new(name.clone(), dir.parse()?)),
            other => Err(format!("direction for {name:?} must be a string, got {other}")),
        })
        .collect()
}

impl From<&str> for OrderSpec {
    fn from(name: &str) -> Self {
        OrderSpec::Attribute(name.to_string())
    }
}

impl From<String> for OrderSpec {
    fn from(name: String) -> Self {
        OrderSpec::Attribute(name)
    }
}

impl From<Vec<&str>> for OrderSpec {
    fn from(names: Vec<&str>) -> Self {
        OrderSpec::Attributes(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for OrderSpec {
    fn from(names: Vec<String>) -> Self {
        OrderSpec::Attributes(names)
    }
}

impl<const N: usize> From<[&str; N]> for OrderSpec {
    fn from(names: [&str; N]) -> Self {
        OrderSpec::from(Vec::from(names))
    }
}

impl From<(&str, &str)> for OrderSpec {
    fn from(pair: (&str, &str)) -> Self {
        OrderSpec::from(vec![pair])
    }
}

impl From<Vec<(&str, &str)>> for OrderSpec {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        OrderSpec::Mapping(
            pairs
                .into_iter()
                .map(|(name, dir)| (name.to_string(), dir.to_string()))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, &str); N]> for OrderSpec {
    fn from(pairs: [(&str, &str); N]) -> Self {
        OrderSpec::from(Vec::from(pairs))
    }
}

impl From<(&str, Dir)> for OrderSpec {
    fn from((name, dir): (&str, Dir)) -> Self {
        OrderSpec::Keys(vec![OrderBy::new(name, dir)])
    }
}

impl<const N: usize> From<[(&str, Dir); N]> for OrderSpec {
    fn from(pairs: [(&str, Dir); N]) -> Self {
        OrderSpec::Keys(pairs.into_iter().map(|(name, dir)| OrderBy::new(name, dir)).collect())
    }
}

impl From<OrderBy> for OrderSpec {
    fn from(key: OrderBy) -> Self {
        OrderSpec::Keys(vec![key])
    }
}

impl From<Vec<OrderBy>> for OrderSpec {
    fn from(keys: Vec<OrderBy>) -> Self {
        OrderSpec::Keys(keys)
    }
}

impl From<serde_json::Value> for OrderSpec {
    fn from(json: serde_json::Value) -> Self {
        OrderSpec::Json(json)
    }
}
