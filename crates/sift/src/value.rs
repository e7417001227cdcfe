//! Runtime value types.
//!
//! Two sides meet when a criterion is evaluated:
//!
//! - [`Value`] is what a record exposes for an attribute, borrowed from the record.
//! - [`Literal`] is what the caller compares against, owned by the criterion.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, SiftError};

/// Attribute value read off a record, borrowed from the record.
///
/// # Example
///
/// ```
/// use sift::{Record, Value, Number};
///
/// struct Book {
///     title: String,
///     year: u16,
/// }
///
/// impl Record for Book {
///     fn attribute(&self, name: &str) -> Value<'_> {
///         match name {
///             "title" => Value::String(&self.title),
///             "year" => Value::Number(Number::from(self.year)),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Attribute absent or null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value (borrowed).
    String(&'a str),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Present, but not comparable with any literal (nested documents, lists).
    Opaque,
}

impl<'a> Value<'a> {
    /// Returns `true` if the attribute is absent or null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Compares two values of the same type.
    ///
    /// Returns `None` for mismatched types, nulls, opaque values and `NaN`.
    pub fn compare(&self, other: &Value<'_>) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Number(a), Value::Number(b)) => a.compare(*b),
            (Value::String(a), Value::String(b)) => Some((*a).cmp(*b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Integers keep their precision; only comparisons involving a float go
/// through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns `true` for a float `NaN`.
    pub fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::I64(a), Number::U64(b)) => Some(match u64::try_from(a) {
                Ok(a) => a.cmp(&b),
                Err(_) => Ordering::Less,
            }),
            (Number::U64(_), Number::I64(_)) => other.compare(self).map(Ordering::reverse),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($variant:ident($target:ty): $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }

            impl From<$source> for Literal {
                fn from(n: $source) -> Self {
                    Literal::Number(Number::from(n))
                }
            }
        )+
    };
}

number_from!(I64(i64): i8, i16, i32, i64, isize);
number_from!(U64(u64): u8, u16, u32, u64, usize);
number_from!(F64(f64): f32, f64);

/// Timestamp value represented as milliseconds since the Unix epoch.
///
/// ```
/// use sift::Timestamp;
///
/// assert!(Timestamp::from_secs(1) < Timestamp::from_millis(1500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a timestamp from seconds since the Unix epoch.
    ///
    /// Saturates at the bounds of the millisecond range.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Returns the timestamp as milliseconds since the Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

/// Owned value a criterion compares against.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Null literal. Equal only to absent or null attributes.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Numeric literal.
    Number(Number),
    /// String literal.
    String(String),
    /// Timestamp literal.
    Timestamp(Timestamp),
    /// Ordered candidate list for `one_of` / `not_one_of`.
    List(Vec<Literal>),
}

impl Literal {
    /// Borrows this literal as a record-side [`Value`].
    ///
    /// Lists have no record-side counterpart and read as [`Value::Opaque`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s),
            Literal::Timestamp(t) => Value::Timestamp(*t),
            Literal::List(_) => Value::Opaque,
        }
    }

    /// Returns the candidates of a list literal. Any other literal is a
    /// single candidate.
    pub fn candidates(&self) -> &[Literal] {
        match self {
            Literal::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Returns `true` if `value` equals this literal.
    ///
    /// `Null` equals only an absent or null attribute.
    pub fn equals(&self, value: &Value<'_>) -> bool {
        match (self, value) {
            (Literal::Null, Value::Null) => true,
            (Literal::List(_), _) => false,
            _ => self.as_value().compare(value) == Some(Ordering::Equal),
        }
    }

    /// Orders `value` relative to this literal (`value.cmp(self)`).
    ///
    /// Returns `None` when the two are not comparable.
    pub fn order_of(&self, value: &Value<'_>) -> Option<Ordering> {
        value.compare(&self.as_value())
    }

    /// Converts a JSON scalar or array into a literal.
    ///
    /// JSON objects are not literals and are rejected.
    pub fn from_json(json: &serde_json::Value) -> Result<Literal> {
        let literal = match json {
            serde_json::Value::Null => Literal::Null,
            serde_json::Value::Bool(b) => Literal::Bool(*b),
            serde_json::Value::Number(n) => Literal::Number(json_number(n)),
            serde_json::Value::String(s) => Literal::String(s.clone()),
            serde_json::Value::Array(items) => Literal::List(
                items
                    .iter()
                    .map(Literal::from_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_json::Value::Object(_) => {
                return Err(SiftError::MalformedFilter {
                    reason: format!("{json} is not a literal value"),
                })
            }
        };
        Ok(literal)
    }
}

/// Converts a JSON number, preferring exact integer representations.
pub(crate) fn json_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::I64(i)
    } else if let Some(u) = n.as_u64() {
        Number::U64(u)
    } else {
        Number::F64(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Timestamp(t) => write!(f, "@{}", t.0),
            Literal::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<Number> for Literal {
    fn from(n: Number) -> Self {
        Literal::Number(n)
    }
}

impl From<Timestamp> for Literal {
    fn from(t: Timestamp) -> Self {
        Literal::Timestamp(t)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Literal::Null, Into::into)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(items: Vec<T>) -> Self {
        Literal::List(items.into_iter().map(Into::into).collect())
    }
}
