//! Named attribute access on records.
//!
//! The engine needs exactly one capability from a record: reading an
//! attribute by name. [`Record`] is that capability. It is implemented for
//! literal maps and JSON objects here, and can be derived for plain structs
//! with `#[derive(Record)]` (feature `derive`).

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use crate::value::{json_number, Literal, Number, Timestamp, Value};

/// Types whose attributes can be read by name.
///
/// # Derive Usage
///
/// ```ignore
/// use sift::Record;
///
/// #[derive(Record)]
/// struct Book {
///     title: String,
///     year: u16,
///     series: Option<String>,
///     #[record(skip)]
///     isbn: String,
/// }
///
/// assert_eq!(Book::TITLE, "title");
/// ```
///
/// # Manual Implementation
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
pub trait Record {
    /// Returns the value of the named attribute, or [`Value::Null`] if the
    /// record has no such attribute.
    fn attribute(&self, name: &str) -> Value<'_>;
}

/// Conversion of a field into an attribute [`Value`].
///
/// Used by `#[derive(Record)]`; every derived field must implement it.
pub trait AttributeValue {
    /// Borrows this field as an attribute value.
    fn attribute_value(&self) -> Value<'_>;
}

impl AttributeValue for str {
    fn attribute_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AttributeValue for String {
    fn attribute_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AttributeValue for bool {
    fn attribute_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl AttributeValue for Timestamp {
    fn attribute_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl AttributeValue for Number {
    fn attribute_value(&self) -> Value<'_> {
        Value::Number(*self)
    }
}

impl AttributeValue for Literal {
    fn attribute_value(&self) -> Value<'_> {
        self.as_value()
    }
}

impl<T: AttributeValue> AttributeValue for Option<T> {
    fn attribute_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::Null, T::attribute_value)
    }
}

impl<T: AttributeValue + ?Sized> AttributeValue for &T {
    fn attribute_value(&self) -> Value<'_> {
        (**self).attribute_value()
    }
}

macro_rules! numeric_attribute {
    ($($ty:ty),+) => {
        $(
            impl AttributeValue for $ty {
                fn attribute_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )+
    };
}

numeric_attribute!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Record for BTreeMap<String, Literal> {
    fn attribute(&self, name: &str) -> Value<'_> {
        self.get(name).map_or(Value::Null, Literal::as_value)
    }
}

impl Record for HashMap<String, Literal> {
    fn attribute(&self, name: &str) -> Value<'_> {
        self.get(name).map_or(Value::Null, Literal::as_value)
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn attribute(&self, name: &str) -> Value<'_> {
        self.get(name).map_or(Value::Null, json_value)
    }
}

impl Record for serde_json::Value {
    fn attribute(&self, name: &str) -> Value<'_> {
        match self {
            serde_json::Value::Object(map) => map.attribute(name),
            _ => Value::Null,
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn attribute(&self, name: &str) -> Value<'_> {
        (**self).attribute(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn attribute(&self, name: &str) -> Value<'_> {
        (**self).attribute(name)
    }
}

impl<R: Record + ?Sized> Record for Rc<R> {
    fn attribute(&self, name: &str) -> Value<'_> {
        (**self).attribute(name)
    }
}

impl<R: Record + ?Sized> Record for Arc<R> {
    fn attribute(&self, name: &str) -> Value<'_> {
        (**self).attribute(name)
    }
}

fn json_value(json: &serde_json::Value) -> Value<'_> {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(json_number(n)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Value::Opaque,
    }
}
