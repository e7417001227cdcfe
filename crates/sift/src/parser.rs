//! Criteria parser.
//!
//! Filters arrive in one of two forms, and both may be combined:
//!
//! - **Hash form**: a [`Filter`] of attribute/term pairs. A plain value means
//!   equality; an operator expression carries its own operator.
//! - **Block form**: a closure that receives the [`Operators`] expression
//!   builder and returns a [`Filter`]. This is where operator expressions
//!   such as `ops.gt(1970)` are written.
//!
//! ```
//! use sift::{CriteriaParser, Filter, Operator};
//!
//! let criteria = CriteriaParser::parse_block(|ops| {
//!     Filter::new()
//!         .with("author", "Ursula K. LeGuin")
//!         .with("year", ops.gte(1970))
//! })
//! .unwrap();
//!
//! assert_eq!(criteria.len(), 2);
//! assert_eq!(criteria.as_slice()[0].operator(), Operator::Equal);
//! assert_eq!(criteria.as_slice()[1].operator(), Operator::GreaterThanOrEqualTo);
//! ```
//!
//! Parsing is all-or-nothing: the first invalid entry fails the whole parse
//! and no criteria are returned.

use crate::criteria::{Criteria, Criterion};
use crate::error::{Result, SiftError};
use crate::operator::Operator;
use crate::value::{Literal, Number, Timestamp};

/// Right-hand side of a filter entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A plain value, compared with `equal`.
    Literal(Literal),
    /// An operator expression built by [`Operators`].
    Expression(Operator, Literal),
    /// An operator call by name, resolved when the filter is parsed.
    Call(String, Literal),
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

macro_rules! literal_term {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Term {
                fn from(value: $ty) -> Self {
                    Term::Literal(Literal::from(value))
                }
            }
        )+
    };
}

literal_term!(
    &str, String, bool, Number, Timestamp, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize,
    f32, f64
);

impl<T: Into<Literal>> From<Option<T>> for Term {
    fn from(value: Option<T>) -> Self {
        Term::Literal(Literal::from(value))
    }
}

/// Hash-form filter: ordered attribute/term pairs.
///
/// ```
/// use sift::Filter;
///
/// let filter = Filter::new().with("author", "Tolkien").with("series", None::<&str>);
/// assert_eq!(filter.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    entries: Vec<(String, Term)>,
}

impl Filter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Filter::default()
    }

    /// Returns the filter with one more entry.
    pub fn with(mut self, attribute: impl Into<String>, term: impl Into<Term>) -> Self {
        self.entries.push((attribute.into(), term.into()));
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the filter has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.entries.iter().map(|(attribute, term)| (attribute.as_str(), term))
    }

    /// Builds a filter from a JSON object.
    ///
    /// Scalars and arrays are literals. An object with exactly one key is an
    /// operator call, e.g. `{"year": {"gte": 1970}}`.
    ///
    /// ```
    /// use serde_json::json;
    /// use sift::{CriteriaParser, Filter, SiftError};
    ///
    /// let filter = Filter::from_json(&json!({"genre": {"frobnicate": "x"}})).unwrap();
    /// let err = CriteriaParser::parse_filter(&filter).unwrap_err();
    /// assert!(matches!(err, SiftError::UnknownOperator { name } if name == "frobnicate"));
    /// ```
    pub fn from_json(json: &serde_json::Value) -> Result<Filter> {
        let map = json.as_object().ok_or_else(|| SiftError::MalformedFilter {
            reason: format!("expected an object of attribute/value pairs, got {json}"),
        })?;

        let mut filter = Filter::new();
        for (attribute, value) in map {
            let term = match value {
                serde_json::Value::Object(call) => {
                    let mut entries = call.iter();
                    match (entries.next(), entries.next()) {
                        (Some((name, operand)), None) => {
                            Term::Call(name.clone(), Literal::from_json(operand)?)
                        }
                        _ => {
                            return Err(SiftError::MalformedFilter {
                                reason: format!(
                                    "operator call for {attribute:?} must have exactly one key"
                                ),
                            })
                        }
                    }
                }
                other => Term::Literal(Literal::from_json(other)?),
            };
            filter = filter.with(attribute.clone(), term);
        }
        Ok(filter)
    }
}

impl<K: Into<String>, T: Into<Term>> FromIterator<(K, T)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Filter {
            entries: iter
                .into_iter()
                .map(|(attribute, term)| (attribute.into(), term.into()))
                .collect(),
        }
    }
}

/// Operator-expression builder handed to filter blocks.
///
/// Each method returns a [`Term`] tagged as an expression, so the parser can
/// tell `ops.eq(5)` apart from the literal `5`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Operators;

impl Operators {
    fn expression(operator: Operator, value: impl Into<Literal>) -> Term {
        Term::Expression(operator, value.into())
    }

    fn list<I, T>(operator: Operator, values: I) -> Term
    where
        I: IntoIterator<Item = T>,
        T: Into<Literal>,
    {
        Term::Expression(
            operator,
            Literal::List(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn eq(&self, value: impl Into<Literal>) -> Term {
        Self::expression(Operator::Equal, value)
    }

    pub fn equal(&self, value: impl Into<Literal>) -> Term {
        self.eq(value)
    }

    pub fn ne(&self, value: impl Into<Literal>) -> Term {
        Self::expression(Operator::NotEqual, value)
    }

    pub fn not_equal(&self, value: impl Into<Literal>) -> Term {
        self.ne(value)
    }

    pub fn gt(&self, value: impl Into<Literal>) -> Term {
        Self::expression(Operator::GreaterThan, value)
    }

    pub fn greater_than(&self, value: impl Into<Literal>) -> Term {
        self.gt(value)
    }

    pub fn gte(&self, value: impl Into<Literal>) -> Term {
        Self::expression(Operator::GreaterThanOrEqualTo, value)
    }

    pub fn greater_than_or_equal_to(&self, value: impl Into<Literal>) -> Term {
        self.gte(value)
    }

    pub fn lt(&self, value: impl Into<Literal>) -> Term {
        Self::expression(Operator::LessThan, value)
    }

    pub fn less_than(&self, value: impl Into<Literal>) -> Term {
        self.lt(value)
    }

    pub fn lte(&self, value: impl Into<Literal>) -> Term {
        Self::expression(Operator::LessThanOrEqualTo, value)
    }

    pub fn less_than_or_equal_to(&self, value: impl Into<Literal>) -> Term {
        self.lte(value)
    }

    /// Attribute is absent or null.
    pub fn null(&self) -> Term {
        Self::expression(Operator::Null, Literal::Null)
    }

    /// Attribute is present and not null.
    pub fn not_null(&self) -> Term {
        Self::expression(Operator::NotNull, Literal::Null)
    }

    /// Attribute is one of the given values.
    pub fn one_of<I, T>(&self, values: I) -> Term
    where
        I: IntoIterator<Item = T>,
        T: Into<Literal>,
    {
        Self::list(Operator::OneOf, values)
    }

    /// Attribute is none of the given values.
    pub fn not_one_of<I, T>(&self, values: I) -> Term
    where
        I: IntoIterator<Item = T>,
        T: Into<Literal>,
    {
        Self::list(Operator::NotOneOf, values)
    }

    /// Calls an operator by name. The name is checked when the filter is
    /// parsed; an unknown name fails with [`SiftError::UnknownOperator`].
    pub fn call(&self, name: &str, value: impl Into<Literal>) -> Term {
        Term::Call(name.to_string(), value.into())
    }
}

/// Converts filters into [`Criteria`].
pub struct CriteriaParser;

impl CriteriaParser {
    /// Parses a hash-form filter, a block, or both (hash entries first).
    ///
    /// At least one of the two must be given.
    pub fn parse(
        filter: Option<&Filter>,
        block: Option<&dyn Fn(&Operators) -> Filter>,
    ) -> Result<Criteria> {
        let from_block = block.map(|block| block(&Operators));

        let entries: Vec<(&str, &Term)> = match (filter, from_block.as_ref()) {
            (None, None) => return Err(SiftError::MissingFilter),
            (filter, block) => filter
                .into_iter()
                .chain(block)
                .flat_map(Filter::iter)
                .collect(),
        };

        let criteria = entries
            .into_iter()
            .map(|(attribute, term)| parse_entry(attribute, term))
            .collect::<Result<Criteria>>()?;

        tracing::trace!(criteria = criteria.len(), "parsed filter");
        Ok(criteria)
    }

    /// Parses a hash-form filter.
    pub fn parse_filter(filter: &Filter) -> Result<Criteria> {
        Self::parse(Some(filter), None)
    }

    /// Parses a block-form filter.
    pub fn parse_block<F>(block: F) -> Result<Criteria>
    where
        F: FnOnce(&Operators) -> Filter,
    {
        Self::parse_filter(&block(&Operators))
    }
}

fn parse_entry(attribute: &str, term: &Term) -> Result<Criterion> {
    match term {
        Term::Literal(value) => Criterion::new(attribute, Operator::Equal, value.clone()),
        Term::Expression(operator, value) => Criterion::new(attribute, *operator, value.clone()),
        Term::Call(name, value) => {
            let operator = Operator::from_name(name).ok_or_else(|| {
                tracing::debug!(%name, %attribute, "unknown operator in filter");
                SiftError::UnknownOperator { name: name.clone() }
            })?;
            Criterion::new(attribute, operator, value.clone())
        }
    }
}
