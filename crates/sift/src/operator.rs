//! The fixed operator vocabulary.
//!
//! [`Operator`] is a closed set. Adding an operator is a change to this
//! crate, not something callers can extend at runtime.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::SiftError;

/// Comparison operator of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Attribute equals the value.
    Equal,
    /// Attribute does not equal the value.
    NotEqual,
    /// Attribute is greater than the value.
    GreaterThan,
    /// Attribute is greater than or equal to the value.
    GreaterThanOrEqualTo,
    /// Attribute is less than the value.
    LessThan,
    /// Attribute is less than or equal to the value.
    LessThanOrEqualTo,
    /// Attribute is absent or null. The value is ignored.
    Null,
    /// Attribute is present and not null. The value is ignored.
    NotNull,
    /// Attribute is a member of the candidate list.
    OneOf,
    /// Attribute is not a member of the candidate list.
    NotOneOf,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 10] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqualTo,
        Operator::LessThan,
        Operator::LessThanOrEqualTo,
        Operator::Null,
        Operator::NotNull,
        Operator::OneOf,
        Operator::NotOneOf,
    ];

    /// Resolves a canonical name or a short alias (`eq`, `ne`, `gt`, `gte`,
    /// `lt`, `lte`).
    pub fn from_name(name: &str) -> Option<Operator> {
        let op = match name {
            "equal" | "eq" => Operator::Equal,
            "not_equal" | "ne" => Operator::NotEqual,
            "greater_than" | "gt" => Operator::GreaterThan,
            "greater_than_or_equal_to" | "gte" => Operator::GreaterThanOrEqualTo,
            "less_than" | "lt" => Operator::LessThan,
            "less_than_or_equal_to" | "lte" => Operator::LessThanOrEqualTo,
            "null" => Operator::Null,
            "not_null" => Operator::NotNull,
            "one_of" => Operator::OneOf,
            "not_one_of" => Operator::NotOneOf,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the logical complement of this operator.
    pub fn invert(self) -> Operator {
        match self {
            Operator::Equal => Operator::NotEqual,
            Operator::NotEqual => Operator::Equal,
            Operator::GreaterThan => Operator::LessThanOrEqualTo,
            Operator::GreaterThanOrEqualTo => Operator::LessThan,
            Operator::LessThan => Operator::GreaterThanOrEqualTo,
            Operator::LessThanOrEqualTo => Operator::GreaterThan,
            Operator::Null => Operator::NotNull,
            Operator::NotNull => Operator::Null,
            Operator::OneOf => Operator::NotOneOf,
            Operator::NotOneOf => Operator::OneOf,
        }
    }

    /// Returns `true` if the operator compares against a candidate list.
    pub fn takes_list(self) -> bool {
        matches!(self, Operator::OneOf | Operator::NotOneOf)
    }

    /// Returns `true` if the operator ignores its value.
    pub fn ignores_value(self) -> bool {
        matches!(self, Operator::Null | Operator::NotNull)
    }

    /// Returns `true` for the ordered comparisons (`<`, `<=`, `>`, `>=`).
    pub fn is_ordered(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterThanOrEqualTo
                | Operator::LessThan
                | Operator::LessThanOrEqualTo
        )
    }

    /// Evaluates an ordered comparison given `attribute.cmp(value)`.
    ///
    /// Operators that are not ordered comparisons return `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqualTo => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqualTo => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the canonical name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanOrEqualTo => "greater_than_or_equal_to",
            Operator::LessThan => "less_than",
            Operator::LessThanOrEqualTo => "less_than_or_equal_to",
            Operator::Null => "null",
            Operator::NotNull => "not_null",
            Operator::OneOf => "one_of",
            Operator::NotOneOf => "not_one_of",
        }
    }
}

impl FromStr for Operator {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_name(s).ok_or_else(|| SiftError::UnknownOperator {
            name: s.to_string(),
        })
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
