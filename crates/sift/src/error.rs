//! Error types for the sift crate.
//!
//! Every error is raised while a scope or query is being built. Iterating a
//! query never fails.

use thiserror::Error;

use crate::operator::Operator;

/// Errors that can occur when building scopes and queries.
#[derive(Debug, Error)]
pub enum SiftError {
    /// An operator call named something outside the fixed vocabulary.
    #[error("unknown operator '{name}'")]
    UnknownOperator { name: String },

    /// The ordering spec is not a name, a list of names, or a name to
    /// direction mapping.
    #[error("invalid order {spec}: {reason}")]
    InvalidOrder { spec: String, reason: String },

    /// Attribute names must be non-empty.
    #[error("invalid attribute name {attribute:?}")]
    InvalidAttribute { attribute: String },

    /// The value does not fit the operator (e.g. `one_of` without a list).
    #[error("invalid operand for '{operator}': {reason}")]
    InvalidOperand {
        operator: Operator,
        reason: &'static str,
    },

    /// Neither a filter nor a block was given.
    #[error("a filter or a block is required")]
    MissingFilter,

    /// Filter input did not have the shape of attribute/value pairs.
    #[error("malformed filter: {reason}")]
    MalformedFilter { reason: String },

    /// A negation scope needs at least one child.
    #[error("a negation scope requires at least one child scope")]
    EmptyNegation,

    /// The target builder cannot express an operator used by the scope.
    #[error("dialect '{dialect}' does not support operator '{operator}'")]
    UnsupportedOperator {
        dialect: &'static str,
        operator: Operator,
    },

    /// Data source was not a sequence of records.
    #[error("expected a sequence of records, found {found}")]
    NonSequenceDataset { found: &'static str },

    /// A record in the data source was not a mapping.
    #[error("record at index {index} is not a mapping")]
    NonMappingRecord { index: usize },

    /// JSON input could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
