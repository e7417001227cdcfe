//! Sift - storage-agnostic query scopes.
//!
//! Sift describes *which records match* as an immutable, composable
//! expression tree (a [`Scope`]) and runs it against in-memory data with a
//! reference query engine. It provides:
//!
//! - A closed operator vocabulary: equality, ordering, null checks, set membership
//! - Hash-form and block-form filters parsed into backend-neutral [`Criteria`]
//! - Scope composition with `and`, `or` and `not` that keeps trees flat
//! - Pluggable [`ScopeBuilder`]s that re-express scopes in their own [`Dialect`]
//! - Lazy, re-enterable queries: filter, stable multi-key ordering, pagination
//!
//! # Quick Start
//!
//! ```rust
//! use sift::{Filter, Query, Record, Value, Number};
//!
//! struct Book {
//!     title: String,
//!     author: String,
//!     year: u16,
//! }
//!
//! impl Record for Book {
//!     fn attribute(&self, name: &str) -> Value<'_> {
//!         match name {
//!             "title" => Value::String(&self.title),
//!             "author" => Value::String(&self.author),
//!             "year" => Value::Number(Number::from(self.year)),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! let books = vec![
//!     Book { title: "Tehanu".into(), author: "LeGuin".into(), year: 1990 },
//!     Book { title: "The Hobbit".into(), author: "Tolkien".into(), year: 1937 },
//!     Book { title: "The Lathe of Heaven".into(), author: "LeGuin".into(), year: 1971 },
//! ];
//!
//! let query = Query::new(&books)
//!     .filter_with(|ops| Filter::new().with("author", "LeGuin").with("year", ops.gt(1970)))
//!     .unwrap()
//!     .order("title")
//!     .unwrap();
//!
//! let titles: Vec<&str> = query.each().iter().map(|b| b.title.as_str()).collect();
//! assert_eq!(titles, vec!["Tehanu", "The Lathe of Heaven"]);
//! ```
//!
//! # Scope Semantics
//!
//! | Kind | Matches |
//! |------|---------|
//! | `All`, `Null` | every record (`Null` means "no scope yet" and vanishes under composition) |
//! | `None` | no record |
//! | `Criteria` | every criterion holds; if inverted, any criterion holds |
//! | `Conjunction` | every child |
//! | `Disjunction` | at least one child |
//! | `Negation` | at least one child fails |
//!
//! # Operators
//!
//! | Operator | Aliases | Holds when the attribute |
//! |----------|---------|--------------------------|
//! | `equal` | `eq` | equals the value (a missing attribute equals null) |
//! | `not_equal` | `ne` | differs from the value |
//! | `greater_than` | `gt` | orders after the value |
//! | `greater_than_or_equal_to` | `gte` | orders after or equal |
//! | `less_than` | `lt` | orders before the value |
//! | `less_than_or_equal_to` | `lte` | orders before or equal |
//! | `null` | | is missing or null |
//! | `not_null` | | is present and not null |
//! | `one_of` | | equals one of the candidates |
//! | `not_one_of` | | equals none of the candidates |
//!
//! Ordered operators never match values of different types.
//!
//! # Errors
//!
//! Every error surfaces while a scope or query is being built. Iterating a
//! query never fails. See [`SiftError`].

mod criteria;
mod dataset;
mod error;
mod operator;
mod ordering;
mod parser;
mod query;
mod record;
mod scope;
mod value;

// Re-export public API
pub use criteria::{Criteria, Criterion};
pub use dataset::{Dataset, JsonDataset};
pub use error::{Result, SiftError};
pub use operator::Operator;
pub use ordering::{compare_records, compare_values, Dir, OrderBy, OrderSpec};
pub use parser::{CriteriaParser, Filter, Operators, Term};
pub use query::{Query, Results};
pub use record::{AttributeValue, Record};
pub use scope::{Builder, Dialect, Scope, ScopeBuilder, ScopeKind};
pub use value::{Literal, Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use sift_macros::Record;
