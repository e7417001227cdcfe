//! Scopes: immutable, composable filter expressions.
//!
//! A [`Scope`] is a tree of [`ScopeKind`] nodes tagged with the [`Dialect`]
//! of the builder that produced it. Scopes never change after construction;
//! `and`, `or`, `not` and `filter` return new scopes and share unchanged
//! subtrees with their inputs.
//!
//! ```
//! use sift::{Filter, Scope};
//! use serde_json::json;
//!
//! let tolkien = Scope::null().filter(&Filter::new().with("author", "Tolkien")).unwrap();
//! let leguin = Scope::null().filter(&Filter::new().with("author", "LeGuin")).unwrap();
//! let either = tolkien.or(&leguin).unwrap();
//!
//! assert!(either.matches(&json!({"author": "LeGuin"})));
//! assert!(!either.matches(&json!({"author": "Herbert"})));
//! ```
//!
//! # Evaluation
//!
//! | Kind | Matches |
//! |------|---------|
//! | `All`, `Null` | every record |
//! | `None` | no record |
//! | `Criteria` | every criterion holds; if inverted, at least one original criterion fails |
//! | `Conjunction` | every child matches |
//! | `Disjunction` | at least one child matches |
//! | `Negation` | at least one child fails to match |

mod builder;
mod compose;

use std::fmt;
use std::sync::Arc;

pub use builder::{Builder, Dialect, ScopeBuilder};

use crate::criteria::Criteria;
use crate::error::Result;
use crate::parser::{Filter, Operators};
use crate::record::Record;

/// The shape of a scope node.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeKind {
    /// Matches every record.
    All,
    /// Matches no record.
    None,
    /// Unscoped passthrough: matches every record, but marks "no scope
    /// configured yet" and disappears under composition.
    Null,
    /// Leaf filter.
    ///
    /// An inverted criteria scope holds the complemented criteria of a
    /// negated scope and matches when any of the original criteria fails.
    Criteria { criteria: Criteria, inverted: bool },
    /// AND of the children.
    Conjunction(Vec<Scope>),
    /// OR of the children.
    Disjunction(Vec<Scope>),
    /// NOT of the AND of the children (at least one child).
    Negation(Vec<Scope>),
}

/// An immutable filter expression.
///
/// Cloning is cheap: the node tree is shared.
#[derive(Debug, Clone)]
pub struct Scope {
    dialect: Dialect,
    kind: Arc<ScopeKind>,
}

impl Scope {
    pub(crate) fn new(dialect: Dialect, kind: ScopeKind) -> Self {
        Scope {
            dialect,
            kind: Arc::new(kind),
        }
    }

    /// The shared basic-dialect scope that matches everything.
    pub fn all() -> Scope {
        Builder::basic().all_scope()
    }

    /// The shared basic-dialect scope that matches nothing.
    pub fn none() -> Scope {
        Builder::basic().none_scope()
    }

    /// The shared basic-dialect unscoped passthrough.
    pub fn null() -> Scope {
        Builder::basic().null_scope()
    }

    /// The node at the root of this scope.
    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }

    /// The dialect of the builder that produced this scope.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Short lowercase name of the root node's kind.
    pub fn type_name(&self) -> &'static str {
        match self.kind() {
            ScopeKind::All => "all",
            ScopeKind::None => "none",
            ScopeKind::Null => "null",
            ScopeKind::Criteria { .. } => "criteria",
            ScopeKind::Conjunction(_) => "conjunction",
            ScopeKind::Disjunction(_) => "disjunction",
            ScopeKind::Negation(_) => "negation",
        }
    }

    /// Child scopes of a composite node; empty for leaves.
    pub fn children(&self) -> &[Scope] {
        match self.kind() {
            ScopeKind::Conjunction(children)
            | ScopeKind::Disjunction(children)
            | ScopeKind::Negation(children) => children,
            _ => &[],
        }
    }

    /// The criteria of a criteria node.
    pub fn criteria(&self) -> Option<&Criteria> {
        match self.kind() {
            ScopeKind::Criteria { criteria, .. } => Some(criteria),
            _ => None,
        }
    }

    /// Returns `true` if the scope carries no condition.
    ///
    /// Empty scopes are `Null`, criteria scopes without criteria, and
    /// conjunctions or disjunctions without children. Composing with an empty
    /// scope leaves the other side unchanged.
    pub fn is_empty(&self) -> bool {
        match self.kind() {
            ScopeKind::Null => true,
            ScopeKind::Criteria { criteria, .. } => criteria.is_empty(),
            ScopeKind::Conjunction(children) | ScopeKind::Disjunction(children) => {
                children.is_empty()
            }
            _ => false,
        }
    }

    /// Returns `true` if both scopes share the same node.
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.kind, &other.kind)
    }

    /// Tests whether a record matches this scope.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self.kind() {
            ScopeKind::All | ScopeKind::Null => true,
            ScopeKind::None => false,
            ScopeKind::Criteria {
                criteria,
                inverted: false,
            } => criteria.all_match(record),
            ScopeKind::Criteria {
                criteria,
                inverted: true,
            } => criteria.any_negated_match(record),
            ScopeKind::Conjunction(children) => children.iter().all(|child| child.matches(record)),
            ScopeKind::Disjunction(children) => children.iter().any(|child| child.matches(record)),
            ScopeKind::Negation(children) => children.iter().any(|child| !child.matches(record)),
        }
    }

    /// AND of this scope and `other`, in this scope's dialect.
    pub fn and(&self, other: &Scope) -> Result<Scope> {
        self.builder().and(self, other)
    }

    /// OR of this scope and `other`, in this scope's dialect.
    pub fn or(&self, other: &Scope) -> Result<Scope> {
        self.builder().or(self, other)
    }

    /// This scope AND NOT `other`, in this scope's dialect.
    pub fn not(&self, other: &Scope) -> Result<Scope> {
        self.builder().not(self, other)
    }

    /// AND of this scope and the criteria parsed from a hash-form filter.
    pub fn filter(&self, filter: &Filter) -> Result<Scope> {
        self.builder().filter(self, Some(filter), None)
    }

    /// AND of this scope and the criteria parsed from a filter block.
    pub fn filter_with<F>(&self, block: F) -> Result<Scope>
    where
        F: FnOnce(&Operators) -> Filter,
    {
        self.filter(&block(&Operators))
    }

    fn builder(&self) -> Builder {
        Builder::new(self.dialect)
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.dialect == other.dialect && (self.ptr_eq(other) || self.kind == other.kind)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[String], sep: &str) -> fmt::Result {
            write!(f, "({})", items.join(sep))
        }

        match self.kind() {
            ScopeKind::All => f.write_str("all"),
            ScopeKind::None => f.write_str("none"),
            ScopeKind::Null => f.write_str("null"),
            ScopeKind::Criteria { criteria, inverted } => {
                let items: Vec<String> = criteria.iter().map(ToString::to_string).collect();
                join(f, &items, if *inverted { " OR " } else { " AND " })
            }
            ScopeKind::Conjunction(children) | ScopeKind::Disjunction(children) => {
                let items: Vec<String> = children.iter().map(ToString::to_string).collect();
                let sep = if matches!(self.kind(), ScopeKind::Conjunction(_)) {
                    " AND "
                } else {
                    " OR "
                };
                join(f, &items, sep)
            }
            ScopeKind::Negation(children) => {
                let items: Vec<String> = children.iter().map(ToString::to_string).collect();
                f.write_str("NOT ")?;
                join(f, &items, " AND ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criterion;
    use crate::operator::Operator;
    use serde_json::json;

    fn criteria_scope(criteria: Vec<Criterion>, inverted: bool) -> Scope {
        Builder::basic()
            .build_criteria_scope(criteria.into_iter().collect(), inverted)
            .unwrap()
    }

    fn eq(attribute: &str, value: &str) -> Criterion {
        Criterion::new(attribute, Operator::Equal, value).unwrap()
    }

    #[test]
    fn degenerate_scopes() {
        let record = json!({"author": "Tolkien"});
        assert!(Scope::all().matches(&record));
        assert!(Scope::null().matches(&record));
        assert!(!Scope::none().matches(&record));

        assert_ne!(Scope::all(), Scope::null());
        assert!(Scope::all().ptr_eq(&Scope::all()));
    }

    #[test]
    fn criteria_scope_requires_every_criterion() {
        let scope = criteria_scope(vec![eq("author", "Tolkien"), eq("title", "The Hobbit")], false);

        assert!(scope.matches(&json!({"author": "Tolkien", "title": "The Hobbit"})));
        assert!(!scope.matches(&json!({"author": "Tolkien", "title": "Silmarillion"})));
    }

    #[test]
    fn inverted_criteria_scope_requires_any_criterion() {
        let scope = criteria_scope(vec![eq("author", "Tolkien"), eq("title", "The Hobbit")], true);

        assert!(scope.matches(&json!({"author": "Tolkien", "title": "Silmarillion"})));
        assert!(!scope.matches(&json!({"author": "LeGuin", "title": "Tehanu"})));
    }

    #[test]
    fn composite_scopes() {
        let tolkien = criteria_scope(vec![eq("author", "Tolkien")], false);
        let hobbit = criteria_scope(vec![eq("title", "The Hobbit")], false);
        let builder = Builder::basic();

        let both = builder
            .build_conjunction_scope(vec![tolkien.clone(), hobbit.clone()])
            .unwrap();
        let either = builder
            .build_disjunction_scope(vec![tolkien.clone(), hobbit.clone()])
            .unwrap();
        let not_both = builder.build_negation_scope(vec![tolkien, hobbit]).unwrap();

        let hobbit_record = json!({"author": "Tolkien", "title": "The Hobbit"});
        let other_tolkien = json!({"author": "Tolkien", "title": "Silmarillion"});
        let stranger = json!({"author": "LeGuin", "title": "Tehanu"});

        assert!(both.matches(&hobbit_record));
        assert!(!both.matches(&other_tolkien));

        assert!(either.matches(&other_tolkien));
        assert!(!either.matches(&stranger));

        // Negation fails when every child matches, and holds when any fails
        assert!(!not_both.matches(&hobbit_record));
        assert!(not_both.matches(&other_tolkien));
        assert!(not_both.matches(&stranger));
    }

    #[test]
    fn empty_composites() {
        let builder = Builder::basic();
        let record = json!({});

        let conjunction = builder.build_conjunction_scope(vec![]).unwrap();
        let disjunction = builder.build_disjunction_scope(vec![]).unwrap();

        assert!(conjunction.is_empty());
        assert!(disjunction.is_empty());
        assert!(conjunction.matches(&record));
        assert!(!disjunction.matches(&record));
    }

    #[test]
    fn introspection() {
        let scope = criteria_scope(vec![eq("author", "Tolkien")], false);
        assert_eq!(scope.type_name(), "criteria");
        assert_eq!(scope.criteria().map(Criteria::len), Some(1));
        assert!(scope.children().is_empty());
        assert_eq!(scope.dialect(), Dialect::BASIC);
    }

    #[test]
    fn display() {
        let tolkien = criteria_scope(vec![eq("author", "Tolkien")], false);
        let hobbit = criteria_scope(vec![eq("title", "The Hobbit")], false);
        let either = tolkien.or(&hobbit).unwrap();

        assert_eq!(
            either.to_string(),
            r#"((author equal "Tolkien") OR (title equal "The Hobbit"))"#
        );
        assert_eq!(Scope::none().to_string(), "none");
    }
}
