//! Scope builders.
//!
//! A builder is the backend hook of the scope algebra. It constructs scope
//! nodes in its own [`Dialect`], composes them, and rewrites scopes produced
//! by other builders into that dialect.
//!
//! Backends implement [`ScopeBuilder`] by naming their dialect; every other
//! method has a default that a backend may override.
//!
//! ```
//! use sift::{Builder, Dialect, Filter, Operator, Scope, ScopeBuilder, SiftError};
//!
//! // A key-value store that can only test equality.
//! const KEY_VALUE: Dialect = Dialect::new("key_value", &[Operator::Equal, Operator::NotEqual]);
//!
//! let builder = Builder::new(KEY_VALUE);
//! let scope = Scope::null().filter_with(|ops| Filter::new().with("year", ops.gt(1970))).unwrap();
//!
//! let err = builder.transform_scope(&scope).unwrap_err();
//! assert!(matches!(err, SiftError::UnsupportedOperator { operator: Operator::GreaterThan, .. }));
//! ```

use once_cell::sync::Lazy;

use super::compose;
use super::{Scope, ScopeKind};
use crate::criteria::Criteria;
use crate::error::{Result, SiftError};
use crate::operator::Operator;
use crate::parser::{CriteriaParser, Filter, Operators};

/// The scope language of a backend: a name plus the operators it can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    name: &'static str,
    operators: &'static [Operator],
}

impl Dialect {
    /// The in-memory reference dialect. Supports every operator.
    pub const BASIC: Dialect = Dialect::new("basic", &Operator::ALL);

    /// Declares a dialect.
    pub const fn new(name: &'static str, operators: &'static [Operator]) -> Self {
        Dialect { name, operators }
    }

    /// The dialect name.
    pub fn name(self) -> &'static str {
        self.name
    }

    /// The operators this dialect can express.
    pub fn operators(self) -> &'static [Operator] {
        self.operators
    }

    /// Returns `true` if scopes in this dialect may use `operator`.
    pub fn supports(self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }
}

static BASIC_ALL: Lazy<Scope> = Lazy::new(|| Scope::new(Dialect::BASIC, ScopeKind::All));
static BASIC_NONE: Lazy<Scope> = Lazy::new(|| Scope::new(Dialect::BASIC, ScopeKind::None));
static BASIC_NULL: Lazy<Scope> = Lazy::new(|| Scope::new(Dialect::BASIC, ScopeKind::Null));

fn degenerate(dialect: Dialect, kind: ScopeKind) -> Scope {
    if dialect != Dialect::BASIC {
        return Scope::new(dialect, kind);
    }
    match kind {
        ScopeKind::All => BASIC_ALL.clone(),
        ScopeKind::None => BASIC_NONE.clone(),
        _ => BASIC_NULL.clone(),
    }
}

/// Factory and composition rules for one backend's scopes.
pub trait ScopeBuilder: std::fmt::Debug {
    /// The dialect every scope built here is tagged with.
    fn dialect(&self) -> Dialect;

    /// Scope matching every record.
    fn all_scope(&self) -> Scope {
        degenerate(self.dialect(), ScopeKind::All)
    }

    /// Scope matching no record.
    fn none_scope(&self) -> Scope {
        degenerate(self.dialect(), ScopeKind::None)
    }

    /// Unscoped passthrough.
    fn null_scope(&self) -> Scope {
        degenerate(self.dialect(), ScopeKind::Null)
    }

    /// Leaf scope over `criteria`.
    ///
    /// Fails if a criterion uses an operator the dialect cannot express.
    fn build_criteria_scope(&self, criteria: Criteria, inverted: bool) -> Result<Scope> {
        let dialect = self.dialect();
        if let Some(criterion) = criteria.iter().find(|c| !dialect.supports(c.operator())) {
            tracing::debug!(
                dialect = dialect.name(),
                operator = %criterion.operator(),
                attribute = criterion.attribute(),
                "operator not supported by dialect"
            );
            return Err(SiftError::UnsupportedOperator {
                dialect: dialect.name(),
                operator: criterion.operator(),
            });
        }
        Ok(Scope::new(dialect, ScopeKind::Criteria { criteria, inverted }))
    }

    /// AND node over `scopes`, each transformed into this dialect.
    fn build_conjunction_scope(&self, scopes: Vec<Scope>) -> Result<Scope> {
        let scopes = transform_each(self, &scopes)?;
        Ok(Scope::new(self.dialect(), ScopeKind::Conjunction(scopes)))
    }

    /// OR node over `scopes`, each transformed into this dialect.
    fn build_disjunction_scope(&self, scopes: Vec<Scope>) -> Result<Scope> {
        let scopes = transform_each(self, &scopes)?;
        Ok(Scope::new(self.dialect(), ScopeKind::Disjunction(scopes)))
    }

    /// NOT node over `scopes`, each transformed into this dialect.
    ///
    /// Fails with [`SiftError::EmptyNegation`] when `scopes` is empty.
    fn build_negation_scope(&self, scopes: Vec<Scope>) -> Result<Scope> {
        if scopes.is_empty() {
            return Err(SiftError::EmptyNegation);
        }
        let scopes = transform_each(self, &scopes)?;
        Ok(Scope::new(self.dialect(), ScopeKind::Negation(scopes)))
    }

    /// Criteria scope parsed from a hash-form filter and/or a block.
    fn build(
        &self,
        filter: Option<&Filter>,
        block: Option<&dyn Fn(&Operators) -> Filter>,
    ) -> Result<Scope> {
        let criteria = CriteriaParser::parse(filter, block)?;
        self.build_criteria_scope(criteria, false)
    }

    /// Re-expresses `scope` in this builder's dialect.
    ///
    /// The rewrite is structural and keeps every node's kind. Scopes already
    /// in this dialect are returned as-is.
    fn transform_scope(&self, scope: &Scope) -> Result<Scope> {
        if scope.dialect() == self.dialect() {
            return Ok(scope.clone());
        }

        tracing::trace!(
            from = scope.dialect().name(),
            to = self.dialect().name(),
            scope = scope.type_name(),
            "transforming scope"
        );

        match scope.kind() {
            ScopeKind::All => Ok(self.all_scope()),
            ScopeKind::None => Ok(self.none_scope()),
            ScopeKind::Null => Ok(self.null_scope()),
            ScopeKind::Criteria { criteria, inverted } => {
                self.build_criteria_scope(criteria.clone(), *inverted)
            }
            ScopeKind::Conjunction(children) => self.build_conjunction_scope(children.clone()),
            ScopeKind::Disjunction(children) => self.build_disjunction_scope(children.clone()),
            ScopeKind::Negation(children) => self.build_negation_scope(children.clone()),
        }
    }

    /// AND of two scopes.
    fn and(&self, scope: &Scope, other: &Scope) -> Result<Scope> {
        compose::and(self, scope, other)
    }

    /// OR of two scopes.
    fn or(&self, scope: &Scope, other: &Scope) -> Result<Scope> {
        compose::or(self, scope, other)
    }

    /// `scope` AND NOT `other`.
    fn not(&self, scope: &Scope, other: &Scope) -> Result<Scope> {
        compose::not(self, scope, other)
    }

    /// `scope` AND the criteria parsed from a filter and/or block.
    fn filter(
        &self,
        scope: &Scope,
        filter: Option<&Filter>,
        block: Option<&dyn Fn(&Operators) -> Filter>,
    ) -> Result<Scope> {
        let built = self.build(filter, block)?;
        self.and(scope, &built)
    }
}

fn transform_each<B: ScopeBuilder + ?Sized>(builder: &B, scopes: &[Scope]) -> Result<Vec<Scope>> {
    scopes
        .iter()
        .map(|scope| builder.transform_scope(scope))
        .collect()
}

/// Reference builder for a dialect, using every default rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builder {
    dialect: Dialect,
}

impl Builder {
    /// Builder for the given dialect.
    pub const fn new(dialect: Dialect) -> Self {
        Builder { dialect }
    }

    /// Builder for the in-memory reference dialect.
    pub const fn basic() -> Self {
        Builder::new(Dialect::BASIC)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::basic()
    }
}

impl ScopeBuilder for Builder {
    fn dialect(&self) -> Dialect {
        self.dialect
    }
}
