//! Composition rules shared by every builder.
//!
//! Both operands are transformed into the builder's dialect first. The rules
//! keep the tree flat: criteria merge into one leaf, conjunctions and
//! disjunctions absorb operands of their own kind, and the degenerate scopes
//! fold away.

use super::{Scope, ScopeBuilder, ScopeKind};
use crate::error::Result;

pub(super) fn and<B: ScopeBuilder + ?Sized>(builder: &B, scope: &Scope, other: &Scope) -> Result<Scope> {
    let scope = builder.transform_scope(scope)?;
    let other = builder.transform_scope(other)?;

    if other.is_empty() {
        return Ok(scope);
    }

    tracing::trace!(left = scope.type_name(), right = other.type_name(), "and");

    match (scope.kind(), other.kind()) {
        (ScopeKind::None, _) | (_, ScopeKind::None) => Ok(builder.none_scope()),
        (ScopeKind::All, _) => Ok(other.clone()),
        (_, ScopeKind::All) => Ok(scope.clone()),
        _ if scope.is_empty() => Ok(other.clone()),
        (
            ScopeKind::Criteria {
                criteria: left,
                inverted: false,
            },
            ScopeKind::Criteria {
                criteria: right,
                inverted: false,
            },
        ) => builder.build_criteria_scope(left.concat(right), false),
        (ScopeKind::Conjunction(left), ScopeKind::Conjunction(right)) => {
            builder.build_conjunction_scope(left.iter().chain(right).cloned().collect())
        }
        (
            ScopeKind::Conjunction(children),
            ScopeKind::Criteria {
                criteria,
                inverted: false,
            },
        ) => {
            let mut children = children.clone();
            let merged = match children.last().map(Scope::kind) {
                Some(ScopeKind::Criteria {
                    criteria: last,
                    inverted: false,
                }) => Some(builder.build_criteria_scope(last.concat(criteria), false)?),
                _ => None,
            };
            match merged {
                Some(merged) => {
                    children.pop();
                    children.push(merged);
                }
                None => children.push(other.clone()),
            }
            builder.build_conjunction_scope(children)
        }
        (ScopeKind::Conjunction(children), _) => {
            let mut children = children.clone();
            children.push(other.clone());
            builder.build_conjunction_scope(children)
        }
        (_, ScopeKind::Conjunction(children)) => {
            let mut merged = Vec::with_capacity(children.len() + 1);
            merged.push(scope.clone());
            merged.extend(children.iter().cloned());
            builder.build_conjunction_scope(merged)
        }
        _ => builder.build_conjunction_scope(vec![scope.clone(), other.clone()]),
    }
}

pub(super) fn or<B: ScopeBuilder + ?Sized>(builder: &B, scope: &Scope, other: &Scope) -> Result<Scope> {
    let scope = builder.transform_scope(scope)?;
    let other = builder.transform_scope(other)?;

    if other.is_empty() {
        return Ok(scope);
    }

    tracing::trace!(left = scope.type_name(), right = other.type_name(), "or");

    match (scope.kind(), other.kind()) {
        (ScopeKind::All, _) | (_, ScopeKind::All) => Ok(builder.all_scope()),
        (ScopeKind::None, _) => Ok(other.clone()),
        (_, ScopeKind::None) => Ok(scope.clone()),
        _ if scope.is_empty() => Ok(other.clone()),
        (ScopeKind::Disjunction(left), ScopeKind::Disjunction(right)) => {
            builder.build_disjunction_scope(left.iter().chain(right).cloned().collect())
        }
        (ScopeKind::Disjunction(children), _) => {
            let mut children = children.clone();
            children.push(other.clone());
            builder.build_disjunction_scope(children)
        }
        (_, ScopeKind::Disjunction(children)) => {
            let mut merged = Vec::with_capacity(children.len() + 1);
            merged.push(scope.clone());
            merged.extend(children.iter().cloned());
            builder.build_disjunction_scope(merged)
        }
        _ => builder.build_disjunction_scope(vec![scope.clone(), other.clone()]),
    }
}

pub(super) fn not<B: ScopeBuilder + ?Sized>(builder: &B, scope: &Scope, other: &Scope) -> Result<Scope> {
    let scope = builder.transform_scope(scope)?;
    let other = builder.transform_scope(other)?;

    if other.is_empty() {
        return Ok(scope);
    }

    let negated = negate(builder, &other)?;
    and(builder, &scope, &negated)
}

/// Logical complement of `scope`, kept as shallow as the rules allow.
fn negate<B: ScopeBuilder + ?Sized>(builder: &B, scope: &Scope) -> Result<Scope> {
    if scope.is_empty() {
        return Ok(builder.null_scope());
    }

    match scope.kind() {
        ScopeKind::All => Ok(builder.none_scope()),
        ScopeKind::None => Ok(builder.all_scope()),
        ScopeKind::Null => Ok(builder.null_scope()),
        ScopeKind::Criteria { criteria, inverted } => {
            builder.build_criteria_scope(criteria.invert(), !inverted)
        }
        ScopeKind::Negation(children) => match children.as_slice() {
            [only] => Ok(only.clone()),
            _ => builder.build_conjunction_scope(children.clone()),
        },
        ScopeKind::Conjunction(children) => builder.build_negation_scope(children.clone()),
        ScopeKind::Disjunction(_) => builder.build_negation_scope(vec![scope.clone()]),
    }
}
