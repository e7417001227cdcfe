//! Criteria: the backend-neutral leaf filter.
//!
//! A [`Criterion`] is one `(attribute, operator, value)` triple; [`Criteria`]
//! is an ordered list of them. Evaluating a criterion against a record is the
//! reference backend's translation of the triple into a predicate.

use crate::error::{Result, SiftError};
use crate::operator::Operator;
use crate::record::Record;
use crate::value::{Literal, Value};

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use sift::{Criterion, Literal, Operator, Value};
///
/// let criterion = Criterion::new("author", Operator::Equal, "Tolkien").unwrap();
/// assert!(criterion.matches(&Value::String("Tolkien")));
///
/// // one_of requires a candidate list
/// assert!(Criterion::new("author", Operator::OneOf, "Tolkien").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    attribute: String,
    operator: Operator,
    value: Literal,
}

impl Criterion {
    /// Creates a criterion, validating the attribute name and operand shape.
    pub fn new(
        attribute: impl Into<String>,
        operator: Operator,
        value: impl Into<Literal>,
    ) -> Result<Self> {
        let attribute = attribute.into();
        if attribute.is_empty() {
            return Err(SiftError::InvalidAttribute { attribute });
        }

        let value = value.into();
        let value = if operator.ignores_value() {
            Literal::Null
        } else if operator.takes_list() && !matches!(value, Literal::List(_)) {
            return Err(SiftError::InvalidOperand {
                operator,
                reason: "expected a list of candidate values",
            });
        } else {
            value
        };

        Ok(Criterion {
            attribute,
            operator,
            value,
        })
    }

    /// The attribute name this criterion reads.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The value compared against.
    pub fn value(&self) -> &Literal {
        &self.value
    }

    /// Returns the criterion with its operator replaced by the complement.
    pub fn invert(&self) -> Criterion {
        Criterion {
            attribute: self.attribute.clone(),
            operator: self.operator.invert(),
            value: self.value.clone(),
        }
    }

    /// Evaluates this criterion against an attribute value.
    ///
    /// Ordered comparisons between values that are not comparable (mismatched
    /// types, nulls) never match.
    pub fn matches(&self, attribute: &Value<'_>) -> bool {
        self.evaluate(self.operator, attribute)
    }

    /// Evaluates this criterion as the negation of its complement.
    ///
    /// Agrees with [`matches`](Self::matches) on comparable values. Where the
    /// complement is an ordered comparison that cannot compare the value
    /// (a missing attribute, a mismatched type), this holds and `matches`
    /// does not.
    pub fn matches_negated(&self, attribute: &Value<'_>) -> bool {
        !self.evaluate(self.operator.invert(), attribute)
    }

    /// Evaluates this criterion against a record.
    pub fn matches_record<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.matches(&record.attribute(&self.attribute))
    }

    fn evaluate(&self, operator: Operator, attribute: &Value<'_>) -> bool {
        match operator {
            Operator::Equal => self.value.equals(attribute),
            Operator::NotEqual => !self.value.equals(attribute),
            Operator::Null => attribute.is_null(),
            Operator::NotNull => !attribute.is_null(),
            Operator::OneOf => self.is_candidate(attribute),
            Operator::NotOneOf => !self.is_candidate(attribute),
            op => self
                .value
                .order_of(attribute)
                .is_some_and(|ordering| op.eval_ordering(ordering)),
        }
    }

    fn is_candidate(&self, attribute: &Value<'_>) -> bool {
        self.value
            .candidates()
            .iter()
            .any(|candidate| candidate.equals(attribute))
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.operator.ignores_value() {
            write!(f, "{} {}", self.attribute, self.operator)
        } else {
            write!(f, "{} {} {}", self.attribute, self.operator, self.value)
        }
    }
}

/// Ordered list of criteria.
///
/// Criteria are immutable once built; combining returns a new list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria(Vec<Criterion>);

impl Criteria {
    /// Creates an empty criteria list.
    pub fn new() -> Self {
        Criteria::default()
    }

    /// Number of criteria.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no criteria.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the criteria in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.0.iter()
    }

    /// Returns the criteria as a slice.
    pub fn as_slice(&self) -> &[Criterion] {
        &self.0
    }

    /// Returns a list holding these criteria followed by `other`'s.
    pub fn concat(&self, other: &Criteria) -> Criteria {
        self.0.iter().chain(other.0.iter()).cloned().collect()
    }

    /// Returns the list with every operator inverted.
    pub fn invert(&self) -> Criteria {
        self.0.iter().map(Criterion::invert).collect()
    }

    /// Returns `true` if every criterion matches the record.
    pub fn all_match<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.0.iter().all(|criterion| criterion.matches_record(record))
    }

    /// Evaluates inverted criteria: `true` if at least one criterion's
    /// complement fails for the record.
    ///
    /// This is the exact complement of `all_match` over the un-inverted list,
    /// including records the ordered operators cannot compare.
    pub fn any_negated_match<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.0
            .iter()
            .any(|criterion| criterion.matches_negated(&record.attribute(&criterion.attribute)))
    }
}

impl FromIterator<Criterion> for Criteria {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        Criteria(iter.into_iter().collect())
    }
}

impl IntoIterator for Criteria {
    type Item = Criterion;
    type IntoIter = std::vec::IntoIter<Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Criteria {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Timestamp};

    fn criterion(attribute: &str, operator: Operator, value: impl Into<Literal>) -> Criterion {
        Criterion::new(attribute, operator, value).unwrap()
    }

    #[test]
    fn equal_and_not_equal() {
        let eq = criterion("author", Operator::Equal, "Tolkien");
        assert!(eq.matches(&Value::String("Tolkien")));
        assert!(!eq.matches(&Value::String("LeGuin")));
        assert!(!eq.matches(&Value::Null));

        let ne = criterion("author", Operator::NotEqual, "Tolkien");
        assert!(!ne.matches(&Value::String("Tolkien")));
        assert!(ne.matches(&Value::String("LeGuin")));
        // A missing attribute is not equal to a present value
        assert!(ne.matches(&Value::Null));
    }

    #[test]
    fn ordered_comparisons() {
        let year = |n: i64| Value::Number(Number::I64(n));

        let gt = criterion("year", Operator::GreaterThan, 1970);
        assert!(gt.matches(&year(1971)));
        assert!(!gt.matches(&year(1970)));

        let gte = criterion("year", Operator::GreaterThanOrEqualTo, 1970);
        assert!(gte.matches(&year(1970)));
        assert!(!gte.matches(&year(1969)));

        let lt = criterion("year", Operator::LessThan, 1970);
        assert!(lt.matches(&year(1969)));
        assert!(!lt.matches(&year(1970)));

        let lte = criterion("year", Operator::LessThanOrEqualTo, 1970);
        assert!(lte.matches(&year(1970)));
        assert!(!lte.matches(&year(1971)));
    }

    #[test]
    fn ordered_comparison_of_incomparable_values_never_matches() {
        let gt = criterion("year", Operator::GreaterThan, 1970);
        assert!(!gt.matches(&Value::Null));
        assert!(!gt.matches(&Value::String("1980")));
        assert!(!gt.matches(&Value::Opaque));

        let lte = criterion("year", Operator::LessThanOrEqualTo, 1970);
        assert!(!lte.matches(&Value::Number(Number::F64(f64::NAN))));
    }

    #[test]
    fn timestamps_compare_in_order() {
        let before = criterion("published", Operator::LessThan, Timestamp(1000));
        assert!(before.matches(&Value::Timestamp(Timestamp(999))));
        assert!(!before.matches(&Value::Timestamp(Timestamp(1000))));
    }

    #[test]
    fn null_and_not_null_ignore_value() {
        let null = criterion("series", Operator::Null, "ignored");
        assert_eq!(null.value(), &Literal::Null);
        assert!(null.matches(&Value::Null));
        assert!(!null.matches(&Value::String("Earthsea")));

        let not_null = criterion("series", Operator::NotNull, Literal::Null);
        assert!(not_null.matches(&Value::String("Earthsea")));
        assert!(not_null.matches(&Value::Opaque));
        assert!(!not_null.matches(&Value::Null));
    }

    #[test]
    fn one_of_and_not_one_of() {
        let one_of = criterion("genre", Operator::OneOf, vec!["fantasy", "sci-fi"]);
        assert!(one_of.matches(&Value::String("fantasy")));
        assert!(one_of.matches(&Value::String("sci-fi")));
        assert!(!one_of.matches(&Value::String("horror")));
        assert!(!one_of.matches(&Value::Null));

        let not_one_of = criterion("genre", Operator::NotOneOf, vec!["fantasy", "sci-fi"]);
        assert!(!not_one_of.matches(&Value::String("fantasy")));
        assert!(not_one_of.matches(&Value::String("horror")));
    }

    #[test]
    fn one_of_with_null_candidate_matches_missing() {
        let one_of = criterion("series", Operator::OneOf, vec![Literal::Null, "Earthsea".into()]);
        assert!(one_of.matches(&Value::Null));
        assert!(one_of.matches(&Value::String("Earthsea")));
    }

    #[test]
    fn construction_validates_input() {
        assert!(matches!(
            Criterion::new("", Operator::Equal, 1),
            Err(SiftError::InvalidAttribute { .. })
        ));
        assert!(matches!(
            Criterion::new("genre", Operator::NotOneOf, "fantasy"),
            Err(SiftError::InvalidOperand {
                operator: Operator::NotOneOf,
                ..
            })
        ));
    }

    #[test]
    fn invert_complements_the_match() {
        let values = [
            Value::Number(Number::I64(1)),
            Value::Number(Number::I64(5)),
            Value::Number(Number::I64(9)),
        ];
        let gt = criterion("n", Operator::GreaterThan, 5);
        let inverted = gt.invert();
        for value in &values {
            assert_ne!(gt.matches(value), inverted.matches(value));
        }
    }

    #[test]
    fn negated_inverse_complements_incomparable_values() {
        let gt = criterion("year", Operator::GreaterThan, 1970);
        let inverted = gt.invert();

        for value in [Value::Null, Value::String("unknown"), Value::Opaque] {
            assert!(!gt.matches(&value));
            assert!(!inverted.matches(&value));
            assert!(inverted.matches_negated(&value));
        }

        let year = |n: i64| Value::Number(Number::I64(n));
        for value in [year(1969), year(1970), year(1971)] {
            assert_eq!(inverted.matches_negated(&value), inverted.matches(&value));
            assert_ne!(inverted.matches_negated(&value), gt.matches(&value));
        }
    }

    #[test]
    fn any_negated_match_is_complement_of_all_match() {
        let criteria: Criteria = vec![
            criterion("year", Operator::GreaterThanOrEqualTo, 1970),
            criterion("author", Operator::Equal, "LeGuin"),
        ]
        .into_iter()
        .collect();
        let inverted = criteria.invert();

        let records = [
            serde_json::json!({"year": 1974, "author": "LeGuin"}),
            serde_json::json!({"year": 1954, "author": "LeGuin"}),
            serde_json::json!({"author": "LeGuin"}),
            serde_json::json!({"year": "unknown", "author": "Tolkien"}),
            serde_json::json!({}),
        ];
        for record in &records {
            assert_eq!(inverted.any_negated_match(record), !criteria.all_match(record));
        }
    }

    #[test]
    fn criteria_concat_and_invert() {
        let a: Criteria = vec![criterion("a", Operator::Equal, 1)].into_iter().collect();
        let b: Criteria = vec![criterion("b", Operator::OneOf, vec![2, 3])]
            .into_iter()
            .collect();

        let both = a.concat(&b);
        assert_eq!(both.len(), 2);
        assert_eq!(both.as_slice()[0].attribute(), "a");
        assert_eq!(both.as_slice()[1].attribute(), "b");

        let inverted = both.invert();
        assert_eq!(inverted.as_slice()[0].operator(), Operator::NotEqual);
        assert_eq!(inverted.as_slice()[1].operator(), Operator::NotOneOf);
    }

    #[test]
    fn display() {
        assert_eq!(criterion("year", Operator::GreaterThan, 1970).to_string(), "year greater_than 1970");
        assert_eq!(criterion("series", Operator::NotNull, Literal::Null).to_string(), "series not_null");
    }
}
