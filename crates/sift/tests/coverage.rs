//! Additional tests to improve code coverage.

use serde_json::json;
use sift::{
    Builder, Criteria, CriteriaParser, Criterion, Dialect, Dir, Filter, JsonDataset, Literal,
    Number, Operator, OrderBy, OrderSpec, Query, Scope, ScopeBuilder, ScopeKind, SiftError, Term,
    Timestamp, Value,
};

// ============================================================================
// Value type coverage
// ============================================================================

#[test]
fn value_extractors() {
    assert_eq!(Value::String("hello").as_str(), Some("hello"));
    assert_eq!(Value::String("hello").as_number(), None);
    assert_eq!(Value::Number(Number::I64(42)).as_number(), Some(Number::I64(42)));
    assert_eq!(Value::Bool(true).as_bool(), Some(true));
    assert_eq!(Value::Null.as_str(), None);
    assert!(Value::Null.is_null());
    assert!(!Value::Opaque.is_null());
}

#[test]
fn value_compare_requires_same_type() {
    use std::cmp::Ordering;

    assert_eq!(
        Value::String("a").compare(&Value::String("b")),
        Some(Ordering::Less)
    );
    assert_eq!(
        Value::Timestamp(Timestamp(2000)).compare(&Value::Timestamp(Timestamp(1000))),
        Some(Ordering::Greater)
    );
    assert_eq!(Value::String("1").compare(&Value::Number(Number::I64(1))), None);
    assert_eq!(Value::Null.compare(&Value::Null), None);
    assert_eq!(Value::Opaque.compare(&Value::Opaque), None);
}

#[test]
fn number_mixed_comparisons() {
    use std::cmp::Ordering;

    assert_eq!(Number::I64(-1).compare(Number::U64(0)), Some(Ordering::Less));
    assert_eq!(Number::U64(5).compare(Number::I64(5)), Some(Ordering::Equal));
    assert_eq!(Number::I64(2).compare(Number::F64(1.5)), Some(Ordering::Greater));
    assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    assert_eq!(Number::U64(42).to_f64(), 42.0);
}

#[test]
fn timestamp_units() {
    assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
    assert_eq!(Timestamp::from_millis(1500), Timestamp(1500));
}

// ============================================================================
// Literal coverage
// ============================================================================

#[test]
fn literal_conversions() {
    assert_eq!(Literal::from("x"), Literal::String("x".to_string()));
    assert_eq!(Literal::from(7u8), Literal::Number(Number::U64(7)));
    assert_eq!(Literal::from(1.5f32), Literal::Number(Number::F64(1.5)));
    assert_eq!(Literal::from(None::<i32>), Literal::Null);
    assert_eq!(Literal::from(Some(true)), Literal::Bool(true));
    assert_eq!(
        Literal::from(vec!["a", "b"]),
        Literal::List(vec![Literal::from("a"), Literal::from("b")])
    );
    assert_eq!(
        Literal::from(Timestamp(10)),
        Literal::Timestamp(Timestamp(10))
    );
}

#[test]
fn literal_equality_against_values() {
    assert!(Literal::Null.equals(&Value::Null));
    assert!(!Literal::Null.equals(&Value::Bool(false)));
    assert!(Literal::from(3).equals(&Value::Number(Number::U64(3))));
    assert!(!Literal::from(vec![1]).equals(&Value::Number(Number::I64(1))));
    assert_eq!(Literal::from(vec![1, 2]).candidates().len(), 2);
    assert_eq!(Literal::from(1).candidates().len(), 1);
}

#[test]
fn literal_from_json() {
    assert_eq!(Literal::from_json(&json!(null)).unwrap(), Literal::Null);
    assert_eq!(
        Literal::from_json(&json!([1, "a"])).unwrap(),
        Literal::List(vec![Literal::from(1i64), Literal::from("a")])
    );
    assert!(matches!(
        Literal::from_json(&json!({"a": 1})),
        Err(SiftError::MalformedFilter { .. })
    ));
}

#[test]
fn literal_display() {
    assert_eq!(Literal::from("x").to_string(), r#""x""#);
    assert_eq!(Literal::Null.to_string(), "null");
    assert_eq!(Literal::from(3).to_string(), "3");
}

// ============================================================================
// Operator coverage
// ============================================================================

#[test]
fn operator_names_and_aliases() {
    for op in Operator::ALL {
        assert_eq!(Operator::from_name(op.as_str()), Some(op));
        assert_eq!(op.to_string(), op.as_str());
    }

    assert_eq!(Operator::from_name("gte"), Some(Operator::GreaterThanOrEqualTo));
    assert_eq!(Operator::from_name("ne"), Some(Operator::NotEqual));
    assert_eq!(Operator::from_name("frobnicate"), None);

    let err = "frobnicate".parse::<Operator>().unwrap_err();
    assert_eq!(err.to_string(), "unknown operator 'frobnicate'");
}

#[test]
fn operator_classes() {
    assert!(Operator::OneOf.takes_list());
    assert!(Operator::NotOneOf.takes_list());
    assert!(Operator::Null.ignores_value());
    assert!(Operator::LessThan.is_ordered());
    assert!(!Operator::Equal.is_ordered());
}

// ============================================================================
// Criteria coverage
// ============================================================================

#[test]
fn criterion_validation() {
    assert!(matches!(
        Criterion::new("", Operator::Equal, 1),
        Err(SiftError::InvalidAttribute { .. })
    ));
    assert!(matches!(
        Criterion::new("genre", Operator::NotOneOf, "x"),
        Err(SiftError::InvalidOperand {
            operator: Operator::NotOneOf,
            ..
        })
    ));

    let null = Criterion::new("series", Operator::Null, "ignored").unwrap();
    assert_eq!(null.value(), &Literal::Null);
}

#[test]
fn criterion_operator_semantics() {
    let title = Value::String("Tehanu");
    let year = Value::Number(Number::I64(1990));

    let check = |op: Operator, value: Literal, attribute: &Value<'_>| {
        Criterion::new("a", op, value).unwrap().matches(attribute)
    };

    assert!(check(Operator::Equal, "Tehanu".into(), &title));
    assert!(check(Operator::NotEqual, "Tehanu".into(), &Value::Null));
    assert!(check(Operator::GreaterThan, 1970.into(), &year));
    assert!(check(Operator::GreaterThanOrEqualTo, 1990.into(), &year));
    assert!(!check(Operator::LessThan, 1990.into(), &year));
    assert!(check(Operator::LessThanOrEqualTo, 1990.into(), &year));
    assert!(check(Operator::Null, Literal::Null, &Value::Null));
    assert!(check(Operator::NotNull, Literal::Null, &title));
    assert!(check(Operator::OneOf, vec![1968, 1990].into(), &year));
    assert!(check(Operator::NotOneOf, vec![1968].into(), &year));

    // Incomparable values never satisfy an ordered operator
    assert!(!check(Operator::GreaterThan, 1970.into(), &title));
    assert!(!check(Operator::LessThan, 1970.into(), &Value::Null));
}

#[test]
fn criteria_display_and_inversion() {
    let criteria: Criteria = vec![
        Criterion::new("year", Operator::GreaterThan, 1970).unwrap(),
        Criterion::new("series", Operator::NotNull, Literal::Null).unwrap(),
    ]
    .into_iter()
    .collect();

    let rendered: Vec<String> = criteria.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["year greater_than 1970", "series not_null"]);

    let inverted: Vec<Operator> = criteria.invert().iter().map(Criterion::operator).collect();
    assert_eq!(inverted, vec![Operator::LessThanOrEqualTo, Operator::Null]);
}

// ============================================================================
// Parser coverage
// ============================================================================

#[test]
fn parser_requires_some_input() {
    assert!(matches!(
        CriteriaParser::parse(None, None),
        Err(SiftError::MissingFilter)
    ));
}

#[test]
fn parser_bare_values_become_equality() {
    let criteria = CriteriaParser::parse_filter(&Filter::new().with("author", "Tolkien")).unwrap();
    let criterion = &criteria.as_slice()[0];
    assert_eq!(criterion.attribute(), "author");
    assert_eq!(criterion.operator(), Operator::Equal);
    assert_eq!(criterion.value(), &Literal::from("Tolkien"));
}

#[test]
fn parser_is_fail_fast() {
    let err = CriteriaParser::parse_block(|ops| {
        Filter::new()
            .with("author", "Tolkien")
            .with("genre", ops.call("frobnicate", "x"))
    })
    .unwrap_err();
    assert!(matches!(err, SiftError::UnknownOperator { ref name } if name == "frobnicate"));
}

#[test]
fn filter_from_iterator_and_terms() {
    let filter: Filter = vec![("author", "Tolkien"), ("title", "The Hobbit")]
        .into_iter()
        .collect();
    assert_eq!(filter.len(), 2);

    let entries: Vec<(&str, &Term)> = filter.iter().collect();
    assert_eq!(entries[0].0, "author");
    assert_eq!(entries[0].1, &Term::Literal(Literal::from("Tolkien")));
    assert!(Filter::new().is_empty());
}

#[test]
fn filter_from_json() {
    let filter = Filter::from_json(&json!({
        "author": "LeGuin",
        "year": {"gte": 1970},
        "genre": {"one_of": ["fantasy", "sf"]},
    }))
    .unwrap();
    let criteria = CriteriaParser::parse_filter(&filter).unwrap();
    let operators: Vec<Operator> = criteria.iter().map(Criterion::operator).collect();

    assert_eq!(operators.len(), 3);
    assert!(operators.contains(&Operator::Equal));
    assert!(operators.contains(&Operator::GreaterThanOrEqualTo));
    assert!(operators.contains(&Operator::OneOf));
}

// ============================================================================
// Ordering coverage
// ============================================================================

#[test]
fn dir_parsing() {
    assert_eq!("ASC".parse::<Dir>(), Ok(Dir::Asc));
    assert_eq!("descending".parse::<Dir>(), Ok(Dir::Desc));
    assert!("up".parse::<Dir>().is_err());
    assert_eq!(Dir::default(), Dir::Asc);
    assert_eq!(Dir::Desc.to_string(), "desc");
}

#[test]
fn order_spec_shapes() {
    assert_eq!(
        OrderSpec::from("title").resolve().unwrap(),
        vec![OrderBy::asc("title")]
    );
    assert_eq!(
        OrderSpec::from(vec!["author", "title"]).resolve().unwrap(),
        vec![OrderBy::asc("author"), OrderBy::asc("title")]
    );
    assert_eq!(
        OrderSpec::from(json!(["author", {"year": "desc"}]))
            .resolve()
            .unwrap(),
        vec![OrderBy::asc("author"), OrderBy::desc("year")]
    );
    assert_eq!(
        OrderSpec::from(OrderBy::desc("year")).resolve().unwrap(),
        vec![OrderBy::desc("year")]
    );
}

#[test]
fn order_spec_rejections() {
    for spec in [
        OrderSpec::from(json!(42)),
        OrderSpec::from(json!({"year": 1})),
        OrderSpec::from(json!([true])),
        OrderSpec::from(Vec::<String>::new()),
        OrderSpec::from(""),
        OrderSpec::from(("year", "sideways")),
    ] {
        assert!(
            matches!(spec.clone().resolve(), Err(SiftError::InvalidOrder { .. })),
            "{spec:?} should be rejected"
        );
    }

    let err = OrderSpec::from(json!(42)).resolve().unwrap_err();
    assert!(matches!(err, SiftError::InvalidOrder { ref spec, .. } if spec == "42"));
}

#[test]
fn nulls_sort_last_ascending() {
    let books = vec![
        json!({"title": "b", "series": "Earthsea"}),
        json!({"title": "a"}),
        json!({"title": "c", "series": "Annals"}),
    ];

    let titles = |dir: Dir| -> Vec<String> {
        Query::new(&books)
            .order(("series", dir))
            .unwrap()
            .to_vec()
            .into_iter()
            .map(|b| b["title"].as_str().unwrap_or_default().to_string())
            .collect()
    };

    assert_eq!(titles(Dir::Asc), vec!["c", "b", "a"]);
    assert_eq!(titles(Dir::Desc), vec!["a", "b", "c"]);
}

// ============================================================================
// Scope and builder coverage
// ============================================================================

#[test]
fn scope_kind_introspection() {
    let scope = Scope::null()
        .filter(&Filter::new().with("author", "Tolkien"))
        .unwrap();

    match scope.kind() {
        ScopeKind::Criteria { criteria, inverted } => {
            assert_eq!(criteria.len(), 1);
            assert!(!inverted);
        }
        other => panic!("unexpected scope kind {other:?}"),
    }
}

#[test]
fn builders_are_interchangeable_within_a_dialect() {
    let builder = Builder::default();
    assert_eq!(builder, Builder::basic());
    assert_eq!(builder.dialect(), Dialect::BASIC);
    assert_eq!(Dialect::BASIC.operators().len(), Operator::ALL.len());

    let scope = builder
        .filter(&builder.all_scope(), Some(&Filter::new().with("a", 1)), None)
        .unwrap();
    assert_eq!(scope.type_name(), "criteria");
}

#[test]
fn scope_display() {
    let scope = Scope::null()
        .filter_with(|ops| Filter::new().with("year", ops.gt(1970)).with("series", ops.null()))
        .unwrap();
    assert_eq!(scope.to_string(), "(year greater_than 1970 AND series null)");

    let negated = Scope::null().not(&scope).unwrap();
    assert_eq!(
        negated.to_string(),
        "(year less_than_or_equal_to 1970 OR series not_null)"
    );

    let either = scope.or(&negated).unwrap();
    let both = either.and(&Scope::null().filter(&Filter::new().with("a", 1)).unwrap()).unwrap();
    let not_both = Scope::null().not(&both).unwrap();
    assert!(not_both.to_string().starts_with("NOT ("));
}

// ============================================================================
// Dataset coverage
// ============================================================================

#[test]
fn json_dataset_queries() {
    let dataset: JsonDataset = r#"[
        {"title": "The Hobbit", "year": 1937},
        {"title": "Tehanu", "year": 1990},
        {"title": "The Silmarillion", "year": 1977}
    ]"#
    .parse()
    .unwrap();

    assert_eq!(dataset.len(), 3);
    assert!(!dataset.is_empty());

    let query = Query::new(&dataset)
        .filter_with(|ops| Filter::new().with("year", ops.gt(1950)))
        .unwrap()
        .order(("year", "desc"))
        .unwrap();

    let titles: Vec<&str> = query
        .to_vec()
        .into_iter()
        .filter_map(|record| record.get("title").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(titles, vec!["Tehanu", "The Silmarillion"]);
}

#[test]
fn error_messages() {
    assert_eq!(
        SiftError::NonMappingRecord { index: 3 }.to_string(),
        "record at index 3 is not a mapping"
    );
    assert_eq!(
        SiftError::UnsupportedOperator {
            dialect: "key_value",
            operator: Operator::OneOf,
        }
        .to_string(),
        "dialect 'key_value' does not support operator 'one_of'"
    );
    assert_eq!(
        SiftError::EmptyNegation.to_string(),
        "a negation scope requires at least one child scope"
    );
}
