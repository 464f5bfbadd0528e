use super::*;
use crate::foundation::error::CalcError;

#[test]
fn formula_display_is_canonical() {
    let ev = Evaluator::default();
    let cases = [
        ("10+5*2", "10 + 5 * 2"),
        ("(2 + 3) * 4", "(2 + 3) * 4"),
        ("((1))", "1"),
        ("10 - (4 - 3)", "10 - (4 - 3)"),
        ("(10 - 4) - 3", "10 - 4 - 3"),
        ("2 ** 3 ** 2", "2 ** 3 ** 2"),
        ("(2 ** 3) ** 2", "(2 ** 3) ** 2"),
        ("(-8) ** (1 / 3)", "(-8) ** (1 / 3)"),
        ("2**-1", "2 ** -1"),
        ("-(2 + 3)", "-(2 + 3)"),
        ("1_000.50", "1000.5"),
        ("1e20", "1e20"),
    ];
    for (src, want) in cases {
        assert_eq!(ev.parse(src).unwrap().to_string(), want, "{src}");
    }
}

#[test]
fn canonical_form_reparses_to_the_same_tree() {
    let ev = Evaluator::default();
    for src in ["-2 ** 2", "1 / (2 * (3 - 4))", "+-+1", "0.1 + .2e-3 * 5."] {
        let f = ev.parse(src).unwrap();
        let again = ev.parse(&f.to_string()).unwrap();
        assert_eq!(f, again, "{src}");
    }
}

#[test]
fn formula_serializes_as_tagged_tree() {
    let f = Evaluator::default().parse("-1 + 2").unwrap();
    let v = serde_json::to_value(&f).unwrap();
    assert_eq!(
        v,
        serde_json::json!({
            "tree": {
                "kind": "binary",
                "op": "add",
                "left": {
                    "kind": "unary",
                    "op": "neg",
                    "operand": { "kind": "literal", "value": 1.0 }
                },
                "right": { "kind": "literal", "value": 2.0 }
            },
            "depth": 2
        })
    );
}

#[test]
fn input_length_limit_is_checked_first() {
    let ev = Evaluator::new(EvalConfig {
        max_input_len: Some(8),
        ..EvalConfig::default()
    })
    .unwrap();
    assert_eq!(ev.evaluate("1 + 2").unwrap(), 3.0);
    assert_eq!(
        ev.evaluate("1 + 2 + 3 + 4").unwrap_err(),
        EvaluationError::InputTooLong { len: 13, max: 8 }
    );
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let err = Evaluator::new(EvalConfig {
        max_depth: 0,
        ..EvalConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, CalcError::Validation(_)));
}

#[test]
fn formula_keeps_the_depth_bound_it_was_parsed_under() {
    let ev = Evaluator::new(EvalConfig {
        max_depth: 3,
        ..EvalConfig::default()
    })
    .unwrap();
    let f = ev.parse("1 + 2 * 3").unwrap();
    assert_eq!(f.depth(), 2);
    assert_eq!(f.eval().unwrap(), 7.0);
    assert_eq!(
        ev.evaluate("-(-(-(-1)))").unwrap_err(),
        EvaluationError::TooComplex { max_depth: 3 }
    );
}

#[test]
fn evaluation_emits_no_panics_under_a_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        assert_eq!(evaluate("2 ** 10").unwrap(), 1024.0);
        assert!(evaluate("a + 1").is_err());
    });
}

#[test]
fn overflowing_literal_never_becomes_a_formula() {
    let err = Evaluator::default().parse("1e999").unwrap_err();
    assert_eq!(err.code(), "non_finite_result");
    assert_eq!(err.user_message(), "The result is not a finite number");
}
