use super::*;
use crate::expression::parser::parse_expr;

fn eval(src: &str) -> Result<f64, EvaluationError> {
    let parsed = parse_expr(src, 100)?;
    eval_expr(&parsed.expr, 100)
}

fn reason(src: &str) -> NonFiniteReason {
    match eval(src) {
        Err(EvaluationError::NonFiniteResult { reason }) => reason,
        other => panic!("{src}: expected a non-finite result, got {other:?}"),
    }
}

#[test]
fn arithmetic_matches_ieee() {
    assert_eq!(eval("0.1 + 0.2").unwrap(), 0.1 + 0.2);
    assert_eq!(eval("7 / 2").unwrap(), 3.5);
    assert_eq!(eval("-5 + 3").unwrap(), -2.0);
    assert_eq!(eval("+4").unwrap(), 4.0);
    assert_eq!(eval("2 ** 0.5").unwrap(), 2f64.powf(0.5));
}

#[test]
fn division_by_zero_is_reported() {
    assert_eq!(reason("1 / 0"), NonFiniteReason::DivisionByZero);
    assert_eq!(reason("0 / 0"), NonFiniteReason::DivisionByZero);
    assert_eq!(reason("-1 / (2 - 2)"), NonFiniteReason::DivisionByZero);
    assert_eq!(reason("0 ** -1"), NonFiniteReason::DivisionByZero);
}

#[test]
fn overflow_is_reported() {
    assert_eq!(reason("10 ** 400"), NonFiniteReason::Overflow);
    assert_eq!(reason("1e308 * 10"), NonFiniteReason::Overflow);
    assert_eq!(reason("1e999"), NonFiniteReason::Overflow);
}

#[test]
fn fractional_power_of_negative_base_is_not_real() {
    assert_eq!(reason("(-8) ** (1/3)"), NonFiniteReason::NotARealNumber);
}

#[test]
fn integral_power_of_negative_base_is_fine() {
    assert_eq!(eval("(-2) ** 3").unwrap(), -8.0);
    assert_eq!(eval("0 ** 0").unwrap(), 1.0);
}

#[test]
fn walk_guards_depth_of_hand_built_trees() {
    let mut e = Expr::Literal { value: 1.0 };
    for _ in 0..10 {
        e = Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(e),
        };
    }
    assert_eq!(eval_expr(&e, 10).unwrap(), 1.0);
    assert_eq!(
        eval_expr(&e, 9).unwrap_err(),
        EvaluationError::TooComplex { max_depth: 9 }
    );
}

#[test]
fn walk_rejects_hand_built_infinite_literal() {
    let e = Expr::Literal {
        value: f64::INFINITY,
    };
    assert_eq!(
        eval_expr(&e, 10).unwrap_err(),
        EvaluationError::NonFiniteResult {
            reason: NonFiniteReason::Overflow
        }
    );
}
