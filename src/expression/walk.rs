use crate::expression::ast::{BinaryOp, Expr, UnaryOp};
use crate::foundation::error::{EvaluationError, NonFiniteReason};

/// Evaluate a tree depth-first. Every node's value must be finite.
pub(crate) fn eval_expr(expr: &Expr, max_depth: usize) -> Result<f64, EvaluationError> {
    eval_node(expr, 0, max_depth)
}

fn eval_node(expr: &Expr, depth: usize, max_depth: usize) -> Result<f64, EvaluationError> {
    if depth > max_depth {
        return Err(EvaluationError::TooComplex { max_depth });
    }

    match expr {
        Expr::Literal { value } => {
            if value.is_finite() {
                Ok(*value)
            } else {
                Err(non_finite(NonFiniteReason::Overflow))
            }
        }
        Expr::Unary { op, operand } => {
            let v = eval_node(operand, depth + 1, max_depth)?;
            Ok(match op {
                UnaryOp::Neg => -v,
                UnaryOp::Pos => v,
            })
        }
        Expr::Binary { op, left, right } => {
            let a = eval_node(left, depth + 1, max_depth)?;
            let b = eval_node(right, depth + 1, max_depth)?;
            apply_binary(*op, a, b)
        }
    }
}

fn apply_binary(op: BinaryOp, a: f64, b: f64) -> Result<f64, EvaluationError> {
    let (v, zero_divisor) = match op {
        BinaryOp::Add => (a + b, false),
        BinaryOp::Sub => (a - b, false),
        BinaryOp::Mul => (a * b, false),
        BinaryOp::Div => (a / b, b == 0.0),
        BinaryOp::Pow => (a.powf(b), a == 0.0 && b < 0.0),
    };
    if v.is_finite() {
        return Ok(v);
    }

    let reason = if zero_divisor {
        NonFiniteReason::DivisionByZero
    } else if v.is_nan() {
        NonFiniteReason::NotARealNumber
    } else {
        NonFiniteReason::Overflow
    };
    Err(non_finite(reason))
}

fn non_finite(reason: NonFiniteReason) -> EvaluationError {
    EvaluationError::NonFiniteResult { reason }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/walk.rs"]
mod tests;
