use crate::expression::ast::Expr;
use crate::expression::parser::parse_expr;
use crate::expression::walk::eval_expr;
use crate::foundation::config::EvalConfig;
use crate::foundation::error::{CalcResult, EvaluationError};
use std::fmt;

/// A parsed formula: an operation tree that contains only numeric literals and the allowed
/// operators.
///
/// `Display` renders it in canonical form, which is safe to echo back to the user in place of
/// the raw input. `Serialize` emits the tree as tagged JSON.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Formula {
    tree: Expr,
    depth: usize,
    #[serde(skip)]
    max_depth: usize,
}

impl Formula {
    /// Evaluate the tree to a finite number.
    pub fn eval(&self) -> Result<f64, EvaluationError> {
        eval_expr(&self.tree, self.max_depth)
    }

    /// Operator depth of the tree (a lone literal has depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt(f)
    }
}

/// Stateless evaluator from formula text to a number.
///
/// Holds only its limits, so one instance can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Build an evaluator after validating `config`.
    pub fn new(config: EvalConfig) -> CalcResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Limits in effect.
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Parse `source` into a [`Formula`] without evaluating it.
    #[tracing::instrument(level = "debug", skip(self, source), fields(len = source.len()))]
    pub fn parse(&self, source: &str) -> Result<Formula, EvaluationError> {
        if let Some(max) = self.config.max_input_len
            && source.len() > max
        {
            return Err(rejected(EvaluationError::InputTooLong {
                len: source.len(),
                max,
            }));
        }

        let parsed = parse_expr(source, self.config.max_depth).map_err(rejected)?;
        Ok(Formula {
            tree: parsed.expr,
            depth: parsed.depth,
            max_depth: self.config.max_depth,
        })
    }

    /// Parse and evaluate `source`.
    #[tracing::instrument(level = "debug", skip(self, source), fields(len = source.len()))]
    pub fn evaluate(&self, source: &str) -> Result<f64, EvaluationError> {
        let formula = self.parse(source)?;
        let value = formula.eval().map_err(rejected)?;
        tracing::trace!(depth = formula.depth(), "formula evaluated");
        Ok(value)
    }
}

/// Evaluate `expression` with the default limits.
///
/// ```
/// assert_eq!(safecalc::evaluate("(2 + 3) * 4").unwrap(), 20.0);
/// assert!(safecalc::evaluate("__import__('os').system('ls')").is_err());
/// ```
pub fn evaluate(expression: &str) -> Result<f64, EvaluationError> {
    Evaluator::default().evaluate(expression)
}

fn rejected(err: EvaluationError) -> EvaluationError {
    tracing::debug!(code = err.code(), %err, "formula rejected");
    err
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
