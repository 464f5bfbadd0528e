//! safecalc evaluates user-typed arithmetic formulas without general code execution.
//!
//! Input text is lexed and parsed by a dedicated arithmetic grammar into a closed operation
//! tree (numeric literals, `+ - * / **`, unary `+`/`-`), then walked once to produce an `f64`.
//! Anything else a user might type (names, calls, attribute access, strings, comparisons,
//! statements) is rejected while parsing, so no tree outside that set ever exists.
//!
//! The key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Allow-list only**: identifiers of every spelling are rejected; there is no list of
//!   "dangerous" names to keep up to date.
//! - **Bounded**: nesting depth is capped ([`EvalConfig::max_depth`]), so adversarial input
//!   cannot exhaust the stack.
//! - **Finite results**: infinities and NaN surface as [`EvaluationError::NonFiniteResult`].
//! - **Pure**: evaluation has no side effects and no shared state.
//!
//! # Getting started
//!
//! ```
//! use safecalc::{EvalConfig, Evaluator, EvaluationError};
//!
//! assert_eq!(safecalc::evaluate("10 + 5 * 2").unwrap(), 20.0);
//!
//! let ev = Evaluator::new(EvalConfig { max_depth: 16, ..EvalConfig::default() }).unwrap();
//! let formula = ev.parse("(1+2)*3").unwrap();
//! assert_eq!(formula.to_string(), "(1 + 2) * 3");
//! assert_eq!(formula.eval().unwrap(), 9.0);
//!
//! let err = ev.evaluate("os.system('ls')").unwrap_err();
//! assert!(matches!(err, EvaluationError::DisallowedConstruct { .. }));
//! assert_eq!(err.user_message(), "Invalid or dangerous formula");
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod eval;
mod expression;
mod foundation;

pub use eval::evaluator::{Evaluator, Formula, evaluate};
pub use foundation::config::{DEFAULT_MAX_DEPTH, EvalConfig, MAX_DEPTH_LIMIT};
pub use foundation::error::{CalcError, CalcResult, Construct, EvaluationError, NonFiniteReason};
