use std::fmt;

/// Convenience result type for crate APIs outside the evaluation contract.
pub type CalcResult<T> = Result<T, CalcError>;

/// Top-level error taxonomy used by configuration and front-end APIs.
#[derive(thiserror::Error, Debug)]
pub enum CalcError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when deserializing configuration data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A formula was rejected by the evaluator.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CalcError {
    /// Build a [`CalcError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CalcError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Why a formula was rejected.
///
/// Every variant is recoverable: the caller re-prompts the user. Messages never contain
/// the offending source text, only byte offsets and category names.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The input is not a syntactically valid arithmetic expression.
    #[error("parse failure at byte {offset}: {message}")]
    ParseFailure {
        /// Byte offset into the source where parsing stopped.
        offset: usize,
        /// Parser diagnostic.
        message: String,
    },

    /// The input contains a construct outside the arithmetic allow-list.
    #[error("disallowed construct at byte {offset}: {construct}")]
    DisallowedConstruct {
        /// Byte offset into the source of the rejected construct.
        offset: usize,
        /// Category of the rejected construct.
        construct: Construct,
    },

    /// Evaluation produced an infinity or NaN.
    #[error("non-finite result: {reason}")]
    NonFiniteResult {
        /// What produced the non-finite value.
        reason: NonFiniteReason,
    },

    /// Nesting depth exceeds the configured bound.
    #[error("expression nesting exceeds the maximum depth of {max_depth}")]
    TooComplex {
        /// The bound that was exceeded.
        max_depth: usize,
    },

    /// The input is longer than the configured bound.
    #[error("expression is {len} bytes long, the limit is {max}")]
    InputTooLong {
        /// Input length in bytes.
        len: usize,
        /// Configured limit in bytes.
        max: usize,
    },
}

impl EvaluationError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn disallowed(offset: usize, construct: Construct) -> Self {
        Self::DisallowedConstruct { offset, construct }
    }

    /// Stable snake_case identifier of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParseFailure { .. } => "parse_failure",
            Self::DisallowedConstruct { .. } => "disallowed_construct",
            Self::NonFiniteResult { .. } => "non_finite_result",
            Self::TooComplex { .. } => "too_complex",
            Self::InputTooLong { .. } => "input_too_long",
        }
    }

    /// Fixed message suitable for showing to the person who typed the formula.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ParseFailure { .. } => "Malformed formula",
            Self::DisallowedConstruct { .. } => "Invalid or dangerous formula",
            Self::NonFiniteResult {
                reason: NonFiniteReason::DivisionByZero,
            } => "Division by zero",
            Self::NonFiniteResult { .. } => "The result is not a finite number",
            Self::TooComplex { .. } => "Formula is nested too deeply",
            Self::InputTooLong { .. } => "Formula is too long",
        }
    }
}

/// Category of a construct rejected by the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Construct {
    /// A bare identifier.
    NameReference,
    /// A call of anything.
    FunctionCall,
    /// `.` member access.
    AttributeAccess,
    /// `[...]` indexing.
    Subscript,
    /// `==`, `<`, `in`, `is` and friends.
    Comparison,
    /// `and`, `or`, `not`.
    BooleanOperator,
    /// `x if c else y`.
    ConditionalExpression,
    /// `=`, `:=`, augmented assignment.
    Assignment,
    /// `;` or a statement keyword.
    Statement,
    /// A quoted string.
    StringLiteral,
    /// List, dict, set or tuple display.
    CollectionLiteral,
    /// `True`, `False`, `None`.
    NamedConstant,
    /// An anonymous function.
    Lambda,
    /// A generator or comprehension clause.
    Comprehension,
    /// A numeric literal with an imaginary suffix.
    ComplexLiteral,
    /// `%`.
    ModuloOperator,
    /// `//`.
    FloorDivision,
    /// `&`, `|`, `^`, `~`, `<<`, `>>`.
    BitwiseOperator,
    /// `@`.
    MatrixMultiplication,
}

impl Construct {
    /// Human-readable category name.
    pub fn describe(self) -> &'static str {
        match self {
            Self::NameReference => "name reference",
            Self::FunctionCall => "function call",
            Self::AttributeAccess => "attribute access",
            Self::Subscript => "subscript",
            Self::Comparison => "comparison",
            Self::BooleanOperator => "boolean operator",
            Self::ConditionalExpression => "conditional expression",
            Self::Assignment => "assignment",
            Self::Statement => "statement",
            Self::StringLiteral => "string literal",
            Self::CollectionLiteral => "collection literal",
            Self::NamedConstant => "named constant",
            Self::Lambda => "lambda",
            Self::Comprehension => "comprehension",
            Self::ComplexLiteral => "complex literal",
            Self::ModuloOperator => "modulo operator",
            Self::FloorDivision => "floor division operator",
            Self::BitwiseOperator => "bitwise operator",
            Self::MatrixMultiplication => "matrix multiplication operator",
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// What produced a non-finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFiniteReason {
    /// Division (or a negative power) of zero.
    DivisionByZero,
    /// The magnitude left the `f64` range.
    Overflow,
    /// The result has no real value, e.g. a fractional power of a negative base.
    NotARealNumber,
}

impl fmt::Display for NonFiniteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DivisionByZero => "division by zero",
            Self::Overflow => "magnitude out of range",
            Self::NotARealNumber => "result is not a real number",
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
