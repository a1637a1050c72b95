//! Evaluation errors.
//!
//! Every failure inside the tokenizer, parser, evaluator or operation executor
//! is reported as an [`EvalError`].  Errors raised while collapsing a nested
//! call unit travel back to [`evaluate_statement`](super::evaluate_statement)
//! unchanged; no partial result is ever produced.

use thiserror::Error;

/// Result alias used throughout the `script` module.
pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Two operations share a spelling, or a directive is malformed.
    #[error("configuration conflict: {0}")]
    ConfigConflict(String),

    /// An operation was written in a call shape the active profile forbids.
    #[error("syntax violation: {0}")]
    SyntaxViolation(String),

    #[error("{op} expects {expected} argument(s), got {found}")]
    ArityMismatch {
        op: String,
        expected: usize,
        found: usize,
    },

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("unbalanced grouping: {0}")]
    UnbalancedGrouping(String),

    #[error("invalid token '{0}'")]
    InvalidToken(String),

    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    #[error("division by zero")]
    DivisionByZero,

    /// Nested call units exceeded the configured depth budget.
    #[error("expression too complex: nesting exceeds {0} levels")]
    ExpressionTooComplex(usize),

    /// The host could not supply a value for `input()`.
    #[error("input error: {0}")]
    Input(String),

    /// The host could not report an `output(x)` value.
    #[error("output error: {0}")]
    Output(String),
}
