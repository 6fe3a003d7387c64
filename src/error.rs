//! Error types for the calculator core.

use thiserror::Error;

/// Errors produced while building or evaluating an expression.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    /// The expression is malformed: unbalanced parentheses, a dangling
    /// operator, an empty operand or a character outside the grammar.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The expression is well formed but has no numeric value
    /// (division by zero, logarithm of a non-positive number, ...).
    #[error("domain error: {0}")]
    Domain(String),

    /// The key press had no valid operand to act on and was ignored.
    #[error("input rejected: {0}")]
    InputRejected(&'static str),
}

impl CalcError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Whether the error should be surfaced on the display.
    ///
    /// Rejected input is silently ignored; everything else shows the error sentinel.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::InputRejected(_))
    }
}

/// Convenience alias used throughout the calculator core.
pub type CalcResult<T> = Result<T, CalcError>;
