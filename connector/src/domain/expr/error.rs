//! Expression parse errors
//!
//! Parse errors are the only errors the expression language produces.
//! Evaluation is total: a missing path or a type mismatch yields an absent
//! result, never an error, so a bad tenant expression can reject at
//! configuration time but can never fail a running batch.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("Empty expression")]
    Empty,

    #[error("Unexpected character '{0}' in expression")]
    UnexpectedChar(char),

    #[error("Unterminated string literal")]
    UnterminatedString,

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("Unknown function: ${0}")]
    UnknownFunction(String),

    #[error("Trailing input after expression")]
    TrailingInput,
}
