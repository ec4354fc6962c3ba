/// Errors reported by the machine
///
/// The Display text of each variant is exactly what follows " ? " in an evaluation response.
use thiserror::Error;

use crate::internals::token::Marker;

pub type ForthResult<T> = Result<T, ForthError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForthError {
    #[error("stack underflow")]
    StackUnderflow,

    #[error("return stack underflow")]
    ReturnStackUnderflow,

    #[error("undefined word: {0}")]
    UndefinedWord(String),

    /// A cell or token reached a place that has no handling for it. Unreachable unless the
    /// compiler left something behind.
    #[error("unknown token type: {0}")]
    UnknownToken(String),

    #[error("compile-only word")]
    CompileOnly,

    #[error("interpret-only word")]
    InterpretOnly,

    #[error("no name given")]
    NoNameGiven,

    #[error("unclosed {0}")]
    Unclosed(Marker),

    #[error("missing {0}")]
    Missing(Marker),

    #[error("not looping")]
    NotLooping,

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid character: {0}")]
    InvalidChar(i64),

    #[error("nesting too deep")]
    TooDeep,
}
