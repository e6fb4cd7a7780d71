//! Front-end error taxonomy.
//!
//! One variant per recoverable error kind the pipeline can surface. Phases
//! return these through `Result` and convert them to diagnostics where the
//! source position is known.

use thiserror::Error;

use crate::pos::Position;

/// A recoverable front-end error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrontendError {
    /// The lexer produced an unknown-punctuation token.
    #[error("unknown token '{lexeme}'")]
    LexicalError { lexeme: String, pos: Position },

    /// The parser met a token it has no production for.
    #[error("unexpected token: {found}")]
    UnexpectedToken { found: String, pos: Position },

    /// A name was declared twice in the same scope.
    #[error("redefinition of '{name}'")]
    Redefinition { name: String, pos: Position },

    /// A name could not be resolved in any enclosing scope.
    #[error("undefined name '{name}'")]
    Undefined { name: String, pos: Position },

    /// Two types met where one was required.
    #[error("incompatible types: {lhs} and {rhs}")]
    IncompatibleTypes {
        lhs: String,
        rhs: String,
        pos: Position,
    },

    /// The left-hand side of an assignment is not assignable.
    #[error("expression is not assignable")]
    InvalidAssignment { pos: Position },

    /// A call passed the wrong number of arguments.
    #[error("call expects {expected} argument(s), found {found}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        pos: Position,
    },
}

impl FrontendError {
    /// The position the error points at.
    pub fn pos(&self) -> Position {
        match self {
            FrontendError::LexicalError { pos, .. }
            | FrontendError::UnexpectedToken { pos, .. }
            | FrontendError::Redefinition { pos, .. }
            | FrontendError::Undefined { pos, .. }
            | FrontendError::IncompatibleTypes { pos, .. }
            | FrontendError::InvalidAssignment { pos }
            | FrontendError::ArityMismatch { pos, .. } => *pos,
        }
    }
}

/// Result alias for front-end operations.
pub type FrontendResult<T> = std::result::Result<T, FrontendError>;
