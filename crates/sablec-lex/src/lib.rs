//! sablec-lex - Lexical Analyzer
//!
//! Transforms Sable source text into a stream of tokens. The lexer is the
//! demand-driven end of the pipeline: the parser pulls one token at a time
//! through a one-token lookahead window ([`Lexer::peek`] / [`Lexer::next`]).
//!
//! # Behavior
//!
//! - Whitespace and comments (`// ...` and `/* ... */`) are skipped;
//!   positions still advance through them.
//! - Keywords are recognized by exact match against the reserved-word
//!   table; everything else matching `[A-Za-z][A-Za-z0-9_]*` is an
//!   identifier.
//! - Numeric literals are integers by default; a `d` or `f` suffix or a
//!   fractional part makes them double/float literals (fractions default
//!   to double). A leading `.` followed by digits is a floating literal.
//! - Punctuation is matched longest-first: `==`, `!=`, `<=`, `>=`, `->`,
//!   `::`, `...` win over their prefixes.
//!
//! # Failure semantics
//!
//! The lexer never fails. Malformed input becomes a [`TokenKind::None_`]
//! token carrying the offending lexeme and its position; deciding that this
//! is an error is the parser's job. End of input yields [`TokenKind::Eof`]
//! tokens forever.

pub mod cursor;
pub mod lexer;
pub mod token;

mod edge_cases;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};
