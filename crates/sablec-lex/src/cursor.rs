//! Character cursor for traversing source text.
//!
//! The cursor maintains position state while the lexer walks the input one
//! character at a time. Lexing decisions only inspect 7-bit ASCII classes,
//! but the cursor steps over UTF-8 sequences correctly so multi-byte text
//! inside comments or unknown tokens cannot desynchronize it.

use sablec_util::Position;

/// End-of-input sentinel returned by [`Cursor::current`] past the end.
pub const EOF_CHAR: char = '\0';

/// A cursor over source text with line/column/offset tracking.
///
/// # Example
///
/// ```
/// use sablec_lex::cursor::Cursor;
///
/// let mut cursor = Cursor::new("ab");
/// assert_eq!(cursor.current(), 'a');
/// cursor.advance();
/// assert_eq!(cursor.current(), 'b');
/// ```
pub struct Cursor<'a> {
    /// The source text being traversed.
    source: &'a str,

    /// Current byte position in the source.
    byte_pos: usize,

    /// Current line number (1-based).
    line: u32,

    /// Current column number (1-based, in characters).
    column: u32,

    /// Characters consumed so far.
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            byte_pos: 0,
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// The character under the cursor, or [`EOF_CHAR`] at the end.
    pub fn current(&self) -> char {
        self.source[self.byte_pos..].chars().next().unwrap_or(EOF_CHAR)
    }

    /// The character `n` characters ahead of the cursor, without advancing.
    pub fn peek(&self, n: usize) -> char {
        self.source[self.byte_pos..].chars().nth(n).unwrap_or(EOF_CHAR)
    }

    /// True once the cursor has consumed the whole input.
    pub fn is_at_end(&self) -> bool {
        self.byte_pos >= self.source.len()
    }

    /// Consumes one character, updating line/column/offset accounting.
    pub fn advance(&mut self) {
        let Some(c) = self.source[self.byte_pos..].chars().next() else {
            return;
        };

        self.byte_pos += c.len_utf8();
        self.offset += 1;

        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Consumes the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.current() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// The position of the character currently under the cursor.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lines_and_columns() {
        let mut cursor = Cursor::new("ab\ncd");

        assert_eq!(cursor.position(), Position::new(1, 1, 0));
        cursor.advance(); // a
        cursor.advance(); // b
        assert_eq!(cursor.position(), Position::new(1, 3, 2));
        cursor.advance(); // newline
        assert_eq!(cursor.position(), Position::new(2, 1, 3));
        cursor.advance(); // c
        assert_eq!(cursor.position(), Position::new(2, 2, 4));
    }

    #[test]
    fn peek_does_not_consume() {
        let cursor = Cursor::new("xyz");
        assert_eq!(cursor.peek(0), 'x');
        assert_eq!(cursor.peek(1), 'y');
        assert_eq!(cursor.peek(2), 'z');
        assert_eq!(cursor.peek(3), EOF_CHAR);
        assert_eq!(cursor.position().offset, 0);
    }

    #[test]
    fn end_is_idempotent() {
        let mut cursor = Cursor::new("a");
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), EOF_CHAR);

        let pos = cursor.position();
        cursor.advance();
        assert_eq!(cursor.position(), pos);
    }

    #[test]
    fn steps_over_multibyte_sequences() {
        let mut cursor = Cursor::new("é!");
        cursor.advance();
        assert_eq!(cursor.current(), '!');
        assert_eq!(cursor.position().offset, 1);
    }
}
