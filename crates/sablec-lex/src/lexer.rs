//! The Sable lexer.
//!
//! Dispatches on the first character of each token, with one method per
//! start-character family. Multi-character punctuation is matched longest
//! first; numeric literals carry their `d`/`f` suffix handling here so the
//! parser only ever sees fully classified literal kinds.

use sablec_util::Position;

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, Token, TokenKind};

/// A one-token-lookahead lexer over source text.
///
/// # Example
///
/// ```
/// use sablec_lex::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("int x = 3;");
/// assert_eq!(lexer.peek().kind, TokenKind::Ident);
/// assert_eq!(lexer.next().lexeme, "int");
/// assert_eq!(lexer.next().lexeme, "x");
/// ```
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    lookahead: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            lookahead: None,
        }
    }

    /// Returns the current token without consuming it.
    pub fn peek(&mut self) -> &Token {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lex_token());
        }
        self.lookahead.as_ref().unwrap()
    }

    /// Consumes and returns the current token.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.lex_token(),
        }
    }

    /// Lexes one token from the cursor.
    fn lex_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let pos = self.cursor.position();

        if self.cursor.is_at_end() {
            return Token::eof(pos);
        }

        let c = self.cursor.current();

        if c.is_ascii_alphabetic() {
            return self.lex_identifier(pos);
        }

        if c.is_ascii_digit() {
            return self.lex_number(pos);
        }

        match c {
            '(' => self.single(TokenKind::LParen, pos),
            ')' => self.single(TokenKind::RParen, pos),
            '{' => self.single(TokenKind::LBrace, pos),
            '}' => self.single(TokenKind::RBrace, pos),
            '[' => self.single(TokenKind::LBracket, pos),
            ']' => self.single(TokenKind::RBracket, pos),
            ',' => self.single(TokenKind::Comma, pos),
            ';' => self.single(TokenKind::Semi, pos),
            '+' => self.single(TokenKind::Plus, pos),
            '*' => self.single(TokenKind::Star, pos),
            '/' => self.single(TokenKind::Slash, pos),
            '%' => self.single(TokenKind::Percent, pos),
            '&' => self.single(TokenKind::And, pos),
            '|' => self.single(TokenKind::Or, pos),
            '=' => self.one_or_two(TokenKind::Assign, '=', TokenKind::EqEq, pos),
            '!' => self.one_or_two(TokenKind::Not, '=', TokenKind::Ne, pos),
            '<' => self.one_or_two(TokenKind::Lt, '=', TokenKind::Le, pos),
            '>' => self.one_or_two(TokenKind::Gt, '=', TokenKind::Ge, pos),
            '-' => self.one_or_two(TokenKind::Minus, '>', TokenKind::Arrow, pos),
            ':' => self.one_or_two(TokenKind::Colon, ':', TokenKind::PathSep, pos),
            '.' => self.lex_dot(pos),
            '"' => self.lex_string(pos),
            _ => {
                self.cursor.advance();
                Token::new(TokenKind::None_, c.to_string(), pos)
            }
        }
    }

    /// Skips whitespace, line comments, and block comments.
    ///
    /// An unterminated block comment silently consumes the rest of the
    /// input; the next token is then `Eof` and diagnosing the situation is
    /// left to the parser.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.cursor.current().is_whitespace() {
                self.cursor.advance();
            }

            if self.cursor.current() == '/' && self.cursor.peek(1) == '/' {
                while !self.cursor.is_at_end() && self.cursor.current() != '\n' {
                    self.cursor.advance();
                }
                continue;
            }

            if self.cursor.current() == '/' && self.cursor.peek(1) == '*' {
                self.cursor.advance();
                self.cursor.advance();
                while !self.cursor.is_at_end() {
                    if self.cursor.current() == '*' && self.cursor.peek(1) == '/' {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    self.cursor.advance();
                }
                continue;
            }

            break;
        }
    }

    /// Emits a single-character token.
    fn single(&mut self, kind: TokenKind, pos: Position) -> Token {
        let lexeme = self.cursor.current().to_string();
        self.cursor.advance();
        Token::new(kind, lexeme, pos)
    }

    /// Emits `two` if the next character is `second`, otherwise `one`.
    fn one_or_two(
        &mut self,
        one: TokenKind,
        second: char,
        two: TokenKind,
        pos: Position,
    ) -> Token {
        let first = self.cursor.current();
        self.cursor.advance();

        if self.cursor.eat(second) {
            Token::new(two, format!("{}{}", first, second), pos)
        } else {
            Token::new(one, first.to_string(), pos)
        }
    }

    /// Lexes an identifier or keyword.
    fn lex_identifier(&mut self, pos: Position) -> Token {
        let mut text = String::new();

        while self.cursor.current().is_ascii_alphanumeric() || self.cursor.current() == '_' {
            text.push(self.cursor.current());
            self.cursor.advance();
        }

        match keyword_from_ident(&text) {
            Some(kind) => Token::new(kind, text, pos),
            None => Token::new(TokenKind::Ident, text, pos),
        }
    }

    /// Lexes a numeric literal starting with a digit.
    ///
    /// `123` is an integer; `123d` / `123f` force double/float; `123.45`
    /// continues as a fraction which defaults to double unless suffixed.
    fn lex_number(&mut self, pos: Position) -> Token {
        let mut text = String::new();

        while self.cursor.current().is_ascii_digit() {
            text.push(self.cursor.current());
            self.cursor.advance();
        }

        if self.cursor.eat('d') {
            return Token::new(TokenKind::DoubleLit, text, pos);
        }

        if self.cursor.eat('f') {
            return Token::new(TokenKind::FloatLit, text, pos);
        }

        if self.cursor.current() == '.' && self.cursor.peek(1) != '.' {
            self.cursor.advance();
            text.push('.');
            return self.lex_fraction(text, pos);
        }

        Token::new(TokenKind::IntLit, text, pos)
    }

    /// Lexes the fractional part of a floating literal. `text` already
    /// holds the integer part and the dot.
    fn lex_fraction(&mut self, mut text: String, pos: Position) -> Token {
        while self.cursor.current().is_ascii_digit() {
            text.push(self.cursor.current());
            self.cursor.advance();
        }

        if self.cursor.eat('f') {
            return Token::new(TokenKind::FloatLit, text, pos);
        }

        // `d` or no suffix: fractions are doubles by default.
        self.cursor.eat('d');
        Token::new(TokenKind::DoubleLit, text, pos)
    }

    /// Lexes tokens starting with `.`: the range operator `...`, a
    /// leading-dot floating literal, or a lone attribute-access dot.
    fn lex_dot(&mut self, pos: Position) -> Token {
        self.cursor.advance();

        if self.cursor.current() == '.' {
            self.cursor.advance();
            if self.cursor.eat('.') {
                return Token::new(TokenKind::FromTo, "...", pos);
            }
            // `..` with no third dot never starts a valid token.
            return Token::new(TokenKind::None_, "..", pos);
        }

        if self.cursor.current().is_ascii_digit() {
            return self.lex_fraction(String::from("."), pos);
        }

        Token::new(TokenKind::Dot, ".", pos)
    }

    /// Lexes a string literal. The lexeme is the contents without the
    /// surrounding quotes; `\"` escapes a quote.
    fn lex_string(&mut self, pos: Position) -> Token {
        self.cursor.advance();

        let mut text = String::new();
        loop {
            if self.cursor.is_at_end() {
                // Unterminated string: surface what we saw as an unknown
                // token so the parser reports it.
                return Token::new(TokenKind::None_, text, pos);
            }

            match self.cursor.current() {
                '"' => {
                    self.cursor.advance();
                    return Token::new(TokenKind::StringLit, text, pos);
                }
                '\\' if self.cursor.peek(1) == '"' => {
                    self.cursor.advance();
                    text.push('"');
                    self.cursor.advance();
                }
                c => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lexes the whole input into (kind, lexeme) pairs, excluding Eof.
    fn lex_all(source: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let token = lexer.next();
            if token.kind == TokenKind::Eof {
                break;
            }
            out.push((token.kind, token.lexeme));
        }
        out
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex_all(source).into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("func foo for forty in int"),
            vec![
                TokenKind::Func,
                TokenKind::Ident,
                TokenKind::For,
                TokenKind::Ident,
                TokenKind::In,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn identifier_may_contain_digits_and_underscores() {
        let tokens = lex_all("abc_123 a1");
        assert_eq!(tokens[0], (TokenKind::Ident, "abc_123".to_string()));
        assert_eq!(tokens[1], (TokenKind::Ident, "a1".to_string()));
    }

    #[test]
    fn integer_literal() {
        assert_eq!(lex_all("42"), vec![(TokenKind::IntLit, "42".to_string())]);
    }

    #[test]
    fn suffixed_literals() {
        assert_eq!(lex_all("1d"), vec![(TokenKind::DoubleLit, "1".to_string())]);
        assert_eq!(lex_all("1f"), vec![(TokenKind::FloatLit, "1".to_string())]);
        assert_eq!(
            lex_all("2.5f"),
            vec![(TokenKind::FloatLit, "2.5".to_string())]
        );
        assert_eq!(
            lex_all("2.5d"),
            vec![(TokenKind::DoubleLit, "2.5".to_string())]
        );
    }

    #[test]
    fn fraction_defaults_to_double() {
        assert_eq!(
            lex_all("3.14"),
            vec![(TokenKind::DoubleLit, "3.14".to_string())]
        );
    }

    #[test]
    fn leading_dot_float() {
        assert_eq!(
            lex_all(".5"),
            vec![(TokenKind::DoubleLit, ".5".to_string())]
        );
        assert_eq!(lex_all(".5f"), vec![(TokenKind::FloatLit, ".5".to_string())]);
    }

    #[test]
    fn longest_match_operators() {
        assert_eq!(
            kinds("== = != ! <= < >= > -> - :: : ..."),
            vec![
                TokenKind::EqEq,
                TokenKind::Assign,
                TokenKind::Ne,
                TokenKind::Not,
                TokenKind::Le,
                TokenKind::Lt,
                TokenKind::Ge,
                TokenKind::Gt,
                TokenKind::Arrow,
                TokenKind::Minus,
                TokenKind::PathSep,
                TokenKind::Colon,
                TokenKind::FromTo,
            ]
        );
    }

    #[test]
    fn range_between_integers() {
        assert_eq!(
            kinds("0 ... 10"),
            vec![TokenKind::IntLit, TokenKind::FromTo, TokenKind::IntLit]
        );
    }

    #[test]
    fn two_dots_is_unknown() {
        let tokens = lex_all("..");
        assert_eq!(tokens, vec![(TokenKind::None_, "..".to_string())]);
    }

    #[test]
    fn unknown_punctuation_is_none_token() {
        let tokens = lex_all("#");
        assert_eq!(tokens, vec![(TokenKind::None_, "#".to_string())]);
    }

    #[test]
    fn line_comments_are_skipped() {
        assert_eq!(
            kinds("a // comment\nb"),
            vec![TokenKind::Ident, TokenKind::Ident]
        );
    }

    #[test]
    fn block_comments_are_skipped() {
        assert_eq!(
            kinds("a /* one\ntwo */ b"),
            vec![TokenKind::Ident, TokenKind::Ident]
        );
    }

    #[test]
    fn unterminated_block_comment_reads_to_eof() {
        let mut lexer = Lexer::new("a /* never closed");
        assert_eq!(lexer.next().kind, TokenKind::Ident);
        assert_eq!(lexer.next().kind, TokenKind::Eof);
    }

    #[test]
    fn eof_is_idempotent() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next().kind, TokenKind::Eof);
        assert_eq!(lexer.next().kind, TokenKind::Eof);
        assert_eq!(lexer.peek().kind, TokenKind::Eof);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("x y");
        assert_eq!(lexer.peek().lexeme, "x");
        assert_eq!(lexer.peek().lexeme, "x");
        assert_eq!(lexer.next().lexeme, "x");
        assert_eq!(lexer.next().lexeme, "y");
    }

    #[test]
    fn positions_are_stamped_at_token_start() {
        let mut lexer = Lexer::new("ab\n  cd");

        let a = lexer.next();
        assert_eq!(a.pos, Position::new(1, 1, 0));

        let c = lexer.next();
        assert_eq!(c.pos, Position::new(2, 3, 5));
    }

    #[test]
    fn string_literal() {
        assert_eq!(
            lex_all(r#""hello""#),
            vec![(TokenKind::StringLit, "hello".to_string())]
        );
        assert_eq!(
            lex_all(r#""say \"hi\"""#),
            vec![(TokenKind::StringLit, "say \"hi\"".to_string())]
        );
    }

    #[test]
    fn unterminated_string_is_unknown_token() {
        let tokens = lex_all("\"oops");
        assert_eq!(tokens[0].0, TokenKind::None_);
    }

    #[test]
    fn lexing_is_deterministic() {
        let source = "func f(int a) -> int { return a + 1; } // trailing";

        let collect = |src: &str| {
            let mut lexer = Lexer::new(src);
            let mut tokens = Vec::new();
            loop {
                let token = lexer.next();
                let done = token.kind == TokenKind::Eof;
                tokens.push(token);
                if done {
                    break;
                }
            }
            tokens
        };

        assert_eq!(collect(source), collect(source));
    }

    #[test]
    fn whitespace_advances_positions() {
        let mut lexer = Lexer::new("   x");
        let x = lexer.next();
        assert_eq!(x.pos, Position::new(1, 4, 3));
    }
}
