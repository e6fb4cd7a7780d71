//! Expression parsing.
//!
//! Binary expressions are parsed by precedence climbing over the operator
//! table in [`BinOp::precedence`] (lower numbers bind tighter, all
//! operators left-associative). Unary operators bind tighter than any
//! binary operator, and the postfix chain (`.name`, `[index]`, `(args)`)
//! binds tightest of all. A trailing `...` builds a range over two binary
//! expressions and binds loosest.

use sablec_lex::TokenKind;
use sablec_util::{FrontendError, FrontendResult};

use crate::ast::{BinOp, Expr, ExprKind, UnOp};
use crate::Parser;

/// Maps an operator token to its binary operator, if it is one.
fn bin_op_from_token(kind: TokenKind) -> Option<BinOp> {
    let op = match kind {
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Mod,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::Le => BinOp::Le,
        TokenKind::Ge => BinOp::Ge,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::Ne => BinOp::Ne,
        TokenKind::And => BinOp::And,
        TokenKind::Or => BinOp::Or,
        _ => return None,
    };
    Some(op)
}

/// Binding power for precedence climbing. [`BinOp::precedence`] counts
/// down (5 binds tighter than 15); climbing wants the opposite, so invert.
fn binding_power(op: BinOp) -> u8 {
    20 - op.precedence()
}

impl<'a> Parser<'a> {
    /// Parses a full expression, including a trailing range.
    pub(crate) fn parse_expr(&mut self) -> FrontendResult<Expr> {
        let start = self.parse_binary_expr()?;

        if self.eat(TokenKind::FromTo).is_some() {
            let end = self.parse_binary_expr()?;
            let pos = start.pos;
            return Ok(self.mk_expr(
                ExprKind::Range {
                    start: Box::new(start),
                    end: Some(Box::new(end)),
                },
                pos,
            ));
        }

        Ok(start)
    }

    /// Parses a binary expression (everything tighter than `...`).
    pub(crate) fn parse_binary_expr(&mut self) -> FrontendResult<Expr> {
        let lhs = self.parse_unary_expr()?;
        self.parse_binary_rhs(lhs, 0)
    }

    /// Precedence-climbing loop. Consumes operators whose binding power is
    /// at least `min_bp`; left associativity comes from recursing with
    /// `bp + 1`.
    fn parse_binary_rhs(&mut self, mut lhs: Expr, min_bp: u8) -> FrontendResult<Expr> {
        loop {
            let Some(op) = bin_op_from_token(self.peek_kind()) else {
                return Ok(lhs);
            };

            let bp = binding_power(op);
            if bp < min_bp {
                return Ok(lhs);
            }

            self.advance();
            let rhs_operand = self.parse_unary_expr()?;
            let rhs = self.parse_binary_rhs(rhs_operand, bp + 1)?;

            let pos = lhs.pos;
            lhs = self.mk_expr(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                pos,
            );
        }
    }

    /// Parses unary `-` and `!`, which bind tighter than any binary
    /// operator.
    fn parse_unary_expr(&mut self) -> FrontendResult<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Not => Some(UnOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            let token = self.advance();
            let operand = self.parse_unary_expr()?;
            return Ok(self.mk_expr(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                token.pos,
            ));
        }

        self.parse_postfix_expr()
    }

    /// Parses a primary expression followed by its postfix chain:
    /// attribute access, array access, and calls, composing left to right.
    fn parse_postfix_expr(&mut self) -> FrontendResult<Expr> {
        let mut expr = self.parse_primary_expr()?;

        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect(TokenKind::Ident)?.lexeme;
                    let pos = expr.pos;
                    expr = self.mk_expr(
                        ExprKind::Attribute {
                            base: Box::new(expr),
                            field,
                        },
                        pos,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    let pos = expr.pos;
                    expr = self.mk_expr(
                        ExprKind::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        pos,
                    );
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_call_args()?;
                    let pos = expr.pos;
                    expr = self.mk_expr(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        pos,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Parses the arguments of a call; the opening parenthesis is already
    /// consumed.
    fn parse_call_args(&mut self) -> FrontendResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.eat(TokenKind::RParen).is_some() {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// Parses a primary expression: literal, identifier, parenthesized
    /// group, or array literal.
    fn parse_primary_expr(&mut self) -> FrontendResult<Expr> {
        match self.peek_kind() {
            TokenKind::IntLit => {
                let token = self.advance();
                let value: i64 =
                    token
                        .lexeme
                        .parse()
                        .map_err(|_| FrontendError::UnexpectedToken {
                            found: format!("'{}'", token.lexeme),
                            pos: token.pos,
                        })?;
                Ok(self.mk_expr(ExprKind::IntLit(value), token.pos))
            }
            TokenKind::FloatLit => {
                let token = self.advance();
                let value: f32 =
                    token
                        .lexeme
                        .parse()
                        .map_err(|_| FrontendError::UnexpectedToken {
                            found: format!("'{}'", token.lexeme),
                            pos: token.pos,
                        })?;
                Ok(self.mk_expr(ExprKind::FloatLit(value), token.pos))
            }
            TokenKind::DoubleLit => {
                let token = self.advance();
                let value: f64 =
                    token
                        .lexeme
                        .parse()
                        .map_err(|_| FrontendError::UnexpectedToken {
                            found: format!("'{}'", token.lexeme),
                            pos: token.pos,
                        })?;
                Ok(self.mk_expr(ExprKind::DoubleLit(value), token.pos))
            }
            TokenKind::StringLit => {
                let token = self.advance();
                Ok(self.mk_expr(ExprKind::StringLit(token.lexeme), token.pos))
            }
            TokenKind::True => {
                let token = self.advance();
                Ok(self.mk_expr(ExprKind::BoolLit(true), token.pos))
            }
            TokenKind::False => {
                let token = self.advance();
                Ok(self.mk_expr(ExprKind::BoolLit(false), token.pos))
            }
            TokenKind::Ident => {
                let token = self.advance();
                Ok(self.mk_expr(ExprKind::Ident(token.lexeme), token.pos))
            }
            TokenKind::LParen => self.parse_paren_or_arg_list(),
            TokenKind::LBrace => self.parse_array_literal(),
            _ => Err(self.unexpected()),
        }
    }

    /// Parses an array initializer value group: either a parenthesized
    /// argument list or a braced array literal.
    pub(crate) fn parse_array_initializer(&mut self) -> FrontendResult<Expr> {
        match self.peek_kind() {
            TokenKind::LParen => self.parse_paren_or_arg_list(),
            TokenKind::LBrace => self.parse_array_literal(),
            _ => Err(self.unexpected()),
        }
    }

    /// Parses `( expr )` as a parenthesized expression or `( a, b, ... )`
    /// as an argument list. The distinction is the comma; `()` is an empty
    /// argument list.
    fn parse_paren_or_arg_list(&mut self) -> FrontendResult<Expr> {
        let open = self.expect(TokenKind::LParen)?;

        if self.eat(TokenKind::RParen).is_some() {
            return Ok(self.mk_expr(ExprKind::ArgList(Vec::new()), open.pos));
        }

        let first = self.parse_expr()?;

        if self.check(TokenKind::Comma) {
            let mut elems = vec![first];
            while self.eat(TokenKind::Comma).is_some() {
                elems.push(self.parse_expr()?);
            }
            self.expect(TokenKind::RParen)?;
            return Ok(self.mk_expr(ExprKind::ArgList(elems), open.pos));
        }

        self.expect(TokenKind::RParen)?;
        Ok(self.mk_expr(ExprKind::Paren(Box::new(first)), open.pos))
    }

    /// Parses `{ e1, e2, ... }`.
    fn parse_array_literal(&mut self) -> FrontendResult<Expr> {
        let open = self.expect(TokenKind::LBrace)?;

        let mut values = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                values.push(self.parse_expr()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(self.mk_expr(ExprKind::ArrayLit(values), open.pos))
    }
}
