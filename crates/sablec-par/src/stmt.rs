//! Statement parsing inside function bodies.
//!
//! Bodies accept everything the declaration family offers plus assignment,
//! expression statements, `if`/`else`, range `for`, `return`, and nested
//! blocks.

use sablec_lex::TokenKind;
use sablec_sym::Scope;
use sablec_util::FrontendResult;

use crate::ast::{Block, Stmt, StmtKind};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses a braced block, giving it its own child scope.
    pub(crate) fn parse_block(&mut self) -> FrontendResult<Block> {
        let brace = self.expect(TokenKind::LBrace)?;
        let scope = self.push_scope();

        let mut stmts = Vec::new();
        loop {
            while self.eat(TokenKind::Semi).is_some() {}

            if self.check(TokenKind::RBrace) || self.check(TokenKind::Eof) {
                break;
            }

            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.report(err);
                    self.recover();
                }
            }
        }

        let close = self.expect(TokenKind::RBrace);
        self.pop_scope();
        close?;

        Ok(Block {
            stmts,
            scope: std::rc::Rc::downgrade(&scope),
            pos: brace.pos,
        })
    }

    /// Parses one statement in body position.
    pub(crate) fn parse_stmt(&mut self) -> FrontendResult<Stmt> {
        match self.peek_kind() {
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let pos = block.pos;
                Ok(self.mk_stmt(StmtKind::Block(block), pos))
            }
            TokenKind::Ident => {
                // `Type name ...` is a declaration exactly when the leading
                // identifier names a type here; otherwise the statement
                // starts an expression.
                let is_type = {
                    let name = self.peek().lexeme.clone();
                    Scope::resolves_to_type(&self.current_scope(), &name)
                };

                if is_type {
                    let ty_token = self.advance();
                    self.parse_declaration_like(ty_token.lexeme, ty_token.pos)
                } else {
                    self.parse_expr_or_assignment()
                }
            }
            _ => self.parse_expr_or_assignment(),
        }
    }

    /// Parses `expr ;` or `target = value ;`.
    ///
    /// Whether the target is actually assignable (identifier, attribute
    /// access, or array access) is the analyzer's check; the parser accepts
    /// any expression on the left so the error can carry a type-aware
    /// message.
    fn parse_expr_or_assignment(&mut self) -> FrontendResult<Stmt> {
        let expr = self.parse_expr()?;
        let pos = expr.pos;

        if self.eat(TokenKind::Assign).is_some() {
            let value = self.parse_expr()?;
            self.expect(TokenKind::Semi)?;
            return Ok(self.mk_stmt(
                StmtKind::Assignment {
                    target: expr,
                    value,
                },
                pos,
            ));
        }

        self.expect(TokenKind::Semi)?;
        Ok(self.mk_stmt(StmtKind::ExprStmt(expr), pos))
    }

    /// Parses `if cond { ... }` with an optional `else { ... }`.
    fn parse_if(&mut self) -> FrontendResult<Stmt> {
        let if_token = self.expect(TokenKind::If)?;
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;

        let else_block = if self.eat(TokenKind::Else).is_some() {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(self.mk_stmt(
            StmtKind::If {
                cond,
                then_block,
                else_block,
            },
            if_token.pos,
        ))
    }

    /// Parses `for iterator in range { ... }`.
    ///
    /// The body block's scope is where the analyzer later inserts the
    /// iterator variable, once the range's element type is known.
    fn parse_for(&mut self) -> FrontendResult<Stmt> {
        let for_token = self.expect(TokenKind::For)?;
        let iterator = self.expect(TokenKind::Ident)?.lexeme;
        self.expect(TokenKind::In)?;
        let range = self.parse_expr()?;
        let body = self.parse_block()?;

        Ok(self.mk_stmt(
            StmtKind::For {
                iterator,
                range,
                body,
            },
            for_token.pos,
        ))
    }

    /// Parses `return ;` or `return expr ;`.
    fn parse_return(&mut self) -> FrontendResult<Stmt> {
        let return_token = self.expect(TokenKind::Return)?;

        let expr = if self.check(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        self.expect(TokenKind::Semi)?;
        Ok(self.mk_stmt(StmtKind::Return(expr), return_token.pos))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ExprKind, StmtKind};
    use crate::tests::parse_source;

    /// Parses a function whose body is `body` and returns its statements.
    /// The returned `Context` must be kept alive by the caller for as long
    /// as any scope reachable from the statements is inspected, since
    /// scopes are only weakly referenced from the AST.
    fn parse_body(body: &str) -> (Vec<crate::ast::Stmt>, sablec_util::Handler, crate::Context) {
        let source = format!("func test() -> void {{ {} }}", body);
        let (mut program, ctx, handler) = parse_source(&source);

        let StmtKind::FunctionDef(func) = program.stmts.remove(0).kind else {
            panic!("expected function definition");
        };
        (func.body.stmts, handler, ctx)
    }

    #[test]
    fn if_with_else() {
        let (stmts, handler, _ctx) = parse_body("if x < 3 { return; } else { return; }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let StmtKind::If {
            cond, else_block, ..
        } = &stmts[0].kind
        else {
            panic!("expected if");
        };
        assert!(matches!(cond.kind, ExprKind::Binary { .. }));
        assert!(else_block.is_some());
    }

    #[test]
    fn for_over_range() {
        let (stmts, handler, _ctx) = parse_body("for i in 0 ... 10 { }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let StmtKind::For {
            iterator, range, ..
        } = &stmts[0].kind
        else {
            panic!("expected for");
        };
        assert_eq!(iterator, "i");
        assert!(matches!(range.kind, ExprKind::Range { .. }));
    }

    #[test]
    fn return_with_and_without_value() {
        let (stmts, handler, _ctx) = parse_body("return 1; return;");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert!(matches!(stmts[0].kind, StmtKind::Return(Some(_))));
        assert!(matches!(stmts[1].kind, StmtKind::Return(None)));
    }

    #[test]
    fn assignment_and_expression_statement() {
        let (stmts, handler, _ctx) = parse_body("int x; x = 3; x + 1;");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert!(matches!(stmts[0].kind, StmtKind::Declaration { .. }));
        assert!(matches!(stmts[1].kind, StmtKind::Assignment { .. }));
        assert!(matches!(stmts[2].kind, StmtKind::ExprStmt(_)));
    }

    #[test]
    fn local_declaration_requires_type_symbol() {
        // `y` is not a type, so `y z;` cannot be a declaration; it parses
        // as an expression statement and fails at `z`.
        let (_stmts, handler, _ctx) = parse_body("int y; y z;");
        assert!(handler.has_errors());
    }

    #[test]
    fn nested_block_opens_scope() {
        let (stmts, handler, _ctx) = parse_body("{ int inner; }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let StmtKind::Block(block) = &stmts[0].kind else {
            panic!("expected block");
        };
        let scope = block.scope.upgrade().unwrap();
        assert!(sablec_sym::Scope::lookup_local(&scope, "inner").is_some());
    }

    #[test]
    fn error_in_statement_recovers_to_next_statement() {
        let (stmts, handler, _ctx) = parse_body("int x = ; int y;");
        assert!(handler.has_errors());
        // The bad initialization is dropped; the following declaration
        // still parses.
        assert!(stmts
            .iter()
            .any(|s| matches!(&s.kind, StmtKind::Declaration { name, .. } if name == "y")));
    }

    #[test]
    fn shadowing_in_inner_scope_is_allowed() {
        let (_stmts, handler, _ctx) = parse_body("int x; { double x; }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
    }
}
