//! sablec-par - Parser and AST
//!
//! Recursive-descent parser for Sable with one token of lookahead, plus the
//! AST it produces and the visitor infrastructure over that AST.
//!
//! # Scope-sensitivity
//!
//! Sable's grammar is context-sensitive at one point: a statement beginning
//! `Name ident` is a declaration only when `Name` resolves to a *type*
//! symbol in the scope where it appears, and `Name ident = (...)` is a
//! struct initialization only when that type is a struct. The parser
//! therefore builds the scope tree as it goes - opening child scopes for
//! function bodies, struct members, and blocks, inserting variable and
//! function symbols at their declaration sites - and consults it to steer
//! these productions. Parsing and scoping cannot be split into separate
//! passes.
//!
//! # Expressions
//!
//! Binary expressions use precedence climbing over the operator table
//! (lower numbers bind tighter):
//!
//! | Precedence | Operators |
//! |------------|-----------|
//! | 5 | `*`, `/`, `%` |
//! | 6 | `+`, `-` |
//! | 9 | `<`, `>`, `<=`, `>=` |
//! | 10 | `==`, `!=` |
//! | 14 | `&` |
//! | 15 | `\|` |
//!
//! All binary operators are left-associative; unary `-` and `!` bind
//! tighter than any binary operator; a postfix chain of `.name`, `[index]`
//! and `(args)` binds tighter still.
//!
//! # Error recovery
//!
//! Each error produces one diagnostic, then the parser advances past the
//! next `;` or closing brace and tries again. No further synchronization
//! is attempted. An unknown-punctuation token from the lexer aborts the
//! production that meets it and is reported the same way.

pub mod ast;
pub mod printer;
pub mod visitor;

mod expr;
mod items;
mod stmt;

pub use ast::{
    BinOp, Block, Expr, ExprId, ExprKind, FunctionDef, Param, Program, Stmt, StmtKind, StructDef,
    UnOp,
};
pub use printer::{print_program, AstPrinter};
pub use visitor::Visitor;

use std::rc::Rc;

use sablec_lex::{Lexer, Token, TokenKind};
use sablec_sym::{Context, PrimitiveKind, Scope, ScopeRef, Symbol, Type, WeakScope};
use sablec_util::{FrontendError, FrontendResult, Handler, Position};

/// Parses `source` into a program, reporting problems to `handler`.
///
/// The program's top-level scope is the context's root scope; symbols and
/// interned types created during the parse live in `ctx`.
pub fn parse(source: &str, ctx: &mut Context, handler: &Handler) -> Program {
    Parser::new(source, ctx, handler).parse_program()
}

/// The recursive-descent parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pub(crate) ctx: &'a mut Context,
    pub(crate) handler: &'a Handler,
    /// The scope tokens are currently being parsed in.
    scope: ScopeRef,
    /// Next expression id to hand out.
    next_expr_id: u32,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `source` positioned at the context's root
    /// scope.
    pub fn new(source: &'a str, ctx: &'a mut Context, handler: &'a Handler) -> Self {
        let scope = Rc::clone(&ctx.root);
        Self {
            lexer: Lexer::new(source),
            ctx,
            handler,
            scope,
            next_expr_id: 0,
        }
    }

    /// Parses the whole input into a [`Program`].
    pub fn parse_program(mut self) -> Program {
        let mut stmts = Vec::new();

        loop {
            // Stray semicolons at top level are skipped.
            while self.eat(TokenKind::Semi).is_some() {}

            if self.check(TokenKind::Eof) {
                break;
            }

            match self.parse_top_level() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.report(err);
                    self.recover();
                }
            }
        }

        Program {
            scope: Rc::clone(&self.ctx.root),
            stmts,
            expr_count: self.next_expr_id,
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    pub(crate) fn peek(&mut self) -> &Token {
        self.lexer.peek()
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.lexer.peek().kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        self.lexer.next()
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consumes the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consumes a token of the given kind or fails with `UnexpectedToken`
    /// (or `LexicalError` if the lexer produced an unknown token here).
    pub(crate) fn expect(&mut self, kind: TokenKind) -> FrontendResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        let token = self.peek();
        let err = if token.kind == TokenKind::None_ {
            FrontendError::LexicalError {
                lexeme: token.lexeme.clone(),
                pos: token.pos,
            }
        } else {
            FrontendError::UnexpectedToken {
                found: token.to_string(),
                pos: token.pos,
            }
        };
        Err(err)
    }

    /// Builds an `UnexpectedToken` error for the current token without
    /// consuming it.
    pub(crate) fn unexpected(&mut self) -> FrontendError {
        let token = self.peek();
        if token.kind == TokenKind::None_ {
            FrontendError::LexicalError {
                lexeme: token.lexeme.clone(),
                pos: token.pos,
            }
        } else {
            FrontendError::UnexpectedToken {
                found: token.to_string(),
                pos: token.pos,
            }
        }
    }

    // =========================================================================
    // Diagnostics and recovery
    // =========================================================================

    pub(crate) fn report(&mut self, err: FrontendError) {
        self.handler.error(err.to_string(), err.pos());
    }

    /// Advances past the next `;` or closing brace.
    pub(crate) fn recover(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::Semi | TokenKind::RBrace => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // =========================================================================
    // Scope and node plumbing
    // =========================================================================

    pub(crate) fn current_scope(&self) -> ScopeRef {
        Rc::clone(&self.scope)
    }

    pub(crate) fn weak_scope(&self) -> WeakScope {
        Rc::downgrade(&self.scope)
    }

    /// Opens a child of the current scope and enters it.
    pub(crate) fn push_scope(&mut self) -> ScopeRef {
        let child = Scope::push_child(&self.scope);
        self.scope = Rc::clone(&child);
        child
    }

    /// Leaves the current scope. The scope itself is retained; AST nodes
    /// keep referencing it.
    pub(crate) fn pop_scope(&mut self) {
        if let Some(parent) = Scope::pop(&self.scope) {
            self.scope = parent;
        }
    }

    pub(crate) fn mk_expr(&mut self, kind: ExprKind, pos: Position) -> Expr {
        let id = ExprId(self.next_expr_id);
        self.next_expr_id += 1;
        Expr {
            id,
            kind,
            scope: self.weak_scope(),
            pos,
        }
    }

    pub(crate) fn mk_stmt(&self, kind: StmtKind, pos: Position) -> Stmt {
        Stmt {
            kind,
            scope: self.weak_scope(),
            pos,
        }
    }

    /// Resolves a declared type name in the current scope, falling back to
    /// `void` when the name does not (yet) name a type. The analyzer
    /// re-resolves declared types and reports the failure; the placeholder
    /// keeps the parse going.
    pub(crate) fn resolve_type_name(&mut self, name: &str) -> Rc<Type> {
        match Scope::lookup(&self.scope, name) {
            Some(symbol) if symbol.kind() == sablec_sym::SymbolKind::Type => symbol.ty(),
            _ => self.ctx.types.primitive(PrimitiveKind::Void),
        }
    }

    /// Inserts a variable symbol for a declaration, reporting a
    /// redefinition if the name already exists in the current scope. The
    /// first definition is kept.
    pub(crate) fn declare_variable(&mut self, name: &str, ty: Rc<Type>, pos: Position) {
        let symbol = Symbol::variable(name, ty);
        if Scope::insert(&self.scope, symbol).is_err() {
            self.report(FrontendError::Redefinition {
                name: name.to_string(),
                pos,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sablec_sym::SymbolKind;

    pub(crate) fn parse_source(source: &str) -> (Program, Context, Handler) {
        let mut ctx = Context::new();
        let handler = Handler::new();
        let program = parse(source, &mut ctx, &handler);
        (program, ctx, handler)
    }

    #[test]
    fn empty_input_is_an_empty_program() {
        let (program, _ctx, handler) = parse_source("");
        assert!(program.stmts.is_empty());
        assert!(!handler.has_errors());
    }

    #[test]
    fn stray_semicolons_are_skipped() {
        let (program, _ctx, handler) = parse_source(";;;");
        assert!(program.stmts.is_empty());
        assert!(!handler.has_errors());
    }

    #[test]
    fn top_level_declaration_creates_symbol() {
        let (program, ctx, handler) = parse_source("int x;");
        assert!(!handler.has_errors());
        assert_eq!(program.stmts.len(), 1);

        let symbol = Scope::lookup(&ctx.root, "x").unwrap();
        assert_eq!(symbol.kind(), SymbolKind::Variable);
        assert_eq!(symbol.ty().mangled_name(), "int");
    }

    #[test]
    fn initialization_statement_shape() {
        let (program, _ctx, handler) = parse_source("int x = 3;");
        assert!(!handler.has_errors());

        match &program.stmts[0].kind {
            StmtKind::Initialization {
                ty_name,
                name,
                value,
            } => {
                assert_eq!(ty_name, "int");
                assert_eq!(name, "x");
                assert!(matches!(value.kind, ExprKind::IntLit(3)));
            }
            other => panic!("expected initialization, got {:?}", other),
        }
    }

    #[test]
    fn redefinition_reports_once_and_keeps_first() {
        let (_program, ctx, handler) = parse_source("int x; int x;");
        assert_eq!(handler.error_count(), 1);

        let diag = &handler.diagnostics()[0];
        // The redefined name in the second declaration sits at column 12.
        assert_eq!(diag.pos.line, 1);
        assert_eq!(diag.pos.column, 12);

        let symbol = Scope::lookup(&ctx.root, "x").unwrap();
        assert_eq!(symbol.ty().mangled_name(), "int");
    }

    #[test]
    fn free_expression_at_top_level_is_an_error() {
        let (_program, _ctx, handler) = parse_source("1 + 2;");
        assert!(handler.has_errors());
    }

    #[test]
    fn unknown_token_is_reported_and_skipped() {
        let (program, _ctx, handler) = parse_source("# int x;");
        assert!(handler.has_errors());
        // Recovery lands after the ';', so the declaration is lost but the
        // parse completes.
        assert!(program.stmts.is_empty());
    }

    #[test]
    fn recovery_resumes_after_semicolon() {
        let (program, _ctx, handler) = parse_source("int 3; int y;");
        assert!(handler.has_errors());
        assert_eq!(program.stmts.len(), 1);
        assert!(matches!(
            program.stmts[0].kind,
            StmtKind::Declaration { .. }
        ));
    }
}
