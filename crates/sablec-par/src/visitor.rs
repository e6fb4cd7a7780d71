//! AST traversal.
//!
//! [`Visitor`] is the only recognized extension point for walking the tree:
//! one method per concrete node variant, with default implementations that
//! walk children in declaration order (left-to-right for operands and
//! arguments, top-to-bottom for statements). Nodes dispatch to the matching
//! method through `accept`, so a visitor only overrides the variants it
//! cares about.
//!
//! Visitors receive `&mut` nodes: the semantic analyzer rewrites the tree
//! in place to install implicit casts, and the method extractor restructures
//! struct definitions. Read-only visitors like the printer simply never
//! mutate.

use crate::ast::{Block, Expr, ExprKind, FunctionDef, Program, Stmt, StmtKind, StructDef};

/// One visit method per AST variant.
///
/// Defaults walk children; leaf variants default to doing nothing.
pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }

    fn visit_block(&mut self, block: &mut Block) {
        walk_block(self, block);
    }

    // Expressions

    fn visit_int_lit(&mut self, expr: &mut Expr) {
        let _ = expr;
    }

    fn visit_float_lit(&mut self, expr: &mut Expr) {
        let _ = expr;
    }

    fn visit_double_lit(&mut self, expr: &mut Expr) {
        let _ = expr;
    }

    fn visit_bool_lit(&mut self, expr: &mut Expr) {
        let _ = expr;
    }

    fn visit_string_lit(&mut self, expr: &mut Expr) {
        let _ = expr;
    }

    fn visit_ident_expr(&mut self, expr: &mut Expr) {
        let _ = expr;
    }

    fn visit_paren_expr(&mut self, expr: &mut Expr) {
        walk_paren_expr(self, expr);
    }

    fn visit_unary_expr(&mut self, expr: &mut Expr) {
        walk_unary_expr(self, expr);
    }

    fn visit_binary_expr(&mut self, expr: &mut Expr) {
        walk_binary_expr(self, expr);
    }

    fn visit_range_expr(&mut self, expr: &mut Expr) {
        walk_range_expr(self, expr);
    }

    fn visit_arg_list(&mut self, expr: &mut Expr) {
        walk_arg_list(self, expr);
    }

    fn visit_array_lit(&mut self, expr: &mut Expr) {
        walk_array_lit(self, expr);
    }

    fn visit_attribute_expr(&mut self, expr: &mut Expr) {
        walk_attribute_expr(self, expr);
    }

    fn visit_index_expr(&mut self, expr: &mut Expr) {
        walk_index_expr(self, expr);
    }

    fn visit_call_expr(&mut self, expr: &mut Expr) {
        walk_call_expr(self, expr);
    }

    fn visit_cast_expr(&mut self, expr: &mut Expr) {
        walk_cast_expr(self, expr);
    }

    // Statements

    fn visit_declaration(&mut self, stmt: &mut Stmt) {
        let _ = stmt;
    }

    fn visit_array_declaration(&mut self, stmt: &mut Stmt) {
        let _ = stmt;
    }

    fn visit_initialization(&mut self, stmt: &mut Stmt) {
        walk_initialization(self, stmt);
    }

    fn visit_array_initialization(&mut self, stmt: &mut Stmt) {
        walk_array_initialization(self, stmt);
    }

    fn visit_struct_initialization(&mut self, stmt: &mut Stmt) {
        walk_struct_initialization(self, stmt);
    }

    fn visit_assignment(&mut self, stmt: &mut Stmt) {
        walk_assignment(self, stmt);
    }

    fn visit_expr_stmt(&mut self, stmt: &mut Stmt) {
        walk_expr_stmt(self, stmt);
    }

    fn visit_if(&mut self, stmt: &mut Stmt) {
        walk_if(self, stmt);
    }

    fn visit_for(&mut self, stmt: &mut Stmt) {
        walk_for(self, stmt);
    }

    fn visit_return(&mut self, stmt: &mut Stmt) {
        walk_return(self, stmt);
    }

    fn visit_block_stmt(&mut self, stmt: &mut Stmt) {
        walk_block_stmt(self, stmt);
    }

    fn visit_function_def(&mut self, func: &mut FunctionDef) {
        walk_function_def(self, func);
    }

    fn visit_struct_def(&mut self, def: &mut StructDef) {
        walk_struct_def(self, def);
    }

    fn visit_import(&mut self, stmt: &mut Stmt) {
        let _ = stmt;
    }

    fn visit_export(&mut self, stmt: &mut Stmt) {
        let _ = stmt;
    }
}

impl Program {
    /// Dispatches this program to the visitor.
    pub fn accept<V: Visitor>(&mut self, visitor: &mut V) {
        visitor.visit_program(self);
    }
}

impl Expr {
    /// Dispatches to the visitor method matching this node's variant.
    pub fn accept<V: Visitor>(&mut self, visitor: &mut V) {
        match self.kind {
            ExprKind::IntLit(_) => visitor.visit_int_lit(self),
            ExprKind::FloatLit(_) => visitor.visit_float_lit(self),
            ExprKind::DoubleLit(_) => visitor.visit_double_lit(self),
            ExprKind::BoolLit(_) => visitor.visit_bool_lit(self),
            ExprKind::StringLit(_) => visitor.visit_string_lit(self),
            ExprKind::Ident(_) => visitor.visit_ident_expr(self),
            ExprKind::Paren(_) => visitor.visit_paren_expr(self),
            ExprKind::Unary { .. } => visitor.visit_unary_expr(self),
            ExprKind::Binary { .. } => visitor.visit_binary_expr(self),
            ExprKind::Range { .. } => visitor.visit_range_expr(self),
            ExprKind::ArgList(_) => visitor.visit_arg_list(self),
            ExprKind::ArrayLit(_) => visitor.visit_array_lit(self),
            ExprKind::Attribute { .. } => visitor.visit_attribute_expr(self),
            ExprKind::Index { .. } => visitor.visit_index_expr(self),
            ExprKind::Call { .. } => visitor.visit_call_expr(self),
            ExprKind::Cast { .. } => visitor.visit_cast_expr(self),
        }
    }
}

impl Stmt {
    /// Dispatches to the visitor method matching this node's variant.
    pub fn accept<V: Visitor>(&mut self, visitor: &mut V) {
        match &mut self.kind {
            StmtKind::FunctionDef(func) => return visitor.visit_function_def(func),
            StmtKind::StructDef(def) => return visitor.visit_struct_def(def),
            _ => {}
        }

        match self.kind {
            StmtKind::Declaration { .. } => visitor.visit_declaration(self),
            StmtKind::ArrayDeclaration { .. } => visitor.visit_array_declaration(self),
            StmtKind::Initialization { .. } => visitor.visit_initialization(self),
            StmtKind::ArrayInitialization { .. } => visitor.visit_array_initialization(self),
            StmtKind::StructInitialization { .. } => visitor.visit_struct_initialization(self),
            StmtKind::Assignment { .. } => visitor.visit_assignment(self),
            StmtKind::ExprStmt(_) => visitor.visit_expr_stmt(self),
            StmtKind::If { .. } => visitor.visit_if(self),
            StmtKind::For { .. } => visitor.visit_for(self),
            StmtKind::Return(_) => visitor.visit_return(self),
            StmtKind::Block(_) => visitor.visit_block_stmt(self),
            StmtKind::Import { .. } => visitor.visit_import(self),
            StmtKind::Export { .. } => visitor.visit_export(self),
            StmtKind::FunctionDef(_) | StmtKind::StructDef(_) => unreachable!(),
        }
    }
}

// Walk helpers: visit children in declaration order.

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &mut Program) {
    for stmt in &mut program.stmts {
        stmt.accept(visitor);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &mut Block) {
    for stmt in &mut block.stmts {
        stmt.accept(visitor);
    }
}

pub fn walk_paren_expr<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::Paren(inner) = &mut expr.kind {
        inner.accept(visitor);
    }
}

pub fn walk_unary_expr<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::Unary { operand, .. } = &mut expr.kind {
        operand.accept(visitor);
    }
}

pub fn walk_binary_expr<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::Binary { lhs, rhs, .. } = &mut expr.kind {
        lhs.accept(visitor);
        rhs.accept(visitor);
    }
}

pub fn walk_range_expr<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::Range { start, end } = &mut expr.kind {
        start.accept(visitor);
        if let Some(end) = end {
            end.accept(visitor);
        }
    }
}

pub fn walk_arg_list<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::ArgList(args) = &mut expr.kind {
        for arg in args {
            arg.accept(visitor);
        }
    }
}

pub fn walk_array_lit<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::ArrayLit(values) = &mut expr.kind {
        for value in values {
            value.accept(visitor);
        }
    }
}

pub fn walk_attribute_expr<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::Attribute { base, .. } = &mut expr.kind {
        base.accept(visitor);
    }
}

pub fn walk_index_expr<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::Index { base, index } = &mut expr.kind {
        base.accept(visitor);
        index.accept(visitor);
    }
}

pub fn walk_call_expr<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::Call { callee, args } = &mut expr.kind {
        callee.accept(visitor);
        for arg in args {
            arg.accept(visitor);
        }
    }
}

pub fn walk_cast_expr<V: Visitor>(visitor: &mut V, expr: &mut Expr) {
    if let ExprKind::Cast { operand, .. } = &mut expr.kind {
        operand.accept(visitor);
    }
}

pub fn walk_initialization<V: Visitor>(visitor: &mut V, stmt: &mut Stmt) {
    if let StmtKind::Initialization { value, .. } = &mut stmt.kind {
        value.accept(visitor);
    }
}

pub fn walk_array_initialization<V: Visitor>(visitor: &mut V, stmt: &mut Stmt) {
    if let StmtKind::ArrayInitialization { values, .. } = &mut stmt.kind {
        values.accept(visitor);
    }
}

pub fn walk_struct_initialization<V: Visitor>(visitor: &mut V, stmt: &mut Stmt) {
    if let StmtKind::StructInitialization { values, .. } = &mut stmt.kind {
        values.accept(visitor);
    }
}

pub fn walk_assignment<V: Visitor>(visitor: &mut V, stmt: &mut Stmt) {
    if let StmtKind::Assignment { target, value } = &mut stmt.kind {
        target.accept(visitor);
        value.accept(visitor);
    }
}

pub fn walk_expr_stmt<V: Visitor>(visitor: &mut V, stmt: &mut Stmt) {
    if let StmtKind::ExprStmt(expr) = &mut stmt.kind {
        expr.accept(visitor);
    }
}

pub fn walk_if<V: Visitor>(visitor: &mut V, stmt: &mut Stmt) {
    if let StmtKind::If {
        cond,
        then_block,
        else_block,
    } = &mut stmt.kind
    {
        cond.accept(visitor);
        visitor.visit_block(then_block);
        if let Some(else_block) = else_block {
            visitor.visit_block(else_block);
        }
    }
}

pub fn walk_for<V: Visitor>(visitor: &mut V, stmt: &mut Stmt) {
    if let StmtKind::For { range, body, .. } = &mut stmt.kind {
        range.accept(visitor);
        visitor.visit_block(body);
    }
}

pub fn walk_return<V: Visitor>(visitor: &mut V, stmt: &mut Stmt) {
    if let StmtKind::Return(Some(expr)) = &mut stmt.kind {
        expr.accept(visitor);
    }
}

pub fn walk_block_stmt<V: Visitor>(visitor: &mut V, stmt: &mut Stmt) {
    if let StmtKind::Block(block) = &mut stmt.kind {
        visitor.visit_block(block);
    }
}

pub fn walk_function_def<V: Visitor>(visitor: &mut V, func: &mut FunctionDef) {
    visitor.visit_block(&mut func.body);
}

pub fn walk_struct_def<V: Visitor>(visitor: &mut V, def: &mut StructDef) {
    for method in &mut def.methods {
        visitor.visit_function_def(method);
    }
}
