//! Structural printer.
//!
//! Renders a program back to indented Sable source. The output is
//! canonical: one statement per line, single spaces around binary
//! operators, two-space indentation. Re-parsing the rendering yields the
//! same tree up to analyzer-inserted cast nodes, which print as their
//! operand (implicit conversions have no source syntax).
//!
//! Used by tests to compare tree shapes and by the driver's AST dump.

use std::fmt::Write;

use crate::ast::{Block, Expr, ExprKind, FunctionDef, Param, Program, Stmt, StmtKind, StructDef};
use crate::visitor::Visitor;

/// Renders `program` to canonical source form.
pub fn print_program(program: &mut Program) -> String {
    let mut printer = AstPrinter::new();
    program.accept(&mut printer);
    printer.finish()
}

/// The printing visitor.
pub struct AstPrinter {
    out: String,
    indent: usize,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    /// The rendered text.
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn render_params(params: &[Param]) -> String {
        params
            .iter()
            .map(|p| format!("{} {}", p.ty_name, p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn render_exprs(exprs: &[Expr]) -> String {
        exprs
            .iter()
            .map(Self::render_expr)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders one expression inline.
    ///
    /// Grouping is reproduced from explicit paren nodes; the parser builds
    /// precedence into the tree shape, so no parentheses are invented.
    fn render_expr(expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::IntLit(v) => v.to_string(),
            ExprKind::FloatLit(v) => format!("{}f", v),
            ExprKind::DoubleLit(v) => {
                let text = v.to_string();
                // A double without a decimal point needs its suffix back,
                // or it would re-lex as an integer.
                if text.contains('.') {
                    text
                } else {
                    format!("{}d", text)
                }
            }
            ExprKind::BoolLit(v) => v.to_string(),
            ExprKind::StringLit(s) => format!("\"{}\"", s.replace('"', "\\\"")),
            ExprKind::Ident(name) => name.clone(),
            ExprKind::Paren(inner) => format!("({})", Self::render_expr(inner)),
            ExprKind::Unary { op, operand } => {
                format!("{}{}", op.symbol(), Self::render_expr(operand))
            }
            ExprKind::Binary { op, lhs, rhs } => format!(
                "{} {} {}",
                Self::render_expr(lhs),
                op.symbol(),
                Self::render_expr(rhs)
            ),
            ExprKind::Range { start, end } => match end {
                Some(end) => format!(
                    "{} ... {}",
                    Self::render_expr(start),
                    Self::render_expr(end)
                ),
                None => Self::render_expr(start),
            },
            ExprKind::ArgList(args) => format!("({})", Self::render_exprs(args)),
            ExprKind::ArrayLit(values) => format!("{{ {} }}", Self::render_exprs(values)),
            ExprKind::Attribute { base, field } => {
                format!("{}.{}", Self::render_expr(base), field)
            }
            ExprKind::Index { base, index } => {
                format!("{}[{}]", Self::render_expr(base), Self::render_expr(index))
            }
            ExprKind::Call { callee, args } => {
                format!("{}({})", Self::render_expr(callee), Self::render_exprs(args))
            }
            // Implicit conversions have no source syntax.
            ExprKind::Cast { operand, .. } => Self::render_expr(operand),
        }
    }
}

impl Default for AstPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for AstPrinter {
    fn visit_block(&mut self, block: &mut Block) {
        self.indent += 1;
        for stmt in &mut block.stmts {
            stmt.accept(self);
        }
        self.indent -= 1;
    }

    fn visit_declaration(&mut self, stmt: &mut Stmt) {
        if let StmtKind::Declaration { ty_name, name } = &stmt.kind {
            let text = format!("{} {};", ty_name, name);
            self.line(&text);
        }
    }

    fn visit_array_declaration(&mut self, stmt: &mut Stmt) {
        if let StmtKind::ArrayDeclaration {
            ty_name,
            name,
            size,
        } = &stmt.kind
        {
            let text = format!("{} {}[{}];", ty_name, name, size);
            self.line(&text);
        }
    }

    fn visit_initialization(&mut self, stmt: &mut Stmt) {
        if let StmtKind::Initialization {
            ty_name,
            name,
            value,
        } = &stmt.kind
        {
            let text = format!("{} {} = {};", ty_name, name, Self::render_expr(value));
            self.line(&text);
        }
    }

    fn visit_array_initialization(&mut self, stmt: &mut Stmt) {
        if let StmtKind::ArrayInitialization {
            ty_name,
            name,
            size,
            values,
        } = &stmt.kind
        {
            let text = format!(
                "{} {}[{}] = {};",
                ty_name,
                name,
                size,
                Self::render_expr(values)
            );
            self.line(&text);
        }
    }

    fn visit_struct_initialization(&mut self, stmt: &mut Stmt) {
        if let StmtKind::StructInitialization {
            ty_name,
            name,
            values,
        } = &stmt.kind
        {
            let text = format!("{} {} = {};", ty_name, name, Self::render_expr(values));
            self.line(&text);
        }
    }

    fn visit_assignment(&mut self, stmt: &mut Stmt) {
        if let StmtKind::Assignment { target, value } = &stmt.kind {
            let text = format!(
                "{} = {};",
                Self::render_expr(target),
                Self::render_expr(value)
            );
            self.line(&text);
        }
    }

    fn visit_expr_stmt(&mut self, stmt: &mut Stmt) {
        if let StmtKind::ExprStmt(expr) = &stmt.kind {
            let text = format!("{};", Self::render_expr(expr));
            self.line(&text);
        }
    }

    fn visit_if(&mut self, stmt: &mut Stmt) {
        if let StmtKind::If {
            cond,
            then_block,
            else_block,
        } = &mut stmt.kind
        {
            let head = format!("if {} {{", Self::render_expr(cond));
            self.line(&head);
            self.visit_block(then_block);

            match else_block {
                Some(else_block) => {
                    self.line("} else {");
                    self.visit_block(else_block);
                    self.line("}");
                }
                None => self.line("}"),
            }
        }
    }

    fn visit_for(&mut self, stmt: &mut Stmt) {
        if let StmtKind::For {
            iterator,
            range,
            body,
        } = &mut stmt.kind
        {
            let head = format!("for {} in {} {{", iterator, Self::render_expr(range));
            self.line(&head);
            self.visit_block(body);
            self.line("}");
        }
    }

    fn visit_return(&mut self, stmt: &mut Stmt) {
        if let StmtKind::Return(expr) = &stmt.kind {
            let text = match expr {
                Some(expr) => format!("return {};", Self::render_expr(expr)),
                None => "return;".to_string(),
            };
            self.line(&text);
        }
    }

    fn visit_block_stmt(&mut self, stmt: &mut Stmt) {
        if let StmtKind::Block(block) = &mut stmt.kind {
            self.line("{");
            self.visit_block(block);
            self.line("}");
        }
    }

    fn visit_function_def(&mut self, func: &mut FunctionDef) {
        let head = format!(
            "func {}({}) -> {} {{",
            func.name,
            Self::render_params(&func.params),
            func.ret_ty_name
        );
        self.line(&head);
        self.visit_block(&mut func.body);
        self.line("}");
    }

    fn visit_struct_def(&mut self, def: &mut StructDef) {
        let head = format!("struct {} {{", def.name);
        self.line(&head);

        self.indent += 1;
        for attr in &def.attributes {
            let text = format!("{} {};", attr.ty_name, attr.name);
            self.line(&text);
        }
        self.indent -= 1;

        // Methods are rendered at member depth.
        self.indent += 1;
        for method in &mut def.methods {
            self.visit_function_def(method);
        }
        self.indent -= 1;

        self.line("}");
    }

    fn visit_import(&mut self, stmt: &mut Stmt) {
        if let StmtKind::Import { namespaces, value } = &stmt.kind {
            let mut path = String::new();
            for ns in namespaces {
                let _ = write!(path, "{}::", ns);
            }
            path.push_str(value);
            let text = format!("import {};", path);
            self.line(&text);
        }
    }

    fn visit_export(&mut self, stmt: &mut Stmt) {
        if let StmtKind::Export { names } = &stmt.kind {
            let text = match names.len() {
                1 => format!("export {};", names[0]),
                _ => format!("export {{ {} }};", names.join(", ")),
            };
            self.line(&text);
        }
    }
}
