//! The semantic analyzer.
//!
//! One visitor pass over the program. Expression types are inferred
//! bottom-up by [`Analyzer::infer_expr`], which records an annotation for
//! every expression id and rewrites operands in place when an implicit
//! numeric conversion is needed. Statement checks sit in the visitor
//! methods.
//!
//! Recovery rule: report, annotate `void`, keep going.

use std::rc::Rc;

use sablec_par::ast::{
    Block, Expr, ExprId, ExprKind, FunctionDef, Program, Stmt, StmtKind, StructDef,
};
use sablec_par::visitor::{walk_for, walk_if, walk_struct_def, Visitor};
use sablec_sym::{Context, PrimitiveKind, Scope, ScopeRef, Symbol, SymbolKind, Type, WeakScope};
use sablec_util::{FrontendError, FxHashMap, Handler, Position};

/// Inferred type per expression id.
pub type TypeMap = FxHashMap<ExprId, Rc<Type>>;

/// Analyzes `program`, mutating it to install implicit casts, and returns
/// the expression-type annotation map.
pub fn analyze(program: &mut Program, ctx: &mut Context, handler: &Handler) -> TypeMap {
    let mut analyzer = Analyzer::new(ctx, handler, program.expr_count);
    program.accept(&mut analyzer);
    program.expr_count = analyzer.next_expr_id;
    analyzer.types
}

/// Upgrades a node's scope reference. The scope tree is owned from the
/// program root, so this only fails if an AST node outlived its program -
/// a broken invariant worth aborting on.
fn scope_of(weak: &WeakScope) -> ScopeRef {
    weak.upgrade().expect("AST node outlived its scope tree")
}

/// The analysis visitor.
pub struct Analyzer<'a> {
    ctx: &'a mut Context,
    handler: &'a Handler,
    /// Inferred type per expression.
    types: TypeMap,
    /// Continues the parser's expression id sequence for inserted casts.
    next_expr_id: u32,
    /// Return types of the functions currently being analyzed, innermost
    /// last.
    ret_stack: Vec<Rc<Type>>,
}

impl<'a> Analyzer<'a> {
    pub fn new(ctx: &'a mut Context, handler: &'a Handler, next_expr_id: u32) -> Self {
        Self {
            ctx,
            handler,
            types: TypeMap::default(),
            next_expr_id,
            ret_stack: Vec::new(),
        }
    }

    /// The annotation map, for callers that drive the visitor themselves.
    pub fn into_types(self) -> TypeMap {
        self.types
    }

    fn report(&mut self, err: FrontendError) {
        self.handler.error(err.to_string(), err.pos());
    }

    fn void_ty(&self) -> Rc<Type> {
        self.ctx.types.primitive(PrimitiveKind::Void)
    }

    fn bool_ty(&self) -> Rc<Type> {
        self.ctx.types.primitive(PrimitiveKind::Bool)
    }

    fn int_ty(&self) -> Rc<Type> {
        self.ctx.types.primitive(PrimitiveKind::Int)
    }

    fn record(&mut self, id: ExprId, ty: Rc<Type>) -> Rc<Type> {
        self.types.insert(id, Rc::clone(&ty));
        ty
    }

    /// `void` doubles as the annotation for expressions that already
    /// failed; checks skip such operands so one mistake reports once.
    fn is_void(&self, ty: &Rc<Type>) -> bool {
        Rc::ptr_eq(ty, &self.void_ty())
    }

    /// Resolves a declared type name, reporting `Undefined` when it does
    /// not name a type.
    fn resolve_declared(&mut self, scope: &ScopeRef, name: &str, pos: Position) -> Option<Rc<Type>> {
        match Scope::lookup(scope, name) {
            Some(symbol) if symbol.kind() == SymbolKind::Type => Some(symbol.ty()),
            _ => {
                self.report(FrontendError::Undefined {
                    name: name.to_string(),
                    pos,
                });
                None
            }
        }
    }

    fn incompatible(&mut self, lhs: &Type, rhs: &Type, pos: Position) {
        self.report(FrontendError::IncompatibleTypes {
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
            pos,
        });
    }

    /// Wraps `slot` in a cast to `target`, annotating the new node.
    /// Subsequent stages see the conversion as an ordinary expression.
    fn insert_cast(&mut self, slot: &mut Expr, target: Rc<Type>) {
        let id = ExprId(self.next_expr_id);
        self.next_expr_id += 1;

        let scope = slot.scope.clone();
        let pos = slot.pos;

        let operand = std::mem::replace(
            slot,
            Expr {
                id,
                kind: ExprKind::IntLit(0),
                scope,
                pos,
            },
        );
        slot.kind = ExprKind::Cast {
            target: Rc::clone(&target),
            operand: Box::new(operand),
        };
        self.types.insert(id, target);
    }

    /// If `slot` and `expected` disagree, installs a numeric cast when both
    /// sides are numeric, otherwise reports. `actual` is `slot`'s inferred
    /// type.
    fn coerce_to(&mut self, slot: &mut Expr, actual: &Rc<Type>, expected: &Rc<Type>) {
        if Rc::ptr_eq(actual, expected) || self.is_void(actual) {
            return;
        }
        if actual.is_numeric() && expected.is_numeric() {
            self.insert_cast(slot, Rc::clone(expected));
        } else {
            self.incompatible(actual, expected, slot.pos);
        }
    }

    // =========================================================================
    // Expression inference
    // =========================================================================

    /// Infers and records the type of `expr`, installing casts in its
    /// children where the rules call for them.
    pub fn infer_expr(&mut self, expr: &mut Expr) -> Rc<Type> {
        let pos = expr.pos;
        let id = expr.id;

        let ty = match &mut expr.kind {
            ExprKind::IntLit(_) => self.int_ty(),
            ExprKind::FloatLit(_) => self.ctx.types.primitive(PrimitiveKind::Float),
            ExprKind::DoubleLit(_) => self.ctx.types.primitive(PrimitiveKind::Double),
            ExprKind::BoolLit(_) => self.bool_ty(),

            ExprKind::StringLit(value) => {
                // Strings are char arrays; a zero-length array type would
                // break the array invariant.
                let len = value.chars().count();
                if len == 0 {
                    self.handler.error("empty string literal has no type", pos);
                    self.void_ty()
                } else {
                    let elem = self.ctx.types.primitive(PrimitiveKind::Char);
                    self.ctx.types.get_or_intern(Type::Array { elem, len })
                }
            }

            ExprKind::Ident(name) => {
                let name = name.clone();
                let scope = scope_of(&expr.scope);
                match Scope::lookup(&scope, &name) {
                    Some(symbol) => symbol.ty(),
                    None => {
                        self.report(FrontendError::Undefined { name, pos });
                        self.void_ty()
                    }
                }
            }

            ExprKind::Paren(inner) => self.infer_expr(inner),

            ExprKind::Unary { op, operand } => {
                let op = *op;
                let operand_ty = self.infer_expr(operand);
                match op {
                    sablec_par::UnOp::Neg => {
                        if self.is_void(&operand_ty) {
                            operand_ty
                        } else if !operand_ty.is_numeric() {
                            self.handler.error(
                                format!("cannot negate value of type '{}'", operand_ty),
                                pos,
                            );
                            self.void_ty()
                        } else {
                            operand_ty
                        }
                    }
                    sablec_par::UnOp::Not => {
                        let bool_ty = self.bool_ty();
                        if !self.is_void(&operand_ty) && !Rc::ptr_eq(&operand_ty, &bool_ty) {
                            self.incompatible(&operand_ty, &bool_ty, pos);
                        }
                        bool_ty
                    }
                }
            }

            ExprKind::Binary { op, lhs, rhs } => {
                let op = *op;
                let lhs_ty = self.infer_expr(lhs);
                let rhs_ty = self.infer_expr(rhs);

                if op.is_logical() {
                    let bool_ty = self.bool_ty();
                    if !self.is_void(&lhs_ty) && !Rc::ptr_eq(&lhs_ty, &bool_ty) {
                        self.incompatible(&lhs_ty, &bool_ty, lhs.pos);
                    }
                    if !self.is_void(&rhs_ty) && !Rc::ptr_eq(&rhs_ty, &bool_ty) {
                        self.incompatible(&rhs_ty, &bool_ty, rhs.pos);
                    }
                    bool_ty
                } else if self.is_void(&lhs_ty) || self.is_void(&rhs_ty) {
                    self.void_ty()
                } else if Rc::ptr_eq(&lhs_ty, &rhs_ty) {
                    if op.yields_bool() {
                        self.bool_ty()
                    } else {
                        rhs_ty
                    }
                } else if lhs_ty.is_numeric() && rhs_ty.is_numeric() {
                    // Differing numeric operands: the left side converts to
                    // the right side's type.
                    self.insert_cast(lhs, Rc::clone(&rhs_ty));
                    if op.yields_bool() {
                        self.bool_ty()
                    } else {
                        rhs_ty
                    }
                } else {
                    self.incompatible(&lhs_ty, &rhs_ty, pos);
                    self.void_ty()
                }
            }

            ExprKind::Range { start, end } => {
                let start_ty = self.infer_expr(start);

                // A range over an array value iterates its elements.
                if let Some(elem) = start_ty.elem_type() {
                    elem
                } else if self.is_void(&start_ty) {
                    if let Some(end) = end {
                        self.infer_expr(end);
                    }
                    self.void_ty()
                } else {
                    match end {
                        Some(end) => {
                            let end_ty = self.infer_expr(end);
                            if Rc::ptr_eq(&start_ty, &end_ty) {
                                if start_ty.is_numeric() {
                                    start_ty
                                } else {
                                    self.handler.error(
                                        format!("invalid type '{}' in range", start_ty),
                                        pos,
                                    );
                                    self.void_ty()
                                }
                            } else if self.is_void(&end_ty) {
                                self.void_ty()
                            } else if start_ty.is_numeric() && end_ty.is_numeric() {
                                // The end converts to the start's type.
                                self.insert_cast(end, Rc::clone(&start_ty));
                                start_ty
                            } else {
                                self.incompatible(&start_ty, &end_ty, pos);
                                self.void_ty()
                            }
                        }
                        None => {
                            if start_ty.is_numeric() {
                                start_ty
                            } else {
                                self.handler.error(
                                    format!("invalid type '{}' in range", start_ty),
                                    pos,
                                );
                                self.void_ty()
                            }
                        }
                    }
                }
            }

            ExprKind::ArgList(elems) => {
                let mut elem_tys = Vec::with_capacity(elems.len());
                for elem in elems.iter_mut() {
                    let ty = self.infer_expr(elem);
                    elem_tys.push(ty);
                }
                self.ctx.types.get_or_intern(Type::ArgList { elems: elem_tys })
            }

            ExprKind::ArrayLit(values) => {
                if values.is_empty() {
                    self.handler.error("empty array literal has no type", pos);
                    self.void_ty()
                } else {
                    let first_ty = self.infer_expr(&mut values[0]);
                    let len = values.len();
                    for value in values.iter_mut().skip(1) {
                        let ty = self.infer_expr(value);
                        self.coerce_to(value, &ty, &first_ty);
                    }
                    self.ctx.types.get_or_intern(Type::Array {
                        elem: first_ty,
                        len,
                    })
                }
            }

            ExprKind::Attribute { base, field } => {
                let field = field.clone();
                let base_ty = self.infer_expr(base);

                if self.is_void(&base_ty) {
                    self.void_ty()
                } else if !base_ty.is_struct() {
                    self.handler.error(
                        format!("attribute access on non-struct type '{}'", base_ty),
                        pos,
                    );
                    self.void_ty()
                } else {
                    match base_ty.field_type(&field) {
                        Some(ty) => ty,
                        None => {
                            self.report(FrontendError::Undefined { name: field, pos });
                            self.void_ty()
                        }
                    }
                }
            }

            ExprKind::Index { base, index } => {
                let base_ty = self.infer_expr(base);
                let index_ty = self.infer_expr(index);

                let int_ty = self.int_ty();
                if !self.is_void(&index_ty) && !Rc::ptr_eq(&index_ty, &int_ty) {
                    self.incompatible(&index_ty, &int_ty, index.pos);
                }

                match base_ty.elem_type() {
                    Some(elem) => elem,
                    None => {
                        if !self.is_void(&base_ty) {
                            self.handler.error(
                                format!("cannot index into value of type '{}'", base_ty),
                                pos,
                            );
                        }
                        self.void_ty()
                    }
                }
            }

            ExprKind::Call { callee, args } => {
                let mut arg_tys = Vec::with_capacity(args.len());
                for arg in args.iter_mut() {
                    let ty = self.infer_expr(arg);
                    arg_tys.push(ty);
                }

                let callee_ty = self.resolve_callee(callee, &arg_tys);

                match &*callee_ty {
                    Type::Function { ret, params } => {
                        if params.len() != args.len() {
                            self.report(FrontendError::ArityMismatch {
                                expected: params.len(),
                                found: args.len(),
                                pos,
                            });
                            self.void_ty()
                        } else {
                            // Positional types must match exactly; calls do
                            // not coerce.
                            let params = params.clone();
                            let ret = Rc::clone(ret);
                            for (arg_ty, param_ty) in arg_tys.iter().zip(&params) {
                                if !self.is_void(arg_ty) && !Rc::ptr_eq(arg_ty, param_ty) {
                                    self.incompatible(arg_ty, param_ty, pos);
                                }
                            }
                            ret
                        }
                    }
                    Type::Primitive(PrimitiveKind::Void) => {
                        // Unresolved callee, already reported.
                        self.void_ty()
                    }
                    _ => {
                        self.handler.error(
                            format!("called value of type '{}' is not a function", callee_ty),
                            pos,
                        );
                        self.void_ty()
                    }
                }
            }

            ExprKind::Cast { target, .. } => Rc::clone(target),
        };

        self.record(id, ty)
    }

    /// Resolves a call's callee. An identifier callee goes through
    /// overload resolution: the argument types mangle into a candidate
    /// symbol name which is tried before the plain name.
    fn resolve_callee(&mut self, callee: &mut Expr, arg_tys: &[Rc<Type>]) -> Rc<Type> {
        let pos = callee.pos;
        let id = callee.id;

        let name = match &callee.kind {
            ExprKind::Ident(name) => name.clone(),
            _ => return self.infer_expr(callee),
        };

        let scope = scope_of(&callee.scope);
        let mangled = Symbol::mangle_function_name(&name, arg_tys);

        let symbol = Scope::lookup(&scope, &mangled).or_else(|| Scope::lookup(&scope, &name));

        match symbol {
            Some(symbol) => {
                let ty = symbol.ty();
                self.record(id, ty)
            }
            None => {
                self.report(FrontendError::Undefined { name, pos });
                let void = self.void_ty();
                self.record(id, void)
            }
        }
    }

    // =========================================================================
    // Statement helpers
    // =========================================================================

    /// Checks one initializer value group against an expected element-type
    /// sequence, coercing numerics per element.
    fn check_value_group(
        &mut self,
        values: &mut [Expr],
        expected: &[Rc<Type>],
        pos: Position,
    ) {
        if values.len() != expected.len() {
            self.report(FrontendError::ArityMismatch {
                expected: expected.len(),
                found: values.len(),
                pos,
            });
            return;
        }

        for (value, expected_ty) in values.iter_mut().zip(expected) {
            let ty = self.infer_expr(value);
            self.coerce_to(value, &ty, expected_ty);
        }
    }
}

impl<'a> Visitor for Analyzer<'a> {
    fn visit_declaration(&mut self, stmt: &mut Stmt) {
        let pos = stmt.pos;
        let scope = scope_of(&stmt.scope);
        if let StmtKind::Declaration { ty_name, .. } = &stmt.kind {
            let ty_name = ty_name.clone();
            self.resolve_declared(&scope, &ty_name, pos);
        }
    }

    fn visit_array_declaration(&mut self, stmt: &mut Stmt) {
        let pos = stmt.pos;
        let scope = scope_of(&stmt.scope);
        if let StmtKind::ArrayDeclaration { ty_name, .. } = &stmt.kind {
            let ty_name = ty_name.clone();
            self.resolve_declared(&scope, &ty_name, pos);
        }
    }

    fn visit_initialization(&mut self, stmt: &mut Stmt) {
        let pos = stmt.pos;
        let scope = scope_of(&stmt.scope);
        if let StmtKind::Initialization { ty_name, value, .. } = &mut stmt.kind {
            let ty_name = ty_name.clone();
            let value_ty = self.infer_expr(value);

            if let Some(declared) = self.resolve_declared(&scope, &ty_name, pos) {
                self.coerce_to(value, &value_ty, &declared);
            }
        }
    }

    fn visit_array_initialization(&mut self, stmt: &mut Stmt) {
        let pos = stmt.pos;
        let scope = scope_of(&stmt.scope);
        if let StmtKind::ArrayInitialization {
            ty_name,
            size,
            values,
            ..
        } = &mut stmt.kind
        {
            let ty_name = ty_name.clone();
            let size = *size;

            let Some(elem_ty) = self.resolve_declared(&scope, &ty_name, pos) else {
                return;
            };

            let expected: Vec<Rc<Type>> = std::iter::repeat_with(|| Rc::clone(&elem_ty))
                .take(size)
                .collect();

            match &mut values.kind {
                ExprKind::ArgList(elems) | ExprKind::ArrayLit(elems) => {
                    self.check_value_group(elems, &expected, pos);
                }
                // `(v)` is a one-element group, not a grouping.
                ExprKind::Paren(inner) => {
                    self.check_value_group(std::slice::from_mut(inner.as_mut()), &expected, pos);
                }
                _ => {
                    let ty = self.infer_expr(values);
                    let declared = self.ctx.types.get_or_intern(Type::Array {
                        elem: elem_ty,
                        len: size.max(1),
                    });
                    if !self.is_void(&ty) && !Rc::ptr_eq(&ty, &declared) {
                        self.incompatible(&ty, &declared, pos);
                    }
                }
            }
        }
    }

    fn visit_struct_initialization(&mut self, stmt: &mut Stmt) {
        let pos = stmt.pos;
        let scope = scope_of(&stmt.scope);
        if let StmtKind::StructInitialization {
            ty_name, values, ..
        } = &mut stmt.kind
        {
            let ty_name = ty_name.clone();

            let Some(declared) = self.resolve_declared(&scope, &ty_name, pos) else {
                return;
            };

            let field_tys: Vec<Rc<Type>> = match &*declared {
                Type::Struct { fields, .. } => fields.values().map(Rc::clone).collect(),
                _ => {
                    self.handler
                        .error(format!("'{}' is not a struct type", ty_name), pos);
                    return;
                }
            };

            match &mut values.kind {
                ExprKind::ArgList(elems) => {
                    self.check_value_group(elems, &field_tys, pos);
                }
                // `(v)` initializes a single-field struct.
                ExprKind::Paren(inner) => {
                    self.check_value_group(std::slice::from_mut(inner.as_mut()), &field_tys, pos);
                }
                _ => {
                    let ty = self.infer_expr(values);
                    if !self.is_void(&ty) {
                        self.incompatible(&ty, &declared, pos);
                    }
                }
            }
        }
    }

    fn visit_assignment(&mut self, stmt: &mut Stmt) {
        if let StmtKind::Assignment { target, value } = &mut stmt.kind {
            if !target.is_assignable() {
                let pos = target.pos;
                self.report(FrontendError::InvalidAssignment { pos });
            }

            let target_ty = self.infer_expr(target);
            let value_ty = self.infer_expr(value);
            self.coerce_to(value, &value_ty, &target_ty);
        }
    }

    fn visit_expr_stmt(&mut self, stmt: &mut Stmt) {
        if let StmtKind::ExprStmt(expr) = &mut stmt.kind {
            self.infer_expr(expr);
        }
    }

    fn visit_if(&mut self, stmt: &mut Stmt) {
        if let StmtKind::If { cond, .. } = &mut stmt.kind {
            let cond_ty = self.infer_expr(cond);
            let bool_ty = self.bool_ty();
            if !self.is_void(&cond_ty) && !Rc::ptr_eq(&cond_ty, &bool_ty) {
                self.incompatible(&cond_ty, &bool_ty, cond.pos);
            }
        }
        walk_if(self, stmt);
    }

    fn visit_for(&mut self, stmt: &mut Stmt) {
        let pos = stmt.pos;
        if let StmtKind::For {
            iterator,
            range,
            body,
        } = &mut stmt.kind
        {
            let range_ty = self.infer_expr(range);

            // For a range expression the inferred type already is the
            // element type; a plain array value degenerates to its element
            // type; anything else iterates itself if numeric.
            let iter_ty = if matches!(range.kind, ExprKind::Range { .. }) {
                range_ty
            } else if let Some(elem) = range_ty.elem_type() {
                elem
            } else if range_ty.is_numeric() || self.is_void(&range_ty) {
                range_ty
            } else {
                self.handler
                    .error(format!("cannot iterate value of type '{}'", range_ty), pos);
                self.void_ty()
            };

            let iterator = iterator.clone();
            let body_scope = scope_of(&body.scope);
            if Scope::insert(&body_scope, Symbol::variable(&iterator, iter_ty)).is_err() {
                self.report(FrontendError::Redefinition {
                    name: iterator,
                    pos,
                });
            }
        }
        walk_for(self, stmt);
    }

    fn visit_return(&mut self, stmt: &mut Stmt) {
        let pos = stmt.pos;
        let Some(expected) = self.ret_stack.last().cloned() else {
            return;
        };

        if let StmtKind::Return(expr) = &mut stmt.kind {
            match expr {
                Some(expr) => {
                    let ty = self.infer_expr(expr);
                    self.coerce_to(expr, &ty, &expected);
                }
                None => {
                    let void = self.void_ty();
                    if !Rc::ptr_eq(&expected, &void) {
                        self.incompatible(&void, &expected, pos);
                    }
                }
            }
        }
    }

    fn visit_function_def(&mut self, func: &mut FunctionDef) {
        let fn_scope = scope_of(&func.scope);

        for param in &func.params {
            let name = param.ty_name.clone();
            let pos = param.pos;
            self.resolve_declared(&fn_scope, &name, pos);
        }

        let ret_name = func.ret_ty_name.clone();
        let ret = self
            .resolve_declared(&fn_scope, &ret_name, func.pos)
            .unwrap_or_else(|| self.void_ty());

        self.ret_stack.push(ret);
        self.visit_block(&mut func.body);
        self.ret_stack.pop();
    }

    fn visit_struct_def(&mut self, def: &mut StructDef) {
        let member_scope = scope_of(&def.scope);
        for attr in &def.attributes {
            let name = attr.ty_name.clone();
            let pos = attr.pos;
            self.resolve_declared(&member_scope, &name, pos);
        }
        walk_struct_def(self, def);
    }

    fn visit_block(&mut self, block: &mut Block) {
        for stmt in &mut block.stmts {
            stmt.accept(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sablec_par::parse;

    fn analyze_source(source: &str) -> (Program, Context, Handler, TypeMap) {
        let mut ctx = Context::new();
        let handler = Handler::new();
        let mut program = parse(source, &mut ctx, &handler);
        let types = analyze(&mut program, &mut ctx, &handler);
        (program, ctx, handler, types)
    }

    fn init_value(program: &Program, index: usize) -> &Expr {
        match &program.stmts[index].kind {
            StmtKind::Initialization { value, .. } => value,
            other => panic!("expected initialization, got {:?}", other),
        }
    }

    #[test]
    fn literal_types() {
        let (program, _ctx, handler, types) = analyze_source("int a = 1; double b = 2.0; bool c = true;");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        assert_eq!(types[&init_value(&program, 0).id].mangled_name(), "int");
        assert_eq!(types[&init_value(&program, 1).id].mangled_name(), "double");
        assert_eq!(types[&init_value(&program, 2).id].mangled_name(), "bool");
    }

    #[test]
    fn binary_widening_casts_lhs_to_rhs() {
        // 1 + 2.0 : the int side is wrapped in a cast to double.
        let (program, _ctx, handler, types) = analyze_source("double d = 1 + 2.0d;");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let value = init_value(&program, 0);
        let ExprKind::Binary { lhs, .. } = &value.kind else {
            panic!("expected binary initializer");
        };
        let ExprKind::Cast { target, operand } = &lhs.kind else {
            panic!("expected cast on lhs, got {:?}", lhs.kind);
        };
        assert_eq!(target.mangled_name(), "double");
        assert!(matches!(operand.kind, ExprKind::IntLit(1)));
        assert_eq!(types[&value.id].mangled_name(), "double");
    }

    #[test]
    fn after_analysis_binary_operands_agree() {
        let (program, _ctx, handler, types) = analyze_source("double d = 1 + 2.0d;");
        assert!(!handler.has_errors());

        let value = init_value(&program, 0);
        let ExprKind::Binary { lhs, rhs, .. } = &value.kind else {
            panic!("expected binary");
        };
        assert!(Rc::ptr_eq(&types[&lhs.id], &types[&rhs.id]));
    }

    #[test]
    fn comparison_yields_bool() {
        let (program, _ctx, handler, types) = analyze_source("bool b = 1 < 2;");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert_eq!(types[&init_value(&program, 0).id].mangled_name(), "bool");
    }

    #[test]
    fn logical_operators_require_bool() {
        let (_p, _ctx, handler, _t) = analyze_source("bool b = 1 & true;");
        assert!(handler.has_errors());
    }

    #[test]
    fn incompatible_binary_reports_and_continues() {
        let (_p, _ctx, handler, _t) = analyze_source("int x = 1 + true; int y = 2;");
        assert!(handler.has_errors());
        // Analysis keeps going past the error.
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn undefined_name_annotates_void() {
        let (program, _ctx, handler, types) = analyze_source("int x = nope;");
        assert!(handler.has_errors());
        assert_eq!(types[&init_value(&program, 0).id].mangled_name(), "void");
    }

    #[test]
    fn initialization_coerces_numeric_value() {
        let (program, _ctx, handler, _types) = analyze_source("double d = 1;");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let value = init_value(&program, 0);
        assert!(matches!(value.kind, ExprKind::Cast { .. }));
    }

    #[test]
    fn assignment_requires_assignable_target() {
        let (_p, _ctx, handler, _t) = analyze_source(
            "func f() -> void { (1) = 2; }",
        );
        assert!(handler.has_errors());
    }

    #[test]
    fn call_resolves_overload_by_argument_types() {
        let source = "\
            func f(int a) -> int { return a; }\n\
            func f(double a) -> double { return a; }\n\
            func main() -> void { double d = f(1.5); int i = f(2); }\n";
        let (_p, _ctx, handler, _t) = analyze_source(source);
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
    }

    #[test]
    fn call_arity_mismatch_is_reported() {
        // A zero-parameter function resolves through its plain name, so a
        // call with arguments reaches the arity check.
        let source = "func f() -> int { return 1; } func g() -> void { int x = f(1); }";
        let (_p, _ctx, handler, _t) = analyze_source(source);
        assert!(handler.has_errors());
        assert!(handler.diagnostics()[0].message.contains("argument"));
    }

    #[test]
    fn call_with_no_matching_overload_is_undefined() {
        let source = "func f(int a) -> int { return a; } func g() -> void { f(); }";
        let (_p, _ctx, handler, _t) = analyze_source(source);
        assert!(handler.has_errors());
        assert!(handler.diagnostics()[0].message.contains("undefined"));
    }

    #[test]
    fn for_iterator_gets_range_element_type() {
        let (program, _ctx, handler, _t) =
            analyze_source("func f() -> void { for i in 0 ... 10 { int x = i; } }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let StmtKind::FunctionDef(func) = &program.stmts[0].kind else {
            panic!("expected function");
        };
        let StmtKind::For { body, .. } = &func.body.stmts[0].kind else {
            panic!("expected for");
        };

        let body_scope = body.scope.upgrade().unwrap();
        let iterator = Scope::lookup(&body_scope, "i").unwrap();
        assert_eq!(iterator.ty().mangled_name(), "int");
        assert_eq!(iterator.kind(), SymbolKind::Variable);
    }

    #[test]
    fn range_endpoint_widens_to_start_type() {
        let (program, _ctx, handler, _t) =
            analyze_source("func f() -> void { for i in 0.5 ... 10 { } }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let StmtKind::FunctionDef(func) = &program.stmts[0].kind else {
            panic!("expected function");
        };
        let StmtKind::For { range, .. } = &func.body.stmts[0].kind else {
            panic!("expected for");
        };
        let ExprKind::Range { end, .. } = &range.kind else {
            panic!("expected range");
        };
        assert!(matches!(
            end.as_deref().unwrap().kind,
            ExprKind::Cast { .. }
        ));
    }

    #[test]
    fn for_over_array_iterates_elements() {
        let (_p, _ctx, handler, _t) = analyze_source(
            "func f() -> void { int a[3]; for x in a { int y = x; } }",
        );
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
    }

    #[test]
    fn if_condition_must_be_bool() {
        let (_p, _ctx, handler, _t) = analyze_source("func f() -> void { if 1 { } }");
        assert!(handler.has_errors());
    }

    #[test]
    fn return_type_coerces_or_reports() {
        let (_p, _ctx, handler, _t) =
            analyze_source("func f() -> double { return 1; }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let (_p, _ctx, handler, _t) =
            analyze_source("func f() -> int { return true; }");
        assert!(handler.has_errors());
    }

    #[test]
    fn struct_attribute_access_resolves_field_type() {
        let source = "\
            struct Point { int x; double y; }\n\
            func f() -> void { Point p = (1, 2.0); double d = p.y; }\n";
        let (_p, _ctx, handler, _t) = analyze_source(source);
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
    }

    #[test]
    fn unknown_field_is_undefined() {
        let source = "\
            struct Point { int x; }\n\
            func f() -> void { Point p = (1); int z = p.nope; }\n";
        let (_p, _ctx, handler, _t) = analyze_source(source);
        assert!(handler.has_errors());
    }

    #[test]
    fn struct_initialization_checks_fields_positionally() {
        let ok = "struct P { int x; double y; } P p = (1, 2.0);";
        let (_p, _ctx, handler, _t) = analyze_source(ok);
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let bad_arity = "struct P { int x; double y; } P p = (1);";
        let (_p, _ctx, handler, _t) = analyze_source(bad_arity);
        assert!(handler.has_errors());

        let bad_type = "struct P { int x; bool y; } P p = (1, 2);";
        let (_p, _ctx, handler, _t) = analyze_source(bad_type);
        assert!(handler.has_errors());
    }

    #[test]
    fn array_initialization_coerces_elements() {
        let (_p, _ctx, handler, _t) = analyze_source("double a[2] = (1, 2.5);");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let (_p, _ctx, handler, _t) = analyze_source("int a[2] = (1, 2, 3);");
        assert!(handler.has_errors());
    }

    #[test]
    fn array_access_requires_int_index() {
        let (_p, _ctx, handler, _t) =
            analyze_source("func f() -> void { int a[2]; int x = a[true]; }");
        assert!(handler.has_errors());
    }

    #[test]
    fn method_body_sees_attributes_and_this() {
        let source = "\
            struct P {\n\
              int x;\n\
              func get() -> int { return x; }\n\
              func get_this() -> int { return this.x; }\n\
            }\n";
        let (_p, _ctx, handler, _t) = analyze_source(source);
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
    }

    #[test]
    fn undeclared_type_in_declaration_is_undefined() {
        let (_p, _ctx, handler, _t) = analyze_source("Missing x;");
        assert!(handler.has_errors());
    }
}
