//! Method extraction.
//!
//! Lowering wants a flat list of free functions, so each struct method
//! `M` of struct `S` is rewritten into a free function `S_M` whose first
//! parameter is a synthetic `this: S`. The method's body moves over
//! unchanged: its scope already binds `this` and the original parameters,
//! so every reference keeps resolving. The new function's symbol is
//! registered (mangled) in the struct's enclosing scope, and the struct is
//! left without methods.

use std::rc::Rc;

use sablec_par::ast::{FunctionDef, Param, Program, Stmt, StmtKind, StructDef};
use sablec_par::visitor::Visitor;
use sablec_sym::{Context, Scope, ScopeRef, Symbol, SymbolKind, Type};
use sablec_util::{FrontendError, Handler};

/// Rewrites every struct method in `program` into a free function appended
/// to the program's top level.
pub fn extract_methods(program: &mut Program, ctx: &mut Context, handler: &Handler) {
    let mut extractor = MethodExtractor {
        ctx,
        handler,
        extracted: Vec::new(),
    };
    program.accept(&mut extractor);
    program.stmts.append(&mut extractor.extracted);
}

/// The extraction visitor.
struct MethodExtractor<'a> {
    ctx: &'a mut Context,
    handler: &'a Handler,
    /// Free functions produced so far, appended to the program afterwards.
    extracted: Vec<Stmt>,
}

impl<'a> MethodExtractor<'a> {
    /// Resolves a type name from inside the method's scope chain.
    fn resolve_in(&self, scope: &ScopeRef, name: &str) -> Option<Rc<Type>> {
        match Scope::lookup(scope, name) {
            Some(symbol) if symbol.kind() == SymbolKind::Type => Some(symbol.ty()),
            _ => None,
        }
    }
}

impl<'a> Visitor for MethodExtractor<'a> {
    fn visit_struct_def(&mut self, def: &mut StructDef) {
        if def.methods.is_empty() {
            return;
        }

        let member_scope = def
            .scope
            .upgrade()
            .expect("struct member scope outlived by AST");
        // The struct's type symbol lives in the scope enclosing its
        // definition; that is also where the free functions belong.
        let enclosing = match Scope::pop(&member_scope) {
            Some(scope) => scope,
            None => return,
        };

        let struct_ty = match self.resolve_in(&enclosing, &def.name) {
            Some(ty) => ty,
            None => return,
        };

        for method in def.methods.drain(..) {
            let free_name = format!("{}_{}", def.name, method.name);
            let method_scope = method
                .scope
                .upgrade()
                .expect("method scope outlived by AST");

            // `this` leads the parameter list; the method scope already
            // binds it, so body references stay valid.
            let mut params = Vec::with_capacity(method.params.len() + 1);
            params.push(Param {
                ty_name: def.name.clone(),
                name: "this".to_string(),
                pos: method.pos,
            });
            params.extend(method.params.iter().cloned());

            let mut param_tys = Vec::with_capacity(params.len());
            param_tys.push(Rc::clone(&struct_ty));
            for param in &method.params {
                let ty = self
                    .resolve_in(&method_scope, &param.ty_name)
                    .unwrap_or_else(|| self.ctx.types.primitive(sablec_sym::PrimitiveKind::Void));
                param_tys.push(ty);
            }

            let ret = self
                .resolve_in(&method_scope, &method.ret_ty_name)
                .unwrap_or_else(|| self.ctx.types.primitive(sablec_sym::PrimitiveKind::Void));

            let fn_ty = self.ctx.types.get_or_intern(Type::Function {
                ret,
                params: param_tys,
            });

            let symbol = Symbol::function(&free_name, fn_ty);
            let symbol_name = symbol.name().to_string();
            if Scope::insert(&enclosing, symbol).is_err() {
                self.handler.error(
                    FrontendError::Redefinition {
                        name: symbol_name,
                        pos: method.pos,
                    }
                    .to_string(),
                    method.pos,
                );
            }

            let func = FunctionDef {
                name: free_name,
                params,
                ret_ty_name: method.ret_ty_name,
                body: method.body,
                scope: method.scope,
                pos: method.pos,
            };

            self.extracted.push(Stmt {
                kind: StmtKind::FunctionDef(func),
                scope: Rc::downgrade(&enclosing),
                pos: method.pos,
            });
        }
    }
}
