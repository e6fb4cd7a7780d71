//! Top-level productions: declarations, function and struct definitions,
//! imports, and exports.
//!
//! Only these are accepted at program scope; free expressions and control
//! flow are body-only.

use std::rc::Rc;

use indexmap::IndexMap;
use sablec_lex::TokenKind;
use sablec_sym::{Scope, Symbol, Type};
use sablec_util::{FrontendError, FrontendResult, Position};

use crate::ast::{FunctionDef, Param, Stmt, StmtKind, StructDef};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses one top-level statement.
    pub(crate) fn parse_top_level(&mut self) -> FrontendResult<Stmt> {
        match self.peek_kind() {
            TokenKind::Import => self.parse_import(),
            TokenKind::Export => self.parse_export(),
            TokenKind::Func => {
                let func = self.parse_function_def(None)?;
                let pos = func.pos;
                Ok(self.mk_stmt(StmtKind::FunctionDef(func), pos))
            }
            TokenKind::Struct => self.parse_struct_def(),
            TokenKind::Ident => {
                let ty_token = self.advance();
                if self.check(TokenKind::Ident) {
                    self.parse_declaration_like(ty_token.lexeme, ty_token.pos)
                } else {
                    Err(self.unexpected())
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Parses the remainder of a declaration-family statement after its
    /// leading type name: plain declaration, initialization, array
    /// declaration/initialization, or struct initialization.
    ///
    /// Which one it is depends on the trailing tokens *and* on what
    /// `ty_name` resolves to in the current scope; this is the
    /// context-sensitive corner of the grammar.
    pub(crate) fn parse_declaration_like(
        &mut self,
        ty_name: String,
        pos: Position,
    ) -> FrontendResult<Stmt> {
        let name_token = self.expect(TokenKind::Ident)?;
        let name = name_token.lexeme;

        if self.eat(TokenKind::LBracket).is_some() {
            return self.parse_array_declaration_rest(ty_name, name, name_token.pos, pos);
        }

        if self.eat(TokenKind::Assign).is_some() {
            let declared = self.resolve_type_name(&ty_name);
            let value = self.parse_expr()?;
            self.expect(TokenKind::Semi)?;

            self.declare_variable(&name, Rc::clone(&declared), name_token.pos);

            // `Struct name = (...)` initializes a struct; anything else is
            // a plain initialization.
            let kind = if declared.is_struct() {
                StmtKind::StructInitialization {
                    ty_name,
                    name,
                    values: value,
                }
            } else {
                StmtKind::Initialization {
                    ty_name,
                    name,
                    value,
                }
            };
            return Ok(self.mk_stmt(kind, pos));
        }

        self.expect(TokenKind::Semi)?;

        let declared = self.resolve_type_name(&ty_name);
        self.declare_variable(&name, declared, name_token.pos);

        Ok(self.mk_stmt(StmtKind::Declaration { ty_name, name }, pos))
    }

    /// Parses `[N] ;` or `[N] = values ;` after `Type name`.
    fn parse_array_declaration_rest(
        &mut self,
        ty_name: String,
        name: String,
        name_pos: Position,
        pos: Position,
    ) -> FrontendResult<Stmt> {
        let size_token = self.expect(TokenKind::IntLit)?;
        let size: usize = size_token.lexeme.parse().map_err(|_| {
            FrontendError::UnexpectedToken {
                found: format!("'{}'", size_token.lexeme),
                pos: size_token.pos,
            }
        })?;
        self.expect(TokenKind::RBracket)?;

        if size == 0 {
            self.handler
                .error("array element count must be strictly positive", size_token.pos);
        }

        let elem = self.resolve_type_name(&ty_name);
        // Interned array types keep the strictly-positive invariant even
        // after the zero-length error above.
        let array_ty = self.ctx.types.get_or_intern(Type::Array {
            elem,
            len: size.max(1),
        });

        if self.eat(TokenKind::Assign).is_some() {
            let values = self.parse_array_initializer()?;
            self.expect(TokenKind::Semi)?;

            self.declare_variable(&name, array_ty, name_pos);
            return Ok(self.mk_stmt(
                StmtKind::ArrayInitialization {
                    ty_name,
                    name,
                    size,
                    values,
                },
                pos,
            ));
        }

        self.expect(TokenKind::Semi)?;
        self.declare_variable(&name, array_ty, name_pos);

        Ok(self.mk_stmt(
            StmtKind::ArrayDeclaration {
                ty_name,
                name,
                size,
            },
            pos,
        ))
    }

    // =========================================================================
    // Function definitions
    // =========================================================================

    /// Parses `func name ( params ) -> ret { body }`.
    ///
    /// With `method_of` set, the definition is a struct method: the symbol
    /// goes into the member scope under its plain name (kind `Method`) and
    /// an implicit `this` variable typed as the struct is inserted into the
    /// function scope.
    pub(crate) fn parse_function_def(
        &mut self,
        method_of: Option<&Rc<Type>>,
    ) -> FrontendResult<FunctionDef> {
        let func_token = self.expect(TokenKind::Func)?;
        let name = self.expect(TokenKind::Ident)?.lexeme;

        self.expect(TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Arrow)?;
        let ret_ty_name = self.expect(TokenKind::Ident)?.lexeme;

        // Resolve the signature in the enclosing scope before opening the
        // function scope.
        let param_tys: Vec<Rc<Type>> = params
            .iter()
            .map(|p| self.resolve_type_name(&p.ty_name))
            .collect();
        let ret_ty = self.resolve_type_name(&ret_ty_name);
        let fn_ty = self.ctx.types.get_or_intern(Type::Function {
            ret: ret_ty,
            params: param_tys.clone(),
        });

        let fn_scope = self.push_scope();

        if let Some(struct_ty) = method_of {
            let this = Symbol::variable("this", Rc::clone(struct_ty));
            // The function scope is fresh; "this" cannot collide.
            let _ = Scope::insert(&fn_scope, this);
        }

        for (param, ty) in params.iter().zip(&param_tys) {
            self.declare_variable(&param.name, Rc::clone(ty), param.pos);
        }

        let body = match self.parse_block() {
            Ok(body) => body,
            Err(err) => {
                self.pop_scope();
                return Err(err);
            }
        };

        self.pop_scope();

        // Register the symbol in the scope the definition appears in.
        let symbol = match method_of {
            Some(_) => Symbol::method(&name, fn_ty),
            None => Symbol::function(&name, fn_ty),
        };
        let symbol_name = symbol.name().to_string();
        if Scope::insert(&self.current_scope(), symbol).is_err() {
            self.report(FrontendError::Redefinition {
                name: symbol_name,
                pos: func_token.pos,
            });
        }

        Ok(FunctionDef {
            name,
            params,
            ret_ty_name,
            body,
            scope: Rc::downgrade(&fn_scope),
            pos: func_token.pos,
        })
    }

    /// Parses a comma-separated list of `Type name` parameters; the list
    /// may be empty.
    fn parse_param_list(&mut self) -> FrontendResult<Vec<Param>> {
        let mut params = Vec::new();

        if self.check(TokenKind::RParen) {
            return Ok(params);
        }

        loop {
            let ty_token = self.expect(TokenKind::Ident)?;
            let name_token = self.expect(TokenKind::Ident)?;
            params.push(Param {
                ty_name: ty_token.lexeme,
                name: name_token.lexeme,
                pos: ty_token.pos,
            });

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        Ok(params)
    }

    // =========================================================================
    // Struct definitions
    // =========================================================================

    /// Parses `struct Name { attributes methods }`.
    ///
    /// Attributes precede methods. The struct type is interned and its type
    /// symbol inserted into the enclosing scope as soon as the attributes
    /// are known, so method signatures can mention the struct itself.
    pub(crate) fn parse_struct_def(&mut self) -> FrontendResult<Stmt> {
        let struct_token = self.expect(TokenKind::Struct)?;
        let name = self.expect(TokenKind::Ident)?.lexeme;
        self.expect(TokenKind::LBrace)?;

        let enclosing = self.current_scope();
        let member_scope = self.push_scope();

        let mut attributes = Vec::new();
        while self.check(TokenKind::Ident) {
            match self.parse_struct_attribute() {
                Ok(attr) => attributes.push(attr),
                Err(err) => {
                    self.report(err);
                    self.recover();
                }
            }
        }

        let mut fields = IndexMap::new();
        for attr in &attributes {
            let ty = self.resolve_type_name(&attr.ty_name);
            fields.insert(attr.name.clone(), ty);
        }

        // A redefined struct name must not reach the type store: the store
        // keys structs by name, and a second body under the same key would
        // violate interning. The first definition wins; this one gets a
        // private, un-interned type so its methods still parse.
        let redefined = Scope::lookup_local(&enclosing, &name).is_some();
        let struct_ty = if redefined {
            self.report(FrontendError::Redefinition {
                name: name.clone(),
                pos: struct_token.pos,
            });
            Rc::new(Type::Struct {
                name: name.clone(),
                fields,
            })
        } else {
            let ty = self.ctx.types.get_or_intern(Type::Struct {
                name: name.clone(),
                fields,
            });
            // lookup_local above ruled out a collision.
            let _ = Scope::insert(&enclosing, Symbol::type_symbol(&name, Rc::clone(&ty)));
            ty
        };

        for attr in &attributes {
            let ty = self.resolve_type_name(&attr.ty_name);
            self.declare_variable(&attr.name, ty, attr.pos);
        }

        let mut methods = Vec::new();
        while self.check(TokenKind::Func) {
            match self.parse_function_def(Some(&struct_ty)) {
                Ok(method) => methods.push(method),
                Err(err) => {
                    self.report(err);
                    self.recover();
                }
            }
        }

        let result = self.expect(TokenKind::RBrace);
        self.pop_scope();
        result?;

        Ok(self.mk_stmt(
            StmtKind::StructDef(StructDef {
                name,
                attributes,
                methods,
                scope: Rc::downgrade(&member_scope),
                pos: struct_token.pos,
            }),
            struct_token.pos,
        ))
    }

    /// Parses one `Type name ;` attribute inside a struct body.
    fn parse_struct_attribute(&mut self) -> FrontendResult<Param> {
        let ty_token = self.expect(TokenKind::Ident)?;
        let name_token = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Semi)?;

        Ok(Param {
            ty_name: ty_token.lexeme,
            name: name_token.lexeme,
            pos: ty_token.pos,
        })
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    /// Parses `import ns1::ns2::...::name ;`. The final identifier is the
    /// imported value; the identifiers before it form its namespace path.
    fn parse_import(&mut self) -> FrontendResult<Stmt> {
        let import_token = self.expect(TokenKind::Import)?;

        let mut namespaces = Vec::new();
        let mut current = self.expect(TokenKind::Ident)?.lexeme;

        while self.eat(TokenKind::PathSep).is_some() {
            namespaces.push(current);
            current = self.expect(TokenKind::Ident)?.lexeme;
        }

        self.expect(TokenKind::Semi)?;

        Ok(self.mk_stmt(
            StmtKind::Import {
                namespaces,
                value: current,
            },
            import_token.pos,
        ))
    }

    /// Parses `export name ;` or `export { a, b, ... } ;`.
    fn parse_export(&mut self) -> FrontendResult<Stmt> {
        let export_token = self.expect(TokenKind::Export)?;

        let mut names = Vec::new();

        if self.eat(TokenKind::LBrace).is_some() {
            names.push(self.expect(TokenKind::Ident)?.lexeme);
            while self.eat(TokenKind::Comma).is_some() {
                names.push(self.expect(TokenKind::Ident)?.lexeme);
            }
            self.expect(TokenKind::RBrace)?;
        } else {
            names.push(self.expect(TokenKind::Ident)?.lexeme);
        }

        self.expect(TokenKind::Semi)?;

        Ok(self.mk_stmt(StmtKind::Export { names }, export_token.pos))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ExprKind, StmtKind};
    use crate::tests::parse_source;
    use sablec_sym::{Scope, SymbolKind};

    #[test]
    fn function_definition_registers_symbol_and_params() {
        let (program, ctx, handler) =
            parse_source("func add(int a, int b) -> int { return a + b; }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert_eq!(program.stmts.len(), 1);

        let StmtKind::FunctionDef(func) = &program.stmts[0].kind else {
            panic!("expected function definition");
        };
        assert_eq!(func.name, "add");
        assert_eq!(func.params.len(), 2);

        let symbol = Scope::lookup(&ctx.root, "add$int$int").unwrap();
        assert_eq!(symbol.kind(), SymbolKind::Function);
        assert_eq!(symbol.ty().mangled_name(), "fn(int,int)->int");

        // Parameters live in the function scope, not at top level.
        assert!(Scope::lookup(&ctx.root, "a").is_none());
        let fn_scope = func.scope.upgrade().unwrap();
        assert!(Scope::lookup(&fn_scope, "a").is_some());
    }

    #[test]
    fn overloaded_functions_get_distinct_symbols() {
        let (_, ctx, handler) = parse_source(
            "func f(int a) -> int { return a; } func f(double a) -> double { return a; }",
        );
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let a = Scope::lookup(&ctx.root, "f$int").unwrap();
        let b = Scope::lookup(&ctx.root, "f$double").unwrap();
        assert_eq!(a.kind(), SymbolKind::Function);
        assert_eq!(b.kind(), SymbolKind::Function);
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn struct_definition_creates_type_symbol() {
        let (program, ctx, handler) = parse_source("struct Point { int x; int y; }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let StmtKind::StructDef(def) = &program.stmts[0].kind else {
            panic!("expected struct definition");
        };
        assert_eq!(def.name, "Point");
        assert_eq!(def.attributes.len(), 2);
        assert!(def.methods.is_empty());

        let symbol = Scope::lookup(&ctx.root, "Point").unwrap();
        assert_eq!(symbol.kind(), SymbolKind::Type);
        assert!(symbol.ty().is_struct());
        assert_eq!(symbol.ty().field_index("y"), Some(1));
    }

    #[test]
    fn struct_methods_are_members_not_top_level() {
        let (program, ctx, handler) =
            parse_source("struct P { int x; func get() -> int { return x; } }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let StmtKind::StructDef(def) = &program.stmts[0].kind else {
            panic!("expected struct definition");
        };
        assert_eq!(def.methods.len(), 1);
        assert_eq!(def.methods[0].name, "get");

        // The method symbol lives in the member scope.
        assert!(Scope::lookup(&ctx.root, "get").is_none());
        let members = def.scope.upgrade().unwrap();
        let method = Scope::lookup(&members, "get").unwrap();
        assert_eq!(method.kind(), SymbolKind::Method);

        // Method bodies see an implicit `this` typed as the struct.
        let method_scope = def.methods[0].scope.upgrade().unwrap();
        let this = Scope::lookup(&method_scope, "this").unwrap();
        assert_eq!(this.ty().mangled_name(), "P");
    }

    #[test]
    fn struct_variable_initialization_is_recognized() {
        let (program, _ctx, handler) =
            parse_source("struct Point { int x; int y; } Point p = (1, 2);");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        match &program.stmts[1].kind {
            StmtKind::StructInitialization {
                ty_name,
                name,
                values,
            } => {
                assert_eq!(ty_name, "Point");
                assert_eq!(name, "p");
                assert!(matches!(&values.kind, ExprKind::ArgList(args) if args.len() == 2));
            }
            other => panic!("expected struct initialization, got {:?}", other),
        }
    }

    #[test]
    fn array_declaration_and_initialization() {
        let (program, ctx, handler) =
            parse_source("int a[3]; int b[2] = (1, 2); int c[2] = { 3, 4 };");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        assert!(matches!(
            program.stmts[0].kind,
            StmtKind::ArrayDeclaration { size: 3, .. }
        ));
        assert!(matches!(
            program.stmts[1].kind,
            StmtKind::ArrayInitialization { size: 2, .. }
        ));

        let a = Scope::lookup(&ctx.root, "a").unwrap();
        assert_eq!(a.ty().mangled_name(), "int[3]");

        let StmtKind::ArrayInitialization { values, .. } = &program.stmts[2].kind else {
            panic!("expected array initialization");
        };
        assert!(matches!(&values.kind, ExprKind::ArrayLit(v) if v.len() == 2));
    }

    #[test]
    fn struct_redefinition_is_reported_and_first_wins() {
        let (_program, ctx, handler) =
            parse_source("struct P { int x; } struct P { double y; }");
        assert_eq!(handler.error_count(), 1);

        let symbol = Scope::lookup(&ctx.root, "P").unwrap();
        assert_eq!(symbol.ty().field_index("x"), Some(0));
        assert_eq!(symbol.ty().field_index("y"), None);
    }

    #[test]
    fn zero_length_array_is_rejected() {
        let (_program, _ctx, handler) = parse_source("int a[0];");
        assert!(handler.has_errors());
    }

    #[test]
    fn import_path_splits_namespaces_from_value() {
        let (program, _ctx, handler) = parse_source("import std::io::print;");
        assert!(!handler.has_errors());

        match &program.stmts[0].kind {
            StmtKind::Import { namespaces, value } => {
                assert_eq!(namespaces, &["std", "io"]);
                assert_eq!(value, "print");
            }
            other => panic!("expected import, got {:?}", other),
        }
    }

    #[test]
    fn export_single_and_grouped() {
        let (program, _ctx, handler) = parse_source("export a; export { b, c };");
        assert!(!handler.has_errors());

        assert!(matches!(
            &program.stmts[0].kind,
            StmtKind::Export { names } if names == &["a".to_string()]
        ));
        assert!(matches!(
            &program.stmts[1].kind,
            StmtKind::Export { names } if names.len() == 2
        ));
    }

    #[test]
    fn import_without_identifier_is_an_error() {
        let (_program, _ctx, handler) = parse_source("import ;");
        assert!(handler.has_errors());
    }
}
