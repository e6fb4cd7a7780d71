//! Symbols: named entities held by scopes.
//!
//! A symbol binds a name to a type with a kind tag saying what the name
//! refers to. Function symbols are stored under a mangled name derived from
//! their parameter types, which is what makes overloading work at the
//! symbol-table level.

use std::fmt;
use std::rc::Rc;

use crate::types::Type;

/// What a name refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// A type name (primitive, struct, or an interned structural type).
    Type,
    /// A variable binding.
    Variable,
    /// A free function.
    Function,
    /// A compile-time constant.
    Constant,
    /// A struct method, prior to extraction into a free function.
    Method,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Type => write!(f, "type"),
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Constant => write!(f, "constant"),
            SymbolKind::Method => write!(f, "method"),
        }
    }
}

/// A named entity in some scope.
///
/// Symbols are immutable once created and shared by `Rc`; the defining
/// scope owns the canonical reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    kind: SymbolKind,
    name: String,
    ty: Rc<Type>,
}

impl Symbol {
    /// Creates a type symbol.
    pub fn type_symbol(name: impl Into<String>, ty: Rc<Type>) -> Rc<Symbol> {
        Rc::new(Symbol {
            kind: SymbolKind::Type,
            name: name.into(),
            ty,
        })
    }

    /// Creates a variable symbol.
    pub fn variable(name: impl Into<String>, ty: Rc<Type>) -> Rc<Symbol> {
        Rc::new(Symbol {
            kind: SymbolKind::Variable,
            name: name.into(),
            ty,
        })
    }

    /// Creates a constant symbol.
    pub fn constant(name: impl Into<String>, ty: Rc<Type>) -> Rc<Symbol> {
        Rc::new(Symbol {
            kind: SymbolKind::Constant,
            name: name.into(),
            ty,
        })
    }

    /// Creates a function symbol. `ty` must be a function type; the stored
    /// name is the mangled form of `base_name` over the parameter types.
    pub fn function(base_name: &str, ty: Rc<Type>) -> Rc<Symbol> {
        let name = match ty.param_types() {
            Some(params) => Self::mangle_function_name(base_name, params),
            None => base_name.to_string(),
        };

        Rc::new(Symbol {
            kind: SymbolKind::Function,
            name,
            ty,
        })
    }

    /// Creates a method symbol. Methods keep their plain name; they are
    /// mangled when extraction turns them into free functions.
    pub fn method(name: impl Into<String>, ty: Rc<Type>) -> Rc<Symbol> {
        Rc::new(Symbol {
            kind: SymbolKind::Method,
            name: name.into(),
            ty,
        })
    }

    /// Mangles a function name over its parameter types.
    ///
    /// Each parameter contributes its full mangled type name, joined with
    /// `$`: `f(int a, double b)` becomes `f$int$double`. `$` cannot occur
    /// in a source identifier, so mangled names never collide with plain
    /// names, and distinct parameter-type sequences always produce
    /// distinct mangled names.
    pub fn mangle_function_name(base_name: &str, params: &[Rc<Type>]) -> String {
        let mut mangled = base_name.to_string();
        for param in params {
            mangled.push('$');
            mangled.push_str(&param.mangled_name());
        }
        mangled
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// The name this symbol is stored under (mangled for functions).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The symbol's type. For variables this is the declared type; for
    /// functions, the function type itself.
    pub fn ty(&self) -> Rc<Type> {
        Rc::clone(&self.ty)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.name, self.ty)
    }
}
