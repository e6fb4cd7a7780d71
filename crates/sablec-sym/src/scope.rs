//! The lexically nested scope tree.
//!
//! A [`Scope`] owns its symbols and its child scopes; the parent link is
//! weak so the tree forms no reference cycles. AST nodes keep [`WeakScope`]
//! references to the scope they were parsed in, which stay valid because
//! leaving a scope never drops it: `pop` just returns the parent.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sablec_util::FxHashMap;

use crate::symbol::{Symbol, SymbolKind};
use crate::types::{PrimitiveKind, TypeStore};

/// Shared handle to a scope.
pub type ScopeRef = Rc<RefCell<Scope>>;

/// Non-owning handle to a scope, held by AST nodes.
pub type WeakScope = Weak<RefCell<Scope>>;

/// One lexical scope: a symbol table plus tree links.
#[derive(Debug, Default)]
pub struct Scope {
    symbols: FxHashMap<String, Rc<Symbol>>,
    children: Vec<ScopeRef>,
    parent: WeakScope,
}

impl Scope {
    /// Creates a detached root scope with no symbols.
    pub fn root() -> ScopeRef {
        Rc::new(RefCell::new(Scope::default()))
    }

    /// Creates the top-level scope of a compilation, bootstrapped with the
    /// six primitive type symbols.
    pub fn root_with_primitives(store: &TypeStore) -> ScopeRef {
        let root = Self::root();

        for kind in PrimitiveKind::ALL {
            let symbol = Symbol::type_symbol(kind.identifier(), store.primitive(kind));
            // Fresh scope, distinct identifiers: insertion cannot collide.
            let _ = Self::insert(&root, symbol);
        }

        root
    }

    /// Creates a child scope linked under `parent` and returns it. The
    /// parent retains ownership.
    pub fn push_child(parent: &ScopeRef) -> ScopeRef {
        let child = Rc::new(RefCell::new(Scope {
            symbols: FxHashMap::default(),
            children: Vec::new(),
            parent: Rc::downgrade(parent),
        }));

        parent.borrow_mut().children.push(Rc::clone(&child));
        child
    }

    /// Returns the parent scope, or `None` at the root. The scope being
    /// left is retained; AST nodes still reference it.
    pub fn pop(scope: &ScopeRef) -> Option<ScopeRef> {
        scope.borrow().parent.upgrade()
    }

    /// Inserts a symbol into `scope`.
    ///
    /// Fails if the name already exists *in this scope*, returning the
    /// previously defined symbol; the first definition is kept. Shadowing
    /// an outer scope is allowed.
    pub fn insert(scope: &ScopeRef, symbol: Rc<Symbol>) -> Result<(), Rc<Symbol>> {
        let mut scope = scope.borrow_mut();
        let name = symbol.name().to_string();

        if let Some(existing) = scope.symbols.get(&name) {
            return Err(Rc::clone(existing));
        }

        scope.symbols.insert(name, symbol);
        Ok(())
    }

    /// Looks up `name`, walking parent links innermost-first.
    pub fn lookup(scope: &ScopeRef, name: &str) -> Option<Rc<Symbol>> {
        let mut current = Rc::clone(scope);

        loop {
            if let Some(symbol) = current.borrow().symbols.get(name) {
                return Some(Rc::clone(symbol));
            }

            let parent = current.borrow().parent.upgrade();
            match parent {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Looks up `name` in this scope only, without walking parents.
    pub fn lookup_local(scope: &ScopeRef, name: &str) -> Option<Rc<Symbol>> {
        scope.borrow().symbols.get(name).map(Rc::clone)
    }

    /// True if `name` resolves to a type symbol from this scope.
    pub fn resolves_to_type(scope: &ScopeRef, name: &str) -> bool {
        Self::lookup(scope, name).is_some_and(|s| s.kind() == SymbolKind::Type)
    }

    /// Number of symbols defined directly in this scope.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The child scopes, in creation order.
    pub fn children(&self) -> &[ScopeRef] {
        &self.children
    }
}
