//! The per-compilation context.

use crate::scope::{Scope, ScopeRef};
use crate::types::TypeStore;

/// Bundles the mutable shared state of one compilation: the type store and
/// the root scope. Threaded explicitly through the parser and analyzer so
/// concurrent compilations never share state.
#[derive(Debug)]
pub struct Context {
    /// The interning type store.
    pub types: TypeStore,
    /// The top-level scope, bootstrapped with the primitive type symbols.
    pub root: ScopeRef,
}

impl Context {
    /// Creates a fresh context with interned primitives and a bootstrapped
    /// root scope.
    pub fn new() -> Self {
        let types = TypeStore::new();
        let root = Scope::root_with_primitives(&types);
        Self { types, root }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_contexts_do_not_share_stores() {
        let mut a = Context::new();
        let b = Context::new();

        let int = a.types.primitive(crate::PrimitiveKind::Int);
        a.types.get_or_intern(crate::Type::Array { elem: int, len: 2 });

        assert_eq!(a.types.len(), 7);
        assert_eq!(b.types.len(), 6);
    }

    #[test]
    fn root_scope_knows_primitives() {
        let ctx = Context::new();
        assert!(Scope::lookup(&ctx.root, "int").is_some());
        assert!(Scope::lookup(&ctx.root, "void").is_some());
    }
}
