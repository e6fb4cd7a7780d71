//! sablec-sym - Types, Symbols, and Scopes
//!
//! This crate holds the structural type system, the interning type store,
//! and the lexically nested symbol table the rest of the front end shares.
//!
//! It sits *below* the parser in the crate graph, which is unusual for a
//! symbol crate but forced by the grammar: `Type name` only parses as a
//! declaration when `Type` resolves to a type symbol in the current scope,
//! so the parser must build and consult scopes while it runs. Parsing and
//! scoping cannot be separated into independent passes.
//!
//! # Interning
//!
//! Types are structural and interned: the [`TypeStore`] keeps at most one
//! instance per equivalence class, keyed by the type's mangled name, and
//! hands out shared [`Rc<Type>`] references. Two store-issued handles are
//! pointer-equal exactly when their types are structurally equal, which
//! makes the analyzer's many type comparisons cheap.
//!
//! # Shared state
//!
//! Nothing in this crate is global. A [`Context`] bundles the type store
//! and the bootstrapped root scope for one compilation; concurrent
//! compilations each get their own.

pub mod context;
pub mod scope;
pub mod symbol;
pub mod types;

pub use context::Context;
pub use scope::{Scope, ScopeRef, WeakScope};
pub use symbol::{Symbol, SymbolKind};
pub use types::{PrimitiveKind, Type, TypeStore};
