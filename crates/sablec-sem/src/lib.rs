//! sablec-sem - Semantic Analysis
//!
//! Walks the parsed AST top-down, resolving names against the scope tree,
//! inferring a type for every expression, validating statements, and
//! rewriting the tree so every implicit numeric conversion becomes an
//! explicit cast node. After analysis, no binary expression has operands of
//! different inferred types; lowering never has to reason about coercions.
//!
//! The analyzer continues past every recoverable error - unknown names,
//! incompatible types, bad arity - annotating the offending expression as
//! `void` so one run surfaces as many diagnostics as possible. Only broken
//! internal invariants abort.
//!
//! The crate also hosts the method extraction transform, which rewrites
//! struct methods into free functions with an explicit `this` parameter to
//! simplify lowering.

pub mod analysis;
pub mod extract;

pub use analysis::{analyze, Analyzer, TypeMap};
pub use extract::extract_methods;
