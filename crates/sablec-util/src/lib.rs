//! sablec-util - Core Utilities and Foundation Types
//!
//! This crate provides the foundation every other `sablec` crate builds on:
//! source positions, the diagnostic handler, and the front-end error
//! taxonomy. It has no dependency on any compiler phase, so it sits at the
//! bottom of the crate graph.
//!
//! # Modules
//!
//! - [`pos`] - Source positions (line, column, byte offset)
//! - [`diagnostic`] - Diagnostic levels, messages, and the [`Handler`]
//! - [`error`] - Typed front-end errors ([`FrontendError`])
//!
//! # Diagnostics vs errors
//!
//! The two error-reporting mechanisms serve different audiences:
//!
//! - A [`Diagnostic`] is a user-facing report tied to a source position.
//!   Phases push diagnostics into a shared [`Handler`] and keep going, so a
//!   single compilation surfaces as many problems as possible.
//! - A [`FrontendError`] is the typed form a phase returns when a
//!   production or check cannot proceed. Callers convert it into a
//!   diagnostic at the point where the position and context are known.

pub mod diagnostic;
pub mod error;
pub mod pos;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use error::{FrontendError, FrontendResult};
pub use pos::Position;

// Re-export commonly used hash collections so downstream crates agree on
// the hasher without each naming rustc-hash.
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
