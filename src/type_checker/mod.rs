//! Semantic analysis module.
//!
//! This module performs symbol resolution and type checking on the AST in
//! a single depth-first walk:
//!
//! - Scopes are pushed and popped as the walk enters and leaves blocks
//! - Declarations and identifier references are handled before a node's
//!   children are visited
//! - Types are synthesized bottom-up after the children return
//! - Every failure is appended to a diagnostics collector; the walk never
//!   stops early, so one pass reports every independent defect
//!
//! After the walk, a missing or invalid `main` adds a final entry-point
//! diagnostic.

pub mod symbol_table;
pub mod type_checker;
