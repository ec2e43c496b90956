//! Error types and diagnostics for the front end.
//!
//! This module defines:
//!
//! - Diagnostic records with source position information
//! - Specific diagnostic kinds for each compilation phase
//! - The ordered diagnostics collector the analyzer appends into
//! - Rendering of collected diagnostics as text

pub mod errors;

#[cfg(test)]
mod tests;
