//! Parser module for building the Abstract Syntax Tree.
//!
//! The parser is a recursive-descent implementation of an LL(1) grammar:
//! a single token of lookahead, `accept` consuming on match and `expect`
//! aborting on mismatch. It handles:
//!
//! - Declaration parsing (variables, arrays, function definitions)
//! - Statement parsing (assignment, call, if, while, return)
//! - Expression parsing with precedence resolved by on-the-fly
//!   restructuring of the left subtree
//! - Folding of multi-dimension array declarations into nested array types
//!
//! Parsing is not error-recovering: the first mismatch aborts the parse
//! with exactly one syntax diagnostic and no partial tree.

pub mod parser;

#[cfg(test)]
mod tests;
