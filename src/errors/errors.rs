use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::TypeMismatch, Position};

/// One error record: what went wrong and where.
///
/// Renders as `Name(line,column)[message]`, e.g.
/// `SyntaxError(2,5)[Expected Semicolon but got Identifier.]`.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    position: Position,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: Position) -> Self {
        Diagnostic { kind, position }
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            DiagnosticKind::Syntax { .. } => "SyntaxError",
            DiagnosticKind::DeclareSymbol { .. } => "DeclareSymbolError",
            DiagnosticKind::ResolveSymbol { .. } => "ResolveSymbolError",
            DiagnosticKind::Type(_) => "TypeError",
            DiagnosticKind::MissingEntryPoint => "MissingEntryPoint",
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({},{})[{}]",
            self.name(),
            self.position.line,
            self.position.column,
            self.kind
        )
    }
}

#[derive(Error, Debug, Clone)]
pub enum DiagnosticKind {
    #[error("Expected {expected} but got {found}.")]
    Syntax { expected: String, found: String },
    #[error("{name} is already declared in this scope.")]
    DeclareSymbol { name: String },
    #[error("Could not resolve {name}.")]
    ResolveSymbol { name: String },
    #[error(transparent)]
    Type(#[from] TypeMismatch),
    #[error("Doesn't have main.")]
    MissingEntryPoint,
}

/// Append-only, ordered collection of diagnostics. The analyzer pushes into
/// one of these instead of aborting, so a single pass reports every
/// independent defect it finds.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { errors: vec![] }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter()
    }
}

impl Display for Diagnostics {
    /// One diagnostic per line, in discovery order, no trailing newline.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}
