//! Unit tests for diagnostic records and rendering.

use super::errors::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::ast::types::{StaticType, TypeMismatch};
use crate::Position;

#[test]
fn test_diagnostic_names() {
    let cases = [
        (
            DiagnosticKind::Syntax {
                expected: "Semicolon".to_string(),
                found: "Identifier".to_string(),
            },
            "SyntaxError",
        ),
        (
            DiagnosticKind::DeclareSymbol {
                name: "x".to_string(),
            },
            "DeclareSymbolError",
        ),
        (
            DiagnosticKind::ResolveSymbol {
                name: "foo".to_string(),
            },
            "ResolveSymbolError",
        ),
        (DiagnosticKind::Type(TypeMismatch::Entrance), "TypeError"),
        (DiagnosticKind::MissingEntryPoint, "MissingEntryPoint"),
    ];
    for (kind, name) in cases {
        assert_eq!(Diagnostic::new(kind, Position::null()).name(), name);
    }
}

#[test]
fn test_diagnostic_display_format() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::Syntax {
            expected: "Semicolon".to_string(),
            found: "Identifier".to_string(),
        },
        Position::new(2, 5),
    );
    assert_eq!(
        diagnostic.to_string(),
        "SyntaxError(2,5)[Expected Semicolon but got Identifier.]"
    );
}

#[test]
fn test_type_mismatch_conversion() {
    let mismatch = TypeMismatch::Assignment {
        target: StaticType::Int,
        src: StaticType::Bool,
    };
    let diagnostic = Diagnostic::new(DiagnosticKind::from(mismatch), Position::new(7, 9));
    assert_eq!(diagnostic.name(), "TypeError");
    assert_eq!(
        diagnostic.to_string(),
        "TypeError(7,9)[Cannot assign bool to int.]"
    );
}

#[test]
fn test_diagnostics_render_newline_joined() {
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());

    diagnostics.add(Diagnostic::new(
        DiagnosticKind::ResolveSymbol {
            name: "foo".to_string(),
        },
        Position::new(1, 3),
    ));
    diagnostics.add(Diagnostic::new(
        DiagnosticKind::MissingEntryPoint,
        Position::new(1, 1),
    ));

    assert_eq!(diagnostics.len(), 2);
    let rendered = diagnostics.to_string();
    assert_eq!(
        rendered,
        "ResolveSymbolError(1,3)[Could not resolve foo.]\nMissingEntryPoint(1,1)[Doesn't have main.]"
    );
    assert!(!rendered.ends_with('\n'));
}
