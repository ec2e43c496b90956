//! Integration tests for the whole front end.
//!
//! These tests drive the complete pipeline - tokenization, parsing and
//! semantic analysis - over source strings and check the verdict or the
//! rendered diagnostics.

use rillc::{
    errors::errors::Diagnostics,
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::analyze,
};

fn check(source: &str) -> Result<(), String> {
    let tokens = tokenize(source.to_string());
    let mut ast = parse(tokens).map_err(|error| error.to_string())?;
    analyze(&mut ast).map_err(|diagnostics: Diagnostics| diagnostics.to_string())
}

#[test]
fn test_valid_program_passes() {
    let source = "
        var counter: int;
        array samples: float[8];

        func average(count: int): float {
            var sum: float;
            var i: int;
            let sum = 0.0;
            let i = 0;
            while i < count {
                let sum = sum + samples[i];
                let i = i + 1;
            }
            return sum;
        }

        func main(): void {
            let counter = ::readInt();
            let samples[0] = ::readFloat();
            ::printFloat(::average(1));
            ::println();
        }
    ";
    assert_eq!(check(source), Ok(()));
}

#[test]
fn test_syntax_error_aborts_with_one_message() {
    let source = "func main(): void { let x 1; }";
    let rendered = check(source).unwrap_err();
    assert!(rendered.starts_with("SyntaxError(1,27)"));
    assert!(rendered.contains("Expected Assign but got Integer."));
    // Abort-on-first: a single line, even though the program has more
    // problems after the bad token.
    assert_eq!(rendered.lines().count(), 1);
}

#[test]
fn test_semantic_errors_are_aggregated_in_order() {
    let source = "\
var x: int;
func main(): void {
    let x = true;
    ::undefined();
    var y: void;
}
";
    let rendered = check(source).unwrap_err();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("TypeError(3,"));
    assert!(lines[0].contains("Cannot assign bool to int."));
    assert!(lines[1].starts_with("ResolveSymbolError(4,"));
    assert!(lines[1].contains("Could not resolve undefined."));
    assert!(lines[2].starts_with("TypeError(5,"));
}

#[test]
fn test_missing_entry_point() {
    let source = "
        func helper(): int {
            return 3;
        }
    ";
    let rendered = check(source).unwrap_err();
    assert_eq!(rendered.lines().count(), 1);
    assert!(rendered.contains("MissingEntryPoint"));
    assert!(rendered.contains("Doesn't have main."));
}

#[test]
fn test_unscannable_character_surfaces_as_syntax_error() {
    let rendered = check("func main(): void { let x = 1 $ 2; }").unwrap_err();
    assert!(rendered.starts_with("SyntaxError"));
    assert!(rendered.contains("but got Error."));
}

#[test]
fn test_multi_dimension_arrays_round_trip() {
    let source = "
        array board: int[9][9];

        func main(): void {
            let board[4][4] = 5;
            ::printInt(board[4][4]);
        }
    ";
    assert_eq!(check(source), Ok(()));
}

#[test]
fn test_comparison_is_not_chainable() {
    let rendered = check("func main(): void { if 1 < 2 < 3 { } }").unwrap_err();
    assert!(rendered.starts_with("SyntaxError"));
}

#[test]
fn test_shadowing_across_function_boundaries() {
    let source = "
        var value: int;

        func value_of(value: float): float {
            return value;
        }

        func main(): void {
            let value = 1;
        }
    ";
    assert_eq!(check(source), Ok(()));
}

#[test]
fn test_exact_diagnostics_rendering() {
    let source = "\
func main(): int {
}
";
    let rendered = check(source).unwrap_err();
    assert_eq!(
        rendered,
        "TypeError(1,1)[Function main must take no parameters and return void.]\n\
         MissingEntryPoint(1,1)[Doesn't have main.]"
    );
}

#[test]
fn test_recursion_is_allowed() {
    // A function can call itself: its name is declared in the enclosing
    // scope before the body is visited.
    let source = "
        func countdown(n: int): int {
            if n < 1 {
                return 0;
            } else {
                return ::countdown(n - 1);
            }
        }

        func main(): void {
            ::printInt(::countdown(10));
        }
    ";
    assert_eq!(check(source), Ok(()));
}
