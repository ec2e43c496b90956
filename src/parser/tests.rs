//! Unit tests for the parser module.

use super::parser::parse;
use crate::ast::ast::{Ast, NodeId, NodeKind};
use crate::ast::types::StaticType;
use crate::errors::errors::Diagnostic;
use crate::lexer::lexer::tokenize;

fn parse_source(source: &str) -> Result<Ast, Diagnostic> {
    parse(tokenize(source.to_string()))
}

// Navigates to the value expression of the first statement (an assignment)
// inside the first declared function.
fn first_assigned_value(ast: &Ast) -> NodeId {
    let function = ast.children(ast.root())[0];
    let body = ast.children(function)[0];
    let assignment = ast.children(body)[0];
    assert_eq!(ast.node(assignment).kind, NodeKind::Assignment);
    ast.children(assignment)[1]
}

#[test]
fn test_parse_empty_program() {
    let ast = parse_source("").unwrap();
    assert_eq!(ast.node(ast.root()).kind, NodeKind::DeclarationList);
    assert!(ast.children(ast.root()).is_empty());
}

#[test]
fn test_parse_variable_declaration() {
    let ast = parse_source("var x: int;").unwrap();
    let decl = ast.children(ast.root())[0];
    assert_eq!(ast.node(decl).kind, NodeKind::VariableDeclaration);
    assert_eq!(ast.node(decl).tokens[0].value, "x");
    assert_eq!(ast.ty(decl), Some(&StaticType::Int));
}

#[test]
fn test_parse_unknown_type_name() {
    let ast = parse_source("var x: quux;").unwrap();
    let decl = ast.children(ast.root())[0];
    assert_eq!(ast.ty(decl), Some(&StaticType::Unresolved("quux".to_string())));
}

#[test]
fn test_parse_array_declaration_folds_dimensions() {
    let ast = parse_source("array a: int[3][4];").unwrap();
    let decl = ast.children(ast.root())[0];
    assert_eq!(ast.node(decl).kind, NodeKind::ArrayDeclaration);
    // Outermost syntactic dimension is the outermost type layer.
    assert_eq!(
        ast.ty(decl),
        Some(&StaticType::Array {
            elem: Box::new(StaticType::Array {
                elem: Box::new(StaticType::Int),
                dim: 4,
            }),
            dim: 3,
        })
    );
}

#[test]
fn test_parse_array_declaration_rejects_zero_dimension() {
    assert!(parse_source("array a: int[0];").is_err());
}

#[test]
fn test_parse_function_definition_records_names() {
    let ast = parse_source("func add(a: int, b: int): int { return 1; }").unwrap();
    let function = ast.children(ast.root())[0];
    assert_eq!(ast.node(function).kind, NodeKind::FunctionDefinition);

    let tokens = &ast.node(function).tokens;
    assert_eq!(tokens[0].value, "add");
    assert_eq!(tokens[1].value, "a");
    assert_eq!(tokens[2].value, "b");

    assert_eq!(
        ast.ty(function),
        Some(&StaticType::Function {
            ret: Box::new(StaticType::Int),
            params: vec![StaticType::Int, StaticType::Int],
        })
    );
}

#[test]
fn test_parse_precedence_multiplication_binds_tighter() {
    let ast = parse_source("func main(): void { let x = 3 + 4 * 2; }").unwrap();
    let value = first_assigned_value(&ast);

    assert_eq!(ast.node(value).kind, NodeKind::Addition);
    let lhs = ast.children(value)[0];
    let rhs = ast.children(value)[1];
    assert_eq!(ast.node(lhs).kind, NodeKind::LiteralInt);
    assert_eq!(ast.node(rhs).kind, NodeKind::Multiplication);
}

#[test]
fn test_parse_left_associativity() {
    let ast = parse_source("func main(): void { let x = 1 - 2 - 3; }").unwrap();
    let value = first_assigned_value(&ast);

    // (1 - 2) - 3: the second subtraction owns the first as its left child.
    assert_eq!(ast.node(value).kind, NodeKind::Subtraction);
    let lhs = ast.children(value)[0];
    assert_eq!(ast.node(lhs).kind, NodeKind::Subtraction);
    let rhs = ast.children(value)[1];
    assert_eq!(ast.node(rhs).kind, NodeKind::LiteralInt);
}

#[test]
fn test_parse_comparison_not_chainable() {
    let result = parse_source("func main(): void { let x = a < b < c; }");
    let error = result.unwrap_err();
    assert_eq!(error.name(), "SyntaxError");
}

#[test]
fn test_parse_single_comparison() {
    let ast = parse_source("func main(): void { let x = 1 < 2; }").unwrap();
    let value = first_assigned_value(&ast);
    assert_eq!(ast.node(value).kind, NodeKind::Comparison);
    assert_eq!(ast.node(value).tokens[0].value, "<");
}

#[test]
fn test_parse_designator_as_value_is_dereferenced() {
    let ast = parse_source("func main(): void { let x = y; }").unwrap();
    let value = first_assigned_value(&ast);

    assert_eq!(ast.node(value).kind, NodeKind::Dereference);
    let address = ast.children(value)[0];
    assert_eq!(ast.node(address).kind, NodeKind::AddressOf);
    assert_eq!(ast.node(address).tokens[0].value, "y");
}

#[test]
fn test_parse_assignment_target_stays_address() {
    let ast = parse_source("func main(): void { let x = 1; }").unwrap();
    let function = ast.children(ast.root())[0];
    let body = ast.children(function)[0];
    let assignment = ast.children(body)[0];
    let target = ast.children(assignment)[0];
    assert_eq!(ast.node(target).kind, NodeKind::AddressOf);
}

#[test]
fn test_parse_index_chain_rotates_outward() {
    let ast = parse_source("func main(): void { let x = a[1][2]; }").unwrap();
    let value = first_assigned_value(&ast);

    // Dereference wraps the whole chain: deref(index(index(addr, 1), 2)).
    assert_eq!(ast.node(value).kind, NodeKind::Dereference);
    let outer = ast.children(value)[0];
    assert_eq!(ast.node(outer).kind, NodeKind::Index);
    let inner = ast.children(outer)[0];
    assert_eq!(ast.node(inner).kind, NodeKind::Index);
    let address = ast.children(inner)[0];
    assert_eq!(ast.node(address).kind, NodeKind::AddressOf);
}

#[test]
fn test_parse_call_expression() {
    let ast = parse_source("func main(): void { ::foo(1, 2); }").unwrap();
    let function = ast.children(ast.root())[0];
    let body = ast.children(function)[0];
    let call = ast.children(body)[0];

    assert_eq!(ast.node(call).kind, NodeKind::Call);
    assert_eq!(ast.node(call).tokens[0].value, "foo");
    let arguments = ast.children(call)[0];
    assert_eq!(ast.node(arguments).kind, NodeKind::ExpressionList);
    assert_eq!(ast.children(arguments).len(), 2);
}

#[test]
fn test_parse_if_without_else_gets_empty_branch() {
    let ast = parse_source("func main(): void { if true { } }").unwrap();
    let function = ast.children(ast.root())[0];
    let body = ast.children(function)[0];
    let branch = ast.children(body)[0];

    assert_eq!(ast.node(branch).kind, NodeKind::IfElseBranch);
    assert_eq!(ast.children(branch).len(), 3);
    let else_block = ast.children(branch)[2];
    assert_eq!(ast.node(else_block).kind, NodeKind::StatementList);
    assert!(ast.children(else_block).is_empty());
}

#[test]
fn test_parse_while_statement() {
    let ast = parse_source("func main(): void { while 1 < 2 { return 0; } }").unwrap();
    let function = ast.children(ast.root())[0];
    let body = ast.children(function)[0];
    let while_loop = ast.children(body)[0];

    assert_eq!(ast.node(while_loop).kind, NodeKind::WhileLoop);
    assert_eq!(ast.children(while_loop).len(), 2);
}

#[test]
fn test_parse_not_is_right_recursive() {
    let ast = parse_source("func main(): void { let x = not not true; }").unwrap();
    let value = first_assigned_value(&ast);
    assert_eq!(ast.node(value).kind, NodeKind::LogicalNot);
    let inner = ast.children(value)[0];
    assert_eq!(ast.node(inner).kind, NodeKind::LogicalNot);
}

#[test]
fn test_parse_error_message_format() {
    let error = parse_source("var x: int").unwrap_err();
    let rendered = error.to_string();
    assert!(rendered.starts_with("SyntaxError(1,11)"));
    assert!(rendered.contains("Expected Semicolon but got Eof."));
}

#[test]
fn test_parse_aborts_at_first_mismatch() {
    // Both statements are malformed; only the first is reported.
    let error = parse_source("func main(): void { let 1 = 2; let 3 = 4; }").unwrap_err();
    assert_eq!(error.name(), "SyntaxError");
    assert_eq!(error.position().line, 1);
    assert_eq!(error.position().column, 25);
}

#[test]
fn test_parse_rejects_trailing_garbage() {
    let error = parse_source("var x: int; }").unwrap_err();
    assert!(error.to_string().contains("Expected Eof"));
}

#[test]
fn test_parse_error_token_is_unexpected() {
    let error = parse_source("var @: int;").unwrap_err();
    assert_eq!(error.name(), "SyntaxError");
    assert!(error.to_string().contains("but got Error."));
}

#[test]
fn test_parse_parenthesized_expression() {
    let ast = parse_source("func main(): void { let x = (1 + 2) * 3; }").unwrap();
    let value = first_assigned_value(&ast);
    assert_eq!(ast.node(value).kind, NodeKind::Multiplication);
    let lhs = ast.children(value)[0];
    assert_eq!(ast.node(lhs).kind, NodeKind::Addition);
}
