use crate::{
    ast::{
        ast::{Ast, NodeId, NodeKind},
        types::{StaticType, TypeMismatch},
    },
    errors::errors::{Diagnostic, DiagnosticKind, Diagnostics},
    lexer::tokens::Token,
    Position,
};

use super::symbol_table::SymbolTable;

/// The analysis context threaded through the walk: the live scope chain,
/// the collector, the function whose body is being visited, and whether a
/// valid entry point has been seen.
pub struct TypeChecker {
    table: SymbolTable,
    diagnostics: Diagnostics,
    current_function: Option<(String, StaticType)>,
    has_main: bool,
}

fn builtin(ret: StaticType, params: Vec<StaticType>) -> StaticType {
    StaticType::Function {
        ret: Box::new(ret),
        params,
    }
}

// Reading a node's annotation where it is guaranteed to exist: the parser
// types declarations and literals, the walk types every expression before
// its parent. A miss here is a programming error, not a user error.
fn operand(ast: &Ast, id: NodeId) -> StaticType {
    ast.ty(id)
        .cloned()
        .expect("node is annotated by this point in the walk")
}

impl TypeChecker {
    /// Creates an analyzer whose global frame is pre-seeded with the
    /// builtin functions.
    pub fn new() -> Self {
        let mut table = SymbolTable::new();
        table.put("readInt", builtin(StaticType::Int, vec![]));
        table.put("readFloat", builtin(StaticType::Float, vec![]));
        table.put("printBool", builtin(StaticType::Void, vec![StaticType::Bool]));
        table.put("printInt", builtin(StaticType::Void, vec![StaticType::Int]));
        table.put("printFloat", builtin(StaticType::Void, vec![StaticType::Float]));
        table.put("println", builtin(StaticType::Void, vec![]));

        TypeChecker {
            table,
            diagnostics: Diagnostics::new(),
            current_function: None,
            has_main: false,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn has_main(&self) -> bool {
        self.has_main
    }

    fn report(&mut self, mismatch: TypeMismatch, position: Position) {
        self.diagnostics
            .add(Diagnostic::new(DiagnosticKind::Type(mismatch), position));
    }

    fn declare_symbol(&mut self, token: &Token, ty: StaticType) {
        if !self.table.put(&token.value, ty) {
            self.diagnostics.add(Diagnostic::new(
                DiagnosticKind::DeclareSymbol {
                    name: token.value.clone(),
                },
                token.span.start,
            ));
        }
    }

    fn resolve_symbol(&mut self, token: &Token) {
        if self.table.search(&token.value).is_none() {
            self.diagnostics.add(Diagnostic::new(
                DiagnosticKind::ResolveSymbol {
                    name: token.value.clone(),
                },
                token.span.start,
            ));
        }
    }

    /// One depth-first visit: scope and declaration work before the
    /// children, synthesis and validation after them.
    pub fn check(&mut self, ast: &mut Ast, id: NodeId) {
        self.enter_node(ast, id);

        let children = ast.children(id).to_vec();
        for child in children {
            self.check(ast, child);
        }

        self.leave_node(ast, id);
    }

    fn enter_node(&mut self, ast: &Ast, id: NodeId) {
        match ast.node(id).kind {
            NodeKind::StatementList => {
                // The block directly inside a function body shares the
                // frame already holding the parameters.
                if self.table.is_function_scope() {
                    self.table.unset_function_scope();
                } else {
                    self.table.enter_scope();
                }
            }
            NodeKind::FunctionDefinition => {
                let node = ast.node(id);
                let name = node.tokens[0].clone();
                let fn_ty = operand(ast, id);

                self.declare_symbol(&name, fn_ty.clone());
                self.current_function = Some((name.value.clone(), fn_ty.clone()));

                self.table.enter_scope();
                self.table.set_function_scope();

                let params = match &fn_ty {
                    StaticType::Function { params, .. } => params.clone(),
                    _ => vec![],
                };
                for (token, ty) in node.tokens[1..].iter().zip(params) {
                    self.declare_symbol(token, ty);
                }
            }
            NodeKind::VariableDeclaration | NodeKind::ArrayDeclaration => {
                let token = ast.node(id).tokens[0].clone();
                let ty = operand(ast, id);
                self.declare_symbol(&token, ty);
            }
            NodeKind::Call | NodeKind::AddressOf => {
                let token = ast.node(id).tokens[0].clone();
                self.resolve_symbol(&token);
            }
            _ => {}
        }
    }

    fn leave_node(&mut self, ast: &mut Ast, id: NodeId) {
        let kind = ast.node(id).kind;
        let position = ast.node(id).position;

        match kind {
            NodeKind::StatementList => self.table.leave_scope(),

            NodeKind::FunctionDefinition => {
                if let Some((name, fn_ty)) = self.current_function.take() {
                    if name == "main" {
                        match fn_ty.check_entrance() {
                            Ok(()) => self.has_main = true,
                            Err(err) => self.report(err, position),
                        }
                    }
                    if let Err(err) = fn_ty.check_decl(&name) {
                        self.report(err, position);
                    }
                }
            }

            NodeKind::VariableDeclaration | NodeKind::ArrayDeclaration => {
                let name = ast.node(id).tokens[0].value.clone();
                let ty = operand(ast, id);
                if let Err(err) = ty.check_decl(&name) {
                    self.report(err, position);
                }
            }

            NodeKind::Addition => self.binary(ast, id, StaticType::add),
            NodeKind::Subtraction => self.binary(ast, id, StaticType::sub),
            NodeKind::Multiplication => self.binary(ast, id, StaticType::mul),
            NodeKind::Division => self.binary(ast, id, StaticType::div),
            NodeKind::LogicalAnd => self.binary(ast, id, StaticType::and),
            NodeKind::LogicalOr => self.binary(ast, id, StaticType::or),
            NodeKind::Comparison => self.binary(ast, id, StaticType::compare),
            NodeKind::Index => self.binary(ast, id, StaticType::index),
            NodeKind::Assignment => self.binary(ast, id, StaticType::assign),

            NodeKind::LogicalNot => {
                let ty = operand(ast, ast.children(id)[0]);
                match ty.not() {
                    Ok(ty) => ast.set_type(id, ty),
                    Err(err) => {
                        ast.set_type(id, StaticType::Error(err.to_string()));
                        self.report(err, position);
                    }
                }
            }

            NodeKind::Dereference => {
                let ty = operand(ast, ast.children(id)[0]).deref();
                ast.set_type(id, ty);
            }

            NodeKind::AddressOf => {
                // The pre-order pass already reported an unresolved name;
                // the type degrades to void so the walk can continue.
                let name = ast.node(id).tokens[0].value.clone();
                let ty = match self.table.search(&name) {
                    Some(symbol) => symbol.ty().clone(),
                    None => StaticType::Void,
                };
                ast.set_type(id, ty);
            }

            NodeKind::Call => {
                let name = ast.node(id).tokens[0].value.clone();
                let found = self.table.search(&name).map(|symbol| symbol.ty().clone());
                match found {
                    None => ast.set_type(id, StaticType::Void),
                    Some(fn_ty) => {
                        let arguments = operand(ast, ast.children(id)[0]);
                        match fn_ty.call(&arguments, &name) {
                            Ok(_) => ast.set_type(id, fn_ty),
                            Err(err) => {
                                ast.set_type(id, StaticType::Error(err.to_string()));
                                self.report(err, position);
                            }
                        }
                    }
                }
            }

            NodeKind::ExpressionList => {
                let arguments = ast
                    .children(id)
                    .iter()
                    .map(|child| operand(ast, *child))
                    .collect();
                ast.set_type(id, StaticType::ArgList(arguments));
            }

            NodeKind::Return => {
                let value = operand(ast, ast.children(id)[0]);
                if let Some((name, fn_ty)) = self.current_function.clone() {
                    match fn_ty.ret(&value, &name) {
                        Ok(ty) => ast.set_type(id, ty),
                        Err(err) => {
                            ast.set_type(id, StaticType::Error(err.to_string()));
                            self.report(err, position);
                        }
                    }
                }
            }

            _ => {}
        }
    }

    fn binary<F>(&mut self, ast: &mut Ast, id: NodeId, op: F)
    where
        F: Fn(&StaticType, &StaticType) -> Result<StaticType, TypeMismatch>,
    {
        let position = ast.node(id).position;
        let lhs = operand(ast, ast.children(id)[0]);
        let rhs = operand(ast, ast.children(id)[1]);

        match op(&lhs, &rhs) {
            Ok(ty) => ast.set_type(id, ty),
            Err(err) => {
                ast.set_type(id, StaticType::Error(err.to_string()));
                self.report(err, position);
            }
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        TypeChecker::new()
    }
}

/// Runs semantic analysis over a parsed tree.
///
/// The tree is annotated in place. Returns `Ok` when no diagnostics were
/// collected; otherwise every defect found in the single pass, in
/// discovery order, with a final entry-point diagnostic when no valid
/// `main` was seen.
pub fn analyze(ast: &mut Ast) -> Result<(), Diagnostics> {
    let mut checker = TypeChecker::new();
    let root = ast.root();
    checker.check(ast, root);

    if !checker.has_main {
        let position = ast.node(root).position;
        checker
            .diagnostics
            .add(Diagnostic::new(DiagnosticKind::MissingEntryPoint, position));
    }

    if checker.diagnostics.is_empty() {
        Ok(())
    } else {
        Err(checker.diagnostics)
    }
}
