use std::fmt::Write;

use crate::ast::types::StaticType;

/// A declared name and its type. The depth is only read by the scope dump.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    ty: StaticType,
    depth: usize,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &StaticType {
        &self.ty
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[derive(Debug, Default)]
struct Scope {
    // Insertion order is kept so scope dumps list symbols as declared.
    symbols: Vec<Symbol>,
    function_scope: bool,
}

/// A stack of lexical scopes. Only one chain is ever live: frames are
/// pushed on block entry and discarded on exit, never revisited.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// Creates a table holding only the global frame (depth 0).
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn leave_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot leave the global scope");
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Inserts into the current frame only. Returns false and leaves the
    /// table unchanged if the name already exists in that frame; shadowing
    /// an outer frame is fine.
    pub fn put(&mut self, name: &str, ty: StaticType) -> bool {
        let depth = self.depth();
        let scope = self.scopes.last_mut().unwrap();
        if scope.symbols.iter().any(|symbol| symbol.name == name) {
            return false;
        }
        scope.symbols.push(Symbol {
            name: name.to_string(),
            ty,
            depth,
        });
        true
    }

    /// Walks from the current frame outward, returning the first match.
    pub fn search(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.iter().find(|symbol| symbol.name == name))
    }

    /// Marks the current frame as a function's own frame (it holds the
    /// parameters). The first statement block inside the body consumes
    /// this flag instead of pushing a frame of its own, so parameters and
    /// top-level locals share one frame.
    pub fn set_function_scope(&mut self) {
        self.scopes.last_mut().unwrap().function_scope = true;
    }

    pub fn unset_function_scope(&mut self) {
        self.scopes.last_mut().unwrap().function_scope = false;
    }

    pub fn is_function_scope(&self) -> bool {
        self.scopes.last().map(|scope| scope.function_scope).unwrap_or(false)
    }

    /// Debug dump of the live scope chain, outermost first, indented two
    /// spaces per depth.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for scope in &self.scopes {
            for symbol in &scope.symbols {
                let _ = writeln!(
                    out,
                    "{}{}: {}",
                    "  ".repeat(symbol.depth),
                    symbol.name,
                    symbol.ty
                );
            }
        }
        out
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}
