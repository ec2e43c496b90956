use std::fmt::Write;

use crate::{ast::types::StaticType, lexer::tokens::Token, Position};

/// Index of a node inside its owning [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    DeclarationList,
    VariableDeclaration,
    ArrayDeclaration,
    FunctionDefinition,
    LiteralInt,
    LiteralFloat,
    LiteralBool,
    AddressOf,
    Dereference,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    LogicalAnd,
    LogicalOr,
    LogicalNot,
    Comparison,
    Index,
    Call,
    Assignment,
    IfElseBranch,
    WhileLoop,
    Return,
    StatementList,
    ExpressionList,
    Error,
}

/// One tagged node. The kind fixes the arity and meaning of `children`;
/// `tokens` holds the source terminals the node needs later (declared name
/// first, then parameter names for function definitions), and `ty` is the
/// annotation written once per pass.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub position: Position,
    pub children: Vec<NodeId>,
    pub tokens: Vec<Token>,
    pub ty: Option<StaticType>,
}

/// Arena-backed syntax tree. Nodes are allocated once during parsing and
/// live until the whole tree is dropped; "rotating" a partially built
/// subtree under a new operator is just re-slotting child indices.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Ast { nodes: vec![] }
    }

    /// The first allocated node. The parser allocates the declaration list
    /// before anything else, so this is the program root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn alloc(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            position,
            children: vec![],
            tokens: vec![],
            ty: None,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).children.push(child);
    }

    /// Reassigns one child slot; the previous occupant usually becomes a
    /// child of the new one.
    pub fn set_child(&mut self, parent: NodeId, slot: usize, child: NodeId) {
        self.node_mut(parent).children[slot] = child;
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn attach_token(&mut self, id: NodeId, token: Token) {
        self.node_mut(id).tokens.push(token);
    }

    pub fn set_type(&mut self, id: NodeId, ty: StaticType) {
        self.node_mut(id).ty = Some(ty);
    }

    pub fn ty(&self, id: NodeId) -> Option<&StaticType> {
        self.node(id).ty.as_ref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Debug rendering: one node per line, two spaces of indent per depth.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if !self.nodes.is_empty() {
            self.dump_node(self.root(), 0, &mut out);
        }
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        let _ = write!(out, "{}{:?}{}", "  ".repeat(depth), node.kind, node.position);
        if let Some(token) = node.tokens.first() {
            let _ = write!(out, "[{}]", token.value);
        }
        if let Some(ty) = &node.ty {
            let _ = write!(out, ": {}", ty);
        }
        out.push('\n');
        for child in &node.children {
            self.dump_node(*child, depth + 1, out);
        }
    }
}
