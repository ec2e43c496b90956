//! Recursive-descent parser over the token stream.
//!
//! Each grammar production is one method; the grammar rule appears as a
//! comment above its method. Productions allocate their nodes in the
//! [`Ast`] arena and return the node's index, so left-associative operator
//! chains are built by allocating a fresh operator node and re-slotting the
//! previously built left subtree under it - no pointer surgery, no
//! re-parsing.

use crate::{
    ast::{
        ast::{Ast, NodeId, NodeKind},
        types::StaticType,
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::{Token, TokenKind},
};

const DECLARATION_FIRST: &[TokenKind] = &[TokenKind::Var, TokenKind::Array, TokenKind::Func];

const STATEMENT_FIRST: &[TokenKind] = &[
    TokenKind::Var,
    TokenKind::Array,
    TokenKind::CallSigil,
    TokenKind::Let,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Return,
];

const EXPRESSION_FIRST: &[TokenKind] = &[
    TokenKind::Not,
    TokenKind::OpenParen,
    TokenKind::Identifier,
    TokenKind::CallSigil,
    TokenKind::Integer,
    TokenKind::Float,
    TokenKind::True,
    TokenKind::False,
];

const COMPARISON_OPS: &[TokenKind] = &[
    TokenKind::GreaterEqual,
    TokenKind::LesserEqual,
    TokenKind::NotEqual,
    TokenKind::Equal,
    TokenKind::GreaterThan,
    TokenKind::LessThan,
];

const ADDITIVE_OPS: &[TokenKind] = &[TokenKind::Add, TokenKind::Sub, TokenKind::Or];

const MULTIPLICATIVE_OPS: &[TokenKind] = &[TokenKind::Mul, TokenKind::Div, TokenKind::And];

/// The parser state: the token stream, the cursor into it, and the arena
/// the tree is being built in.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    ast: Ast,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens ending with an `Eof` token
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            ast: Ast::new(),
        }
    }

    /// Returns the current token without advancing.
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Advances past the current token. The cursor never moves past the
    /// trailing `Eof`, so the current token is always valid.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn have(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn have_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    /// Consumes and returns the current token if it has the given kind.
    fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        if self.have(kind) {
            let token = self.current().clone();
            self.advance();
            Some(token)
        } else {
            None
        }
    }

    /// Consumes the current token if it has the given kind, otherwise
    /// aborts the parse with a syntax diagnostic.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        self.accept(kind)
            .ok_or_else(|| self.syntax_error(format!("{}", kind)))
    }

    /// Like `expect`, but against a whole first set; the diagnostic names
    /// the grammar position instead of a single token.
    fn expect_one_of(&mut self, position: &str, kinds: &[TokenKind]) -> Result<Token, Diagnostic> {
        if self.have_any(kinds) {
            let token = self.current().clone();
            self.advance();
            Ok(token)
        } else {
            Err(self.syntax_error(format!("a token from {}", position)))
        }
    }

    fn syntax_error(&self, expected: String) -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::Syntax {
                expected,
                found: format!("{}", self.current_kind()),
            },
            self.current().span.start,
        )
    }

    // program := declaration-list EOF .
    fn program(&mut self) -> Result<(), Diagnostic> {
        let root = self
            .ast
            .alloc(NodeKind::DeclarationList, self.current().span.start);
        self.declaration_list(root)?;
        self.expect(TokenKind::Eof)?;
        Ok(())
    }

    // declaration-list := { declaration } .
    fn declaration_list(&mut self, list: NodeId) -> Result<(), Diagnostic> {
        while self.have_any(DECLARATION_FIRST) {
            let declaration = self.declaration()?;
            self.ast.push_child(list, declaration);
        }
        Ok(())
    }

    // declaration := variable-declaration | array-declaration | function-definition .
    fn declaration(&mut self) -> Result<NodeId, Diagnostic> {
        match self.current_kind() {
            TokenKind::Var => self.variable_declaration(),
            TokenKind::Array => self.array_declaration(),
            TokenKind::Func => self.function_definition(),
            _ => Err(self.syntax_error("a token from DECLARATION".to_string())),
        }
    }

    // type := IDENTIFIER .
    //
    // Type names are not reserved words; anything that is not a known
    // primitive becomes `Unresolved` and is rejected during analysis.
    fn type_name(&mut self) -> Result<StaticType, Diagnostic> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(match token.value.as_str() {
            "int" => StaticType::Int,
            "float" => StaticType::Float,
            "bool" => StaticType::Bool,
            "void" => StaticType::Void,
            _ => StaticType::Unresolved(token.value),
        })
    }

    // variable-declaration := "var" IDENTIFIER ":" type ";" .
    fn variable_declaration(&mut self) -> Result<NodeId, Diagnostic> {
        let position = self.current().span.start;
        self.expect(TokenKind::Var)?;

        let name = self.expect(TokenKind::Identifier)?;
        let node = self.ast.alloc(NodeKind::VariableDeclaration, position);
        self.ast.attach_token(node, name);

        self.expect(TokenKind::Colon)?;
        let ty = self.type_name()?;
        self.ast.set_type(node, ty);

        self.expect(TokenKind::Semicolon)?;
        Ok(node)
    }

    // array-declaration := "array" IDENTIFIER ":" type ("[" INTEGER "]")+ ";" .
    //
    // Dimensions fold from the last written dimension inward, so the
    // outermost syntactic dimension becomes the outermost type layer:
    // `array a: int[3][4];` declares 3 elements of array-of-4-int.
    fn array_declaration(&mut self) -> Result<NodeId, Diagnostic> {
        let position = self.current().span.start;
        self.expect(TokenKind::Array)?;

        let name = self.expect(TokenKind::Identifier)?;
        let node = self.ast.alloc(NodeKind::ArrayDeclaration, position);
        self.ast.attach_token(node, name);

        self.expect(TokenKind::Colon)?;
        let mut ty = self.type_name()?;

        let mut dims = vec![];
        loop {
            self.expect(TokenKind::OpenBracket)?;
            let dim = self.expect(TokenKind::Integer)?;
            match dim.value.parse::<u32>() {
                Ok(n) if n > 0 => dims.push(n),
                _ => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::Syntax {
                            expected: "a positive array dimension".to_string(),
                            found: dim.value,
                        },
                        dim.span.start,
                    ))
                }
            }
            self.expect(TokenKind::CloseBracket)?;
            if !self.have(TokenKind::OpenBracket) {
                break;
            }
        }
        for dim in dims.into_iter().rev() {
            ty = StaticType::Array {
                elem: Box::new(ty),
                dim,
            };
        }
        self.ast.set_type(node, ty);

        self.expect(TokenKind::Semicolon)?;
        Ok(node)
    }

    // function-definition := "func" IDENTIFIER "(" parameter-list ")" ":" type statement-block .
    //
    // The declared name and every parameter name are attached to the node
    // in order; the analyzer declares them into the function's scope.
    fn function_definition(&mut self) -> Result<NodeId, Diagnostic> {
        let position = self.current().span.start;
        self.expect(TokenKind::Func)?;

        let name = self.expect(TokenKind::Identifier)?;
        let node = self.ast.alloc(NodeKind::FunctionDefinition, position);
        self.ast.attach_token(node, name);

        self.expect(TokenKind::OpenParen)?;
        let params = self.parameter_list(node)?;
        self.expect(TokenKind::CloseParen)?;

        self.expect(TokenKind::Colon)?;
        let ret = self.type_name()?;
        self.ast.set_type(
            node,
            StaticType::Function {
                ret: Box::new(ret),
                params,
            },
        );

        let body = self.statement_block()?;
        self.ast.push_child(node, body);
        Ok(node)
    }

    // parameter-list := [ parameter { "," parameter } ] .
    fn parameter_list(&mut self, function: NodeId) -> Result<Vec<StaticType>, Diagnostic> {
        let mut params = vec![];
        if self.have(TokenKind::Identifier) {
            params.push(self.parameter(function)?);
            while self.accept(TokenKind::Comma).is_some() {
                params.push(self.parameter(function)?);
            }
        }
        Ok(params)
    }

    // parameter := IDENTIFIER ":" type .
    fn parameter(&mut self, function: NodeId) -> Result<StaticType, Diagnostic> {
        let name = self.expect(TokenKind::Identifier)?;
        self.ast.attach_token(function, name);
        self.expect(TokenKind::Colon)?;
        self.type_name()
    }

    // statement-block := "{" { statement } "}" .
    fn statement_block(&mut self) -> Result<NodeId, Diagnostic> {
        self.expect(TokenKind::OpenBrace)?;
        let node = self
            .ast
            .alloc(NodeKind::StatementList, self.current().span.start);
        while self.have_any(STATEMENT_FIRST) {
            let statement = self.statement()?;
            self.ast.push_child(node, statement);
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(node)
    }

    // statement := variable-declaration | array-declaration | call-statement
    //      | assignment-statement | if-statement | while-statement | return-statement .
    fn statement(&mut self) -> Result<NodeId, Diagnostic> {
        match self.current_kind() {
            TokenKind::Var => self.variable_declaration(),
            TokenKind::Array => self.array_declaration(),
            TokenKind::CallSigil => self.call_statement(),
            TokenKind::Let => self.assignment_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::Return => self.return_statement(),
            _ => Err(self.syntax_error("a token from STATEMENT".to_string())),
        }
    }

    // assignment-statement := "let" designator "=" expression0 ";" .
    //
    // The designator stays an address here; only designators used as
    // values are wrapped in a dereference.
    fn assignment_statement(&mut self) -> Result<NodeId, Diagnostic> {
        let position = self.current().span.start;
        self.expect(TokenKind::Let)?;

        let node = self.ast.alloc(NodeKind::Assignment, position);
        let target = self.designator(false)?;
        self.ast.push_child(node, target);

        self.expect(TokenKind::Assign)?;

        let value = self.expression0()?;
        self.ast.push_child(node, value);

        self.expect(TokenKind::Semicolon)?;
        Ok(node)
    }

    // call-statement := call-expression ";" .
    fn call_statement(&mut self) -> Result<NodeId, Diagnostic> {
        let node = self.call_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(node)
    }

    // if-statement := "if" expression0 statement-block [ "else" statement-block ] .
    //
    // A missing else branch still gets a child: an empty statement list,
    // so the node shape is fixed at three children.
    fn if_statement(&mut self) -> Result<NodeId, Diagnostic> {
        let position = self.current().span.start;
        self.expect(TokenKind::If)?;

        let node = self.ast.alloc(NodeKind::IfElseBranch, position);
        let condition = self.expression0()?;
        self.ast.push_child(node, condition);

        let then_block = self.statement_block()?;
        self.ast.push_child(node, then_block);

        let else_block = if self.accept(TokenKind::Else).is_some() {
            self.statement_block()?
        } else {
            self.ast
                .alloc(NodeKind::StatementList, self.current().span.start)
        };
        self.ast.push_child(node, else_block);
        Ok(node)
    }

    // while-statement := "while" expression0 statement-block .
    fn while_statement(&mut self) -> Result<NodeId, Diagnostic> {
        let position = self.current().span.start;
        self.expect(TokenKind::While)?;

        let node = self.ast.alloc(NodeKind::WhileLoop, position);
        let condition = self.expression0()?;
        self.ast.push_child(node, condition);

        let body = self.statement_block()?;
        self.ast.push_child(node, body);
        Ok(node)
    }

    // return-statement := "return" expression0 ";" .
    fn return_statement(&mut self) -> Result<NodeId, Diagnostic> {
        let position = self.current().span.start;
        self.expect(TokenKind::Return)?;

        let node = self.ast.alloc(NodeKind::Return, position);
        let value = self.expression0()?;
        self.ast.push_child(node, value);

        self.expect(TokenKind::Semicolon)?;
        Ok(node)
    }

    // expression0 := expression1 [ op0 expression1 ] .
    //
    // At most one comparison: after consuming it, no further comparison
    // operator is accepted at this level, so `a < b < c` is a syntax
    // error at the second `<`.
    fn expression0(&mut self) -> Result<NodeId, Diagnostic> {
        let mut lhs = self.expression1()?;

        if self.have_any(COMPARISON_OPS) {
            let op_token = self.current().clone();
            self.advance();

            let op = self.ast.alloc(NodeKind::Comparison, op_token.span.start);
            self.ast.attach_token(op, op_token);

            let rhs = self.expression1()?;
            self.ast.push_child(op, lhs);
            self.ast.push_child(op, rhs);
            lhs = op;
        }
        Ok(lhs)
    }

    // expression1 := expression2 { op1 expression2 } .
    //
    // Each operator becomes the parent of the tree built so far, which
    // makes the chain left-associative.
    fn expression1(&mut self) -> Result<NodeId, Diagnostic> {
        let mut lhs = self.expression2()?;

        while self.have_any(ADDITIVE_OPS) {
            let kind = match self.current_kind() {
                TokenKind::Add => NodeKind::Addition,
                TokenKind::Sub => NodeKind::Subtraction,
                _ => NodeKind::LogicalOr,
            };
            let position = self.current().span.start;
            self.advance();

            let op = self.ast.alloc(kind, position);
            let rhs = self.expression2()?;
            self.ast.push_child(op, lhs);
            self.ast.push_child(op, rhs);
            lhs = op;
        }
        Ok(lhs)
    }

    // expression2 := expression3 { op2 expression3 } .
    fn expression2(&mut self) -> Result<NodeId, Diagnostic> {
        let mut lhs = self.expression3()?;

        while self.have_any(MULTIPLICATIVE_OPS) {
            let kind = match self.current_kind() {
                TokenKind::Mul => NodeKind::Multiplication,
                TokenKind::Div => NodeKind::Division,
                _ => NodeKind::LogicalAnd,
            };
            let position = self.current().span.start;
            self.advance();

            let op = self.ast.alloc(kind, position);
            let rhs = self.expression3()?;
            self.ast.push_child(op, lhs);
            self.ast.push_child(op, rhs);
            lhs = op;
        }
        Ok(lhs)
    }

    // expression3 := "not" expression3 | "(" expression0 ")"
    //      | designator | call-expression | literal .
    fn expression3(&mut self) -> Result<NodeId, Diagnostic> {
        match self.current_kind() {
            TokenKind::Not => {
                let position = self.current().span.start;
                self.advance();
                let node = self.ast.alloc(NodeKind::LogicalNot, position);
                let operand = self.expression3()?;
                self.ast.push_child(node, operand);
                Ok(node)
            }
            TokenKind::OpenParen => {
                self.advance();
                let node = self.expression0()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(node)
            }
            TokenKind::Identifier => self.designator(true),
            TokenKind::CallSigil => self.call_expression(),
            TokenKind::Integer | TokenKind::Float | TokenKind::True | TokenKind::False => {
                self.literal()
            }
            _ => Err(self.syntax_error("a token from EXPRESSION3".to_string())),
        }
    }

    // literal := INTEGER | FLOAT | TRUE | FALSE .
    //
    // Literals are the only nodes typed at parse time besides
    // declarations.
    fn literal(&mut self) -> Result<NodeId, Diagnostic> {
        let token = self
            .expect_one_of(
                "LITERAL",
                &[
                    TokenKind::Integer,
                    TokenKind::Float,
                    TokenKind::True,
                    TokenKind::False,
                ],
            )?;
        let (kind, ty) = match token.kind {
            TokenKind::Integer => (NodeKind::LiteralInt, StaticType::Int),
            TokenKind::Float => (NodeKind::LiteralFloat, StaticType::Float),
            _ => (NodeKind::LiteralBool, StaticType::Bool),
        };
        let node = self.ast.alloc(kind, token.span.start);
        self.ast.attach_token(node, token);
        self.ast.set_type(node, ty);
        Ok(node)
    }

    // designator := IDENTIFIER { "[" expression0 "]" } .
    //
    // Each index suffix rotates the chain built so far under a fresh
    // index node. A designator used as a value is wrapped in a
    // dereference around the whole chain; an assignment target is left
    // as an address.
    fn designator(&mut self, is_value: bool) -> Result<NodeId, Diagnostic> {
        let position = self.current().span.start;
        let name = self.expect(TokenKind::Identifier)?;

        let node = self.ast.alloc(NodeKind::AddressOf, position);
        self.ast.attach_token(node, name);

        let mut lhs = node;
        while self.have(TokenKind::OpenBracket) {
            let bracket_position = self.current().span.start;
            self.advance();

            let index = self.ast.alloc(NodeKind::Index, bracket_position);
            let subscript = self.expression0()?;
            self.ast.push_child(index, lhs);
            self.ast.push_child(index, subscript);

            self.expect(TokenKind::CloseBracket)?;
            lhs = index;
        }

        if is_value {
            let deref = self.ast.alloc(NodeKind::Dereference, position);
            self.ast.push_child(deref, lhs);
            Ok(deref)
        } else {
            Ok(lhs)
        }
    }

    // call-expression := "::" IDENTIFIER "(" expression-list ")" .
    fn call_expression(&mut self) -> Result<NodeId, Diagnostic> {
        let position = self.current().span.start;
        self.expect(TokenKind::CallSigil)?;

        let name = self.expect(TokenKind::Identifier)?;
        let node = self.ast.alloc(NodeKind::Call, position);
        self.ast.attach_token(node, name);

        self.expect(TokenKind::OpenParen)?;
        let arguments = self.expression_list()?;
        self.ast.push_child(node, arguments);
        self.expect(TokenKind::CloseParen)?;
        Ok(node)
    }

    // expression-list := [ expression0 { "," expression0 } ] .
    fn expression_list(&mut self) -> Result<NodeId, Diagnostic> {
        let node = self
            .ast
            .alloc(NodeKind::ExpressionList, self.current().span.start);
        if self.have_any(EXPRESSION_FIRST) {
            let expression = self.expression0()?;
            self.ast.push_child(node, expression);
            while self.accept(TokenKind::Comma).is_some() {
                let expression = self.expression0()?;
                self.ast.push_child(node, expression);
            }
        }
        Ok(node)
    }
}

/// Parses a token stream into an Abstract Syntax Tree.
///
/// This is the entry point for parsing. The first token that does not
/// match the expected set for the current grammar position aborts the
/// whole parse: one syntax diagnostic, no partial tree.
///
/// # Arguments
///
/// * `tokens` - Vector of tokens ending with an `Eof` token
///
/// # Returns
///
/// The completed [`Ast`], or the single syntax diagnostic that aborted
/// the parse.
pub fn parse(tokens: Vec<Token>) -> Result<Ast, Diagnostic> {
    let mut parser = Parser::new(tokens);
    parser.program()?;
    Ok(parser.ast)
}
