use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("let", TokenKind::Let);
        map.insert("var", TokenKind::Var);
        map.insert("array", TokenKind::Array);
        map.insert("func", TokenKind::Func);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("return", TokenKind::Return);
        map
    };
}

// Type names (int, float, bool, void) are deliberately not reserved; they
// reach the parser as plain identifiers and are mapped there.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Eof,
    Error,

    Integer,
    Float,
    Identifier,
    True,
    False,

    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,

    Assign,       // =
    Equal,        // ==
    NotEqual,     // !=
    LessThan,     // <
    LesserEqual,  // <=
    GreaterThan,  // >
    GreaterEqual, // >=

    And,
    Or,
    Not,

    Add,
    Sub,
    Mul,
    Div,

    Comma,
    Semicolon,
    Colon,
    CallSigil, // ::

    // Reserved
    Let,
    Var,
    Array,
    Func,
    If,
    Else,
    While,
    Return,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Integer | TokenKind::Float | TokenKind::Identifier | TokenKind::Error => {
                write!(f, "{}({}){}", self.kind, self.value, self.span.start)
            }
            _ => write!(f, "{}{}", self.kind, self.span.start),
        }
    }
}
