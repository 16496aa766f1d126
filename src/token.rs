use crate::span::Span;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: Kind,
    pub lexeme: String,
    /// Parsed value for literal tokens, absent for everything else.
    pub literal: Option<Literal>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: Kind, lexeme: String, span: Span) -> Self {
        Self {
            kind,
            lexeme,
            literal: None,
            span,
        }
    }

    pub fn with_literal(kind: Kind, lexeme: String, literal: Literal, span: Span) -> Self {
        Self {
            kind,
            lexeme,
            literal: Some(literal),
            span,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == Kind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} {:?} at {}", self.kind, self.lexeme, self.span.start)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Kind {
    // Identifiers and literals
    Identifier,
    Integer,
    Float,
    Str,
    Char,

    // Keywords
    Var,
    Const,
    Func,
    Print,
    Return,
    Break,
    Continue,
    If,
    Else,
    While,
    True,
    False,
    Import,

    // Operators
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %
    Eq,      // ==
    NotEq,   // !=
    Lt,      // <
    LtEq,    // <=
    Gt,      // >
    GtEq,    // >=
    And,     // &&
    Or,      // ||
    Not,     // !
    Assign,  // =

    // Delimiters
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Semicolon, // ;
    Comma,     // ,

    // End of file marker
    Eof,
}

impl Kind {
    /// Human-readable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Identifier => "identifier",
            Kind::Integer => "integer literal",
            Kind::Float => "float literal",
            Kind::Str => "string literal",
            Kind::Char => "char literal",
            Kind::Var => "'var'",
            Kind::Const => "'const'",
            Kind::Func => "'func'",
            Kind::Print => "'print'",
            Kind::Return => "'return'",
            Kind::Break => "'break'",
            Kind::Continue => "'continue'",
            Kind::If => "'if'",
            Kind::Else => "'else'",
            Kind::While => "'while'",
            Kind::True => "'true'",
            Kind::False => "'false'",
            Kind::Import => "'import'",
            Kind::Plus => "'+'",
            Kind::Minus => "'-'",
            Kind::Star => "'*'",
            Kind::Slash => "'/'",
            Kind::Percent => "'%'",
            Kind::Eq => "'=='",
            Kind::NotEq => "'!='",
            Kind::Lt => "'<'",
            Kind::LtEq => "'<='",
            Kind::Gt => "'>'",
            Kind::GtEq => "'>='",
            Kind::And => "'&&'",
            Kind::Or => "'||'",
            Kind::Not => "'!'",
            Kind::Assign => "'='",
            Kind::LParen => "'('",
            Kind::RParen => "')'",
            Kind::LBrace => "'{'",
            Kind::RBrace => "'}'",
            Kind::Semicolon => "';'",
            Kind::Comma => "','",
            Kind::Eof => "end of file",
        }
    }

    /// Look up the keyword table after scanning an identifier.
    pub fn keyword(ident: &str) -> Option<Kind> {
        match ident {
            "var" => Some(Kind::Var),
            "const" => Some(Kind::Const),
            "func" => Some(Kind::Func),
            "print" => Some(Kind::Print),
            "return" => Some(Kind::Return),
            "break" => Some(Kind::Break),
            "continue" => Some(Kind::Continue),
            "if" => Some(Kind::If),
            "else" => Some(Kind::Else),
            "while" => Some(Kind::While),
            "true" => Some(Kind::True),
            "false" => Some(Kind::False),
            "import" => Some(Kind::Import),
            _ => None,
        }
    }
}
