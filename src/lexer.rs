use crate::diagnostics::Diagnostic;
use crate::source::SourceBuffer;
use crate::span::{Position, Span};
use crate::token::{Kind, Literal, Token};

/// Tokenize a compilation unit. Lexing is total: every character either
/// belongs to a token, is skipped as whitespace or comment, or is reported
/// as a diagnostic and skipped. The result always ends with one EOF token.
pub fn tokenize(source: &SourceBuffer) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a SourceBuffer,
    offset: usize,
    line: usize,
    column: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a SourceBuffer) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
            diagnostics: Vec::new(),
        }
    }

    fn pos(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    fn at(&self) -> Option<char> {
        self.source.get(self.offset)
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.offset + 1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.at()?;
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.pos())
    }

    fn lexeme_from(&self, start: Position) -> String {
        self.source.slice(start.offset, self.offset)
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::lexical(message, span));
    }

    fn run(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia();
            let start = self.pos();

            let c = match self.at() {
                Some(c) => c,
                None => {
                    tokens.push(Token::new(Kind::Eof, String::new(), Span::point(start)));
                    break;
                }
            };

            if c.is_alphabetic() || c == '_' {
                tokens.push(self.scan_identifier(start));
            } else if c.is_ascii_digit() {
                tokens.push(self.scan_number(start));
            } else if c == '"' {
                tokens.push(self.scan_string(start));
            } else if c == '\'' {
                tokens.push(self.scan_char(start));
            } else if let Some(token) = self.scan_operator(start) {
                tokens.push(token);
            }
            // scan_operator already reported and skipped anything it rejected
        }

        (tokens, self.diagnostics)
    }

    /// Skip whitespace and comments. Block comments do not nest.
    fn skip_trivia(&mut self) {
        loop {
            match self.at() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek() == Some('/') => {
                    while let Some(c) = self.at() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek() == Some('*') => {
                    let start = self.pos();
                    self.bump();
                    self.bump();
                    let mut closed = false;
                    while let Some(c) = self.bump() {
                        if c == '*' && self.at() == Some('/') {
                            self.bump();
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        let span = self.span_from(start);
                        self.error("unterminated block comment", span);
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_identifier(&mut self, start: Position) -> Token {
        while let Some(c) = self.at() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let lexeme = self.lexeme_from(start);
        let kind = Kind::keyword(&lexeme).unwrap_or(Kind::Identifier);
        Token::new(kind, lexeme, self.span_from(start))
    }

    fn scan_number(&mut self, start: Position) -> Token {
        while matches!(self.at(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }

        let mut is_float = false;
        if self.at() == Some('.') && matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            while matches!(self.at(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }

        // Further decimal points make the literal malformed. Consume them
        // anyway so the lexer keeps advancing instead of stuttering on '.'.
        let valid_end = self.offset;
        let mut malformed = false;
        while self.at() == Some('.') && matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            malformed = true;
            self.bump();
            while matches!(self.at(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }

        let lexeme = self.lexeme_from(start);
        let span = self.span_from(start);
        if malformed {
            self.error(
                format!("malformed number literal '{}'", lexeme),
                span,
            );
        }

        let valid = self.source.slice(start.offset, valid_end);
        if is_float {
            let value = valid.parse::<f64>().unwrap_or(0.0);
            Token::with_literal(Kind::Float, lexeme, Literal::Float(value), span)
        } else {
            let value = match valid.parse::<i64>() {
                Ok(v) => v,
                Err(_) => {
                    self.error(format!("integer literal '{}' out of range", valid), span);
                    0
                }
            };
            Token::with_literal(Kind::Integer, lexeme, Literal::Int(value), span)
        }
    }

    /// Scan a string literal. An unterminated string is reported once and
    /// recovered by treating end-of-line or end-of-file as the terminator.
    fn scan_string(&mut self, start: Position) -> Token {
        self.bump(); // opening quote
        let mut value = String::new();

        loop {
            match self.at() {
                None | Some('\n') => {
                    let span = self.span_from(start);
                    self.error("unterminated string literal", span);
                    break;
                }
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    let escape_start = self.pos();
                    self.bump();
                    match self.at() {
                        Some(c) => {
                            value.push(self.escape_value(c, escape_start));
                            self.bump();
                        }
                        None => {
                            let span = self.span_from(start);
                            self.error("unterminated string literal", span);
                            break;
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }

        Token::with_literal(
            Kind::Str,
            self.lexeme_from(start),
            Literal::Str(value),
            self.span_from(start),
        )
    }

    fn scan_char(&mut self, start: Position) -> Token {
        self.bump(); // opening quote
        let mut value = None;
        let mut count = 0usize;
        let mut closed = false;

        loop {
            match self.at() {
                None | Some('\n') => {
                    let span = self.span_from(start);
                    self.error("unterminated char literal", span);
                    break;
                }
                Some('\'') => {
                    self.bump();
                    closed = true;
                    break;
                }
                Some('\\') => {
                    let escape_start = self.pos();
                    self.bump();
                    match self.at() {
                        Some(c) => {
                            let resolved = self.escape_value(c, escape_start);
                            self.bump();
                            if value.is_none() {
                                value = Some(resolved);
                            }
                            count += 1;
                        }
                        None => {
                            let span = self.span_from(start);
                            self.error("unterminated char literal", span);
                            break;
                        }
                    }
                }
                Some(c) => {
                    self.bump();
                    if value.is_none() {
                        value = Some(c);
                    }
                    count += 1;
                }
            }
        }

        if closed && count != 1 {
            let span = self.span_from(start);
            self.error("char literal must contain exactly one character", span);
        }

        Token::with_literal(
            Kind::Char,
            self.lexeme_from(start),
            Literal::Char(value.unwrap_or('\0')),
            self.span_from(start),
        )
    }

    fn escape_value(&mut self, c: char, escape_start: Position) -> char {
        match c {
            'n' => '\n',
            't' => '\t',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            other => {
                let span = Span::new(escape_start, self.pos());
                self.diagnostics.push(
                    Diagnostic::lexical(format!("unknown escape sequence '\\{}'", other), span)
                        .warning(),
                );
                other
            }
        }
    }

    /// Scan operators and delimiters, longest match first. Returns None for
    /// characters that form no token; those are reported and skipped.
    fn scan_operator(&mut self, start: Position) -> Option<Token> {
        let c = self.bump()?;

        let kind = match c {
            '+' => Kind::Plus,
            '-' => Kind::Minus,
            '*' => Kind::Star,
            '/' => Kind::Slash,
            '%' => Kind::Percent,
            '(' => Kind::LParen,
            ')' => Kind::RParen,
            '{' => Kind::LBrace,
            '}' => Kind::RBrace,
            ';' => Kind::Semicolon,
            ',' => Kind::Comma,
            '=' => {
                if self.at() == Some('=') {
                    self.bump();
                    Kind::Eq
                } else {
                    Kind::Assign
                }
            }
            '!' => {
                if self.at() == Some('=') {
                    self.bump();
                    Kind::NotEq
                } else {
                    Kind::Not
                }
            }
            '<' => {
                if self.at() == Some('=') {
                    self.bump();
                    Kind::LtEq
                } else {
                    Kind::Lt
                }
            }
            '>' => {
                if self.at() == Some('=') {
                    self.bump();
                    Kind::GtEq
                } else {
                    Kind::Gt
                }
            }
            '&' => {
                if self.at() == Some('&') {
                    self.bump();
                    Kind::And
                } else {
                    let span = self.span_from(start);
                    self.error("stray '&' (expected '&&')", span);
                    return None;
                }
            }
            '|' => {
                if self.at() == Some('|') {
                    self.bump();
                    Kind::Or
                } else {
                    let span = self.span_from(start);
                    self.error("stray '|' (expected '||')", span);
                    return None;
                }
            }
            other => {
                let span = self.span_from(start);
                self.error(format!("illegal character '{}'", other), span);
                return None;
            }
        };

        Some(Token::new(kind, self.lexeme_from(start), self.span_from(start)))
    }
}
