//! Lexer and recursive-descent parser for the GOX language.

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod span;
pub mod stream;
pub mod token;

use ast::Program;
use diagnostics::Diagnostic;
use source::SourceBuffer;
use token::Token;

/// Tokenize source text. Never fails; malformed input surfaces as diagnostics.
pub fn tokenize(text: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    lexer::tokenize(&SourceBuffer::new(text))
}

/// Run the full pass: tokenize, parse, and merge the diagnostics of both
/// phases in source order. Always returns a best-effort AST.
pub fn analyze(text: &str) -> (Program, Vec<Diagnostic>) {
    let (tokens, mut diags) = tokenize(text);
    let (program, parse_diags) = parser::parse(tokens);
    diags.extend(parse_diags);
    diagnostics::sort_by_position(&mut diags);
    (program, diags)
}
