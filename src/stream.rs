use crate::token::{Kind, Token};

/// Buffered cursor over the lexer output. `peek` and `advance` saturate at
/// the EOF token, so the parser can never run off the end of the input.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

/// Opaque marker for rewinding a `TokenStream`. Comparing two checkpoints
/// tells whether any token was consumed between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl TokenStream {
    /// The token vector must end with an EOF token, which the lexer guarantees.
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(tokens.last(), Some(t) if t.is_eof()));
        Self { tokens, pos: 0 }
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.tokens.len() - 1)
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.clamp(self.pos)]
    }

    /// Look ahead k tokens without consuming. `peek(0)` is the current token;
    /// anything past the end is the EOF token.
    pub fn peek(&self, k: usize) -> &Token {
        &self.tokens[self.clamp(self.pos + k)]
    }

    /// Consume and return the current token. At EOF this keeps returning the
    /// EOF token without moving.
    pub fn advance(&mut self) -> Token {
        let token = self.tokens[self.clamp(self.pos)].clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    pub fn at(&self, kind: Kind) -> bool {
        self.current().kind == kind
    }

    pub fn at_eof(&self) -> bool {
        self.current().is_eof()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;
    use crate::source::SourceBuffer;

    fn stream(input: &str) -> TokenStream {
        let (tokens, _) = lexer::tokenize(&SourceBuffer::new(input));
        TokenStream::new(tokens)
    }

    #[test]
    fn advance_saturates_at_eof() {
        let mut s = stream("x");
        assert_eq!(s.advance().kind, Kind::Identifier);
        assert_eq!(s.advance().kind, Kind::Eof);
        assert_eq!(s.advance().kind, Kind::Eof);
        assert_eq!(s.advance().kind, Kind::Eof);
    }

    #[test]
    fn peek_past_end_returns_eof() {
        let s = stream("x = 1");
        assert_eq!(s.peek(0).kind, Kind::Identifier);
        assert_eq!(s.peek(1).kind, Kind::Assign);
        assert_eq!(s.peek(2).kind, Kind::Integer);
        assert_eq!(s.peek(3).kind, Kind::Eof);
        assert_eq!(s.peek(100).kind, Kind::Eof);
    }

    #[test]
    fn checkpoint_and_restore_rewind() {
        let mut s = stream("a b c");
        let cp = s.checkpoint();
        assert_eq!(s.advance().lexeme, "a");
        assert_eq!(s.advance().lexeme, "b");
        s.restore(cp);
        assert_eq!(s.advance().lexeme, "a");
    }
}
