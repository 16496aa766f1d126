/// Read-only view of one compilation unit's source text, indexed by
/// character so the lexer can address positions uniformly.
pub struct SourceBuffer {
    chars: Vec<char>,
}

impl SourceBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    pub fn get(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The text between two character offsets.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slicing_is_by_character() {
        let buf = SourceBuffer::new("var x = 1;");
        assert_eq!(buf.slice(4, 5), "x");
        assert_eq!(buf.len(), 10);
    }
}
