use crate::span::Span;
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Which analysis phase detected the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Lexical,
    Syntax,
}

impl Phase {
    fn label(&self) -> &'static str {
        match self {
            Phase::Lexical => "LexicalError",
            Phase::Syntax => "SyntaxError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub phase: Phase,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            phase: Phase::Lexical,
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            phase: Phase::Syntax,
            message: message.into(),
            span,
        }
    }

    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Format for the CLI, pointing at the offending file location.
    pub fn render(&self, path: &Path) -> String {
        let label = match self.severity {
            Severity::Error => self.phase.label().to_string(),
            Severity::Warning => format!("Warning ({})", self.phase.label()),
        };
        format!(
            "{}: {}\n  --> {}:{}:{}",
            label,
            self.message,
            path.display(),
            self.span.start.line,
            self.span.start.column,
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}",
            self.phase.label(),
            self.message,
            self.span.start
        )
    }
}

/// Accumulates diagnostics in detection order. No deduplication: every
/// distinct detection point reports once.
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn all(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Extend<Diagnostic> for Reporter {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}

/// Order diagnostics by source position for user-facing output, keeping
/// detection order for ties. Lexer and parser each report in their own
/// detection order, so a merged listing needs this before printing.
pub fn sort_by_position(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| d.span.start.offset);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Position, Span};

    fn span_at(offset: usize) -> Span {
        Span::point(Position {
            line: 1,
            column: offset + 1,
            offset,
        })
    }

    #[test]
    fn reporter_keeps_detection_order() {
        let mut reporter = Reporter::new();
        reporter.report(Diagnostic::syntax("first", span_at(5)));
        reporter.report(Diagnostic::syntax("second", span_at(2)));
        assert_eq!(reporter.all()[0].message, "first");
        assert_eq!(reporter.all()[1].message, "second");
        assert!(reporter.has_errors());
    }

    #[test]
    fn warnings_are_not_errors() {
        let mut reporter = Reporter::new();
        reporter.report(Diagnostic::lexical("odd escape", span_at(0)).warning());
        assert!(!reporter.has_errors());
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn sorting_is_by_offset() {
        let mut diags = vec![
            Diagnostic::syntax("later", span_at(9)),
            Diagnostic::lexical("earlier", span_at(3)),
        ];
        sort_by_position(&mut diags);
        assert_eq!(diags[0].message, "earlier");
    }
}
