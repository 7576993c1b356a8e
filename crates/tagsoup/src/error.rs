//! Structural errors raised when a leniency flag is off.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Strict mode: a `<`, `<!`, `<?` or tag interior that matches no construct.
    MalformedConstruct,
    /// End tag with no open match and no implicit-open rule.
    UnbalancedEndTag,
    /// End tag whose match is buried under open descendants, auto-close off.
    BlockedEndTag,
    /// Elements still open at end of input, auto-close off.
    UnclosedElements,
}

/// Fatal error for one input.
///
/// Offsets are absolute over the whole logical input. `source` is the input
/// text covered by `start..end` (empty for zero-width positions).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralError {
    pub kind: ErrorKind,
    pub message: String,
    pub source: String,
    pub start: usize,
    pub end: usize,
}

impl StructuralError {
    pub(crate) fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        debug_assert!(start <= end, "error span start must be <= end");
        Self {
            kind,
            message: message.into(),
            source: String::new(),
            start,
            end,
        }
    }

    /// Fill `source` from `buffer`, whose first byte sits at absolute `base`.
    ///
    /// Leaves `source` untouched when it is already set or when the span is
    /// not fully inside the buffer.
    pub(crate) fn with_source(mut self, buffer: &str, base: usize) -> Self {
        if !self.source.is_empty() || self.start < base {
            return self;
        }
        if let Some(text) = buffer.get(self.start - base..self.end - base) {
            self.source = text.to_string();
        }
        self
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.start, self.end)?;
        if !self.source.is_empty() {
            write!(f, " ({:?})", self.source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StructuralError {}
