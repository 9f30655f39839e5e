//! Source location tracking

/// A span represents a range in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Merge two spans
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// 1-based line and column of the span start within `source`.
    ///
    /// Returns `None` when the offset lies outside the source, which is the
    /// case for default spans over an empty input.
    pub fn location(&self, source: &str) -> Option<(u32, u32)> {
        if self.start > source.len() || !source.is_char_boundary(self.start) {
            return None;
        }
        let before = &source[..self.start];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = source[line_start..self.start].chars().count() + 1;
        Some((line as u32, column as u32))
    }
}
