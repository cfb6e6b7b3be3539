use std::ops::Range;

/// Line range of a parsed element in its source file (0-indexed, exclusive end)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpan {
    pub line_range: Range<usize>,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        LineSpan {
            line_range: start..end,
        }
    }

    pub fn start(&self) -> usize {
        self.line_range.start
    }

    pub fn end(&self) -> usize {
        self.line_range.end
    }

    /// Number of lines covered by this span
    pub fn len(&self) -> usize {
        self.line_range.end.saturating_sub(self.line_range.start)
    }

    pub fn is_empty(&self) -> bool {
        self.line_range.end <= self.line_range.start
    }
}
