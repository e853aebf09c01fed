//! Position tracking for source files
//!
//! Converts rowan byte offsets into 1-based line/column pairs for
//! error reporting and symbol positions.

use rowan::{TextRange, TextSize};

/// A position in source code (1-based, column counted in bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A span of source text with both byte range and line/column bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub range: TextRange,
    pub start: LineCol,
    pub end: LineCol,
}

/// Maps byte offsets to line/column positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of every line
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based line/column
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        LineCol::new(line as u32 + 1, u32::from(col) + 1)
    }

    pub fn span(&self, range: TextRange) -> Span {
        Span {
            range,
            start: self.line_col(range.start()),
            end: self.line_col(range.end()),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
