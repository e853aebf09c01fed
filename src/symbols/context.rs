//! Extraction context: the file being walked and its line index.

use std::path::{Path, PathBuf};

use rowan::TextRange;

use crate::base::{FileId, LineIndex, Span};
use crate::error::ProfileError;

/// Per-file state passed through the extraction functions.
pub(super) struct ExtractionContext<'a> {
    pub package_path: &'a Path,
    pub file_path: PathBuf,
    pub file: FileId,
    /// Line index for converting byte offsets to line/column
    pub line_index: LineIndex,
    /// Position of the current spec inside a `const` group
    pub iota: usize,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(package_path: &'a Path, file_path: PathBuf, file: FileId, text: &str) -> Self {
        Self {
            package_path,
            file_path,
            file,
            line_index: LineIndex::new(text),
            iota: 0,
        }
    }

    pub fn span(&self, range: TextRange) -> Span {
        self.line_index.span(range)
    }

    /// Parse error located at `range` of the current file
    pub fn error(&self, range: TextRange, message: impl Into<String>) -> ProfileError {
        let start = self.line_index.line_col(range.start());
        ProfileError::Parse {
            package: self.package_path.to_path_buf(),
            file: self.file_path.clone(),
            line: start.line,
            col: start.col,
            message: message.into(),
        }
    }
}
