//! Foundation types for the profile builder.
//!
//! - [`LineIndex`], [`LineCol`], [`Span`] - byte offset to line/column mapping
//! - [`FileId`] - index of a source file within one extracted package
//!
//! This module has NO dependencies on other crate modules.

mod position;

pub use position::{LineCol, LineIndex, Span};

pub use rowan::{TextRange, TextSize};

/// Index of a source file inside one package's file table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}
