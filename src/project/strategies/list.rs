//! Explicit package list.

use std::io::{BufRead, Lines};
use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::error::{ProfileError, Result};
use crate::project::SourcePackage;

use super::SelectionStrategy;

/// Reads one package path per line
pub struct ListStrategy<R> {
    reader: R,
    /// Name of the input used in error messages (`<stdin>` or the list file)
    source: PathBuf,
    root: Option<PathBuf>,
}

impl<R: BufRead> ListStrategy<R> {
    pub fn new(reader: R, source: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            source: source.into(),
            root: None,
        }
    }

    /// Resolve relative entries against `root`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
}

impl<R: BufRead> SelectionStrategy for ListStrategy<R> {
    type Packages = ListPackages<R>;

    fn name(&self) -> &'static str {
        "list"
    }

    fn packages(self, cancel: CancellationToken) -> ListPackages<R> {
        ListPackages {
            lines: self.reader.lines(),
            source: self.source,
            root: self.root,
            cancel,
            done: false,
        }
    }
}

/// Lazy iterator over the entries of a package list
pub struct ListPackages<R> {
    lines: Lines<R>,
    source: PathBuf,
    root: Option<PathBuf>,
    cancel: CancellationToken,
    done: bool,
}

impl<R> ListPackages<R> {
    fn resolve(&self, entry: &str) -> PathBuf {
        let path = PathBuf::from(entry);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

impl<R: BufRead> Iterator for ListPackages<R> {
    type Item = Result<SourcePackage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if self.cancel.is_cancelled() {
                self.done = true;
                return Some(Err(ProfileError::Cancelled));
            }
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.done = true;
                    return Some(Err(ProfileError::io(&self.source, e)));
                }
            };
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }
            let package = SourcePackage::from_path(self.resolve(entry));
            tracing::trace!(package = %package, "listed package");
            return Some(Ok(package));
        }
    }
}
