//! Newest API version per operation group.

use std::collections::BTreeMap;
use std::collections::btree_map::{Entry, IntoValues};
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::error::{ProfileError, Result};
use crate::project::{OperationGroup, SourcePackage};

use super::SelectionStrategy;

/// Options for the latest walk
#[derive(Debug, Clone, Default)]
pub struct LatestOptions {
    /// Skip `-preview` versions and anything under a `preview` directory
    pub exclude_preview: bool,
}

impl LatestOptions {
    pub fn exclude_preview(mut self, exclude: bool) -> Self {
        self.exclude_preview = exclude;
        self
    }
}

/// Walks a root directory and keeps the highest version of every
/// `<provider>/<type>/<version>/<group>` package
pub struct LatestStrategy {
    root: PathBuf,
    options: LatestOptions,
}

impl LatestStrategy {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: LatestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LatestOptions) -> Self {
        self.options = options;
        self
    }
}

impl SelectionStrategy for LatestStrategy {
    type Packages = LatestPackages;

    fn name(&self) -> &'static str {
        "latest"
    }

    fn packages(self, cancel: CancellationToken) -> LatestPackages {
        LatestPackages {
            root: self.root,
            options: self.options,
            cancel,
            winners: None,
            done: false,
        }
    }
}

/// Yields the winners of the walk in operation-group order.
///
/// The walk runs on the first call to `next`.
pub struct LatestPackages {
    root: PathBuf,
    options: LatestOptions,
    cancel: CancellationToken,
    winners: Option<IntoValues<OperationGroup, SourcePackage>>,
    done: bool,
}

impl LatestPackages {
    fn walk(&self) -> Result<BTreeMap<OperationGroup, SourcePackage>> {
        if !self.root.is_dir() {
            return Err(ProfileError::io(
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "root directory not found"),
            ));
        }

        let mut table: BTreeMap<OperationGroup, SourcePackage> = BTreeMap::new();
        let entries = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable entry");
                    None
                }
            });

        for entry in entries {
            if self.cancel.is_cancelled() {
                return Err(ProfileError::Cancelled);
            }
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(package) = self.candidate(entry.path()) else {
                continue;
            };
            match table.entry(package.operation_group()) {
                Entry::Vacant(slot) => {
                    tracing::trace!(package = %package, "first version of group");
                    slot.insert(package);
                }
                Entry::Occupied(mut slot) => {
                    if package.version > slot.get().version {
                        tracing::trace!(package = %package, replaces = %slot.get(), "newer version");
                        slot.insert(package);
                    }
                }
            }
        }
        Ok(table)
    }

    /// Package at `path` when its path below the root has the versioned shape
    fn candidate(&self, path: &Path) -> Option<SourcePackage> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut package = SourcePackage::from_versioned_path(relative)?;
        if self.options.exclude_preview && is_preview(relative, &package) {
            tracing::debug!(path = %relative.display(), "excluding preview package");
            return None;
        }
        package.path = path.to_path_buf();
        Some(package)
    }
}

fn is_preview(relative: &Path, package: &SourcePackage) -> bool {
    package.version.as_ref().is_some_and(|v| v.is_preview())
        || relative.components().any(|c| c.as_os_str() == "preview")
}

impl Iterator for LatestPackages {
    type Item = Result<SourcePackage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.done = true;
            return Some(Err(ProfileError::Cancelled));
        }
        if self.winners.is_none() {
            match self.walk() {
                Ok(table) => {
                    tracing::debug!(root = %self.root.display(), groups = table.len(), "latest walk finished");
                    self.winners = Some(table.into_values());
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        let next = self.winners.as_mut()?.next();
        if next.is_none() {
            self.done = true;
        }
        next.map(Ok)
    }
}
