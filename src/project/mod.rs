//! Source packages and how they are selected and read.
//!
//! - [`version`] - API version strings and their ordering
//! - [`package`] - [`SourcePackage`] and [`OperationGroup`]
//! - [`file_loader`] - Go files of a package directory
//! - [`import_path`] - Go import path of a package directory
//! - [`strategies`] - list and latest package selection

pub mod file_loader;
mod import_path;
mod package;
pub mod strategies;
mod version;

pub use import_path::{gopath_import_path, import_path};
pub use package::{OperationGroup, SourcePackage};
pub use strategies::{
    LatestOptions, LatestStrategy, ListStrategy, SelectionStrategy, StrategyKind,
};
pub use version::{VersionFormatError, VersionString, compare_versions, version_le};
