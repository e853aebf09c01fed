//! Error types for profile builds.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::project::VersionFormatError;

/// Result alias used throughout the crate.
pub type Result<T, E = ProfileError> = std::result::Result<T, E>;

/// Errors that abort a profile build.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A source file of a package failed to parse.
    #[error("{}:{line}:{col}: {message} (package {})", file.display(), package.display())]
    Parse {
        package: PathBuf,
        file: PathBuf,
        line: u32,
        col: u32,
        message: String,
    },

    /// A version string does not match `YYYY-MM-DD[-tag]`.
    #[error(transparent)]
    VersionFormat(#[from] VersionFormatError),

    /// Two source packages export symbols that cannot share one namespace.
    #[error(
        "collision on `{symbol}` between {} and {}: {reason}",
        first.display(),
        second.display()
    )]
    Collision {
        symbol: String,
        first: PathBuf,
        second: PathBuf,
        reason: String,
    },

    /// Reading input or writing output failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build was cancelled before it completed.
    #[error("build cancelled")]
    Cancelled,

    /// The selection strategy produced no packages.
    #[error("no source packages selected")]
    NoPackages,

    /// Invalid combination of options.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProfileError {
    /// Create an I/O error for a path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a collision error between two packages.
    pub fn collision(
        symbol: impl Into<String>,
        first: impl AsRef<Path>,
        second: impl AsRef<Path>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Collision {
            symbol: symbol.into(),
            first: first.as_ref().to_path_buf(),
            second: second.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
