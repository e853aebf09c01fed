//! Package selection strategies.
//!
//! A strategy decides which source packages take part in a build and yields
//! them lazily as `Result<SourcePackage>`. Every strategy checks its
//! cancellation token before each yield and yields `Cancelled` once when it
//! fires. A strategy is consumed by iteration; re-run it by building a new one.
//!
//! - [`ListStrategy`] - newline-delimited package paths from a reader
//! - [`LatestStrategy`] - newest version per operation group under a root

mod latest;
mod list;

use std::fmt;
use std::str::FromStr;

use tokio_util::sync::CancellationToken;

use crate::error::Result;

use super::SourcePackage;

pub use latest::{LatestOptions, LatestPackages, LatestStrategy};
pub use list::{ListPackages, ListStrategy};

/// A source of packages for one build
pub trait SelectionStrategy {
    type Packages: Iterator<Item = Result<SourcePackage>>;

    /// Name used to select the strategy
    fn name(&self) -> &'static str;

    /// Start enumerating packages
    fn packages(self, cancel: CancellationToken) -> Self::Packages;
}

/// The fixed set of strategy names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StrategyKind {
    #[default]
    List,
    Latest,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Latest => "latest",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "latest" => Ok(Self::Latest),
            other => Err(format!(
                "unknown strategy `{}` (expected `list` or `latest`)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests;
