//! Source package identity.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use smol_str::SmolStr;

use super::VersionString;

/// `<provider>/<type>/<version>/<group>` at the end of a slash-separated path
static VERSIONED_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)([^/]+)/([^/]+)/(\d{4}-\d{2}-\d{2}(?:-[A-Za-z0-9._-]+)?)/([^/]+)/?$")
        .expect("valid package shape regex")
});

/// Key used by the latest strategy to keep one version per group
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationGroup {
    pub provider: SmolStr,
    pub resource_type: SmolStr,
    pub group: SmolStr,
}

impl fmt::Display for OperationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.provider, self.resource_type, self.group)
    }
}

/// One versioned API package selected for a build
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePackage {
    pub provider: SmolStr,
    pub resource_type: SmolStr,
    pub version: Option<VersionString>,
    pub group: SmolStr,
    pub path: PathBuf,
}

impl SourcePackage {
    /// Build a package from its path, filling in provider, type and version
    /// when the path ends in `<provider>/<type>/<version>/<group>`.
    ///
    /// Paths without that shape only get the last component as group.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(package) = Self::from_versioned_path(&path) {
            return package;
        }
        let group = path
            .file_name()
            .map(|name| SmolStr::new(name.to_string_lossy()))
            .unwrap_or_default();
        Self {
            provider: SmolStr::default(),
            resource_type: SmolStr::default(),
            version: None,
            group,
            path,
        }
    }

    /// Parse the versioned shape; `None` when the path does not match or the
    /// version segment is not a valid version string.
    pub fn from_versioned_path(path: &Path) -> Option<Self> {
        let text = path_to_slashes(path);
        let caps = VERSIONED_SHAPE.captures(&text)?;
        let version = VersionString::parse(&caps[3]).ok()?;
        Some(Self {
            provider: SmolStr::new(&caps[1]),
            resource_type: SmolStr::new(&caps[2]),
            version: Some(version),
            group: SmolStr::new(&caps[4]),
            path: path.to_path_buf(),
        })
    }

    pub fn operation_group(&self) -> OperationGroup {
        OperationGroup {
            provider: self.provider.clone(),
            resource_type: self.resource_type.clone(),
            group: self.group.clone(),
        }
    }

    /// Relative directory of this package's profile in the per-package
    /// layout: `<provider>/<type>/<group>`
    pub fn profile_dir(&self) -> PathBuf {
        [&self.provider, &self.resource_type, &self.group]
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.as_str())
            .collect()
    }
}

impl fmt::Display for SourcePackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn path_to_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
