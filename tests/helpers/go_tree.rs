//! Temporary Go source trees laid out like the SDK's `services/` directory.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Module path written to the tree's `go.mod`
pub const MODULE: &str = "github.com/Azure/azure-sdk-for-go/services";

/// A temporary tree with a `go.mod` at its root
pub struct GoTree {
    dir: TempDir,
}

impl GoTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("go.mod"), format!("module {}\n\ngo 1.13\n", MODULE))
            .expect("write go.mod");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `models.go` into the package at `relative` and return the
    /// package directory
    pub fn package(&self, relative: &str, source: &str) -> PathBuf {
        self.file(relative, "models.go", source)
    }

    /// Write one file into the package at `relative`
    pub fn file(&self, relative: &str, name: &str, source: &str) -> PathBuf {
        let dir = self.dir.path().join(relative);
        std::fs::create_dir_all(&dir).expect("create package dir");
        std::fs::write(dir.join(name), source).expect("write Go file");
        dir
    }

    /// Newline-delimited list of package paths relative to the root
    pub fn list(relative: &[&str]) -> String {
        relative.iter().map(|p| format!("{}\n", p)).collect()
    }
}

/// Package source with one enum type and constant
pub fn enum_source(package: &str, underlying: &str, value: &str) -> String {
    format!(
        "package {package}\n\ntype MyEnum {underlying}\n\nconst Foo MyEnum = {value}\n"
    )
}
