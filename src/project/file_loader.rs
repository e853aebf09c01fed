//! Reading Go source files of a package directory.

use std::path::{Path, PathBuf};

use crate::error::{ProfileError, Result};

/// Go source files of a package, sorted by file name.
///
/// Only the directory itself is read (sub-directories are other packages);
/// `_test.go` files are skipped.
pub fn collect_go_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ProfileError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ProfileError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && is_go_source(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Check for a `.go` file that is not a test file
pub fn is_go_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}

pub fn load_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ProfileError::io(path, e))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_collect_skips_tests_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.go", "a.go", "a_test.go", "README.md"] {
            std::fs::write(dir.path().join(name), "package x\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.go")).unwrap();

        let files = collect_go_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.go", "b.go"]);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = collect_go_files(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
    }
}
