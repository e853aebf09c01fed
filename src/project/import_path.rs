//! Go import paths of package directories.

use std::path::{Component, Path};

use crate::error::{ProfileError, Result};

/// Import path of the package in `dir`.
///
/// Uses the nearest enclosing `go.mod`; without one, falls back to
/// [`gopath_import_path`].
pub fn import_path(dir: &Path) -> Result<String> {
    let absolute = std::path::absolute(dir).map_err(|e| ProfileError::io(dir, e))?;
    for ancestor in absolute.ancestors() {
        let go_mod = ancestor.join("go.mod");
        if !go_mod.is_file() {
            continue;
        }
        let text = std::fs::read_to_string(&go_mod).map_err(|e| ProfileError::io(&go_mod, e))?;
        if let Some(module) = module_path(&text) {
            let relative = slash_path(absolute.strip_prefix(ancestor).unwrap_or(Path::new("")));
            tracing::trace!(dir = %dir.display(), module, "import path from go.mod");
            return Ok(if relative.is_empty() {
                module.to_string()
            } else {
                format!("{}/{}", module, relative)
            });
        }
    }
    Ok(gopath_import_path(dir))
}

/// GOPATH-style import path: everything after the last `src` component,
/// or the whole path when there is none
pub fn gopath_import_path(dir: &Path) -> String {
    let components: Vec<_> = dir
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    let start = components
        .iter()
        .rposition(|c| c.as_os_str() == "src")
        .map_or(0, |i| i + 1);
    slash_path(&components[start..].iter().collect::<std::path::PathBuf>())
}

/// `module` directive of a go.mod file
fn module_path(go_mod: &str) -> Option<&str> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(rest.trim().trim_matches('"'))
    })
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
