//! Import table of a synthesized package.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::symbols::default_import_name;

/// One import of the output package
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Import {
    /// Local name the package is referenced by
    pub name: SmolStr,
    pub path: String,
}

impl Import {
    /// The explicit alias to write, `None` when Go would infer `name`
    pub fn explicit_alias(&self) -> Option<&str> {
        (default_import_name(&self.path) != self.name).then_some(self.name.as_str())
    }

    /// Standard library imports have no dot in their first path element
    pub fn is_std(&self) -> bool {
        !self.path.split('/').next().is_some_and(|first| first.contains('.'))
    }
}

/// Import path to local name, with names kept unique
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    by_path: IndexMap<String, SmolStr>,
    names: FxHashSet<SmolStr>,
}

impl ImportTable {
    /// Local name of `path`, adding it under `preferred` (or `preferred1`,
    /// `preferred2`, ... when taken) on first use
    pub fn add(&mut self, preferred: &str, path: &str) -> SmolStr {
        if let Some(name) = self.by_path.get(path) {
            return name.clone();
        }
        let name = if self.names.contains(preferred) {
            (1u32..)
                .map(|n| SmolStr::new(format!("{}{}", preferred, n)))
                .find(|candidate| !self.names.contains(candidate))
                .unwrap_or_else(|| SmolStr::new(preferred))
        } else {
            SmolStr::new(preferred)
        };
        self.names.insert(name.clone());
        self.by_path.insert(path.to_string(), name.clone());
        name
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Drop imports whose local name fails `keep`
    pub fn retain_names(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.by_path.retain(|_, name| keep(name));
        self.names.retain(|name| keep(name));
    }

    pub fn into_imports(self) -> Vec<Import> {
        self.by_path
            .into_iter()
            .map(|(path, name)| Import { name, path })
            .collect()
    }
}
