//! Alias synthesis: the in-memory output package of a profile.
//!
//! Every resolved symbol becomes one [`AliasDecl`]:
//! - types become `type X = pkg.X`
//! - constants and variables become `X = pkg.X` entries of their blocks,
//!   enum constants carrying their enum type
//! - functions become forwarding [`FuncWrapper`]s
//!
//! Methods are never re-declared; the type alias carries the method set.

mod imports;
mod wrapper;

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::resolve::Resolution;
use crate::symbols::{PackageSymbols, SymbolDetail, is_exported};

pub use imports::{Import, ImportTable};
pub use wrapper::FuncWrapper;

use wrapper::{WrapperContext, assign_names, build_wrapper};

/// Import alias of the source package in a single-package profile
pub const SINGLE_SOURCE_ALIAS: &str = "original";

/// `pkg.Name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub package: SmolStr,
    pub name: SmolStr,
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// What an alias declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasKind {
    Type,
    Const {
        /// Display name of the enum type the constant belongs to
        enum_type: Option<SmolStr>,
    },
    Var,
    Func(FuncWrapper),
}

/// One declaration of the output package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDecl {
    pub display_name: SmolStr,
    pub target: QualifiedName,
    pub kind: AliasKind,
}

/// A function that could not be re-exported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSymbol {
    pub name: SmolStr,
    pub reason: String,
}

/// The output package of a profile build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedPackage {
    pub name: SmolStr,
    pub imports: Vec<Import>,
    /// Display name to declaration; display names are unique
    pub decls: IndexMap<SmolStr, AliasDecl>,
    pub skipped: Vec<SkippedSymbol>,
}

impl SynthesizedPackage {
    pub fn get(&self, display_name: &str) -> Option<&AliasDecl> {
        self.decls.get(display_name)
    }
}

/// Names for the output package
#[derive(Debug, Clone, Default)]
pub struct SynthOptions {
    /// `package` clause of the output
    pub package_name: SmolStr,
    /// Profile name, used in the `UserAgent` wrapper
    pub profile_name: String,
}

/// Build the output package from resolved symbols
pub fn synthesize(
    packages: &[PackageSymbols],
    resolution: &Resolution,
    options: &SynthOptions,
) -> SynthesizedPackage {
    let mut imports = ImportTable::default();
    let source_aliases: Vec<SmolStr> = packages
        .iter()
        .map(|package| {
            let preferred = if packages.len() == 1 {
                SmolStr::new(SINGLE_SOURCE_ALIAS)
            } else {
                source_alias(package)
            };
            imports.add(&preferred, &package.import_path)
        })
        .collect();

    let mut decls = IndexMap::new();
    let mut skipped = Vec::new();
    for resolved in &resolution.symbols {
        let package = &packages[resolved.package];
        let symbol = resolved.get(packages);
        let kind = match &symbol.detail {
            SymbolDetail::Type { .. } => AliasKind::Type,
            SymbolDetail::Const { group, .. } => AliasKind::Const {
                enum_type: group
                    .as_ref()
                    .filter(|group| is_exported(group))
                    .map(|group| resolution.type_name(resolved.package, group).clone()),
            },
            SymbolDetail::Var { .. } => AliasKind::Var,
            SymbolDetail::Func { signature } => {
                let cx = WrapperContext {
                    package,
                    package_index: resolved.package,
                    symbol,
                    resolution,
                    profile_name: &options.profile_name,
                };
                match build_wrapper(&cx, signature, &mut imports) {
                    Ok(wrapper) => AliasKind::Func(wrapper),
                    Err(reason) => {
                        tracing::warn!(symbol = %symbol.name, package = %package.package, %reason, "skipping function");
                        skipped.push(SkippedSymbol {
                            name: symbol.name.clone(),
                            reason,
                        });
                        continue;
                    }
                }
            }
            SymbolDetail::Method { .. } | SymbolDetail::InterfaceMethod { .. } => continue,
        };
        decls.insert(
            resolved.display_name.clone(),
            AliasDecl {
                display_name: resolved.display_name.clone(),
                target: QualifiedName {
                    package: source_aliases[resolved.package].clone(),
                    name: symbol.name.clone(),
                },
                kind,
            },
        );
    }

    // Source packages whose symbols were all deduplicated away
    let mut used: FxHashSet<SmolStr> = FxHashSet::default();
    for decl in decls.values() {
        used.insert(decl.target.package.clone());
        if let AliasKind::Func(wrapper) = &decl.kind {
            wrapper.signature.walk_named(&mut |package, _| {
                if let Some(package) = package {
                    used.insert(SmolStr::new(package));
                }
            });
        }
    }
    imports.retain_names(|name| used.contains(name));

    // Parameter names depend on the final set of import names
    for decl in decls.values_mut() {
        if let AliasKind::Func(wrapper) = &mut decl.kind {
            assign_names(wrapper, &imports);
        }
    }

    tracing::debug!(
        package = %options.package_name,
        decls = decls.len(),
        skipped = skipped.len(),
        "synthesized package"
    );
    SynthesizedPackage {
        name: options.package_name.clone(),
        imports: imports.into_imports(),
        decls,
        skipped,
    }
}

/// `<group><version digits>`, reduced to a valid Go identifier
pub fn source_alias(package: &PackageSymbols) -> SmolStr {
    let source = &package.package;
    let digits = source.version.as_ref().map(|v| v.digits()).unwrap_or_default();
    let group = if source.group.is_empty() {
        package.package_name.as_str()
    } else {
        source.group.as_str()
    };
    go_identifier(&format!("{}{}", group, digits))
}

/// Replace characters Go does not allow in identifiers
pub fn go_identifier(text: &str) -> SmolStr {
    let mut ident: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, 'p');
    }
    SmolStr::new(ident)
}
