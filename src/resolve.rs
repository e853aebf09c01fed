//! Collision resolution across source packages.
//!
//! Symbols are claimed in package enumeration order and then declaration
//! order, so display names are stable across runs for the same input.
//!
//! For a name exported by more than one package:
//! - same kind and same fingerprint: the later symbol is dropped, except for
//!   defined types (distinct in every package) and constants of them
//! - types, variables, and constants that are untyped or typed with a
//!   foreign type: the later symbol is renamed `Name1`, `Name2`, ...
//! - functions with differing signatures, constants of a local enum type,
//!   kind mismatches and duplicates inside one package: [`ProfileError::Collision`]

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::error::{ProfileError, Result};
use crate::symbols::{PackageSymbols, Symbol, SymbolDetail, SymbolKind, TypeExpr, fingerprint};

/// A symbol that made it into the profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    /// Index of the declaring package in enumeration order
    pub package: usize,
    /// Index into that package's `symbols`
    pub symbol: usize,
    pub display_name: SmolStr,
}

impl ResolvedSymbol {
    pub fn get<'a>(&self, packages: &'a [PackageSymbols]) -> &'a Symbol {
        &packages[self.package].symbols[self.symbol]
    }
}

/// Output of resolution
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub symbols: Vec<ResolvedSymbol>,
    /// Per package, type names whose display name differs from the original
    pub type_renames: Vec<FxHashMap<SmolStr, SmolStr>>,
    /// Number of identical re-exports dropped
    pub deduplicated: usize,
}

impl Resolution {
    /// Display name of a type of `package`
    pub fn type_name<'a>(&'a self, package: usize, name: &'a SmolStr) -> &'a SmolStr {
        self.type_renames
            .get(package)
            .and_then(|renames| renames.get(name))
            .unwrap_or(name)
    }
}

/// One earlier claimant of an original name
#[derive(Debug, Clone)]
struct Claim {
    package: usize,
    kind: SymbolKind,
    fingerprint: u64,
    display_name: SmolStr,
}

/// Running state of resolution: every claim made so far and the set of
/// names no rename may take.
#[derive(Debug, Default)]
pub struct CollisionTable {
    claims: FxHashMap<SmolStr, Vec<Claim>>,
    /// Original names of every input package plus assigned display names
    reserved: FxHashSet<SmolStr>,
    resolution: Resolution,
}

impl CollisionTable {
    /// Start a table for the given packages; their names are reserved
    pub fn new(packages: &[PackageSymbols]) -> Self {
        let reserved = packages
            .iter()
            .flat_map(|p| p.top_level().map(|s| s.name.clone()))
            .collect();
        Self {
            claims: FxHashMap::default(),
            reserved,
            resolution: Resolution {
                type_renames: vec![FxHashMap::default(); packages.len()],
                ..Resolution::default()
            },
        }
    }

    /// Claim the top-level symbols of one package
    pub fn add_package(&mut self, index: usize, packages: &[PackageSymbols]) -> Result<()> {
        let package = &packages[index];
        for (symbol_index, symbol) in package.symbols.iter().enumerate() {
            if !symbol.kind.is_top_level() {
                continue;
            }
            self.add_symbol(index, symbol_index, packages)?;
        }
        Ok(())
    }

    fn add_symbol(&mut self, index: usize, symbol_index: usize, packages: &[PackageSymbols]) -> Result<()> {
        let package = &packages[index];
        let symbol = &package.symbols[symbol_index];
        let digest = fingerprint(symbol, package);
        let claims = self.claims.entry(symbol.name.clone()).or_default();

        let collision = |other: usize, reason: String| {
            ProfileError::collision(
                symbol.name.as_str(),
                &packages[other].package.path,
                &package.package.path,
                reason,
            )
        };

        if let Some(first) = claims.first() {
            if claims.iter().any(|c| c.package == index) {
                return Err(collision(index, "declared more than once in one package".into()));
            }
            if first.kind != symbol.kind {
                return Err(collision(
                    first.package,
                    format!("{} and {} share the name", first.kind.display(), symbol.kind.display()),
                ));
            }
        }

        let shareable = may_share(symbol, package);
        let identical = if shareable {
            claims
                .iter()
                .find(|c| c.kind == symbol.kind && c.fingerprint == digest)
                .map(|c| c.display_name.clone())
        } else {
            None
        };

        let display_name = if let Some(display_name) = identical {
            tracing::debug!(symbol = %symbol.name, package = %package.package, "dropping identical re-export");
            self.resolution.deduplicated += 1;
            if symbol.kind == SymbolKind::Type && display_name != symbol.name {
                self.resolution.type_renames[index].insert(symbol.name.clone(), display_name.clone());
            }
            claims.push(Claim {
                package: index,
                kind: symbol.kind,
                fingerprint: digest,
                display_name,
            });
            return Ok(());
        } else if let Some(first) = claims.first() {
            match &symbol.detail {
                SymbolDetail::Func { .. } => {
                    return Err(collision(first.package, "function signatures differ".into()));
                }
                SymbolDetail::Const { group: Some(enum_type), .. } => {
                    let reason = if shareable {
                        format!("constant of enum type `{}` differs", enum_type)
                    } else {
                        format!("constant of enum type `{}`, which each package defines itself", enum_type)
                    };
                    return Err(collision(first.package, reason));
                }
                _ => {}
            }
            let renamed = next_free_name(&symbol.name, &self.reserved);
            tracing::info!(symbol = %symbol.name, renamed = %renamed, package = %package.package, "renaming colliding symbol");
            self.reserved.insert(renamed.clone());
            if symbol.kind == SymbolKind::Type {
                self.resolution.type_renames[index].insert(symbol.name.clone(), renamed.clone());
            }
            renamed
        } else {
            symbol.name.clone()
        };

        claims.push(Claim {
            package: index,
            kind: symbol.kind,
            fingerprint: digest,
            display_name: display_name.clone(),
        });
        self.resolution.symbols.push(ResolvedSymbol {
            package: index,
            symbol: symbol_index,
            display_name,
        });
        Ok(())
    }

    pub fn finish(self) -> Resolution {
        self.resolution
    }
}

/// Whether an identical symbol of another package may stand in for this one.
///
/// Defined types of different packages are distinct types even when their
/// definitions match; only aliases of one type in a third package coincide.
/// Constants of an enum type follow their type.
fn may_share(symbol: &Symbol, package: &PackageSymbols) -> bool {
    match &symbol.detail {
        SymbolDetail::Type {
            definition,
            is_alias,
            ..
        } => is_shared_alias(definition, *is_alias),
        SymbolDetail::Const {
            group: Some(enum_type),
            ..
        } => package
            .local_types
            .get(enum_type)
            .is_some_and(|local| is_shared_alias(&local.definition, local.is_alias)),
        _ => true,
    }
}

fn is_shared_alias(definition: &TypeExpr, is_alias: bool) -> bool {
    is_alias && matches!(definition, TypeExpr::Named { package: Some(_), .. })
}

/// Resolve all packages in enumeration order
pub fn resolve(packages: &[PackageSymbols]) -> Result<Resolution> {
    let mut table = CollisionTable::new(packages);
    for index in 0..packages.len() {
        table.add_package(index, packages)?;
    }
    Ok(table.finish())
}

/// `Name1`, `Name2`, ... the first not in `reserved`
fn next_free_name(name: &str, reserved: &FxHashSet<SmolStr>) -> SmolStr {
    (1u32..)
        .map(|n| SmolStr::new(format!("{}{}", name, n)))
        .find(|candidate| !reserved.contains(candidate))
        .unwrap_or_else(|| SmolStr::new(name))
}

#[cfg(test)]
mod tests;
