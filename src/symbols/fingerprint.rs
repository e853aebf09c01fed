//! Stable fingerprints of symbols.
//!
//! A fingerprint is an `FxHasher` digest of a symbol's canonical text. Local
//! type references inside a symbol contribute the digest of that type's
//! definition and method set, so two same-named constants typed with
//! differently-defined enums never fingerprint alike.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use smol_str::SmolStr;

use super::types::{LocalType, MethodInfo, PackageSymbols, Symbol, SymbolDetail, TypeExpr};

/// Digest of a symbol in the context of its package
pub fn fingerprint(symbol: &Symbol, package: &PackageSymbols) -> u64 {
    let mut hasher = FxHasher::default();
    symbol.kind.hash(&mut hasher);
    match &symbol.detail {
        SymbolDetail::Type {
            definition,
            is_alias,
            methods,
        } => {
            is_alias.hash(&mut hasher);
            // qualifiers stand for their import paths
            let file = package.file(symbol.file);
            let resolved = definition.map_named(&mut |qualifier, name| TypeExpr::Named {
                package: qualifier.map(|q| {
                    file.resolve_qualifier(q)
                        .map_or_else(|| q.clone(), SmolStr::new)
                }),
                name: name.clone(),
            });
            resolved.to_string().hash(&mut hasher);
            hash_methods(methods, &mut hasher);
        }
        SymbolDetail::Const { ty, value, .. } => {
            hash_optional_type(ty.as_ref(), package, &mut hasher);
            value.hash(&mut hasher);
        }
        SymbolDetail::Var { ty, value } => {
            hash_optional_type(ty.as_ref(), package, &mut hasher);
            value.hash(&mut hasher);
        }
        SymbolDetail::Func { signature } => {
            signature.to_string().hash(&mut hasher);
            let mut refs = Vec::new();
            signature.walk_named(&mut |qualifier, name| {
                if qualifier.is_none() {
                    refs.push(name.to_string());
                }
            });
            hash_local_refs(&refs, package, &mut hasher);
        }
        SymbolDetail::Method {
            receiver,
            pointer_receiver,
            signature,
        } => {
            receiver.hash(&mut hasher);
            pointer_receiver.hash(&mut hasher);
            signature.to_string().hash(&mut hasher);
        }
        SymbolDetail::InterfaceMethod {
            interface,
            signature,
        } => {
            interface.hash(&mut hasher);
            signature.to_string().hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Digest of a local type's definition and methods, without following
/// further references
pub fn local_type_digest(local: &LocalType) -> u64 {
    let mut hasher = FxHasher::default();
    local.is_alias.hash(&mut hasher);
    local.definition.to_string().hash(&mut hasher);
    hash_methods(&local.methods, &mut hasher);
    hasher.finish()
}

fn hash_methods(methods: &[MethodInfo], hasher: &mut FxHasher) {
    let mut rendered: Vec<String> = methods
        .iter()
        .map(|m| {
            let star = if m.pointer_receiver { "*" } else { "" };
            format!("{}{}{}", star, m.name, m.signature)
        })
        .collect();
    rendered.sort();
    rendered.hash(hasher);
}

fn hash_optional_type(ty: Option<&TypeExpr>, package: &PackageSymbols, hasher: &mut FxHasher) {
    let Some(ty) = ty else {
        "untyped".hash(hasher);
        return;
    };
    ty.to_string().hash(hasher);
    let mut refs = Vec::new();
    ty.walk_named(&mut |qualifier, name| {
        if qualifier.is_none() {
            refs.push(name.to_string());
        }
    });
    hash_local_refs(&refs, package, hasher);
}

fn hash_local_refs(refs: &[String], package: &PackageSymbols, hasher: &mut FxHasher) {
    for name in refs {
        if let Some(local) = package.local_types.get(name.as_str()) {
            local_type_digest(local).hash(hasher);
        }
    }
}
