//! Symbol extraction: exported declarations of a Go package.
//!
//! ## Module Structure
//!
//! - `types` - owned model: [`TypeExpr`], [`Signature`], [`Symbol`], [`PackageSymbols`]
//! - `context` - per-file extraction state
//! - `lower` - CST type expressions to [`TypeExpr`]
//! - `extract` - package extraction ([`extract_package`], [`extract_sources`])
//! - `fingerprint` - stable symbol digests used by collision resolution

mod context;
mod extract;
mod fingerprint;
mod lower;
mod types;

pub use extract::{
    conventional_package_name, default_import_name, extract_package, extract_sources,
};
pub use fingerprint::{fingerprint, local_type_digest};
pub use types::{
    ChanDirection, InterfaceElem, LocalType, MethodInfo, PackageSymbols, Param, Signature,
    SourceFileInfo, StructField, Symbol, SymbolDetail, SymbolKind, TypeExpr, is_exported,
};
