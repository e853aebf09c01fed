//! # profile-builder
//!
//! Builds Go "profile" packages: alias packages that re-export the exported
//! symbols of one or more versioned SDK packages under stable names.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! driver    → strategy → extract → resolve → synthesize → render → write
//!   ↓
//! formatter → Go source emitter
//!   ↓
//! synth     → alias declarations and function wrappers
//!   ↓
//! resolve   → cross-package name collisions
//!   ↓
//! symbols   → exported symbols of one package
//!   ↓
//! project   → package selection strategies, versions, import paths
//!   ↓
//! parser    → Logos lexer, rowan CST, typed AST for Go declarations
//!   ↓
//! base      → Primitives (FileId, LineIndex, Span)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → project → symbols → resolve → synth → formatter → driver)
// ============================================================================

/// Foundation types: FileId, LineIndex, Span
pub mod base;

/// Parser: Logos lexer, rowan CST, typed AST
pub mod parser;

/// Package selection: list and latest strategies, version strings
pub mod project;

/// Symbol extraction from Go packages
pub mod symbols;

/// Cross-package collision resolution
pub mod resolve;

/// Alias synthesis
pub mod synth;

/// Go source emitter
pub mod formatter;

/// Build pipeline and output writing
pub mod driver;

/// Error types
pub mod error;

pub use base::{FileId, LineCol, LineIndex, Span, TextRange, TextSize};
pub use driver::{BuildOptions, BuildOutput, OutputFile, OutputLayout, build_profile, write_output};
pub use error::{ProfileError, Result};
pub use formatter::{FormatOptions, format_package};
pub use project::{SelectionStrategy, SourcePackage, StrategyKind, VersionString};
