//! Symbol and type model produced by extraction.
//!
//! Contains the owned representation of Go type expressions (`TypeExpr`),
//! function signatures, and the exported `Symbol` records of a package.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{FileId, Span};
use crate::project::SourcePackage;

use super::extract::{conventional_package_name, default_import_name};

// ============================================================================
// TYPE EXPRESSIONS
// ============================================================================

/// Channel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDirection {
    Both,
    Send,
    Recv,
}

/// A Go type expression, lowered from the CST
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// `Name` or `pkg.Name`
    Named {
        package: Option<SmolStr>,
        name: SmolStr,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array {
        len: String,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan {
        dir: ChanDirection,
        elem: Box<TypeExpr>,
    },
    Func(Box<Signature>),
    Struct(Vec<StructField>),
    Interface(Vec<InterfaceElem>),
}

/// One field line of a struct type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructField {
    /// Empty for an embedded field
    pub names: Vec<SmolStr>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
}

/// One element of an interface type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InterfaceElem {
    Method { name: SmolStr, signature: Signature },
    Embedded(TypeExpr),
}

impl TypeExpr {
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self::Named {
            package: None,
            name: name.into(),
        }
    }

    pub fn qualified(package: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self::Named {
            package: Some(package.into()),
            name: name.into(),
        }
    }

    /// Visit every named type reference, including those nested in
    /// signatures, struct fields and interface methods.
    pub fn walk_named(&self, f: &mut dyn FnMut(Option<&str>, &str)) {
        match self {
            Self::Named { package, name } => f(package.as_deref(), name),
            Self::Pointer(elem) | Self::Slice(elem) => elem.walk_named(f),
            Self::Array { elem, .. } | Self::Chan { elem, .. } => elem.walk_named(f),
            Self::Map { key, value } => {
                key.walk_named(f);
                value.walk_named(f);
            }
            Self::Func(sig) => sig.walk_named(f),
            Self::Struct(fields) => fields.iter().for_each(|field| field.ty.walk_named(f)),
            Self::Interface(elems) => elems.iter().for_each(|elem| match elem {
                InterfaceElem::Method { signature, .. } => signature.walk_named(f),
                InterfaceElem::Embedded(ty) => ty.walk_named(f),
            }),
        }
    }

    /// Rebuild the expression with every named reference passed through `f`
    pub fn map_named(&self, f: &mut dyn FnMut(Option<&SmolStr>, &SmolStr) -> TypeExpr) -> TypeExpr {
        match self {
            Self::Named { package, name } => f(package.as_ref(), name),
            Self::Pointer(elem) => Self::Pointer(Box::new(elem.map_named(f))),
            Self::Slice(elem) => Self::Slice(Box::new(elem.map_named(f))),
            Self::Array { len, elem } => Self::Array {
                len: len.clone(),
                elem: Box::new(elem.map_named(f)),
            },
            Self::Map { key, value } => Self::Map {
                key: Box::new(key.map_named(f)),
                value: Box::new(value.map_named(f)),
            },
            Self::Chan { dir, elem } => Self::Chan {
                dir: *dir,
                elem: Box::new(elem.map_named(f)),
            },
            Self::Func(sig) => Self::Func(Box::new(sig.map_named(f))),
            Self::Struct(fields) => Self::Struct(
                fields
                    .iter()
                    .map(|field| StructField {
                        names: field.names.clone(),
                        ty: field.ty.map_named(f),
                        tag: field.tag.clone(),
                    })
                    .collect(),
            ),
            Self::Interface(elems) => Self::Interface(
                elems
                    .iter()
                    .map(|elem| match elem {
                        InterfaceElem::Method { name, signature } => InterfaceElem::Method {
                            name: name.clone(),
                            signature: signature.map_named(f),
                        },
                        InterfaceElem::Embedded(ty) => InterfaceElem::Embedded(ty.map_named(f)),
                    })
                    .collect(),
            ),
        }
    }
}

/// Canonical gofmt-style rendering on a single line
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named {
                package: Some(package),
                name,
            } => write!(f, "{}.{}", package, name),
            Self::Named {
                package: None,
                name,
            } => write!(f, "{}", name),
            Self::Pointer(elem) => write!(f, "*{}", elem),
            Self::Slice(elem) => write!(f, "[]{}", elem),
            Self::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            Self::Map { key, value } => write!(f, "map[{}]{}", key, value),
            Self::Chan { dir, elem } => match dir {
                ChanDirection::Both => write!(f, "chan {}", elem),
                ChanDirection::Send => write!(f, "chan<- {}", elem),
                ChanDirection::Recv => write!(f, "<-chan {}", elem),
            },
            Self::Func(sig) => write!(f, "func{}", sig),
            Self::Struct(fields) if fields.is_empty() => write!(f, "struct{{}}"),
            Self::Struct(fields) => {
                write!(f, "struct{{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    if !field.names.is_empty() {
                        write!(f, "{} ", field.names.join(", "))?;
                    }
                    write!(f, "{}", field.ty)?;
                    if let Some(tag) = &field.tag {
                        write!(f, " {}", tag)?;
                    }
                }
                write!(f, " }}")
            }
            Self::Interface(elems) if elems.is_empty() => write!(f, "interface{{}}"),
            Self::Interface(elems) => {
                write!(f, "interface{{ ")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    match elem {
                        InterfaceElem::Method { name, signature } => {
                            write!(f, "{}{}", name, signature)?
                        }
                        InterfaceElem::Embedded(ty) => write!(f, "{}", ty)?,
                    }
                }
                write!(f, " }}")
            }
        }
    }
}

// ============================================================================
// SIGNATURES
// ============================================================================

/// A parameter or result group: `a, b string` has two names and one type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub names: Vec<SmolStr>,
    pub ty: TypeExpr,
    pub variadic: bool,
}

/// Parameters and results of a function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

impl Signature {
    pub fn walk_named(&self, f: &mut dyn FnMut(Option<&str>, &str)) {
        for param in self.params.iter().chain(&self.results) {
            param.ty.walk_named(f);
        }
    }

    pub fn map_named(
        &self,
        f: &mut dyn FnMut(Option<&SmolStr>, &SmolStr) -> TypeExpr,
    ) -> Signature {
        let map = |params: &[Param], f: &mut dyn FnMut(Option<&SmolStr>, &SmolStr) -> TypeExpr| {
            params
                .iter()
                .map(|p| Param {
                    names: p.names.clone(),
                    ty: p.ty.map_named(f),
                    variadic: p.variadic,
                })
                .collect()
        };
        Signature {
            params: map(&self.params, f),
            results: map(&self.results, f),
        }
    }

    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.variadic)
    }

    /// Number of individual parameters (a group `a, b T` counts twice)
    pub fn param_count(&self) -> usize {
        self.params.iter().map(|p| p.names.len().max(1)).sum()
    }

    fn has_named_results(&self) -> bool {
        self.results.iter().any(|r| !r.names.is_empty())
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if !param.names.is_empty() {
            write!(f, "{} ", param.names.join(", "))?;
        }
        if param.variadic {
            write!(f, "...")?;
        }
        write!(f, "{}", param.ty)?;
    }
    Ok(())
}

/// `(params) results` as gofmt prints it after a function name
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_params(f, &self.params)?;
        write!(f, ")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] if !self.has_named_results() => write!(f, " {}", single.ty),
            results => {
                write!(f, " (")?;
                write_params(f, results)?;
                write!(f, ")")
            }
        }
    }
}

// ============================================================================
// SYMBOLS
// ============================================================================

/// Kind of an exported declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Type,
    Const,
    Var,
    Func,
    Method,
    InterfaceMethod,
}

impl SymbolKind {
    pub fn display(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Const => "const",
            Self::Var => "var",
            Self::Func => "func",
            Self::Method => "method",
            Self::InterfaceMethod => "interface method",
        }
    }

    /// Kinds that become top-level declarations of a profile
    pub fn is_top_level(&self) -> bool {
        matches!(self, Self::Type | Self::Const | Self::Var | Self::Func)
    }
}

/// A method recorded against its receiver type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodInfo {
    pub name: SmolStr,
    pub pointer_receiver: bool,
    pub signature: Signature,
}

/// Kind-specific data of a symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolDetail {
    Type {
        definition: TypeExpr,
        is_alias: bool,
        /// Exported methods declared on this type
        methods: Vec<MethodInfo>,
    },
    Const {
        ty: Option<TypeExpr>,
        /// Normalized value expression (`iota` index appended when used)
        value: String,
        /// Local named type the constant enumerates
        group: Option<SmolStr>,
    },
    Var {
        ty: Option<TypeExpr>,
        value: Option<String>,
    },
    Func {
        signature: Signature,
    },
    Method {
        receiver: SmolStr,
        pointer_receiver: bool,
        signature: Signature,
    },
    InterfaceMethod {
        interface: SmolStr,
        signature: Signature,
    },
}

/// One exported declaration of a source package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    pub kind: SymbolKind,
    pub file: FileId,
    pub span: Span,
    pub detail: SymbolDetail,
}

impl Symbol {
    pub fn signature(&self) -> Option<&Signature> {
        match &self.detail {
            SymbolDetail::Func { signature }
            | SymbolDetail::Method { signature, .. }
            | SymbolDetail::InterfaceMethod { signature, .. } => Some(signature),
            _ => None,
        }
    }
}

/// A parsed file of a package and the imports visible in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFileInfo {
    pub path: PathBuf,
    /// Local package name → import path
    pub imports: IndexMap<SmolStr, String>,
}

impl SourceFileInfo {
    /// Import path a package qualifier refers to.
    ///
    /// A qualifier not registered under its own name may still name an
    /// unaliased import by its package clause, as `uuid` does for
    /// `github.com/satori/go.uuid`; those are matched by
    /// [`conventional_package_name`].
    pub fn resolve_qualifier(&self, qualifier: &str) -> Option<&str> {
        if let Some(path) = self.imports.get(qualifier) {
            return Some(path);
        }
        self.imports
            .iter()
            .find(|(local, path)| {
                **local == default_import_name(path) && conventional_package_name(local) == qualifier
            })
            .map(|(_, path)| path.as_str())
    }
}

/// A type declared in a package, with the methods declared on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalType {
    pub definition: TypeExpr,
    pub is_alias: bool,
    pub methods: Vec<MethodInfo>,
}

/// All exported symbols of one source package
#[derive(Debug, Clone)]
pub struct PackageSymbols {
    pub package: Arc<SourcePackage>,
    /// Name from the `package` clause
    pub package_name: SmolStr,
    /// Go import path of the package
    pub import_path: String,
    pub files: Vec<SourceFileInfo>,
    /// Exported symbols in file order, then declaration order
    pub symbols: Vec<Symbol>,
    /// Every type declared in the package, exported or not
    pub local_types: IndexMap<SmolStr, LocalType>,
}

impl PackageSymbols {
    pub fn file(&self, id: FileId) -> &SourceFileInfo {
        &self.files[id.index()]
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols
            .iter()
            .find(|s| s.name == name && s.kind.is_top_level())
    }

    /// Top-level symbols only (methods and interface methods travel with
    /// their type)
    pub fn top_level(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.kind.is_top_level())
    }
}

/// Go's exported-identifier rule
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
