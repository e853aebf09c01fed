//! Extraction of exported symbols from the files of one package.
//!
//! Runs in two passes. The first parses every file, checks the package
//! clauses and records every type and method of the package. The second
//! walks declarations in file order and produces the exported symbols, so a
//! constant can be grouped under an enum type declared in a later file.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::FileId;
use crate::error::{ProfileError, Result};
use crate::parser::{self, AstNode, Decl, Expr, SourceFile, TypeNode, parse_source_file};
use crate::project::{SourcePackage, gopath_import_path, import_path};
use crate::project::file_loader::{collect_go_files, load_file};

use super::context::ExtractionContext;
use super::lower::{lower_signature, lower_type};
use super::types::{
    LocalType, MethodInfo, PackageSymbols, SourceFileInfo, Symbol, SymbolDetail, SymbolKind,
    TypeExpr, is_exported,
};

/// Read and extract every Go file of a package directory
pub fn extract_package(package: Arc<SourcePackage>) -> Result<PackageSymbols> {
    let files = collect_go_files(&package.path)?;
    if files.is_empty() {
        return Err(ProfileError::io(
            &package.path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no Go source files"),
        ));
    }
    let sources = files
        .into_iter()
        .map(|path| load_file(&path).map(|text| (path, text)))
        .collect::<Result<Vec<_>>>()?;
    let resolved_path = import_path(&package.path)?;
    let mut symbols = extract_sources(package, &sources)?;
    symbols.import_path = resolved_path;
    Ok(symbols)
}

/// Extract from in-memory `(path, text)` pairs, in the given order.
///
/// The import path is derived from the package path GOPATH-style.
pub fn extract_sources(
    package: Arc<SourcePackage>,
    sources: &[(PathBuf, String)],
) -> Result<PackageSymbols> {
    tracing::debug!(package = %package, files = sources.len(), "extracting package");

    // Pass 1: parse, package clause, local types and methods
    let mut parsed: Vec<(ExtractionContext<'_>, SourceFile)> = Vec::with_capacity(sources.len());
    let mut package_name: Option<SmolStr> = None;
    let mut files = Vec::with_capacity(sources.len());
    let mut local_types: IndexMap<SmolStr, LocalType> = IndexMap::new();
    let mut methods: FxHashMap<SmolStr, Vec<MethodInfo>> = FxHashMap::default();

    for (index, (path, text)) in sources.iter().enumerate() {
        let ctx = ExtractionContext::new(&package.path, path.clone(), FileId::new(index as u32), text);
        let parse = parse_source_file(text);
        if let Some(err) = parse.errors.first() {
            return Err(ctx.error(err.range, err.message.clone()));
        }
        let file = parse.source_file();

        let name = file
            .package_name()
            .ok_or_else(|| ctx.error(file.text_range(), "missing package clause"))?;
        match &package_name {
            None => package_name = Some(SmolStr::new(&name)),
            Some(existing) if existing != name.as_str() => {
                let range = file
                    .package_clause()
                    .map_or(file.text_range(), |c| c.text_range());
                return Err(ctx.error(
                    range,
                    format!("package `{}` does not match package `{}` of other files", name, existing),
                ));
            }
            Some(_) => {}
        }

        files.push(SourceFileInfo {
            path: path.clone(),
            imports: collect_imports(&file),
        });
        collect_types(&ctx, &file, &mut local_types, &mut methods)?;
        parsed.push((ctx, file));
    }

    for (name, local) in local_types.iter_mut() {
        if let Some(found) = methods.remove(name) {
            local.methods = found;
        }
    }

    // Pass 2: exported symbols in file and declaration order
    let mut symbols = Vec::new();
    for (ctx, file) in &mut parsed {
        for decl in file.decls() {
            extract_decl(ctx, &decl, &local_types, &mut symbols)?;
        }
    }

    tracing::debug!(package = %package, symbols = symbols.len(), "extracted package");
    Ok(PackageSymbols {
        import_path: gopath_import_path(&package.path),
        package,
        package_name: package_name.unwrap_or_default(),
        files,
        symbols,
        local_types,
    })
}

/// Local name a Go import is referenced by when it has no explicit alias
pub fn default_import_name(path: &str) -> SmolStr {
    let mut segments = path.rsplit('/');
    let last = segments.next().unwrap_or(path);
    let is_major = |s: &str| s.len() > 1 && s.starts_with('v') && s[1..].chars().all(|c| c.is_ascii_digit());
    if is_major(last) {
        if let Some(previous) = segments.next() {
            return SmolStr::new(previous);
        }
    }
    // gopkg.in/yaml.v2
    match last.rsplit_once('.') {
        Some((name, suffix)) if is_major(suffix) => SmolStr::new(name),
        _ => SmolStr::new(last),
    }
}

/// Package name conventionally declared by a repository named `element`:
/// a `go.`/`go-` prefix and a `.go`/`-go` suffix are dropped
pub fn conventional_package_name(element: &str) -> &str {
    let name = element
        .strip_prefix("go.")
        .or_else(|| element.strip_prefix("go-"))
        .unwrap_or(element);
    let name = name
        .strip_suffix(".go")
        .or_else(|| name.strip_suffix("-go"))
        .unwrap_or(name);
    if name.is_empty() { element } else { name }
}

fn collect_imports(file: &SourceFile) -> IndexMap<SmolStr, String> {
    let mut imports = IndexMap::new();
    for spec in file.imports() {
        let Some(path) = spec.path() else {
            continue;
        };
        let local = match spec.alias() {
            Some(alias) if alias == "_" || alias == "." => continue,
            Some(alias) => SmolStr::new(alias),
            None => default_import_name(&path),
        };
        imports.insert(local, path);
    }
    imports
}

fn collect_types(
    ctx: &ExtractionContext<'_>,
    file: &SourceFile,
    local_types: &mut IndexMap<SmolStr, LocalType>,
    methods: &mut FxHashMap<SmolStr, Vec<MethodInfo>>,
) -> Result<()> {
    for decl in file.decls() {
        match decl {
            Decl::Type(decl) => {
                for spec in decl.specs() {
                    let (Some(name), Some(ty)) = (spec.name(), spec.ty()) else {
                        return Err(ctx.error(spec.text_range(), "incomplete type declaration"));
                    };
                    let definition = lower_type(ctx, &ty)?;
                    local_types.entry(SmolStr::new(name.text())).or_insert(LocalType {
                        definition,
                        is_alias: spec.is_alias(),
                        methods: Vec::new(),
                    });
                }
            }
            Decl::Func(func) => {
                let Some(receiver) = func.receiver() else {
                    continue;
                };
                let (Some(name), Some(sig)) = (func.name(), func.signature()) else {
                    return Err(ctx.error(func.text_range(), "incomplete method declaration"));
                };
                if !is_exported(name.text()) {
                    continue;
                }
                let (base, pointer_receiver) = receiver
                    .base_type()
                    .ok_or_else(|| ctx.error(receiver.text_range(), "invalid receiver"))?;
                methods.entry(SmolStr::new(base)).or_default().push(MethodInfo {
                    name: SmolStr::new(name.text()),
                    pointer_receiver,
                    signature: lower_signature(ctx, &sig)?,
                });
            }
            Decl::Const(_) | Decl::Var(_) => {}
        }
    }
    Ok(())
}

fn extract_decl(
    ctx: &mut ExtractionContext<'_>,
    decl: &Decl,
    local_types: &IndexMap<SmolStr, LocalType>,
    out: &mut Vec<Symbol>,
) -> Result<()> {
    match decl {
        Decl::Const(decl) => extract_consts(ctx, decl, local_types, out),
        Decl::Var(decl) => extract_vars(ctx, decl, out),
        Decl::Type(decl) => extract_types(ctx, decl, local_types, out),
        Decl::Func(func) => extract_func(ctx, func, out),
    }
}

/// Constants, with implicit repetition of the previous spec's type and
/// values and `iota` resolved to the spec index
fn extract_consts(
    ctx: &mut ExtractionContext<'_>,
    decl: &parser::ConstDecl,
    local_types: &IndexMap<SmolStr, LocalType>,
    out: &mut Vec<Symbol>,
) -> Result<()> {
    let mut previous: Option<(Option<TypeNode>, Vec<Expr>)> = None;
    for (index, spec) in decl.specs().enumerate() {
        ctx.iota = index;
        let values: Vec<Expr> = spec.values().collect();
        let (ty_node, values) = if values.is_empty() {
            if spec.ty().is_some() {
                return Err(ctx.error(spec.text_range(), "missing init expr for const declaration"));
            }
            previous
                .clone()
                .ok_or_else(|| ctx.error(spec.text_range(), "missing init expr for const declaration"))?
        } else {
            let current = (spec.ty(), values);
            previous = Some(current.clone());
            current
        };

        let ty = ty_node.as_ref().map(|t| lower_type(ctx, t)).transpose()?;
        let group = match &ty {
            Some(TypeExpr::Named {
                package: None,
                name,
            }) if local_types.contains_key(name) => Some(name.clone()),
            _ => None,
        };

        let names = spec.names();
        if names.len() != values.len() {
            return Err(ctx.error(
                spec.text_range(),
                format!("{} names but {} values in const declaration", names.len(), values.len()),
            ));
        }
        for (name, value) in names.iter().zip(&values) {
            if !is_exported(name.text()) {
                continue;
            }
            let value = if value.uses_iota() {
                value.text_with_iota(ctx.iota)
            } else {
                value.normalized_text()
            };
            out.push(Symbol {
                name: SmolStr::new(name.text()),
                kind: SymbolKind::Const,
                file: ctx.file,
                span: ctx.span(name.text_range()),
                detail: SymbolDetail::Const {
                    ty: ty.clone(),
                    value,
                    group: group.clone(),
                },
            });
        }
    }
    Ok(())
}

fn extract_vars(
    ctx: &ExtractionContext<'_>,
    decl: &parser::VarDecl,
    out: &mut Vec<Symbol>,
) -> Result<()> {
    for spec in decl.specs() {
        let ty = spec.ty().map(|t| lower_type(ctx, &t)).transpose()?;
        let values: Vec<String> = spec.values().map(|v| v.normalized_text()).collect();
        let names = spec.names();
        for (index, name) in names.iter().enumerate() {
            if !is_exported(name.text()) {
                continue;
            }
            let value = match values.as_slice() {
                [] => None,
                // `a, b = f()`
                [single] if names.len() > 1 => Some(format!("{}#{}", single, index)),
                values => values.get(index).cloned(),
            };
            out.push(Symbol {
                name: SmolStr::new(name.text()),
                kind: SymbolKind::Var,
                file: ctx.file,
                span: ctx.span(name.text_range()),
                detail: SymbolDetail::Var {
                    ty: ty.clone(),
                    value,
                },
            });
        }
    }
    Ok(())
}

fn extract_types(
    ctx: &ExtractionContext<'_>,
    decl: &parser::TypeDecl,
    local_types: &IndexMap<SmolStr, LocalType>,
    out: &mut Vec<Symbol>,
) -> Result<()> {
    for spec in decl.specs() {
        let (Some(name), Some(ty)) = (spec.name(), spec.ty()) else {
            return Err(ctx.error(spec.text_range(), "incomplete type declaration"));
        };
        if !is_exported(name.text()) {
            continue;
        }
        let type_name = SmolStr::new(name.text());
        let methods = local_types
            .get(&type_name)
            .map(|local| local.methods.clone())
            .unwrap_or_default();
        out.push(Symbol {
            name: type_name.clone(),
            kind: SymbolKind::Type,
            file: ctx.file,
            span: ctx.span(name.text_range()),
            detail: SymbolDetail::Type {
                definition: lower_type(ctx, &ty)?,
                is_alias: spec.is_alias(),
                methods,
            },
        });

        if let TypeNode::Interface(iface) = ty {
            for method in iface.methods() {
                let (Some(method_name), Some(sig)) = (method.name(), method.signature()) else {
                    continue;
                };
                if !is_exported(method_name.text()) {
                    continue;
                }
                out.push(Symbol {
                    name: SmolStr::new(method_name.text()),
                    kind: SymbolKind::InterfaceMethod,
                    file: ctx.file,
                    span: ctx.span(method_name.text_range()),
                    detail: SymbolDetail::InterfaceMethod {
                        interface: type_name.clone(),
                        signature: lower_signature(ctx, &sig)?,
                    },
                });
            }
        }
    }
    Ok(())
}

fn extract_func(
    ctx: &ExtractionContext<'_>,
    func: &parser::FuncDecl,
    out: &mut Vec<Symbol>,
) -> Result<()> {
    let (Some(name), Some(sig)) = (func.name(), func.signature()) else {
        return Err(ctx.error(func.text_range(), "incomplete function declaration"));
    };
    if !is_exported(name.text()) {
        return Ok(());
    }
    let signature = lower_signature(ctx, &sig)?;
    let span = ctx.span(name.text_range());

    let (kind, detail) = match func.receiver() {
        Some(receiver) => {
            let (base, pointer_receiver) = receiver
                .base_type()
                .ok_or_else(|| ctx.error(receiver.text_range(), "invalid receiver"))?;
            if !is_exported(&base) {
                return Ok(());
            }
            (
                SymbolKind::Method,
                SymbolDetail::Method {
                    receiver: SmolStr::new(base),
                    pointer_receiver,
                    signature,
                },
            )
        }
        None => (SymbolKind::Func, SymbolDetail::Func { signature }),
    };
    out.push(Symbol {
        name: SmolStr::new(name.text()),
        kind,
        file: ctx.file,
        span,
        detail,
    });
    Ok(())
}
