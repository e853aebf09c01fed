//! Forwarding wrappers for exported functions.

use smol_str::SmolStr;

use crate::resolve::Resolution;
use crate::symbols::{PackageSymbols, Param, Signature, Symbol, TypeExpr, is_exported};

use super::imports::ImportTable;

/// Go's predeclared type names
const PREDECLARED: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32", "float64",
    "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16", "uint32",
    "uint64", "uintptr",
];

/// A function re-declared in the profile that calls through to the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncWrapper {
    /// Signature with one name per parameter and types as the profile sees them
    pub signature: Signature,
    /// Arguments forwarded to the original, in order
    pub args: Vec<SmolStr>,
    /// Whether the last argument is forwarded with `...`
    pub variadic: bool,
    /// Text appended to the returned string (`UserAgent` only)
    pub user_agent_suffix: Option<String>,
}

impl FuncWrapper {
    pub fn has_results(&self) -> bool {
        !self.signature.results.is_empty()
    }
}

/// Everything needed to rewrite the types of one function
pub(super) struct WrapperContext<'a> {
    pub package: &'a PackageSymbols,
    pub package_index: usize,
    pub symbol: &'a Symbol,
    pub resolution: &'a Resolution,
    pub profile_name: &'a str,
}

/// Build the wrapper, adding the imports its signature needs.
///
/// Fails with a reason when the signature cannot be written outside the
/// source package; `imports` is left untouched in that case.
pub(super) fn build_wrapper(
    cx: &WrapperContext<'_>,
    signature: &Signature,
    imports: &mut ImportTable,
) -> Result<FuncWrapper, String> {
    let mut scratch = imports.clone();
    let mut failure: Option<String> = None;

    let mut rewrite = |ty: &TypeExpr| {
        ty.map_named(&mut |qualifier, name| match qualifier {
            None => local_type(cx, name).unwrap_or_else(|reason| {
                failure.get_or_insert(reason);
                TypeExpr::named(name.clone())
            }),
            Some(qualifier) => {
                let file = cx.package.file(cx.symbol.file);
                match file.resolve_qualifier(qualifier) {
                    Some(path) => TypeExpr::qualified(scratch.add(qualifier, path), name.clone()),
                    None => {
                        failure.get_or_insert(format!("unknown package qualifier `{}`", qualifier));
                        TypeExpr::qualified(qualifier.clone(), name.clone())
                    }
                }
            }
        })
    };

    let mut params = Vec::new();
    let mut variadic = false;
    for param in &signature.params {
        let ty = rewrite(&param.ty);
        variadic = param.variadic;
        if param.names.is_empty() {
            params.push(single(None, ty, param.variadic));
        } else {
            for name in &param.names {
                params.push(single(Some(name.clone()), ty.clone(), param.variadic));
            }
        }
    }
    let mut results = Vec::new();
    for result in &signature.results {
        let ty = rewrite(&result.ty);
        if result.names.is_empty() {
            results.push(single(None, ty, false));
        } else {
            for name in &result.names {
                results.push(single(Some(name.clone()), ty.clone(), false));
            }
        }
    }

    if let Some(reason) = failure {
        return Err(reason);
    }
    *imports = scratch;

    let returns_string = matches!(
        results.as_slice(),
        [Param { ty: TypeExpr::Named { package: None, name }, .. }] if name == "string"
    );
    let user_agent_suffix = (cx.symbol.name == "UserAgent"
        && params.is_empty()
        && returns_string
        && !cx.profile_name.is_empty())
    .then(|| format!(" profiles/{}", cx.profile_name));

    Ok(FuncWrapper {
        signature: Signature { params, results },
        args: Vec::new(),
        variadic,
        user_agent_suffix,
    })
}

fn single(name: Option<SmolStr>, ty: TypeExpr, variadic: bool) -> Param {
    Param {
        names: name.into_iter().collect(),
        ty,
        variadic,
    }
}

/// Profile-side name of an unqualified type
fn local_type(cx: &WrapperContext<'_>, name: &SmolStr) -> Result<TypeExpr, String> {
    if PREDECLARED.contains(&name.as_str()) {
        return Ok(TypeExpr::named(name.clone()));
    }
    if !is_exported(name) {
        return Err(format!("signature mentions unexported type `{}`", name));
    }
    if !cx.package.local_types.contains_key(name) {
        return Err(format!("signature mentions unknown type `{}`", name));
    }
    Ok(TypeExpr::named(
        cx.resolution.type_name(cx.package_index, name).clone(),
    ))
}

/// Give every parameter a usable name and fill in the forwarded arguments.
///
/// Unnamed and blank parameters, and names equal to an import name, become
/// `p<index>`; result names equal to an import name become `r<index>`.
pub(super) fn assign_names(wrapper: &mut FuncWrapper, imports: &ImportTable) {
    let mut taken: Vec<SmolStr> = wrapper
        .signature
        .params
        .iter()
        .chain(&wrapper.signature.results)
        .flat_map(|p| p.names.iter().cloned())
        .collect();
    let fresh = |prefix: &str, index: usize, taken: &mut Vec<SmolStr>| {
        let name = (index..)
            .map(|i| SmolStr::new(format!("{}{}", prefix, i)))
            .find(|candidate| !taken.contains(candidate) && !imports.contains_name(candidate))
            .unwrap_or_else(|| SmolStr::new(format!("{}{}", prefix, index)));
        taken.push(name.clone());
        name
    };

    let mut args = Vec::with_capacity(wrapper.signature.params.len());
    for (index, param) in wrapper.signature.params.iter_mut().enumerate() {
        let usable = param
            .names
            .first()
            .filter(|name| name.as_str() != "_" && !imports.contains_name(name))
            .cloned();
        let name = match usable {
            Some(name) => name,
            None => fresh("p", index, &mut taken),
        };
        param.names = vec![name.clone()];
        args.push(name);
    }
    for (index, result) in wrapper.signature.results.iter_mut().enumerate() {
        let shadows = result
            .names
            .first()
            .is_some_and(|name| imports.contains_name(name));
        if shadows {
            result.names = vec![fresh("r", index, &mut taken)];
        }
    }
    wrapper.args = args;
}
