//! Lowering of CST type expressions and signatures into the owned model.

use smol_str::SmolStr;

use crate::error::Result;
use crate::parser::{self, AstNode, ChanDir, TypeNode};

use super::context::ExtractionContext;
use super::types::{ChanDirection, InterfaceElem, Param, Signature, StructField, TypeExpr};

pub(super) fn lower_type(ctx: &ExtractionContext<'_>, node: &TypeNode) -> Result<TypeExpr> {
    let missing = || ctx.error(node.text_range(), "incomplete type expression");
    let ty = match node {
        TypeNode::Named(named) => {
            let name = named.name().ok_or_else(missing)?;
            match named.qualifier() {
                Some(package) => TypeExpr::qualified(package, name),
                None => TypeExpr::named(name),
            }
        }
        TypeNode::Pointer(ptr) => {
            TypeExpr::Pointer(Box::new(lower_type(ctx, &ptr.elem().ok_or_else(missing)?)?))
        }
        TypeNode::Slice(slice) => {
            TypeExpr::Slice(Box::new(lower_type(ctx, &slice.elem().ok_or_else(missing)?)?))
        }
        TypeNode::Array(array) => TypeExpr::Array {
            len: array.len_text(),
            elem: Box::new(lower_type(ctx, &array.elem().ok_or_else(missing)?)?),
        },
        TypeNode::Map(map) => TypeExpr::Map {
            key: Box::new(lower_type(ctx, &map.key().ok_or_else(missing)?)?),
            value: Box::new(lower_type(ctx, &map.value().ok_or_else(missing)?)?),
        },
        TypeNode::Chan(chan) => TypeExpr::Chan {
            dir: match chan.direction() {
                ChanDir::Both => ChanDirection::Both,
                ChanDir::Send => ChanDirection::Send,
                ChanDir::Recv => ChanDirection::Recv,
            },
            elem: Box::new(lower_type(ctx, &chan.elem().ok_or_else(missing)?)?),
        },
        TypeNode::Func(func) => {
            let sig = func.signature().ok_or_else(missing)?;
            TypeExpr::Func(Box::new(lower_signature(ctx, &sig)?))
        }
        TypeNode::Struct(st) => {
            let mut fields = Vec::new();
            for field in st.fields() {
                let ty = field.ty().ok_or_else(missing)?;
                fields.push(StructField {
                    names: field.names().iter().map(|t| SmolStr::new(t.text())).collect(),
                    ty: lower_type(ctx, &ty)?,
                    tag: field.tag(),
                });
            }
            TypeExpr::Struct(fields)
        }
        TypeNode::Interface(iface) => {
            // methods and embedded types interleave; keep source order
            let mut elems = Vec::new();
            for child in iface.syntax().children() {
                if let Some(method) = parser::MethodSpec::cast(child.clone()) {
                    let name = method.name().ok_or_else(missing)?;
                    let sig = method.signature().ok_or_else(missing)?;
                    elems.push(InterfaceElem::Method {
                        name: SmolStr::new(name.text()),
                        signature: lower_signature(ctx, &sig)?,
                    });
                } else if let Some(embedded) = TypeNode::cast(child) {
                    elems.push(InterfaceElem::Embedded(lower_type(ctx, &embedded)?));
                }
            }
            TypeExpr::Interface(elems)
        }
        TypeNode::Paren(paren) => lower_type(ctx, &paren.inner().ok_or_else(missing)?)?,
    };
    Ok(ty)
}

pub(super) fn lower_signature(
    ctx: &ExtractionContext<'_>,
    sig: &parser::Signature,
) -> Result<Signature> {
    let params = match sig.params() {
        Some(list) => lower_params(ctx, &list)?,
        None => Vec::new(),
    };
    let results = match sig.result() {
        Some(result) => match (result.params(), result.ty()) {
            (Some(list), _) => lower_params(ctx, &list)?,
            (None, Some(ty)) => vec![Param {
                names: Vec::new(),
                ty: lower_type(ctx, &ty)?,
                variadic: false,
            }],
            (None, None) => Vec::new(),
        },
        None => Vec::new(),
    };
    Ok(Signature { params, results })
}

/// Lower a parameter list.
///
/// The parser only sees `a` in `a, b string` as a bare type; when any entry
/// of the list is named, bare identifiers are names sharing the type of the
/// next named entry.
pub(super) fn lower_params(
    ctx: &ExtractionContext<'_>,
    list: &parser::ParamList,
) -> Result<Vec<Param>> {
    let entries: Vec<parser::Param> = list.params().collect();
    let any_named = entries.iter().any(|p| p.name().is_some());

    let mut params = Vec::new();
    let mut pending: Vec<SmolStr> = Vec::new();
    for entry in &entries {
        let missing = || ctx.error(entry.text_range(), "parameter without a type");
        let ty = entry.ty().ok_or_else(missing)?;

        if any_named && entry.name().is_none() {
            match &ty {
                TypeNode::Named(named) if named.qualifier().is_none() => {
                    pending.push(SmolStr::new(named.name().ok_or_else(missing)?));
                    continue;
                }
                _ => {
                    return Err(ctx.error(
                        entry.text_range(),
                        "mixed named and unnamed parameters",
                    ));
                }
            }
        }

        let mut names = std::mem::take(&mut pending);
        if let Some(name) = entry.name() {
            names.push(SmolStr::new(name.text()));
        }
        params.push(Param {
            names,
            ty: lower_type(ctx, &ty)?,
            variadic: entry.is_variadic(),
        });
    }

    if !pending.is_empty() {
        return Err(ctx.error(list.text_range(), "mixed named and unnamed parameters"));
    }
    Ok(params)
}
