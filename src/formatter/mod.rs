//! Go source emitter for synthesized packages.
//!
//! Output is deterministic: declarations are sorted by display name and
//! columns are aligned with spaces the way gofmt aligns them, so equal input
//! always renders to identical bytes.

mod options;

use std::fmt::Write;

use tokio_util::sync::CancellationToken;

use crate::synth::{AliasDecl, AliasKind, FuncWrapper, Import, SynthesizedPackage};

pub use options::{FormatOptions, GO19_BUILD_TAG};

/// Render a package, giving up when `cancel` fires between sections
pub fn format_async(
    package: &SynthesizedPackage,
    options: &FormatOptions,
    cancel: &CancellationToken,
) -> Option<String> {
    let mut sections: Vec<String> = Vec::new();
    let mut push = |section: String| {
        if !section.is_empty() {
            sections.push(section);
        }
    };

    push(header(options));
    push(format!("package {}\n", package.name));
    push(imports(&package.imports));

    let mut decls: Vec<&AliasDecl> = package.decls.values().collect();
    decls.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    let types: Vec<&AliasDecl> = decls.iter().copied().filter(|d| d.kind == AliasKind::Type).collect();
    let enum_consts = |ty: &str| -> Vec<&AliasDecl> {
        decls
            .iter()
            .copied()
            .filter(|d| matches!(&d.kind, AliasKind::Const { enum_type: Some(t) } if t == ty))
            .collect()
    };
    let is_enum = |decl: &AliasDecl| types.iter().any(|t| t.display_name == decl_enum_type(decl));

    if cancel.is_cancelled() {
        return None;
    }

    // untyped constants, and enum constants whose type is not in the profile
    let plain_consts: Vec<&AliasDecl> = decls
        .iter()
        .copied()
        .filter(|d| matches!(d.kind, AliasKind::Const { .. }) && !is_enum(d))
        .collect();
    push(value_block("const", &plain_consts, false));

    for ty in &types {
        let consts = enum_consts(&ty.display_name);
        if consts.is_empty() {
            continue;
        }
        push(format!("{}\n{}", type_alias(ty), value_block("const", &consts, true)));
    }

    if cancel.is_cancelled() {
        return None;
    }

    let plain_types: String = types
        .iter()
        .filter(|t| enum_consts(&t.display_name).is_empty())
        .map(|t| type_alias(t))
        .collect();
    push(plain_types);

    let vars: Vec<&AliasDecl> = decls.iter().copied().filter(|d| d.kind == AliasKind::Var).collect();
    push(value_block("var", &vars, false));

    let funcs: String = decls
        .iter()
        .filter_map(|d| match &d.kind {
            AliasKind::Func(wrapper) => Some(func(d, wrapper)),
            _ => None,
        })
        .collect();
    push(funcs);

    Some(sections.join("\n"))
}

/// Render a package
pub fn format_package(package: &SynthesizedPackage, options: &FormatOptions) -> String {
    format_async(package, options, &CancellationToken::new()).unwrap_or_default()
}

fn decl_enum_type(decl: &AliasDecl) -> &str {
    match &decl.kind {
        AliasKind::Const { enum_type: Some(ty) } => ty,
        _ => "",
    }
}

fn header(options: &FormatOptions) -> String {
    let mut out = String::new();
    if options.build_tag {
        for line in GO19_BUILD_TAG {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    let license = options.license_lines();
    if !license.is_empty() {
        for line in license {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    let _ = writeln!(out, "// This code was auto-generated by:");
    let _ = writeln!(out, "// {}", options.generator);
    out
}

fn import_line(import: &Import) -> String {
    match import.explicit_alias() {
        Some(alias) => format!("{} {}", alias, go_quote(&import.path)),
        None => go_quote(&import.path),
    }
}

/// Standard library group, then everything else, each sorted by path
fn imports(imports: &[Import]) -> String {
    match imports {
        [] => String::new(),
        [single] => format!("import {}\n", import_line(single)),
        _ => {
            let mut sorted: Vec<&Import> = imports.iter().collect();
            sorted.sort_by(|a, b| a.path.cmp(&b.path));
            let (std, third_party): (Vec<&Import>, Vec<&Import>) =
                sorted.into_iter().partition(|i| i.is_std());

            let mut out = String::from("import (\n");
            for (index, group) in [std, third_party]
                .into_iter()
                .filter(|g| !g.is_empty())
                .enumerate()
            {
                if index > 0 {
                    out.push('\n');
                }
                for import in group {
                    let _ = writeln!(out, "\t{}", import_line(import));
                }
            }
            out.push_str(")\n");
            out
        }
    }
}

fn type_alias(decl: &AliasDecl) -> String {
    format!("type {} = {}\n", decl.display_name, decl.target)
}

/// `const (...)` or `var (...)` with names (and types) aligned
fn value_block(keyword: &str, decls: &[&AliasDecl], typed: bool) -> String {
    if decls.is_empty() {
        return String::new();
    }
    let name_width = decls.iter().map(|d| d.display_name.chars().count()).max().unwrap_or(0);
    let mut out = format!("{} (\n", keyword);
    for decl in decls {
        let ty = decl_enum_type(decl);
        if typed && !ty.is_empty() {
            let _ = writeln!(
                out,
                "\t{:<width$} {} = {}",
                decl.display_name,
                ty,
                decl.target,
                width = name_width
            );
        } else {
            let _ = writeln!(
                out,
                "\t{:<width$} = {}",
                decl.display_name,
                decl.target,
                width = name_width
            );
        }
    }
    out.push_str(")\n");
    out
}

fn func(decl: &AliasDecl, wrapper: &FuncWrapper) -> String {
    let mut args = wrapper.args.join(", ");
    if wrapper.variadic && !args.is_empty() {
        args.push_str("...");
    }
    let call = format!("{}({})", decl.target, args);
    let body = match (&wrapper.user_agent_suffix, wrapper.has_results()) {
        (Some(suffix), true) => format!("return {} + {}", call, go_quote(suffix)),
        (None, true) => format!("return {}", call),
        (_, false) => call,
    };
    format!("func {}{} {{\n\t{}\n}}\n", decl.display_name, wrapper.signature, body)
}

/// Go interpreted string literal
pub fn go_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
