//! Type expression AST nodes.

use super::*;

/// Any type expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    Named(NamedType),
    Pointer(PointerType),
    Slice(SliceType),
    Array(ArrayType),
    Map(MapType),
    Chan(ChanType),
    Func(FuncType),
    Struct(StructType),
    Interface(InterfaceType),
    Paren(ParenType),
}

impl AstNode for TypeNode {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_type()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        let ty = match node.kind() {
            SyntaxKind::NAMED_TYPE => Self::Named(NamedType(node)),
            SyntaxKind::POINTER_TYPE => Self::Pointer(PointerType(node)),
            SyntaxKind::SLICE_TYPE => Self::Slice(SliceType(node)),
            SyntaxKind::ARRAY_TYPE => Self::Array(ArrayType(node)),
            SyntaxKind::MAP_TYPE => Self::Map(MapType(node)),
            SyntaxKind::CHAN_TYPE => Self::Chan(ChanType(node)),
            SyntaxKind::FUNC_TYPE => Self::Func(FuncType(node)),
            SyntaxKind::STRUCT_TYPE => Self::Struct(StructType(node)),
            SyntaxKind::INTERFACE_TYPE => Self::Interface(InterfaceType(node)),
            SyntaxKind::PAREN_TYPE => Self::Paren(ParenType(node)),
            _ => return None,
        };
        Some(ty)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Named(t) => &t.0,
            Self::Pointer(t) => &t.0,
            Self::Slice(t) => &t.0,
            Self::Array(t) => &t.0,
            Self::Map(t) => &t.0,
            Self::Chan(t) => &t.0,
            Self::Func(t) => &t.0,
            Self::Struct(t) => &t.0,
            Self::Interface(t) => &t.0,
            Self::Paren(t) => &t.0,
        }
    }
}

ast_node!(NamedType, NAMED_TYPE);

impl NamedType {
    /// Package qualifier of `pkg.Name`
    pub fn qualifier(&self) -> Option<String> {
        let parts = idents(&self.0);
        if parts.len() == 2 {
            Some(parts[0].text().to_string())
        } else {
            None
        }
    }

    pub fn name(&self) -> Option<String> {
        idents(&self.0).last().map(|t| t.text().to_string())
    }
}

ast_node!(PointerType, POINTER_TYPE);

impl PointerType {
    first_child_method!(elem, TypeNode);
}

ast_node!(SliceType, SLICE_TYPE);

impl SliceType {
    first_child_method!(elem, TypeNode);
}

ast_node!(ArrayType, ARRAY_TYPE);
ast_node!(ArrayLen, ARRAY_LEN);

impl ArrayType {
    first_child_method!(elem, TypeNode);

    /// Length expression text (`4`, `...`, `maxLen`)
    pub fn len_text(&self) -> String {
        self.0
            .children()
            .find_map(ArrayLen::cast)
            .map(|len| normalized_text(&len.0))
            .unwrap_or_default()
    }
}

ast_node!(MapType, MAP_TYPE);

impl MapType {
    pub fn key(&self) -> Option<TypeNode> {
        self.0.children().filter_map(TypeNode::cast).next()
    }

    pub fn value(&self) -> Option<TypeNode> {
        self.0.children().filter_map(TypeNode::cast).nth(1)
    }
}

/// Channel direction as written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

ast_node!(ChanType, CHAN_TYPE);

impl ChanType {
    first_child_method!(elem, TypeNode);

    pub fn direction(&self) -> ChanDir {
        let tokens: Vec<_> = significant_tokens(&self.0).map(|t| t.kind()).collect();
        match tokens.as_slice() {
            [SyntaxKind::ARROW, SyntaxKind::CHAN_KW, ..] => ChanDir::Recv,
            [SyntaxKind::CHAN_KW, SyntaxKind::ARROW, ..] => ChanDir::Send,
            _ => ChanDir::Both,
        }
    }
}

ast_node!(FuncType, FUNC_TYPE);

impl FuncType {
    first_child_method!(signature, Signature);
}

ast_node!(StructType, STRUCT_TYPE);

impl StructType {
    children_method!(fields, FieldDecl);
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    /// Field names; empty for an embedded field
    pub fn names(&self) -> Vec<SyntaxToken> {
        idents(&self.0)
    }

    first_child_method!(ty, TypeNode);

    pub fn tag(&self) -> Option<String> {
        significant_tokens(&self.0)
            .find(|t| t.kind() == SyntaxKind::STRING)
            .map(|t| t.text().to_string())
    }
}

ast_node!(InterfaceType, INTERFACE_TYPE);

impl InterfaceType {
    children_method!(methods, MethodSpec);
    children_method!(embedded, TypeNode);
}

ast_node!(MethodSpec, METHOD_SPEC);

impl MethodSpec {
    pub fn name(&self) -> Option<SyntaxToken> {
        find_ident(&self.0)
    }

    first_child_method!(signature, Signature);
}

ast_node!(ParenType, PAREN_TYPE);

impl ParenType {
    first_child_method!(inner, TypeNode);
}
