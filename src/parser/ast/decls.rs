//! Declaration-level AST nodes: file, package clause, imports, const/var/type
//! specs and function declarations.

use super::*;

// ============================================================================
// Source file
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    first_child_method!(package_clause, PackageClause);
    children_method!(import_decls, ImportDecl);
    children_method!(decls, Decl);

    /// Name from the `package` clause
    pub fn package_name(&self) -> Option<String> {
        self.package_clause()
            .and_then(|clause| find_ident(&clause.0))
            .map(|t| t.text().to_string())
    }

    /// All import specs of the file, grouped or not
    pub fn imports(&self) -> impl Iterator<Item = ImportSpec> + '_ {
        self.import_decls().flat_map(|decl| decl.specs().collect::<Vec<_>>())
    }
}

ast_node!(PackageClause, PACKAGE_CLAUSE);

// ============================================================================
// Imports
// ============================================================================

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    children_method!(specs, ImportSpec);
}

ast_node!(ImportSpec, IMPORT_SPEC);

impl ImportSpec {
    /// Explicit local name (`alias "path"`, `. "path"`, `_ "path"`)
    pub fn alias(&self) -> Option<String> {
        significant_tokens(&self.0)
            .find(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::DOT))
            .map(|t| t.text().to_string())
    }

    /// Import path with the quotes removed
    pub fn path(&self) -> Option<String> {
        significant_tokens(&self.0)
            .find(|t| t.kind() == SyntaxKind::STRING)
            .map(|t| t.text().trim_matches(|c| c == '"' || c == '`').to_string())
    }
}

// ============================================================================
// Top-level declarations
// ============================================================================

/// Any top-level declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decl {
    Const(ConstDecl),
    Var(VarDecl),
    Type(TypeDecl),
    Func(FuncDecl),
}

impl AstNode for Decl {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::CONST_DECL
                | SyntaxKind::VAR_DECL
                | SyntaxKind::TYPE_DECL
                | SyntaxKind::FUNC_DECL
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::CONST_DECL => Some(Self::Const(ConstDecl(node))),
            SyntaxKind::VAR_DECL => Some(Self::Var(VarDecl(node))),
            SyntaxKind::TYPE_DECL => Some(Self::Type(TypeDecl(node))),
            SyntaxKind::FUNC_DECL => Some(Self::Func(FuncDecl(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Const(d) => &d.0,
            Self::Var(d) => &d.0,
            Self::Type(d) => &d.0,
            Self::Func(d) => &d.0,
        }
    }
}

ast_node!(ConstDecl, CONST_DECL);

impl ConstDecl {
    children_method!(specs, ConstSpec);
    has_token_method!(is_grouped, L_PAREN, "const ( A = 1 )");
}

ast_node!(ConstSpec, CONST_SPEC);

impl ConstSpec {
    /// Declared names, in order
    pub fn names(&self) -> Vec<SyntaxToken> {
        idents(&self.0)
    }

    first_child_method!(ty, TypeNode);
    children_method!(values, Expr);
}

ast_node!(VarDecl, VAR_DECL);

impl VarDecl {
    children_method!(specs, VarSpec);
}

ast_node!(VarSpec, VAR_SPEC);

impl VarSpec {
    pub fn names(&self) -> Vec<SyntaxToken> {
        idents(&self.0)
    }

    first_child_method!(ty, TypeNode);
    children_method!(values, Expr);
}

ast_node!(TypeDecl, TYPE_DECL);

impl TypeDecl {
    children_method!(specs, TypeSpec);
}

ast_node!(TypeSpec, TYPE_SPEC);

impl TypeSpec {
    pub fn name(&self) -> Option<SyntaxToken> {
        find_ident(&self.0)
    }

    has_token_method!(is_alias, EQ, "type A = B");
    first_child_method!(ty, TypeNode);
}

// ============================================================================
// Functions
// ============================================================================

ast_node!(FuncDecl, FUNC_DECL);

impl FuncDecl {
    first_child_method!(receiver, Receiver);
    first_child_method!(signature, Signature);
    first_child_method!(body, Block);

    pub fn name(&self) -> Option<SyntaxToken> {
        find_ident(&self.0)
    }
}

ast_node!(Receiver, RECEIVER);

impl Receiver {
    first_child_method!(params, ParamList);

    /// Receiver base type name and whether it is a pointer receiver
    pub fn base_type(&self) -> Option<(String, bool)> {
        let param = self.params()?.params().next()?;
        match param.ty()? {
            TypeNode::Pointer(ptr) => match ptr.elem()? {
                TypeNode::Named(named) => Some((named.name()?, true)),
                _ => None,
            },
            TypeNode::Named(named) => Some((named.name()?, false)),
            _ => None,
        }
    }
}

ast_node!(Signature, SIGNATURE);

impl Signature {
    first_child_method!(params, ParamList);
    first_child_method!(result, ResultClause);
}

ast_node!(ResultClause, RESULT);

impl ResultClause {
    // `(a, b T)` form
    first_child_method!(params, ParamList);
    // single unparenthesized type
    first_child_method!(ty, TypeNode);
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    children_method!(params, Param);
}

ast_node!(Param, PARAM);

impl Param {
    /// Parameter name when written as `name Type`
    pub fn name(&self) -> Option<SyntaxToken> {
        find_ident(&self.0)
    }

    has_token_method!(is_variadic, ELLIPSIS, "args ...string");
    first_child_method!(ty, TypeNode);
}

ast_node!(Block, BLOCK);

impl Block {
    /// Body text on one line, braces included
    pub fn normalized_text(&self) -> String {
        normalized_text(&self.0)
    }
}

ast_node!(Expr, EXPR);

impl Expr {
    pub fn normalized_text(&self) -> String {
        normalized_text(&self.0)
    }

    /// Normalized text with `iota` replaced by its value
    pub fn text_with_iota(&self, iota: usize) -> String {
        normalized_text_with(&self.0, |t| {
            (t.kind() == SyntaxKind::IDENT && t.text() == "iota").then(|| iota.to_string())
        })
    }

    /// Check if the expression mentions `iota`
    pub fn uses_iota(&self) -> bool {
        self.0
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::IDENT && t.text() == "iota")
    }
}
