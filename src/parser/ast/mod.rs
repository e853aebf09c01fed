//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides methods to access children.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

// ============================================================================
// Helper utilities
// ============================================================================

/// Direct child tokens of a node, trivia excluded
#[inline]
fn significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::NEWLINE)
}

/// Check if a syntax node has a direct child token of the specified kind.
#[inline]
fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    significant_tokens(node).any(|t| t.kind() == kind)
}

/// First direct identifier token of a node
#[inline]
fn find_ident(node: &SyntaxNode) -> Option<SyntaxToken> {
    significant_tokens(node).find(|t| t.kind() == SyntaxKind::IDENT)
}

/// All direct identifier tokens of a node
#[inline]
fn idents(node: &SyntaxNode) -> Vec<SyntaxToken> {
    significant_tokens(node)
        .filter(|t| t.kind() == SyntaxKind::IDENT)
        .collect()
}

/// Render the significant tokens of a node on one line, the way gofmt
/// spaces simple expressions.
pub fn normalized_text(node: &SyntaxNode) -> String {
    normalized_text_with(node, |_| None)
}

/// Like [`normalized_text`], with `subst` able to replace the text of
/// individual tokens.
pub fn normalized_text_with(
    node: &SyntaxNode,
    subst: impl Fn(&SyntaxToken) -> Option<String>,
) -> String {
    let mut out = String::new();
    // (kind, whether the token was a unary operator)
    let mut prev: Option<(SyntaxKind, bool)> = None;
    for token in node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::NEWLINE)
    {
        let kind = token.kind();
        let unary = is_operator(kind) && prev.is_none_or(|(p, p_unary)| starts_operand(p) || p_unary);
        if let Some((p, p_unary)) = prev {
            if !p_unary && needs_space(p, kind, unary) {
                out.push(' ');
            }
        }
        match subst(&token) {
            Some(text) => out.push_str(&text),
            None => out.push_str(token.text()),
        }
        prev = Some((kind, unary));
    }
    out
}

fn is_operator(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::OPERATOR | SyntaxKind::STAR | SyntaxKind::ARROW)
}

/// After these tokens an operator is unary
fn starts_operand(kind: SyntaxKind) -> bool {
    is_operator(kind)
        || matches!(
            kind,
            SyntaxKind::L_PAREN
                | SyntaxKind::L_BRACKET
                | SyntaxKind::L_BRACE
                | SyntaxKind::COMMA
                | SyntaxKind::COLON
                | SyntaxKind::EQ
        )
}

fn needs_space(prev: SyntaxKind, next: SyntaxKind, next_unary: bool) -> bool {
    let wordy = |k: SyntaxKind| k == SyntaxKind::IDENT || k.is_keyword() || k.is_literal();
    if wordy(prev) && wordy(next) {
        return true;
    }
    if is_operator(next) {
        return !next_unary
            || is_operator(prev)
            || matches!(prev, SyntaxKind::EQ | SyntaxKind::COMMA | SyntaxKind::COLON);
    }
    matches!(prev, SyntaxKind::COMMA | SyntaxKind::EQ | SyntaxKind::COLON)
        || is_operator(prev)
        || next == SyntaxKind::EQ
}

/// Macro to generate a method that finds the first child of a specific AST type.
macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

/// Macro to generate a method that returns an iterator over children of a specific AST type.
macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

/// Macro to generate boolean property methods that check for a specific token kind.
macro_rules! has_token_method {
    ($name:ident, $kind:ident, $example:literal) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token (e.g., `", $example, "`).")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
}

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Find all descendant nodes of a specific AST type
    fn descendants<T: AstNode>(&self) -> impl Iterator<Item = T> {
        self.syntax().descendants().filter_map(T::cast)
    }

    /// Source range without leading or trailing trivia
    fn text_range(&self) -> rowan::TextRange {
        self.syntax().text_range()
    }
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

// Submodules declared after the macros they use
mod decls;
mod types;

pub use self::decls::*;
pub use self::types::*;
