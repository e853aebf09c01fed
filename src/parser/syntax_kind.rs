//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all node and token kinds of the Go subset the
//! profile builder reads: package clause, imports, top-level declarations
//! and structured type expressions.

/// All syntax kinds (tokens and nodes)
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, specs, types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    /// Whitespace containing a newline that terminates a statement
    NEWLINE,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,
    INT_NUMBER,         // 42, 0x1F, 1.5e3
    STRING,             // "hello" or `raw`
    CHAR,               // 'a'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,            // {
    R_BRACE,            // }
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_PAREN,            // (
    R_PAREN,            // )
    SEMICOLON,          // ;
    COLON,              // :
    COMMA,              // ,
    DOT,                // .
    ELLIPSIS,           // ...
    STAR,               // *
    EQ,                 // =
    ARROW,              // <-
    INC_DEC,            // ++ --
    /// Any other operator (`+`, `&&`, `:=`, `<<=`, ...)
    OPERATOR,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    BREAK_KW,
    CASE_KW,
    CHAN_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    ELSE_KW,
    FALLTHROUGH_KW,
    FOR_KW,
    FUNC_KW,
    GO_KW,
    GOTO_KW,
    IF_KW,
    IMPORT_KW,
    INTERFACE_KW,
    MAP_KW,
    PACKAGE_KW,
    RANGE_KW,
    RETURN_KW,
    SELECT_KW,
    STRUCT_KW,
    SWITCH_KW,
    TYPE_KW,
    VAR_KW,

    ERROR,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    PACKAGE_CLAUSE,
    IMPORT_DECL,
    IMPORT_SPEC,
    CONST_DECL,
    CONST_SPEC,
    VAR_DECL,
    VAR_SPEC,
    TYPE_DECL,
    TYPE_SPEC,
    FUNC_DECL,
    RECEIVER,
    SIGNATURE,
    PARAM_LIST,
    PARAM,
    RESULT,
    BLOCK,
    EXPR,

    // Types
    NAMED_TYPE,
    POINTER_TYPE,
    SLICE_TYPE,
    ARRAY_TYPE,
    ARRAY_LEN,
    MAP_TYPE,
    CHAN_TYPE,
    FUNC_TYPE,
    STRUCT_TYPE,
    FIELD_DECL,
    INTERFACE_TYPE,
    METHOD_SPEC,
    PAREN_TYPE,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::BREAK_KW as u16) && (self as u16) <= (Self::VAR_KW as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(self, Self::INT_NUMBER | Self::STRING | Self::CHAR)
    }

    /// Check if this is a type node
    pub fn is_type(self) -> bool {
        (self as u16) >= (Self::NAMED_TYPE as u16) && (self as u16) <= (Self::PAREN_TYPE as u16)
            && !matches!(self, Self::ARRAY_LEN | Self::FIELD_DECL | Self::METHOD_SPEC)
    }

    /// A newline directly after a token of this kind terminates the statement
    pub fn triggers_semicolon(self) -> bool {
        matches!(
            self,
            Self::IDENT
                | Self::INT_NUMBER
                | Self::STRING
                | Self::CHAR
                | Self::BREAK_KW
                | Self::CONTINUE_KW
                | Self::FALLTHROUGH_KW
                | Self::RETURN_KW
                | Self::INC_DEC
                | Self::R_PAREN
                | Self::R_BRACKET
                | Self::R_BRACE
        )
    }

    /// Keyword kind for an identifier-like text, if any
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "break" => Self::BREAK_KW,
            "case" => Self::CASE_KW,
            "chan" => Self::CHAN_KW,
            "const" => Self::CONST_KW,
            "continue" => Self::CONTINUE_KW,
            "default" => Self::DEFAULT_KW,
            "defer" => Self::DEFER_KW,
            "else" => Self::ELSE_KW,
            "fallthrough" => Self::FALLTHROUGH_KW,
            "for" => Self::FOR_KW,
            "func" => Self::FUNC_KW,
            "go" => Self::GO_KW,
            "goto" => Self::GOTO_KW,
            "if" => Self::IF_KW,
            "import" => Self::IMPORT_KW,
            "interface" => Self::INTERFACE_KW,
            "map" => Self::MAP_KW,
            "package" => Self::PACKAGE_KW,
            "range" => Self::RANGE_KW,
            "return" => Self::RETURN_KW,
            "select" => Self::SELECT_KW,
            "struct" => Self::STRUCT_KW,
            "switch" => Self::SWITCH_KW,
            "type" => Self::TYPE_KW,
            "var" => Self::VAR_KW,
            _ => return None,
        };
        Some(kind)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoLanguage {}

impl rowan::Language for GoLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<GoLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<GoLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<GoLanguage>;
