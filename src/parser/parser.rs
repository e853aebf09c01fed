//! Recursive descent parser for Go source files
//!
//! Builds a rowan GreenNode tree from tokens. Declarations and type
//! expressions get structured nodes; function bodies and initializer
//! expressions are kept as opaque, balanced token runs.
//! Supports error recovery and produces a lossless CST.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Get the typed root
    pub fn source_file(&self) -> super::ast::SourceFile {
        super::ast::SourceFile(self.syntax())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Go source code into a CST
pub fn parse_source_file(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Tokens that may begin a type expression
const TYPE_START: &[SyntaxKind] = &[
    SyntaxKind::IDENT,
    SyntaxKind::STAR,
    SyntaxKind::L_BRACKET,
    SyntaxKind::MAP_KW,
    SyntaxKind::CHAN_KW,
    SyntaxKind::FUNC_KW,
    SyntaxKind::STRUCT_KW,
    SyntaxKind::INTERFACE_KW,
    SyntaxKind::L_PAREN,
    SyntaxKind::ARROW,
];

/// Keywords that start a top-level declaration
const DECL_START: &[SyntaxKind] = &[
    SyntaxKind::CONST_KW,
    SyntaxKind::VAR_KW,
    SyntaxKind::TYPE_KW,
    SyntaxKind::FUNC_KW,
    SyntaxKind::IMPORT_KW,
];

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection (trivia is always skipped)
    // =========================================================================

    fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
    }

    fn peek(&self) -> Option<SyntaxKind> {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.peek() == Some(kind)
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        self.peek().is_some_and(|k| kinds.contains(&k))
    }

    fn at_eof(&self) -> bool {
        self.peek().is_none()
    }

    fn at_type_start(&self) -> bool {
        self.at_any(TYPE_START)
    }

    fn at_terminator(&self) -> bool {
        self.at_eof() || self.at_any(&[SyntaxKind::SEMICOLON, SyntaxKind::NEWLINE])
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn skip_trivia(&mut self) {
        while self.tokens.get(self.pos).is_some_and(|t| t.kind.is_trivia()) {
            let token = &self.tokens[self.pos];
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            if token.kind == SyntaxKind::ERROR {
                let range = TextRange::at(token.offset, TextSize::of(token.text));
                self.errors.push(SyntaxError::new(
                    format!("unexpected character `{}`", token.text),
                    range,
                ));
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {}", what));
            false
        }
    }

    /// Consume a statement terminator; `)` or `}` may also close the list
    fn expect_terminator(&mut self, closer: Option<SyntaxKind>) {
        if self.at_terminator() {
            if !self.at_eof() {
                self.bump();
            }
        } else if closer.is_some_and(|c| self.at(c)) {
            // list closer ends the last element
        } else {
            let mut recovery = vec![SyntaxKind::SEMICOLON, SyntaxKind::NEWLINE];
            recovery.extend(closer);
            self.error_recover("expected `;` or newline", &recovery);
            if self.at_any(&[SyntaxKind::SEMICOLON, SyntaxKind::NEWLINE]) {
                self.bump();
            }
        }
    }

    fn skip_separators(&mut self) {
        while self.at_any(&[SyntaxKind::SEMICOLON, SyntaxKind::NEWLINE]) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn current_range(&self) -> TextRange {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
                    .unwrap_or_default();
                TextRange::empty(end)
            })
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        let message = message.into();
        // One error per position is enough; cascades add noise
        if self.errors.last().is_some_and(|e| e.range == range) {
            return;
        }
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Source file
    // =========================================================================

    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());

        self.skip_separators();
        self.parse_package_clause();

        loop {
            self.skip_separators();
            match self.peek() {
                None => break,
                Some(SyntaxKind::IMPORT_KW) => self.parse_import_decl(),
                Some(SyntaxKind::CONST_KW) => {
                    self.parse_grouped_decl(SyntaxKind::CONST_DECL, Self::parse_const_spec)
                }
                Some(SyntaxKind::VAR_KW) => {
                    self.parse_grouped_decl(SyntaxKind::VAR_DECL, Self::parse_var_spec)
                }
                Some(SyntaxKind::TYPE_KW) => {
                    self.parse_grouped_decl(SyntaxKind::TYPE_DECL, Self::parse_type_spec)
                }
                Some(SyntaxKind::FUNC_KW) => self.parse_func_decl(),
                Some(_) => self.error_recover("expected declaration", DECL_START),
            }
        }

        self.skip_trivia();
        self.builder.finish_node();
    }

    fn parse_package_clause(&mut self) {
        self.start_node(SyntaxKind::PACKAGE_CLAUSE);
        if self.expect(SyntaxKind::PACKAGE_KW, "`package` clause") {
            self.expect(SyntaxKind::IDENT, "package name");
        }
        self.finish_node();
        self.expect_terminator(None);
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn parse_import_decl(&mut self) {
        self.start_node(SyntaxKind::IMPORT_DECL);
        self.bump(); // import
        if self.eat(SyntaxKind::L_PAREN) {
            loop {
                self.skip_separators();
                if self.at(SyntaxKind::R_PAREN) || self.at_eof() {
                    break;
                }
                self.parse_import_spec();
                self.expect_terminator(Some(SyntaxKind::R_PAREN));
            }
            self.expect(SyntaxKind::R_PAREN, "`)`");
        } else {
            self.parse_import_spec();
        }
        self.finish_node();
        self.expect_terminator(None);
    }

    fn parse_import_spec(&mut self) {
        self.start_node(SyntaxKind::IMPORT_SPEC);
        if self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::DOT) {
            self.bump();
        }
        self.expect(SyntaxKind::STRING, "import path");
        self.finish_node();
    }

    // =========================================================================
    // const / var / type
    // =========================================================================

    /// Parse `kw spec` or `kw ( spec; spec; ... )`
    fn parse_grouped_decl(&mut self, decl: SyntaxKind, spec: fn(&mut Self)) {
        self.start_node(decl);
        self.bump(); // keyword
        if self.eat(SyntaxKind::L_PAREN) {
            loop {
                self.skip_separators();
                if self.at(SyntaxKind::R_PAREN) || self.at_eof() {
                    break;
                }
                spec(self);
                self.expect_terminator(Some(SyntaxKind::R_PAREN));
            }
            self.expect(SyntaxKind::R_PAREN, "`)`");
        } else {
            spec(self);
        }
        self.finish_node();
        self.expect_terminator(None);
    }

    fn parse_ident_list(&mut self) {
        if self.expect(SyntaxKind::IDENT, "identifier") {
            while self.eat(SyntaxKind::COMMA) {
                self.expect(SyntaxKind::IDENT, "identifier");
            }
        }
    }

    fn parse_expr_list(&mut self) {
        self.parse_expr();
        while self.eat(SyntaxKind::COMMA) {
            self.parse_expr();
        }
    }

    fn parse_const_spec(&mut self) {
        self.start_node(SyntaxKind::CONST_SPEC);
        self.parse_ident_list();
        if self.at_type_start() {
            self.parse_type();
        }
        if self.eat(SyntaxKind::EQ) {
            self.parse_expr_list();
        }
        self.finish_node();
    }

    fn parse_var_spec(&mut self) {
        self.start_node(SyntaxKind::VAR_SPEC);
        self.parse_ident_list();
        if self.at_type_start() {
            self.parse_type();
            if self.eat(SyntaxKind::EQ) {
                self.parse_expr_list();
            }
        } else if self.expect(SyntaxKind::EQ, "type or `=`") {
            self.parse_expr_list();
        }
        self.finish_node();
    }

    fn parse_type_spec(&mut self) {
        self.start_node(SyntaxKind::TYPE_SPEC);
        self.expect(SyntaxKind::IDENT, "type name");
        self.eat(SyntaxKind::EQ);
        self.parse_type();
        self.finish_node();
    }

    /// Opaque expression: balanced tokens up to `,`, `;`, newline or a closer
    fn parse_expr(&mut self) {
        self.start_node(SyntaxKind::EXPR);
        let mut depth = 0usize;
        let mut consumed = false;
        while let Some(kind) = self.peek() {
            if depth == 0
                && matches!(
                    kind,
                    SyntaxKind::COMMA
                        | SyntaxKind::SEMICOLON
                        | SyntaxKind::NEWLINE
                        | SyntaxKind::R_PAREN
                        | SyntaxKind::R_BRACKET
                        | SyntaxKind::R_BRACE
                )
            {
                break;
            }
            match kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => depth -= 1,
                _ => {}
            }
            self.bump();
            consumed = true;
        }
        if !consumed {
            self.error("expected expression");
        } else if depth > 0 {
            self.error("unbalanced brackets in expression");
        }
        self.finish_node();
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn parse_func_decl(&mut self) {
        self.start_node(SyntaxKind::FUNC_DECL);
        self.bump(); // func
        if self.at(SyntaxKind::L_PAREN) {
            self.start_node(SyntaxKind::RECEIVER);
            self.parse_param_list();
            self.finish_node();
        }
        self.expect(SyntaxKind::IDENT, "function name");
        self.parse_signature();
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        }
        self.finish_node();
        self.expect_terminator(None);
    }

    fn parse_signature(&mut self) {
        self.start_node(SyntaxKind::SIGNATURE);
        self.parse_param_list();
        if self.at_type_start() {
            self.start_node(SyntaxKind::RESULT);
            if self.at(SyntaxKind::L_PAREN) {
                self.parse_param_list();
            } else {
                self.parse_type();
            }
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        if self.expect(SyntaxKind::L_PAREN, "`(`") {
            while !self.at(SyntaxKind::R_PAREN) && !self.at_eof() {
                let before = self.pos;
                self.parse_param();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
                if self.pos == before {
                    break;
                }
            }
            if !self.at(SyntaxKind::R_PAREN) {
                self.error_recover("expected `)`", &[SyntaxKind::R_PAREN]);
            }
            self.eat(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    /// `name Type`, `name ...Type`, or a bare `Type` (names are resolved later)
    fn parse_param(&mut self) {
        self.start_node(SyntaxKind::PARAM);
        let named = self.at(SyntaxKind::IDENT)
            && self
                .nth(1)
                .is_some_and(|k| k == SyntaxKind::ELLIPSIS || TYPE_START.contains(&k));
        if named {
            self.bump();
        }
        self.eat(SyntaxKind::ELLIPSIS);
        self.parse_type();
        self.finish_node();
    }

    /// Function body: balanced braces, kept opaque
    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.bump(); // {
        let mut depth = 1usize;
        while let Some(kind) = self.peek() {
            match kind {
                SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACE => depth -= 1,
                _ => {}
            }
            self.bump();
            if depth == 0 {
                break;
            }
        }
        if depth > 0 {
            self.error("unclosed function body");
        }
        self.finish_node();
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) {
        match self.peek() {
            Some(SyntaxKind::IDENT) => {
                self.start_node(SyntaxKind::NAMED_TYPE);
                self.bump();
                if self.eat(SyntaxKind::DOT) {
                    self.expect(SyntaxKind::IDENT, "type name after `.`");
                }
                self.finish_node();
            }
            Some(SyntaxKind::STAR) => {
                self.start_node(SyntaxKind::POINTER_TYPE);
                self.bump();
                self.parse_type();
                self.finish_node();
            }
            Some(SyntaxKind::L_BRACKET) => {
                if self.nth(1) == Some(SyntaxKind::R_BRACKET) {
                    self.start_node(SyntaxKind::SLICE_TYPE);
                    self.bump();
                    self.bump();
                } else {
                    self.start_node(SyntaxKind::ARRAY_TYPE);
                    self.bump();
                    self.parse_array_len();
                    self.expect(SyntaxKind::R_BRACKET, "`]`");
                }
                self.parse_type();
                self.finish_node();
            }
            Some(SyntaxKind::MAP_KW) => {
                self.start_node(SyntaxKind::MAP_TYPE);
                self.bump();
                self.expect(SyntaxKind::L_BRACKET, "`[`");
                self.parse_type();
                self.expect(SyntaxKind::R_BRACKET, "`]`");
                self.parse_type();
                self.finish_node();
            }
            Some(SyntaxKind::CHAN_KW) => {
                self.start_node(SyntaxKind::CHAN_TYPE);
                self.bump();
                self.eat(SyntaxKind::ARROW);
                self.parse_type();
                self.finish_node();
            }
            Some(SyntaxKind::ARROW) => {
                self.start_node(SyntaxKind::CHAN_TYPE);
                self.bump();
                self.expect(SyntaxKind::CHAN_KW, "`chan`");
                self.parse_type();
                self.finish_node();
            }
            Some(SyntaxKind::FUNC_KW) => {
                self.start_node(SyntaxKind::FUNC_TYPE);
                self.bump();
                self.parse_signature();
                self.finish_node();
            }
            Some(SyntaxKind::STRUCT_KW) => self.parse_struct_type(),
            Some(SyntaxKind::INTERFACE_KW) => self.parse_interface_type(),
            Some(SyntaxKind::L_PAREN) => {
                self.start_node(SyntaxKind::PAREN_TYPE);
                self.bump();
                self.parse_type();
                self.expect(SyntaxKind::R_PAREN, "`)`");
                self.finish_node();
            }
            _ => self.error("expected type"),
        }
    }

    fn parse_array_len(&mut self) {
        self.start_node(SyntaxKind::ARRAY_LEN);
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            match kind {
                SyntaxKind::R_BRACKET if depth == 0 => break,
                SyntaxKind::L_BRACKET | SyntaxKind::L_PAREN => depth += 1,
                SyntaxKind::R_BRACKET | SyntaxKind::R_PAREN => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
        self.finish_node();
    }

    fn parse_struct_type(&mut self) {
        self.start_node(SyntaxKind::STRUCT_TYPE);
        self.bump(); // struct
        if self.expect(SyntaxKind::L_BRACE, "`{`") {
            loop {
                self.skip_separators();
                if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                    break;
                }
                self.parse_field_decl();
                self.expect_terminator(Some(SyntaxKind::R_BRACE));
            }
            self.expect(SyntaxKind::R_BRACE, "`}`");
        }
        self.finish_node();
    }

    fn parse_field_decl(&mut self) {
        self.start_node(SyntaxKind::FIELD_DECL);
        let named = self.at(SyntaxKind::IDENT)
            && self
                .nth(1)
                .is_some_and(|k| k == SyntaxKind::COMMA || TYPE_START.contains(&k));
        if named {
            self.parse_ident_list();
        }
        self.parse_type();
        self.eat(SyntaxKind::STRING);
        self.finish_node();
    }

    fn parse_interface_type(&mut self) {
        self.start_node(SyntaxKind::INTERFACE_TYPE);
        self.bump(); // interface
        if self.expect(SyntaxKind::L_BRACE, "`{`") {
            loop {
                self.skip_separators();
                if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                    break;
                }
                if self.at(SyntaxKind::IDENT) && self.nth(1) == Some(SyntaxKind::L_PAREN) {
                    self.start_node(SyntaxKind::METHOD_SPEC);
                    self.bump();
                    self.parse_signature();
                    self.finish_node();
                } else {
                    self.parse_type();
                }
                self.expect_terminator(Some(SyntaxKind::R_BRACE));
            }
            self.expect(SyntaxKind::R_BRACE, "`}`");
        }
        self.finish_node();
    }
}
