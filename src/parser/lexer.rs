//! Logos-based lexer for Go source
//!
//! Fast tokenization using the logos crate. Go's automatic semicolon
//! insertion is resolved here: a newline that follows a terminating token
//! is reported as [`SyntaxKind::NEWLINE`] instead of whitespace.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
    /// Kind of the last non-trivia token, used for semicolon insertion
    last_significant: Option<SyntaxKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
            last_significant: None,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let mut kind = match logos_token {
            Ok(LogosToken::Ident) => SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::IDENT),
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        let ends_statement = self
            .last_significant
            .is_some_and(SyntaxKind::triggers_semicolon);
        match kind {
            SyntaxKind::WHITESPACE | SyntaxKind::BLOCK_COMMENT
                if ends_statement && text.contains('\n') =>
            {
                kind = SyntaxKind::NEWLINE;
                self.last_significant = Some(SyntaxKind::NEWLINE);
            }
            k if k.is_trivia() => {}
            k => self.last_significant = Some(k),
        }

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?([eEpP][+-][0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"`[^`]*`")]
    String,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,
    #[token("=")]
    Eq,
    #[token("<-")]
    Arrow,
    #[token("++")]
    #[token("--")]
    IncDec,

    #[token("+")]
    #[token("-")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("<<")]
    #[token(">>")]
    #[token("&^")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("&^=")]
    #[token("&&")]
    #[token("||")]
    #[token("==")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    #[token(":=")]
    #[token("!")]
    #[token("~")]
    Operator,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            Ident => SyntaxKind::IDENT,
            Number => SyntaxKind::INT_NUMBER,
            String => SyntaxKind::STRING,
            Char => SyntaxKind::CHAR,

            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            Ellipsis => SyntaxKind::ELLIPSIS,
            Star => SyntaxKind::STAR,
            Eq => SyntaxKind::EQ,
            Arrow => SyntaxKind::ARROW,
            IncDec => SyntaxKind::INC_DEC,
            Operator => SyntaxKind::OPERATOR,
        }
    }
}
