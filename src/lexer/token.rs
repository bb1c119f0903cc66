use std::fmt;

use crate::diagnostics::{LayoutErrorKind, LexErrorKind};
use crate::span::Span;

/// Token kinds of the PureScript language.
///
/// The set is closed: trivia, keywords, names, literals, reserved symbols,
/// punctuation, the virtual tokens inserted by the layout resolver, lexical
/// errors and end of file. Every byte of a source file ends up in exactly one
/// token of one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    Newline,
    LineComment,
    DocComment,  // -- | documentation
    BlockComment,

    // Keywords
    Module,
    Import,
    Foreign,
    Data,
    Type,
    Newtype,
    Class,
    Instance,
    Derive,
    Where,
    Let,
    In,
    Do,
    Ado,
    Case,
    Of,
    If,
    Then,
    Else,
    Forall,
    Infix,
    Infixl,
    Infixr,
    True,
    False,

    // Names
    LowerIdent,        // foo, myVariable, as, hiding
    UpperIdent,        // Foo, MyType
    QualifiedLower,    // Data.Array.head
    QualifiedUpper,    // Data.Maybe.Just
    QualifiedOperator, // Data.Semigroup.<>
    QualifiedDo,       // Module.do
    QualifiedAdo,      // Module.ado
    Operator,          // +, <>, >>>
    Hole,              // ?hole

    // Literals
    Integer,
    Number,
    String,
    RawString, // """multi-line"""
    Char,

    // Reserved symbols
    Arrow,       // ->
    FatArrow,    // =>
    DoubleColon, // ::
    LeftArrow,   // <-
    Equals,      // =
    Pipe,        // |
    Backslash,   // \
    Dot,         // .
    DoubleDot,   // ..
    At,          // @
    Colon,       // :

    // Delimiters and punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Backtick,
    Underscore,

    // Layout tokens (inserted by layout resolver)
    LayoutStart, // virtual { after where, let, do, ado, of
    LayoutSep,   // virtual ; on same-indentation newlines
    LayoutEnd,   // virtual } on dedent
    LayoutError(LayoutErrorKind),

    /// Characters the lexer could not turn into a well-formed token.
    Error(LexErrorKind),

    Eof,
}

impl TokenKind {
    /// Whitespace and comments. The parser never inspects these.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::DocComment
                | TokenKind::BlockComment
        )
    }

    /// Trivia, plus the error token of a comment that never closed. Neither
    /// takes part in layout nor in the grammar.
    pub fn is_insignificant(self) -> bool {
        self.is_trivia() || self == TokenKind::Error(LexErrorKind::UnterminatedComment)
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment | TokenKind::DocComment | TokenKind::BlockComment
        )
    }

    /// Tokens with no source text, produced by the layout resolver or at end of input.
    pub fn is_virtual(self) -> bool {
        matches!(
            self,
            TokenKind::LayoutStart
                | TokenKind::LayoutSep
                | TokenKind::LayoutEnd
                | TokenKind::LayoutError(_)
                | TokenKind::Eof
        )
    }

    /// Returns true if this token introduces an implicit layout block
    pub fn is_layout_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Where
                | TokenKind::Let
                | TokenKind::Do
                | TokenKind::Ado
                | TokenKind::Of
                | TokenKind::QualifiedDo
                | TokenKind::QualifiedAdo
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Module
                | TokenKind::Import
                | TokenKind::Foreign
                | TokenKind::Data
                | TokenKind::Type
                | TokenKind::Newtype
                | TokenKind::Class
                | TokenKind::Instance
                | TokenKind::Derive
                | TokenKind::Where
                | TokenKind::Let
                | TokenKind::In
                | TokenKind::Do
                | TokenKind::Ado
                | TokenKind::Case
                | TokenKind::Of
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::Forall
                | TokenKind::Infix
                | TokenKind::Infixl
                | TokenKind::Infixr
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// Keywords that can only begin a top-level declaration. Error recovery
    /// stops in front of these.
    pub fn starts_top_level_decl(self) -> bool {
        matches!(
            self,
            TokenKind::Import
                | TokenKind::Foreign
                | TokenKind::Data
                | TokenKind::Type
                | TokenKind::Newtype
                | TokenKind::Class
                | TokenKind::Instance
                | TokenKind::Derive
                | TokenKind::Infix
                | TokenKind::Infixl
                | TokenKind::Infixr
        )
    }

    pub fn is_string(self) -> bool {
        matches!(self, TokenKind::String | TokenKind::RawString)
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Integer
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::RawString
                | TokenKind::Char
                | TokenKind::True
                | TokenKind::False
        )
    }

    pub fn is_error(self) -> bool {
        matches!(self, TokenKind::Error(_))
    }

    /// Human readable description used in diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::LineComment => "line comment",
            TokenKind::DocComment => "doc comment",
            TokenKind::BlockComment => "block comment",
            TokenKind::Module => "`module`",
            TokenKind::Import => "`import`",
            TokenKind::Foreign => "`foreign`",
            TokenKind::Data => "`data`",
            TokenKind::Type => "`type`",
            TokenKind::Newtype => "`newtype`",
            TokenKind::Class => "`class`",
            TokenKind::Instance => "`instance`",
            TokenKind::Derive => "`derive`",
            TokenKind::Where => "`where`",
            TokenKind::Let => "`let`",
            TokenKind::In => "`in`",
            TokenKind::Do => "`do`",
            TokenKind::Ado => "`ado`",
            TokenKind::Case => "`case`",
            TokenKind::Of => "`of`",
            TokenKind::If => "`if`",
            TokenKind::Then => "`then`",
            TokenKind::Else => "`else`",
            TokenKind::Forall => "`forall`",
            TokenKind::Infix => "`infix`",
            TokenKind::Infixl => "`infixl`",
            TokenKind::Infixr => "`infixr`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::LowerIdent => "identifier",
            TokenKind::UpperIdent => "proper name",
            TokenKind::QualifiedLower => "qualified identifier",
            TokenKind::QualifiedUpper => "qualified proper name",
            TokenKind::QualifiedOperator => "qualified operator",
            TokenKind::QualifiedDo => "qualified `do`",
            TokenKind::QualifiedAdo => "qualified `ado`",
            TokenKind::Operator => "operator",
            TokenKind::Hole => "hole",
            TokenKind::Integer => "integer literal",
            TokenKind::Number => "number literal",
            TokenKind::String => "string literal",
            TokenKind::RawString => "raw string literal",
            TokenKind::Char => "character literal",
            TokenKind::Arrow => "`->`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::DoubleColon => "`::`",
            TokenKind::LeftArrow => "`<-`",
            TokenKind::Equals => "`=`",
            TokenKind::Pipe => "`|`",
            TokenKind::Backslash => "`\\`",
            TokenKind::Dot => "`.`",
            TokenKind::DoubleDot => "`..`",
            TokenKind::At => "`@`",
            TokenKind::Colon => "`:`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Backtick => "`` ` ``",
            TokenKind::Underscore => "`_`",
            TokenKind::LayoutStart => "start of block",
            TokenKind::LayoutSep => "new line in block",
            TokenKind::LayoutEnd => "end of block",
            TokenKind::LayoutError(_) => "misplaced indentation",
            TokenKind::Error(_) => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A token: its kind, its byte span and the slice of source it covers.
///
/// Virtual tokens have an empty span and empty text, placed at the start of
/// the token they precede.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub span: Span,
    pub text: &'src str,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }

    /// A zero-width token at `offset`.
    pub fn virtual_at(kind: TokenKind, offset: usize) -> Self {
        Self {
            kind,
            span: Span::empty(offset),
            text: "",
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{:?}", self.text)
        }
    }
}
