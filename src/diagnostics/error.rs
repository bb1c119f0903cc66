use std::collections::BTreeSet;
use std::fmt;

use crate::lexer::TokenKind;
use crate::span::Span;
use thiserror::Error;

/// Lexical errors, carried by `TokenKind::Error` tokens
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LexErrorKind {
    #[error("unexpected character")]
    UnexpectedCharacter,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated raw string literal")]
    UnterminatedRawString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("invalid escape sequence in literal")]
    InvalidEscape,
}

/// Indentation errors, carried by `TokenKind::LayoutError` markers
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayoutErrorKind {
    /// A dedent that lands between two enclosing block columns
    #[error("line is not aligned with any enclosing block")]
    Misaligned,

    /// A bracket still open when a line starts left of its enclosing block
    #[error("unclosed delimiter before dedent")]
    UnclosedDelimiter,

    /// A line starting left of the first token of the file
    #[error("line starts left of the module's first column")]
    LeftOfRoot,
}

/// Conflicting or unknown operator fixities
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperatorAmbiguity {
    #[error("operator `{op}` is non-associative and cannot be chained")]
    NonAssociative { op: String },

    #[error("cannot mix `{left}` and `{right}`: same precedence, different associativity")]
    MixedAssociativity { left: String, right: String },

    #[error("operator `{op}` has no known fixity, assuming infixl 9")]
    UnknownOperator { op: String },

    #[error("conflicting fixity declarations for `{op}`")]
    ConflictingFixity { op: String },
}

/// The error taxonomy. None of these abort a parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("{0}")]
    Lex(LexErrorKind),

    #[error("{0}")]
    Layout(LayoutErrorKind),

    #[error("syntax error")]
    Syntax,

    #[error("{0}")]
    OperatorAmbiguity(OperatorAmbiguity),
}

impl ErrorKind {
    pub fn code(&self) -> String {
        match self {
            ErrorKind::Lex(kind) => format!("LexError.{:?}", kind),
            ErrorKind::Layout(kind) => format!("LayoutError.{:?}", kind),
            ErrorKind::Syntax => "SyntaxError".into(),
            ErrorKind::OperatorAmbiguity(amb) => match amb {
                OperatorAmbiguity::NonAssociative { .. } => "OperatorAmbiguity.NonAssociative".into(),
                OperatorAmbiguity::MixedAssociativity { .. } => "OperatorAmbiguity.MixedAssociativity".into(),
                OperatorAmbiguity::UnknownOperator { .. } => "OperatorAmbiguity.UnknownOperator".into(),
                OperatorAmbiguity::ConflictingFixity { .. } => "OperatorAmbiguity.ConflictingFixity".into(),
            },
        }
    }
}

/// What the parser saw where an error was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Token { kind: TokenKind, text: String },
    Eof,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Token { kind, text } if text.is_empty() => write!(f, "{}", kind),
            Found::Token { kind, text } => write!(f, "{} {:?}", kind, text),
            Found::Eof => write!(f, "end of file"),
        }
    }
}

/// Payload of an error node in the syntax tree.
///
/// `span` covers the tokens the error node swallowed (empty when nothing was
/// skipped) and `recovery` is the offset where parsing resumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub kind: ErrorKind,
    pub expected: BTreeSet<TokenKind>,
    pub found: Found,
    pub span: Span,
    pub recovery: usize,
}

impl ErrorNode {
    pub fn code(&self) -> String {
        self.kind.code()
    }
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.expected.is_empty() {
            let expected: Vec<&str> = self.expected.iter().map(|k| k.description()).collect();
            write!(f, ": expected {}", expected.join(", "))?;
        }
        write!(f, ", found {}", self.found)
    }
}

/// Returned when the caller-supplied cancellation check fired mid-parse.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("parse cancelled")]
pub struct Cancelled;
