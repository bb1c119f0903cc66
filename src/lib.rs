//! Error-tolerant PureScript syntax
//!
//! Turns PureScript source into a lossless concrete syntax tree, for editors
//! and other tools that must cope with half-typed code. Three stages:
//! 1. Logos-based lexer covering every byte of the input
//! 2. Layout resolver inserting virtual braces and separators (offside rule)
//! 3. Recursive descent parser with operator precedence from a fixity table,
//!    recording malformed input as error nodes instead of failing

pub mod cst;
pub mod diagnostics;
pub mod factory;
pub mod fixity;
pub mod lexer;
pub mod parser;
pub mod ports;
pub mod span;

// Re-export main types
pub use cst::{NodeKind, SyntaxElement, SyntaxNode, SyntaxToken};
pub use diagnostics::{Cancelled, ErrorKind, ErrorNode, Found};
pub use fixity::{Associativity, Fixity, Namespace, OperatorTable};
pub use lexer::{lex, tokenize, Token, TokenKind};
pub use parser::{parse, CancelCheck, ModuleParser, Parse, ParseOptions};
pub use ports::{LanguagePorts, PureScript, TokenClass};
pub use span::{SourcePos, Span};
