//! The narrow boundary a host (an editor, a language server) plugs into.
//!
//! Hosts ask for a lexer, a parser and a coarse classification of tokens for
//! highlighting and brace matching. Nothing here depends on host types.

use crate::diagnostics::Cancelled;
use crate::fixity::OperatorTable;
use crate::lexer::{tokenize, LayoutResolver, Token, TokenKind};
use crate::parser::{ModuleParser, Parse, ParseOptions};

/// Coarse token categories a host colours and skips by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Whitespace,
    Comment,
    StringLiteral,
    Keyword,
    Identifier,
    Operator,
    Literal,
    Punctuation,
    /// Virtual tokens inserted by layout resolution
    Layout,
    Error,
    Eof,
}

pub const WHITESPACE_TOKENS: &[TokenKind] = &[TokenKind::Whitespace, TokenKind::Newline];

pub const COMMENT_TOKENS: &[TokenKind] = &[
    TokenKind::LineComment,
    TokenKind::DocComment,
    TokenKind::BlockComment,
];

pub const STRING_TOKENS: &[TokenKind] = &[TokenKind::String, TokenKind::RawString];

pub fn classify_token(kind: TokenKind) -> TokenClass {
    use TokenKind::*;
    match kind {
        Whitespace | Newline => TokenClass::Whitespace,
        LineComment | DocComment | BlockComment => TokenClass::Comment,
        String | RawString => TokenClass::StringLiteral,
        Integer | Number | Char => TokenClass::Literal,
        Module | Import | Foreign | Data | Type | Newtype | Class | Instance | Derive
        | Where | Let | In | Do | Ado | Case | Of | If | Then | Else | Forall | Infix
        | Infixl | Infixr | True | False | QualifiedDo | QualifiedAdo => TokenClass::Keyword,
        LowerIdent | UpperIdent | QualifiedLower | QualifiedUpper | Hole => {
            TokenClass::Identifier
        }
        Operator | QualifiedOperator | Arrow | FatArrow | DoubleColon | LeftArrow | Equals
        | Pipe | Backslash | Dot | DoubleDot | At | Colon => TokenClass::Operator,
        LParen | RParen | LBrace | RBrace | LBracket | RBracket | Comma | Semicolon
        | Backtick | Underscore => TokenClass::Punctuation,
        LayoutStart | LayoutSep | LayoutEnd | LayoutError(_) => TokenClass::Layout,
        Error(_) => TokenClass::Error,
        Eof => TokenClass::Eof,
    }
}

/// Anything that turns a source file into a [`Parse`].
pub trait SourceParser {
    fn parse_source(&self, source: &str) -> Result<Parse, Cancelled>;
}

impl SourceParser for ModuleParser<'_> {
    fn parse_source(&self, source: &str) -> Result<Parse, Cancelled> {
        self.parse(source)
    }
}

/// What a host needs from a language front-end.
pub trait LanguagePorts {
    /// The layout-annotated token stream of `source`
    fn create_lexer<'src>(&self, source: &'src str) -> Box<dyn Iterator<Item = Token<'src>> + 'src>;

    fn create_parser(&self) -> Box<dyn SourceParser + '_>;

    fn classify_token(&self, kind: TokenKind) -> TokenClass;
}

/// The PureScript front-end
#[derive(Debug, Clone, Default)]
pub struct PureScript {
    options: ParseOptions,
    operators: Option<OperatorTable>,
}

impl PureScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Seed parses with `operators` instead of the standard fixities.
    pub fn with_operators(mut self, operators: OperatorTable) -> Self {
        self.operators = Some(operators);
        self
    }
}

impl LanguagePorts for PureScript {
    fn create_lexer<'src>(&self, source: &'src str) -> Box<dyn Iterator<Item = Token<'src>> + 'src> {
        Box::new(LayoutResolver::new(tokenize(source), self.options.tab_width))
    }

    fn create_parser(&self) -> Box<dyn SourceParser + '_> {
        let parser = ModuleParser::new().options(self.options.clone());
        match &self.operators {
            Some(operators) => Box::new(parser.operators(operators)),
            None => Box::new(parser),
        }
    }

    fn classify_token(&self, kind: TokenKind) -> TokenClass {
        classify_token(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixity::{Associativity, Fixity, Namespace};

    #[test]
    fn test_classify_token() {
        let cases = [
            (TokenKind::Newline, TokenClass::Whitespace),
            (TokenKind::DocComment, TokenClass::Comment),
            (TokenKind::RawString, TokenClass::StringLiteral),
            (TokenKind::Where, TokenClass::Keyword),
            (TokenKind::QualifiedDo, TokenClass::Keyword),
            (TokenKind::QualifiedLower, TokenClass::Identifier),
            (TokenKind::DoubleColon, TokenClass::Operator),
            (TokenKind::Char, TokenClass::Literal),
            (TokenKind::Backtick, TokenClass::Punctuation),
            (TokenKind::LayoutSep, TokenClass::Layout),
            (TokenKind::Eof, TokenClass::Eof),
        ];
        for (kind, class) in cases {
            assert_eq!(classify_token(kind), class, "{:?}", kind);
        }
        for kind in WHITESPACE_TOKENS {
            assert_eq!(classify_token(*kind), TokenClass::Whitespace);
        }
        for kind in COMMENT_TOKENS {
            assert_eq!(classify_token(*kind), TokenClass::Comment);
        }
    }

    #[test]
    fn test_lexer_port_covers_source() {
        let source = "f = do\n  a\n  b\n";
        let ports = PureScript::new();
        let tokens: Vec<_> = ports.create_lexer(source).collect();
        let text: std::string::String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(text, source);
        assert!(tokens
            .iter()
            .any(|t| ports.classify_token(t.kind) == TokenClass::Layout));
    }

    #[test]
    fn test_parser_port_uses_seed_table() {
        let mut table = OperatorTable::new();
        table.insert(
            Namespace::Value,
            "<+>",
            Fixity::new(Associativity::Left, 5),
        );
        let ports = PureScript::new()
            .with_options(ParseOptions {
                report_unknown_operators: true,
                ..ParseOptions::default()
            })
            .with_operators(table);
        let parser = ports.create_parser();
        let known = parser.parse_source("x = a <+> b").unwrap();
        assert!(!known.has_errors(), "{:?}", known.errors);
        let unknown = parser.parse_source("x = a + b").unwrap();
        assert_eq!(unknown.errors.len(), 1);
    }
}
