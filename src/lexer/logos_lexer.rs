use crate::diagnostics::LexErrorKind;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;
use logos::Logos;

/// How a string literal ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrLex {
    Terminated,
    InvalidEscape,
    /// Stopped at end of line or end of input
    Unterminated,
    Raw,
    UnterminatedRaw,
}

/// Classification of a run of operator characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    Operator,
    Arrow,
    FatArrow,
    DoubleColon,
    LeftArrow,
    Equals,
    Pipe,
    Backslash,
    Dot,
    DoubleDot,
    At,
    Colon,
    Forall,
    LineComment,
    DocComment,
}

/// Last segment of a qualified lower-case name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifiedTail {
    Name,
    Do,
    Ado,
}

/// Raw tokens from Logos lexer (before layout processing).
///
/// Unlike a compiler front end nothing is skipped: whitespace, newlines and
/// comments are tokens too, so the token spans tile the whole input.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum RawToken {
    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    // Newlines (important for layout processing)
    #[token("\n")]
    Newline,

    // Keywords
    #[token("module")]
    Module,
    #[token("import")]
    Import,
    #[token("foreign")]
    Foreign,
    #[token("data")]
    Data,
    #[token("type")]
    Type,
    #[token("newtype")]
    Newtype,
    #[token("class")]
    Class,
    #[token("instance")]
    Instance,
    #[token("derive")]
    Derive,
    #[token("where")]
    Where,
    #[token("let")]
    Let,
    #[token("in")]
    In,
    #[token("do")]
    Do,
    #[token("ado")]
    Ado,
    #[token("case")]
    Case,
    #[token("of")]
    Of,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("forall")]
    Forall,
    #[token("infix")]
    Infix,
    #[token("infixl")]
    Infixl,
    #[token("infixr")]
    Infixr,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Identifiers - lowercase starting (excluding lone underscore)
    // Includes Unicode lowercase letters (\p{Ll}) and other letters (\p{Lo})
    #[regex(r"[a-z\p{Ll}\p{Lo}][a-zA-Z0-9_'\p{L}]*")]
    #[regex(r"_[a-zA-Z0-9_'\p{L}]+")]
    LowerIdent,

    // Identifiers - uppercase starting (types, constructors, modules)
    #[regex(r"[A-Z\p{Lu}][a-zA-Z0-9_'\p{L}]*")]
    UpperIdent,

    // Module-qualified names: Data.Array.head, Data.Maybe.Just, Data.Semigroup.<>
    #[regex(r"([A-Z\p{Lu}][a-zA-Z0-9_'\p{L}]*\.)+[a-z\p{Ll}\p{Lo}_][a-zA-Z0-9_'\p{L}]*", qualified_tail)]
    QualifiedLower(QualifiedTail),
    #[regex(r"([A-Z\p{Lu}][a-zA-Z0-9_'\p{L}]*\.)+[A-Z\p{Lu}][a-zA-Z0-9_'\p{L}]*")]
    QualifiedUpper,
    #[regex(r"([A-Z\p{Lu}][a-zA-Z0-9_'\p{L}]*\.)+[!#$%&*+./<=>?@\\^|~:\p{Sm}\p{So}-]+")]
    QualifiedOperator,

    // Typed holes: ?identifier
    #[regex(r"\?[a-zA-Z][a-zA-Z0-9_']*")]
    Hole,

    // Operator characters, including Unicode math symbols (\p{Sm}) and other
    // symbols (\p{So}). Reserved symbols and `--` comments are told apart in
    // the callback.
    #[regex(r"[!#$%&*+./<=>?@\\^|~:\p{Sm}\p{So}-]+", lex_symbol)]
    Symbol(SymbolClass),

    // Integer literals with _ separators.
    // Note: negative literals are not handled here: `-42` lexes as Operator(-) + Integer(42).
    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0x[0-9a-fA-F][0-9a-fA-F_]*")]
    #[regex(r"0o[0-7][0-7_]*")]
    Integer,

    // Float literals (support _ separators)
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*")]
    Number,

    // String literals, raw strings and their unterminated forms
    #[token("\"", lex_string)]
    Str(StrLex),

    // Character literals (supports \xHH, \uHHHH, and simple escapes)
    #[regex(r"'([^'\\]|\\(x[0-9a-fA-F]+|u[0-9a-fA-F]+|.))'")]
    Char,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("`")]
    Backtick,
    #[token("_")]
    Underscore,

    // Block comments (handled by callback for nesting); the flag records
    // whether the comment was closed
    #[token("{-", lex_block_comment)]
    BlockComment(bool),
}

impl RawToken {
    pub fn kind(self) -> TokenKind {
        match self {
            RawToken::Whitespace => TokenKind::Whitespace,
            RawToken::Newline => TokenKind::Newline,
            RawToken::Module => TokenKind::Module,
            RawToken::Import => TokenKind::Import,
            RawToken::Foreign => TokenKind::Foreign,
            RawToken::Data => TokenKind::Data,
            RawToken::Type => TokenKind::Type,
            RawToken::Newtype => TokenKind::Newtype,
            RawToken::Class => TokenKind::Class,
            RawToken::Instance => TokenKind::Instance,
            RawToken::Derive => TokenKind::Derive,
            RawToken::Where => TokenKind::Where,
            RawToken::Let => TokenKind::Let,
            RawToken::In => TokenKind::In,
            RawToken::Do => TokenKind::Do,
            RawToken::Ado => TokenKind::Ado,
            RawToken::Case => TokenKind::Case,
            RawToken::Of => TokenKind::Of,
            RawToken::If => TokenKind::If,
            RawToken::Then => TokenKind::Then,
            RawToken::Else => TokenKind::Else,
            RawToken::Forall => TokenKind::Forall,
            RawToken::Infix => TokenKind::Infix,
            RawToken::Infixl => TokenKind::Infixl,
            RawToken::Infixr => TokenKind::Infixr,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::LowerIdent => TokenKind::LowerIdent,
            RawToken::UpperIdent => TokenKind::UpperIdent,
            RawToken::QualifiedLower(QualifiedTail::Name) => TokenKind::QualifiedLower,
            RawToken::QualifiedLower(QualifiedTail::Do) => TokenKind::QualifiedDo,
            RawToken::QualifiedLower(QualifiedTail::Ado) => TokenKind::QualifiedAdo,
            RawToken::QualifiedUpper => TokenKind::QualifiedUpper,
            RawToken::QualifiedOperator => TokenKind::QualifiedOperator,
            RawToken::Hole => TokenKind::Hole,
            RawToken::Symbol(class) => match class {
                SymbolClass::Operator => TokenKind::Operator,
                SymbolClass::Arrow => TokenKind::Arrow,
                SymbolClass::FatArrow => TokenKind::FatArrow,
                SymbolClass::DoubleColon => TokenKind::DoubleColon,
                SymbolClass::LeftArrow => TokenKind::LeftArrow,
                SymbolClass::Equals => TokenKind::Equals,
                SymbolClass::Pipe => TokenKind::Pipe,
                SymbolClass::Backslash => TokenKind::Backslash,
                SymbolClass::Dot => TokenKind::Dot,
                SymbolClass::DoubleDot => TokenKind::DoubleDot,
                SymbolClass::At => TokenKind::At,
                SymbolClass::Colon => TokenKind::Colon,
                SymbolClass::Forall => TokenKind::Forall,
                SymbolClass::LineComment => TokenKind::LineComment,
                SymbolClass::DocComment => TokenKind::DocComment,
            },
            RawToken::Integer => TokenKind::Integer,
            RawToken::Number => TokenKind::Number,
            RawToken::Str(StrLex::Terminated) => TokenKind::String,
            RawToken::Str(StrLex::Raw) => TokenKind::RawString,
            RawToken::Str(StrLex::InvalidEscape) => TokenKind::Error(LexErrorKind::InvalidEscape),
            RawToken::Str(StrLex::Unterminated) => {
                TokenKind::Error(LexErrorKind::UnterminatedString)
            }
            RawToken::Str(StrLex::UnterminatedRaw) => {
                TokenKind::Error(LexErrorKind::UnterminatedRawString)
            }
            RawToken::Char => TokenKind::Char,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Backtick => TokenKind::Backtick,
            RawToken::Underscore => TokenKind::Underscore,
            RawToken::BlockComment(true) => TokenKind::BlockComment,
            RawToken::BlockComment(false) => TokenKind::Error(LexErrorKind::UnterminatedComment),
        }
    }
}

fn qualified_tail(lex: &mut logos::Lexer<RawToken>) -> Option<QualifiedTail> {
    let slice = lex.slice();
    let tail = slice.rsplit('.').next().unwrap_or(slice);
    Some(match tail {
        "do" => QualifiedTail::Do,
        "ado" => QualifiedTail::Ado,
        _ => QualifiedTail::Name,
    })
}

/// Classify an operator run. A run made only of two or more dashes starts a
/// line comment, which swallows the rest of the line.
fn lex_symbol(lex: &mut logos::Lexer<RawToken>) -> Option<SymbolClass> {
    let slice = lex.slice();
    if slice.len() >= 2 && slice.bytes().all(|b| b == b'-') {
        let rest = lex.remainder();
        let doc = rest.starts_with(" |");
        let end = rest.find('\n').unwrap_or(rest.len());
        lex.bump(end);
        return Some(if doc {
            SymbolClass::DocComment
        } else {
            SymbolClass::LineComment
        });
    }

    Some(match slice {
        "->" | "→" => SymbolClass::Arrow,
        "=>" | "⇒" => SymbolClass::FatArrow,
        "::" | "∷" => SymbolClass::DoubleColon,
        "<-" | "←" => SymbolClass::LeftArrow,
        "=" => SymbolClass::Equals,
        "|" => SymbolClass::Pipe,
        "\\" => SymbolClass::Backslash,
        "." => SymbolClass::Dot,
        ".." => SymbolClass::DoubleDot,
        "@" => SymbolClass::At,
        ":" => SymbolClass::Colon,
        "∀" => SymbolClass::Forall,
        _ => SymbolClass::Operator,
    })
}

/// Lex a string literal after its opening quote.
///
/// A single-line string stops at the closing quote, or in front of the end
/// of line when unterminated. String gaps (`\` whitespace `\`) may span lines.
/// `"""` opens a raw string that runs until the next `"""`.
fn lex_string(lex: &mut logos::Lexer<RawToken>) -> Option<StrLex> {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();

    if rest.starts_with("\"\"") {
        return match rest[2..].find("\"\"\"") {
            Some(pos) => {
                // Quotes right before the closing delimiter belong to the content
                let mut end = 2 + pos + 3;
                while bytes.get(end) == Some(&b'"') {
                    end += 1;
                }
                lex.bump(end);
                Some(StrLex::Raw)
            }
            None => {
                lex.bump(rest.len());
                Some(StrLex::UnterminatedRaw)
            }
        };
    }

    let mut invalid_escape = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                lex.bump(i + 1);
                return Some(if invalid_escape {
                    StrLex::InvalidEscape
                } else {
                    StrLex::Terminated
                });
            }
            b'\n' => {
                lex.bump(i);
                return Some(StrLex::Unterminated);
            }
            b'\\' => match bytes.get(i + 1) {
                None => i += 1,
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    // String gap: \ whitespace \, skipped
                    let mut j = i + 1;
                    while j < bytes.len() && matches!(bytes[j], b' ' | b'\t' | b'\r' | b'\n') {
                        j += 1;
                    }
                    if bytes.get(j) == Some(&b'\\') {
                        i = j + 1;
                    } else {
                        invalid_escape = true;
                        i += 1;
                    }
                }
                Some(b'n' | b't' | b'r' | b'"' | b'\'' | b'\\' | b'0') => i += 2,
                Some(b'x' | b'u') => {
                    let mut j = i + 2;
                    while j < bytes.len() && bytes[j].is_ascii_hexdigit() {
                        j += 1;
                    }
                    if j == i + 2 {
                        invalid_escape = true;
                    }
                    i = j;
                }
                Some(_) => {
                    invalid_escape = true;
                    i += 1;
                }
            },
            _ => i += 1,
        }
    }

    lex.bump(rest.len());
    Some(StrLex::Unterminated)
}

/// Lex nested block comments
/// PureScript allows nested block comments: {- outer {- inner -} outer -}
fn lex_block_comment(lex: &mut logos::Lexer<RawToken>) -> Option<bool> {
    let remainder = lex.remainder();
    let mut depth = 1;
    let bytes = remainder.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if pos + 1 < bytes.len() {
            match (bytes[pos], bytes[pos + 1]) {
                (b'{', b'-') => {
                    depth += 1;
                    pos += 2;
                    continue;
                }
                (b'-', b'}') => {
                    depth -= 1;
                    pos += 2;
                    if depth == 0 {
                        lex.bump(pos);
                        return Some(true);
                    }
                    continue;
                }
                _ => {}
            }
        }
        pos += 1;
    }

    // Unclosed block comment runs to the end of input
    lex.bump(remainder.len());
    Some(false)
}

/// Lazy tokenizer over a source string.
///
/// Yields every token in source order followed by a single `Eof` token, and
/// never fails: bytes no rule accepts become `TokenKind::Error` tokens.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, RawToken>,
    source_len: usize,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: RawToken::lexer(source),
            source_len: source.len(),
            finished: false,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        if self.finished {
            return None;
        }
        match self.inner.next() {
            Some(result) => {
                let range = self.inner.span();
                let kind = match result {
                    Ok(raw) => raw.kind(),
                    Err(()) => TokenKind::Error(LexErrorKind::UnexpectedCharacter),
                };
                Some(Token::new(
                    kind,
                    Span::new(range.start, range.end),
                    self.inner.slice(),
                ))
            }
            None => {
                self.finished = true;
                Some(Token::virtual_at(TokenKind::Eof, self.source_len))
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Tokenize source code lazily, without layout processing
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .map(|t| t.kind)
            .filter(|k| !matches!(k, TokenKind::Whitespace | TokenKind::Eof))
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("module import where let in do case of"),
            vec![
                TokenKind::Module,
                TokenKind::Import,
                TokenKind::Where,
                TokenKind::Let,
                TokenKind::In,
                TokenKind::Do,
                TokenKind::Case,
                TokenKind::Of,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            kinds("foo Bar myVar MyType _underscore var' as hiding"),
            vec![
                TokenKind::LowerIdent,
                TokenKind::UpperIdent,
                TokenKind::LowerIdent,
                TokenKind::UpperIdent,
                TokenKind::LowerIdent,
                TokenKind::LowerIdent,
                TokenKind::LowerIdent,
                TokenKind::LowerIdent,
            ]
        );
    }

    #[test]
    fn test_qualified_names() {
        assert_eq!(
            kinds("Data.Array.head Data.Maybe.Just M.do M.ado Data.Semigroup.<> Data.Maybe"),
            vec![
                TokenKind::QualifiedLower,
                TokenKind::QualifiedUpper,
                TokenKind::QualifiedDo,
                TokenKind::QualifiedAdo,
                TokenKind::QualifiedOperator,
                TokenKind::QualifiedUpper,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * / == :: -> => <- = | \\ . .. @ : <> →"),
            vec![
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::DoubleColon,
                TokenKind::Arrow,
                TokenKind::FatArrow,
                TokenKind::LeftArrow,
                TokenKind::Equals,
                TokenKind::Pipe,
                TokenKind::Backslash,
                TokenKind::Dot,
                TokenKind::DoubleDot,
                TokenKind::At,
                TokenKind::Colon,
                TokenKind::Operator,
                TokenKind::Arrow,
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"42 3.14 0xFF 1_000 "hello" 'c' true false ?hole"#),
            vec![
                TokenKind::Integer,
                TokenKind::Number,
                TokenKind::Integer,
                TokenKind::Integer,
                TokenKind::String,
                TokenKind::Char,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Hole,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let source = "-- line comment\n{- block comment -} foo";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::LineComment,
                TokenKind::Newline,
                TokenKind::BlockComment,
                TokenKind::LowerIdent,
            ]
        );
    }

    #[test]
    fn test_doc_comment_and_dash_operator() {
        assert_eq!(
            kinds("-- | docs\na --> b"),
            vec![
                TokenKind::DocComment,
                TokenKind::Newline,
                TokenKind::LowerIdent,
                TokenKind::Operator,
                TokenKind::LowerIdent,
            ]
        );
    }

    #[test]
    fn test_nested_block_comments() {
        let source = "{- outer {- inner -} still outer -} foo";
        let tokens: Vec<_> = tokenize(source).collect();
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert!(tokens[0].text.contains("inner"));
        assert!(tokens[0].text.ends_with("outer -}"));
        assert_eq!(tokens[2].kind, TokenKind::LowerIdent);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens: Vec<_> = tokenize("foo {- never {- closed -}").collect();
        let last = tokens[tokens.len() - 2];
        assert_eq!(last.kind, TokenKind::Error(LexErrorKind::UnterminatedComment));
        assert_eq!(last.span.end, 25);
        assert_eq!(tokens[tokens.len() - 1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_unterminated_string_stops_at_end_of_line() {
        let tokens: Vec<_> = tokenize("x = \"abc\ny").collect();
        let err = tokens
            .iter()
            .find(|t| t.kind.is_error())
            .expect("error token");
        assert_eq!(err.kind, TokenKind::Error(LexErrorKind::UnterminatedString));
        assert_eq!(err.text, "\"abc");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::LowerIdent && t.text == "y"));
    }

    #[test]
    fn test_string_escapes_and_gaps() {
        assert_eq!(kinds(r#""a\n\"b\x41""#), vec![TokenKind::String]);
        assert_eq!(kinds("\"gap \\\n   \\ continues\""), vec![TokenKind::String]);
        assert_eq!(
            kinds(r#""bad \q escape""#),
            vec![TokenKind::Error(LexErrorKind::InvalidEscape)]
        );
    }

    #[test]
    fn test_raw_strings() {
        let tokens: Vec<_> = tokenize("\"\"\"raw \"quoted\"\nline\"\"\" x").collect();
        assert_eq!(tokens[0].kind, TokenKind::RawString);
        assert_eq!(tokens[0].text, "\"\"\"raw \"quoted\"\nline\"\"\"");
        assert_eq!(
            kinds("\"\"\"never closed"),
            vec![TokenKind::Error(LexErrorKind::UnterminatedRawString)]
        );
        assert_eq!(kinds("\"\""), vec![TokenKind::String]);
    }

    #[test]
    fn test_unexpected_character() {
        let tokens: Vec<_> = tokenize("a \u{0} b").collect();
        assert_eq!(tokens[2].kind, TokenKind::Error(LexErrorKind::UnexpectedCharacter));
        assert_eq!(tokens[2].text, "\u{0}");
    }

    #[test]
    fn test_eof_is_last() {
        let tokens: Vec<_> = tokenize("x").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
        assert_eq!(tokens[1].span, Span::new(1, 1));
    }

    /// Spans must tile the input: no gaps, no overlaps.
    #[test]
    fn test_no_dropped_characters() {
        let source = r#"
module Test.Example where

import Prelude
import Data.Maybe (Maybe(..))

-- | Documentation comment
factorial :: Int -> Int
factorial 0 = 1
factorial n = n * factorial (n - 1)

{- Multi-line
   comment -}
main = do
  let x = 42
  log $ show $ factorial x
"#;
        let mut last_end = 0;
        let mut rebuilt = String::new();
        for token in tokenize(source) {
            assert_eq!(token.span.start, last_end, "gap before {:?}", token);
            assert_eq!(&source[token.span.start..token.span.end], token.text);
            rebuilt.push_str(token.text);
            last_end = token.span.end;
        }
        assert_eq!(rebuilt, source);
    }

    // Property-based fuzz testing
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        // Generator for valid PureScript identifiers
        fn arb_lower_ident() -> impl Strategy<Value = String> {
            prop::string::string_regex("[a-z][a-zA-Z0-9_']*").unwrap()
        }

        proptest! {
            #[test]
            fn prop_lex_identifiers_roundtrip(ident in arb_lower_ident()) {
                let text: String = tokenize(&ident).map(|t| t.text).collect();
                prop_assert_eq!(text, ident);
            }

            #[test]
            fn prop_tokens_tile_any_input(source in any::<String>()) {
                let mut last_end = 0;
                for token in tokenize(&source) {
                    prop_assert_eq!(token.span.start, last_end);
                    prop_assert!(token.span.end <= source.len());
                    last_end = token.span.end;
                }
                prop_assert_eq!(last_end, source.len());
            }
        }
    }
}
