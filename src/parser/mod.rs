//! Error-tolerant recursive descent parser over the layout-annotated token
//! stream.
//!
//! The parser never fails: malformed input becomes `Error` nodes in the tree
//! and parsing resumes at the next synchronization point. Productions are
//! split by area: module structure, declarations, expressions, binders and
//! types.

mod binder;
mod cancel;
mod decl;
mod expr;
mod marker;
mod module;
mod types;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

use crate::cst::builder::{self, Event};
use crate::cst::SyntaxNode;
use crate::diagnostics::{Cancelled, ErrorKind, ErrorNode, Found, LexErrorKind};
use crate::fixity::{scan_fixities, Fixity, Namespace, OperatorTable};
use crate::lexer::{tokenize, LayoutResolver, Token, TokenKind};
use crate::span::Span;

pub use cancel::{CancelCheck, CancelFn, Deadline};
pub(crate) use marker::{CompletedMarker, Marker};

/// Nesting depth at which the parser stops descending and reports an error.
const MAX_DEPTH: usize = 100;

/// Parser configuration
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Collect every fixity declaration of the file before parsing
    /// expressions, so operators declared below their use resolve correctly.
    pub collect_fixities_first: bool,
    /// Report operators with no known fixity as `OperatorAmbiguity`.
    pub report_unknown_operators: bool,
    /// Column width of a tab character for layout.
    pub tab_width: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            collect_fixities_first: true,
            report_unknown_operators: false,
            tab_width: 8,
        }
    }
}

/// Result of parsing a source file.
#[derive(Debug, Clone)]
pub struct Parse {
    pub root: SyntaxNode,
    /// The seed table extended with the file's own fixity declarations
    pub operators: OperatorTable,
    /// Every error node of the tree, in source order
    pub errors: Vec<ErrorNode>,
}

impl Parse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse PureScript source code into a CST, with the standard fixities.
pub fn parse(source: &str) -> Parse {
    let (parse, _) = run(source, &ParseOptions::default(), OperatorTable::standard(), None);
    parse
}

/// A configured parser: options, seed fixities and cancellation.
#[derive(Default)]
pub struct ModuleParser<'a> {
    options: ParseOptions,
    operators: Option<&'a OperatorTable>,
    cancel: Option<&'a dyn CancelCheck>,
}

impl<'a> ModuleParser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Seed table; defaults to the standard fixities.
    pub fn operators(mut self, operators: &'a OperatorTable) -> Self {
        self.operators = Some(operators);
        self
    }

    pub fn cancel(mut self, cancel: &'a dyn CancelCheck) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn parse_options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a file. The partial tree of a cancelled parse is discarded.
    pub fn parse(&self, source: &str) -> Result<Parse, Cancelled> {
        let seed = self.operators.unwrap_or_else(|| OperatorTable::standard());
        match run(source, &self.options, seed, self.cancel) {
            (_, true) => Err(Cancelled),
            (parse, false) => Ok(parse),
        }
    }
}

fn run(
    source: &str,
    options: &ParseOptions,
    seed: &OperatorTable,
    cancel: Option<&dyn CancelCheck>,
) -> (Parse, bool) {
    let pipeline_start = Instant::now();

    // Step 1: Lex and resolve layout
    let phase_start = Instant::now();
    let tokens: Vec<Token<'_>> =
        LayoutResolver::new(tokenize(source), options.tab_width).collect();
    log::debug!(
        "lexed {} tokens ({} bytes) in {:.2?}",
        tokens.len(),
        source.len(),
        phase_start.elapsed()
    );

    // Step 2: Fixities declared anywhere in the file
    let mut operators = seed.clone();
    if options.collect_fixities_first {
        let phase_start = Instant::now();
        let mut seen = HashSet::new();
        let declared = scan_fixities(&tokens);
        for decl in &declared {
            if seen.insert((decl.namespace, decl.operator.clone())) {
                operators.insert(decl.namespace, decl.operator.clone(), decl.fixity);
            }
        }
        log::debug!(
            "collected {} fixity declarations in {:.2?}",
            declared.len(),
            phase_start.elapsed()
        );
    }

    // Step 3: Parse into events
    let phase_start = Instant::now();
    let mut parser = Parser::new(&tokens, source.len(), operators, options, cancel);
    parser.parse_module();
    let cancelled = parser.cancelled;
    let Parser {
        events, operators, ..
    } = parser;
    log::debug!(
        "parsed {} events in {:.2?}{}",
        events.len(),
        phase_start.elapsed(),
        if cancelled { " (cancelled)" } else { "" }
    );

    // Step 4: Build the tree
    let phase_start = Instant::now();
    let root = builder::build(&tokens, events);
    let errors: Vec<ErrorNode> = root.errors().into_iter().cloned().collect();
    log::debug!(
        "built tree with {} errors in {:.2?}",
        errors.len(),
        phase_start.elapsed()
    );
    log::debug!("parse finished in {:.2?}", pipeline_start.elapsed());

    (
        Parse {
            root,
            operators,
            errors,
        },
        cancelled,
    )
}

/// The parser.
pub(crate) struct Parser<'t, 'src> {
    tokens: &'t [Token<'src>],
    /// Indices of the tokens the grammar sees, ending with `eof`
    significant: Vec<usize>,
    /// Position in `significant`
    cursor: usize,
    /// Next token of `tokens` not yet attached to the tree
    pos: usize,
    /// End offset of the last token attached to the tree
    consumed_end: usize,
    source_len: usize,
    pub(crate) events: Vec<Event>,
    pub(crate) operators: OperatorTable,
    /// Fixities declared so far in this file, for conflict detection
    declared: HashMap<(Namespace, String), Fixity>,
    options: &'t ParseOptions,
    cancel: Option<&'t dyn CancelCheck>,
    open_delims: usize,
    depth: usize,
    last_syntax_error: Option<usize>,
    pub(crate) cancelled: bool,
}

impl<'t, 'src> Parser<'t, 'src> {
    pub(crate) fn new(
        tokens: &'t [Token<'src>],
        source_len: usize,
        operators: OperatorTable,
        options: &'t ParseOptions,
        cancel: Option<&'t dyn CancelCheck>,
    ) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_insignificant() && !matches!(t.kind, TokenKind::LayoutError(_)))
            .map(|(i, _)| i)
            .collect();
        Self {
            tokens,
            significant,
            cursor: 0,
            pos: 0,
            consumed_end: 0,
            source_len,
            events: Vec::new(),
            operators,
            declared: HashMap::new(),
            options,
            cancel,
            open_delims: 0,
            depth: 0,
            last_syntax_error: None,
            cancelled: false,
        }
    }

    // ---- Token navigation ----

    pub(crate) fn nth(&self, n: usize) -> Token<'src> {
        self.significant
            .get(self.cursor + n)
            .and_then(|&i| self.tokens.get(i))
            .copied()
            .unwrap_or_else(|| Token::virtual_at(TokenKind::Eof, self.source_len))
    }

    pub(crate) fn current(&self) -> Token<'src> {
        self.nth(0)
    }

    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn nth_kind(&self, n: usize) -> TokenKind {
        self.nth(n).kind
    }

    // ---- Matching helpers ----

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind())
    }

    /// A contextual keyword such as `as` or `hiding`
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.nth_is_contextual(0, word)
    }

    pub(crate) fn nth_is_contextual(&self, n: usize, word: &str) -> bool {
        let token = self.nth(n);
        token.kind == TokenKind::LowerIdent && token.text == word
    }

    /// An operator token with exactly this text
    pub(crate) fn at_operator(&self, text: &str) -> bool {
        let token = self.current();
        token.kind == TokenKind::Operator && token.text == text
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Attach pending trivia to the currently open node. Layout error markers
    /// and unclosed comments become error nodes on the way.
    fn eat_trivia(&mut self) {
        let target = self
            .significant
            .get(self.cursor)
            .copied()
            .unwrap_or(self.tokens.len());
        while self.pos < target {
            let token = self.tokens[self.pos];
            let error = match token.kind {
                TokenKind::LayoutError(kind) => Some(ErrorKind::Layout(kind)),
                TokenKind::Error(kind) => Some(ErrorKind::Lex(kind)),
                _ => None,
            };
            match error {
                Some(kind) => {
                    let found = match kind {
                        ErrorKind::Lex(_) => Found::Eof,
                        _ => self.found(),
                    };
                    let m = self.start_raw();
                    self.push_token();
                    let recovery = self.current().span.start;
                    m.complete_error(
                        self,
                        ErrorNode {
                            kind,
                            expected: BTreeSet::new(),
                            found,
                            span: token.span,
                            recovery,
                        },
                    );
                }
                None => self.push_token(),
            }
        }
    }

    fn push_token(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.consumed_end = token.span.end;
        }
        self.pos += 1;
        self.events.push(Event::Token);
    }

    /// Consume the current token (and the trivia before it).
    pub(crate) fn bump(&mut self) {
        self.eat_trivia();
        let Some(&index) = self.significant.get(self.cursor) else {
            return;
        };
        match self.tokens[index].kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => self.open_delims += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                self.open_delims = self.open_delims.saturating_sub(1)
            }
            _ => {}
        }
        self.push_token();
        self.cursor += 1;
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_contextual(&mut self, word: &str) -> bool {
        if self.at_contextual(word) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or leave an empty error node in its place.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(&[kind]);
            false
        }
    }

    // ---- Node markers ----

    /// Open a node at the current token. Pending trivia goes to the parent.
    pub(crate) fn start(&mut self) -> Marker {
        self.eat_trivia();
        self.start_raw()
    }

    pub(crate) fn start_raw(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Tombstone);
        Marker::new(pos)
    }

    // ---- Error handling ----

    /// What the parser is looking at, for diagnostics
    pub(crate) fn found(&self) -> Found {
        let token = self.current();
        match token.kind {
            TokenKind::Eof => Found::Eof,
            TokenKind::Error(kind) if unterminated(kind) && token.span.end >= self.source_len => {
                Found::Eof
            }
            kind => Found::Token {
                kind,
                text: token.text.to_string(),
            },
        }
    }

    fn error_node(&self, kind: ErrorKind, expected: &[TokenKind]) -> ErrorNode {
        ErrorNode {
            kind,
            expected: expected.iter().copied().collect(),
            found: self.found(),
            span: Span::empty(self.consumed_end),
            recovery: self.current().span.start,
        }
    }

    /// An empty syntax error node: something expected is missing.
    pub(crate) fn error(&mut self, expected: &[TokenKind]) {
        self.error_kind(ErrorKind::Syntax, expected);
    }

    pub(crate) fn error_kind(&mut self, kind: ErrorKind, expected: &[TokenKind]) {
        // One missing-token report per position
        if kind == ErrorKind::Syntax && self.last_syntax_error == Some(self.consumed_end) {
            return;
        }
        if kind == ErrorKind::Syntax {
            self.last_syntax_error = Some(self.consumed_end);
        }
        let error = self.error_node(kind, expected);
        let m = self.start_raw();
        m.complete_error(self, error);
    }

    /// Wrap the current token in an error node, e.g. a token that cannot
    /// start the production at hand.
    pub(crate) fn error_bump(&mut self, expected: &[TokenKind]) {
        let kind = match self.kind() {
            TokenKind::Error(lex) => ErrorKind::Lex(lex),
            _ => ErrorKind::Syntax,
        };
        let mut error = self.error_node(kind, expected);
        let m = self.start();
        self.bump();
        error.recovery = self.current().span.start;
        m.complete_error(self, error);
    }

    /// Wrap the current token in an error node of the given kind.
    pub(crate) fn bump_error(&mut self, kind: ErrorKind) {
        let mut error = self.error_node(kind, &[]);
        let m = self.start();
        self.bump();
        error.recovery = self.current().span.start;
        m.complete_error(self, error);
    }

    /// Consume a closing delimiter, skipping anything in front of it.
    pub(crate) fn expect_closing(&mut self, closer: TokenKind) {
        if self.eat(closer) {
            return;
        }
        self.recover(&[closer], &[closer]);
        self.eat(closer);
    }

    /// A token that ends the current construct during recovery
    fn at_sync(&self, stops: &[TokenKind]) -> bool {
        let kind = self.kind();
        matches!(
            kind,
            TokenKind::Eof | TokenKind::LayoutSep | TokenKind::LayoutEnd
        ) || kind.starts_top_level_decl()
            || stops.contains(&kind)
            || (is_closer(kind) && self.open_delims > 0)
    }

    /// Report an error and skip to a synchronization token: a layout
    /// separator or block end at the current depth, a top-level declaration
    /// keyword, a closing delimiter of an enclosing bracket, one of `stops`,
    /// or end of input. The skipped tokens become the error node.
    pub(crate) fn recover(&mut self, expected: &[TokenKind], stops: &[TokenKind]) {
        if self.at_sync(stops) {
            self.error(expected);
            return;
        }
        let kind = match self.kind() {
            TokenKind::Error(lex) => ErrorKind::Lex(lex),
            _ => ErrorKind::Syntax,
        };
        let mut error = self.error_node(kind, expected);
        let m = self.start();

        let mut layout_depth = 0usize;
        let mut bracket_depth = 0usize;
        loop {
            let kind = self.kind();
            if kind == TokenKind::Eof {
                break;
            }
            if layout_depth == 0 && bracket_depth == 0 {
                if matches!(kind, TokenKind::LayoutSep | TokenKind::LayoutEnd)
                    || kind.starts_top_level_decl()
                    || stops.contains(&kind)
                {
                    break;
                }
            }
            if bracket_depth == 0 && is_closer(kind) && self.open_delims > 0 {
                break;
            }
            match kind {
                TokenKind::LayoutStart => layout_depth += 1,
                TokenKind::LayoutEnd => layout_depth = layout_depth.saturating_sub(1),
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => bracket_depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    bracket_depth = bracket_depth.saturating_sub(1)
                }
                _ => {}
            }
            self.bump();
        }

        error.recovery = self.current().span.start;
        m.complete_error(self, error);
    }

    /// Scan ahead, at bracket and block depth 0, for a token matching
    /// `wanted` before the current item ends or one of `stops` appears.
    pub(crate) fn scan_for(&self, wanted: impl Fn(Token<'src>) -> bool, stops: &[TokenKind]) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            let token = self.nth(n);
            match token.kind {
                TokenKind::Eof => return false,
                _ if depth == 0 && wanted(token) => return true,
                TokenKind::LayoutSep | TokenKind::LayoutEnd if depth == 0 => return false,
                kind if depth == 0 && stops.contains(&kind) => return false,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace | TokenKind::LayoutStart => {
                    depth += 1
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::LayoutEnd => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            n += 1;
        }
    }

    // ---- Blocks ----

    /// A layout block `{ item ; item ... }` that may be empty, like a class
    /// or instance body.
    pub(crate) fn parse_block(&mut self, item: fn(&mut Self)) {
        self.parse_block_items(item, None);
    }

    /// A layout block that needs at least one item. An empty one is an
    /// error expecting `first`.
    pub(crate) fn parse_nonempty_block(&mut self, item: fn(&mut Self), first: &[TokenKind]) {
        self.parse_block_items(item, Some(first));
    }

    /// Every round consumes at least one token, so a stuck item cannot loop.
    fn parse_block_items(&mut self, item: fn(&mut Self), required: Option<&[TokenKind]>) {
        if !self.expect(TokenKind::LayoutStart) {
            return;
        }
        let mut empty = true;
        loop {
            match self.kind() {
                TokenKind::LayoutEnd | TokenKind::Eof => {
                    if let (true, Some(first)) = (empty, required) {
                        self.error(first);
                    }
                    if !self.eat(TokenKind::LayoutEnd) {
                        self.error(&[TokenKind::LayoutEnd]);
                    }
                    break;
                }
                TokenKind::LayoutSep => {
                    self.bump();
                    continue;
                }
                _ => {}
            }
            let before = self.cursor;
            item(self);
            empty = false;
            if self.cursor == before {
                self.error_bump(&[]);
            }
            if !matches!(
                self.kind(),
                TokenKind::LayoutSep | TokenKind::LayoutEnd | TokenKind::Eof
            ) {
                self.recover(&[TokenKind::LayoutSep, TokenKind::LayoutEnd], &[]);
            }
        }
    }

    // ---- Recursion guard ----

    /// Enter a nested production. Returns false, after reporting and skipping
    /// the rest of the construct, when nesting is too deep.
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            self.recover(&[], &[]);
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Top-level declarations never sit inside brackets; forget any left
    /// open by the previous one.
    pub(crate) fn reset_delims(&mut self) {
        self.open_delims = 0;
    }

    // ---- Cancellation ----

    pub(crate) fn check_cancelled(&mut self) -> bool {
        if !self.cancelled && self.cancel.is_some_and(|c| c.is_cancelled()) {
            log::debug!("parse cancelled at offset {}", self.current().span.start);
            self.cancelled = true;
        }
        self.cancelled
    }

    // ---- Fixities ----

    pub(crate) fn options(&self) -> &ParseOptions {
        self.options
    }

    /// Record a fixity declaration met during parsing. Returns the earlier
    /// declaration when it disagrees.
    pub(crate) fn declare_fixity(&mut self, ns: Namespace, op: &str, fixity: Fixity) -> Option<Fixity> {
        match self.declared.get(&(ns, op.to_string())) {
            Some(previous) if *previous != fixity => return Some(*previous),
            Some(_) => return None,
            None => {}
        }
        self.declared.insert((ns, op.to_string()), fixity);
        if !self.options.collect_fixities_first {
            self.operators.insert(ns, op, fixity);
        }
        None
    }

    /// Lexical error token in an operand position: wrap it and carry on.
    pub(crate) fn lex_error_atom(&mut self) -> Option<CompletedMarker> {
        let TokenKind::Error(lex) = self.kind() else {
            return None;
        };
        let mut error = self.error_node(ErrorKind::Lex(lex), &[]);
        let m = self.start();
        self.bump();
        error.recovery = self.current().span.start;
        Some(m.complete_error(self, error))
    }
}

pub(crate) fn is_closer(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)
}

/// True for kinds that can label a record field: identifiers, keywords and strings
pub(crate) fn is_label(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LowerIdent | TokenKind::String | TokenKind::RawString
    ) || kind.is_keyword()
}

fn unterminated(kind: LexErrorKind) -> bool {
    matches!(
        kind,
        LexErrorKind::UnterminatedString
            | LexErrorKind::UnterminatedRawString
            | LexErrorKind::UnterminatedComment
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::NodeKind;

    fn kinds(source: &str) -> Vec<NodeKind> {
        parse(source).root.descendants().map(|n| n.kind()).collect()
    }

    #[test]
    fn test_empty_source() {
        let result = parse("");
        assert_eq!(result.root.kind(), NodeKind::Module);
        assert!(result.errors.is_empty());
        assert_eq!(result.root.text(), "");
    }

    #[test]
    fn test_parse_simple_decl() {
        let result = parse("x = 42");
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(
            kinds("x = 42"),
            vec![
                NodeKind::Module,
                NodeKind::ValueDecl,
                NodeKind::UnguardedRhs,
                NodeKind::ExprLiteral
            ]
        );
    }

    #[test]
    fn test_unterminated_string_found_eof() {
        let result = parse("x = \"abc");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].kind,
            ErrorKind::Lex(LexErrorKind::UnterminatedString)
        );
        assert_eq!(result.errors[0].found, Found::Eof);
    }

    #[test]
    fn test_cancelled_parse() {
        let parser = ModuleParser::new();
        let cancel = CancelFn(|| true);
        let parser = parser.cancel(&cancel);
        assert_eq!(parser.parse("x = 1\ny = 2").unwrap_err(), Cancelled);
    }

    #[test]
    fn test_fixities_collected_before_use() {
        let source = "x = 1 +++ 2 *** 3\ninfixl 6 add as +++\ninfixl 7 mul as ***";
        let result = parse(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let binary = result
            .root
            .descendants()
            .find(|n| n.kind() == NodeKind::ExprBinary)
            .unwrap();
        // 1 +++ (2 *** 3)
        let rhs = binary.child_nodes().last().unwrap();
        assert_eq!(rhs.kind(), NodeKind::ExprBinary);
        assert_eq!(rhs.text(), "2 *** 3");
    }

    #[test]
    fn test_fixities_in_order_when_not_collected() {
        let source = "x = 1 +++ 2 *** 3\ninfixl 6 add as +++\ninfixl 7 mul as ***";
        let options = ParseOptions {
            collect_fixities_first: false,
            ..ParseOptions::default()
        };
        let result = ModuleParser::new().options(options).parse(source).unwrap();
        // Both default to infixl 9: (1 +++ 2) *** 3
        let binary = result
            .root
            .descendants()
            .find(|n| n.kind() == NodeKind::ExprBinary)
            .unwrap();
        assert_eq!(binary.child_nodes().next().unwrap().text(), "1 +++ 2");
        assert!(result.operators.get(Namespace::Value, "***").is_some());
    }
}
