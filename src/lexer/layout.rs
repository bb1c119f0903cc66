use std::collections::VecDeque;

use crate::diagnostics::LayoutErrorKind;
use crate::lexer::token::{Token, TokenKind};

/// Layout block types, named after the keyword that opens them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Where,
    Let,
    Do,
    Ado,
    Of,
}

impl BlockKind {
    fn for_keyword(kind: TokenKind) -> Option<BlockKind> {
        match kind {
            TokenKind::Where => Some(BlockKind::Where),
            TokenKind::Let => Some(BlockKind::Let),
            TokenKind::Do | TokenKind::QualifiedDo => Some(BlockKind::Do),
            TokenKind::Ado | TokenKind::QualifiedAdo => Some(BlockKind::Ado),
            TokenKind::Of => Some(BlockKind::Of),
            _ => None,
        }
    }
}

/// Stack entry: the root context, an implicit layout block, an explicit
/// delimiter, or an `if`/`then` awaiting its partner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Root(usize),
    Block(BlockKind, usize), // (kind, reference_column)
    Explicit,                // For ( [ {
    If,
    Then,
}

fn is_closer(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)
}

fn is_opener(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
}

/// Process layout: insert virtual block tokens into an indentation-sensitive
/// token stream.
///
/// Algorithm:
/// - The first real token fixes the root column. Lines starting there get a
///   separator; the root never opens or closes.
/// - After a layout keyword (where/let/do/of/ado), the next token establishes
///   the reference column for that block and a virtual start is emitted.
/// - Subsequent lines starting at the same column get a separator.
/// - Lines starting at a lesser column close the block with a virtual end.
/// - Lines starting at a greater column are continuations (no action).
/// - `in` closes blocks up to the nearest `let`/`ado` block.
/// - Closing delimiters ) ] } close all implicit layout blocks until the
///   matching opener, and `,` closes those above the nearest opener.
///
/// Virtual tokens are zero-width and sit at the start of the token they
/// precede, after any trivia. Trivia is passed through untouched.
pub struct LayoutResolver<'src, I> {
    tokens: I,
    queue: VecDeque<Token<'src>>,
    stack: Vec<Frame>,
    pending: Option<BlockKind>,
    column: usize,
    line_start: bool,
    starts_with_module: bool,
    tab_width: usize,
    last_offset: usize,
    done: bool,
}

/// Resolve layout with the default tab width of 8.
pub fn resolve<'src, I>(tokens: I) -> LayoutResolver<'src, I::IntoIter>
where
    I: IntoIterator<Item = Token<'src>>,
{
    LayoutResolver::new(tokens.into_iter(), 8)
}

impl<'src, I> LayoutResolver<'src, I>
where
    I: Iterator<Item = Token<'src>>,
{
    pub fn new(tokens: I, tab_width: usize) -> Self {
        Self {
            tokens,
            queue: VecDeque::new(),
            stack: Vec::new(),
            pending: None,
            column: 0,
            line_start: true,
            starts_with_module: false,
            tab_width: tab_width.max(1),
            last_offset: 0,
            done: false,
        }
    }

    fn emit(&mut self, kind: TokenKind, offset: usize) {
        self.queue.push_back(Token::virtual_at(kind, offset));
    }

    /// Move the column past `text`, expanding tabs.
    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => {
                    self.column = 0;
                    self.line_start = true;
                }
                '\t' => self.column = (self.column / self.tab_width + 1) * self.tab_width,
                _ => self.column += 1,
            }
        }
    }

    fn step(&mut self, token: Token<'src>) {
        self.last_offset = token.span.end;
        let kind = token.kind;

        if kind.is_insignificant() {
            self.advance(token.text);
            self.queue.push_back(token);
            return;
        }
        if kind == TokenKind::Eof {
            self.finish(token);
            return;
        }

        let col = self.column;
        let at = token.span.start;

        if self.stack.is_empty() {
            self.stack.push(Frame::Root(col));
            self.starts_with_module = kind == TokenKind::Module;
        } else {
            let opened = match self.pending.take() {
                Some(block) => self.open_block(block, col, at),
                None => false,
            };
            self.before_token(kind, col, at, opened);
        }

        self.queue.push_back(token);
        self.advance(token.text);
        self.line_start = false;

        if let Some(block) = BlockKind::for_keyword(kind) {
            self.pending = Some(block);
        } else if is_opener(kind) {
            self.stack.push(Frame::Explicit);
        } else if kind == TokenKind::If {
            self.stack.push(Frame::If);
        }
    }

    /// Virtual tokens owed before a significant token.
    fn before_token(&mut self, kind: TokenKind, col: usize, at: usize, opened: bool) {
        match kind {
            k if is_closer(k) && self.find_explicit().is_some() => self.close_explicit(at),
            TokenKind::Comma if self.find_explicit().is_some() => self.pop_above_explicit(at),
            TokenKind::In => match self.find_let() {
                Some(index) => self.pop_to(index, at),
                None if self.line_start && !opened => self.offside(kind, col, at),
                None => {}
            },
            TokenKind::Then => match self.find_keyword(Frame::If) {
                Some(index) => {
                    self.pop_to(index + 1, at);
                    self.stack[index] = Frame::Then;
                }
                None if self.line_start && !opened => self.offside(kind, col, at),
                None => {}
            },
            TokenKind::Else => match self.find_keyword(Frame::Then) {
                Some(index) => self.pop_to(index, at),
                None if self.line_start && !opened => self.offside(kind, col, at),
                None => {}
            },
            TokenKind::Where => self.collapse_where(col, at),
            _ if self.line_start && !opened => self.offside(kind, col, at),
            _ => {}
        }
    }

    /// Open the block a layout keyword asked for. Returns false when the
    /// block had to be emitted empty because it does not indent past its
    /// enclosing block.
    fn open_block(&mut self, block: BlockKind, col: usize, at: usize) -> bool {
        let valid = match self.enclosing_column(self.stack.len()) {
            None => true,
            Some((enclosing, is_root)) => {
                col > enclosing
                    || (is_root
                        && block == BlockKind::Where
                        && self.starts_with_module
                        && self.stack.len() == 1
                        && col >= enclosing)
            }
        };
        self.emit(TokenKind::LayoutStart, at);
        if valid {
            self.stack.push(Frame::Block(block, col));
        } else {
            self.emit(TokenKind::LayoutEnd, at);
        }
        valid
    }

    /// Column of the nearest implicit context below `below`, skipping
    /// keyword frames. `None` inside explicit delimiters.
    fn enclosing_column(&self, below: usize) -> Option<(usize, bool)> {
        for frame in self.stack[..below].iter().rev() {
            match frame {
                Frame::Root(col) => return Some((*col, true)),
                Frame::Block(_, col) => return Some((*col, false)),
                Frame::Explicit => return None,
                Frame::If | Frame::Then => {}
            }
        }
        None
    }

    fn find_explicit(&self) -> Option<usize> {
        self.stack.iter().rposition(|f| *f == Frame::Explicit)
    }

    fn find_let(&self) -> Option<usize> {
        for (index, frame) in self.stack.iter().enumerate().rev() {
            match frame {
                Frame::Block(BlockKind::Let | BlockKind::Ado, _) => return Some(index),
                Frame::Explicit | Frame::Root(_) => return None,
                _ => {}
            }
        }
        None
    }

    fn find_keyword(&self, wanted: Frame) -> Option<usize> {
        for (index, frame) in self.stack.iter().enumerate().rev() {
            match frame {
                f if *f == wanted => return Some(index),
                Frame::Explicit | Frame::Root(_) => return None,
                _ => {}
            }
        }
        None
    }

    /// Pop every frame at `index` and above, closing blocks.
    fn pop_to(&mut self, index: usize, at: usize) {
        while self.stack.len() > index {
            if let Some(Frame::Block(..)) = self.stack.pop() {
                self.emit(TokenKind::LayoutEnd, at);
            }
        }
    }

    fn close_explicit(&mut self, at: usize) {
        if let Some(index) = self.find_explicit() {
            self.pop_to(index, at);
        }
    }

    fn pop_above_explicit(&mut self, at: usize) {
        if let Some(index) = self.find_explicit() {
            self.pop_to(index + 1, at);
        }
    }

    /// `where` ends do/ado blocks, and any block it does not indent past.
    fn collapse_where(&mut self, col: usize, at: usize) {
        while let Some(&frame) = self.stack.last() {
            match frame {
                Frame::Block(BlockKind::Do | BlockKind::Ado, _) => {}
                Frame::Block(_, block_col) if col <= block_col => {}
                Frame::If | Frame::Then => {}
                _ => break,
            }
            self.stack.pop();
            if let Frame::Block(..) = frame {
                self.emit(TokenKind::LayoutEnd, at);
            }
        }
    }

    /// The offside rule for the first token of a line.
    fn offside(&mut self, kind: TokenKind, col: usize, at: usize) {
        let mut popped = false;
        while let Some(&frame) = self.stack.last() {
            match frame {
                Frame::If | Frame::Then => match self.enclosing_column(self.stack.len() - 1) {
                    Some((enclosing, _)) if col <= enclosing => {
                        self.stack.pop();
                    }
                    _ => break,
                },
                Frame::Explicit => {
                    let unclosed = match self.enclosing_column(self.stack.len() - 1) {
                        Some((enclosing, is_root)) => {
                            col < enclosing || (is_root && col == enclosing && !is_closer(kind))
                        }
                        None => false,
                    };
                    if !unclosed {
                        break;
                    }
                    self.stack.pop();
                    self.emit(
                        TokenKind::LayoutError(LayoutErrorKind::UnclosedDelimiter),
                        at,
                    );
                }
                Frame::Block(_, block_col) => {
                    if col == block_col {
                        self.emit(TokenKind::LayoutSep, at);
                        break;
                    }
                    if col < block_col {
                        self.stack.pop();
                        self.emit(TokenKind::LayoutEnd, at);
                        popped = true;
                        continue;
                    }
                    if popped {
                        self.emit(TokenKind::LayoutError(LayoutErrorKind::Misaligned), at);
                    }
                    break;
                }
                Frame::Root(root_col) => {
                    if col < root_col {
                        self.emit(TokenKind::LayoutError(LayoutErrorKind::LeftOfRoot), at);
                        self.emit(TokenKind::LayoutSep, at);
                    } else if col == root_col {
                        self.emit(TokenKind::LayoutSep, at);
                    } else if popped {
                        self.emit(TokenKind::LayoutError(LayoutErrorKind::Misaligned), at);
                    }
                    break;
                }
            }
        }
    }

    /// EOF: close a pending block and every open block, then emit `eof`.
    fn finish(&mut self, eof: Token<'src>) {
        let at = eof.span.start;
        if self.pending.take().is_some() {
            self.emit(TokenKind::LayoutStart, at);
            self.emit(TokenKind::LayoutEnd, at);
        }
        self.pop_to(0, at);
        self.queue.push_back(eof);
        self.done = true;
    }
}

impl<'src, I> Iterator for LayoutResolver<'src, I>
where
    I: Iterator<Item = Token<'src>>,
{
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if self.done {
                return None;
            }
            match self.tokens.next() {
                Some(token) => self.step(token),
                None => {
                    let offset = self.last_offset;
                    self.finish(Token::virtual_at(TokenKind::Eof, offset));
                }
            }
        }
    }
}
