//! Concrete Syntax Tree (CST) for PureScript
//!
//! Unlike an AST, the CST preserves all syntactic information including:
//! - Exact source spans for every node
//! - Whitespace, comments and delimiters, as tokens
//! - The virtual layout tokens the parser consumed
//! - Error nodes wherever the input was malformed
//!
//! Concatenating the text of every leaf token reproduces the source exactly.

pub(crate) mod builder;
mod kind;
pub mod views;

use std::fmt::Write as _;

use crate::diagnostics::ErrorNode;
use crate::lexer::TokenKind;
use crate::span::Span;

pub use kind::NodeKind;

/// A leaf of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(SyntaxToken),
}

impl SyntaxElement {
    pub fn span(&self) -> Span {
        match self {
            SyntaxElement::Node(node) => node.span,
            SyntaxElement::Token(token) => token.span,
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&SyntaxToken> {
        match self {
            SyntaxElement::Token(token) => Some(token),
            SyntaxElement::Node(_) => None,
        }
    }
}

/// An interior node. Its span is the union of its children's spans; a node
/// without children is empty at the offset where it was opened.
///
/// Long left-associative chains nest as deep as they have operands, so
/// `Clone` and `Drop` walk the tree with a heap stack.
#[derive(Debug, PartialEq)]
pub struct SyntaxNode {
    kind: NodeKind,
    span: Span,
    children: Vec<SyntaxElement>,
    error: Option<Box<ErrorNode>>,
}

impl SyntaxNode {
    pub(crate) fn new(
        kind: NodeKind,
        span: Span,
        children: Vec<SyntaxElement>,
        error: Option<Box<ErrorNode>>,
    ) -> Self {
        Self {
            kind,
            span,
            children,
            error,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[SyntaxElement] {
        &self.children
    }

    /// The error payload of an `Error` node
    pub fn error(&self) -> Option<&ErrorNode> {
        self.error.as_deref()
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    pub fn child_tokens(&self) -> impl Iterator<Item = &SyntaxToken> {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    /// First child node of the given kind
    pub fn child(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        self.child_nodes().find(|n| n.kind == kind)
    }

    /// First direct child token of the given kind
    pub fn child_token(&self, kind: TokenKind) -> Option<&SyntaxToken> {
        self.child_tokens().find(|t| t.kind == kind)
    }

    /// All nodes of the subtree in preorder, starting with `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All leaf tokens of the subtree in source order
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            stack: vec![self.children.iter()],
        }
    }

    /// Tokens that are neither trivia nor virtual
    pub fn significant_tokens(&self) -> impl Iterator<Item = &SyntaxToken> {
        self.tokens()
            .filter(|t| !t.kind.is_insignificant() && !t.kind.is_virtual())
    }

    /// Source text covered by the subtree
    pub fn text(&self) -> String {
        self.tokens().map(|t| t.text.as_str()).collect()
    }

    /// Error payloads of the subtree in preorder
    pub fn errors(&self) -> Vec<&ErrorNode> {
        self.descendants().filter_map(|n| n.error()).collect()
    }

    /// The innermost node whose span contains `offset` (half-open). Falls
    /// back to `self` when no child covers it.
    pub fn covering_node(&self, offset: usize) -> &SyntaxNode {
        let mut node = self;
        'descend: loop {
            for child in node.child_nodes() {
                if child.span.start <= offset && offset < child.span.end {
                    node = child;
                    continue 'descend;
                }
            }
            return node;
        }
    }

    /// The non-empty leaf token containing `offset`
    pub fn token_at(&self, offset: usize) -> Option<&SyntaxToken> {
        self.covering_node(offset)
            .tokens()
            .find(|t| t.span.start <= offset && offset < t.span.end)
    }

    /// Indented dump of the tree, without trivia
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        self.dump(&mut out, 0);
        out
    }

    fn dump(&self, out: &mut String, depth: usize) {
        let _ = writeln!(out, "{}", self.dump_header(depth));
        let mut stack = vec![(self.children.iter(), depth)];
        while let Some((iter, depth)) = stack.last_mut() {
            let depth = *depth;
            match iter.next() {
                Some(SyntaxElement::Node(node)) => {
                    let _ = writeln!(out, "{}", node.dump_header(depth + 1));
                    stack.push((node.children.iter(), depth + 1));
                }
                Some(SyntaxElement::Token(token)) if token.kind.is_trivia() => {}
                Some(SyntaxElement::Token(token)) => {
                    let indent = "  ".repeat(depth);
                    let _ = write!(out, "{}  {:?}@{}", indent, token.kind, token.span);
                    if !token.text.is_empty() {
                        let _ = write!(out, " {:?}", token.text);
                    }
                    out.push('\n');
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    fn dump_header(&self, depth: usize) -> String {
        let mut line = format!("{}{:?}@{}", "  ".repeat(depth), self.kind, self.span);
        if let Some(error) = &self.error {
            let _ = write!(line, " {}", error.code());
        }
        line
    }
}

/// A node whose children are still being cloned
struct CloneFrame<'a> {
    source: &'a SyntaxNode,
    pending: std::slice::Iter<'a, SyntaxElement>,
    children: Vec<SyntaxElement>,
}

impl<'a> CloneFrame<'a> {
    fn new(source: &'a SyntaxNode) -> Self {
        Self {
            source,
            pending: source.children.iter(),
            children: Vec::with_capacity(source.children.len()),
        }
    }

    fn finish(self) -> SyntaxNode {
        SyntaxNode::new(
            self.source.kind,
            self.source.span,
            self.children,
            self.source.error.clone(),
        )
    }
}

impl Clone for SyntaxNode {
    fn clone(&self) -> Self {
        let mut root = CloneFrame::new(self);
        let mut stack: Vec<CloneFrame<'_>> = Vec::new();
        loop {
            let frame = match stack.last_mut() {
                Some(frame) => frame,
                None => &mut root,
            };
            match frame.pending.next() {
                Some(SyntaxElement::Token(token)) => {
                    frame.children.push(SyntaxElement::Token(token.clone()));
                }
                Some(SyntaxElement::Node(node)) => stack.push(CloneFrame::new(node)),
                None => match stack.pop() {
                    Some(done) => {
                        let node = done.finish();
                        let parent = match stack.last_mut() {
                            Some(parent) => parent,
                            None => &mut root,
                        };
                        parent.children.push(SyntaxElement::Node(node));
                    }
                    None => return root.finish(),
                },
            }
        }
    }
}

impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(element) = stack.pop() {
            if let SyntaxElement::Node(mut node) = element {
                stack.append(&mut node.children);
            }
        }
    }
}

/// Preorder walk over nodes
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<&'a SyntaxNode> {
        let node = self.stack.pop()?;
        self.stack.extend(node.child_nodes().collect::<Vec<_>>().into_iter().rev());
        Some(node)
    }
}

/// Walk over leaf tokens in source order
pub struct Tokens<'a> {
    stack: Vec<std::slice::Iter<'a, SyntaxElement>>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a SyntaxToken;

    fn next(&mut self) -> Option<&'a SyntaxToken> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(SyntaxElement::Token(token)) => return Some(token),
                Some(SyntaxElement::Node(node)) => self.stack.push(node.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
