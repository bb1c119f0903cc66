//! Turns the parser's flat event list into a [`SyntaxNode`] tree.
//!
//! The parser never builds nodes itself. It records "start node", "consume
//! token" and "finish node" events; a node that must wrap an already
//! finished sibling (the left operand of a binary expression, say) is
//! started later and linked from the sibling's start event through
//! `forward_parent`, so the build stays a single linear pass.

use std::mem;

use crate::cst::{NodeKind, SyntaxElement, SyntaxNode, SyntaxToken};
use crate::diagnostics::ErrorNode;
use crate::lexer::Token;
use crate::span::Span;

#[derive(Debug)]
pub(crate) enum Event {
    Start {
        kind: NodeKind,
        /// Index of the event that starts this node's parent
        forward_parent: Option<usize>,
        error: Option<Box<ErrorNode>>,
    },
    /// Consume the next token of the stream
    Token,
    Finish,
    /// Abandoned or already processed start
    Tombstone,
}

struct OpenNode {
    kind: NodeKind,
    opened_at: usize,
    children: Vec<SyntaxElement>,
    error: Option<Box<ErrorNode>>,
}

impl OpenNode {
    fn close(self) -> SyntaxNode {
        let span = match (self.children.first(), self.children.last()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::empty(self.opened_at),
        };
        let error = self.error.map(|mut error| {
            error.span = span;
            error
        });
        SyntaxNode::new(self.kind, span, self.children, error)
    }
}

/// Build the tree. Tokens are consumed in order, one per `Token` event;
/// tokens the events never reached are attached to the root.
pub(crate) fn build(tokens: &[Token<'_>], mut events: Vec<Event>) -> SyntaxNode {
    let mut stack: Vec<OpenNode> = Vec::new();
    let mut root: Option<SyntaxNode> = None;
    let mut next_token = 0;
    let mut offset = 0;
    let mut parents: Vec<(NodeKind, Option<Box<ErrorNode>>)> = Vec::new();

    for i in 0..events.len() {
        match mem::replace(&mut events[i], Event::Tombstone) {
            Event::Start {
                kind,
                forward_parent,
                error,
            } => {
                parents.push((kind, error));
                let mut link = forward_parent;
                while let Some(index) = link {
                    link = None;
                    if let Event::Start {
                        kind,
                        forward_parent,
                        error,
                    } = mem::replace(&mut events[index], Event::Tombstone)
                    {
                        parents.push((kind, error));
                        link = forward_parent;
                    }
                }
                for (kind, error) in parents.drain(..).rev() {
                    stack.push(OpenNode {
                        kind,
                        opened_at: offset,
                        children: Vec::new(),
                        error,
                    });
                }
            }
            Event::Token => {
                if let Some(token) = tokens.get(next_token) {
                    next_token += 1;
                    offset = token.span.end;
                    let leaf = SyntaxElement::Token(SyntaxToken {
                        kind: token.kind,
                        span: token.span,
                        text: token.text.to_string(),
                    });
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(leaf);
                    }
                }
            }
            Event::Finish => {
                if let Some(open) = stack.pop() {
                    let node = open.close();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(SyntaxElement::Node(node)),
                        None => root = Some(node),
                    }
                }
            }
            Event::Tombstone => {}
        }
    }

    // Unbalanced events only happen on cancellation paths; close what is open
    while let Some(open) = stack.pop() {
        let node = open.close();
        match stack.last_mut() {
            Some(parent) => parent.children.push(SyntaxElement::Node(node)),
            None => root = Some(node),
        }
    }

    let mut root = root.unwrap_or_else(|| SyntaxNode::new(NodeKind::Module, Span::empty(0), Vec::new(), None));
    if next_token < tokens.len() {
        root.children.extend(tokens[next_token..].iter().map(|token| {
            SyntaxElement::Token(SyntaxToken {
                kind: token.kind,
                span: token.span,
                text: token.text.to_string(),
            })
        }));
        if let (Some(first), Some(last)) = (root.children.first(), root.children.last()) {
            root.span = Span::new(first.span().start, last.span().end);
        }
    }
    root
}
