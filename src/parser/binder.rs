//! Binders (patterns) for function heads, lambdas, case branches and
//! do-binds.

use crate::cst::NodeKind;
use crate::lexer::TokenKind;
use crate::parser::expr::InfixLevel;
use crate::parser::{is_label, CompletedMarker, Parser};

pub(crate) const BINDER_START: &[TokenKind] = &[
    TokenKind::LowerIdent,
    TokenKind::UpperIdent,
    TokenKind::Underscore,
    TokenKind::LParen,
    TokenKind::LBracket,
    TokenKind::LBrace,
];

impl<'t, 'src> Parser<'t, 'src> {
    /// A full binder: operator chains and an optional `:: Type`.
    pub(crate) fn parse_binder(&mut self) -> Option<CompletedMarker> {
        if !self.enter() {
            return None;
        }
        let mut binder = self.parse_infix(InfixLevel::Binder);
        if self.at(TokenKind::DoubleColon) {
            let m = match binder {
                Some(binder) => binder.precede(self),
                None => self.start(),
            };
            self.bump();
            self.parse_type();
            binder = Some(m.complete(self, NodeKind::BinderTyped));
        }
        self.leave();
        binder
    }

    /// Constructor application `Just x`, or an atom.
    pub(crate) fn parse_binder_operand(&mut self) -> Option<CompletedMarker> {
        if self.at_any(&[TokenKind::UpperIdent, TokenKind::QualifiedUpper]) {
            let m = self.start();
            self.bump();
            while self.at_binder_atom_start() {
                self.parse_binder_atom();
            }
            return Some(m.complete(self, NodeKind::BinderConstructor));
        }
        self.parse_binder_atom()
    }

    pub(crate) fn at_binder_atom_start(&self) -> bool {
        let kind = self.kind();
        kind.is_literal()
            || matches!(
                kind,
                TokenKind::Underscore
                    | TokenKind::LowerIdent
                    | TokenKind::UpperIdent
                    | TokenKind::QualifiedUpper
                    | TokenKind::LParen
                    | TokenKind::LBracket
                    | TokenKind::LBrace
            )
            || self.at_negative_literal()
    }

    pub(crate) fn at_binder_start(&self) -> bool {
        self.at_binder_atom_start()
    }

    fn at_negative_literal(&self) -> bool {
        self.at_operator("-") && matches!(self.nth_kind(1), TokenKind::Integer | TokenKind::Number)
    }

    pub(crate) fn parse_binder_atom(&mut self) -> Option<CompletedMarker> {
        if !self.enter() {
            return None;
        }
        let binder = self.parse_binder_atom_inner();
        self.leave();
        binder
    }

    fn parse_binder_atom_inner(&mut self) -> Option<CompletedMarker> {
        let m = self.start();
        let kind = match self.kind() {
            TokenKind::Underscore => {
                self.bump();
                NodeKind::BinderWildcard
            }
            TokenKind::LowerIdent if self.nth_kind(1) == TokenKind::At => {
                self.bump();
                self.bump();
                self.parse_binder_atom();
                NodeKind::BinderNamed
            }
            TokenKind::LowerIdent => {
                self.bump();
                NodeKind::BinderVar
            }
            TokenKind::UpperIdent | TokenKind::QualifiedUpper => {
                self.bump();
                NodeKind::BinderConstructor
            }
            kind if kind.is_literal() => {
                self.bump();
                NodeKind::BinderLiteral
            }
            _ if self.at_negative_literal() => {
                self.bump();
                self.bump();
                NodeKind::BinderLiteral
            }
            TokenKind::LParen => {
                self.bump();
                self.parse_binder();
                self.expect_closing(TokenKind::RParen);
                NodeKind::BinderParens
            }
            TokenKind::LBracket => {
                self.bump();
                if !self.at(TokenKind::RBracket) {
                    loop {
                        self.parse_binder();
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect_closing(TokenKind::RBracket);
                NodeKind::BinderArray
            }
            TokenKind::LBrace => {
                self.bump();
                self.parse_record_binder_fields();
                self.expect_closing(TokenKind::RBrace);
                NodeKind::BinderRecord
            }
            _ => {
                m.abandon(self);
                self.error(BINDER_START);
                return None;
            }
        };
        Some(m.complete(self, kind))
    }

    /// `{ a, b: Just c }`
    fn parse_record_binder_fields(&mut self) {
        if self.at(TokenKind::RBrace) {
            return;
        }
        loop {
            let field = self.start();
            if is_label(self.kind()) {
                let pun = self.at(TokenKind::LowerIdent);
                self.bump();
                if self.eat(TokenKind::Colon) {
                    self.parse_binder();
                } else if !pun {
                    self.error(&[TokenKind::Colon]);
                }
            } else {
                self.recover(&[TokenKind::LowerIdent], &[TokenKind::Comma]);
            }
            field.complete(self, NodeKind::RecordField);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
    }
}
