//! Types, kinds, rows and constraints.

use crate::cst::NodeKind;
use crate::lexer::TokenKind;
use crate::parser::expr::InfixLevel;
use crate::parser::{is_label, CompletedMarker, Parser};

const TYPE_START: &[TokenKind] = &[
    TokenKind::LowerIdent,
    TokenKind::UpperIdent,
    TokenKind::LParen,
    TokenKind::LBrace,
    TokenKind::Forall,
];

impl<'t, 'src> Parser<'t, 'src> {
    /// `forall a. C a => a -> T a`
    pub(crate) fn parse_type(&mut self) -> Option<CompletedMarker> {
        if !self.enter() {
            return None;
        }
        let ty = if self.at(TokenKind::Forall) {
            Some(self.parse_forall())
        } else {
            let mut ty = self.parse_type_arrow();
            if self.at(TokenKind::FatArrow) {
                let m = match ty {
                    Some(ty) => ty.precede(self),
                    None => self.start(),
                };
                self.bump();
                self.parse_type();
                ty = Some(m.complete(self, NodeKind::TypeConstrained));
            }
            ty
        };
        self.leave();
        ty
    }

    fn parse_forall(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // forall
        if !self.at_any(&[TokenKind::LowerIdent, TokenKind::LParen, TokenKind::At]) {
            self.error(&[TokenKind::LowerIdent]);
        }
        while self.at_any(&[TokenKind::LowerIdent, TokenKind::LParen, TokenKind::At]) {
            self.parse_type_var_binding();
        }
        if self.expect(TokenKind::Dot) {
            self.parse_type();
        }
        m.complete(self, NodeKind::TypeForall)
    }

    /// Arrows bind loosest and associate to the right.
    fn parse_type_arrow(&mut self) -> Option<CompletedMarker> {
        let lhs = self.parse_infix(InfixLevel::Type);
        if !self.at(TokenKind::Arrow) {
            return lhs;
        }
        let m = match lhs {
            Some(lhs) => lhs.precede(self),
            None => self.start(),
        };
        self.bump();
        self.parse_type();
        Some(m.complete(self, NodeKind::TypeArrow))
    }

    /// `Map k v`, kept flat.
    pub(crate) fn parse_type_app(&mut self) -> Option<CompletedMarker> {
        let head = self.parse_type_atom()?;
        if !self.at_type_atom_start() {
            return Some(head);
        }
        let m = head.precede(self);
        while self.at_type_atom_start() {
            let before = self.cursor;
            self.parse_type_atom();
            if self.cursor == before {
                break;
            }
        }
        Some(m.complete(self, NodeKind::TypeApp))
    }

    pub(crate) fn at_type_atom_start(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::LowerIdent
                | TokenKind::UpperIdent
                | TokenKind::QualifiedUpper
                | TokenKind::Underscore
                | TokenKind::Hole
                | TokenKind::String
                | TokenKind::RawString
                | TokenKind::Integer
                | TokenKind::LParen
                | TokenKind::LBrace
        ) || (self.at_operator("-") && self.nth_kind(1) == TokenKind::Integer)
    }

    pub(crate) fn parse_type_atom(&mut self) -> Option<CompletedMarker> {
        let single = |p: &mut Self, kind: NodeKind| {
            let m = p.start();
            p.bump();
            m.complete(p, kind)
        };
        let atom = match self.kind() {
            TokenKind::LowerIdent => single(self, NodeKind::TypeVar),
            TokenKind::UpperIdent | TokenKind::QualifiedUpper => single(self, NodeKind::TypeConstructor),
            TokenKind::Underscore => single(self, NodeKind::TypeWildcard),
            TokenKind::Hole => single(self, NodeKind::TypeHole),
            TokenKind::String | TokenKind::RawString => single(self, NodeKind::TypeString),
            TokenKind::Integer => single(self, NodeKind::TypeInt),
            TokenKind::Operator if self.at_operator("-") && self.nth_kind(1) == TokenKind::Integer => {
                let m = self.start();
                self.bump();
                self.bump();
                m.complete(self, NodeKind::TypeInt)
            }
            TokenKind::LBrace => {
                let m = self.start();
                self.bump();
                self.parse_row(TokenKind::RBrace);
                self.expect_closing(TokenKind::RBrace);
                m.complete(self, NodeKind::TypeRecord)
            }
            TokenKind::LParen => self.parse_type_parens()?,
            TokenKind::Error(_) => return self.lex_error_atom(),
            _ => {
                self.error(TYPE_START);
                return None;
            }
        };
        Some(atom)
    }

    /// `(op)`, a row `( a :: T | r )`, a kinded type `(t :: K)`, a
    /// constraint list `(C a, D a)`, or plain parentheses.
    fn parse_type_parens(&mut self) -> Option<CompletedMarker> {
        if !self.enter() {
            return None;
        }
        let m = self.start();
        if matches!(
            self.nth_kind(1),
            TokenKind::Operator | TokenKind::QualifiedOperator
        ) && self.nth_kind(2) == TokenKind::RParen
        {
            self.bump();
            self.bump();
            self.bump();
            self.leave();
            return Some(m.complete(self, NodeKind::TypeOpName));
        }

        self.bump(); // (
        let is_row = self.at(TokenKind::RParen)
            || self.at(TokenKind::Pipe)
            || (is_label(self.kind()) && self.nth_kind(1) == TokenKind::DoubleColon);
        let kind = if is_row {
            self.parse_row(TokenKind::RParen);
            NodeKind::TypeRow
        } else {
            let inner = self.parse_type();
            if self.at(TokenKind::DoubleColon) {
                let kinded = match inner {
                    Some(inner) => inner.precede(self),
                    None => self.start(),
                };
                self.bump();
                self.parse_type();
                kinded.complete(self, NodeKind::TypeKinded);
                NodeKind::TypeParens
            } else if self.at(TokenKind::Comma) {
                while self.eat(TokenKind::Comma) {
                    self.parse_type();
                }
                NodeKind::Constraints
            } else {
                NodeKind::TypeParens
            }
        };
        self.expect_closing(TokenKind::RParen);
        self.leave();
        Some(m.complete(self, kind))
    }

    /// Row contents up to `closer`: `label :: Type, ... | tail`
    fn parse_row(&mut self, closer: TokenKind) {
        if !self.at(TokenKind::Pipe) && !self.at(closer) {
            loop {
                let field = self.start();
                if is_label(self.kind()) {
                    self.bump();
                } else {
                    self.error(&[TokenKind::LowerIdent]);
                }
                if self.expect(TokenKind::DoubleColon) {
                    self.parse_type();
                }
                field.complete(self, NodeKind::RowField);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        if self.at(TokenKind::Pipe) {
            let tail = self.start();
            self.bump();
            self.parse_type();
            tail.complete(self, NodeKind::RowTail);
        }
    }

    /// `a`, `@a`, `(a :: Kind)` or `(@a :: Kind)`
    pub(crate) fn parse_type_var_binding(&mut self) {
        let m = self.start();
        match self.kind() {
            TokenKind::LParen => {
                self.bump();
                self.eat(TokenKind::At);
                self.expect(TokenKind::LowerIdent);
                if self.expect(TokenKind::DoubleColon) {
                    self.parse_type();
                }
                self.expect_closing(TokenKind::RParen);
            }
            TokenKind::At => {
                self.bump();
                self.expect(TokenKind::LowerIdent);
            }
            _ => {
                self.expect(TokenKind::LowerIdent);
            }
        }
        m.complete(self, NodeKind::TypeVarBinding);
    }

    /// A class constraint or instance head: `Show a`, `Data.Eq.Eq (Maybe a)`
    pub(crate) fn parse_constraint(&mut self) {
        if !self.at_any(&[TokenKind::UpperIdent, TokenKind::QualifiedUpper]) {
            self.error(&[TokenKind::UpperIdent]);
            return;
        }
        let m = self.start();
        self.bump();
        while self.at_type_atom_start() {
            self.parse_type_atom();
        }
        m.complete(self, NodeKind::Constraint);
    }

    /// One constraint, or a parenthesised list of them
    pub(crate) fn parse_constraints(&mut self) {
        let m = self.start();
        if self.eat(TokenKind::LParen) {
            loop {
                self.parse_constraint();
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect_closing(TokenKind::RParen);
        } else {
            self.parse_constraint();
        }
        m.complete(self, NodeKind::Constraints);
    }
}
