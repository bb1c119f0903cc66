//! Expressions, and the operator precedence climbing shared with binders and
//! types.
//!
//! Infix chains are resolved with the operator table as they are parsed, so
//! `1 + 2 * 3` comes out as `1 + (2 * 3)` directly. Operators of equal
//! precedence that cannot be chained (mixed associativity, or a
//! non-associative operator used twice) still produce a tree, with the
//! offending operator wrapped in an error node.

use std::collections::BTreeSet;

use crate::cst::NodeKind;
use crate::diagnostics::{ErrorKind, ErrorNode, OperatorAmbiguity};
use crate::fixity::{Associativity, Fixity, Namespace};
use crate::lexer::TokenKind;
use crate::parser::binder::BINDER_START;
use crate::parser::{is_label, CompletedMarker, Parser};
use crate::span::Span;

const EXPR_START: &[TokenKind] = &[
    TokenKind::LowerIdent,
    TokenKind::UpperIdent,
    TokenKind::Integer,
    TokenKind::String,
    TokenKind::LParen,
    TokenKind::LBracket,
    TokenKind::LBrace,
];

/// Tokens that end an expression for the enclosing production. A missing
/// operand in front of one is reported without consuming it.
const EXPR_FOLLOW: &[TokenKind] = &[
    TokenKind::In,
    TokenKind::Then,
    TokenKind::Else,
    TokenKind::Of,
    TokenKind::Where,
    TokenKind::Arrow,
    TokenKind::Equals,
    TokenKind::Comma,
    TokenKind::Pipe,
    TokenKind::LeftArrow,
    TokenKind::DoubleColon,
    TokenKind::FatArrow,
    TokenKind::RParen,
    TokenKind::RBracket,
    TokenKind::RBrace,
];

/// The three grammars built from operator chains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InfixLevel {
    Expr,
    Binder,
    Type,
}

impl InfixLevel {
    fn namespace(self) -> Namespace {
        match self {
            InfixLevel::Type => Namespace::Type,
            InfixLevel::Expr | InfixLevel::Binder => Namespace::Value,
        }
    }

    fn node(self) -> NodeKind {
        match self {
            InfixLevel::Expr => NodeKind::ExprBinary,
            InfixLevel::Binder => NodeKind::BinderBinary,
            InfixLevel::Type => NodeKind::TypeBinary,
        }
    }
}

/// An operator seen in a chain: its name and fixity
#[derive(Debug, Clone)]
struct ChainOp {
    name: String,
    fixity: Fixity,
}

/// Operators of equal precedence chain only when both associate the same
/// way, left or right.
fn ambiguity(prev: &ChainOp, next: &ChainOp) -> Option<OperatorAmbiguity> {
    if prev.fixity.precedence != next.fixity.precedence {
        return None;
    }
    match (prev.fixity.associativity, next.fixity.associativity) {
        (Associativity::None, Associativity::None) => Some(OperatorAmbiguity::NonAssociative {
            op: next.name.clone(),
        }),
        (a, b) if a == b => None,
        _ => Some(OperatorAmbiguity::MixedAssociativity {
            left: prev.name.clone(),
            right: next.name.clone(),
        }),
    }
}

impl<'t, 'src> Parser<'t, 'src> {
    // ---- Operator chains ----

    pub(crate) fn parse_infix(&mut self, level: InfixLevel) -> Option<CompletedMarker> {
        self.climb(level, 0, None)
    }

    /// Precedence climbing: parse operands joined by operators binding at
    /// least as tightly as `min`. `parent` is the operator whose right
    /// operand this chain is.
    fn climb(&mut self, level: InfixLevel, min: u8, parent: Option<&ChainOp>) -> Option<CompletedMarker> {
        let mut lhs = self.parse_infix_operand(level);
        let mut last: Option<ChainOp> = None;

        while let Some(op) = self.peek_infix(level) {
            if op.fixity.precedence < min {
                break;
            }
            let conflict = last
                .as_ref()
                .and_then(|prev| ambiguity(prev, &op))
                .or_else(|| parent.and_then(|prev| ambiguity(prev, &op)));

            let m = match lhs {
                Some(lhs) => lhs.precede(self),
                None => self.start(),
            };
            self.parse_infix_operator(level, &op, conflict);

            let next_min = match op.fixity.associativity {
                Associativity::Right => op.fixity.precedence,
                Associativity::Left | Associativity::None => op.fixity.precedence.saturating_add(1),
            };
            if self.enter() {
                self.climb(level, next_min, Some(&op));
                self.leave();
            }
            lhs = Some(m.complete(self, level.node()));
            last = Some(op);
        }
        lhs
    }

    fn parse_infix_operand(&mut self, level: InfixLevel) -> Option<CompletedMarker> {
        match level {
            InfixLevel::Expr => self.parse_expr_operand(),
            InfixLevel::Binder => self.parse_binder_operand(),
            InfixLevel::Type => self.parse_type_app(),
        }
    }

    /// The operator at the cursor, if any. Backticked names only count in
    /// expressions.
    fn peek_infix(&self, level: InfixLevel) -> Option<ChainOp> {
        let token = self.current();
        let name = match token.kind {
            TokenKind::Operator | TokenKind::QualifiedOperator => token.text,
            TokenKind::Colon if level != InfixLevel::Type => token.text,
            TokenKind::Backtick if level == InfixLevel::Expr => {
                let name = self.nth(1);
                match name.kind {
                    TokenKind::LowerIdent
                    | TokenKind::QualifiedLower
                    | TokenKind::UpperIdent
                    | TokenKind::QualifiedUpper => name.text,
                    _ => token.text,
                }
            }
            _ => return None,
        };
        Some(ChainOp {
            name: name.to_string(),
            fixity: self.operators.fixity(level.namespace(), name),
        })
    }

    fn parse_infix_operator(&mut self, level: InfixLevel, op: &ChainOp, conflict: Option<OperatorAmbiguity>) {
        let backtick = self.at(TokenKind::Backtick);
        let unknown = !backtick
            && self.options().report_unknown_operators
            && self.operators.get(level.namespace(), &op.name).is_none();
        let error = match conflict {
            Some(ambiguity) => Some(ambiguity),
            None if unknown => Some(OperatorAmbiguity::UnknownOperator { op: op.name.clone() }),
            None => None,
        };
        let found = self.found();

        let m = self.start();
        if backtick {
            self.bump();
            if matches!(
                self.kind(),
                TokenKind::LowerIdent
                    | TokenKind::QualifiedLower
                    | TokenKind::UpperIdent
                    | TokenKind::QualifiedUpper
            ) {
                self.bump();
            } else {
                self.error(&[TokenKind::LowerIdent]);
            }
            self.expect(TokenKind::Backtick);
        } else {
            self.bump();
        }
        let operator = m.complete(self, NodeKind::Operator);

        if let Some(ambiguity) = error {
            let span = Span::empty(self.current().span.start);
            let wrapper = operator.precede(self);
            wrapper.complete_error(
                self,
                ErrorNode {
                    kind: ErrorKind::OperatorAmbiguity(ambiguity),
                    expected: BTreeSet::new(),
                    found,
                    span,
                    recovery: span.start,
                },
            );
        }
    }

    // ---- Expressions ----

    /// A full expression, with an optional `:: Type` annotation.
    pub(crate) fn parse_expr(&mut self) -> Option<CompletedMarker> {
        if !self.enter() {
            return None;
        }
        let mut expr = self.parse_infix(InfixLevel::Expr);
        if self.at(TokenKind::DoubleColon) {
            let m = match expr {
                Some(expr) => expr.precede(self),
                None => self.start(),
            };
            self.bump();
            self.parse_type();
            expr = Some(m.complete(self, NodeKind::ExprTyped));
        }
        self.leave();
        expr
    }

    /// An operand of an infix chain: prefix negation or an application.
    fn parse_expr_operand(&mut self) -> Option<CompletedMarker> {
        if !self.at_operator("-") {
            return self.parse_expr_app();
        }
        if !self.enter() {
            return None;
        }
        let m = self.start();
        self.bump();
        self.parse_expr_operand();
        self.leave();
        Some(m.complete(self, NodeKind::ExprNegate))
    }

    /// `f x @Type y`, kept flat.
    fn parse_expr_app(&mut self) -> Option<CompletedMarker> {
        let head = self.parse_expr_postfix()?;
        if !self.at_expr_arg_start() {
            return Some(head);
        }
        let m = head.precede(self);
        while self.at_expr_arg_start() {
            let before = self.cursor;
            if self.at(TokenKind::At) {
                let arg = self.start();
                self.bump();
                self.parse_type_atom();
                arg.complete(self, NodeKind::TypeArg);
            } else {
                self.parse_expr_postfix();
            }
            if self.cursor == before {
                break;
            }
        }
        Some(m.complete(self, NodeKind::ExprApp))
    }

    pub(crate) fn at_expr_atom_start(&self) -> bool {
        let kind = self.kind();
        kind.is_literal()
            || matches!(
                kind,
                TokenKind::LowerIdent
                    | TokenKind::QualifiedLower
                    | TokenKind::UpperIdent
                    | TokenKind::QualifiedUpper
                    | TokenKind::Hole
                    | TokenKind::Underscore
                    | TokenKind::LParen
                    | TokenKind::LBracket
                    | TokenKind::LBrace
                    | TokenKind::If
                    | TokenKind::Case
                    | TokenKind::Let
                    | TokenKind::Do
                    | TokenKind::QualifiedDo
                    | TokenKind::Ado
                    | TokenKind::QualifiedAdo
                    | TokenKind::Backslash
                    | TokenKind::Error(_)
            )
    }

    fn at_expr_arg_start(&self) -> bool {
        self.at_expr_atom_start() || self.at(TokenKind::At)
    }

    /// An atom followed by record accesses `.label` and updates `{ l = e }`.
    fn parse_expr_postfix(&mut self) -> Option<CompletedMarker> {
        let mut expr = self.parse_expr_atom()?;
        loop {
            if self.at(TokenKind::Dot) && is_label(self.nth_kind(1)) {
                let m = expr.precede(self);
                self.bump();
                self.bump();
                expr = m.complete(self, NodeKind::ExprRecordAccess);
            } else if self.at(TokenKind::LBrace)
                && is_label(self.nth_kind(1))
                && matches!(self.nth_kind(2), TokenKind::Equals | TokenKind::LBrace)
            {
                let m = expr.precede(self);
                self.parse_record_update_fields();
                expr = m.complete(self, NodeKind::ExprRecordUpdate);
            } else {
                break;
            }
        }
        Some(expr)
    }

    /// `{ a = 1, b { c = 2 } }`
    fn parse_record_update_fields(&mut self) {
        self.bump(); // {
        loop {
            let field = self.start();
            if is_label(self.kind()) {
                self.bump();
            } else {
                self.error(&[TokenKind::LowerIdent]);
            }
            if self.at(TokenKind::LBrace) {
                if self.enter() {
                    self.parse_record_update_fields();
                    self.leave();
                }
            } else if self.expect(TokenKind::Equals) {
                self.parse_expr();
            }
            field.complete(self, NodeKind::RecordUpdateField);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(TokenKind::RBrace);
    }

    fn parse_single(&mut self, kind: NodeKind) -> CompletedMarker {
        let m = self.start();
        self.bump();
        m.complete(self, kind)
    }

    fn parse_expr_atom(&mut self) -> Option<CompletedMarker> {
        let kind = self.kind();
        let atom = match kind {
            k if k.is_literal() => self.parse_single(NodeKind::ExprLiteral),
            TokenKind::LowerIdent | TokenKind::QualifiedLower => self.parse_single(NodeKind::ExprVar),
            TokenKind::UpperIdent | TokenKind::QualifiedUpper => {
                self.parse_single(NodeKind::ExprConstructor)
            }
            TokenKind::Hole => self.parse_single(NodeKind::ExprHole),
            TokenKind::Underscore => self.parse_single(NodeKind::ExprSection),
            TokenKind::LParen => self.parse_paren_expr(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_record(),
            TokenKind::If => self.parse_if(),
            TokenKind::Case => self.parse_case(),
            TokenKind::Let => self.parse_let(),
            TokenKind::Do | TokenKind::QualifiedDo => self.parse_do(),
            TokenKind::Ado | TokenKind::QualifiedAdo => self.parse_ado(),
            TokenKind::Backslash => self.parse_lambda(),
            TokenKind::Error(_) => return self.lex_error_atom(),
            _ => {
                if self.at_any(EXPR_FOLLOW) || self.at_sync(&[]) {
                    self.error(EXPR_START);
                } else {
                    self.error_bump(EXPR_START);
                }
                return None;
            }
        };
        Some(atom)
    }

    /// `(expr)` or an operator name `(<>)`
    fn parse_paren_expr(&mut self) -> CompletedMarker {
        let m = self.start();
        if matches!(
            self.nth_kind(1),
            TokenKind::Operator | TokenKind::QualifiedOperator | TokenKind::Colon
        ) && self.nth_kind(2) == TokenKind::RParen
        {
            self.bump();
            self.bump();
            self.bump();
            return m.complete(self, NodeKind::ExprOpName);
        }
        self.bump(); // (
        self.parse_expr();
        self.expect_closing(TokenKind::RParen);
        m.complete(self, NodeKind::ExprParens)
    }

    fn parse_array(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // [
        if !self.at(TokenKind::RBracket) {
            loop {
                self.parse_expr();
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_closing(TokenKind::RBracket);
        m.complete(self, NodeKind::ExprArray)
    }

    /// `{ label: expr, pun }`
    fn parse_record(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // {
        if !self.at(TokenKind::RBrace) {
            loop {
                let field = self.start();
                if is_label(self.kind()) {
                    let pun = self.at(TokenKind::LowerIdent);
                    self.bump();
                    if self.eat(TokenKind::Colon) {
                        self.parse_expr();
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
        self.expect_closing(TokenKind::RBrace);
        m.complete(self, NodeKind::ExprRecord)
    }

    fn parse_if(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // if
        self.parse_expr();
        if self.expect(TokenKind::Then) {
            self.parse_expr();
            if self.expect(TokenKind::Else) {
                self.parse_expr();
            }
        }
        m.complete(self, NodeKind::ExprIf)
    }

    /// `case a, b of` followed by a block of branches
    fn parse_case(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // case
        loop {
            self.parse_expr();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if self.expect(TokenKind::Of) {
            self.parse_nonempty_block(Self::parse_case_branch, BINDER_START);
        }
        m.complete(self, NodeKind::ExprCase)
    }

    fn parse_case_branch(&mut self) {
        let m = self.start();
        loop {
            self.parse_binder();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.parse_rhs(TokenKind::Arrow);
        m.complete(self, NodeKind::CaseBranch);
    }

    fn parse_let_bindings(&mut self) {
        let m = self.start();
        self.parse_nonempty_block(Self::parse_local_decl, &[TokenKind::LowerIdent]);
        m.complete(self, NodeKind::LetBindings);
    }

    fn parse_let(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // let
        self.parse_let_bindings();
        if self.expect(TokenKind::In) {
            self.parse_expr();
        }
        m.complete(self, NodeKind::ExprLet)
    }

    fn parse_do(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // do
        self.parse_nonempty_block(Self::parse_do_statement, EXPR_START);
        m.complete(self, NodeKind::ExprDo)
    }

    fn parse_ado(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // ado
        self.parse_block(Self::parse_do_statement);
        if self.expect(TokenKind::In) {
            self.parse_expr();
        }
        m.complete(self, NodeKind::ExprAdo)
    }

    /// `binder <- expr`, `let bindings`, or a bare expression. A `let ... in`
    /// is an expression statement.
    fn parse_do_statement(&mut self) {
        let m = self.start();
        if self.at(TokenKind::Let) {
            let inner = self.start();
            self.bump();
            self.parse_let_bindings();
            if self.eat(TokenKind::In) {
                self.parse_expr();
                inner.complete(self, NodeKind::ExprLet);
                m.complete(self, NodeKind::DoDiscard);
            } else {
                inner.abandon(self);
                m.complete(self, NodeKind::DoLet);
            }
            return;
        }
        if self.scan_for(|t| t.kind == TokenKind::LeftArrow, &[]) {
            self.parse_binder();
            self.expect(TokenKind::LeftArrow);
            self.parse_expr();
            m.complete(self, NodeKind::DoBind);
        } else {
            self.parse_expr();
            m.complete(self, NodeKind::DoDiscard);
        }
    }

    /// `\a b -> expr`
    fn parse_lambda(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // \
        if !self.at_binder_atom_start() {
            self.error(&[TokenKind::LowerIdent]);
        }
        while self.at_binder_atom_start() {
            self.parse_binder_atom();
        }
        if self.expect(TokenKind::Arrow) {
            self.parse_expr();
        }
        m.complete(self, NodeKind::ExprLambda)
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::{NodeKind, SyntaxNode};
    use crate::diagnostics::{ErrorKind, OperatorAmbiguity};
    use crate::parser::{parse, ModuleParser, ParseOptions};

    /// The expression on the right of the first `=`
    fn rhs(source: &str) -> SyntaxNode {
        let result = parse(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let rhs = result
            .root
            .descendants()
            .find(|n| n.kind() == NodeKind::UnguardedRhs)
            .unwrap();
        let node = rhs.child_nodes().next().unwrap().clone();
        node
    }

    fn shape(node: &SyntaxNode) -> String {
        match node.kind() {
            NodeKind::ExprBinary | NodeKind::BinderBinary | NodeKind::TypeBinary => {
                let parts: Vec<String> = node
                    .child_nodes()
                    .map(|child| match child.kind() {
                        NodeKind::Operator => child.text().trim().to_string(),
                        _ => shape(child),
                    })
                    .collect();
                format!("({})", parts.join(" "))
            }
            _ => node.text().trim().to_string(),
        }
    }

    #[test]
    fn test_precedence_from_table() {
        let source = "infixl 6 add as +\ninfixl 7 mul as *\nx = 1 + 2 * 3";
        assert_eq!(shape(&rhs(source)), "(1 + (2 * 3))");
        assert_eq!(shape(&rhs("x = 1 * 2 + 3")), "((1 * 2) + 3)");
    }

    #[test]
    fn test_associativity() {
        assert_eq!(shape(&rhs("x = a - b - c")), "((a - b) - c)");
        assert_eq!(shape(&rhs("x = a <> b <> c")), "(a <> (b <> c))");
        assert_eq!(shape(&rhs("x = f $ g $ h x")), "(f $ (g $ h x))");
        assert_eq!(shape(&rhs("x = a `div` b * c")), "((a `div` b) * c)");
    }

    #[test]
    fn test_unknown_operator_defaults_to_infixl_9() {
        assert_eq!(shape(&rhs("x = a + b +?+ c")), "(a + (b +?+ c))");
    }

    #[test]
    fn test_non_associative_chain() {
        let result = parse("x = a == b == c");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].kind,
            ErrorKind::OperatorAmbiguity(OperatorAmbiguity::NonAssociative { op: "==".into() })
        );
    }

    #[test]
    fn test_mixed_associativity() {
        let source = "infixl 5 f as <+\ninfixr 5 g as +>\nx = a <+ b +> c";
        let result = parse(source);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].kind,
            ErrorKind::OperatorAmbiguity(OperatorAmbiguity::MixedAssociativity {
                left: "<+".into(),
                right: "+>".into()
            })
        );
    }

    #[test]
    fn test_report_unknown_operators() {
        let options = ParseOptions {
            report_unknown_operators: true,
            ..ParseOptions::default()
        };
        let result = ModuleParser::new().options(options).parse("x = a +?+ b").unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code(), "OperatorAmbiguity.UnknownOperator");
    }

    #[test]
    fn test_application_and_negation() {
        let app = rhs("x = f a @Int (g b)");
        assert_eq!(app.kind(), NodeKind::ExprApp);
        let kinds: Vec<_> = app.child_nodes().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::ExprVar,
                NodeKind::ExprVar,
                NodeKind::TypeArg,
                NodeKind::ExprParens
            ]
        );
        assert_eq!(rhs("x = -f a").kind(), NodeKind::ExprNegate);
        assert_eq!(shape(&rhs("x = -a + b")), "(-a + b)");
    }

    #[test]
    fn test_records() {
        assert_eq!(rhs("x = { a: 1, b, \"c d\": 2 }").kind(), NodeKind::ExprRecord);
        assert_eq!(rhs("x = r { a = 1, b { c = 2 } }").kind(), NodeKind::ExprRecordUpdate);
        let access = rhs("x = r.a.b");
        assert_eq!(access.kind(), NodeKind::ExprRecordAccess);
        assert_eq!(access.child_nodes().next().unwrap().text(), "r.a");
        assert_eq!(rhs("x = _.a").kind(), NodeKind::ExprRecordAccess);
    }

    #[test]
    fn test_atoms() {
        assert_eq!(rhs("x = (<>)").kind(), NodeKind::ExprOpName);
        assert_eq!(rhs("x = ?help").kind(), NodeKind::ExprHole);
        assert_eq!(rhs("x = [1, 2, 3]").kind(), NodeKind::ExprArray);
        assert_eq!(rhs("x = (a :: Int)").kind(), NodeKind::ExprParens);
        assert_eq!(rhs("x = \\a b -> a").kind(), NodeKind::ExprLambda);
        assert_eq!(rhs("x = if a then b else c").kind(), NodeKind::ExprIf);
    }

    #[test]
    fn test_do_statements() {
        let source = "main = do\n  x <- get\n  let y = x\n  log y\n  let z = 1 in pure z";
        let block = rhs(source);
        assert_eq!(block.kind(), NodeKind::ExprDo);
        let kinds: Vec<_> = block.child_nodes().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::DoBind,
                NodeKind::DoLet,
                NodeKind::DoDiscard,
                NodeKind::DoDiscard
            ]
        );
        let last = block.child_nodes().last().unwrap();
        assert_eq!(last.child_nodes().next().unwrap().kind(), NodeKind::ExprLet);
    }

    #[test]
    fn test_ado_and_let() {
        assert_eq!(rhs("x = ado\n  a <- f\n  in a").kind(), NodeKind::ExprAdo);
        let let_expr = rhs("x = let a = 1\n        b = 2\n    in a + b");
        assert_eq!(let_expr.kind(), NodeKind::ExprLet);
        let bindings = let_expr.child(NodeKind::LetBindings).unwrap();
        assert_eq!(bindings.child_nodes().count(), 2);
    }

    #[test]
    fn test_case_with_guards() {
        let source = "f x = case x, y of\n  Just a, _ | a > 0 -> a\n             | otherwise -> 0\n  _, _ -> 1";
        let case = rhs(source);
        assert_eq!(case.kind(), NodeKind::ExprCase);
        let branches: Vec<_> = case
            .child_nodes()
            .filter(|n| n.kind() == NodeKind::CaseBranch)
            .collect();
        assert_eq!(branches.len(), 2);
        assert_eq!(
            branches[0]
                .child_nodes()
                .filter(|n| n.kind() == NodeKind::GuardedRhs)
                .count(),
            2
        );
    }

    #[test]
    fn test_typed_expression() {
        assert_eq!(rhs("x = 1 :: Int").kind(), NodeKind::ExprTyped);
    }
}
