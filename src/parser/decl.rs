//! Declarations: values, signatures, data types, classes, instances, foreign
//! imports and fixities.

use crate::cst::NodeKind;
use crate::diagnostics::{ErrorKind, OperatorAmbiguity};
use crate::fixity::{Associativity, Fixity, Namespace};
use crate::lexer::literal::integer_value;
use crate::lexer::TokenKind;
use crate::parser::Parser;

const DECL_START: &[TokenKind] = &[
    TokenKind::LowerIdent,
    TokenKind::Import,
    TokenKind::Data,
    TokenKind::Type,
    TokenKind::Newtype,
    TokenKind::Class,
    TokenKind::Instance,
    TokenKind::Foreign,
];

impl<'t, 'src> Parser<'t, 'src> {
    /// A top-level declaration.
    pub(crate) fn parse_decl(&mut self) {
        match self.kind() {
            TokenKind::Import => self.parse_import(),
            TokenKind::Foreign => self.parse_foreign(),
            TokenKind::Data => self.parse_data(),
            TokenKind::Type => self.parse_type_decl(),
            TokenKind::Newtype => self.parse_newtype(),
            TokenKind::Class => self.parse_class(),
            TokenKind::Instance => self.parse_instance_chain(),
            TokenKind::Derive => self.parse_derive(),
            TokenKind::Infix | TokenKind::Infixl | TokenKind::Infixr => self.parse_fixity(),
            TokenKind::LowerIdent if self.nth_kind(1) == TokenKind::DoubleColon => {
                self.parse_signature()
            }
            TokenKind::LowerIdent => self.parse_value_decl(),
            _ => self.recover(DECL_START, &[]),
        }
    }

    /// A declaration inside `let`, `where` or an instance body.
    pub(crate) fn parse_local_decl(&mut self) {
        match self.kind() {
            TokenKind::LowerIdent if self.nth_kind(1) == TokenKind::DoubleColon => {
                self.parse_signature()
            }
            TokenKind::LowerIdent if self.nth_kind(1) != TokenKind::At => self.parse_value_decl(),
            _ if self.at_binder_start() => {
                let m = self.start();
                self.parse_binder();
                self.parse_rhs(TokenKind::Equals);
                m.complete(self, NodeKind::PatternBinding);
            }
            _ => self.recover(&[TokenKind::LowerIdent], &[]),
        }
    }

    /// `name :: Type`
    fn parse_signature(&mut self) {
        let m = self.start();
        self.bump();
        self.bump(); // ::
        self.parse_type();
        m.complete(self, NodeKind::Signature);
    }

    /// `name binders = expr`, `name binders | guard = expr ...`, with an
    /// optional `where` clause
    fn parse_value_decl(&mut self) {
        let m = self.start();
        self.bump();
        while self.at_binder_atom_start() {
            self.parse_binder_atom();
        }
        self.parse_rhs(TokenKind::Equals);
        m.complete(self, NodeKind::ValueDecl);
    }

    /// The right-hand side of a declaration or case branch: `sep expr` or a
    /// run of guarded alternatives, then an optional `where` clause.
    pub(crate) fn parse_rhs(&mut self, sep: TokenKind) {
        if self.at(TokenKind::Pipe) {
            while self.at(TokenKind::Pipe) {
                self.parse_guarded_rhs(sep);
            }
        } else {
            let m = self.start();
            if self.expect(sep) {
                self.parse_expr();
            }
            m.complete(self, NodeKind::UnguardedRhs);
        }
        if self.at(TokenKind::Where) {
            let m = self.start();
            self.bump();
            self.parse_nonempty_block(Self::parse_local_decl, &[TokenKind::LowerIdent]);
            m.complete(self, NodeKind::WhereClause);
        }
    }

    fn parse_guarded_rhs(&mut self, sep: TokenKind) {
        let m = self.start();
        self.bump(); // |
        loop {
            self.parse_guard(sep);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if self.expect(sep) {
            self.parse_expr();
        }
        m.complete(self, NodeKind::GuardedRhs);
    }

    fn parse_guard(&mut self, sep: TokenKind) {
        let m = self.start();
        if self.scan_for(|t| t.kind == TokenKind::LeftArrow, &[TokenKind::Comma, sep]) {
            self.parse_binder();
            self.expect(TokenKind::LeftArrow);
            self.parse_expr();
            m.complete(self, NodeKind::PatternGuard);
        } else {
            self.parse_expr();
            m.complete(self, NodeKind::Guard);
        }
    }

    /// Type variables after a declared type or class name
    fn parse_type_var_bindings(&mut self) {
        while self.at_any(&[TokenKind::LowerIdent, TokenKind::LParen]) {
            self.parse_type_var_binding();
        }
    }

    /// `data T a = A a | B`, or `data T :: Kind`
    fn parse_data(&mut self) {
        let m = self.start();
        self.bump(); // data
        self.expect(TokenKind::UpperIdent);
        if self.eat(TokenKind::DoubleColon) {
            self.parse_type();
            m.complete(self, NodeKind::KindSignature);
            return;
        }
        self.parse_type_var_bindings();
        if self.eat(TokenKind::Equals) {
            loop {
                self.parse_data_ctor();
                if !self.eat(TokenKind::Pipe) {
                    break;
                }
            }
        }
        m.complete(self, NodeKind::DataDecl);
    }

    fn parse_data_ctor(&mut self) {
        if !self.at(TokenKind::UpperIdent) {
            self.recover(&[TokenKind::UpperIdent], &[TokenKind::Pipe]);
            return;
        }
        let m = self.start();
        self.bump();
        while self.at_type_atom_start() {
            self.parse_type_atom();
        }
        m.complete(self, NodeKind::DataCtor);
    }

    /// `type T a = ...`, `type T :: Kind` or `type role T nominal`
    fn parse_type_decl(&mut self) {
        let m = self.start();
        self.bump(); // type
        if self.at_contextual("role") && self.nth_kind(1) == TokenKind::UpperIdent {
            self.bump();
            self.bump();
            while self.at(TokenKind::LowerIdent) {
                self.bump();
            }
            m.complete(self, NodeKind::RoleDecl);
            return;
        }
        self.expect(TokenKind::UpperIdent);
        if self.eat(TokenKind::DoubleColon) {
            self.parse_type();
            m.complete(self, NodeKind::KindSignature);
            return;
        }
        self.parse_type_var_bindings();
        if self.expect(TokenKind::Equals) {
            self.parse_type();
        }
        m.complete(self, NodeKind::TypeSynonym);
    }

    /// `newtype T a = C (Inner a)`
    fn parse_newtype(&mut self) {
        let m = self.start();
        self.bump(); // newtype
        self.expect(TokenKind::UpperIdent);
        if self.eat(TokenKind::DoubleColon) {
            self.parse_type();
            m.complete(self, NodeKind::KindSignature);
            return;
        }
        self.parse_type_var_bindings();
        if self.expect(TokenKind::Equals) {
            if self.at(TokenKind::UpperIdent) {
                let ctor = self.start();
                self.bump();
                if self.at_type_atom_start() {
                    self.parse_type_atom();
                } else {
                    self.error(&[TokenKind::LParen, TokenKind::UpperIdent]);
                }
                ctor.complete(self, NodeKind::DataCtor);
            } else {
                self.error(&[TokenKind::UpperIdent]);
            }
        }
        m.complete(self, NodeKind::NewtypeDecl);
    }

    /// `class (Super a) <= C a | a -> b where members`
    fn parse_class(&mut self) {
        let m = self.start();
        self.bump(); // class
        let superclass_arrow = |t: crate::lexer::Token<'_>| {
            t.kind == TokenKind::Operator && (t.text == "<=" || t.text == "⇐")
        };
        if self.scan_for(superclass_arrow, &[TokenKind::Where]) {
            self.parse_constraints();
            if superclass_arrow(self.current()) {
                self.bump();
            } else {
                self.recover(&[TokenKind::Operator], &[TokenKind::UpperIdent]);
                if superclass_arrow(self.current()) {
                    self.bump();
                }
            }
        }
        self.expect(TokenKind::UpperIdent);
        if self.eat(TokenKind::DoubleColon) {
            self.parse_type();
            m.complete(self, NodeKind::KindSignature);
            return;
        }
        self.parse_type_var_bindings();
        if self.at(TokenKind::Pipe) {
            self.parse_fundeps();
        }
        if self.at(TokenKind::Where) {
            let body = self.start();
            self.bump();
            self.parse_block(Self::parse_class_member);
            body.complete(self, NodeKind::ClassBody);
        }
        m.complete(self, NodeKind::ClassDecl);
    }

    fn parse_fundeps(&mut self) {
        let m = self.start();
        self.bump(); // |
        loop {
            let dep = self.start();
            while self.eat(TokenKind::LowerIdent) {}
            self.expect(TokenKind::Arrow);
            while self.eat(TokenKind::LowerIdent) {}
            dep.complete(self, NodeKind::FunDep);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        m.complete(self, NodeKind::FunDeps);
    }

    fn parse_class_member(&mut self) {
        if self.at(TokenKind::LowerIdent) && self.nth_kind(1) == TokenKind::DoubleColon {
            self.parse_signature();
        } else {
            self.recover(&[TokenKind::LowerIdent], &[]);
        }
    }

    /// One or more instances joined by `else`.
    fn parse_instance_chain(&mut self) {
        let chain = self.start();
        loop {
            self.parse_instance_decl();
            if self.at(TokenKind::LayoutSep) && self.nth_kind(1) == TokenKind::Else {
                self.bump();
            }
            if !self.eat(TokenKind::Else) {
                break;
            }
            // `else` may end a line of its own
            self.eat(TokenKind::LayoutSep);
        }
        chain.complete(self, NodeKind::InstanceChain);
    }

    fn parse_instance_decl(&mut self) {
        let m = self.start();
        self.expect(TokenKind::Instance);
        self.parse_instance_head();
        if self.at(TokenKind::Where) {
            let body = self.start();
            self.bump();
            self.parse_block(Self::parse_local_decl);
            body.complete(self, NodeKind::InstanceBody);
        }
        m.complete(self, NodeKind::InstanceDecl);
    }

    /// `[name ::] [constraints =>] Class types`
    fn parse_instance_head(&mut self) {
        if self.at(TokenKind::LowerIdent) && self.nth_kind(1) == TokenKind::DoubleColon {
            self.bump();
            self.bump();
        }
        if self.scan_for(|t| t.kind == TokenKind::FatArrow, &[TokenKind::Where]) {
            self.parse_constraints();
            self.expect(TokenKind::FatArrow);
        }
        self.parse_constraint();
    }

    /// `derive [newtype] instance head`
    fn parse_derive(&mut self) {
        let m = self.start();
        self.bump(); // derive
        self.eat(TokenKind::Newtype);
        self.expect(TokenKind::Instance);
        self.parse_instance_head();
        m.complete(self, NodeKind::DeriveDecl);
    }

    /// `foreign import name :: Type` or `foreign import data Name :: Kind`
    fn parse_foreign(&mut self) {
        let m = self.start();
        self.bump(); // foreign
        self.expect(TokenKind::Import);
        let kind = if self.eat(TokenKind::Data) {
            self.expect(TokenKind::UpperIdent);
            NodeKind::ForeignData
        } else {
            self.expect(TokenKind::LowerIdent);
            NodeKind::ForeignImport
        };
        if self.expect(TokenKind::DoubleColon) {
            self.parse_type();
        }
        m.complete(self, kind);
    }

    /// `infixl 6 add as +`, `infixr 4 type NaturalTransformation as ~>`
    fn parse_fixity(&mut self) {
        let m = self.start();
        let associativity = match self.kind() {
            TokenKind::Infixl => Associativity::Left,
            TokenKind::Infixr => Associativity::Right,
            _ => Associativity::None,
        };
        self.bump();

        let mut precedence = None;
        if self.at(TokenKind::Integer) {
            precedence = integer_value(self.current().text).and_then(|v| u8::try_from(v).ok());
            self.bump();
        } else {
            self.error(&[TokenKind::Integer]);
        }

        let namespace = if self.eat(TokenKind::Type) {
            Namespace::Type
        } else {
            Namespace::Value
        };
        if self.at_any(&[
            TokenKind::LowerIdent,
            TokenKind::QualifiedLower,
            TokenKind::UpperIdent,
            TokenKind::QualifiedUpper,
        ]) {
            self.bump();
        } else {
            self.error(&[TokenKind::LowerIdent, TokenKind::UpperIdent]);
        }
        if !self.eat_contextual("as") {
            self.error(&[TokenKind::LowerIdent]);
        }

        if self.at_any(&[TokenKind::Operator, TokenKind::Colon]) {
            let op = self.current().text;
            let conflict = precedence.and_then(|precedence| {
                self.declare_fixity(namespace, op, Fixity::new(associativity, precedence))
            });
            match conflict {
                Some(previous) => {
                    log::trace!("`{}` was already declared {}", op, previous);
                    self.bump_error(ErrorKind::OperatorAmbiguity(
                        OperatorAmbiguity::ConflictingFixity { op: op.to_string() },
                    ));
                }
                None => self.bump(),
            }
        } else {
            self.error(&[TokenKind::Operator]);
        }
        m.complete(self, NodeKind::FixityDecl);
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::{NodeKind, SyntaxNode};
    use crate::diagnostics::{ErrorKind, OperatorAmbiguity};
    use crate::fixity::{Associativity, Fixity, Namespace};
    use crate::parser::parse;

    fn decl_kinds(root: &SyntaxNode) -> Vec<NodeKind> {
        root.child_nodes().map(|n| n.kind()).collect()
    }

    #[test]
    fn test_top_level_declarations() {
        let source = "\
data Maybe a = Nothing | Just a
data Proxy :: forall k. k -> Type
type Name = String
type role Box representational
newtype Box a = Box a
class Functor f where
  map :: forall a b. (a -> b) -> f a -> f b
instance showBox :: Show a => Show (Box a) where
  show (Box a) = show a
derive newtype instance eqBox :: Eq a => Eq (Box a)
foreign import log :: String -> Effect Unit
foreign import data Ref :: Type -> Type
infixr 5 append as <>
";
        let result = parse(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(
            decl_kinds(&result.root),
            vec![
                NodeKind::DataDecl,
                NodeKind::KindSignature,
                NodeKind::TypeSynonym,
                NodeKind::RoleDecl,
                NodeKind::NewtypeDecl,
                NodeKind::ClassDecl,
                NodeKind::InstanceChain,
                NodeKind::DeriveDecl,
                NodeKind::ForeignImport,
                NodeKind::ForeignData,
                NodeKind::FixityDecl,
            ]
        );
        assert_eq!(result.root.text(), source);
    }

    #[test]
    fn test_data_constructors() {
        let result = parse("data Either a b = Left a | Right b");
        let data = result.root.child(NodeKind::DataDecl).unwrap();
        let ctors: Vec<String> = data
            .child_nodes()
            .filter(|n| n.kind() == NodeKind::DataCtor)
            .map(|n| n.text())
            .collect();
        assert_eq!(ctors, vec!["Left a", "Right b"]);
    }

    #[test]
    fn test_class_with_superclass_and_fundeps() {
        let result = parse("class (Monad m) <= MonadState s m | m -> s where\n  state :: forall a. (s -> Tuple a s) -> m a");
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let class = result.root.child(NodeKind::ClassDecl).unwrap();
        assert!(class.child(NodeKind::Constraints).is_some());
        assert!(class.child(NodeKind::FunDeps).is_some());
        let body = class.child(NodeKind::ClassBody).unwrap();
        assert_eq!(body.child_nodes().filter(|n| n.kind() == NodeKind::Signature).count(), 1);
    }

    #[test]
    fn test_instance_chain_with_else() {
        let source = "instance a :: C Int where\n  c = 1\nelse instance b :: C a where\n  c = 2\nx = 1";
        let result = parse(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let chain = result.root.child(NodeKind::InstanceChain).unwrap();
        assert_eq!(
            chain.child_nodes().filter(|n| n.kind() == NodeKind::InstanceDecl).count(),
            2
        );
        assert!(result.root.child(NodeKind::ValueDecl).is_some());
    }

    #[test]
    fn test_guards_and_where() {
        let source = "abs x\n  | x < 0 = negate x\n  | otherwise = y\n  where\n  y = x";
        let result = parse(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let decl = result.root.child(NodeKind::ValueDecl).unwrap();
        assert_eq!(
            decl.child_nodes().filter(|n| n.kind() == NodeKind::GuardedRhs).count(),
            2
        );
        assert!(decl.child(NodeKind::WhereClause).is_some());
    }

    #[test]
    fn test_pattern_guard() {
        let result = parse("f x | Just y <- x, y > 0 = y\nf _ = 0");
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let guarded = result
            .root
            .descendants()
            .find(|n| n.kind() == NodeKind::GuardedRhs)
            .unwrap();
        let kinds: Vec<_> = guarded.child_nodes().map(|n| n.kind()).collect();
        assert_eq!(kinds[..2], [NodeKind::PatternGuard, NodeKind::Guard]);
    }

    #[test]
    fn test_fixity_declarations_extend_table() {
        let result = parse("infixl 4 map as <$>\ninfixr 0 type Fn as ~~>");
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(
            result.operators.get(Namespace::Value, "<$>"),
            Some(Fixity::new(Associativity::Left, 4))
        );
        assert_eq!(
            result.operators.get(Namespace::Type, "~~>"),
            Some(Fixity::new(Associativity::Right, 0))
        );
    }

    #[test]
    fn test_conflicting_fixity() {
        let result = parse("infixl 6 add as +++\ninfixr 2 other as +++");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].kind,
            ErrorKind::OperatorAmbiguity(OperatorAmbiguity::ConflictingFixity {
                op: "+++".into()
            })
        );
        // The first declaration wins
        assert_eq!(
            result.operators.get(Namespace::Value, "+++"),
            Some(Fixity::new(Associativity::Left, 6))
        );
    }

    #[test]
    fn test_bad_declaration_is_confined() {
        let result = parse("x = 1\n) junk\ny = 2");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result
                .root
                .child_nodes()
                .filter(|n| n.kind() == NodeKind::ValueDecl)
                .count(),
            2
        );
    }
}
