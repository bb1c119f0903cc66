//! Typed, read-only views over the nodes tools ask about most: module
//! headers, imports, class constraints and fixity declarations.
//!
//! A view borrows its node and answers questions by walking the node's
//! children. Every accessor is total: a malformed node yields `None` or an
//! empty list rather than a panic.

use crate::cst::{NodeKind, SyntaxNode};
use crate::fixity::Associativity;
use crate::lexer::literal::integer_value;
use crate::lexer::TokenKind;

fn is_operator_token(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Operator | TokenKind::QualifiedOperator | TokenKind::Colon
    )
}

fn first_token_text(node: &SyntaxNode, kinds: &[TokenKind]) -> Option<String> {
    node.significant_tokens()
        .find(|t| kinds.contains(&t.kind))
        .map(|t| t.text.clone())
}

/// `module Name (exports) where`
#[derive(Debug, Clone, Copy)]
pub struct ModuleHeader<'a>(&'a SyntaxNode);

impl<'a> ModuleHeader<'a> {
    pub fn cast(node: &'a SyntaxNode) -> Option<Self> {
        (node.kind() == NodeKind::ModuleHeader).then_some(Self(node))
    }

    /// The header of a parsed module, if it has one
    pub fn of_module(root: &'a SyntaxNode) -> Option<Self> {
        root.child(NodeKind::ModuleHeader).and_then(Self::cast)
    }

    pub fn syntax(&self) -> &'a SyntaxNode {
        self.0
    }

    pub fn name(&self) -> Option<String> {
        self.0.child(NodeKind::ModuleName).map(|n| n.text())
    }

    /// `None` when the module exports everything
    pub fn exports(&self) -> Option<Vec<ImportItem<'a>>> {
        let list = self.0.child(NodeKind::ExportList)?;
        Some(list.child_nodes().filter_map(ImportItem::cast).collect())
    }
}

/// `import M hiding (items) as N`
#[derive(Debug, Clone, Copy)]
pub struct ImportDecl<'a>(&'a SyntaxNode);

impl<'a> ImportDecl<'a> {
    pub fn cast(node: &'a SyntaxNode) -> Option<Self> {
        (node.kind() == NodeKind::ImportDecl).then_some(Self(node))
    }

    /// Every import of a parsed module, in source order
    pub fn all(root: &'a SyntaxNode) -> Vec<Self> {
        root.child_nodes().filter_map(Self::cast).collect()
    }

    pub fn syntax(&self) -> &'a SyntaxNode {
        self.0
    }

    pub fn module_name(&self) -> Option<String> {
        self.0.child(NodeKind::ModuleName).map(|n| n.text())
    }

    pub fn import_list(&self) -> Option<&'a SyntaxNode> {
        self.0.child(NodeKind::ImportList)
    }

    pub fn items(&self) -> Vec<ImportItem<'a>> {
        self.import_list()
            .map(|list| list.child_nodes().filter_map(ImportItem::cast).collect())
            .unwrap_or_default()
    }

    pub fn alias(&self) -> Option<String> {
        self.0
            .child(NodeKind::ImportAlias)?
            .child(NodeKind::ModuleName)
            .map(|n| n.text())
    }

    pub fn is_hiding(&self) -> bool {
        self.0
            .child_tokens()
            .any(|t| t.kind == TokenKind::LowerIdent && t.text == "hiding")
    }

    /// Names listed in the import list. Empty for an open import.
    pub fn named_imports(&self) -> Vec<String> {
        self.items().iter().filter_map(|item| item.name()).collect()
    }

    /// The name the import is referred to by: the alias, else the module
    pub fn name(&self) -> Option<String> {
        self.alias().or_else(|| self.module_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportItemKind {
    Value,
    Operator,
    Type,
    TypeOperator,
    Class,
    Kind,
    /// `module M` in an export list
    Module,
}

/// Constructors brought in with a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataMembers {
    /// `(..)`
    All,
    /// `(A, B)`, possibly empty
    Explicit(Vec<String>),
}

/// One entry of an import or export list
#[derive(Debug, Clone, Copy)]
pub struct ImportItem<'a>(&'a SyntaxNode);

impl<'a> ImportItem<'a> {
    pub fn cast(node: &'a SyntaxNode) -> Option<Self> {
        Self::kind_of(node.kind()).map(|_| Self(node))
    }

    fn kind_of(kind: NodeKind) -> Option<ImportItemKind> {
        Some(match kind {
            NodeKind::ItemValue => ImportItemKind::Value,
            NodeKind::ItemOperator => ImportItemKind::Operator,
            NodeKind::ItemType => ImportItemKind::Type,
            NodeKind::ItemTypeOperator => ImportItemKind::TypeOperator,
            NodeKind::ItemClass => ImportItemKind::Class,
            NodeKind::ItemKind => ImportItemKind::Kind,
            NodeKind::ItemModule => ImportItemKind::Module,
            _ => return None,
        })
    }

    pub fn syntax(&self) -> &'a SyntaxNode {
        self.0
    }

    pub fn kind(&self) -> ImportItemKind {
        Self::kind_of(self.0.kind()).unwrap_or(ImportItemKind::Value)
    }

    pub fn name(&self) -> Option<String> {
        match self.kind() {
            ImportItemKind::Value => first_token_text(self.0, &[TokenKind::LowerIdent]),
            ImportItemKind::Operator | ImportItemKind::TypeOperator => self
                .0
                .significant_tokens()
                .find(|t| is_operator_token(t.kind))
                .map(|t| t.text.clone()),
            ImportItemKind::Type | ImportItemKind::Class | ImportItemKind::Kind => {
                first_token_text(self.0, &[TokenKind::UpperIdent])
            }
            ImportItemKind::Module => self.0.child(NodeKind::ModuleName).map(|n| n.text()),
        }
    }

    pub fn data_members(&self) -> Option<DataMembers> {
        let members = self.0.child(NodeKind::DataMembers)?;
        if members.child_token(TokenKind::DoubleDot).is_some() {
            return Some(DataMembers::All);
        }
        Some(DataMembers::Explicit(
            members
                .child_tokens()
                .filter(|t| t.kind == TokenKind::UpperIdent)
                .map(|t| t.text.clone())
                .collect(),
        ))
    }
}

/// A class constraint: `Show a`, or an instance head.
#[derive(Debug, Clone, Copy)]
pub struct ClassConstraint<'a>(&'a SyntaxNode);

impl<'a> ClassConstraint<'a> {
    /// Accepts `Constraint` nodes, and type applications or constructors
    /// standing in a constraint position (`(Show a, Eq a) => ...`).
    pub fn cast(node: &'a SyntaxNode) -> Option<Self> {
        match node.kind() {
            NodeKind::Constraint | NodeKind::TypeConstructor => Some(Self(node)),
            NodeKind::TypeApp => {
                let head = node.child_nodes().next()?;
                (head.kind() == NodeKind::TypeConstructor).then_some(Self(node))
            }
            _ => None,
        }
    }

    pub fn syntax(&self) -> &'a SyntaxNode {
        self.0
    }

    pub fn class_name(&self) -> Option<String> {
        match self.0.kind() {
            NodeKind::TypeApp => self.0.child_nodes().next().map(|n| n.text()),
            _ => first_token_text(self.0, &[TokenKind::UpperIdent, TokenKind::QualifiedUpper]),
        }
    }

    /// The type atoms applied to the class
    pub fn args(&self) -> Vec<&'a SyntaxNode> {
        match self.0.kind() {
            NodeKind::Constraint => self.0.child_nodes().collect(),
            NodeKind::TypeApp => self.0.child_nodes().skip(1).collect(),
            _ => Vec::new(),
        }
    }
}

/// `infixl 6 add as +`
#[derive(Debug, Clone, Copy)]
pub struct FixityDecl<'a>(&'a SyntaxNode);

impl<'a> FixityDecl<'a> {
    pub fn cast(node: &'a SyntaxNode) -> Option<Self> {
        (node.kind() == NodeKind::FixityDecl).then_some(Self(node))
    }

    pub fn syntax(&self) -> &'a SyntaxNode {
        self.0
    }

    pub fn associativity(&self) -> Option<Associativity> {
        self.0.child_tokens().find_map(|t| match t.kind {
            TokenKind::Infixl => Some(Associativity::Left),
            TokenKind::Infixr => Some(Associativity::Right),
            TokenKind::Infix => Some(Associativity::None),
            _ => None,
        })
    }

    pub fn precedence(&self) -> Option<u8> {
        let token = self.0.child_token(TokenKind::Integer)?;
        integer_value(&token.text).and_then(|v| u8::try_from(v).ok())
    }

    /// The aliased function, constructor or type
    pub fn target(&self) -> Option<String> {
        first_token_text(
            self.0,
            &[
                TokenKind::LowerIdent,
                TokenKind::QualifiedLower,
                TokenKind::UpperIdent,
                TokenKind::QualifiedUpper,
            ],
        )
        .filter(|name| name != "as")
    }

    pub fn operator(&self) -> Option<String> {
        self.0
            .significant_tokens()
            .find(|t| is_operator_token(t.kind))
            .map(|t| t.text.clone())
    }

    /// True for `infix N type T as op`
    pub fn is_type(&self) -> bool {
        self.0.child_token(TokenKind::Type).is_some()
    }
}
