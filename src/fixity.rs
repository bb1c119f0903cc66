//! Operator fixities.
//!
//! Value-level and type-level operators live in separate namespaces, so
//! `infixr 6 type Tuple as /\` and `infixr 6 conj as /\` do not collide.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::lexer::literal::integer_value;
use crate::lexer::{Token, TokenKind};

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    None,
}

impl Associativity {
    fn keyword(self) -> &'static str {
        match self {
            Associativity::Left => "infixl",
            Associativity::Right => "infixr",
            Associativity::None => "infix",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fixity {
    pub associativity: Associativity,
    pub precedence: u8,
}

impl Fixity {
    /// Fixity assumed for operators without a declaration.
    pub const DEFAULT: Fixity = Fixity::new(Associativity::Left, 9);

    pub const fn new(associativity: Associativity, precedence: u8) -> Self {
        Self {
            associativity,
            precedence,
        }
    }
}

impl fmt::Display for Fixity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.associativity.keyword(), self.precedence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Value,
    Type,
}

/// Operator symbol → fixity, per namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorTable {
    values: HashMap<String, Fixity>,
    types: HashMap<String, Fixity>,
}

static STANDARD: Lazy<OperatorTable> = Lazy::new(|| {
    use Associativity::{Left, None, Right};

    let mut table = OperatorTable::new();
    let values: &[(&str, Associativity, u8)] = &[
        ("$", Right, 0),
        ("#", Left, 1),
        ("<#>", Left, 1),
        (">>=", Left, 1),
        ("=<<", Right, 1),
        (">=>", Right, 1),
        ("<=<", Right, 1),
        ("||", Right, 2),
        ("&&", Right, 3),
        ("<|>", Left, 3),
        ("==", None, 4),
        ("/=", None, 4),
        ("<", Left, 4),
        (">", Left, 4),
        ("<=", Left, 4),
        (">=", Left, 4),
        ("<$>", Left, 4),
        ("<$", Left, 4),
        ("$>", Left, 4),
        ("<*>", Left, 4),
        ("<*", Left, 4),
        ("*>", Left, 4),
        ("<@>", Left, 4),
        ("<>", Right, 5),
        ("+", Left, 6),
        ("-", Left, 6),
        (":", Right, 6),
        ("/\\", Right, 6),
        ("\\/", Right, 6),
        ("*", Left, 7),
        ("/", Left, 7),
        ("<<<", Right, 9),
        (">>>", Right, 9),
    ];
    for (op, assoc, prec) in values {
        table.insert(Namespace::Value, *op, Fixity::new(*assoc, *prec));
    }

    let types: &[(&str, Associativity, u8)] = &[
        ("~>", Right, 4),
        ("/\\", Right, 6),
        ("\\/", Right, 6),
        ("+", Right, 6),
    ];
    for (op, assoc, prec) in types {
        table.insert(Namespace::Type, *op, Fixity::new(*assoc, *prec));
    }
    table
});

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in fixities of the standard Prelude operators. Shared
    /// read-only by every parse.
    pub fn standard() -> &'static OperatorTable {
        &STANDARD
    }

    fn namespace(&self, ns: Namespace) -> &HashMap<String, Fixity> {
        match ns {
            Namespace::Value => &self.values,
            Namespace::Type => &self.types,
        }
    }

    /// Look up an operator. Module qualification is ignored, so
    /// `Data.Semigroup.<>` finds `<>`.
    pub fn get(&self, ns: Namespace, op: &str) -> Option<Fixity> {
        self.namespace(ns).get(unqualified(op)).copied()
    }

    /// Fixity of an operator, falling back to `infixl 9`.
    pub fn fixity(&self, ns: Namespace, op: &str) -> Fixity {
        self.get(ns, op).unwrap_or(Fixity::DEFAULT)
    }

    /// Returns the previous fixity, if any.
    pub fn insert(&mut self, ns: Namespace, op: impl Into<String>, fixity: Fixity) -> Option<Fixity> {
        let map = match ns {
            Namespace::Value => &mut self.values,
            Namespace::Type => &mut self.types,
        };
        map.insert(op.into(), fixity)
    }

    pub fn len(&self) -> usize {
        self.values.len() + self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self, ns: Namespace) -> impl Iterator<Item = (&str, Fixity)> {
        self.namespace(ns).iter().map(|(op, fixity)| (op.as_str(), *fixity))
    }
}

/// Strip leading module qualifiers from an operator or name:
/// `Data.Semigroup.<>` → `<>`, `Data.Array.cons` → `cons`.
pub fn unqualified(name: &str) -> &str {
    let mut rest = name;
    while rest.starts_with(|c: char| c.is_uppercase()) {
        match rest.find('.') {
            Some(dot) if dot + 1 < rest.len() => rest = &rest[dot + 1..],
            _ => break,
        }
    }
    rest
}

/// A fixity declaration found by [`scan_fixities`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredFixity {
    pub namespace: Namespace,
    pub operator: String,
    pub fixity: Fixity,
    /// Byte offset of the `infix*` keyword
    pub offset: usize,
}

/// Collect every well-formed `infix[lr] N [type] target as op` declaration
/// in a token stream, in source order. Malformed declarations are skipped;
/// the grammar parser reports them.
pub fn scan_fixities(tokens: &[Token<'_>]) -> Vec<DeclaredFixity> {
    let significant: Vec<&Token<'_>> = tokens
        .iter()
        .filter(|t| !t.kind.is_insignificant() && !t.kind.is_virtual())
        .collect();

    let mut found = Vec::new();
    for (i, token) in significant.iter().enumerate() {
        let associativity = match token.kind {
            TokenKind::Infixl => Associativity::Left,
            TokenKind::Infixr => Associativity::Right,
            TokenKind::Infix => Associativity::None,
            _ => continue,
        };
        if let Some(decl) = match_fixity(&significant[i + 1..], associativity, token.span.start) {
            found.push(decl);
        }
    }
    found
}

fn match_fixity(
    rest: &[&Token<'_>],
    associativity: Associativity,
    offset: usize,
) -> Option<DeclaredFixity> {
    let mut it = rest.iter();
    let prec = it.next().filter(|t| t.kind == TokenKind::Integer)?;
    let precedence = u8::try_from(integer_value(prec.text)?).ok()?;

    let mut next = it.next()?;
    let namespace = if next.kind == TokenKind::Type {
        next = it.next()?;
        Namespace::Type
    } else {
        Namespace::Value
    };
    if !matches!(
        next.kind,
        TokenKind::LowerIdent
            | TokenKind::UpperIdent
            | TokenKind::QualifiedLower
            | TokenKind::QualifiedUpper
    ) {
        return None;
    }
    it.next()
        .filter(|t| t.kind == TokenKind::LowerIdent && t.text == "as")?;
    let op = it
        .next()
        .filter(|t| matches!(t.kind, TokenKind::Operator | TokenKind::Colon))?;

    Some(DeclaredFixity {
        namespace,
        operator: op.text.to_string(),
        fixity: Fixity::new(associativity, precedence),
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_standard_table() {
        let table = OperatorTable::standard();
        assert_eq!(
            table.get(Namespace::Value, "$"),
            Some(Fixity::new(Associativity::Right, 0))
        );
        assert_eq!(
            table.get(Namespace::Value, "=="),
            Some(Fixity::new(Associativity::None, 4))
        );
        assert_eq!(
            table.get(Namespace::Type, "~>"),
            Some(Fixity::new(Associativity::Right, 4))
        );
        assert_eq!(table.get(Namespace::Type, "$"), None);
    }

    #[test]
    fn test_default_fixity() {
        let table = OperatorTable::new();
        assert_eq!(table.fixity(Namespace::Value, "<+>"), Fixity::DEFAULT);
        assert_eq!(Fixity::DEFAULT.to_string(), "infixl 9");
    }

    #[test]
    fn test_qualified_lookup() {
        assert_eq!(unqualified("Data.Semigroup.<>"), "<>");
        assert_eq!(unqualified("Data.Array.cons"), "cons");
        assert_eq!(unqualified("<<<"), "<<<");
        assert_eq!(
            OperatorTable::standard().get(Namespace::Value, "Prelude.<>"),
            Some(Fixity::new(Associativity::Right, 5))
        );
    }

    #[test]
    fn test_scan_fixities() {
        let tokens: Vec<_> = tokenize(
            "infixl 6 add as +\ninfixr 6 type Tuple as /\\\ninfixr 6 Cons as :\ninfix 4 broken",
        )
        .collect();
        let found = scan_fixities(&tokens);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].operator, "+");
        assert_eq!(found[0].namespace, Namespace::Value);
        assert_eq!(found[1].operator, "/\\");
        assert_eq!(found[1].namespace, Namespace::Type);
        assert_eq!(found[2].operator, ":");
        assert_eq!(found[2].fixity, Fixity::new(Associativity::Right, 6));
    }
}
