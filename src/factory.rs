//! Builds syntax nodes from text, for refactorings that splice new code into
//! a tree.
//!
//! Each function parses a small template module around its input and
//! returns the first node of the wanted kind. Spans of the returned node are
//! relative to that template, not to any user file. Input that does not
//! parse cleanly yields `None`.

use crate::cst::views::DataMembers;
use crate::cst::{NodeKind, SyntaxNode};
use crate::parser::parse;

fn first_of(template: &str, kind: NodeKind) -> Option<SyntaxNode> {
    let result = parse(template);
    if result.has_errors() {
        log::trace!("template {:?} did not parse: {:?}", template, result.errors);
        return None;
    }
    result.root.descendants().find(|n| n.kind() == kind).cloned()
}

/// `Data.Maybe`
pub fn module_name(name: &str) -> Option<SyntaxNode> {
    first_of(&format!("module {} where", name), NodeKind::ModuleName)
}

/// `import M [hiding] (items) [as A]`. An empty `items` gives an open
/// import; each item is source text such as `"map"` or `"class Functor"`.
pub fn import_decl(
    module: &str,
    hiding: bool,
    items: &[&str],
    alias: Option<&str>,
) -> Option<SyntaxNode> {
    let mut template = format!("import {}", module);
    if hiding {
        template.push_str(" hiding");
    }
    if !items.is_empty() {
        template.push_str(&format!(" ({})", items.join(", ")));
    }
    if let Some(alias) = alias {
        template.push_str(&format!(" as {}", alias));
    }
    first_of(&template, NodeKind::ImportDecl)
}

fn import_item(text: &str, kind: NodeKind) -> Option<SyntaxNode> {
    first_of(&format!("import M ({})", text), kind)
}

pub fn value_item(name: &str) -> Option<SyntaxNode> {
    import_item(name, NodeKind::ItemValue)
}

/// `(<>)`
pub fn operator_item(op: &str) -> Option<SyntaxNode> {
    import_item(&format!("({})", op), NodeKind::ItemOperator)
}

/// `type (~>)`
pub fn type_operator_item(op: &str) -> Option<SyntaxNode> {
    import_item(&format!("type ({})", op), NodeKind::ItemTypeOperator)
}

pub fn class_item(name: &str) -> Option<SyntaxNode> {
    import_item(&format!("class {}", name), NodeKind::ItemClass)
}

pub fn kind_item(name: &str) -> Option<SyntaxNode> {
    import_item(&format!("kind {}", name), NodeKind::ItemKind)
}

/// `Maybe`, `Maybe(..)` or `Maybe(Just, Nothing)`
pub fn data_item(name: &str, members: Option<&DataMembers>) -> Option<SyntaxNode> {
    let text = match members {
        None => name.to_string(),
        Some(DataMembers::All) => format!("{}(..)", name),
        Some(DataMembers::Explicit(ctors)) => format!("{}({})", name, ctors.join(", ")),
    };
    import_item(&text, NodeKind::ItemType)
}

/// A variable reference expression. Anything beyond a single name, such
/// as `a b` or `a + b`, is rejected.
pub fn identifier(name: &str) -> Option<SyntaxNode> {
    let node = first_of(&format!("x = {}", name), NodeKind::ExprVar)?;
    (node.text() == name).then_some(node)
}

/// `(expr)`
pub fn parenthesized(expr: &str) -> Option<SyntaxNode> {
    let text = format!("({})", expr);
    let node = first_of(&format!("x = {}", text), NodeKind::ExprParens)?;
    (node.text() == text).then_some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::views::{ImportDecl, ImportItem, ImportItemKind};

    #[test]
    fn test_module_name() {
        let node = module_name("Data.Maybe").unwrap();
        assert_eq!(node.text(), "Data.Maybe");
        assert!(module_name("data").is_none());
    }

    #[test]
    fn test_import_decl() {
        let node = import_decl("Data.Map", true, &["insert", "class Ord"], Some("M")).unwrap();
        let import = ImportDecl::cast(&node).unwrap();
        assert!(import.is_hiding());
        assert_eq!(import.named_imports(), vec!["insert", "Ord"]);
        assert_eq!(import.name().as_deref(), Some("M"));

        let open = import_decl("Prelude", false, &[], None).unwrap();
        assert_eq!(open.text(), "import Prelude");
    }

    #[test]
    fn test_import_items() {
        let cases = [
            (value_item("map"), ImportItemKind::Value, "map"),
            (operator_item("<$>"), ImportItemKind::Operator, "<$>"),
            (type_operator_item("~>"), ImportItemKind::TypeOperator, "~>"),
            (class_item("Functor"), ImportItemKind::Class, "Functor"),
            (kind_item("Row"), ImportItemKind::Kind, "Row"),
            (data_item("Maybe", Some(&DataMembers::All)), ImportItemKind::Type, "Maybe"),
        ];
        for (node, kind, name) in cases {
            let node = node.unwrap();
            let item = ImportItem::cast(&node).unwrap();
            assert_eq!(item.kind(), kind);
            assert_eq!(item.name().as_deref(), Some(name));
        }

        let ctors = DataMembers::Explicit(vec!["Left".into(), "Right".into()]);
        let node = data_item("Either", Some(&ctors)).unwrap();
        assert_eq!(node.text(), "Either(Left, Right)");
        assert_eq!(ImportItem::cast(&node).unwrap().data_members(), Some(ctors));
    }

    #[test]
    fn test_expressions() {
        assert_eq!(identifier("foo").unwrap().text(), "foo");
        assert!(identifier("where").is_none());
        assert!(identifier("a b").is_none());
        assert!(identifier("a + b").is_none());
        assert!(identifier(" a").is_none());
        let parens = parenthesized("a + b").unwrap();
        assert_eq!(parens.text(), "(a + b)");
        assert!(parenthesized("a +").is_none());
        assert!(parenthesized("a) + (b").is_none());
    }
}
