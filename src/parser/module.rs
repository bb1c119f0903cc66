//! Module structure: header, export list, imports and the declaration list.

use crate::cst::NodeKind;
use crate::lexer::TokenKind;
use crate::parser::{CompletedMarker, Parser};

impl<'t, 'src> Parser<'t, 'src> {
    /// Parse a whole file. The root node owns every token, including leading
    /// trivia and `eof`.
    pub(crate) fn parse_module(&mut self) {
        let root = self.start_raw();

        if self.at(TokenKind::Module) {
            self.parse_module_header();
            if self.eat(TokenKind::LayoutStart) {
                self.parse_top_level_decls();
                self.expect(TokenKind::LayoutEnd);
            } else {
                // Header without `where`: keep going at the root level
                self.parse_top_level_decls();
            }
        } else {
            self.parse_top_level_decls();
        }

        // Whatever the declaration list could not place
        while !self.at_eof() && !self.cancelled {
            self.error_bump(&[]);
        }
        if !self.cancelled {
            self.bump();
        }
        root.complete(self, NodeKind::Module);
    }

    fn parse_module_header(&mut self) {
        let m = self.start();
        self.bump(); // module
        self.parse_module_name();
        if self.at(TokenKind::LParen) {
            self.parse_export_list();
        }
        self.expect(TokenKind::Where);
        m.complete(self, NodeKind::ModuleHeader);
    }

    /// `Data.Maybe`, a single proper or qualified proper name token.
    pub(crate) fn parse_module_name(&mut self) -> Option<CompletedMarker> {
        if self.at_any(&[TokenKind::UpperIdent, TokenKind::QualifiedUpper]) {
            let m = self.start();
            self.bump();
            Some(m.complete(self, NodeKind::ModuleName))
        } else {
            self.error(&[TokenKind::UpperIdent]);
            None
        }
    }

    /// Declarations separated by layout separators, up to the end of the
    /// module block or end of input. Cancellation is polled between items.
    fn parse_top_level_decls(&mut self) {
        loop {
            if self.check_cancelled() {
                break;
            }
            while self.eat(TokenKind::LayoutSep) {}
            if self.at(TokenKind::LayoutEnd) || self.at_eof() {
                break;
            }

            let before = self.cursor;
            self.reset_delims();
            self.parse_decl();
            if self.cursor == before {
                self.error_bump(&[]);
            }

            match self.kind() {
                TokenKind::LayoutSep | TokenKind::LayoutEnd | TokenKind::Eof => {}
                _ => self.recover(&[TokenKind::LayoutSep], &[]),
            }
        }
    }

    fn parse_export_list(&mut self) {
        let m = self.start();
        self.parse_item_list(Self::parse_export_item);
        m.complete(self, NodeKind::ExportList);
    }

    /// `( item, item, ... )`. Bad items are skipped up to the next comma.
    fn parse_item_list(&mut self, item: fn(&mut Self)) {
        self.bump(); // (
        if self.eat(TokenKind::RParen) {
            return;
        }
        loop {
            item(self);
            if !matches!(self.kind(), TokenKind::Comma | TokenKind::RParen) {
                self.recover(&[TokenKind::Comma, TokenKind::RParen], &[TokenKind::Comma]);
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen);
    }

    fn parse_export_item(&mut self) {
        if self.at(TokenKind::Module) {
            let m = self.start();
            self.bump();
            self.parse_module_name();
            m.complete(self, NodeKind::ItemModule);
        } else {
            self.parse_import_item();
        }
    }

    /// One entry of an import or export list.
    pub(crate) fn parse_import_item(&mut self) {
        match self.kind() {
            TokenKind::LowerIdent if self.at_contextual("kind") && self.nth_kind(1) == TokenKind::UpperIdent => {
                let m = self.start();
                self.bump();
                self.bump();
                m.complete(self, NodeKind::ItemKind);
            }
            TokenKind::LowerIdent => {
                let m = self.start();
                self.bump();
                m.complete(self, NodeKind::ItemValue);
            }
            TokenKind::LParen => {
                let m = self.start();
                self.parse_parenthesized_operator();
                m.complete(self, NodeKind::ItemOperator);
            }
            TokenKind::UpperIdent => {
                let m = self.start();
                self.bump();
                if self.at(TokenKind::LParen) {
                    self.parse_data_members();
                }
                m.complete(self, NodeKind::ItemType);
            }
            TokenKind::Type => {
                let m = self.start();
                self.bump();
                if self.at(TokenKind::LParen) {
                    self.parse_parenthesized_operator();
                } else {
                    self.error(&[TokenKind::LParen]);
                }
                m.complete(self, NodeKind::ItemTypeOperator);
            }
            TokenKind::Class => {
                let m = self.start();
                self.bump();
                self.expect(TokenKind::UpperIdent);
                m.complete(self, NodeKind::ItemClass);
            }
            _ => self.recover(
                &[TokenKind::LowerIdent, TokenKind::UpperIdent, TokenKind::LParen],
                &[TokenKind::Comma],
            ),
        }
    }

    /// `(<>)` as a name. The caller owns the surrounding node.
    pub(crate) fn parse_parenthesized_operator(&mut self) {
        self.bump(); // (
        if self.at_any(&[TokenKind::Operator, TokenKind::Colon, TokenKind::QualifiedOperator]) {
            self.bump();
        } else {
            self.error(&[TokenKind::Operator]);
        }
        self.expect(TokenKind::RParen);
    }

    /// `(..)` or `(A, B)` after a type name
    fn parse_data_members(&mut self) {
        let m = self.start();
        self.bump(); // (
        if !self.eat(TokenKind::DoubleDot) && !self.at(TokenKind::RParen) {
            loop {
                if !self.eat(TokenKind::UpperIdent) {
                    self.recover(&[TokenKind::UpperIdent], &[TokenKind::Comma]);
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen);
        m.complete(self, NodeKind::DataMembers);
    }

    /// `import M [hiding] [(items)] [as N]`
    pub(crate) fn parse_import(&mut self) {
        let m = self.start();
        self.bump(); // import
        self.parse_module_name();
        self.eat_contextual("hiding");
        if self.at(TokenKind::LParen) {
            let list = self.start();
            self.parse_item_list(Self::parse_import_item);
            list.complete(self, NodeKind::ImportList);
        }
        if self.at_contextual("as") {
            let alias = self.start();
            self.bump();
            self.parse_module_name();
            alias.complete(self, NodeKind::ImportAlias);
        }
        m.complete(self, NodeKind::ImportDecl);
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::NodeKind;
    use crate::parser::parse;

    #[test]
    fn test_module_header_and_imports() {
        let source = "module Main (main, class Show, Maybe(..), (<>), type (~>), module X) where\n\nimport Prelude\nimport Data.Maybe (Maybe(Just, Nothing), fromMaybe) as M\nimport Data.Array hiding (head)\n";
        let result = parse(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let root = &result.root;
        let header = root.child(NodeKind::ModuleHeader).unwrap();
        assert_eq!(header.child(NodeKind::ModuleName).unwrap().text(), "Main");
        let exports = header.child(NodeKind::ExportList).unwrap();
        let kinds: Vec<_> = exports.child_nodes().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::ItemValue,
                NodeKind::ItemClass,
                NodeKind::ItemType,
                NodeKind::ItemOperator,
                NodeKind::ItemTypeOperator,
                NodeKind::ItemModule
            ]
        );
        let imports: Vec<_> = root
            .child_nodes()
            .filter(|n| n.kind() == NodeKind::ImportDecl)
            .collect();
        assert_eq!(imports.len(), 3);
        assert!(imports[1].child(NodeKind::ImportAlias).is_some());
        assert!(imports[2].child(NodeKind::ImportList).is_some());
        assert_eq!(root.text(), source);
    }

    #[test]
    fn test_header_without_where() {
        let result = parse("module Main\nx = 1");
        assert_eq!(result.errors.len(), 1);
        assert!(result
            .root
            .descendants()
            .any(|n| n.kind() == NodeKind::ValueDecl));
    }

    #[test]
    fn test_bad_export_item_recovers() {
        let result = parse("module Main (main, 42, other) where\nx = 1");
        assert_eq!(result.errors.len(), 1);
        let exports = result.root.descendants().find(|n| n.kind() == NodeKind::ExportList).unwrap();
        let values = exports
            .child_nodes()
            .filter(|n| n.kind() == NodeKind::ItemValue)
            .count();
        assert_eq!(values, 2);
    }
}
