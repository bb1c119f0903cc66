//! Layout resolution through the public lexer API.

use purescript_syntax::lexer::{lex, lex_with_tab_width};
use purescript_syntax::TokenKind;

/// Significant tokens with virtual ones drawn as `{ ; } !`
fn render(source: &str) -> String {
    lex(source)
        .iter()
        .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
        .map(|t| match t.kind {
            TokenKind::LayoutStart => "{".to_string(),
            TokenKind::LayoutSep => ";".to_string(),
            TokenKind::LayoutEnd => "}".to_string(),
            TokenKind::LayoutError(_) => "!".to_string(),
            _ => t.text.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn layout_class_and_instance_bodies() {
    let source = "class Show a where\n  show :: a -> String\n\ninstance showInt :: Show Int where\n  show _ = \"\"";
    assert_eq!(
        render(source),
        "class Show a where { show :: a -> String } ; instance showInt :: Show Int where { show _ = \"\" }"
    );
}

#[test]
fn layout_ignores_comments() {
    let source = "f = do\n  -- first\n  a\n  {- second -}\n  b";
    assert_eq!(render(source), "f = do { a ; b }");
}

#[test]
fn layout_let_inside_do() {
    let source = "main = do\n  let x = 1\n      y = 2\n  pure x";
    assert_eq!(render(source), "main = do { let { x = 1 ; y = 2 } ; pure x }");
}

#[test]
fn layout_block_closed_by_paren() {
    assert_eq!(render("x = (case y of\n  A -> 1)"), "x = ( case y of { A -> 1 } )");
}

#[test]
fn layout_qualified_do() {
    assert_eq!(render("main = Effect.do\n  a\n  b"), "main = Effect.do { a ; b }");
}

#[test]
fn layout_guards_continue_branch() {
    let source = "f x = case x of\n  Just y\n    | y > 0 -> y\n    | otherwise -> 0\n  Nothing -> 0";
    assert_eq!(
        render(source),
        "f x = case x of { Just y | y > 0 -> y | otherwise -> 0 ; Nothing -> 0 }"
    );
}

#[test]
fn layout_where_after_guards() {
    let source = "f x\n  | x > 0 = a\n  | otherwise = b\n  where\n  a = 1\n  b = 2";
    assert_eq!(
        render(source),
        "f x | x > 0 = a | otherwise = b where { a = 1 ; b = 2 }"
    );
}

#[test]
fn layout_if_spanning_lines_in_do() {
    let source = "main = do\n  x <- if a\n    then b\n    else c\n  pure x";
    assert_eq!(render(source), "main = do { x <- if a then b else c ; pure x }");
}

#[test]
fn layout_module_body() {
    let source = "module Main where\n\nimport Prelude\n\nmain = pure unit\n";
    assert_eq!(
        render(source),
        "module Main where { import Prelude ; main = pure unit }"
    );
}

#[test]
fn layout_custom_tab_width() {
    let tokens = lex_with_tab_width("f = do\n\ta\n  b", 2);
    let separators = tokens.iter().filter(|t| t.kind == TokenKind::LayoutSep).count();
    assert_eq!(separators, 1);
}

#[test]
fn layout_virtual_tokens_are_empty_and_lossless() {
    let source = "main = do\n  let x = 1\n  pure x\n  where\n  y = 2\n";
    let tokens = lex(source);
    let text: String = tokens.iter().map(|t| t.text).collect();
    assert_eq!(text, source);
    for token in tokens.iter().filter(|t| t.kind.is_virtual()) {
        assert!(token.span.is_empty(), "{:?}", token);
        assert!(token.text.is_empty());
    }
    let opens = tokens.iter().filter(|t| t.kind == TokenKind::LayoutStart).count();
    let closes = tokens.iter().filter(|t| t.kind == TokenKind::LayoutEnd).count();
    assert_eq!(opens, closes);
}
