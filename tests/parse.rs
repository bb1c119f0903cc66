//! Fixture-based integration tests.
//!
//! Parses all PureScript files under tests/fixtures/ and checks they come
//! back as clean, lossless trees, then exercises the public parsing API on
//! smaller inputs.

use std::path::{Path, PathBuf};

use purescript_syntax::cst::views::{ImportDecl, ModuleHeader};
use purescript_syntax::fixity::{Associativity, Fixity, Namespace, OperatorTable};
use purescript_syntax::parser::{CancelFn, Deadline};
use purescript_syntax::{parse, ModuleParser, NodeKind, ParseOptions, SyntaxNode};

fn collect_purs_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_purs_files(&path, files);
            } else if path.extension().is_some_and(|e| e == "purs") {
                files.push(path);
            }
        }
    }
}

fn find(root: &SyntaxNode, kind: NodeKind) -> &SyntaxNode {
    root.descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {:?} node", kind))
}

/// `(lhs op rhs)` for operator chains, source text for everything else
fn shape(node: &SyntaxNode) -> String {
    match node.kind() {
        NodeKind::ExprBinary => {
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
fn parse_all_fixture_files() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut files = Vec::new();
    collect_purs_files(&fixtures_dir, &mut files);
    files.sort();
    assert!(!files.is_empty(), "Expected fixture files");

    let mut failed = Vec::new();
    let mut total_bytes = 0u64;
    let start = std::time::Instant::now();

    for path in &files {
        let source = std::fs::read_to_string(path).unwrap();
        total_bytes += source.len() as u64;
        let result = parse(&source);
        assert_eq!(result.root.text(), source, "{} does not round-trip", path.display());
        for error in &result.errors {
            let pos = match error.span.to_pos(&source) {
                Some((start, end)) => format!("{}..{}", start, end),
                None => "unknown position".to_string(),
            };
            failed.push(format!("  {}:{}: {}", path.display(), pos, error));
        }
    }

    let elapsed = start.elapsed();
    println!("\n=== Fixture Parse Results ===");
    println!("Files:      {}", files.len());
    println!("Bytes:      {total_bytes}");
    println!("Time:       {:.3}s", elapsed.as_secs_f64());

    if !failed.is_empty() {
        panic!("{} errors in fixtures:\n{}", failed.len(), failed.join("\n"));
    }
}

#[test]
fn parse_fixture_structure() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Shapes.purs");
    let source = std::fs::read_to_string(path).unwrap();
    let result = parse(&source);

    let header = ModuleHeader::of_module(&result.root).unwrap();
    assert_eq!(header.name().as_deref(), Some("Data.Shape"));
    assert_eq!(header.exports().unwrap().len(), 7);

    let imports = ImportDecl::all(&result.root);
    let names: Vec<_> = imports.iter().filter_map(|i| i.name()).collect();
    assert_eq!(names, vec!["Prelude", "Array", "Data.Maybe", "Effect", "Effect.Console"]);

    // The fixity declared mid-file is part of the returned table
    assert_eq!(
        result.operators.get(Namespace::Value, "<+>"),
        Some(Fixity::new(Associativity::Left, 6))
    );
}

#[test]
fn parse_do_block_has_two_statements() {
    let result = parse("f x = do\n  a\n  b\n");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let block = find(&result.root, NodeKind::ExprDo);
    let statements: Vec<_> = block.child_nodes().map(|n| n.kind()).collect();
    assert_eq!(statements, vec![NodeKind::DoDiscard, NodeKind::DoDiscard]);
}

#[test]
fn parse_precedence_from_seed_table() {
    let mut table = OperatorTable::new();
    table.insert(Namespace::Value, "+", Fixity::new(Associativity::Left, 6));
    table.insert(Namespace::Value, "*", Fixity::new(Associativity::Left, 7));
    let result = ModuleParser::new()
        .operators(&table)
        .parse("x = 1 + 2 * 3")
        .unwrap();
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let rhs = find(&result.root, NodeKind::UnguardedRhs);
    assert_eq!(shape(rhs.child_nodes().next().unwrap()), "(1 + (2 * 3))");
}

#[test]
fn parse_operator_declared_below_its_use() {
    let source = "x = a |> b <| c\ninfixl 1 applyFlipped as |>\ninfixr 0 apply as <|";
    let result = parse(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let rhs = find(&result.root, NodeKind::UnguardedRhs);
    assert_eq!(shape(rhs.child_nodes().next().unwrap()), "((a |> b) <| c)");
}

#[test]
fn parse_returned_table_seeds_next_file() {
    let first = parse("infixr 2 alt as <||>");
    let second = ModuleParser::new()
        .options(ParseOptions {
            report_unknown_operators: true,
            ..ParseOptions::default()
        })
        .operators(&first.operators)
        .parse("x = a <||> b <> c")
        .unwrap();
    assert!(second.errors.is_empty(), "{:?}", second.errors);
}

#[test]
fn parse_cancelled_before_first_declaration() {
    let result = ModuleParser::new()
        .cancel(&CancelFn(|| true))
        .parse("x = 1\ny = 2");
    assert!(result.is_err());

    let deadline = Deadline::after(std::time::Duration::from_secs(3600));
    let result = ModuleParser::new().cancel(&deadline).parse("x = 1\ny = 2");
    assert!(result.is_ok());
}

#[test]
fn parse_cancelled_between_declarations() {
    let polls = std::cell::Cell::new(0);
    let check = CancelFn(|| {
        polls.set(polls.get() + 1);
        polls.get() > 2
    });
    let result = ModuleParser::new()
        .cancel(&check)
        .parse("x = 1\ny = 2\nz = 3\nw = 4");
    assert!(result.is_err());
    assert_eq!(polls.get(), 3);
}

#[test]
fn parse_long_left_chain() {
    let source = format!("x = {}1", "a # ".repeat(100_000));
    let result = parse(&source);
    assert!(result.errors.is_empty(), "{:?}", result.errors.first());
    assert_eq!(result.root.text(), source);

    let copy = result.root.clone();
    assert_eq!(copy.descendants().count(), result.root.descendants().count());
    drop(copy);
    drop(result);
}

#[test]
fn parse_offset_lookup() {
    let source = "f = g 1\n  where g x = x";
    let result = parse(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let offset = source.find("1").unwrap();
    assert_eq!(result.root.covering_node(offset).kind(), NodeKind::ExprLiteral);
    assert_eq!(result.root.token_at(offset).unwrap().text, "1");
    let where_offset = source.find("where").unwrap();
    assert_eq!(result.root.covering_node(where_offset).kind(), NodeKind::WhereClause);
}
