use std::process::ExitCode;

use purescript_syntax::lexer::{lex_with_tab_width, tokenize};
use purescript_syntax::{ModuleParser, ParseOptions};

const SECTIONS: &[&str] = &["--tokens", "--layout", "--tree", "--errors"];

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <purescript-file> [--tokens] [--layout] [--tree] [--errors]", args[0]);
        eprintln!("\nOr pipe PureScript code to stdin:");
        eprintln!("  echo 'module Main where' | {} -", args[0]);
        return ExitCode::FAILURE;
    }

    let flags: Vec<&str> = args[2..].iter().map(String::as_str).collect();
    if let Some(unknown) = flags.iter().find(|f| !SECTIONS.contains(*f)) {
        eprintln!("Unknown option '{}'", unknown);
        return ExitCode::FAILURE;
    }
    let show = |section: &str| flags.is_empty() || flags.contains(&section);

    // Read from file or stdin
    let source = if args[1] == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
            eprintln!("Error reading from stdin: {}", e);
            return ExitCode::FAILURE;
        }
        buffer
    } else {
        match std::fs::read_to_string(&args[1]) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", args[1], e);
                return ExitCode::FAILURE;
            }
        }
    };

    let options = ParseOptions::default();

    if show("--tokens") {
        let tokens: Vec<_> = tokenize(&source).collect();
        println!("Lexed {} tokens:", tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            println!("{:4}: {:?} @ {}..{} {:?}", i, token.kind, token.span.start, token.span.end, token.text);
        }
    }

    if show("--layout") {
        let tokens = lex_with_tab_width(&source, options.tab_width);
        println!("Layout stream:");
        for token in tokens.iter().filter(|t| !t.kind.is_trivia()) {
            println!("  {:?} @ {}..{}", token.kind, token.span.start, token.span.end);
        }
    }

    let parse = match ModuleParser::new().options(options).parse(&source) {
        Ok(parse) => parse,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if show("--tree") {
        print!("{}", parse.root.debug_dump());
    }

    if show("--errors") {
        println!("{} error(s)", parse.errors.len());
        for error in &parse.errors {
            match error.span.to_pos(&source) {
                Some((start, _)) => println!("  {} [{}]: {}", start, error.code(), error),
                None => println!("  {} [{}]: {}", error.span, error.code(), error),
            }
        }
    }

    if parse.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
