pub mod layout;
pub mod literal;
pub mod logos_lexer;
pub mod token;

pub use layout::{resolve, BlockKind, LayoutResolver};
pub use logos_lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};

/// Main lexer entry point: lex and process layout
pub fn lex(source: &str) -> Vec<Token<'_>> {
    lex_with_tab_width(source, 8)
}

pub fn lex_with_tab_width(source: &str, tab_width: usize) -> Vec<Token<'_>> {
    // Step 1: Raw lexing with Logos
    let raw_tokens = tokenize(source);

    // Step 2: Layout processing
    LayoutResolver::new(raw_tokens, tab_width).collect()
}
