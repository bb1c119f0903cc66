//! Decoding of literal token text into values.
//!
//! The lexer keeps literals as raw source slices; these helpers are for tree
//! consumers that need the value (fixity precedences, the element factory,
//! host tooling).

/// Value of a string or raw string token, quotes included in `text`.
pub fn string_value(text: &str) -> Option<String> {
    if text.len() >= 6 && text.starts_with("\"\"\"") && text.ends_with("\"\"\"") {
        return Some(text[3..text.len() - 3].to_string());
    }
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    parse_string(inner)
}

/// Value of a char token, quotes included in `text`.
pub fn char_value(text: &str) -> Option<char> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    parse_char(inner)
}

/// Value of an integer token (decimal, `0x` hex, `0o` octal, `_` separators).
pub fn integer_value(text: &str) -> Option<i64> {
    let clean: String = text.chars().filter(|c| *c != '_').collect();
    if let Some(hex) = clean.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = clean.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()
    } else {
        clean.parse().ok()
    }
}

/// Value of a number token.
pub fn number_value(text: &str) -> Option<f64> {
    let clean: String = text.chars().filter(|c| *c != '_').collect();
    clean.parse().ok()
}

/// Parse string escape sequences
fn parse_string(s: &str) -> Option<String> {
    let mut result = String::new();
    let mut i = 0;
    let bytes = s.as_bytes();

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 1;
            if i >= bytes.len() {
                return None;
            }
            match bytes[i] {
                b'n' => {
                    result.push('\n');
                    i += 1;
                }
                b't' => {
                    result.push('\t');
                    i += 1;
                }
                b'r' => {
                    result.push('\r');
                    i += 1;
                }
                b'\\' | b'"' | b'\'' => {
                    result.push(bytes[i] as char);
                    i += 1;
                }
                b'0' => {
                    result.push('\0');
                    i += 1;
                }
                b'x' | b'u' => {
                    i += 1;
                    let start = i;
                    while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                        i += 1;
                    }
                    let code = u32::from_str_radix(&s[start..i], 16).ok()?;
                    result.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                }
                b' ' | b'\t' | b'\r' | b'\n' => {
                    // String gap: \ whitespace \, skipped
                    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\r' | b'\n') {
                        i += 1;
                    }
                    if i >= bytes.len() || bytes[i] != b'\\' {
                        return None;
                    }
                    i += 1;
                }
                _ => return None,
            }
        } else {
            // Regular character (may be multi-byte UTF-8)
            let c = s[i..].chars().next()?;
            result.push(c);
            i += c.len_utf8();
        }
    }

    Some(result)
}

/// Parse character with escape sequences
fn parse_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let first = chars.next()?;
    if first != '\\' {
        return if chars.next().is_none() {
            Some(first)
        } else {
            None
        };
    }

    let esc = chars.as_str();
    if let Some(hex) = esc.strip_prefix('x').or_else(|| esc.strip_prefix('u')) {
        let code = u32::from_str_radix(hex, 16).ok()?;
        return char::from_u32(code);
    }

    match esc {
        "n" => Some('\n'),
        "t" => Some('\t'),
        "r" => Some('\r'),
        "\\" => Some('\\'),
        "'" => Some('\''),
        "\"" => Some('"'),
        "0" => Some('\0'),
        _ => None,
    }
}
