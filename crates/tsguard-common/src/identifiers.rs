//! JavaScript identifier helpers.
//!
//! Generated validator names are built from type ids and property keys. Keys
//! are arbitrary strings, so they are escaped into identifier-safe segments
//! before being appended to a name. The compiler uses the same validity check
//! to decide between `object.key` and `object["key"]`.

const RESERVED_WORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
];

/// Returns `true` for words that cannot be used as a plain identifier.
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

#[inline]
fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

#[inline]
fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Check whether `name` can be emitted as a bare JavaScript identifier.
///
/// Only the ASCII subset is accepted; anything else is emitted through
/// element access with a string literal, which is always valid.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => {}
        _ => return false,
    }
    chars.all(is_identifier_part) && !is_reserved_word(name)
}

/// Escape an arbitrary string into a segment that can be appended to an
/// identifier.
///
/// ASCII letters, digits and `_` are kept. Every other character is written
/// as `$` followed by its lowercase hex code point and a closing `$`, so the
/// mapping is injective: `a-b` becomes `a$2d$b`.
pub fn escape_identifier_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for ch in segment.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push('$');
            out.push_str(&format!("{:x}", ch as u32));
            out.push('$');
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/identifiers_tests.rs"]
mod tests;
