//! Identifier sanitization and string-literal escaping for generated Python.
//!
//! Every author-supplied name that ends up on the left of an assignment goes
//! through [`sanitize_identifier`]; every author-supplied text that ends up in
//! a string literal goes through [`escape_string_literal`]. Both are pure and
//! deterministic.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Fallback identifier used when sanitization leaves nothing behind.
pub const EMPTY_IDENTIFIER_FALLBACK: &str = "input_1";

/// Python 3 reserved keywords.
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Common Python built-in names. Not reserved, but shadowing them is confusing.
pub const PYTHON_BUILTINS: &[&str] = &[
    "abs", "all", "any", "bin", "bool", "bytes", "callable", "chr", "classmethod", "compile",
    "complex", "delattr", "dict", "dir", "divmod", "enumerate", "eval", "exec", "filter", "float",
    "format", "frozenset", "getattr", "globals", "hasattr", "hash", "help", "hex", "id", "input",
    "int", "isinstance", "issubclass", "iter", "len", "list", "locals", "map", "max", "memoryview",
    "min", "next", "object", "oct", "open", "ord", "pow", "print", "property", "range", "repr",
    "reversed", "round", "set", "setattr", "slice", "sorted", "staticmethod", "str", "sum",
    "super", "tuple", "type", "vars", "zip",
];

static KEYWORDS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| PYTHON_KEYWORDS.iter().copied().collect());
static BUILTINS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| PYTHON_BUILTINS.iter().copied().collect());

/// Options for [`sanitize_identifier_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Return [`EMPTY_IDENTIFIER_FALLBACK`] instead of an empty string.
    pub empty_fallback: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self { empty_fallback: true }
    }
}

/// Wrap `value` in single quotes, escaping backslashes, single quotes and
/// newlines (in that order).
pub fn escape_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Sanitize `name` into a valid identifier, falling back to `input_1` when
/// nothing survives.
pub fn sanitize_identifier(name: &str) -> String {
    sanitize_identifier_with(name, SanitizeOptions::default())
}

/// Sanitize `name` into a valid identifier.
///
/// Whitespace runs collapse to `_`, characters outside `[0-9A-Za-z_]` are
/// removed, then leading characters that are not a letter or `_` are removed.
/// The output is either empty or matches `^[A-Za-z_][A-Za-z0-9_]*$`.
pub fn sanitize_identifier_with(name: &str, opts: SanitizeOptions) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for ch in name.chars() {
        if is_separator_space(ch) {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        }
    }

    let trimmed = out.trim_start_matches(|c: char| !(c.is_ascii_alphabetic() || c == '_'));

    if trimmed.is_empty() && opts.empty_fallback {
        return EMPTY_IDENTIFIER_FALLBACK.to_string();
    }
    trimmed.to_string()
}

/// Whitespace that collapses to `_` in identifiers: Unicode `White_Space`
/// minus U+0085 (NEL), plus U+FEFF (BOM). Same set as an ECMAScript `\s`.
fn is_separator_space(ch: char) -> bool {
    match ch {
        '\u{85}' => false,
        '\u{feff}' => true,
        _ => ch.is_whitespace(),
    }
}

/// Case-sensitive check against the Python keyword table.
pub fn is_reserved_word(name: &str) -> bool {
    KEYWORDS.contains(name)
}

/// Case-sensitive check against the Python built-in name table.
pub fn is_standard_library_name(name: &str) -> bool {
    BUILTINS.contains(name)
}

/// Outcome of [`validate_identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierValidation {
    pub valid: bool,
    pub is_reserved_word: bool,
    pub is_standard_library_name: bool,
    pub sanitized_name: String,
    pub warnings: Vec<String>,
}

/// Sanitize `name` and classify the result.
///
/// A reserved word is invalid. A built-in collision is valid but produces a
/// warning.
pub fn validate_identifier(name: &str) -> IdentifierValidation {
    let sanitized_name = sanitize_identifier(name);
    let reserved = is_reserved_word(&sanitized_name);
    let builtin = is_standard_library_name(&sanitized_name);

    let mut warnings = Vec::new();
    if reserved {
        warnings.push(format!(
            "\"{sanitized_name}\" is a Python reserved keyword and cannot be used as a variable name."
        ));
    }
    if builtin {
        warnings.push(format!(
            "\"{sanitized_name}\" shadows a Python built-in function. This may cause unexpected behavior."
        ));
    }

    IdentifierValidation {
        valid: !reserved,
        is_reserved_word: reserved,
        is_standard_library_name: builtin,
        sanitized_name,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escape_basic() {
        assert_eq!(escape_string_literal(""), "''");
        assert_eq!(escape_string_literal("Hello World"), "'Hello World'");
        assert_eq!(escape_string_literal("It's"), "'It\\'s'");
        assert_eq!(escape_string_literal("a\\b"), "'a\\\\b'");
        assert_eq!(escape_string_literal("line1\nline2"), "'line1\\nline2'");
    }

    #[test]
    fn escape_backslash_before_quote() {
        // A literal backslash followed by a quote must not merge into one escape.
        assert_eq!(escape_string_literal("\\'"), "'\\\\\\''");
    }

    #[test]
    fn sanitize_examples() {
        assert_eq!(sanitize_identifier("my var"), "my_var");
        assert_eq!(sanitize_identifier("my   var\tname"), "my_var_name");
        assert_eq!(sanitize_identifier("my-value-name"), "myvaluename");
        assert_eq!(sanitize_identifier("123abc"), "abc");
        assert_eq!(sanitize_identifier("_private"), "_private");
        assert_eq!(sanitize_identifier(" leading"), "_leading");
        assert_eq!(sanitize_identifier("ünïcode"), "ncode");
    }

    #[test]
    fn sanitize_whitespace_class() {
        assert_eq!(sanitize_identifier("a\u{feff}b"), "a_b");
        assert_eq!(sanitize_identifier("a\u{a0}\u{3000}b"), "a_b");
        assert_eq!(sanitize_identifier("a\u{2028}b"), "a_b");
        assert_eq!(sanitize_identifier("a\u{85}b"), "ab");
    }

    #[test]
    fn sanitize_empty_fallback() {
        assert_eq!(sanitize_identifier(""), "input_1");
        assert_eq!(sanitize_identifier("123"), "input_1");
        assert_eq!(sanitize_identifier("!!!"), "input_1");

        let opts = SanitizeOptions { empty_fallback: false };
        assert_eq!(sanitize_identifier_with("123", opts), "");
        assert_eq!(sanitize_identifier_with("", opts), "");
    }

    #[test]
    fn keyword_checks_are_case_sensitive() {
        assert!(is_reserved_word("class"));
        assert!(is_reserved_word("None"));
        assert!(!is_reserved_word("Class"));
        assert!(!is_reserved_word("none"));
        assert!(is_standard_library_name("print"));
        assert!(!is_standard_library_name("Print"));
    }

    #[test]
    fn validate_reserved_word() {
        let v = validate_identifier("class");
        assert!(!v.valid);
        assert!(v.is_reserved_word);
        assert_eq!(
            v.warnings,
            vec!["\"class\" is a Python reserved keyword and cannot be used as a variable name."]
        );
    }

    #[test]
    fn validate_builtin_is_valid_with_warning() {
        let v = validate_identifier("print");
        assert!(v.valid);
        assert!(v.is_standard_library_name);
        assert_eq!(
            v.warnings,
            vec!["\"print\" shadows a Python built-in function. This may cause unexpected behavior."]
        );
    }

    #[test]
    fn validate_plain_name() {
        let v = validate_identifier("my var");
        assert!(v.valid);
        assert_eq!(v.sanitized_name, "my_var");
        assert!(v.warnings.is_empty());
    }

    fn unescape(lit: &str) -> String {
        let inner = &lit[1..lit.len() - 1];
        let mut out = String::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') => out.push('\n'),
                    Some(other) => out.push(other),
                    None => out.push('\\'),
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    proptest! {
        #[test]
        fn sanitized_is_identifier_or_empty(s in ".*") {
            let out = sanitize_identifier_with(&s, SanitizeOptions { empty_fallback: false });
            if let Some(first) = out.chars().next() {
                prop_assert!(first.is_ascii_alphabetic() || first == '_');
                prop_assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
            }
        }

        #[test]
        fn sanitize_is_idempotent(s in ".*") {
            let once = sanitize_identifier(&s);
            prop_assert_eq!(sanitize_identifier(&once), once.clone());
        }

        #[test]
        fn escape_round_trips(s in ".*") {
            let lit = escape_string_literal(&s);
            prop_assert!(lit.starts_with('\'') && lit.ends_with('\''));
            prop_assert_eq!(unescape(&lit), s);
        }
    }
}
