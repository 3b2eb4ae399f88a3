//! YAML text codec.
//!
//! Translates between the in-memory [`Node`] tree and its on-disk text
//! form. Parsing is delegated to `serde_yaml`; emission is owned by this
//! module because the output conventions are fixed for interoperability
//! with files produced by earlier versions of this system: block style
//! collections, indentation width 4, Unix line endings, non-canonical form.
//! Empty mappings and sequences are the one flow-style concession (`{}` and
//! `[]`), since block style cannot express them.

use crate::tree::{Node, Value};

/// Indentation width of emitted documents.
const INDENT: usize = 4;

/// Parses a YAML document into a tree.
///
/// Returns `None` when the text is not a usable mapping: empty input, a
/// malformed document, or a document whose root (or any key) is not a
/// string-keyed mapping. Callers treat all of these as an empty document
/// rather than an error.
pub fn parse(text: &str) -> Option<Node> {
    // serde_yaml reads a blank document as an empty mapping; callers need
    // the "no usable mapping" signal instead.
    if text.trim().is_empty() {
        return None;
    }
    serde_yaml::from_str(text).ok()
}

/// Serializes a tree to YAML text.
///
/// The whole tree is emitted every time; there is no partial serialization.
/// An empty tree emits `{}` so the document stays a valid mapping.
pub fn emit(root: &Node) -> String {
    if root.is_empty() {
        return "{}\n".to_string();
    }
    let mut out = String::new();
    emit_node(&mut out, root, 0);
    out
}

fn emit_node(out: &mut String, node: &Node, depth: usize) {
    for (key, value) in node.iter() {
        push_indent(out, depth);
        out.push_str(&quote_str(key));
        match value {
            Value::Node(child) if !child.is_empty() => {
                out.push_str(":\n");
                emit_node(out, child, depth + 1);
            }
            Value::Node(_) => out.push_str(": {}\n"),
            Value::List(items) if !items.is_empty() => {
                out.push_str(":\n");
                emit_list(out, items, depth + 1);
            }
            Value::List(_) => out.push_str(": []\n"),
            leaf => {
                out.push_str(": ");
                out.push_str(&emit_leaf(leaf));
                out.push('\n');
            }
        }
    }
}

fn emit_list(out: &mut String, items: &[Value], depth: usize) {
    for item in items {
        push_indent(out, depth);
        match item {
            Value::Node(child) if !child.is_empty() => {
                out.push_str("-\n");
                emit_node(out, child, depth + 1);
            }
            Value::Node(_) => out.push_str("- {}\n"),
            Value::List(inner) if !inner.is_empty() => {
                out.push_str("-\n");
                emit_list(out, inner, depth + 1);
            }
            Value::List(_) => out.push_str("- []\n"),
            leaf => {
                out.push_str("- ");
                out.push_str(&emit_leaf(leaf));
                out.push('\n');
            }
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth * INDENT {
        out.push(' ');
    }
}

fn emit_leaf(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(x) => emit_float(*x),
        Value::Text(s) => quote_str(s),
        // callers route branch values through emit_node/emit_list
        Value::Node(_) | Value::List(_) => unreachable!(),
    }
}

fn emit_float(x: f64) -> String {
    if x.is_nan() {
        ".nan".to_string()
    } else if x == f64::INFINITY {
        ".inf".to_string()
    } else if x == f64::NEG_INFINITY {
        "-.inf".to_string()
    } else {
        // Debug formatting keeps a trailing ".0" so the value reparses as
        // a float rather than an integer.
        format!("{x:?}")
    }
}

fn quote_str(s: &str) -> String {
    if s.chars().any(|c| c.is_control()) {
        double_quoted(s)
    } else if is_plain(s) {
        s.to_string()
    } else {
        single_quoted(s)
    }
}

/// Whether a string can be emitted as a plain (unquoted) scalar and still
/// reparse as the same string.
fn is_plain(s: &str) -> bool {
    if s.is_empty() || s.trim() != s {
        return false;
    }
    if masquerades_as_other_scalar(s) {
        return false;
    }
    let Some(first) = s.chars().next() else {
        return false;
    };
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) {
        return false;
    }
    for (i, c) in s.char_indices() {
        match c {
            // ": " and a trailing ":" terminate a plain scalar
            ':' if i + 1 == s.len() || s[i + 1..].starts_with(' ') => return false,
            // " #" starts a comment
            '#' if i > 0 && s.as_bytes()[i - 1] == b' ' => return false,
            _ => {}
        }
    }
    true
}

/// Strings that a YAML parser would read back as null/bool/number.
fn masquerades_as_other_scalar(s: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "null", "~", "true", "false", "yes", "no", "on", "off", ".nan", ".inf", "-.inf",
    ];
    KEYWORDS.iter().any(|k| s.eq_ignore_ascii_case(k))
        || s.parse::<i64>().is_ok()
        || s.parse::<f64>().is_ok()
        || looks_like_prefixed_integer(s)
}

/// Integer forms `str::parse` rejects but the YAML parser reads as
/// numbers: `0x`/`0o`/`0b` radix prefixes and `_` digit separators.
fn looks_like_prefixed_integer(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (radix, digits) = if let Some(hex) = body.strip_prefix("0x") {
        (16, hex)
    } else if let Some(oct) = body.strip_prefix("0o") {
        (8, oct)
    } else if let Some(bin) = body.strip_prefix("0b") {
        (2, bin)
    } else {
        (10, body)
    };
    !digits.is_empty() && digits.chars().all(|c| c == '_' || c.is_digit(radix))
}

fn single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
