//! Character-class cleaning for everything that flows from project
//! JSON into generated source or display strings. Each field names its
//! class and fallback at the call site; cleaning never fails, it
//! degrades and reports.

pub const DEFAULT_PROJECT_ID: &str = "project";
pub const DEFAULT_PROJECT_NAME: &str = "Project";
pub const DEFAULT_DESCRIPTION: &str = "No description";
pub const DEFAULT_VERSION: &str = "0.0.1";
pub const DEFAULT_AUTHOR: &str = "Unknown";
pub const DEFAULT_OBJECT_ID: &str = "object";

/// Allowed character class for an identifier field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentClass {
    /// ASCII alphanumeric and `_`; `-` in non-leading positions.
    ProjectId,
    /// ASCII alphanumeric and `_` only.
    ObjectId,
}

/// Outcome of one cleaning pass. `dropped` counts removed characters;
/// `fell_back` marks an empty result replaced by the field default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub value: String,
    pub dropped: usize,
    pub fell_back: bool,
}

fn finish(value: String, dropped: usize, fallback: &str) -> Sanitized {
    if value.is_empty() {
        Sanitized {
            value: fallback.to_string(),
            dropped,
            fell_back: true,
        }
    } else {
        Sanitized {
            value,
            dropped,
            fell_back: false,
        }
    }
}

/// Keeps only the characters `class` allows, dropping the rest.
pub fn sanitize_identifier(raw: &str, class: IdentClass, fallback: &str) -> Sanitized {
    let mut value = String::with_capacity(raw.len());
    let mut dropped = 0;
    for c in raw.chars() {
        let allowed = match class {
            IdentClass::ProjectId => {
                c.is_ascii_alphanumeric() || c == '_' || (c == '-' && !value.is_empty())
            }
            IdentClass::ObjectId => c.is_ascii_alphanumeric() || c == '_',
        };
        if allowed {
            value.push(c);
        } else {
            dropped += 1;
        }
    }
    finish(value, dropped, fallback)
}

/// Printable ASCII only, trimmed, with interior whitespace runs
/// collapsed to one space. Whitespace shaping does not count as
/// dropped characters.
pub fn sanitize_text(raw: &str, fallback: &str) -> Sanitized {
    let mut value = String::with_capacity(raw.len());
    let mut dropped = 0;
    let mut pending_space = false;
    for c in raw.chars() {
        if c == ' ' || c == '\t' || c == '\n' || c == '\r' {
            pending_space = true;
            continue;
        }
        if !c.is_ascii() || c.is_ascii_control() {
            dropped += 1;
            continue;
        }
        if pending_space && !value.is_empty() {
            value.push(' ');
        }
        pending_space = false;
        value.push(c);
    }
    finish(value, dropped, fallback)
}

/// ASCII digits separated by single dots. Leading, trailing and
/// doubled dots are dropped along with every other character.
pub fn sanitize_version(raw: &str) -> Sanitized {
    let mut value = String::with_capacity(raw.len());
    let mut dropped = 0;
    for c in raw.chars() {
        match c {
            '0'..='9' => value.push(c),
            '.' if !value.is_empty() && !value.ends_with('.') => value.push('.'),
            _ => dropped += 1,
        }
    }
    while value.ends_with('.') {
        value.pop();
        dropped += 1;
    }
    finish(value, dropped, DEFAULT_VERSION)
}

/// Encodes a normalized relative path as an identifier: leading `_`,
/// separators become `__`, ASCII alphanumerics pass through, anything
/// else becomes `_` plus two lowercase hex digits per byte. Injective
/// over distinct normalized paths since `_` itself escapes as `_5f`.
pub fn path_symbol(rel: &str) -> String {
    let mut symbol = String::with_capacity(rel.len() + 1);
    symbol.push('_');
    for c in rel.chars() {
        if c == '/' || c == '\\' {
            symbol.push_str("__");
        } else if c.is_ascii_alphanumeric() {
            symbol.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                symbol.push_str(&format!("_{byte:02x}"));
            }
        }
    }
    symbol
}
