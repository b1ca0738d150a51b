//! Small shared pieces of source emission. Every generated file starts
//! with the banner; string and number formatting lives here so all
//! emitters quote values the same way.

use jice_core::attr::AttrData;

pub const BANNER: &str = "// Generated by jicc. Do not modify.\n";
pub const BANNER_TOML: &str = "# Generated by jicc. Do not modify.\n";

/// Engine version pin emitted near the top of generated modules.
pub fn version_guard() -> String {
    format!(
        "jice_core::check_engine_version!({});\n",
        jice_core::ENGINE_VERSION
    )
}

/// A quoted, escaped Rust string literal.
pub fn rust_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A quoted, escaped TOML basic string.
pub fn toml_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// The expression rebuilding one `AttrData` value at runtime.
pub fn attr_data_expr(data: &AttrData) -> String {
    match data {
        AttrData::None => "AttrData::None".to_string(),
        AttrData::VecF(values) => format!(
            "AttrData::VecF(vec![{}])",
            values
                .iter()
                .map(|v| format_f32(*v))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        AttrData::VecI(values) => format!(
            "AttrData::VecI(vec![{}])",
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        AttrData::Float(v) => format!("AttrData::Float({})", format_f32(*v)),
        AttrData::Int(v) => format!("AttrData::Int({v})"),
        AttrData::Str(s) => format!("AttrData::Str({}.to_string())", rust_string_literal(s)),
    }
}

fn format_f32(v: f32) -> String {
    if v == v.trunc() {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Byte rows for an embedded asset array, sixteen to a line.
pub fn byte_array_lines(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 5);
    for chunk in bytes.chunks(16) {
        let line: Vec<String> = chunk.iter().map(|b| b.to_string()).collect();
        out.push_str("    ");
        out.push_str(&line.join(", "));
        out.push_str(",\n");
    }
    out
}

/// Clamps a sanitized version to the three numeric dot parts the build
/// descriptor needs, trimming leading zeros per part.
pub fn semver_pad(version: &str) -> String {
    let mut parts: Vec<String> = version
        .split('.')
        .take(3)
        .map(|part| {
            let trimmed = part.trim_start_matches('0');
            if trimmed.is_empty() {
                "0".to_string()
            } else {
                trimmed.to_string()
            }
        })
        .collect();
    while parts.len() < 3 {
        parts.push("0".to_string());
    }
    parts.join(".")
}

/// Package name for the build descriptor. Cargo refuses names that
/// start with a digit, so those get a prefix.
pub fn package_name(id: &str) -> String {
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        format!("g{id}")
    } else {
        id.to_string()
    }
}

/// How the package is referred to from generated Rust code.
pub fn crate_ident(package: &str) -> String {
    package.replace('-', "_")
}
