//! Script wrapping. Each user script is re-emitted under `src/scripts/`
//! with a version guard, a prelude import, and a generated dispatcher
//! bound to a hashed symbol. The script's type is named by its file stem
//! and must provide `fn new(ObjectId) -> Self`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use jice_io::{atomic_write, collect_files_with_extension};
use jice_project::path_symbol;
use sha2::{Digest, Sha256};

use crate::codegen::{rust_string_literal, version_guard, BANNER};
use crate::error::CompileError;
use crate::report::CompileReport;

/// One wrapped script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptUnit {
    /// Runtime dispatch key: relative path minus extension, forward
    /// slashes.
    pub stem: String,
    /// Source path relative to the script root.
    pub rel: String,
    /// Generated module name under `src/scripts/`.
    pub module: String,
    /// Dispatcher function symbol.
    pub symbol: String,
}

/// The dispatcher symbol for a script stem. The hash pins the symbol to
/// the stem with a stable digest, never a platform hasher.
pub fn dispatch_symbol(stem: &str) -> String {
    let digest = Sha256::digest(stem.as_bytes());
    let mut hash = String::with_capacity(16);
    for byte in &digest[..8] {
        hash.push_str(&format!("{byte:02x}"));
    }
    format!("{}_dispatcher_{hash}", path_symbol(stem))
}

/// Every dispatcher symbol claimed during one run. Distinct stems hash
/// apart in practice; a duplicate still fails the build instead of
/// emitting two functions with one name.
#[derive(Debug, Default)]
struct SymbolLedger {
    claimed: HashMap<String, String>,
}

impl SymbolLedger {
    fn claim(&mut self, symbol: &str, rel: &str) -> Result<(), CompileError> {
        if let Some(first) = self.claimed.get(symbol) {
            return Err(CompileError::DispatcherCollision {
                symbol: symbol.to_string(),
                first: first.clone(),
                second: rel.to_string(),
            });
        }
        self.claimed.insert(symbol.to_string(), rel.to_string());
        Ok(())
    }
}

fn script_type(stem: &str) -> &str {
    stem.rsplit('/').next().unwrap_or(stem)
}

fn render_script_module(source: &str, stem: &str, symbol: &str) -> String {
    let mut out = String::with_capacity(source.len() + 512);
    out.push_str(BANNER);
    out.push('\n');
    out.push_str(&version_guard());
    out.push('\n');
    out.push_str("use jice_core::prelude::*;\n\n");
    out.push_str(source);
    if !source.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&format!(
        "pub fn {symbol}(object: ObjectId) -> Box<dyn ScriptAttribute> {{\n"
    ));
    out.push_str(&format!("    Box::new({}::new(object))\n", script_type(stem)));
    out.push_str("}\n");
    out
}

/// Walks the script root (sorted), wraps every `.rs` file, and returns
/// the units in walk order. A duplicate dispatcher symbol is fatal; a
/// per-file read or write failure skips that script only.
pub fn compile_scripts(
    script_root: &Path,
    src_root: &Path,
    report: &mut CompileReport,
) -> Result<Vec<ScriptUnit>, CompileError> {
    let files = collect_files_with_extension(script_root, ".rs")?;
    let mut units = Vec::with_capacity(files.len());
    let mut ledger = SymbolLedger::default();
    for file in files {
        let stem = file
            .rel
            .strip_suffix(".rs")
            .unwrap_or(&file.rel)
            .to_string();
        let symbol = dispatch_symbol(&stem);
        ledger.claim(&symbol, &file.rel)?;
        let source = match fs::read_to_string(&file.path) {
            Ok(source) => source,
            Err(err) => {
                report.fail_unit(
                    &format!("script '{}'", file.rel),
                    format!("read failed: {err}"),
                );
                continue;
            }
        };
        let dest = src_root.join("scripts").join(&file.rel);
        let module_text = render_script_module(&source, &stem, &symbol);
        if let Err(err) = atomic_write(&dest, module_text.as_bytes()) {
            report.fail_unit(
                &format!("script '{}'", file.rel),
                format!("write failed: {err}"),
            );
            continue;
        }
        report.scripts_compiled += 1;
        units.push(ScriptUnit {
            module: path_symbol(&file.rel),
            stem,
            rel: file.rel,
            symbol,
        });
    }
    Ok(units)
}

/// The `src/scripts/mod.rs` body: one `#[path]` module per script.
pub fn render_scripts_index(units: &[ScriptUnit]) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    for unit in units {
        out.push_str(&format!("#[path = {}]\n", rust_string_literal(&unit.rel)));
        out.push_str(&format!("pub mod {};\n", unit.module));
    }
    out
}
