//! Asset classification and embedding. Every file under the asset root
//! is either compiled into the binary or staged next to it, decided by
//! its `.jmeta` sidecar.

use std::fs;
use std::path::{Path, PathBuf};

use jice_io::{atomic_write, collect_files_skipping};
use jice_project::{make_envelope, path_symbol, verify_envelope, DocumentKind};
use serde_json::{json, Value};

use crate::codegen::{byte_array_lines, rust_string_literal, BANNER};
use crate::error::CompileError;
use crate::report::CompileReport;

pub const SIDECAR_EXTENSION: &str = ".jmeta";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetMode {
    /// Bytes embedded into the generated program.
    Compile,
    /// File staged under `out/assets/` and loaded at runtime.
    Copy,
}

/// One classified asset. `symbol` doubles as the generated module name
/// and is unique because `path_symbol` is injective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUnit {
    pub rel: String,
    pub symbol: String,
    pub mode: AssetMode,
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut sidecar = path.as_os_str().to_os_string();
    sidecar.push(SIDECAR_EXTENSION);
    PathBuf::from(sidecar)
}

fn read_sidecar(
    sidecar: &Path,
    rel: &str,
    report: &mut CompileReport,
) -> Result<AssetMode, String> {
    let text = fs::read_to_string(sidecar).map_err(|err| err.to_string())?;
    let value: Value = serde_json::from_str(&text).map_err(|err| err.to_string())?;
    let data = verify_envelope(&value, DocumentKind::Meta).map_err(|err| err.to_string())?;
    match data.get("mode").and_then(Value::as_str) {
        Some("copy") => Ok(AssetMode::Copy),
        Some("compile") => Ok(AssetMode::Compile),
        Some(other) => {
            report.warn(format!(
                "asset '{rel}': unknown sidecar mode '{other}', using compile"
            ));
            Ok(AssetMode::Compile)
        }
        None => {
            report.warn(format!("asset '{rel}': sidecar has no mode, using compile"));
            Ok(AssetMode::Compile)
        }
    }
}

/// Decides the mode for one asset. A missing sidecar is created with
/// the compile default; an unreadable one is left alone and only
/// overrides the default for this run.
fn classify(path: &Path, rel: &str, report: &mut CompileReport) -> AssetMode {
    let sidecar = sidecar_path(path);
    if sidecar.exists() {
        match read_sidecar(&sidecar, rel, report) {
            Ok(mode) => mode,
            Err(message) => {
                report.warn(format!(
                    "asset '{rel}': sidecar unusable ({message}), using compile"
                ));
                AssetMode::Compile
            }
        }
    } else {
        report.warn(format!(
            "asset '{rel}': no sidecar, creating one with compile mode"
        ));
        let envelope = make_envelope(DocumentKind::Meta, json!({ "mode": "compile" }));
        match serde_json::to_string_pretty(&envelope) {
            Ok(text) => {
                if let Err(err) = atomic_write(&sidecar, text.as_bytes()) {
                    report.warn(format!("asset '{rel}': could not write sidecar ({err})"));
                }
            }
            Err(err) => {
                report.warn(format!("asset '{rel}': could not encode sidecar ({err})"));
            }
        }
        AssetMode::Compile
    }
}

fn render_asset_module(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 5 + 128);
    out.push_str(BANNER);
    out.push('\n');
    out.push_str(&format!("pub static DATA: [u8; {}] = [\n", bytes.len()));
    out.push_str(&byte_array_lines(bytes));
    out.push_str("];\n\n");
    out.push_str(&format!("pub const LEN: usize = {};\n", bytes.len()));
    out
}

/// Walks the asset root (sorted, sidecars skipped), classifies each
/// file, embeds or stages it, and returns the units in walk order.
pub fn classify_and_emit(
    asset_root: &Path,
    src_root: &Path,
    out_root: &Path,
    report: &mut CompileReport,
) -> Result<Vec<AssetUnit>, CompileError> {
    let files = collect_files_skipping(asset_root, SIDECAR_EXTENSION)?;
    let mut units = Vec::with_capacity(files.len());
    for file in files {
        let mode = classify(&file.path, &file.rel, report);
        let symbol = path_symbol(&file.rel);
        match mode {
            AssetMode::Compile => {
                let bytes = match fs::read(&file.path) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        report.fail_unit(
                            &format!("asset '{}'", file.rel),
                            format!("read failed: {err}"),
                        );
                        continue;
                    }
                };
                let dest = src_root.join("assets").join(format!("{}.rs", file.rel));
                if let Err(err) = atomic_write(&dest, render_asset_module(&bytes).as_bytes()) {
                    report.fail_unit(
                        &format!("asset '{}'", file.rel),
                        format!("write failed: {err}"),
                    );
                    continue;
                }
                report.assets_embedded += 1;
                units.push(AssetUnit {
                    rel: file.rel,
                    symbol,
                    mode,
                });
            }
            AssetMode::Copy => {
                let bytes = match fs::read(&file.path) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        report.fail_unit(
                            &format!("asset '{}'", file.rel),
                            format!("read failed: {err}"),
                        );
                        continue;
                    }
                };
                let dest = out_root.join("assets").join(&file.rel);
                if let Err(err) = atomic_write(&dest, &bytes) {
                    report.fail_unit(
                        &format!("asset '{}'", file.rel),
                        format!("copy failed: {err}"),
                    );
                    continue;
                }
                report.assets_copied += 1;
                units.push(AssetUnit {
                    rel: file.rel,
                    symbol,
                    mode,
                });
            }
        }
    }
    Ok(units)
}

/// The `src/assets/mod.rs` body: one `#[path]` module per embedded
/// asset, named by its path symbol.
pub fn render_assets_index(units: &[AssetUnit]) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    for unit in units.iter().filter(|unit| unit.mode == AssetMode::Compile) {
        out.push_str(&format!(
            "#[path = {}]\n",
            rust_string_literal(&format!("{}.rs", unit.rel))
        ));
        out.push_str(&format!("pub mod {};\n", unit.symbol));
    }
    out
}
