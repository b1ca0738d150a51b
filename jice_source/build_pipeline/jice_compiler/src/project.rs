//! The project compiler. Wires the manifest, assets, scripts and
//! scenes into a generated crate under the build root: `src/game.rs`
//! (library entry), `src/main.rs` (executable shim) and a `Cargo.toml`
//! describing both targets.

use std::fs;
use std::path::{Path, PathBuf};

use jice_core::builtin::BuiltinRegistry;
use jice_io::{atomic_write, collect_files_with_extension};
use jice_project::{path_symbol, ProjectDoc, SplashDoc};
use log::info;

use crate::assets::{classify_and_emit, render_assets_index, AssetMode, AssetUnit};
use crate::codegen::{
    crate_ident, package_name, rust_string_literal, semver_pad, toml_string_literal,
    version_guard, BANNER, BANNER_TOML,
};
use crate::error::CompileError;
use crate::report::CompileReport;
use crate::scenes::{compile_scene, render_scenes_index, SceneUnit};
use crate::scripts::{compile_scripts, render_scripts_index, ScriptUnit};

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Seconds the generated program busy-waits before ending the
    /// splash; 0 ends it as soon as startup finishes.
    pub splash_delay_secs: u64,
    /// `jice_core` path written into the generated Cargo.toml.
    pub engine_path: PathBuf,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            splash_delay_secs: 0,
            engine_path: Path::new(env!("CARGO_MANIFEST_DIR")).join("../../runtime/jice_core"),
        }
    }
}

fn resolve_root(project_root: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

/// Claims the splash image out of the general asset list. An enabled
/// splash without a matching compiled asset is a unit failure and the
/// splash is dropped from the build.
fn resolve_splash(
    splash: Option<&SplashDoc>,
    assets: &mut Vec<AssetUnit>,
    report: &mut CompileReport,
) -> Option<AssetUnit> {
    let splash = splash?;
    if !splash.enabled {
        return None;
    }
    if splash.image.is_empty() {
        report.fail_unit("splash screen", "enabled without an image".to_string());
        return None;
    }
    let symbol = path_symbol(&splash.image);
    let position = assets
        .iter()
        .position(|unit| unit.mode == AssetMode::Compile && unit.symbol == symbol);
    match position {
        Some(index) => Some(assets.remove(index)),
        None => {
            report.fail_unit(
                "splash screen",
                format!("image '{}' is not a compiled asset", splash.image),
            );
            None
        }
    }
}

fn render_game(
    manifest: &ProjectDoc,
    assets: &[AssetUnit],
    splash: Option<&AssetUnit>,
    scripts: &[ScriptUnit],
    scenes: &[SceneUnit],
    options: &CompileOptions,
) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    out.push_str("#![allow(nonstandard_style)]\n");
    out.push_str("#![allow(unused_imports, unused_variables, unused_mut, dead_code)]\n\n");
    out.push_str(&version_guard());
    out.push('\n');
    out.push_str("use jice_core::prelude::*;\n\n");
    out.push_str("pub mod assets;\npub mod scenes;\npub mod scripts;\n\n");
    out.push_str("#[unsafe(no_mangle)]\n");
    out.push_str("pub extern \"C\" fn jice_game_main(is_compiled: bool) -> i32 {\n");
    out.push_str(&format!(
        "    let info = EngineInfo::new({}, {}, {}, {}, {});\n",
        rust_string_literal(&manifest.id),
        rust_string_literal(&manifest.name),
        rust_string_literal(&manifest.description),
        rust_string_literal(&manifest.version),
        rust_string_literal(&manifest.author)
    ));
    out.push_str("    let mut engine = Engine::new(info, BuiltinRegistry::standard());\n");
    if let Some(unit) = splash {
        let rel = rust_string_literal(&unit.rel);
        out.push('\n');
        out.push_str(&format!(
            "    engine.add_asset({rel}, Asset::from_bytes(&assets::{}::DATA));\n",
            unit.symbol
        ));
        out.push_str(&format!(
            "    if is_compiled {{\n        engine.begin_splash({rel});\n    }}\n"
        ));
    }
    if !scripts.is_empty() {
        out.push('\n');
    }
    for unit in scripts {
        out.push_str(&format!(
            "    engine.register_script({}, scripts::{}::{});\n",
            rust_string_literal(&unit.stem),
            unit.module,
            unit.symbol
        ));
    }
    if !scenes.is_empty() {
        out.push('\n');
    }
    for unit in scenes {
        out.push_str(&format!(
            "    let scene = scenes::{}::construct(&engine);\n",
            unit.module
        ));
        out.push_str(&format!(
            "    engine.add_scene({name}, scene, SceneHooks {{ setup: scenes::{m}::setup, update: scenes::{m}::update }});\n",
            name = rust_string_literal(&unit.name),
            m = unit.module
        ));
    }
    if !assets.is_empty() {
        out.push('\n');
    }
    for unit in assets {
        let rel = rust_string_literal(&unit.rel);
        match unit.mode {
            AssetMode::Compile => {
                out.push_str(&format!(
                    "    engine.add_asset({rel}, Asset::from_bytes(&assets::{}::DATA));\n",
                    unit.symbol
                ));
            }
            AssetMode::Copy => {
                out.push_str(&format!(
                    "    engine.add_asset({rel}, Asset::from_file({rel}));\n"
                ));
            }
        }
    }
    out.push('\n');
    out.push_str("    engine.load_config(\"game.cfg\");\n");
    if splash.is_some() {
        out.push_str("    if is_compiled {\n");
        if options.splash_delay_secs > 0 {
            out.push_str("        let start = std::time::Instant::now();\n");
            out.push_str(&format!(
                "        while start.elapsed() < std::time::Duration::from_secs({}) {{}}\n",
                options.splash_delay_secs
            ));
        }
        out.push_str("        engine.end_splash();\n");
        out.push_str("    }\n");
    }
    out.push('\n');
    out.push_str("    let mut backend = HeadlessBackend::new();\n");
    out.push_str("    engine.run(&mut backend);\n");
    out.push_str("    0\n");
    out.push_str("}\n");
    out
}

fn render_main(package: &str) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    out.push_str("fn main() {\n");
    out.push_str(&format!(
        "    std::process::exit({}::jice_game_main(true));\n",
        crate_ident(package)
    ));
    out.push_str("}\n");
    out
}

fn generated_sources(
    assets: &[AssetUnit],
    splash: Option<&AssetUnit>,
    scripts: &[ScriptUnit],
    scenes: &[SceneUnit],
) -> Vec<String> {
    let mut sources = vec![
        "src/game.rs".to_string(),
        "src/main.rs".to_string(),
        "src/assets/mod.rs".to_string(),
        "src/scripts/mod.rs".to_string(),
        "src/scenes/mod.rs".to_string(),
    ];
    for unit in splash.into_iter().chain(assets) {
        if unit.mode == AssetMode::Compile {
            sources.push(format!("src/assets/{}.rs", unit.rel));
        }
    }
    for unit in scripts {
        sources.push(format!("src/scripts/{}", unit.rel));
    }
    for unit in scenes {
        sources.push(format!("src/scenes/{}.rs", unit.name));
    }
    sources
}

fn render_cargo_toml(
    manifest: &ProjectDoc,
    assets: &[AssetUnit],
    splash: Option<&AssetUnit>,
    scripts: &[ScriptUnit],
    scenes: &[SceneUnit],
    options: &CompileOptions,
) -> String {
    let package = package_name(&manifest.id);
    let mut out = String::new();
    out.push_str(BANNER_TOML);
    out.push('\n');
    out.push_str("[workspace]\n\n");
    out.push_str("[package]\n");
    out.push_str(&format!("name = {}\n", toml_string_literal(&package)));
    out.push_str(&format!(
        "version = {}\n",
        toml_string_literal(&semver_pad(&manifest.version))
    ));
    out.push_str("edition = \"2024\"\n");
    out.push_str(&format!(
        "description = {}\n",
        toml_string_literal(&manifest.description)
    ));
    out.push_str(&format!(
        "authors = [{}]\n\n",
        toml_string_literal(&manifest.author)
    ));
    out.push_str("[dependencies]\n");
    out.push_str(&format!(
        "jice_core = {{ path = {} }}\n\n",
        toml_string_literal(&options.engine_path.display().to_string())
    ));
    out.push_str("[lib]\n");
    out.push_str(&format!(
        "name = {}\n",
        toml_string_literal(&crate_ident(&package))
    ));
    out.push_str("path = \"src/game.rs\"\n");
    out.push_str("crate-type = [\"cdylib\", \"rlib\"]\n\n");
    out.push_str("[[bin]]\n");
    out.push_str(&format!("name = {}\n", toml_string_literal(&package)));
    out.push_str("path = \"src/main.rs\"\n\n");
    out.push_str("[package.metadata.jice]\n");
    out.push_str(&format!("engine_version = {}\n", jice_core::ENGINE_VERSION));
    out.push_str("out_dir = \"out\"\n");
    out.push_str("sources = [\n");
    for source in generated_sources(assets, splash, scripts, scenes) {
        out.push_str(&format!("    {},\n", toml_string_literal(&source)));
    }
    out.push_str("]\n");
    out
}

/// Compiles one project into a generated crate. Fatal errors (missing
/// root, unreadable manifest, IO on run-level outputs) return `Err`;
/// everything else lands in the report as warnings or unit failures.
pub fn compile(
    project_root: &Path,
    build_root: &Path,
    options: &CompileOptions,
) -> Result<CompileReport, CompileError> {
    if !project_root.is_dir() {
        return Err(CompileError::ProjectRootMissing(project_root.to_path_buf()));
    }
    if build_root.exists() {
        fs::remove_dir_all(build_root)?;
    }
    let src_root = build_root.join("src");
    let out_root = build_root.join("out");
    fs::create_dir_all(&src_root)?;
    fs::create_dir_all(&out_root)?;

    info!(
        "compiling '{}' into '{}'",
        project_root.display(),
        build_root.display()
    );

    let mut report = CompileReport::new();
    let mut warnings = Vec::new();
    let manifest = ProjectDoc::load(&project_root.join("proj.json"), &mut warnings)?;
    report.absorb_warnings(warnings);

    let asset_root = resolve_root(project_root, &manifest.asset_path);
    let script_root = resolve_root(project_root, &manifest.script_path);
    let scene_root = resolve_root(project_root, &manifest.scene_path);

    let mut assets = if asset_root.is_dir() {
        classify_and_emit(&asset_root, &src_root, &out_root, &mut report)?
    } else {
        report.warn(format!("asset path '{}' not found", asset_root.display()));
        Vec::new()
    };
    // The index is rendered before the splash claims its asset; the
    // splash module must stay declared.
    let assets_index = render_assets_index(&assets);
    let splash = resolve_splash(manifest.splash.as_ref(), &mut assets, &mut report);

    let scripts = if script_root.is_dir() {
        compile_scripts(&script_root, &src_root, &mut report)?
    } else {
        report.warn(format!(
            "script path '{}' not found",
            script_root.display()
        ));
        Vec::new()
    };

    let builtins = BuiltinRegistry::standard();
    let mut scenes = Vec::new();
    if scene_root.is_dir() {
        for file in collect_files_with_extension(&scene_root, ".json")? {
            if file.rel.contains('/') {
                report.fail_unit(
                    &format!("scene '{}'", file.rel),
                    "scene files cannot live in subdirectories".to_string(),
                );
                continue;
            }
            if let Some(unit) =
                compile_scene(&file.path, &file.rel, &src_root, &builtins, &mut report)
            {
                scenes.push(unit);
            }
        }
    } else {
        report.warn(format!("scene path '{}' not found", scene_root.display()));
    }

    atomic_write(&src_root.join("assets/mod.rs"), assets_index.as_bytes())?;
    atomic_write(
        &src_root.join("scripts/mod.rs"),
        render_scripts_index(&scripts).as_bytes(),
    )?;
    atomic_write(
        &src_root.join("scenes/mod.rs"),
        render_scenes_index(&scenes).as_bytes(),
    )?;

    let game = render_game(
        &manifest,
        &assets,
        splash.as_ref(),
        &scripts,
        &scenes,
        options,
    );
    atomic_write(&src_root.join("game.rs"), game.as_bytes())?;
    atomic_write(
        &src_root.join("main.rs"),
        render_main(&package_name(&manifest.id)).as_bytes(),
    )?;
    let descriptor = render_cargo_toml(
        &manifest,
        &assets,
        splash.as_ref(),
        &scripts,
        &scenes,
        options,
    );
    atomic_write(&build_root.join("Cargo.toml"), descriptor.as_bytes())?;

    info!("{report}");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_manifest() -> ProjectDoc {
        ProjectDoc {
            id: "my-game".to_string(),
            name: "My Game".to_string(),
            description: "No description".to_string(),
            version: "0.0.1".to_string(),
            author: "Unknown".to_string(),
            asset_path: "assets".to_string(),
            script_path: "scripts".to_string(),
            scene_path: "scenes".to_string(),
            splash: None,
        }
    }

    fn compiled_unit(rel: &str) -> AssetUnit {
        AssetUnit {
            rel: rel.to_string(),
            symbol: path_symbol(rel),
            mode: AssetMode::Compile,
        }
    }

    #[test]
    fn splash_claims_its_asset() {
        let mut assets = vec![compiled_unit("logo.png"), compiled_unit("other.png")];
        let splash = SplashDoc {
            enabled: true,
            image: "logo.png".to_string(),
        };
        let mut report = CompileReport::new();
        let claimed = resolve_splash(Some(&splash), &mut assets, &mut report).unwrap();
        assert_eq!(claimed.rel, "logo.png");
        assert_eq!(assets.len(), 1);
        assert!(report.is_clean());
    }

    #[test]
    fn splash_without_matching_asset_is_disabled() {
        let mut assets = vec![compiled_unit("other.png")];
        let splash = SplashDoc {
            enabled: true,
            image: "logo.png".to_string(),
        };
        let mut report = CompileReport::new();
        assert!(resolve_splash(Some(&splash), &mut assets, &mut report).is_none());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn splash_needs_the_explicit_flag() {
        let mut assets = vec![compiled_unit("logo.png")];
        let splash = SplashDoc {
            enabled: false,
            image: "logo.png".to_string(),
        };
        let mut report = CompileReport::new();
        assert!(resolve_splash(Some(&splash), &mut assets, &mut report).is_none());
        assert!(report.is_clean());
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn game_entry_closes_the_compiled_block() {
        let manifest = sample_manifest();
        let splash = compiled_unit("logo.png");
        let options = CompileOptions {
            splash_delay_secs: 2,
            ..CompileOptions::default()
        };
        let game = render_game(&manifest, &[], Some(&splash), &[], &[], &options);
        assert!(game.contains("engine.begin_splash(\"logo.png\");"));
        assert!(game.contains("std::time::Duration::from_secs(2)"));
        assert!(game.contains("        engine.end_splash();\n    }\n"));
        let run_at = game.find("engine.run(&mut backend);").unwrap();
        let close_at = game.find("        engine.end_splash();\n    }\n").unwrap();
        assert!(close_at < run_at);
        assert!(game.trim_end().ends_with("0\n}"));
    }

    #[test]
    fn game_entry_registers_everything_in_order() {
        let manifest = sample_manifest();
        let assets = vec![
            compiled_unit("data.bin"),
            AssetUnit {
                rel: "notes.txt".to_string(),
                symbol: path_symbol("notes.txt"),
                mode: AssetMode::Copy,
            },
        ];
        let scripts = vec![ScriptUnit {
            stem: "player".to_string(),
            rel: "player.rs".to_string(),
            module: path_symbol("player.rs"),
            symbol: crate::scripts::dispatch_symbol("player"),
        }];
        let scenes = vec![SceneUnit {
            name: "main".to_string(),
            rel: "main.json".to_string(),
            module: path_symbol("main"),
        }];
        let game = render_game(
            &manifest,
            &assets,
            None,
            &scripts,
            &scenes,
            &CompileOptions::default(),
        );
        let register = game.find("engine.register_script(\"player\"").unwrap();
        let scene = game.find("engine.add_scene(\"main\"").unwrap();
        let embedded = game
            .find("engine.add_asset(\"data.bin\", Asset::from_bytes(&assets::_data_2ebin::DATA));")
            .unwrap();
        let copied = game
            .find("engine.add_asset(\"notes.txt\", Asset::from_file(\"notes.txt\"));")
            .unwrap();
        let config = game.find("engine.load_config(\"game.cfg\");").unwrap();
        assert!(register < scene && scene < embedded && embedded < copied && copied < config);
        assert!(!game.contains("begin_splash"));
        assert!(!game.contains("end_splash"));
    }

    #[test]
    fn descriptor_names_both_targets_and_all_sources() {
        let manifest = sample_manifest();
        let scripts = vec![ScriptUnit {
            stem: "player".to_string(),
            rel: "player.rs".to_string(),
            module: path_symbol("player.rs"),
            symbol: crate::scripts::dispatch_symbol("player"),
        }];
        let scenes = vec![SceneUnit {
            name: "main".to_string(),
            rel: "main.json".to_string(),
            module: path_symbol("main"),
        }];
        let descriptor = render_cargo_toml(
            &manifest,
            &[compiled_unit("logo.png")],
            None,
            &scripts,
            &scenes,
            &CompileOptions::default(),
        );
        assert!(descriptor.starts_with(BANNER_TOML));
        assert!(descriptor.contains("[workspace]\n"));
        assert!(descriptor.contains("name = \"my-game\""));
        assert!(descriptor.contains("name = \"my_game\""));
        assert!(descriptor.contains("crate-type = [\"cdylib\", \"rlib\"]"));
        assert!(descriptor.contains("path = \"src/main.rs\""));
        assert!(descriptor.contains("engine_version = 100"));
        assert!(descriptor.contains("\"src/assets/logo.png.rs\","));
        assert!(descriptor.contains("\"src/scripts/player.rs\","));
        assert!(descriptor.contains("\"src/scenes/main.rs\","));
    }

    #[test]
    fn digit_leading_id_gets_a_valid_package_name() {
        let mut manifest = sample_manifest();
        manifest.id = "2048".to_string();
        let descriptor =
            render_cargo_toml(&manifest, &[], None, &[], &[], &CompileOptions::default());
        assert!(descriptor.contains("name = \"g2048\""));
        let main = render_main(&package_name(&manifest.id));
        assert!(main.contains("g2048::jice_game_main(true)"));
    }
}
