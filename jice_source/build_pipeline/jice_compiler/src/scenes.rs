//! Scene compilation. An authored scene document becomes a typed
//! construction plan, and the plan becomes a generated module that
//! rebuilds the object tree at runtime. A failed plan writes nothing.

use std::collections::HashMap;
use std::path::Path;

use jice_core::attr::{AttrData, AttributeData};
use jice_core::builtin::BuiltinRegistry;
use jice_core::engine::Engine;
use jice_core::object::ObjectId;
use jice_core::scene::{Scene, SceneMode};
use jice_io::atomic_write;
use jice_project::{path_symbol, AttributeDoc, ObjectDoc, SceneDoc};

use crate::codegen::{attr_data_expr, rust_string_literal, version_guard, BANNER};
use crate::report::CompileReport;

/// One emitted construction step. Variables are indices into the
/// per-scene counter; objects and data bindings share it.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanStep {
    CreateObject { var: u64, name: String },
    DataBinding { var: u64, entries: Vec<(String, AttrData)> },
    AttachScript { object: u64, data: u64, location: String },
    AttachBuiltin { object: u64, data: u64, id: String },
    LinkChild { parent: u64, child: u64 },
    LinkRoot { object: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenePlan {
    pub name: String,
    pub three_d: bool,
    pub steps: Vec<PlanStep>,
}

/// One compiled scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneUnit {
    /// Scene name, equal to the file stem.
    pub name: String,
    /// Source path relative to the scene root.
    pub rel: String,
    /// Generated module name under `src/scenes/`.
    pub module: String,
}

fn next(counter: &mut u64) -> u64 {
    let var = *counter;
    *counter += 1;
    var
}

fn plan_object(
    object: &ObjectDoc,
    builtins: &BuiltinRegistry,
    counter: &mut u64,
    steps: &mut Vec<PlanStep>,
) -> Result<u64, String> {
    let var = next(counter);
    steps.push(PlanStep::CreateObject {
        var,
        name: object.id.clone(),
    });
    for attribute in &object.attributes {
        let data = next(counter);
        let entries = attribute
            .data()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        steps.push(PlanStep::DataBinding { var: data, entries });
        match attribute {
            AttributeDoc::Script { location, .. } => {
                steps.push(PlanStep::AttachScript {
                    object: var,
                    data,
                    location: location.clone(),
                });
            }
            AttributeDoc::Builtin { id, .. } => {
                if !builtins.contains(id) {
                    return Err(format!("unknown builtin '{id}'"));
                }
                steps.push(PlanStep::AttachBuiltin {
                    object: var,
                    data,
                    id: id.clone(),
                });
            }
        }
    }
    for child in &object.children {
        let child_var = plan_object(child, builtins, counter, steps)?;
        steps.push(PlanStep::LinkChild {
            parent: var,
            child: child_var,
        });
    }
    Ok(var)
}

/// Builds the construction plan for one scene. The counter starts at 0
/// and is never reused within the scene; every root object ends with a
/// root link, children or not.
pub fn plan_scene(doc: &SceneDoc, builtins: &BuiltinRegistry) -> Result<ScenePlan, String> {
    let mut steps = Vec::new();
    let mut counter = 0u64;
    for object in &doc.objects {
        let var = plan_object(object, builtins, &mut counter, &mut steps)?;
        steps.push(PlanStep::LinkRoot { object: var });
    }
    Ok(ScenePlan {
        name: doc.name.clone(),
        three_d: doc.three_d,
        steps,
    })
}

/// Renders the generated scene module: `construct` rebuilds the tree,
/// `setup` and `update` delegate to the scene's own lifecycle.
pub fn render_scene_module(plan: &ScenePlan) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    out.push_str(&version_guard());
    out.push('\n');
    out.push_str("use jice_core::prelude::*;\n\n");
    out.push_str("pub fn construct(engine: &Engine) -> Scene {\n");
    out.push_str(&format!(
        "    let mut scene = Scene::new({}, SceneMode::{});\n",
        rust_string_literal(&plan.name),
        if plan.three_d { "ThreeD" } else { "TwoD" }
    ));
    for step in &plan.steps {
        match step {
            PlanStep::CreateObject { var, name } => {
                out.push_str(&format!(
                    "    let _object_{var} = scene.create_object({});\n",
                    rust_string_literal(name)
                ));
            }
            PlanStep::DataBinding { var, entries } => {
                if entries.is_empty() {
                    out.push_str(&format!("    let _data_{var} = AttributeData::new();\n"));
                } else {
                    out.push_str(&format!(
                        "    let mut _data_{var} = AttributeData::new();\n"
                    ));
                    for (key, value) in entries {
                        out.push_str(&format!(
                            "    _data_{var}.insert({}.to_string(), {});\n",
                            rust_string_literal(key),
                            attr_data_expr(value)
                        ));
                    }
                }
            }
            PlanStep::AttachScript {
                object,
                data,
                location,
            } => {
                let location = rust_string_literal(location);
                out.push_str(&format!(
                    "    scene.attach_script(_object_{object}, {location}, _data_{data}, \
                     engine.dispatch_script({location}, _object_{object}));\n"
                ));
            }
            PlanStep::AttachBuiltin { object, data, id } => {
                out.push_str(&format!(
                    "    scene.attach_builtin(_object_{object}, engine.builtins(), {}, _data_{data});\n",
                    rust_string_literal(id)
                ));
            }
            PlanStep::LinkChild { parent, child } => {
                out.push_str(&format!(
                    "    scene.add_child(_object_{parent}, _object_{child});\n"
                ));
            }
            PlanStep::LinkRoot { object } => {
                out.push_str(&format!("    scene.add_root(_object_{object});\n"));
            }
        }
    }
    out.push_str("    scene\n");
    out.push_str("}\n\n");
    out.push_str(
        "pub fn setup(scene: &mut Scene, render: &mut RenderQueue, assets: &AssetStore) {\n    \
         scene.run_setup(render, assets);\n}\n\n",
    );
    out.push_str(
        "pub fn update(scene: &mut Scene, render: &mut RenderQueue, assets: &AssetStore) {\n    \
         scene.run_update(render, assets);\n}\n",
    );
    out
}

/// Replays a plan onto a live scene the same way the generated module
/// does, so tools and tests can build the tree without compiling code.
pub fn apply_plan(plan: &ScenePlan, engine: &Engine) -> Scene {
    let mode = if plan.three_d {
        SceneMode::ThreeD
    } else {
        SceneMode::TwoD
    };
    let mut scene = Scene::new(&plan.name, mode);
    let mut objects: HashMap<u64, ObjectId> = HashMap::new();
    let mut bindings: HashMap<u64, AttributeData> = HashMap::new();
    for step in &plan.steps {
        match step {
            PlanStep::CreateObject { var, name } => {
                objects.insert(*var, scene.create_object(name));
            }
            PlanStep::DataBinding { var, entries } => {
                let mut data = AttributeData::new();
                for (key, value) in entries {
                    data.insert(key.clone(), value.clone());
                }
                bindings.insert(*var, data);
            }
            PlanStep::AttachScript {
                object,
                data,
                location,
            } => {
                if let Some(&id) = objects.get(object) {
                    let payload = bindings.remove(data).unwrap_or_default();
                    let instance = engine.dispatch_script(location, id);
                    scene.attach_script(id, location, payload, instance);
                }
            }
            PlanStep::AttachBuiltin { object, data, id } => {
                if let Some(&target) = objects.get(object) {
                    let payload = bindings.remove(data).unwrap_or_default();
                    scene.attach_builtin(target, engine.builtins(), id, payload);
                }
            }
            PlanStep::LinkChild { parent, child } => {
                if let (Some(&parent), Some(&child)) = (objects.get(parent), objects.get(child)) {
                    scene.add_child(parent, child);
                }
            }
            PlanStep::LinkRoot { object } => {
                if let Some(&id) = objects.get(object) {
                    scene.add_root(id);
                }
            }
        }
    }
    scene
}

/// Loads, plans and renders one scene file. Failures land in the report
/// against this scene only; nothing is written for a failed scene.
pub fn compile_scene(
    path: &Path,
    rel: &str,
    src_root: &Path,
    builtins: &BuiltinRegistry,
    report: &mut CompileReport,
) -> Option<SceneUnit> {
    let unit = format!("scene '{rel}'");
    let stem = rel.strip_suffix(".json").unwrap_or(rel);
    let mut warnings = Vec::new();
    let loaded = SceneDoc::load(path, &mut warnings);
    for warning in warnings {
        report.warn(format!("scene '{rel}': {warning}"));
    }
    let doc = match loaded {
        Ok(doc) => doc,
        Err(err) => {
            report.fail_unit(&unit, err.to_string());
            return None;
        }
    };
    if doc.name != stem {
        report.fail_unit(
            &unit,
            format!("scene name '{}' does not match file stem '{stem}'", doc.name),
        );
        return None;
    }
    let plan = match plan_scene(&doc, builtins) {
        Ok(plan) => plan,
        Err(message) => {
            report.fail_unit(&unit, message);
            return None;
        }
    };
    let dest = src_root.join("scenes").join(format!("{stem}.rs"));
    if let Err(err) = atomic_write(&dest, render_scene_module(&plan).as_bytes()) {
        report.fail_unit(&unit, format!("write failed: {err}"));
        return None;
    }
    report.scenes_compiled += 1;
    Some(SceneUnit {
        name: stem.to_string(),
        rel: rel.to_string(),
        module: path_symbol(stem),
    })
}

/// The `src/scenes/mod.rs` body: one `#[path]` module per scene.
pub fn render_scenes_index(units: &[SceneUnit]) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    for unit in units {
        out.push_str(&format!(
            "#[path = {}]\n",
            rust_string_literal(&format!("{}.rs", unit.name))
        ));
        out.push_str(&format!("pub mod {};\n", unit.module));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jice_core::engine::EngineInfo;
    use jice_core::prelude::{ScriptAttribute, Transform};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DIR_SEQ: AtomicU64 = AtomicU64::new(0);

    fn temp_test_dir() -> PathBuf {
        let seq = TEST_DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let pid = std::process::id();
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("jice_scenes_test_{pid}_{nonce}_{seq}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_doc() -> SceneDoc {
        let mut transform_data = jice_project::DocAttrData::new();
        transform_data.insert("position".to_string(), AttrData::VecF(vec![1.0, 2.0, 0.0]));
        SceneDoc {
            name: "main".to_string(),
            three_d: false,
            objects: vec![ObjectDoc {
                id: "player".to_string(),
                attributes: vec![AttributeDoc::Builtin {
                    id: "transform".to_string(),
                    data: transform_data,
                }],
                children: vec![ObjectDoc {
                    id: "hat".to_string(),
                    attributes: vec![AttributeDoc::Script {
                        location: "wobble".to_string(),
                        data: jice_project::DocAttrData::new(),
                    }],
                    children: Vec::new(),
                }],
            }],
        }
    }

    struct Idle;

    impl ScriptAttribute for Idle {}

    fn idle_dispatcher(_object: ObjectId) -> Box<dyn ScriptAttribute> {
        Box::new(Idle)
    }

    fn test_engine() -> Engine {
        let info = EngineInfo::new("t", "t", "", "0.0.1", "nobody");
        let mut engine = Engine::new(info, BuiltinRegistry::standard());
        engine.register_script("wobble", idle_dispatcher);
        engine
    }

    #[test]
    fn counter_is_shared_and_never_reused() {
        let plan = plan_scene(&sample_doc(), &BuiltinRegistry::standard()).unwrap();
        assert_eq!(
            plan.steps,
            vec![
                PlanStep::CreateObject {
                    var: 0,
                    name: "player".into()
                },
                PlanStep::DataBinding {
                    var: 1,
                    entries: vec![(
                        "position".to_string(),
                        AttrData::VecF(vec![1.0, 2.0, 0.0])
                    )],
                },
                PlanStep::AttachBuiltin {
                    object: 0,
                    data: 1,
                    id: "transform".into()
                },
                PlanStep::CreateObject {
                    var: 2,
                    name: "hat".into()
                },
                PlanStep::DataBinding {
                    var: 3,
                    entries: Vec::new()
                },
                PlanStep::AttachScript {
                    object: 2,
                    data: 3,
                    location: "wobble".into()
                },
                PlanStep::LinkChild {
                    parent: 0,
                    child: 2
                },
                PlanStep::LinkRoot { object: 0 },
            ]
        );
    }

    #[test]
    fn unknown_builtin_aborts_the_plan() {
        let mut doc = sample_doc();
        doc.objects[0].attributes = vec![AttributeDoc::Builtin {
            id: "teleporter".to_string(),
            data: jice_project::DocAttrData::new(),
        }];
        let err = plan_scene(&doc, &BuiltinRegistry::standard()).unwrap_err();
        assert!(err.contains("unknown builtin 'teleporter'"));
    }

    #[test]
    fn rendered_module_rebuilds_the_tree() {
        let plan = plan_scene(&sample_doc(), &BuiltinRegistry::standard()).unwrap();
        let module = render_scene_module(&plan);
        assert!(module.starts_with(BANNER));
        assert!(module.contains("jice_core::check_engine_version!(100);"));
        assert!(module.contains("let mut scene = Scene::new(\"main\", SceneMode::TwoD);"));
        assert!(module.contains("let _object_0 = scene.create_object(\"player\");"));
        assert!(module
            .contains("_data_1.insert(\"position\".to_string(), AttrData::VecF(vec![1.0, 2.0, 0.0]));"));
        assert!(module.contains(
            "scene.attach_builtin(_object_0, engine.builtins(), \"transform\", _data_1);"
        ));
        assert!(module.contains(
            "scene.attach_script(_object_2, \"wobble\", _data_3, \
             engine.dispatch_script(\"wobble\", _object_2));"
        ));
        assert!(module.contains("scene.add_child(_object_0, _object_2);"));
        assert!(module.contains("scene.add_root(_object_0);"));
        assert!(module.contains("pub fn setup(scene: &mut Scene"));
        assert!(module.contains("pub fn update(scene: &mut Scene"));
    }

    #[test]
    fn applied_plan_matches_the_document() {
        let engine = test_engine();
        let plan = plan_scene(&sample_doc(), engine.builtins()).unwrap();
        let scene = apply_plan(&plan, &engine);

        assert_eq!(scene.roots().len(), 1);
        let root = scene.roots()[0];
        let player = scene.object(root).unwrap();
        assert_eq!(player.name, "player");
        assert!(player.has_component("transform"));
        let transform = player.component::<Transform>("transform").unwrap();
        assert_eq!(transform.position.x, 1.0);
        assert_eq!(player.children().len(), 1);
        let hat = scene.object(player.children()[0]).unwrap();
        assert_eq!(hat.name, "hat");
        assert!(hat.has_component("wobble"));
    }

    #[test]
    fn name_mismatch_fails_without_output() {
        let dir = temp_test_dir();
        let mut doc = sample_doc();
        doc.name = "other".to_string();
        let path = dir.join("main.json");
        fs::write(&path, serde_json::to_string_pretty(&doc.to_json()).unwrap()).unwrap();

        let mut report = CompileReport::new();
        let unit = compile_scene(
            &path,
            "main.json",
            &dir.join("src"),
            &BuiltinRegistry::standard(),
            &mut report,
        );
        assert!(unit.is_none());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("does not match"));
        assert!(!dir.join("src/scenes/main.rs").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn good_scene_compiles_to_a_module() {
        let dir = temp_test_dir();
        let doc = sample_doc();
        let path = dir.join("main.json");
        fs::write(&path, serde_json::to_string_pretty(&doc.to_json()).unwrap()).unwrap();

        let mut report = CompileReport::new();
        let unit = compile_scene(
            &path,
            "main.json",
            &dir.join("src"),
            &BuiltinRegistry::standard(),
            &mut report,
        )
        .unwrap();
        assert_eq!(unit.name, "main");
        assert_eq!(unit.module, "_main");
        assert_eq!(report.scenes_compiled, 1);
        let emitted = fs::read_to_string(dir.join("src/scenes/main.rs")).unwrap();
        assert!(emitted.contains("pub fn construct(engine: &Engine) -> Scene {"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn index_declares_each_scene_module() {
        let units = vec![SceneUnit {
            name: "main".into(),
            rel: "main.json".into(),
            module: "_main".into(),
        }];
        let index = render_scenes_index(&units);
        assert!(index.contains("#[path = \"main.rs\"]"));
        assert!(index.contains("pub mod _main;"));
    }
}
