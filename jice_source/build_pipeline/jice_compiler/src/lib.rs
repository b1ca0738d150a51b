#![forbid(unsafe_code)]

//! jicc: compiles a jice project (manifest, assets, scripts and
//! scenes) into a generated Rust crate that links against `jice_core`.
//! Unit problems degrade or fail that unit; only the manifest and
//! run-level IO are fatal.

pub mod assets;
pub mod codegen;
pub mod error;
pub mod project;
pub mod report;
pub mod scenes;
pub mod scripts;

pub use assets::{AssetMode, AssetUnit, SIDECAR_EXTENSION};
pub use error::CompileError;
pub use project::{compile, CompileOptions};
pub use report::{CompileReport, UnitFailure};
pub use scenes::{apply_plan, plan_scene, PlanStep, ScenePlan, SceneUnit};
pub use scripts::{dispatch_symbol, ScriptUnit};
