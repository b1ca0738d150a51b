#![forbid(unsafe_code)]

//! Runtime data model for generated jice games: the object arena,
//! scenes, attributes, the asset store and the frame loop. Generated
//! code fills the registries in and hands the engine a render backend.

pub mod asset;
pub mod attr;
pub mod builtin;
pub mod engine;
pub mod object;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod script;
pub mod splash;

/// Version of the runtime data model. Generated code pins the version
/// it was emitted against and refuses to build against another.
pub const ENGINE_VERSION: u16 = 100;

/// Compile-time guard emitted at the top of every generated program.
#[macro_export]
macro_rules! check_engine_version {
    ($version:expr) => {
        const _: () = assert!(
            ($version) as u16 == $crate::ENGINE_VERSION,
            "generated code targets a different engine version",
        );
    };
}

#[cfg(test)]
mod tests {
    crate::check_engine_version!(100);

    #[test]
    fn version_is_stable() {
        assert_eq!(crate::ENGINE_VERSION, 100);
    }
}
