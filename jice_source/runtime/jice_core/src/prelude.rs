//! Single import for generated programs and handwritten scripts.

pub use crate::asset::{Asset, AssetStore};
pub use crate::attr::{AttrData, AttrKind, Attribute, AttributeData};
pub use crate::builtin::image2d::Image2d;
pub use crate::builtin::square::Square;
pub use crate::builtin::transform::Transform;
pub use crate::builtin::{BuiltinAttribute, BuiltinRegistry};
pub use crate::engine::{Engine, EngineInfo, SceneHooks};
pub use crate::object::{ComponentError, GameObject, ObjectArena, ObjectId};
pub use crate::render::{FramePoll, HeadlessBackend, RenderBackend, RenderQueue};
pub use crate::scene::{Scene, SceneMode, UpdateContext};
pub use crate::script::{ScriptAttribute, ScriptDispatcher, ScriptRegistry};
pub use crate::splash::{NullSplash, SplashScreen};
pub use crate::ENGINE_VERSION;
