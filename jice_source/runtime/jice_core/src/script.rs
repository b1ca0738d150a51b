use std::collections::HashMap;

use crate::object::ObjectId;
use crate::scene::UpdateContext;

/// User-defined behavior attached to a game object. Dispatch hands the
/// script a context holding the whole scene, so it can reach any other
/// object while its own slot is lifted out.
pub trait ScriptAttribute {
    fn setup(&mut self, _ctx: &mut UpdateContext<'_>) {}
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Component keys this script expects on its own object. Missing
    /// ones are reported once during scene setup.
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Constructs a script instance bound to the object it will run on.
pub type ScriptDispatcher = fn(ObjectId) -> Box<dyn ScriptAttribute>;

/// Name-to-dispatcher table filled by generated code before any scene
/// is built.
#[derive(Default)]
pub struct ScriptRegistry {
    table: HashMap<String, ScriptDispatcher>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        ScriptRegistry::default()
    }

    /// Returns false when `name` was already taken; the newer
    /// dispatcher wins.
    pub fn register(&mut self, name: &str, dispatcher: ScriptDispatcher) -> bool {
        self.table.insert(name.to_string(), dispatcher).is_none()
    }

    pub fn dispatch(&self, name: &str, object: ObjectId) -> Option<Box<dyn ScriptAttribute>> {
        self.table.get(name).map(|dispatcher| dispatcher(object))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
