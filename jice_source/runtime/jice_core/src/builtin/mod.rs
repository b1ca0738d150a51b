pub mod image2d;
pub mod square;
pub mod transform;

use std::any::Any;
use std::collections::BTreeMap;

use crate::attr::AttributeData;
use crate::scene::UpdateContext;

/// Engine-provided behavior attached to a game object. Unlike scripts,
/// builtins are constructed from attribute data alone and expose their
/// concrete type through component lookup.
pub trait BuiltinAttribute: Any {
    /// Key this builtin answers component queries under.
    fn capability(&self) -> &'static str;

    fn update(&mut self, ctx: &mut UpdateContext<'_>);

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Constructs a builtin instance from the data block in the scene file.
pub type BuiltinFactory = fn(&AttributeData) -> Box<dyn BuiltinAttribute>;

/// Id-to-factory table the host assembles before handing it to the
/// engine. The generated program receives the stock set; tests can
/// start from an empty one.
pub struct BuiltinRegistry {
    factories: BTreeMap<&'static str, BuiltinFactory>,
}

impl BuiltinRegistry {
    pub fn empty() -> Self {
        BuiltinRegistry {
            factories: BTreeMap::new(),
        }
    }

    /// Registry carrying every builtin the engine ships with.
    pub fn standard() -> Self {
        let mut registry = BuiltinRegistry::empty();
        registry.register(transform::CAPABILITY, transform::create);
        registry.register(image2d::CAPABILITY, image2d::create);
        registry.register(square::CAPABILITY, square::create);
        registry
    }

    pub fn register(&mut self, id: &'static str, factory: BuiltinFactory) {
        self.factories.insert(id, factory);
    }

    pub fn create(&self, id: &str, data: &AttributeData) -> Option<Box<dyn BuiltinAttribute>> {
        self.factories.get(id).map(|factory| factory(data))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        BuiltinRegistry::standard()
    }
}
