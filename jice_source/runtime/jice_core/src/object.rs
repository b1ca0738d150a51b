use std::error::Error;
use std::fmt;

use crate::attr::Attribute;
use crate::attr::AttributeInstance;
use crate::builtin::BuiltinAttribute;

/// Generational handle to a [`GameObject`] in an [`ObjectArena`].
/// Index 0 is reserved as the nil sentinel and never holds an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    pub const NIL: ObjectId = ObjectId {
        index: 0,
        generation: 0,
    };

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_nil(&self) -> bool {
        self.index == 0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::NIL
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Failed component lookup on a [`GameObject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// No attribute on the object answers to the requested key.
    NotFound { key: String },
    /// An attribute answered but its concrete type is not the one asked for.
    TypeMismatch { key: String },
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentError::NotFound { key } => {
                write!(f, "no component registered under '{key}'")
            }
            ComponentError::TypeMismatch { key } => {
                write!(f, "component '{key}' is not of the requested type")
            }
        }
    }
}

impl Error for ComponentError {}

/// A named node in the scene tree carrying an ordered list of attributes.
pub struct GameObject {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub(crate) parent: ObjectId,
    pub(crate) children: Vec<ObjectId>,
}

impl GameObject {
    pub fn new(name: &str) -> Self {
        GameObject {
            name: name.to_string(),
            attributes: Vec::new(),
            parent: ObjectId::NIL,
            children: Vec::new(),
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn parent(&self) -> ObjectId {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Whether any attribute answers to `key`, regardless of whether
    /// its instance is currently lifted out for dispatch.
    pub fn has_component(&self, key: &str) -> bool {
        self.attributes.iter().any(|attr| attr.answers_to(key))
    }

    /// Borrow the builtin attribute registered under `key` as its
    /// concrete type. A slot lifted out for dispatch reports `NotFound`.
    pub fn component<T: BuiltinAttribute>(&self, key: &str) -> Result<&T, ComponentError> {
        let attr = self
            .attributes
            .iter()
            .find(|attr| attr.answers_to(key))
            .ok_or_else(|| ComponentError::NotFound {
                key: key.to_string(),
            })?;
        match attr.instance() {
            Some(AttributeInstance::Builtin(builtin)) => builtin
                .as_any()
                .downcast_ref::<T>()
                .ok_or_else(|| ComponentError::TypeMismatch {
                    key: key.to_string(),
                }),
            Some(AttributeInstance::Script(_)) => Err(ComponentError::TypeMismatch {
                key: key.to_string(),
            }),
            None => Err(ComponentError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Mutable counterpart of [`GameObject::component`].
    pub fn component_mut<T: BuiltinAttribute>(&mut self, key: &str) -> Result<&mut T, ComponentError> {
        let attr = self
            .attributes
            .iter_mut()
            .find(|attr| attr.answers_to(key))
            .ok_or_else(|| ComponentError::NotFound {
                key: key.to_string(),
            })?;
        match attr.instance_mut() {
            Some(AttributeInstance::Builtin(builtin)) => builtin
                .as_any_mut()
                .downcast_mut::<T>()
                .ok_or_else(|| ComponentError::TypeMismatch {
                    key: key.to_string(),
                }),
            Some(AttributeInstance::Script(_)) => Err(ComponentError::TypeMismatch {
                key: key.to_string(),
            }),
            None => Err(ComponentError::NotFound {
                key: key.to_string(),
            }),
        }
    }
}

/// Slot-reusing arena for game objects. Freed slots go on a free list
/// and their generation is bumped, so stale ids miss instead of
/// aliasing whatever object landed in the slot next.
pub struct ObjectArena {
    slots: Vec<Option<GameObject>>,
    generations: Vec<u32>,
    free_indices: Vec<u32>,
}

impl ObjectArena {
    pub fn new() -> Self {
        ObjectArena {
            // Slot 0 stays empty so index 0 can serve as nil.
            slots: vec![None],
            generations: vec![0],
            free_indices: Vec::new(),
        }
    }

    pub fn insert(&mut self, object: GameObject) -> ObjectId {
        if let Some(index) = self.free_indices.pop() {
            let generation = self.generations[index as usize];
            self.slots[index as usize] = Some(object);
            ObjectId { index, generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some(object));
            self.generations.push(0);
            ObjectId {
                index,
                generation: 0,
            }
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        if self.contains(id) {
            self.slots[id.index as usize].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        if self.contains(id) {
            self.slots[id.index as usize].as_mut()
        } else {
            None
        }
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<GameObject> {
        if !self.contains(id) {
            return None;
        }
        let object = self.slots[id.index as usize].take();
        self.generations[id.index as usize] = self.generations[id.index as usize].wrapping_add(1);
        self.free_indices.push(id.index);
        object
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        !id.is_nil()
            && (id.index as usize) < self.slots.len()
            && self.generations[id.index as usize] == id.generation
            && self.slots[id.index as usize].is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &GameObject)> {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, slot)| {
                slot.as_ref().map(|object| {
                    (
                        ObjectId {
                            index: index as u32,
                            generation: self.generations[index],
                        },
                        object,
                    )
                })
            })
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.generations.clear();
        self.free_indices.clear();
        self.slots.push(None);
        self.generations.push(0);
    }
}

impl Default for ObjectArena {
    fn default() -> Self {
        ObjectArena::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut arena = ObjectArena::new();
        let id = arena.insert(GameObject::new("player"));
        assert!(!id.is_nil());
        assert_eq!(arena.get(id).unwrap().name, "player");
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn nil_id_never_resolves() {
        let mut arena = ObjectArena::new();
        arena.insert(GameObject::new("a"));
        assert!(arena.get(ObjectId::NIL).is_none());
        assert!(!arena.contains(ObjectId::NIL));
    }

    #[test]
    fn removed_slot_is_reused_with_new_generation() {
        let mut arena = ObjectArena::new();
        let a = arena.insert(GameObject::new("a"));
        let removed = arena.remove(a).unwrap();
        assert_eq!(removed.name, "a");

        let b = arena.insert(GameObject::new("b"));
        assert_eq!(b.index(), a.index());
        assert_ne!(b.generation(), a.generation());
    }

    #[test]
    fn stale_id_misses_after_reuse() {
        let mut arena = ObjectArena::new();
        let a = arena.insert(GameObject::new("a"));
        arena.remove(a);
        let _b = arena.insert(GameObject::new("b"));
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());
    }

    #[test]
    fn iter_skips_nil_slot_and_holes() {
        let mut arena = ObjectArena::new();
        let a = arena.insert(GameObject::new("a"));
        let _b = arena.insert(GameObject::new("b"));
        let c = arena.insert(GameObject::new("c"));
        arena.remove(_b);

        let names: Vec<&str> = arena.iter().map(|(_, object)| object.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        let ids: Vec<ObjectId> = arena.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn clear_keeps_nil_reserved() {
        let mut arena = ObjectArena::new();
        arena.insert(GameObject::new("a"));
        arena.clear();
        assert!(arena.is_empty());
        let id = arena.insert(GameObject::new("b"));
        assert_eq!(id.index(), 1);
    }

    #[test]
    fn has_component_uses_binding_metadata() {
        use crate::attr::{Attribute, AttributeData};
        use crate::builtin::transform;

        let mut object = GameObject::new("thing");
        let data = AttributeData::new();
        object.add_attribute(Attribute::builtin(
            "transform",
            data.clone(),
            transform::create(&data),
        ));
        assert!(object.has_component("transform"));
        assert!(!object.has_component("image2d"));
    }

    #[test]
    fn component_downcasts_builtin() {
        use crate::attr::{Attribute, AttributeData};
        use crate::builtin::transform::{self, Transform};
        use crate::builtin::square::Square;

        let mut object = GameObject::new("thing");
        let data = AttributeData::new();
        object.add_attribute(Attribute::builtin(
            "transform",
            data.clone(),
            transform::create(&data),
        ));

        assert!(object.component::<Transform>("transform").is_ok());
        assert_eq!(
            object.component::<Square>("transform").unwrap_err(),
            ComponentError::TypeMismatch {
                key: "transform".into()
            }
        );
        assert_eq!(
            object.component::<Transform>("missing").unwrap_err(),
            ComponentError::NotFound {
                key: "missing".into()
            }
        );
    }
}
