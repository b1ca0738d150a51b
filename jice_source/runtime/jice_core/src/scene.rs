use log::{debug, warn};

use crate::asset::AssetStore;
use crate::attr::{Attribute, AttributeData, AttributeInstance};
use crate::builtin::BuiltinRegistry;
use crate::object::{GameObject, ObjectArena, ObjectId};
use crate::render::RenderQueue;
use crate::script::ScriptAttribute;

/// Whether a scene positions its content in two or three dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneMode {
    TwoD,
    ThreeD,
}

/// World handed to an attribute for one dispatch. The attribute's own
/// slot is lifted out of the arena first, so `objects` can be mutable
/// without aliasing the running instance.
pub struct UpdateContext<'a> {
    /// Object the dispatched attribute is attached to.
    pub object: ObjectId,
    pub objects: &'a mut ObjectArena,
    pub render: &'a mut RenderQueue,
    pub assets: &'a AssetStore,
    pub mode: SceneMode,
}

/// A named tree of game objects with per-object attributes. Objects
/// live in an arena; the tree is links between ids, so moving a
/// subtree relinks handles instead of copying objects.
pub struct Scene {
    name: String,
    mode: SceneMode,
    objects: ObjectArena,
    roots: Vec<ObjectId>,
    set_up: bool,
}

impl Scene {
    pub fn new(name: &str, mode: SceneMode) -> Self {
        Scene {
            name: name.to_string(),
            mode,
            objects: ObjectArena::new(),
            roots: Vec::new(),
            set_up: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    pub fn is_set_up(&self) -> bool {
        self.set_up
    }

    pub fn objects(&self) -> &ObjectArena {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectArena {
        &mut self.objects
    }

    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Creates an object that is not yet linked into the tree. Callers
    /// follow up with [`Scene::add_root`] or [`Scene::add_child`].
    pub fn create_object(&mut self, name: &str) -> ObjectId {
        self.objects.insert(GameObject::new(name))
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    pub fn attach_script(
        &mut self,
        id: ObjectId,
        name: &str,
        data: AttributeData,
        instance: Option<Box<dyn ScriptAttribute>>,
    ) {
        let Some(object) = self.objects.get_mut(id) else {
            warn!("scene '{}': no object {id} to attach '{name}' to", self.name);
            return;
        };
        let Some(instance) = instance else {
            warn!(
                "scene '{}': script '{name}' unresolved, dropped from '{}'",
                self.name, object.name
            );
            return;
        };
        object.add_attribute(Attribute::script(name, data, instance));
    }

    pub fn attach_builtin(
        &mut self,
        id: ObjectId,
        registry: &BuiltinRegistry,
        builtin_id: &str,
        data: AttributeData,
    ) {
        let Some(instance) = registry.create(builtin_id, &data) else {
            warn!(
                "scene '{}': unknown builtin attribute '{builtin_id}'",
                self.name
            );
            return;
        };
        let Some(object) = self.objects.get_mut(id) else {
            warn!(
                "scene '{}': no object {id} to attach '{builtin_id}' to",
                self.name
            );
            return;
        };
        object.add_attribute(Attribute::builtin(builtin_id, data, instance));
    }

    pub fn add_root(&mut self, id: ObjectId) -> bool {
        if !self.objects.contains(id) {
            warn!("scene '{}': cannot root missing object {id}", self.name);
            return false;
        }
        if self.is_linked(id) {
            warn!("scene '{}': object {id} is already in the tree", self.name);
            return false;
        }
        self.roots.push(id);
        true
    }

    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> bool {
        if parent == child || !self.objects.contains(parent) || !self.objects.contains(child) {
            warn!(
                "scene '{}': cannot link {child} under {parent}",
                self.name
            );
            return false;
        }
        if self.is_linked(child) {
            warn!("scene '{}': object {child} is already in the tree", self.name);
            return false;
        }
        if let Some(object) = self.objects.get_mut(parent) {
            object.children.push(child);
        }
        if let Some(object) = self.objects.get_mut(child) {
            object.parent = parent;
        }
        true
    }

    /// Relinks `id` under `new_parent`, or to the root set when
    /// `new_parent` is nil. The subtree itself is untouched. Refuses
    /// to move an object into its own subtree.
    pub fn reparent(&mut self, id: ObjectId, new_parent: ObjectId) -> bool {
        if !self.objects.contains(id) || new_parent == id {
            return false;
        }
        if !new_parent.is_nil() {
            if !self.objects.contains(new_parent) {
                warn!("scene '{}': reparent target {new_parent} missing", self.name);
                return false;
            }
            let mut cursor = new_parent;
            while !cursor.is_nil() {
                if cursor == id {
                    warn!(
                        "scene '{}': refusing to move {id} into its own subtree",
                        self.name
                    );
                    return false;
                }
                cursor = self
                    .objects
                    .get(cursor)
                    .map(|object| object.parent)
                    .unwrap_or(ObjectId::NIL);
            }
        }
        self.unlink(id);
        if new_parent.is_nil() {
            self.roots.push(id);
            if let Some(object) = self.objects.get_mut(id) {
                object.parent = ObjectId::NIL;
            }
        } else {
            if let Some(object) = self.objects.get_mut(new_parent) {
                object.children.push(id);
            }
            if let Some(object) = self.objects.get_mut(id) {
                object.parent = new_parent;
            }
        }
        true
    }

    /// Removes an object and everything below it. Returns how many
    /// objects were freed.
    pub fn remove_object(&mut self, id: ObjectId) -> usize {
        if !self.objects.contains(id) {
            return 0;
        }
        self.unlink(id);
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(object) = self.objects.remove(current) {
                freed += 1;
                stack.extend(object.children);
            }
        }
        freed
    }

    /// Root objects and their descendants, parents before children,
    /// siblings in insertion order.
    pub fn traversal_order(&self) -> Vec<ObjectId> {
        let mut order = Vec::with_capacity(self.objects.len());
        let mut stack: Vec<ObjectId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(object) = self.objects.get(id) else {
                continue;
            };
            order.push(id);
            for &child in object.children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Runs every attribute's setup hook once, in traversal order.
    /// Later calls are ignored, so re-entering a scene does not reset
    /// its state. Missing dependencies are reported here.
    pub fn run_setup(&mut self, render: &mut RenderQueue, assets: &AssetStore) {
        if self.set_up {
            debug!("scene '{}' already set up", self.name);
            return;
        }
        for id in self.traversal_order() {
            self.warn_missing_dependencies(id);
            self.dispatch_object(id, render, assets, Phase::Setup);
        }
        self.set_up = true;
    }

    /// Runs every attribute's update hook once, in traversal order.
    pub fn run_update(&mut self, render: &mut RenderQueue, assets: &AssetStore) {
        for id in self.traversal_order() {
            self.dispatch_object(id, render, assets, Phase::Update);
        }
    }

    fn dispatch_object(
        &mut self,
        id: ObjectId,
        render: &mut RenderQueue,
        assets: &AssetStore,
        phase: Phase,
    ) {
        let count = self
            .objects
            .get(id)
            .map_or(0, |object| object.attributes.len());
        for index in 0..count {
            let Some(mut instance) = self.take_instance(id, index) else {
                continue;
            };
            {
                let mut ctx = UpdateContext {
                    object: id,
                    objects: &mut self.objects,
                    render: &mut *render,
                    assets,
                    mode: self.mode,
                };
                match phase {
                    Phase::Setup => instance.setup(&mut ctx),
                    Phase::Update => instance.update(&mut ctx),
                }
            }
            self.put_instance(id, index, instance);
        }
    }

    fn warn_missing_dependencies(&self, id: ObjectId) {
        let Some(object) = self.objects.get(id) else {
            return;
        };
        for attr in &object.attributes {
            let Some(instance) = attr.instance() else {
                continue;
            };
            for dep in instance.dependencies() {
                if !object.has_component(dep) {
                    warn!(
                        "object '{}': '{}' expects component '{dep}'",
                        object.name,
                        attr.binding().key()
                    );
                }
            }
        }
    }

    fn take_instance(&mut self, id: ObjectId, index: usize) -> Option<AttributeInstance> {
        self.objects
            .get_mut(id)?
            .attributes
            .get_mut(index)?
            .take_instance()
    }

    fn put_instance(&mut self, id: ObjectId, index: usize, instance: AttributeInstance) {
        match self
            .objects
            .get_mut(id)
            .and_then(|object| object.attributes.get_mut(index))
        {
            Some(attr) => attr.put_instance(instance),
            None => debug!("attribute slot {index} on {id} vanished during dispatch"),
        }
    }

    fn is_linked(&self, id: ObjectId) -> bool {
        self.roots.contains(&id)
            || self
                .objects
                .get(id)
                .map(|object| !object.parent.is_nil())
                .unwrap_or(false)
    }

    fn unlink(&mut self, id: ObjectId) {
        let parent = self
            .objects
            .get(id)
            .map(|object| object.parent)
            .unwrap_or(ObjectId::NIL);
        if parent.is_nil() {
            self.roots.retain(|&root| root != id);
        } else if let Some(object) = self.objects.get_mut(parent) {
            object.children.retain(|&child| child != id);
        }
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Setup,
    Update,
}
