use std::collections::{BTreeMap, HashMap};
use std::fs;

use log::{error, info, warn};

use crate::asset::{Asset, AssetStore};
use crate::builtin::BuiltinRegistry;
use crate::object::ObjectId;
use crate::render::{
    shader_source, DrawCall, FramePoll, RenderBackend, RenderQueue, RenderTask, ShaderHandle,
    TextureHandle,
};
use crate::scene::Scene;
use crate::script::{ScriptAttribute, ScriptDispatcher, ScriptRegistry};
use crate::splash::{self, NullSplash, SplashHandle, SplashScreen};

/// Identity block of a game, filled in by generated code from the
/// project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
}

impl EngineInfo {
    pub fn new(id: &str, name: &str, description: &str, version: &str, author: &str) -> Self {
        EngineInfo {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            version: version.to_string(),
            author: author.to_string(),
        }
    }
}

/// Entry points generated code supplies per scene. The base hooks call
/// straight into the scene; generated hooks wrap them with per-scene
/// code and end with the same calls.
#[derive(Clone, Copy)]
pub struct SceneHooks {
    pub setup: fn(&mut Scene, &mut RenderQueue, &AssetStore),
    pub update: fn(&mut Scene, &mut RenderQueue, &AssetStore),
}

impl SceneHooks {
    pub fn base() -> SceneHooks {
        SceneHooks {
            setup: Scene::run_setup,
            update: Scene::run_update,
        }
    }
}

struct SceneEntry {
    scene: Scene,
    hooks: SceneHooks,
}

/// Owns every registry the generated program fills in, and drives the
/// frame loop against an injected render backend.
pub struct Engine {
    info: EngineInfo,
    builtins: BuiltinRegistry,
    scripts: ScriptRegistry,
    assets: AssetStore,
    scenes: BTreeMap<String, SceneEntry>,
    current: Option<String>,
    render: RenderQueue,
    textures: HashMap<String, TextureHandle>,
    shaders: HashMap<String, ShaderHandle>,
    config: HashMap<String, String>,
    splash: Option<SplashHandle>,
    splash_factory: fn() -> Box<dyn SplashScreen>,
    running: bool,
}

impl Engine {
    pub fn new(info: EngineInfo, builtins: BuiltinRegistry) -> Engine {
        Engine {
            info,
            builtins,
            scripts: ScriptRegistry::new(),
            assets: AssetStore::new(),
            scenes: BTreeMap::new(),
            current: None,
            render: RenderQueue::new(),
            textures: HashMap::new(),
            shaders: HashMap::new(),
            config: HashMap::new(),
            splash: None,
            splash_factory: || Box::new(NullSplash),
            running: false,
        }
    }

    pub fn info(&self) -> &EngineInfo {
        &self.info
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn register_script(&mut self, name: &str, dispatcher: ScriptDispatcher) {
        if !self.scripts.register(name, dispatcher) {
            warn!("script '{name}' registered twice, newer dispatcher wins");
        }
    }

    /// Builds a script instance for `object`, or logs and returns None
    /// when no dispatcher answers to `name`.
    pub fn dispatch_script(&self, name: &str, object: ObjectId) -> Option<Box<dyn ScriptAttribute>> {
        let script = self.scripts.dispatch(name, object);
        if script.is_none() {
            error!("no script registered under '{name}'");
        }
        script
    }

    pub fn add_scene(&mut self, name: &str, scene: Scene, hooks: SceneHooks) {
        let entry = SceneEntry { scene, hooks };
        if self.scenes.insert(name.to_string(), entry).is_some() {
            warn!("scene '{name}' replaced");
        }
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name).map(|entry| &entry.scene)
    }

    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name).map(|entry| &mut entry.scene)
    }

    pub fn current_scene(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Switches to a known scene. Its setup hook runs on first entry.
    pub fn set_scene(&mut self, name: &str) -> bool {
        if !self.scenes.contains_key(name) {
            warn!("no scene named '{name}'");
            return false;
        }
        self.current = Some(name.to_string());
        self.setup_scene(name);
        true
    }

    pub fn add_asset(&mut self, name: &str, asset: Asset) {
        self.assets.add(name, asset);
    }

    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Replaces the splash presenter. Defaults to [`NullSplash`].
    pub fn set_splash_screen(&mut self, factory: fn() -> Box<dyn SplashScreen>) {
        self.splash_factory = factory;
    }

    /// Shows `name` from the asset store on the splash thread. Nothing
    /// happens when a splash is already up or the asset is missing.
    pub fn begin_splash(&mut self, name: &str) {
        if self.splash.is_some() {
            warn!("splash already showing");
            return;
        }
        let Some(asset) = self.assets.get(name) else {
            error!("splash image '{name}' is not a registered asset");
            return;
        };
        let image = asset.data().to_vec();
        self.splash = Some(splash::begin((self.splash_factory)(), image));
    }

    /// Stops the splash and waits for its thread. Safe to call when no
    /// splash is up.
    pub fn end_splash(&mut self) {
        if let Some(handle) = self.splash.take() {
            handle.end();
        }
    }

    pub fn splash_active(&self) -> bool {
        self.splash.is_some()
    }

    /// Loads `key=value` lines into the config table. A missing file
    /// leaves the defaults in place.
    pub fn load_config(&mut self, path: &str) {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                info!("no config at '{path}', using defaults ({err})");
                return;
            }
        };
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) => {
                    self.config
                        .insert(key.trim().to_string(), value.trim().to_string());
                }
                None => warn!("config line ignored: '{line}'"),
            }
        }
        info!("loaded {} config entries from '{path}'", self.config.len());
    }

    pub fn config(&self) -> &HashMap<String, String> {
        &self.config
    }

    pub fn close(&mut self) {
        self.running = false;
        self.end_splash();
    }

    /// Runs the frame loop until the backend reports close or a script
    /// calls [`Engine::close`]. Returns immediately when no scene was
    /// registered.
    pub fn run(&mut self, backend: &mut dyn RenderBackend) {
        self.start();
        while self.running {
            self.frame(backend);
        }
        self.end_splash();
        backend.shutdown();
    }

    fn start(&mut self) {
        if self.scenes.is_empty() {
            error!("'{}' has no scenes to run", self.info.name);
            return;
        }
        // BTreeMap keeps names sorted; the first scene is the lowest
        // name, the same on every platform.
        let first = match &self.current {
            Some(name) => name.clone(),
            None => match self.scenes.keys().next() {
                Some(name) => name.clone(),
                None => return,
            },
        };
        info!(
            "{} v{} by {}: entering scene '{first}'",
            self.info.name, self.info.version, self.info.author
        );
        self.current = Some(first.clone());
        self.running = true;
        self.setup_scene(&first);
    }

    fn setup_scene(&mut self, name: &str) {
        if let Some(entry) = self.scenes.get_mut(name) {
            (entry.hooks.setup)(&mut entry.scene, &mut self.render, &self.assets);
        }
    }

    fn frame(&mut self, backend: &mut dyn RenderBackend) {
        backend.begin_frame();
        if let Some(name) = self.current.as_deref() {
            if let Some(entry) = self.scenes.get_mut(name) {
                (entry.hooks.update)(&mut entry.scene, &mut self.render, &self.assets);
            }
        }
        for task in self.render.drain() {
            self.draw_task(backend, &task);
        }
        if backend.end_frame() == FramePoll::Close {
            self.running = false;
        }
    }

    fn draw_task(&mut self, backend: &mut dyn RenderBackend, task: &RenderTask) {
        let Some(shader) = self.resolve_shader(backend, &task.shader) else {
            error!("dropping draw: unknown shader '{}'", task.shader);
            return;
        };
        let texture = match &task.texture {
            Some(name) => match self.resolve_texture(backend, name) {
                Some(handle) => Some(handle),
                None => {
                    error!("dropping draw: texture '{name}' unavailable");
                    return;
                }
            },
            None => None,
        };
        backend.draw(&DrawCall {
            shader,
            texture,
            geometry: task.geometry,
            model: task.model,
        });
    }

    fn resolve_shader(
        &mut self,
        backend: &mut dyn RenderBackend,
        name: &str,
    ) -> Option<ShaderHandle> {
        if let Some(&handle) = self.shaders.get(name) {
            return Some(handle);
        }
        let (vertex, fragment) = shader_source(name)?;
        let handle = backend.link_program(vertex, fragment)?;
        self.shaders.insert(name.to_string(), handle);
        Some(handle)
    }

    fn resolve_texture(
        &mut self,
        backend: &mut dyn RenderBackend,
        name: &str,
    ) -> Option<TextureHandle> {
        if let Some(&handle) = self.textures.get(name) {
            return Some(handle);
        }
        let asset = self.assets.get(name)?;
        let handle = backend.create_texture_from_buffer(asset.data())?;
        self.textures.insert(name.to_string(), handle);
        Some(handle)
    }
}
