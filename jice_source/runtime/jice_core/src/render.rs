use glam::Vec3;

/// Shader pair drawing textured geometry.
pub const SHADER_TEXTURED: &str = "default_3f2f_pt";
/// Shader pair drawing flat-colored geometry.
pub const SHADER_FLAT: &str = "default_3f_p";

const TEXTURED_VERT: &str = "#version 330 core\n\
layout(location = 0) in vec3 aPos;\n\
layout(location = 1) in vec2 aTexCoord;\n\
uniform mat4 model;\n\
out vec2 TexCoord;\n\
void main() {\n\
    gl_Position = model * vec4(aPos, 1.0);\n\
    TexCoord = aTexCoord;\n\
}\n";

const TEXTURED_FRAG: &str = "#version 330 core\n\
in vec2 TexCoord;\n\
out vec4 FragColor;\n\
uniform sampler2D texture0;\n\
void main() {\n\
    FragColor = texture(texture0, TexCoord);\n\
}\n";

const FLAT_VERT: &str = "#version 330 core\n\
layout(location = 0) in vec3 aPos;\n\
uniform mat4 model;\n\
void main() {\n\
    gl_Position = model * vec4(aPos, 1.0);\n\
}\n";

const FLAT_FRAG: &str = "#version 330 core\n\
out vec4 FragColor;\n\
void main() {\n\
    FragColor = vec4(1.0, 1.0, 1.0, 1.0);\n\
}\n";

/// Vertex and fragment source for a named stock shader.
pub fn shader_source(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        SHADER_TEXTURED => Some((TEXTURED_VERT, TEXTURED_FRAG)),
        SHADER_FLAT => Some((FLAT_VERT, FLAT_FRAG)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

/// Placement of a drawn quad in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        ModelTransform {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    TexturedQuad,
    ColorQuad,
}

/// One draw request queued by an attribute. Textures and shaders are
/// named here; the engine resolves names to handles when it drains the
/// queue.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTask {
    pub texture: Option<String>,
    pub shader: String,
    pub geometry: Geometry,
    pub model: ModelTransform,
}

/// Tasks queued during one frame. Drained and discarded every frame,
/// so an attribute that wants to stay visible must queue again.
#[derive(Default)]
pub struct RenderQueue {
    tasks: Vec<RenderTask>,
}

impl RenderQueue {
    pub fn new() -> Self {
        RenderQueue::default()
    }

    pub fn push(&mut self, task: RenderTask) {
        self.tasks.push(task);
    }

    pub fn drain(&mut self) -> Vec<RenderTask> {
        std::mem::take(&mut self.tasks)
    }

    pub fn tasks(&self) -> &[RenderTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

/// Resolved draw request handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub shader: ShaderHandle,
    pub texture: Option<TextureHandle>,
    pub geometry: Geometry,
    pub model: ModelTransform,
}

/// What the backend wants the frame loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePoll {
    Continue,
    Close,
}

/// Presentation seam. The engine owns scenes and the task queue; a
/// backend owns GPU resources and the window, if there is one.
pub trait RenderBackend {
    fn create_texture_from_buffer(&mut self, bytes: &[u8]) -> Option<TextureHandle>;
    fn link_program(&mut self, vertex: &str, fragment: &str) -> Option<ShaderHandle>;
    fn begin_frame(&mut self);
    fn draw(&mut self, call: &DrawCall);
    fn end_frame(&mut self) -> FramePoll;
    fn shutdown(&mut self) {}
}

/// Backend that draws nothing and closes itself after a fixed number
/// of frames. Drives the engine in tests and headless runs.
pub struct HeadlessBackend {
    budget: u64,
    frames: u64,
    draws: u64,
    textures: u32,
    programs: u32,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        HeadlessBackend::with_frame_budget(1)
    }

    pub fn with_frame_budget(budget: u64) -> Self {
        HeadlessBackend {
            budget,
            frames: 0,
            draws: 0,
            textures: 0,
            programs: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn textures_created(&self) -> u32 {
        self.textures
    }

    pub fn programs_linked(&self) -> u32 {
        self.programs
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        HeadlessBackend::new()
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_texture_from_buffer(&mut self, _bytes: &[u8]) -> Option<TextureHandle> {
        self.textures += 1;
        Some(TextureHandle(self.textures))
    }

    fn link_program(&mut self, _vertex: &str, _fragment: &str) -> Option<ShaderHandle> {
        self.programs += 1;
        Some(ShaderHandle(self.programs))
    }

    fn begin_frame(&mut self) {}

    fn draw(&mut self, _call: &DrawCall) {
        self.draws += 1;
    }

    fn end_frame(&mut self) -> FramePoll {
        self.frames += 1;
        if self.frames >= self.budget {
            FramePoll::Close
        } else {
            FramePoll::Continue
        }
    }
}
