use log::warn;

use crate::attr::AttributeData;
use crate::builtin::transform::{self, Transform};
use crate::builtin::BuiltinAttribute;
use crate::render::{Geometry, RenderTask, SHADER_FLAT};
use crate::scene::UpdateContext;

pub const CAPABILITY: &str = "square";

/// Draws an untextured quad at the owning object's transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Square;

impl BuiltinAttribute for Square {
    fn capability(&self) -> &'static str {
        CAPABILITY
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[transform::CAPABILITY]
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let Some(object) = ctx.objects.get(ctx.object) else {
            return;
        };
        match object.component::<Transform>(transform::CAPABILITY) {
            Ok(transform) => ctx.render.push(RenderTask {
                texture: None,
                shader: SHADER_FLAT.to_string(),
                geometry: Geometry::ColorQuad,
                model: transform.to_model(),
            }),
            Err(_) => warn!("square on '{}' needs a transform to draw", object.name),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

pub fn create(_data: &AttributeData) -> Box<dyn BuiltinAttribute> {
    Box::new(Square)
}
