use log::warn;

use crate::attr::{AttrData, AttributeData};
use crate::builtin::transform::{self, Transform};
use crate::builtin::BuiltinAttribute;
use crate::render::{Geometry, RenderTask, SHADER_TEXTURED};
use crate::scene::UpdateContext;

pub const CAPABILITY: &str = "image2d";

/// Draws a textured quad at the owning object's transform every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Image2d {
    pub image: String,
}

impl Image2d {
    pub fn from_data(data: &AttributeData) -> Image2d {
        let image = match data.get("image") {
            Some(AttrData::Str(name)) => name.clone(),
            Some(other) => {
                warn!("image2d entry 'image' holds {} instead of a string", other.kind());
                String::new()
            }
            None => String::new(),
        };
        Image2d { image }
    }
}

impl BuiltinAttribute for Image2d {
    fn capability(&self) -> &'static str {
        CAPABILITY
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[transform::CAPABILITY]
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.image.is_empty() {
            return;
        }
        let Some(object) = ctx.objects.get(ctx.object) else {
            return;
        };
        match object.component::<Transform>(transform::CAPABILITY) {
            Ok(transform) => ctx.render.push(RenderTask {
                texture: Some(self.image.clone()),
                shader: SHADER_TEXTURED.to_string(),
                geometry: Geometry::TexturedQuad,
                model: transform.to_model(),
            }),
            Err(_) => warn!("image2d on '{}' needs a transform to draw", object.name),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

pub fn create(data: &AttributeData) -> Box<dyn BuiltinAttribute> {
    Box::new(Image2d::from_data(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_image_name() {
        let mut data = AttributeData::new();
        data.insert("image".into(), AttrData::Str("logo.png".into()));
        assert_eq!(Image2d::from_data(&data).image, "logo.png");
    }

    #[test]
    fn missing_image_is_empty() {
        assert!(Image2d::from_data(&AttributeData::new()).image.is_empty());
    }

    #[test]
    fn wrong_kind_is_empty() {
        let mut data = AttributeData::new();
        data.insert("image".into(), AttrData::Int(3));
        assert!(Image2d::from_data(&data).image.is_empty());
    }
}
