use glam::Vec3;
use log::warn;

use crate::attr::{AttrData, AttributeData};
use crate::builtin::BuiltinAttribute;
use crate::render::ModelTransform;
use crate::scene::UpdateContext;

pub const CAPABILITY: &str = "transform";

/// Position, rotation and scale of a game object. Other attributes on
/// the same object read it through component lookup when they draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Reads `position`, `rotation` and `scale` entries, each a numeric
    /// vector of at least three components. Missing or short entries
    /// keep their defaults.
    pub fn from_data(data: &AttributeData) -> Transform {
        let mut transform = Transform::default();
        if let Some(position) = vec3_entry(data, "position") {
            transform.position = position;
        }
        if let Some(rotation) = vec3_entry(data, "rotation") {
            transform.rotation = rotation;
        }
        if let Some(scale) = vec3_entry(data, "scale") {
            transform.scale = scale;
        }
        transform
    }

    pub fn to_model(&self) -> ModelTransform {
        ModelTransform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

fn vec3_entry(data: &AttributeData, key: &str) -> Option<Vec3> {
    let components: Vec<f32> = match data.get(key)? {
        AttrData::VecF(values) => values.clone(),
        AttrData::VecI(values) => values.iter().map(|v| *v as f32).collect(),
        other => {
            warn!("transform entry '{key}' holds {} instead of a vector", other.kind());
            return None;
        }
    };
    if components.len() < 3 {
        warn!(
            "transform entry '{key}' has {} components, expected 3",
            components.len()
        );
        return None;
    }
    Some(Vec3::new(components[0], components[1], components[2]))
}

impl BuiltinAttribute for Transform {
    fn capability(&self) -> &'static str {
        CAPABILITY
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

pub fn create(data: &AttributeData) -> Box<dyn BuiltinAttribute> {
    Box::new(Transform::from_data(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_data_is_empty() {
        let transform = Transform::from_data(&AttributeData::new());
        assert_eq!(transform.position, Vec3::ZERO);
        assert_eq!(transform.rotation, Vec3::ZERO);
        assert_eq!(transform.scale, Vec3::ONE);
    }

    #[test]
    fn reads_float_vectors() {
        let mut data = AttributeData::new();
        data.insert("position".into(), AttrData::VecF(vec![1.0, 2.0, 3.0]));
        data.insert("scale".into(), AttrData::VecF(vec![2.0, 2.0, 2.0]));
        let transform = Transform::from_data(&data);
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::splat(2.0));
        assert_eq!(transform.rotation, Vec3::ZERO);
    }

    #[test]
    fn integer_vectors_convert() {
        let mut data = AttributeData::new();
        data.insert("position".into(), AttrData::VecI(vec![4, 5, 6]));
        let transform = Transform::from_data(&data);
        assert_eq!(transform.position, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn short_vector_keeps_default() {
        let mut data = AttributeData::new();
        data.insert("position".into(), AttrData::VecF(vec![1.0, 2.0]));
        let transform = Transform::from_data(&data);
        assert_eq!(transform.position, Vec3::ZERO);
    }

    #[test]
    fn non_vector_entry_keeps_default() {
        let mut data = AttributeData::new();
        data.insert("scale".into(), AttrData::Str("big".into()));
        let transform = Transform::from_data(&data);
        assert_eq!(transform.scale, Vec3::ONE);
    }
}
