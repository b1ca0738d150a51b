use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::builtin::BuiltinAttribute;
use crate::scene::UpdateContext;
use crate::script::ScriptAttribute;

/// Typed value carried from project JSON into a running attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrData {
    #[default]
    None,
    VecF(Vec<f32>),
    VecI(Vec<i32>),
    Float(f32),
    Int(i32),
    Str(String),
}

/// Tag identifying which variant an [`AttrData`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    None,
    VecF,
    VecI,
    Float,
    Int,
    Str,
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttrKind::None => "none",
            AttrKind::VecF => "vec_f",
            AttrKind::VecI => "vec_i",
            AttrKind::Float => "float",
            AttrKind::Int => "int",
            AttrKind::Str => "str",
        };
        f.write_str(name)
    }
}

/// Comparison across two different [`AttrKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatch {
    pub left: AttrKind,
    pub right: AttrKind,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot compare {} against {}", self.left, self.right)
    }
}

impl Error for TypeMismatch {}

impl AttrData {
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrData::None => AttrKind::None,
            AttrData::VecF(_) => AttrKind::VecF,
            AttrData::VecI(_) => AttrKind::VecI,
            AttrData::Float(_) => AttrKind::Float,
            AttrData::Int(_) => AttrKind::Int,
            AttrData::Str(_) => AttrKind::Str,
        }
    }

    /// Equality that refuses to compare values of different kinds.
    /// Two `None` values are equal.
    pub fn checked_eq(&self, other: &AttrData) -> Result<bool, TypeMismatch> {
        if self.kind() != other.kind() {
            return Err(TypeMismatch {
                left: self.kind(),
                right: other.kind(),
            });
        }
        Ok(self == other)
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            AttrData::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            AttrData::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrData::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec_f(&self) -> Option<&[f32]> {
        match self {
            AttrData::VecF(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec_i(&self) -> Option<&[i32]> {
        match self {
            AttrData::VecI(v) => Some(v),
            _ => None,
        }
    }
}

/// Named data bag handed to an attribute when it is constructed.
pub type AttributeData = HashMap<String, AttrData>;

/// What an attribute slot was bound to when the scene was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeBinding {
    Script { name: String },
    Builtin { id: String },
}

impl AttributeBinding {
    /// The name this slot answers component queries under.
    pub fn key(&self) -> &str {
        match self {
            AttributeBinding::Script { name } => name,
            AttributeBinding::Builtin { id } => id,
        }
    }
}

/// Live behavior behind an attribute slot.
pub enum AttributeInstance {
    Script(Box<dyn ScriptAttribute>),
    Builtin(Box<dyn BuiltinAttribute>),
}

impl AttributeInstance {
    pub fn dependencies(&self) -> &'static [&'static str] {
        match self {
            AttributeInstance::Script(script) => script.dependencies(),
            AttributeInstance::Builtin(builtin) => builtin.dependencies(),
        }
    }

    /// Builtins have no setup hook; they take their first update here
    /// so dependent scripts never observe an unprimed builtin.
    pub(crate) fn setup(&mut self, ctx: &mut UpdateContext<'_>) {
        match self {
            AttributeInstance::Script(script) => script.setup(ctx),
            AttributeInstance::Builtin(builtin) => builtin.update(ctx),
        }
    }

    pub(crate) fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        match self {
            AttributeInstance::Script(script) => script.update(ctx),
            AttributeInstance::Builtin(builtin) => builtin.update(ctx),
        }
    }
}

/// One attribute attached to a game object. The instance lives in a
/// slot so the scene can lift it out for the duration of a dispatch
/// and hand the rest of the world to it mutably.
pub struct Attribute {
    pub data: AttributeData,
    binding: AttributeBinding,
    slot: Option<AttributeInstance>,
}

impl Attribute {
    pub fn script(name: &str, data: AttributeData, instance: Box<dyn ScriptAttribute>) -> Self {
        Attribute {
            data,
            binding: AttributeBinding::Script {
                name: name.to_string(),
            },
            slot: Some(AttributeInstance::Script(instance)),
        }
    }

    pub fn builtin(id: &str, data: AttributeData, instance: Box<dyn BuiltinAttribute>) -> Self {
        Attribute {
            data,
            binding: AttributeBinding::Builtin { id: id.to_string() },
            slot: Some(AttributeInstance::Builtin(instance)),
        }
    }

    pub fn binding(&self) -> &AttributeBinding {
        &self.binding
    }

    /// Whether this slot satisfies a component query for `key`.
    /// Binding metadata answers, so a slot whose instance is currently
    /// lifted out for dispatch still counts.
    pub fn answers_to(&self, key: &str) -> bool {
        self.binding.key() == key
    }

    pub fn instance(&self) -> Option<&AttributeInstance> {
        self.slot.as_ref()
    }

    pub fn instance_mut(&mut self) -> Option<&mut AttributeInstance> {
        self.slot.as_mut()
    }

    pub(crate) fn take_instance(&mut self) -> Option<AttributeInstance> {
        self.slot.take()
    }

    pub(crate) fn put_instance(&mut self, instance: AttributeInstance) {
        self.slot = Some(instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_eq_same_kind_compares_values() {
        let a = AttrData::Int(4);
        let b = AttrData::Int(4);
        let c = AttrData::Int(5);
        assert_eq!(a.checked_eq(&b), Ok(true));
        assert_eq!(a.checked_eq(&c), Ok(false));
    }

    #[test]
    fn checked_eq_rejects_mixed_kinds() {
        let a = AttrData::Int(4);
        let b = AttrData::Float(4.0);
        let err = a.checked_eq(&b).unwrap_err();
        assert_eq!(err.left, AttrKind::Int);
        assert_eq!(err.right, AttrKind::Float);
    }

    #[test]
    fn checked_eq_none_equals_none() {
        assert_eq!(AttrData::None.checked_eq(&AttrData::None), Ok(true));
    }

    #[test]
    fn vector_kinds_do_not_cross_compare() {
        let f = AttrData::VecF(vec![1.0, 2.0]);
        let i = AttrData::VecI(vec![1, 2]);
        assert!(f.checked_eq(&i).is_err());
        assert_eq!(f.checked_eq(&AttrData::VecF(vec![1.0, 2.0])), Ok(true));
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(AttrData::Float(2.5).as_float(), Some(2.5));
        assert_eq!(AttrData::Float(2.5).as_int(), None);
        assert_eq!(AttrData::Str("hi".into()).as_str(), Some("hi"));
        assert_eq!(AttrData::VecI(vec![7]).as_vec_i(), Some(&[7][..]));
    }
}
