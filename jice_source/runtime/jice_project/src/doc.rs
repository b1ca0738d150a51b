//! Typed view of the on-disk project documents. Loading applies the
//! field defaults and sanitizers; saving produces enveloped JSON and
//! keeps a `.bak` of whatever it overwrites.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jice_core::attr::AttrData;
use log::warn;
use serde_json::{json, Map, Value};

use crate::error::DocError;
use crate::sanitize::{
    sanitize_identifier, sanitize_text, sanitize_version, IdentClass, Sanitized,
    DEFAULT_AUTHOR, DEFAULT_DESCRIPTION, DEFAULT_OBJECT_ID, DEFAULT_PROJECT_ID,
    DEFAULT_PROJECT_NAME, DEFAULT_VERSION,
};
use crate::schema::{make_envelope, verify_envelope, DocumentKind};

/// Attribute data as authored, sorted by key so consumers see entries
/// in one order everywhere.
pub type DocAttrData = BTreeMap<String, AttrData>;

/// A JSON value that cannot become an [`AttrData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrShapeError {
    Unsupported,
    IntOutOfRange,
}

impl fmt::Display for AttrShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrShapeError::Unsupported => f.write_str("unsupported shape"),
            AttrShapeError::IntOutOfRange => f.write_str("integer exceeds 32-bit range"),
        }
    }
}

impl Error for AttrShapeError {}

/// Converts one authored JSON value: all-integer arrays become `VecI`,
/// other numeric arrays `VecF`, integers `Int`, other numbers `Float`,
/// strings `Str`. Everything else is refused.
pub fn attr_data_from_json(value: &Value) -> Result<AttrData, AttrShapeError> {
    match value {
        Value::Array(items) => {
            let mut all_int = true;
            for item in items {
                if item.is_i64() || item.is_u64() {
                    continue;
                }
                if item.is_f64() {
                    all_int = false;
                    continue;
                }
                return Err(AttrShapeError::Unsupported);
            }
            if all_int {
                let mut ints = Vec::with_capacity(items.len());
                for item in items {
                    let wide = item.as_i64().ok_or(AttrShapeError::IntOutOfRange)?;
                    let narrow =
                        i32::try_from(wide).map_err(|_| AttrShapeError::IntOutOfRange)?;
                    ints.push(narrow);
                }
                Ok(AttrData::VecI(ints))
            } else {
                let floats = items
                    .iter()
                    .map(|item| item.as_f64().unwrap_or(0.0) as f32)
                    .collect();
                Ok(AttrData::VecF(floats))
            }
        }
        Value::Number(number) => {
            if number.is_i64() || number.is_u64() {
                let wide = number.as_i64().ok_or(AttrShapeError::IntOutOfRange)?;
                let narrow = i32::try_from(wide).map_err(|_| AttrShapeError::IntOutOfRange)?;
                Ok(AttrData::Int(narrow))
            } else {
                Ok(AttrData::Float(number.as_f64().unwrap_or(0.0) as f32))
            }
        }
        Value::String(s) => Ok(AttrData::Str(s.clone())),
        _ => Err(AttrShapeError::Unsupported),
    }
}

/// Inverse of [`attr_data_from_json`] for the supported shapes.
/// `AttrData::None` has no JSON form.
pub fn attr_data_to_json(data: &AttrData) -> Option<Value> {
    match data {
        AttrData::None => None,
        AttrData::VecF(values) => Some(Value::Array(
            values.iter().map(|v| json_number(*v)).collect(),
        )),
        AttrData::VecI(values) => Some(Value::Array(
            values.iter().map(|v| Value::Number((*v).into())).collect(),
        )),
        AttrData::Float(v) => Some(json_number(*v)),
        AttrData::Int(v) => Some(Value::Number((*v).into())),
        AttrData::Str(s) => Some(Value::String(s.clone())),
    }
}

fn json_number(value: f32) -> Value {
    serde_json::Number::from_f64(f64::from(value))
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn note(warnings: &mut Vec<String>, message: String) {
    warn!("{message}");
    warnings.push(message);
}

fn apply(result: Sanitized, field: &str, warnings: &mut Vec<String>) -> String {
    if result.dropped > 0 {
        note(
            warnings,
            format!("{field}: dropped {} disallowed character(s)", result.dropped),
        );
    }
    if result.fell_back {
        note(
            warnings,
            format!("{field}: empty after cleaning, using '{}'", result.value),
        );
    }
    result.value
}

fn require_string<'a>(value: &'a Value, field: &'static str) -> Result<&'a str, DocError> {
    match value.get(field) {
        None => Err(DocError::MissingField { field }),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(DocError::FieldType {
            field,
            expected: "a string",
        }),
    }
}

fn optional_string<'a>(
    value: &'a Value,
    field: &'static str,
) -> Result<Option<&'a str>, DocError> {
    match value.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(DocError::FieldType {
            field,
            expected: "a string",
        }),
    }
}

fn optional_bool(value: &Value, field: &'static str) -> Result<Option<bool>, DocError> {
    match value.get(field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(DocError::FieldType {
            field,
            expected: "a boolean",
        }),
    }
}

fn parse_attr_map(
    value: Option<&Value>,
    warnings: &mut Vec<String>,
) -> Result<DocAttrData, DocError> {
    match value {
        None => Ok(DocAttrData::new()),
        Some(Value::Object(map)) => {
            let mut out = DocAttrData::new();
            for (key, entry) in map {
                match attr_data_from_json(entry) {
                    Ok(data) => {
                        out.insert(key.clone(), data);
                    }
                    Err(err) => note(warnings, format!("attribute data '{key}': {err}, skipped")),
                }
            }
            Ok(out)
        }
        Some(_) => Err(DocError::FieldType {
            field: "data",
            expected: "an object",
        }),
    }
}

fn write_with_backup(path: &Path, value: &Value) -> Result<(), DocError> {
    if path.exists() {
        let mut backup = path.as_os_str().to_os_string();
        backup.push(".bak");
        fs::copy(path, PathBuf::from(backup))?;
    }
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    Ok(())
}

/// Splash block of the project manifest, as authored. Whether it can
/// actually run is decided against the classified assets later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplashDoc {
    pub enabled: bool,
    pub image: String,
}

/// The project manifest after defaults and sanitizers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDoc {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub asset_path: String,
    pub script_path: String,
    pub scene_path: String,
    pub splash: Option<SplashDoc>,
}

impl ProjectDoc {
    pub fn load(path: &Path, warnings: &mut Vec<String>) -> Result<ProjectDoc, DocError> {
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        let data = verify_envelope(&value, DocumentKind::Project)?;
        ProjectDoc::from_data(data, warnings)
    }

    /// `id` is the only required field. Absent optional fields default
    /// with a warning; present fields pass through their sanitizer.
    pub fn from_data(data: &Value, warnings: &mut Vec<String>) -> Result<ProjectDoc, DocError> {
        if !data.is_object() {
            return Err(DocError::FieldType {
                field: "data",
                expected: "an object",
            });
        }
        let id_raw = require_string(data, "id")?;
        let id = apply(
            sanitize_identifier(id_raw, IdentClass::ProjectId, DEFAULT_PROJECT_ID),
            "project id",
            warnings,
        );
        let name = match optional_string(data, "name")? {
            Some(raw) => apply(sanitize_text(raw, DEFAULT_PROJECT_NAME), "project name", warnings),
            None => {
                note(warnings, format!("project name missing, using id '{id}'"));
                id.clone()
            }
        };
        let description = match optional_string(data, "description")? {
            Some(raw) => apply(
                sanitize_text(raw, DEFAULT_DESCRIPTION),
                "project description",
                warnings,
            ),
            None => {
                note(warnings, "project description missing, using default".to_string());
                DEFAULT_DESCRIPTION.to_string()
            }
        };
        let version = match optional_string(data, "version")? {
            Some(raw) => apply(sanitize_version(raw), "project version", warnings),
            None => {
                note(warnings, format!("project version missing, using {DEFAULT_VERSION}"));
                DEFAULT_VERSION.to_string()
            }
        };
        let author = match optional_string(data, "author")? {
            Some(raw) => apply(sanitize_text(raw, DEFAULT_AUTHOR), "project author", warnings),
            None => {
                note(warnings, "project author missing, using default".to_string());
                DEFAULT_AUTHOR.to_string()
            }
        };

        let content = match data.get("content") {
            None => None,
            Some(value) if value.is_object() => Some(value),
            Some(_) => {
                return Err(DocError::FieldType {
                    field: "content",
                    expected: "an object",
                })
            }
        };
        let asset_path = content_dir(content, "asset_path", "assets")?;
        let script_path = content_dir(content, "script_path", "scripts")?;
        let scene_path = content_dir(content, "scene_path", "scenes")?;

        let splash = match data.get("splash_screen") {
            None => None,
            Some(value) => {
                if !value.is_object() {
                    return Err(DocError::FieldType {
                        field: "splash_screen",
                        expected: "an object",
                    });
                }
                Some(SplashDoc {
                    enabled: optional_bool(value, "enabled")?.unwrap_or(false),
                    image: optional_string(value, "image")?.unwrap_or("").to_string(),
                })
            }
        };

        Ok(ProjectDoc {
            id,
            name,
            description,
            version,
            author,
            asset_path,
            script_path,
            scene_path,
            splash,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut data = json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "version": self.version,
            "author": self.author,
            "content": {
                "asset_path": self.asset_path,
                "script_path": self.script_path,
                "scene_path": self.scene_path,
            },
        });
        if let Some(splash) = &self.splash {
            data["splash_screen"] = json!({
                "enabled": splash.enabled,
                "image": splash.image,
            });
        }
        make_envelope(DocumentKind::Project, data)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocError> {
        write_with_backup(path, &self.to_json())
    }
}

fn content_dir(
    content: Option<&Value>,
    field: &'static str,
    default: &str,
) -> Result<String, DocError> {
    let Some(content) = content else {
        return Ok(default.to_string());
    };
    match content.get(field) {
        None => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DocError::FieldType {
            field,
            expected: "a string",
        }),
    }
}

/// One attribute entry on an authored object.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeDoc {
    Script { location: String, data: DocAttrData },
    Builtin { id: String, data: DocAttrData },
}

impl AttributeDoc {
    pub fn from_data(value: &Value, warnings: &mut Vec<String>) -> Result<AttributeDoc, DocError> {
        if !value.is_object() {
            return Err(DocError::FieldType {
                field: "attributes",
                expected: "an array of objects",
            });
        }
        let kind = require_string(value, "type")?;
        let data = parse_attr_map(value.get("data"), warnings)?;
        match kind {
            "script" => Ok(AttributeDoc::Script {
                location: require_string(value, "location")?.to_string(),
                data,
            }),
            "builtin" => Ok(AttributeDoc::Builtin {
                id: require_string(value, "id")?.to_string(),
                data,
            }),
            other => Err(DocError::UnknownVariant {
                field: "type",
                found: other.to_string(),
            }),
        }
    }

    pub fn data(&self) -> &DocAttrData {
        match self {
            AttributeDoc::Script { data, .. } => data,
            AttributeDoc::Builtin { data, .. } => data,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut value = match self {
            AttributeDoc::Script { location, .. } => json!({
                "type": "script",
                "location": location,
            }),
            AttributeDoc::Builtin { id, .. } => json!({
                "type": "builtin",
                "id": id,
            }),
        };
        let data = self.data();
        if !data.is_empty() {
            let mut map = Map::new();
            for (key, entry) in data {
                if let Some(converted) = attr_data_to_json(entry) {
                    map.insert(key.clone(), converted);
                }
            }
            value["data"] = Value::Object(map);
        }
        value
    }
}

/// One authored object with its attributes and nested children.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDoc {
    pub id: String,
    pub attributes: Vec<AttributeDoc>,
    pub children: Vec<ObjectDoc>,
}

impl ObjectDoc {
    pub fn from_data(value: &Value, warnings: &mut Vec<String>) -> Result<ObjectDoc, DocError> {
        if !value.is_object() {
            return Err(DocError::FieldType {
                field: "content",
                expected: "an array of objects",
            });
        }
        let id_raw = require_string(value, "id")?;
        let id = apply(
            sanitize_identifier(id_raw, IdentClass::ObjectId, DEFAULT_OBJECT_ID),
            "object id",
            warnings,
        );
        let attributes = match value.get("attributes") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| AttributeDoc::from_data(item, warnings))
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(DocError::FieldType {
                    field: "attributes",
                    expected: "an array",
                })
            }
        };
        let children = match value.get("children") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| ObjectDoc::from_data(item, warnings))
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(DocError::FieldType {
                    field: "children",
                    expected: "an array",
                })
            }
        };
        Ok(ObjectDoc {
            id,
            attributes,
            children,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut value = json!({ "id": self.id });
        if !self.attributes.is_empty() {
            value["attributes"] =
                Value::Array(self.attributes.iter().map(AttributeDoc::to_json).collect());
        }
        if !self.children.is_empty() {
            value["children"] =
                Value::Array(self.children.iter().map(ObjectDoc::to_json).collect());
        }
        value
    }
}

/// One authored scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDoc {
    pub name: String,
    pub three_d: bool,
    pub objects: Vec<ObjectDoc>,
}

impl SceneDoc {
    pub fn load(path: &Path, warnings: &mut Vec<String>) -> Result<SceneDoc, DocError> {
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        let data = verify_envelope(&value, DocumentKind::Scene)?;
        SceneDoc::from_data(data, warnings)
    }

    pub fn from_data(data: &Value, warnings: &mut Vec<String>) -> Result<SceneDoc, DocError> {
        if !data.is_object() {
            return Err(DocError::FieldType {
                field: "data",
                expected: "an object",
            });
        }
        let name = require_string(data, "name")?.to_string();
        let three_d = optional_bool(data, "3d")?.unwrap_or(false);
        let objects = match data.get("content") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| ObjectDoc::from_data(item, warnings))
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(DocError::FieldType {
                    field: "content",
                    expected: "an array",
                })
            }
        };
        Ok(SceneDoc {
            name,
            three_d,
            objects,
        })
    }

    pub fn to_json(&self) -> Value {
        let data = json!({
            "name": self.name,
            "3d": self.three_d,
            "content": self.objects.iter().map(ObjectDoc::to_json).collect::<Vec<_>>(),
        });
        make_envelope(DocumentKind::Scene, data)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocError> {
        write_with_backup(path, &self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DIR_SEQ: AtomicU64 = AtomicU64::new(0);

    fn temp_test_dir() -> PathBuf {
        let seq = TEST_DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let pid = std::process::id();
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("jice_project_test_{pid}_{nonce}_{seq}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn minimal_manifest_gets_defaults() {
        let mut warnings = Vec::new();
        let doc = ProjectDoc::from_data(&json!({"id": "demo"}), &mut warnings).unwrap();
        assert_eq!(doc.id, "demo");
        assert_eq!(doc.name, "demo");
        assert_eq!(doc.description, "No description");
        assert_eq!(doc.version, "0.0.1");
        assert_eq!(doc.author, "Unknown");
        assert_eq!(doc.asset_path, "assets");
        assert_eq!(doc.script_path, "scripts");
        assert_eq!(doc.scene_path, "scenes");
        assert!(doc.splash.is_none());
        // name, description, version, author each warned once
        assert_eq!(warnings.len(), 4);
    }

    #[test]
    fn manifest_without_id_is_refused() {
        let mut warnings = Vec::new();
        let err = ProjectDoc::from_data(&json!({"name": "x"}), &mut warnings).unwrap_err();
        assert!(matches!(err, DocError::MissingField { field: "id" }));
    }

    #[test]
    fn manifest_fields_are_sanitized() {
        let mut warnings = Vec::new();
        let doc = ProjectDoc::from_data(
            &json!({
                "id": "My Game!",
                "name": "  My   Game  ",
                "description": "fun\u{1}",
                "version": "v2..0",
                "author": "me",
            }),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(doc.id, "MyGame");
        assert_eq!(doc.name, "My Game");
        assert_eq!(doc.description, "fun");
        assert_eq!(doc.version, "2.0");
        assert_eq!(doc.author, "me");
        assert!(!warnings.is_empty());
    }

    #[test]
    fn content_dirs_override_defaults() {
        let mut warnings = Vec::new();
        let doc = ProjectDoc::from_data(
            &json!({
                "id": "demo",
                "content": {"asset_path": "art", "scene_path": "levels"},
            }),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(doc.asset_path, "art");
        assert_eq!(doc.script_path, "scripts");
        assert_eq!(doc.scene_path, "levels");
    }

    #[test]
    fn splash_enabled_defaults_to_false() {
        let mut warnings = Vec::new();
        let doc = ProjectDoc::from_data(
            &json!({"id": "demo", "splash_screen": {"image": "logo.png"}}),
            &mut warnings,
        )
        .unwrap();
        let splash = doc.splash.unwrap();
        assert!(!splash.enabled);
        assert_eq!(splash.image, "logo.png");
    }

    #[test]
    fn attr_shapes_convert() {
        assert_eq!(
            attr_data_from_json(&json!([1, 2, 3])),
            Ok(AttrData::VecI(vec![1, 2, 3]))
        );
        assert_eq!(
            attr_data_from_json(&json!([1, 2.5])),
            Ok(AttrData::VecF(vec![1.0, 2.5]))
        );
        assert_eq!(attr_data_from_json(&json!([])), Ok(AttrData::VecI(vec![])));
        assert_eq!(attr_data_from_json(&json!(7)), Ok(AttrData::Int(7)));
        assert_eq!(attr_data_from_json(&json!(7.5)), Ok(AttrData::Float(7.5)));
        assert_eq!(
            attr_data_from_json(&json!("hi")),
            Ok(AttrData::Str("hi".into()))
        );
    }

    #[test]
    fn attr_shapes_refuse_garbage() {
        assert_eq!(
            attr_data_from_json(&json!(true)),
            Err(AttrShapeError::Unsupported)
        );
        assert_eq!(
            attr_data_from_json(&json!({"x": 1})),
            Err(AttrShapeError::Unsupported)
        );
        assert_eq!(
            attr_data_from_json(&json!(["a", "b"])),
            Err(AttrShapeError::Unsupported)
        );
        assert_eq!(
            attr_data_from_json(&json!(4294967296u64)),
            Err(AttrShapeError::IntOutOfRange)
        );
        assert_eq!(
            attr_data_from_json(&json!([1, 4294967296u64])),
            Err(AttrShapeError::IntOutOfRange)
        );
    }

    #[test]
    fn bad_attr_entry_is_skipped_with_warning() {
        let mut warnings = Vec::new();
        let doc = AttributeDoc::from_data(
            &json!({
                "type": "builtin",
                "id": "transform",
                "data": {"position": [0, 1, 0], "weird": true},
            }),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(doc.data().len(), 1);
        assert!(doc.data().contains_key("position"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn unknown_attribute_type_is_refused() {
        let mut warnings = Vec::new();
        let err =
            AttributeDoc::from_data(&json!({"type": "shader"}), &mut warnings).unwrap_err();
        assert!(matches!(
            err,
            DocError::UnknownVariant { field: "type", .. }
        ));
    }

    #[test]
    fn script_attribute_needs_location() {
        let mut warnings = Vec::new();
        let err = AttributeDoc::from_data(&json!({"type": "script"}), &mut warnings).unwrap_err();
        assert!(matches!(err, DocError::MissingField { field: "location" }));
    }

    #[test]
    fn object_ids_are_sanitized_with_fallback() {
        let mut warnings = Vec::new();
        let doc = ObjectDoc::from_data(&json!({"id": "!!!"}), &mut warnings).unwrap();
        assert_eq!(doc.id, "object");
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn scene_round_trips_through_json() {
        let mut data = DocAttrData::new();
        data.insert("position".into(), AttrData::VecI(vec![1, 2, 0]));
        data.insert("speed".into(), AttrData::Float(1.5));
        let scene = SceneDoc {
            name: "main".into(),
            three_d: false,
            objects: vec![ObjectDoc {
                id: "player".into(),
                attributes: vec![
                    AttributeDoc::Builtin {
                        id: "transform".into(),
                        data,
                    },
                    AttributeDoc::Script {
                        location: "player".into(),
                        data: DocAttrData::new(),
                    },
                ],
                children: vec![ObjectDoc {
                    id: "hat".into(),
                    attributes: Vec::new(),
                    children: Vec::new(),
                }],
            }],
        };

        let value = scene.to_json();
        let payload = verify_envelope(&value, DocumentKind::Scene).unwrap();
        let mut warnings = Vec::new();
        let reloaded = SceneDoc::from_data(payload, &mut warnings).unwrap();
        assert_eq!(reloaded, scene);
        assert!(warnings.is_empty());
    }

    #[test]
    fn scene_content_defaults_to_empty() {
        let mut warnings = Vec::new();
        let doc = SceneDoc::from_data(&json!({"name": "main"}), &mut warnings).unwrap();
        assert!(doc.objects.is_empty());
        assert!(!doc.three_d);
    }

    #[test]
    fn save_backs_up_the_previous_file() {
        let dir = temp_test_dir();
        let path = dir.join("main.json");
        let scene = SceneDoc {
            name: "main".into(),
            three_d: false,
            objects: Vec::new(),
        };
        scene.save(&path).unwrap();
        assert!(!dir.join("main.json.bak").exists());

        let changed = SceneDoc {
            name: "main".into(),
            three_d: true,
            objects: Vec::new(),
        };
        changed.save(&path).unwrap();
        let backup = fs::read_to_string(dir.join("main.json.bak")).unwrap();
        assert!(backup.contains("\"3d\": false"));
        let current = fs::read_to_string(&path).unwrap();
        assert!(current.contains("\"3d\": true"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn project_round_trips_through_json() {
        let doc = ProjectDoc {
            id: "demo".into(),
            name: "Demo".into(),
            description: "No description".into(),
            version: "0.1.0".into(),
            author: "Unknown".into(),
            asset_path: "assets".into(),
            script_path: "scripts".into(),
            scene_path: "scenes".into(),
            splash: Some(SplashDoc {
                enabled: true,
                image: "logo.png".into(),
            }),
        };
        let value = doc.to_json();
        let payload = verify_envelope(&value, DocumentKind::Project).unwrap();
        let mut warnings = Vec::new();
        let reloaded = ProjectDoc::from_data(payload, &mut warnings).unwrap();
        assert_eq!(reloaded, doc);
        assert!(warnings.is_empty());
    }
}
