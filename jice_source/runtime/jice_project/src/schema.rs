use std::fmt;

use serde_json::{json, Value};

use crate::error::SchemaError;

/// Which kind of document an envelope claims to carry. The numeric ids
/// are part of the on-disk format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Project,
    Scene,
    Meta,
}

impl DocumentKind {
    pub fn id(self) -> u64 {
        match self {
            DocumentKind::Project => 0,
            DocumentKind::Scene => 1,
            DocumentKind::Meta => 2,
        }
    }

    pub fn from_id(id: u64) -> Option<DocumentKind> {
        match id {
            0 => Some(DocumentKind::Project),
            1 => Some(DocumentKind::Scene),
            2 => Some(DocumentKind::Meta),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Project => "project",
            DocumentKind::Scene => "scene",
            DocumentKind::Meta => "meta",
        };
        f.write_str(name)
    }
}

/// Checks the `{engine_version, data_id, data}` envelope around every
/// on-disk document and hands back the `data` payload. Checks run in
/// order and the first failure aborts; a document is never partially
/// accepted.
pub fn verify_envelope(value: &Value, kind: DocumentKind) -> Result<&Value, SchemaError> {
    let version = value
        .get("engine_version")
        .ok_or(SchemaError::MissingField {
            field: "engine_version",
        })?;
    let version = version.as_u64().ok_or(SchemaError::FieldType {
        field: "engine_version",
        expected: "an unsigned integer",
    })?;
    if version != u64::from(jice_core::ENGINE_VERSION) {
        return Err(SchemaError::VersionMismatch {
            found: version,
            expected: jice_core::ENGINE_VERSION,
        });
    }

    let data_id = value.get("data_id").ok_or(SchemaError::MissingField {
        field: "data_id",
    })?;
    let data_id = data_id.as_u64().ok_or(SchemaError::FieldType {
        field: "data_id",
        expected: "an unsigned integer",
    })?;
    if data_id != kind.id() {
        return Err(SchemaError::KindMismatch {
            found: data_id,
            expected: kind,
        });
    }

    value
        .get("data")
        .ok_or(SchemaError::MissingField { field: "data" })
}

/// Wraps a payload in the envelope `verify_envelope` expects.
pub fn make_envelope(kind: DocumentKind, data: Value) -> Value {
    json!({
        "engine_version": jice_core::ENGINE_VERSION,
        "data_id": kind.id(),
        "data": data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_envelope_returns_payload() {
        let value = make_envelope(DocumentKind::Scene, json!({"name": "main"}));
        let data = verify_envelope(&value, DocumentKind::Scene).unwrap();
        assert_eq!(data.get("name").and_then(Value::as_str), Some("main"));
    }

    #[test]
    fn missing_version_is_first_error() {
        // Everything else is wrong too; the version check fires first.
        let value = json!({"data_id": 9});
        assert_eq!(
            verify_envelope(&value, DocumentKind::Project).unwrap_err(),
            SchemaError::MissingField {
                field: "engine_version"
            }
        );
    }

    #[test]
    fn version_mismatch_is_reported() {
        let value = json!({"engine_version": 99, "data_id": 0, "data": {}});
        assert_eq!(
            verify_envelope(&value, DocumentKind::Project).unwrap_err(),
            SchemaError::VersionMismatch {
                found: 99,
                expected: jice_core::ENGINE_VERSION
            }
        );
    }

    #[test]
    fn version_must_be_unsigned() {
        let value = json!({"engine_version": "100", "data_id": 0, "data": {}});
        assert_eq!(
            verify_envelope(&value, DocumentKind::Project).unwrap_err(),
            SchemaError::FieldType {
                field: "engine_version",
                expected: "an unsigned integer"
            }
        );
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let value = make_envelope(DocumentKind::Project, json!({}));
        assert_eq!(
            verify_envelope(&value, DocumentKind::Scene).unwrap_err(),
            SchemaError::KindMismatch {
                found: 0,
                expected: DocumentKind::Scene
            }
        );
    }

    #[test]
    fn missing_data_is_reported_last() {
        let value = json!({"engine_version": 100, "data_id": 2});
        assert_eq!(
            verify_envelope(&value, DocumentKind::Meta).unwrap_err(),
            SchemaError::MissingField { field: "data" }
        );
    }

    #[test]
    fn kind_ids_round_trip() {
        for kind in [DocumentKind::Project, DocumentKind::Scene, DocumentKind::Meta] {
            assert_eq!(DocumentKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(DocumentKind::from_id(3), None);
    }
}
