use std::error::Error;
use std::fmt;
use std::io;

use crate::schema::DocumentKind;

/// Envelope validation failure. Checks run in a fixed order and the
/// first failure wins, so one document yields one error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    MissingField { field: &'static str },
    FieldType { field: &'static str, expected: &'static str },
    VersionMismatch { found: u64, expected: u16 },
    KindMismatch { found: u64, expected: DocumentKind },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::MissingField { field } => {
                write!(f, "envelope field '{field}' is missing")
            }
            SchemaError::FieldType { field, expected } => {
                write!(f, "envelope field '{field}' must be {expected}")
            }
            SchemaError::VersionMismatch { found, expected } => {
                write!(f, "document targets engine version {found}, this build is {expected}")
            }
            SchemaError::KindMismatch { found, expected } => {
                write!(f, "data_id {found} does not mark a {expected} document")
            }
        }
    }
}

impl Error for SchemaError {}

/// Failure loading or interpreting a project-side document.
#[derive(Debug)]
pub enum DocError {
    Io(io::Error),
    Parse(serde_json::Error),
    Schema(SchemaError),
    MissingField { field: &'static str },
    FieldType { field: &'static str, expected: &'static str },
    UnknownVariant { field: &'static str, found: String },
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocError::Io(err) => write!(f, "io failure: {err}"),
            DocError::Parse(err) => write!(f, "malformed json: {err}"),
            DocError::Schema(err) => write!(f, "{err}"),
            DocError::MissingField { field } => {
                write!(f, "required field '{field}' is missing")
            }
            DocError::FieldType { field, expected } => {
                write!(f, "field '{field}' must be {expected}")
            }
            DocError::UnknownVariant { field, found } => {
                write!(f, "field '{field}' has unknown value '{found}'")
            }
        }
    }
}

impl Error for DocError {}

impl From<io::Error> for DocError {
    fn from(err: io::Error) -> Self {
        DocError::Io(err)
    }
}

impl From<serde_json::Error> for DocError {
    fn from(err: serde_json::Error) -> Self {
        DocError::Parse(err)
    }
}

impl From<SchemaError> for DocError {
    fn from(err: SchemaError) -> Self {
        DocError::Schema(err)
    }
}
