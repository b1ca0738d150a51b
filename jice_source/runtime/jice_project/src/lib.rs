#![forbid(unsafe_code)]

//! On-disk project format: the document envelope, field sanitizers and
//! the typed load/save model shared by the compiler and editor tools.

pub mod doc;
pub mod error;
pub mod sanitize;
pub mod schema;

pub use doc::{
    attr_data_from_json, attr_data_to_json, AttrShapeError, AttributeDoc, DocAttrData,
    ObjectDoc, ProjectDoc, SceneDoc, SplashDoc,
};
pub use error::{DocError, SchemaError};
pub use sanitize::{
    path_symbol, sanitize_identifier, sanitize_text, sanitize_version, IdentClass, Sanitized,
};
pub use schema::{make_envelope, verify_envelope, DocumentKind};
