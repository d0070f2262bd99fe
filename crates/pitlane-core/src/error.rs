//! Error types for Pitlane

use crate::EntityId;
use thiserror::Error;

/// The main error type for Pitlane operations
#[derive(Debug, Error)]
pub enum PitlaneError {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Entity {id} is not a {expected}")]
    WrongEntityKind { id: EntityId, expected: &'static str },

    #[error("Index {index} is out of range for {collection} (len {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: i64,
        len: usize,
    },

    #[error("Checkpoint group {group} still owns {members} enemy point(s)")]
    GroupInUse { group: usize, members: usize },

    #[error("Unknown field '{field}' on {kind}")]
    UnknownField { kind: &'static str, field: String },

    #[error("Field '{0}' is read-only")]
    ReadOnlyField(String),

    #[error("Invalid field type: expected {expected}, got {got}")]
    InvalidFieldType { expected: String, got: String },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("OBJ load error: {0}")]
    ObjLoadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Asset error: {0}")]
    AssetError(String),
}

/// Result type alias for Pitlane operations
pub type Result<T> = std::result::Result<T, PitlaneError>;

impl From<toml::de::Error> for PitlaneError {
    fn from(err: toml::de::Error) -> Self {
        PitlaneError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for PitlaneError {
    fn from(err: toml::ser::Error) -> Self {
        PitlaneError::TomlSerError(err.to_string())
    }
}
