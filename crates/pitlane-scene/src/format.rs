//! Course snapshot format definitions

use pitlane_course::Course;
use serde::{Deserialize, Serialize};

/// Root structure of a course TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseFile {
    pub course: CourseMetadata,
    /// Entity collections as top-level arrays of tables
    #[serde(flatten)]
    pub data: Course,
}

/// Course metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseMetadata {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl CourseMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            description: None,
        }
    }
}

impl CourseFile {
    /// Create an empty course file
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            course: CourseMetadata::new(name),
            data: Course::new(),
        }
    }
}
