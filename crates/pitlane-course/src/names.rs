//! Object name table - maps object type codes to display names

use bimap::BiMap;
use pitlane_core::{PitlaneError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Label shown for object codes missing from the table
pub const INVALID_LABEL: &str = "INVALID";

/// Bidirectional object code <-> name table, loaded from JSON
/// (`{"GeoItemBox": 1, ...}`).
#[derive(Debug, Clone, Default)]
pub struct ObjectNameTable {
    names: BiMap<u16, String>,
}

impl ObjectNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, u16)>) -> Self {
        let mut table = Self::new();
        for (name, code) in pairs {
            table.insert(name, code);
        }
        table
    }

    /// Parse the JSON name table
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, u16> = serde_json::from_str(json)
            .map_err(|e| PitlaneError::ParseError(format!("object name table: {}", e)))?;

        let mut table = Self::new();
        for (name, code) in raw {
            if let Some(existing) = table.names.get_by_left(&code) {
                log::warn!(
                    "Object code {} is named both '{}' and '{}', keeping '{}'",
                    code,
                    existing,
                    name,
                    name
                );
            }
            table.insert(&name, code);
        }
        Ok(table)
    }

    /// Load the JSON name table from a file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&json)?;
        log::debug!("Loaded {} object names from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn insert(&mut self, name: &str, code: u16) {
        self.names.insert(code, name.to_string());
    }

    /// Name for a code, if the table knows it
    pub fn name(&self, code: u16) -> Option<&str> {
        self.names.get_by_left(&code).map(String::as_str)
    }

    /// Editor-facing label: the name, or `INVALID` for unknown codes
    pub fn label(&self, code: u16) -> &str {
        self.name(code).unwrap_or(INVALID_LABEL)
    }

    pub fn code(&self, name: &str) -> Option<u16> {
        self.names.get_by_right(name).copied()
    }

    pub fn contains(&self, code: u16) -> bool {
        self.names.contains_left(&code)
    }

    /// All names in code order, for populating a dropdown
    pub fn labels(&self) -> Vec<&str> {
        let mut entries: Vec<(u16, &str)> = self
            .names
            .iter()
            .map(|(code, name)| (*code, name.as_str()))
            .collect();
        entries.sort_by_key(|(code, _)| *code);
        entries.into_iter().map(|(_, name)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
