//! Registry and display configuration
//!
//! Loaded with layered precedence (highest wins):
//! 1. Environment variable: `PITLANE_RESOURCES` overrides the resources directory
//! 2. The file named on the command line, or `pitlane.toml` in the working directory
//! 3. Built-in defaults
//!
//! Every field is optional in the file. Relative asset paths are resolved
//! against the resources directory.

use pitlane_core::{Color, PitlaneError, Result};
use pitlane_course::ObjectNameTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "pitlane.toml";

/// Environment variable overriding `resources.dir`
pub const RESOURCES_ENV: &str = "PITLANE_RESOURCES";

/// Asset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePaths {
    pub dir: PathBuf,
    /// Enemy category mapping, `{"Chappy": ["Chappy1", ...]}`
    pub enemy_mapping: PathBuf,
    /// Directory scanned recursively for per-type `*.obj` meshes
    pub models: PathBuf,
    pub sphere: PathBuf,
    pub cylinder: PathBuf,
    pub arrow_head: PathBuf,
    /// Object code name table, `{"GeoItemBox": 1, ...}`
    pub object_names: PathBuf,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("resources"),
            enemy_mapping: PathBuf::from("enemy_model_mapping.json"),
            models: PathBuf::from("objectmodels"),
            sphere: PathBuf::from("unitsphere.obj"),
            cylinder: PathBuf::from("unitcylinder.obj"),
            arrow_head: PathBuf::from("arrow_head.obj"),
            object_names: PathBuf::from("objectnames.json"),
        }
    }
}

/// Viewport look
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Scale applied to the arrow-head mesh when it is drawn
    pub arrow_scale: f32,
    /// Tint blended over selected models
    pub highlight_color: Color,
    pub clear_color: Color,
    /// Edge length of the marker cubes
    pub marker_size: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            arrow_scale: 300.0,
            highlight_color: Color::new(1.0, 0.55, 0.1, 1.0),
            clear_color: Color::new(0.35, 0.4, 0.45, 1.0),
            marker_size: 100.0,
        }
    }
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub resources: ResourcePaths,
    pub display: DisplayConfig,
}

impl RegistryConfig {
    /// Load config: the explicit file if given (it must exist), else
    /// `pitlane.toml` when present, else defaults. Env overrides apply last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::load_from_file(local)?
                } else {
                    log::debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        if let Ok(dir) = std::env::var(RESOURCES_ENV) {
            if !dir.is_empty() {
                log::debug!("{} overrides resources dir with {}", RESOURCES_ENV, dir);
                config.resources.dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }

    /// Load config from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PitlaneError::AssetError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Config rooted at a specific resources directory, everything else default
    pub fn with_resources_dir(dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.resources.dir = dir.into();
        config
    }

    /// Resolve a configured path against the resources directory
    pub fn resource_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.resources.dir.join(path)
        }
    }

    pub fn enemy_mapping_path(&self) -> PathBuf {
        self.resource_path(&self.resources.enemy_mapping)
    }

    pub fn models_dir(&self) -> PathBuf {
        self.resource_path(&self.resources.models)
    }

    pub fn object_names_path(&self) -> PathBuf {
        self.resource_path(&self.resources.object_names)
    }

    /// Load the object name table, degrading to an empty table
    pub fn load_object_names(&self) -> ObjectNameTable {
        let path = self.object_names_path();
        if !path.exists() {
            log::warn!("Object name table {} not found, all objects will show as INVALID", path.display());
            return ObjectNameTable::new();
        }
        match ObjectNameTable::load(&path) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("Failed to load object names from {}: {}", path.display(), e);
                ObjectNameTable::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.display.arrow_scale, 300.0);
        assert_eq!(
            config.enemy_mapping_path(),
            Path::new("resources").join("enemy_model_mapping.json")
        );
        assert_eq!(config.models_dir(), Path::new("resources").join("objectmodels"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = RegistryConfig::from_toml_str(
            r#"
[resources]
dir = "assets"

[display]
arrow_scale = 150.0
"#,
        )
        .unwrap();
        assert_eq!(config.resources.dir, PathBuf::from("assets"));
        assert_eq!(config.resources.sphere, PathBuf::from("unitsphere.obj"));
        assert_eq!(config.display.arrow_scale, 150.0);
        assert_eq!(config.display.marker_size, 100.0);
    }

    #[test]
    fn test_colors_from_toml() {
        let config = RegistryConfig::from_toml_str(
            "[display]\nclear_color = { r = 0.0, g = 0.0, b = 0.0, a = 1.0 }\n",
        )
        .unwrap();
        assert_eq!(config.display.clear_color, Color::BLACK);
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RegistryConfig::with_resources_dir("elsewhere");
        config.resources.object_names = dir.path().join("names.json");
        assert_eq!(config.object_names_path(), dir.path().join("names.json"));
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pitlane.toml");
        std::fs::write(&path, "[display]\nmarker_size = 50.0\n").unwrap();

        let config = RegistryConfig::load_from_file(&path).unwrap();
        assert_eq!(config.display.marker_size, 50.0);
        assert!(RegistryConfig::load_from_file(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(RegistryConfig::from_toml_str("[display\n").is_err());
        assert!(RegistryConfig::from_toml_str("[display]\narrow_scale = \"big\"\n").is_err());
    }

    #[test]
    fn test_object_names_fall_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = RegistryConfig::with_resources_dir(dir.path());
        assert!(config.load_object_names().is_empty());

        std::fs::write(config.object_names_path(), r#"{"GeoItemBox": 1}"#).unwrap();
        assert_eq!(config.load_object_names().label(1), "GeoItemBox");
    }
}
