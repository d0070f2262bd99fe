//! Model registry - every renderable the viewport can draw, keyed by handle
//!
//! The registry owns CPU-side meshes and texture images. It is built once at
//! startup and passed by reference to the renderer; GPU upload happens
//! separately in [`crate::GpuModelCache`] once a device exists.
//!
//! Name lookups are title-cased first, so `chappy1`, `CHAPPY1` and `Chappy1`
//! all hit the same entry.

use crate::config::RegistryConfig;
use crate::obj::{load_obj, parse_obj};
use crate::primitives::{
    create_box_mesh, create_cone_mesh, create_cylinder_mesh, create_sphere_mesh, GenericShape,
    Mesh,
};
use pitlane_core::{PitlaneError, Result};
use pitlane_course::MarkerKind;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Opaque reference to a registered model. Stable for the registry's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelHandle(u32);

impl ModelHandle {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Where a model's geometry came from
#[derive(Clone, Debug, PartialEq)]
pub enum ModelSource {
    Generic(GenericShape),
    Marker(MarkerKind),
    Sphere,
    Cylinder,
    ArrowHead,
    File(PathBuf),
    Inline,
}

/// Decoded RGBA8 texture image
#[derive(Clone, Debug)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| {
            PitlaneError::AssetError(format!("Failed to open image '{}': {}", path.display(), e))
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }
}

/// A registered mesh with its optional texture
#[derive(Clone, Debug)]
pub struct Model {
    pub name: String,
    pub source: ModelSource,
    pub mesh: Mesh,
    pub texture: Option<TextureImage>,
    revision: u32,
}

impl Model {
    fn new(name: impl Into<String>, source: ModelSource, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            source,
            mesh,
            texture: None,
            revision: 0,
        }
    }

    pub fn textured(&self) -> bool {
        self.texture.is_some()
    }

    /// Bumped whenever the model's geometry is replaced
    pub fn revision(&self) -> u32 {
        self.revision
    }

    fn is_direct(&self) -> bool {
        matches!(self.source, ModelSource::File(_) | ModelSource::Inline)
    }
}

/// Marker cube colours
pub fn marker_color(kind: MarkerKind) -> [f32; 4] {
    match kind {
        MarkerKind::Plain => [0.9, 0.9, 0.9, 1.0],
        MarkerKind::Red => [1.0, 0.0, 0.0, 1.0],
        MarkerKind::Blue => [0.1, 0.1, 1.0, 1.0],
    }
}

/// Title-case a name: the first letter of every alphabetic run is upper-case,
/// the rest lower-case (`"big_chappy2b"` -> `"Big_Chappy2B"`).
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Registry of generic shapes, marker cubes, utility meshes and per-type models
pub struct ModelRegistry {
    config: RegistryConfig,
    models: Vec<Model>,
    by_name: HashMap<String, ModelHandle>,
    generic: HashMap<GenericShape, ModelHandle>,
    markers: HashMap<MarkerKind, ModelHandle>,
    sphere: ModelHandle,
    cylinder: ModelHandle,
    arrow_head: ModelHandle,
}

impl ModelRegistry {
    /// Registry with only the built-in procedural models. Touches no files.
    pub fn new(config: RegistryConfig) -> Self {
        let mut models = Vec::new();
        let mut push = |model: Model| {
            models.push(model);
            ModelHandle(models.len() as u32 - 1)
        };

        let mut generic = HashMap::new();
        for shape in GenericShape::ALL {
            let name = shape.category().unwrap_or("Generic");
            generic.insert(shape, push(Model::new(name, ModelSource::Generic(shape), shape.mesh())));
        }

        let size = config.display.marker_size;
        let mut markers = HashMap::new();
        for kind in [MarkerKind::Plain, MarkerKind::Red, MarkerKind::Blue] {
            let mesh = create_box_mesh(size, size, size, marker_color(kind));
            markers.insert(
                kind,
                push(Model::new(format!("{:?}Cube", kind), ModelSource::Marker(kind), mesh)),
            );
        }

        let white = [1.0, 1.0, 1.0, 1.0];
        let sphere = push(Model::new(
            "UnitSphere",
            ModelSource::Sphere,
            create_sphere_mesh(1.0, 16, 8, white),
        ));
        let cylinder = push(Model::new(
            "UnitCylinder",
            ModelSource::Cylinder,
            create_cylinder_mesh(1.0, 1.0, 16, white),
        ));
        let arrow_head = push(Model::new(
            "ArrowHead",
            ModelSource::ArrowHead,
            create_cone_mesh(0.1, 0.3, 12, [1.0, 0.85, 0.0, 1.0]),
        ));

        Self {
            config,
            models,
            by_name: HashMap::new(),
            generic,
            markers,
            sphere,
            cylinder,
            arrow_head,
        }
    }

    /// Build the registry from the configured resources directory.
    ///
    /// Missing or unreadable assets are logged and skipped; only a malformed
    /// enemy mapping file is an error.
    pub fn load(config: &RegistryConfig) -> Result<Self> {
        let mut registry = Self::new(config.clone());

        let mapping = config.enemy_mapping_path();
        if mapping.exists() {
            let json = std::fs::read_to_string(&mapping)?;
            let mapped = registry.apply_enemy_mapping(&json)?;
            log::info!("Mapped {} enemy names from {}", mapped, mapping.display());
        } else {
            log::warn!("Enemy model mapping {} not found", mapping.display());
        }

        registry.load_utility_meshes();
        let loaded = registry.rescan_models();
        log::info!(
            "Model registry ready: {} models, {} names ({} loaded from {})",
            registry.len(),
            registry.by_name.len(),
            loaded,
            config.models_dir().display()
        );
        Ok(registry)
    }

    /// Map every enemy name listed under a known category to that category's
    /// shared generic shape. Names with a direct mesh keep it.
    pub fn apply_enemy_mapping(&mut self, json: &str) -> Result<usize> {
        let mapping: BTreeMap<String, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| PitlaneError::ParseError(format!("enemy model mapping: {}", e)))?;

        let mut mapped = 0;
        for (category, names) in mapping {
            let Some(shape) = GenericShape::from_category(&category) else {
                log::debug!("No generic shape for enemy category '{}'", category);
                continue;
            };
            let handle = self.generic[&shape];
            for name in names {
                let key = title_case(&name);
                if self.lookup(&key).is_some_and(|h| self.models[h.index()].is_direct()) {
                    continue;
                }
                self.by_name.insert(key, handle);
                mapped += 1;
            }
        }
        Ok(mapped)
    }

    /// Replace the procedural utility meshes with the configured OBJ assets
    fn load_utility_meshes(&mut self) {
        let slots = [
            (self.sphere, self.config.resources.sphere.clone()),
            (self.cylinder, self.config.resources.cylinder.clone()),
            (self.arrow_head, self.config.resources.arrow_head.clone()),
        ];
        for (handle, relative) in slots {
            let path = self.config.resource_path(&relative);
            if !path.exists() {
                log::warn!("{} not found, using built-in {}", path.display(), self.models[handle.index()].name);
                continue;
            }
            match load_obj(&path) {
                Ok(mut mesh) => {
                    mesh.convert_y_up_to_z_up();
                    let model = &mut self.models[handle.index()];
                    model.mesh = mesh;
                    model.revision += 1;
                }
                Err(e) => log::warn!("Failed to load {}: {}", path.display(), e),
            }
        }
    }

    /// Scan the models directory recursively for `*.obj` files. Returns how
    /// many meshes were loaded; broken files are logged and skipped.
    pub fn rescan_models(&mut self) -> usize {
        let dir = self.config.models_dir();
        if !dir.is_dir() {
            log::warn!("Models directory {} not found", dir.display());
            return 0;
        }

        let mut files = Vec::new();
        collect_obj_files(&dir, &mut files);
        files.sort();

        let mut loaded = 0;
        for path in files {
            match self.register_mesh_file(&path) {
                Ok(_) => loaded += 1,
                Err(e) => log::warn!("Skipping model {}: {}", path.display(), e),
            }
        }
        loaded
    }

    /// Register one OBJ file under its title-cased file stem, with a
    /// same-stem `.png` texture when one exists
    pub fn register_mesh_file(&mut self, path: &Path) -> Result<ModelHandle> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| PitlaneError::AssetError(format!("Bad model file name {}", path.display())))?;

        let mut mesh = load_obj(path)?;
        mesh.convert_y_up_to_z_up();

        let mut model = Model::new(title_case(stem), ModelSource::File(path.to_path_buf()), mesh);
        let texture_path = path.with_extension("png");
        if texture_path.exists() {
            match TextureImage::load(&texture_path) {
                Ok(texture) => model.texture = Some(texture),
                Err(e) => log::warn!("{}; drawing {} untextured", e, model.name),
            }
        }

        log::debug!("Registered model {} from {}", model.name, path.display());
        Ok(self.insert_direct(model))
    }

    /// Register a mesh from OBJ text. Visible from the next resolve on.
    pub fn register_mesh_text(&mut self, name: &str, obj_text: &str) -> Result<ModelHandle> {
        let mut mesh = parse_obj(obj_text)?;
        mesh.convert_y_up_to_z_up();
        Ok(self.insert_direct(Model::new(title_case(name), ModelSource::Inline, mesh)))
    }

    /// Insert a direct mesh. Re-registering a name replaces the geometry in
    /// place so the handle stays valid.
    fn insert_direct(&mut self, mut model: Model) -> ModelHandle {
        if let Some(handle) = self.lookup(&model.name) {
            let existing = &mut self.models[handle.index()];
            if existing.is_direct() {
                model.revision = existing.revision + 1;
                *existing = model;
                return handle;
            }
        }

        let handle = ModelHandle(self.models.len() as u32);
        self.by_name.insert(model.name.clone(), handle);
        self.models.push(model);
        handle
    }

    /// Handle for a type name, falling back to the untextured generic shape
    pub fn resolve(&self, name: &str) -> ModelHandle {
        self.lookup(name).unwrap_or_else(|| self.fallback())
    }

    /// Handle for a type name, if the name is mapped
    pub fn lookup(&self, name: &str) -> Option<ModelHandle> {
        self.by_name.get(&title_case(name)).copied()
    }

    pub fn fallback(&self) -> ModelHandle {
        self.generic[&GenericShape::Object]
    }

    pub fn generic(&self, shape: GenericShape) -> ModelHandle {
        self.generic[&shape]
    }

    pub fn marker(&self, kind: MarkerKind) -> ModelHandle {
        self.markers[&kind]
    }

    pub fn sphere(&self) -> ModelHandle {
        self.sphere
    }

    pub fn cylinder(&self) -> ModelHandle {
        self.cylinder
    }

    pub fn arrow_head(&self) -> ModelHandle {
        self.arrow_head
    }

    pub fn model(&self, handle: ModelHandle) -> Option<&Model> {
        self.models.get(handle.index())
    }

    pub fn is_textured(&self, handle: ModelHandle) -> bool {
        self.model(handle).is_some_and(Model::textured)
    }

    /// All models with their handles, in registration order
    pub fn models(&self) -> impl Iterator<Item = (ModelHandle, &Model)> {
        self.models
            .iter()
            .enumerate()
            .map(|(i, m)| (ModelHandle(i as u32), m))
    }

    /// Every mapped name, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

fn collect_obj_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_obj_files(&path, out);
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"))
        {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn registry_in(dir: &Path) -> ModelRegistry {
        ModelRegistry::load(&RegistryConfig::with_resources_dir(dir)).unwrap()
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("chappy1"), "Chappy1");
        assert_eq!(title_case("CHAPPY1"), "Chappy1");
        assert_eq!(title_case("big_chappy2b"), "Big_Chappy2B");
        assert_eq!(title_case("GeoItemBox"), "Geoitembox");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_unknown_name_resolves_to_untextured_fallback() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let handle = registry.resolve("NoSuchThing");
        assert_eq!(handle, registry.fallback());
        assert!(!registry.is_textured(handle));
        assert!(registry.lookup("NoSuchThing").is_none());
    }

    #[test]
    fn test_category_mapping_shares_generic_handle() {
        let mut registry = ModelRegistry::new(RegistryConfig::default());
        let mapped = registry
            .apply_enemy_mapping(r#"{"Chappy": ["Chappy1", "chappy2"], "Wall": ["Crystal"]}"#)
            .unwrap();
        assert_eq!(mapped, 2);

        let chappy = registry.generic(GenericShape::Chappy);
        assert_eq!(registry.resolve("Chappy1"), chappy);
        assert_eq!(registry.resolve("CHAPPY2"), chappy);
        assert_ne!(chappy, registry.fallback());
        // Unknown categories map nothing
        assert_eq!(registry.resolve("Crystal"), registry.fallback());
    }

    #[test]
    fn test_bad_mapping_json_is_an_error() {
        let mut registry = ModelRegistry::new(RegistryConfig::default());
        assert!(registry.apply_enemy_mapping("{\"Chappy\": 3}").is_err());

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("enemy_model_mapping.json"), "not json").unwrap();
        assert!(ModelRegistry::load(&RegistryConfig::with_resources_dir(dir.path())).is_err());
    }

    #[test]
    fn test_load_with_empty_resources() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(dir.path());
        assert_eq!(registry.len(), GenericShape::ALL.len() + 3 + 3);
        assert!(registry.names().is_empty());

        let handles = [registry.sphere(), registry.cylinder(), registry.arrow_head()];
        assert_ne!(handles[0], handles[1]);
        assert_ne!(handles[1], handles[2]);
        assert!(!registry.model(registry.sphere()).unwrap().mesh.is_empty());
    }

    #[test]
    fn test_scan_models_recursively_with_texture() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("objectmodels").join("items");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("GeoItemBox.obj"), TRIANGLE).unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]))
            .save(nested.join("GeoItemBox.png"))
            .unwrap();
        std::fs::write(dir.path().join("objectmodels").join("Plain.obj"), TRIANGLE).unwrap();

        let registry = registry_in(dir.path());
        let item = registry.lookup("GeoItemBox").unwrap();
        assert!(registry.is_textured(item));
        let texture = registry.model(item).unwrap().texture.as_ref().unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(texture.rgba.len(), 16);

        let plain = registry.lookup("plain").unwrap();
        assert!(!registry.is_textured(plain));
    }

    #[test]
    fn test_direct_mesh_overrides_category() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("enemy_model_mapping.json"),
            r#"{"Chappy": ["Chappy1", "Chappy2"]}"#,
        )
        .unwrap();
        let models = dir.path().join("objectmodels");
        std::fs::create_dir_all(&models).unwrap();
        std::fs::write(models.join("chappy1.obj"), TRIANGLE).unwrap();

        let registry = registry_in(dir.path());
        let chappy = registry.generic(GenericShape::Chappy);
        assert_ne!(registry.resolve("Chappy1"), chappy);
        assert_eq!(registry.resolve("Chappy2"), chappy);
    }

    #[test]
    fn test_broken_assets_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let models = dir.path().join("objectmodels");
        std::fs::create_dir_all(&models).unwrap();
        std::fs::write(models.join("Broken.obj"), "v 1 2\nf 1 2 3\n").unwrap();
        std::fs::write(models.join("Good.obj"), TRIANGLE).unwrap();
        std::fs::write(models.join("Good.png"), "not a png").unwrap();
        std::fs::write(dir.path().join("unitsphere.obj"), "garbage").unwrap();

        let registry = registry_in(dir.path());
        assert_eq!(registry.resolve("Broken"), registry.fallback());
        let good = registry.lookup("Good").unwrap();
        assert!(!registry.is_textured(good));
        // Built-in sphere survives a broken asset
        assert_eq!(registry.model(registry.sphere()).unwrap().revision(), 0);
    }

    #[test]
    fn test_utility_mesh_from_asset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("arrow_head.obj"), TRIANGLE).unwrap();

        let registry = registry_in(dir.path());
        let arrow = registry.model(registry.arrow_head()).unwrap();
        assert_eq!(arrow.revision(), 1);
        assert_eq!(arrow.mesh.vertex_count(), 3);
        // Converted to world axes: authored +Y becomes world +Z
        assert_eq!(arrow.mesh.vertices[2].position, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_registered_text_is_visible_and_stable() {
        let mut registry = ModelRegistry::new(RegistryConfig::default());
        assert_eq!(registry.resolve("Kart"), registry.fallback());

        let handle = registry.register_mesh_text("kart", TRIANGLE).unwrap();
        assert_eq!(registry.resolve("Kart"), handle);

        let again = registry.register_mesh_text("KART", TRIANGLE).unwrap();
        assert_eq!(again, handle);
        assert_eq!(registry.model(handle).unwrap().revision(), 1);

        assert!(registry.register_mesh_text("bad", "f 1 2 3").is_err());
        assert_eq!(registry.resolve("bad"), registry.fallback());
    }

    #[test]
    fn test_markers_have_distinct_colors() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let red = registry.model(registry.marker(MarkerKind::Red)).unwrap();
        let blue = registry.model(registry.marker(MarkerKind::Blue)).unwrap();
        assert_eq!(red.mesh.vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(blue.mesh.vertices[0].color, marker_color(MarkerKind::Blue));
    }
}
