//! CLI command implementations

pub mod check;
pub mod delete;
pub mod inspect;
pub mod pick;
pub mod render;
pub mod select;

use anyhow::{bail, Context, Result};
use clap::Args;
use pitlane_core::EntityId;
use pitlane_course::{CourseGraph, ObjectNameTable};
use pitlane_render::{Camera, FrameRenderer, HeadlessContext, ModelRegistry, RegistryConfig};
use pitlane_scene::{load_course, CourseMetadata};
use pitlane_viewer::{PickBuffer, Viewport};
use std::path::Path;

/// Headless view options shared by the rendering commands
#[derive(Args, Clone, Debug)]
pub struct ViewArgs {
    /// Image width in pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Camera horizontal angle in degrees
    #[arg(long)]
    pub yaw: Option<f32>,

    /// Camera elevation in degrees
    #[arg(long)]
    pub pitch: Option<f32>,

    /// Camera orbit distance (defaults to framing the whole course)
    #[arg(long)]
    pub distance: Option<f32>,

    /// Orthographic projection
    #[arg(long)]
    pub ortho: bool,
}

/// A loaded course with the registry and name table it renders with
pub struct Session {
    pub graph: CourseGraph,
    pub meta: CourseMetadata,
    pub registry: ModelRegistry,
    pub names: ObjectNameTable,
}

impl Session {
    pub fn open(course: &Path, config: Option<&Path>) -> Result<Self> {
        let (graph, meta) = load_course(course)
            .with_context(|| format!("Failed to load course {}", course.display()))?;
        log::info!("Loaded course '{}' ({} entities)", meta.name, graph.len());

        let config = RegistryConfig::load(config).context("Failed to load registry config")?;
        let names = config.load_object_names();
        let registry = ModelRegistry::load(&config).context("Failed to build model registry")?;
        log::info!("Model registry: {} models", registry.len());

        Ok(Self {
            graph,
            meta,
            registry,
            names,
        })
    }

    /// Mark `ids` selected, rejecting ids not in the course
    pub fn preselect(&mut self, ids: &[u32]) -> Result<()> {
        for &raw in ids {
            let id = EntityId::from_raw(raw);
            self.graph
                .set_selected(id, true)
                .with_context(|| format!("Cannot select entity {}", raw))?;
        }
        Ok(())
    }

    /// Camera framing every visible entity, then the command-line overrides
    pub fn camera(&self, viewport: &Viewport, view: &ViewArgs) -> Camera {
        let mut camera = Camera::new();
        camera.aspect = view.width as f32 / view.height as f32;
        camera.orthographic = view.ortho;
        if let Some((min, max)) = viewport.world_bounds(&self.graph) {
            camera.frame_bounds(min, max);
        }
        if let Some(yaw) = view.yaw {
            camera.yaw = yaw.to_radians();
        }
        if let Some(pitch) = view.pitch {
            camera.pitch = pitch.to_radians();
        }
        if let Some(distance) = view.distance {
            camera.distance = distance;
        }
        camera.update_orbit();
        camera
    }
}

/// Headless device with the course's models uploaded
pub struct Gpu {
    pub ctx: HeadlessContext,
    pub frame: FrameRenderer,
}

impl Gpu {
    pub fn new(view: &ViewArgs, registry: &ModelRegistry) -> Result<Self> {
        let ctx = pollster::block_on(HeadlessContext::new(view.width, view.height))
            .context("Failed to create headless render context")?;
        let mut frame = FrameRenderer::new(&ctx.device, &ctx.queue, ctx.format, &registry.config().display);
        let uploaded = frame.prepare(&ctx.device, &ctx.queue, registry);
        log::debug!("Prepared {} GPU models", uploaded);
        Ok(Self { ctx, frame })
    }

    /// Run the pick pass and read it back
    pub fn pick(&self, session: &Session, viewport: &Viewport, camera: &Camera) -> Result<PickBuffer> {
        let list = viewport.build_pick_list(&session.graph, &session.registry, &session.names);
        self.frame
            .render_pick(&self.ctx.device, &self.ctx.queue, camera, &list, &self.ctx.pick_view, &self.ctx.depth_view);
        let pixels = self.ctx.read_pick_pixels().context("Failed to read pick pixels")?;
        PickBuffer::new(self.ctx.width, self.ctx.height, pixels).context("Pick readback has the wrong size")
    }
}

pub fn check_pixel(view: &ViewArgs, x: u32, y: u32) -> Result<()> {
    if x >= view.width || y >= view.height {
        bail!("Pixel ({}, {}) is outside the {}x{} view", x, y, view.width, view.height);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_core::Vec3;
    use pitlane_course::MapObject;
    use pitlane_scene::save_course;

    fn view() -> ViewArgs {
        ViewArgs {
            width: 64,
            height: 32,
            yaw: None,
            pitch: Some(90.0),
            distance: None,
            ortho: false,
        }
    }

    fn write_fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let mut graph = CourseGraph::new();
        graph.add_object(MapObject::new(Vec3::new(0.0, 0.0, 0.0), 1)).unwrap();
        graph.add_object(MapObject::new(Vec3::new(4000.0, 0.0, 0.0), 2)).unwrap();
        let course = dir.join("course.toml");
        save_course(&course, &graph, &CourseMetadata::new("fixture")).unwrap();

        let config = dir.join("pitlane.toml");
        std::fs::write(&config, format!("[resources]\ndir = {:?}\n", dir.join("res"))).unwrap();
        (course, config)
    }

    #[test]
    fn test_session_open_and_frame() {
        let dir = tempfile::tempdir().unwrap();
        let (course, config) = write_fixture(dir.path());

        let session = Session::open(&course, Some(&config)).unwrap();
        assert_eq!(session.graph.len(), 2);
        assert!(!session.registry.is_empty());

        let camera = session.camera(&Viewport::new(), &view());
        assert_eq!(camera.target, Vec3::new(2000.0, 0.0, 0.0));
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_preselect_rejects_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let (course, config) = write_fixture(dir.path());

        let mut session = Session::open(&course, Some(&config)).unwrap();
        let first = session.graph.ids()[0];
        session.preselect(&[first.raw()]).unwrap();
        assert_eq!(session.graph.selection(), vec![first]);
        assert!(session.preselect(&[999]).is_err());
    }

    #[test]
    fn test_check_pixel_bounds() {
        assert!(check_pixel(&view(), 63, 31).is_ok());
        assert!(check_pixel(&view(), 64, 0).is_err());
        assert!(check_pixel(&view(), 0, 32).is_err());
    }
}
