//! Pitlane Render - model registry and wgpu renderer for course entities
//!
//! The [`ModelRegistry`] maps object names to meshes, with generic
//! placeholders for anything that has no model. The [`EntityRenderer`] turns
//! course entities into draw and pick lists through a CPU transform stack,
//! and [`FrameRenderer`] submits those lists to the GPU, either to a window
//! target or to a [`HeadlessContext`].

mod camera;
pub mod config;
mod draw_list;
mod error;
mod frame;
mod gpu_mesh;
mod headless;
pub mod obj;
mod pipeline;
pub mod primitives;
mod registry;
mod renderer;
mod texture_cache;
mod transform_stack;

pub use camera::Camera;
pub use config::{DisplayConfig, RegistryConfig, ResourcePaths};
pub use draw_list::{DrawCommand, DrawList, LineSegment, PickDraw, PickList};
pub use error::RenderError;
pub use frame::FrameRenderer;
pub use gpu_mesh::{GpuModel, GpuModelCache};
pub use headless::HeadlessContext;
pub use pipeline::{CameraUniforms, EditorPipeline, ModelUniforms, PickPipeline, PICK_FORMAT};
pub use primitives::{GenericShape, Mesh, Vertex};
pub use registry::{marker_color, Model, ModelHandle, ModelRegistry, ModelSource, TextureImage};
pub use renderer::{EntityRenderer, EMITTER_HEIGHT};
pub use texture_cache::{GpuTexture, TextureCache};
pub use transform_stack::TransformStack;
