//! Render pipeline setup for the editor view and the pick pass

use crate::camera::Camera;
use crate::primitives::Vertex;
use bytemuck::{Pod, Zeroable};
use pitlane_core::{Mat4, MAT4_IDENTITY};

/// Colour format of the pick target. Not sRGB, so id bytes survive exactly.
pub const PICK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame camera data (bind group 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Direction the light travels, w unused
    pub light_dir: [f32; 4],
    /// Tint mixed into selected models
    pub highlight: [f32; 4],
}

impl CameraUniforms {
    pub fn new(camera: &Camera, highlight: [f32; 4]) -> Self {
        Self {
            view_proj: camera.view_projection_matrix(),
            light_dir: [-0.4, -0.3, -0.85, 0.0],
            highlight,
        }
    }
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view_proj: MAT4_IDENTITY,
            light_dir: [-0.4, -0.3, -0.85, 0.0],
            highlight: [1.0, 0.55, 0.1, 1.0],
        }
    }
}

/// Per-draw data (bind group 1)
///
/// `flags.x` samples the texture, `flags.y` marks the draw as selected and
/// `flags.z` skips lighting.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub flags: [u32; 4],
}

impl ModelUniforms {
    /// A lit model draw
    pub fn shaded(model: Mat4, textured: bool, selected: bool) -> Self {
        Self {
            model,
            color: [1.0, 1.0, 1.0, 1.0],
            flags: [textured as u32, selected as u32, 0, 0],
        }
    }

    /// Vertex-coloured geometry with no lighting, used for line overlays
    pub fn unlit() -> Self {
        Self {
            model: MAT4_IDENTITY,
            color: [1.0, 1.0, 1.0, 1.0],
            flags: [0, 0, 1, 0],
        }
    }

    /// A flat id colour for the pick pass
    pub fn pick(model: Mat4, color: [u8; 4]) -> Self {
        Self {
            model,
            color: color.map(|c| c as f32 / 255.0),
            flags: [0, 0, 1, 0],
        }
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::LessEqual,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn primitive_state(topology: wgpu::PrimitiveTopology, cull_mode: Option<wgpu::Face>) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

/// Pipelines for the visible editor view
pub struct EditorPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub line_pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub model_bind_group_layout: wgpu::BindGroupLayout,
}

impl EditorPipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Editor Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("editor_shader.wgsl").into()),
        });

        let camera_bind_group_layout = uniform_layout(device, "Camera Bind Group Layout");
        let model_bind_group_layout = uniform_layout(device, "Model Bind Group Layout");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Editor Pipeline Layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &model_bind_group_layout,
                texture_layout,
            ],
            push_constant_ranges: &[],
        });

        let build = |label: &str, primitive: wgpu::PrimitiveState| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive,
                depth_stencil: Some(depth_state(true)),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let pipeline = build(
            "Editor Model Pipeline",
            primitive_state(wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
        );
        let line_pipeline = build(
            "Editor Line Pipeline",
            primitive_state(wgpu::PrimitiveTopology::LineList, None),
        );

        Self {
            pipeline,
            line_pipeline,
            camera_bind_group_layout,
            model_bind_group_layout,
        }
    }
}

/// Pipeline that writes flat id colours for picking
pub struct PickPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub model_bind_group_layout: wgpu::BindGroupLayout,
}

impl PickPipeline {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Pick Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("pick_shader.wgsl").into()),
        });

        let camera_bind_group_layout = uniform_layout(device, "Pick Camera Bind Group Layout");
        let model_bind_group_layout = uniform_layout(device, "Pick Model Bind Group Layout");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pick Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        // No blending: the written colour must be the id colour exactly
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Pick Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: PICK_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: primitive_state(wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
            depth_stencil: Some(depth_state(true)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_bind_group_layout,
            model_bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 96);
        assert_eq!(std::mem::size_of::<ModelUniforms>(), 96);
    }

    #[test]
    fn test_pick_color_normalized() {
        let u = ModelUniforms::pick(MAT4_IDENTITY, [255, 0, 51, 255]);
        assert_eq!(u.color, [1.0, 0.0, 0.2, 1.0]);
        assert_eq!(u.flags[2], 1);
    }

    #[test]
    fn test_shaded_flags() {
        let u = ModelUniforms::shaded(MAT4_IDENTITY, true, false);
        assert_eq!(u.flags, [1, 0, 0, 0]);
        let u = ModelUniforms::shaded(MAT4_IDENTITY, false, true);
        assert_eq!(u.flags, [0, 1, 0, 0]);
    }
}
