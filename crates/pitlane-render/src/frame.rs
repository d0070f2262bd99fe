//! Submits draw and pick lists to the GPU

use crate::camera::Camera;
use crate::config::DisplayConfig;
use crate::draw_list::{DrawList, LineSegment, PickList};
use crate::gpu_mesh::GpuModelCache;
use crate::pipeline::{CameraUniforms, EditorPipeline, ModelUniforms, PickPipeline};
use crate::primitives::Vertex;
use crate::registry::ModelRegistry;
use wgpu::util::DeviceExt;

/// Owns the pipelines and GPU model mirror for one device
pub struct FrameRenderer {
    editor: EditorPipeline,
    pick: PickPipeline,
    models: GpuModelCache,
    clear_color: wgpu::Color,
    highlight: [f32; 4],
}

impl FrameRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        display: &DisplayConfig,
    ) -> Self {
        let models = GpuModelCache::new(device, queue);
        let editor = EditorPipeline::new(device, format, models.texture_layout());
        let pick = PickPipeline::new(device);
        let clear = display.clear_color;

        Self {
            editor,
            pick,
            models,
            clear_color: wgpu::Color {
                r: clear.r as f64,
                g: clear.g as f64,
                b: clear.b as f64,
                a: clear.a as f64,
            },
            highlight: display.highlight_color.to_array(),
        }
    }

    pub fn models(&self) -> &GpuModelCache {
        &self.models
    }

    /// Bring the GPU mirror up to date with the registry
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, registry: &ModelRegistry) -> usize {
        self.models.prepare(device, queue, registry)
    }

    fn uniform_bind(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        contents: &[u8],
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(label),
        });

        (buffer, bind_group)
    }

    fn line_vertices(lines: &[LineSegment]) -> Vec<Vertex> {
        lines
            .iter()
            .flat_map(|l| [Vertex::line(l.from, l.color), Vertex::line(l.to, l.color)])
            .collect()
    }

    /// Draw the normal view into `target_view`
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        list: &DrawList,
        target_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) {
        let camera_uniforms = CameraUniforms::new(camera, self.highlight);
        let (_camera_buffer, camera_bind) = Self::uniform_bind(
            device,
            &self.editor.camera_bind_group_layout,
            "Camera Uniform Buffer",
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        let mut draws = Vec::with_capacity(list.commands.len());
        for command in &list.commands {
            let Some(gpu) = self.models.get(command.handle) else {
                log::debug!("No GPU model for {:?}, skipping draw", command.handle);
                continue;
            };
            let uniforms = ModelUniforms::shaded(command.model, command.textured, command.selected);
            let (buffer, bind) = Self::uniform_bind(
                device,
                &self.editor.model_bind_group_layout,
                "Model Uniform Buffer",
                bytemuck::cast_slice(&[uniforms]),
            );
            draws.push((gpu, buffer, bind));
        }

        let line_draw = if list.lines.is_empty() {
            None
        } else {
            let vertices = Self::line_vertices(&list.lines);
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Line Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let (uniform, bind) = Self::uniform_bind(
                device,
                &self.editor.model_bind_group_layout,
                "Line Uniform Buffer",
                bytemuck::cast_slice(&[ModelUniforms::unlit()]),
            );
            Some((buffer, uniform, bind, vertices.len() as u32))
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Editor Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Editor Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &camera_bind, &[]);

            render_pass.set_pipeline(&self.editor.pipeline);
            for (gpu, _, bind) in &draws {
                render_pass.set_bind_group(1, bind, &[]);
                render_pass.set_bind_group(2, &gpu.texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }

            if let Some((buffer, _, bind, count)) = &line_draw {
                render_pass.set_bind_group(2, self.models.default_texture_bind_group(), &[]);
                render_pass.set_pipeline(&self.editor.line_pipeline);
                render_pass.set_bind_group(1, bind, &[]);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..*count, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Draw id colours into `pick_view`; the background clears to black (no entity)
    pub fn render_pick(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        list: &PickList,
        pick_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) {
        let (_camera_buffer, camera_bind) = Self::uniform_bind(
            device,
            &self.pick.camera_bind_group_layout,
            "Pick Camera Uniform Buffer",
            bytemuck::cast_slice(&[CameraUniforms::new(camera, self.highlight)]),
        );

        let mut draws = Vec::with_capacity(list.draws.len());
        for draw in &list.draws {
            let Some(gpu) = self.models.get(draw.handle) else {
                log::debug!("No GPU model for {:?}, skipping pick draw", draw.handle);
                continue;
            };
            let (buffer, bind) = Self::uniform_bind(
                device,
                &self.pick.model_bind_group_layout,
                "Pick Model Uniform Buffer",
                bytemuck::cast_slice(&[ModelUniforms::pick(draw.model, draw.color)]),
            );
            draws.push((gpu, buffer, bind));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Pick Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Pick Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: pick_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pick.pipeline);
            render_pass.set_bind_group(0, &camera_bind, &[]);
            for (gpu, _, bind) in &draws {
                render_pass.set_bind_group(1, bind, &[]);
                render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_core::Vec3;

    #[test]
    fn test_line_vertices_pairs() {
        let lines = [
            LineSegment {
                from: Vec3::ZERO,
                to: Vec3::X,
                color: [1.0, 0.0, 0.0, 1.0],
            },
            LineSegment {
                from: Vec3::Y,
                to: Vec3::Z,
                color: [0.0, 1.0, 0.0, 1.0],
            },
        ];
        let vertices = FrameRenderer::line_vertices(&lines);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2].color, [0.0, 1.0, 0.0, 1.0]);
    }
}
