//! GPU model cache: uploads registry meshes and textures to GPU buffers

use crate::primitives::Mesh;
use crate::registry::{ModelHandle, ModelRegistry};
use crate::texture_cache::{GpuTexture, TextureCache};
use wgpu::util::DeviceExt;

/// A registered model resident on the GPU
pub struct GpuModel {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    /// Texture and sampler for bind group 2
    pub texture_bind_group: wgpu::BindGroup,
    /// Registry revision this upload was made from
    pub revision: u32,
}

/// Mirror of a [`ModelRegistry`] on the GPU, indexed by handle
pub struct GpuModelCache {
    models: Vec<Option<GpuModel>>,
    textures: TextureCache,
    texture_layout: wgpu::BindGroupLayout,
    default_bind_group: wgpu::BindGroup,
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &GpuTexture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{} Texture Bind Group", label)),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

impl GpuModelCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let textures = TextureCache::new(device, queue);
        let default_bind_group =
            texture_bind_group(device, &texture_layout, &textures.default_white, "Default");

        Self {
            models: Vec::new(),
            textures,
            texture_layout,
            default_bind_group,
        }
    }

    /// Layout of the per-model texture bind group
    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    /// White texture group, for draws that never sample
    pub fn default_texture_bind_group(&self) -> &wgpu::BindGroup {
        &self.default_bind_group
    }

    /// Upload every model that is new or whose revision changed.
    /// Returns the number of models uploaded.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        registry: &ModelRegistry,
    ) -> usize {
        if self.models.len() < registry.len() {
            self.models.resize_with(registry.len(), || None);
        }

        let mut uploaded = 0;
        for (handle, model) in registry.models() {
            let current = self.models[handle.index()].as_ref().map(|m| m.revision);
            if current == Some(model.revision()) {
                continue;
            }
            if model.mesh.is_empty() {
                self.models[handle.index()] = None;
                continue;
            }

            match &model.texture {
                Some(image) => self.textures.upload(device, queue, handle, &model.name, image),
                None => self.textures.remove(handle),
            }
            let texture = self.textures.get_or_default(handle);
            let gpu = self.upload_mesh(device, &model.name, &model.mesh, texture, model.revision());
            self.models[handle.index()] = Some(gpu);
            uploaded += 1;
        }

        if uploaded > 0 {
            log::debug!("Uploaded {} model(s) to the GPU", uploaded);
        }
        uploaded
    }

    fn upload_mesh(
        &self,
        device: &wgpu::Device,
        name: &str,
        mesh: &Mesh,
        texture: &GpuTexture,
        revision: u32,
    ) -> GpuModel {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", name)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let texture_bind_group = texture_bind_group(device, &self.texture_layout, texture, name);

        GpuModel {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            texture_bind_group,
            revision,
        }
    }

    pub fn get(&self, handle: ModelHandle) -> Option<&GpuModel> {
        self.models.get(handle.index()).and_then(|m| m.as_ref())
    }

    /// Number of models currently resident
    pub fn len(&self) -> usize {
        self.models.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
