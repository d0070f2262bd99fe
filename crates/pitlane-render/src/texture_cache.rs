//! GPU textures for registered models, with a white fallback for untextured ones

use crate::registry::{ModelHandle, TextureImage};
use std::collections::HashMap;
use wgpu::util::DeviceExt;

/// A GPU-resident texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Model textures keyed by handle
pub struct TextureCache {
    textures: HashMap<ModelHandle, GpuTexture>,
    /// 1x1 white texture, so untextured models sample their vertex colour unchanged
    pub default_white: GpuTexture,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            textures: HashMap::new(),
            default_white: Self::create_1x1(device, queue, [255, 255, 255, 255], "Default White"),
        }
    }

    fn create_1x1(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color: [u8; 4],
        label: &str,
    ) -> GpuTexture {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: 1,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &color,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        GpuTexture {
            texture,
            view,
            sampler,
        }
    }

    /// Upload (or replace) the texture for a model
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        handle: ModelHandle,
        label: &str,
        image: &TextureImage,
    ) {
        let expected = (image.width as usize) * (image.height as usize) * 4;
        if image.width == 0 || image.height == 0 || image.rgba.len() != expected {
            log::warn!(
                "Skipping texture for '{}': {}x{} with {} bytes",
                label,
                image.width,
                image.height,
                image.rgba.len()
            );
            self.textures.remove(&handle);
            return;
        }

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: image.width,
                    height: image.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &image.rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            ..Default::default()
        });

        self.textures.insert(
            handle,
            GpuTexture {
                texture,
                view,
                sampler,
            },
        );
    }

    pub fn remove(&mut self, handle: ModelHandle) {
        self.textures.remove(&handle);
    }

    pub fn get(&self, handle: ModelHandle) -> Option<&GpuTexture> {
        self.textures.get(&handle)
    }

    /// The model's texture, or the white fallback
    pub fn get_or_default(&self, handle: ModelHandle) -> &GpuTexture {
        self.textures.get(&handle).unwrap_or(&self.default_white)
    }
}
