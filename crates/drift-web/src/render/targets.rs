use super::helpers::{self, HDR_FORMAT};

/// Offscreen color targets: full-resolution HDR scene color and two
/// half-resolution bloom ping-pong textures.
pub(crate) struct RenderTargets {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
}

#[inline]
fn bloom_extent(width: u32, height: u32) -> (u32, u32) {
    ((width.max(1) / 2).max(1), (height.max(1) / 2).max(1))
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (hdr_tex, hdr_view) = helpers::create_color_texture(device, "hdr_tex", width, height, HDR_FORMAT);
        let (bw, bh) = bloom_extent(width, height);
        let (bloom_a, bloom_a_view) = helpers::create_color_texture(device, "bloom_a", bw, bh, HDR_FORMAT);
        let (bloom_b, bloom_b_view) = helpers::create_color_texture(device, "bloom_b", bw, bh, HDR_FORMAT);
        Self {
            width,
            height,
            hdr_tex,
            hdr_view,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
        }
    }

    pub(crate) fn bloom_resolution(&self) -> [f32; 2] {
        let (bw, bh) = bloom_extent(self.width, self.height);
        [bw as f32, bh as f32]
    }

    /// Returns false when the size is unchanged.
    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        *self = Self::new(device, width, height);
        true
    }
}
