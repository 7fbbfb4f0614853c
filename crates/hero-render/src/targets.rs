use super::helpers::{self, TrackedTexture, DEPTH_FORMAT, HDR_FORMAT};
use hero_core::ResourceLedger;

/// Offscreen targets for the scene and the bloom chain.
///
/// - `hdr` holds the scene color in Rgba16Float for post-processing.
/// - `depth` is the matching depth buffer.
/// - `bloom_a`/`bloom_b` are half-res ping-pong buffers for bright-pass and blur.
pub(crate) struct RenderTargets {
    pub(crate) hdr: TrackedTexture,
    pub(crate) depth: TrackedTexture,
    pub(crate) bloom_a: TrackedTexture,
    pub(crate) bloom_b: TrackedTexture,
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        ledger: &mut ResourceLedger,
        width: u32,
        height: u32,
    ) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let hdr = helpers::create_color_texture(device, ledger, "hdr_tex", width, height, HDR_FORMAT, usage);
        let depth = helpers::create_color_texture(
            device,
            ledger,
            "depth_tex",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let bw = (width.max(1) / 2).max(1);
        let bh = (height.max(1) / 2).max(1);
        let bloom_a = helpers::create_color_texture(device, ledger, "bloom_a", bw, bh, HDR_FORMAT, usage);
        let bloom_b = helpers::create_color_texture(device, ledger, "bloom_b", bw, bh, HDR_FORMAT, usage);
        Self {
            hdr,
            depth,
            bloom_a,
            bloom_b,
        }
    }

    pub(crate) fn recreate(
        &mut self,
        device: &wgpu::Device,
        ledger: &mut ResourceLedger,
        width: u32,
        height: u32,
    ) {
        self.release(ledger);
        *self = Self::new(device, ledger, width, height);
    }

    pub(crate) fn release(&self, ledger: &mut ResourceLedger) {
        self.hdr.release(ledger);
        self.depth.release(ledger);
        self.bloom_a.release(ledger);
        self.bloom_b.release(ledger);
    }
}
