use super::helpers::{self, sampler_entry, texture_entry, uniform_entry, HDR_FORMAT};
use super::targets::RenderTargets;
use super::uniforms::PostUniforms;
use hero_core::{ResourceKind, ResourceLedger};

pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    pub(crate) uniform_buffer: helpers::TrackedBuffer,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

/// Bind groups that reference the size-dependent targets; rebuilt on resize.
pub(crate) struct PostBindGroups {
    pub(crate) hdr: wgpu::BindGroup,
    pub(crate) from_bloom_a: wgpu::BindGroup,
    pub(crate) from_bloom_b: wgpu::BindGroup,
    pub(crate) bloom_a_only: wgpu::BindGroup,
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    ledger: &mut ResourceLedger,
    post_shader: &wgpu::ShaderModule,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl0"),
        entries: &[
            texture_entry(0),
            sampler_entry(1),
            uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl1"),
        entries: &[texture_entry(0), sampler_entry(1)],
    });
    let zero = PostUniforms {
        resolution: [1.0, 1.0],
        blur_dir: [0.0, 0.0],
        bloom_strength: 0.0,
        threshold: 1.0,
        _pad: [0.0; 2],
    };
    let uniform_buffer = helpers::create_buffer(
        device,
        ledger,
        "post_uniforms",
        bytemuck::bytes_of(&zero),
        wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    );
    let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_0"),
        bind_group_layouts: &[&bgl0],
        push_constant_ranges: &[],
    });
    let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_comp"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    let bright_pipeline =
        helpers::make_post_pipeline(device, "bright_pipeline", &pl_bright_blur, post_shader, "fs_bright", HDR_FORMAT, None);
    let blur_pipeline =
        helpers::make_post_pipeline(device, "blur_pipeline", &pl_bright_blur, post_shader, "fs_blur", HDR_FORMAT, None);
    let composite_pipeline = helpers::make_post_pipeline(
        device,
        "composite_pipeline",
        &pl_composite,
        post_shader,
        "fs_composite",
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );
    for label in ["bright_pipeline", "blur_pipeline", "composite_pipeline"] {
        ledger.acquire(ResourceKind::Pipeline, label);
    }

    PostResources {
        bgl0,
        bgl1,
        uniform_buffer,
        bright_pipeline,
        blur_pipeline,
        composite_pipeline,
    }
}

impl PostResources {
    pub(crate) fn bind_groups(
        &self,
        device: &wgpu::Device,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) -> PostBindGroups {
        let with_uniforms = |label: &str, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: self.uniform_buffer.buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: &self.bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        PostBindGroups {
            hdr: with_uniforms("bg_hdr", &targets.hdr.view),
            from_bloom_a: with_uniforms("bg_from_bloom_a", &targets.bloom_a.view),
            from_bloom_b: with_uniforms("bg_from_bloom_b", &targets.bloom_b.view),
            bloom_a_only,
        }
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
