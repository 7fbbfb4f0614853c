//! wgpu renderer for the hero scene.
//!
//! The scene is drawn into an HDR target (sky, terrain, particles), optionally run
//! through a bright-pass/blur bloom chain, then composited onto the surface with
//! premultiplied alpha so a transparent background shows the page beneath.

mod helpers;
mod meshes;
mod post;
mod targets;
mod uniforms;

use helpers::TrackedBuffer;
use hero_core::{
    DisposeOnce, Renderer, ResourceId, ResourceKind, ResourceLedger, Scene, POST_WGSL, SCENE_WGSL,
};
use meshes::{FieldGpu, MeshGpu, ScenePipelines};
use post::{PostBindGroups, PostResources};
use targets::RenderTargets;
use uniforms::{FrameUniforms, PostUniforms};

/// Everything created from the device. Dropped as a unit on dispose.
struct GpuResources {
    pipelines: ScenePipelines,
    sampler: wgpu::Sampler,
    frame_buffer: TrackedBuffer,
    frame_bind_group: wgpu::BindGroup,
    meshes: Vec<MeshGpu>,
    fields: Vec<FieldGpu>,
    targets: RenderTargets,
    post: PostResources,
    post_groups: PostBindGroups,
}

impl GpuResources {
    fn release(&self, ledger: &mut ResourceLedger) {
        self.frame_buffer.release(ledger);
        for mesh in &self.meshes {
            mesh.release(ledger);
        }
        for field in &self.fields {
            field.release(ledger);
        }
        self.targets.release(ledger);
        self.post.uniform_buffer.release(ledger);
    }
}

pub struct GpuState<'w> {
    surface: Option<wgpu::Surface<'w>>,
    surface_id: ResourceId,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    resources: Option<GpuResources>,
    ledger: ResourceLedger,
    teardown: DisposeOnce,
}

impl<'w> GpuState<'w> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
        scene: &Scene,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // Transparent page backgrounds need the compositor to respect alpha.
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] surface {}x{} format={:?} alpha={:?} adapter={}",
            width,
            height,
            format,
            alpha_mode,
            adapter.get_info().name
        );

        let mut ledger = ResourceLedger::new();
        let surface_id = ledger.acquire(ResourceKind::Surface, "surface");
        let resources = Self::create_resources(&device, &queue, &mut ledger, format, width, height, scene);

        Ok(Self {
            surface: Some(surface),
            surface_id,
            device,
            queue,
            config,
            resources: Some(resources),
            ledger,
            teardown: DisposeOnce::default(),
        })
    }

    fn create_resources(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        ledger: &mut ResourceLedger,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &Scene,
    ) -> GpuResources {
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(POST_WGSL.into()),
        });

        let pipelines = meshes::create_scene_pipelines(device, ledger, &scene_shader);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        ledger.acquire(ResourceKind::Sampler, "linear_sampler");

        let frame_buffer = helpers::create_buffer(
            device,
            ledger,
            "frame_uniforms",
            bytemuck::bytes_of(&FrameUniforms::from_scene(scene)),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bg"),
            layout: &pipelines.frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.buffer.as_entire_binding(),
            }],
        });
        ledger.acquire(ResourceKind::BindGroup, "frame_bg");

        let terrain = scene.terrain();
        let meshes = terrain
            .objects
            .iter()
            .zip(terrain.model_matrices())
            .map(|(object, model)| MeshGpu::new(device, queue, ledger, &pipelines, &sampler, object, model))
            .collect();
        let fields = scene
            .particles()
            .iter()
            .enumerate()
            .map(|(i, field)| FieldGpu::new(device, ledger, &pipelines, field, i))
            .collect();

        let targets = RenderTargets::new(device, ledger, width, height);
        let post = post::create_post_resources(device, ledger, &post_shader, format);
        let post_groups = post.bind_groups(device, &targets, &sampler);

        GpuResources {
            pipelines,
            sampler,
            frame_buffer,
            frame_bind_group,
            meshes,
            fields,
            targets,
            post,
            post_groups,
        }
    }

    fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        if let Some(res) = self.resources.as_mut() {
            res.targets.recreate(&self.device, &mut self.ledger, width, height);
            res.post_groups = res.post.bind_groups(&self.device, &res.targets, &res.sampler);
        }
        log::debug!("[gpu] resized to {}x{}", width, height);
    }

    fn reconfigure(&self) {
        if let Some(surface) = self.surface.as_ref() {
            surface.configure(&self.device, &self.config);
        }
    }

    /// Draw one frame at the current surface size. A disposed renderer draws nothing.
    fn render_scene(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let (Some(surface), Some(res)) = (self.surface.as_ref(), self.resources.as_ref()) else {
            return Ok(());
        };

        self.queue
            .write_buffer(&res.frame_buffer.buffer, 0, bytemuck::bytes_of(&FrameUniforms::from_scene(scene)));
        let terrain = scene.terrain();
        for ((mesh, object), model) in res.meshes.iter().zip(&terrain.objects).zip(terrain.model_matrices()) {
            mesh.update(&self.queue, object, model);
        }
        for (gpu, field) in res.fields.iter().zip(scene.particles()) {
            gpu.update(&self.queue, field);
        }

        let frame = surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &res.targets.hdr.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &res.targets.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &res.frame_bind_group, &[]);

            if scene.background().opacity > 0.0 {
                rpass.set_pipeline(&res.pipelines.sky);
                rpass.draw(0..3, 0..1);
            }

            rpass.set_pipeline(&res.pipelines.mesh);
            for mesh in &res.meshes {
                rpass.set_bind_group(1, &mesh.bind_group, &[]);
                rpass.set_vertex_buffer(0, mesh.vertex.buffer.slice(..));
                rpass.set_index_buffer(mesh.index.buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            for field in &res.fields {
                if field.count == 0 {
                    continue;
                }
                let pipeline = if field.additive {
                    &res.pipelines.particle_additive
                } else {
                    &res.pipelines.particle_alpha
                };
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(1, &field.bind_group, &[]);
                rpass.set_vertex_buffer(0, field.instances.buffer.slice(..));
                rpass.draw(0..6, 0..field.count);
            }
        }

        let (width, height) = (self.config.width, self.config.height);
        let full = [width as f32, height as f32];
        let half = [(width / 2).max(1) as f32, (height / 2).max(1) as f32];
        let (strength, threshold) = scene
            .bloom()
            .map_or((0.0, 1.0), |b| (b.intensity, b.threshold));
        let write_post = |resolution: [f32; 2], blur_dir: [f32; 2]| {
            let pu = PostUniforms {
                resolution,
                blur_dir,
                bloom_strength: strength,
                threshold,
                _pad: [0.0; 2],
            };
            self.queue
                .write_buffer(&res.post.uniform_buffer.buffer, 0, bytemuck::bytes_of(&pu));
        };

        // Each post pass gets its own submit so the shared uniform buffer holds the
        // values that pass expects.
        if strength > 0.0 {
            write_post(full, [0.0, 0.0]);
            post::blit(
                &mut encoder,
                "bright_pass",
                &res.targets.bloom_a.view,
                wgpu::Color::BLACK,
                &res.post.bright_pipeline,
                &res.post_groups.hdr,
                None,
            );
            self.queue.submit(Some(encoder.finish()));

            write_post(half, [1.0, 0.0]);
            let mut enc = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("blur_h"),
            });
            post::blit(
                &mut enc,
                "blur_h",
                &res.targets.bloom_b.view,
                wgpu::Color::BLACK,
                &res.post.blur_pipeline,
                &res.post_groups.from_bloom_a,
                None,
            );
            self.queue.submit(Some(enc.finish()));

            write_post(half, [0.0, 1.0]);
            let mut enc = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("blur_v"),
            });
            post::blit(
                &mut enc,
                "blur_v",
                &res.targets.bloom_a.view,
                wgpu::Color::BLACK,
                &res.post.blur_pipeline,
                &res.post_groups.from_bloom_b,
                None,
            );
            self.queue.submit(Some(enc.finish()));
        } else {
            self.queue.submit(Some(encoder.finish()));
        }

        write_post(full, [0.0, 0.0]);
        let mut enc = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("composite"),
        });
        post::blit(
            &mut enc,
            "composite",
            &view,
            wgpu::Color::TRANSPARENT,
            &res.post.composite_pipeline,
            &res.post_groups.hdr,
            Some(&res.post_groups.bloom_a_only),
        );
        self.queue.submit(Some(enc.finish()));
        frame.present();
        Ok(())
    }

    /// Release every GPU resource and drop the surface. Safe to call repeatedly.
    pub fn dispose(&mut self) -> bool {
        let resources = &mut self.resources;
        let surface = &mut self.surface;
        let ledger = &mut self.ledger;
        let surface_id = self.surface_id;
        self.teardown.run(|| {
            if let Some(res) = resources.take() {
                res.release(ledger);
            }
            surface.take();
            ledger.release(surface_id);
            let rest = ledger.release_all();
            log::info!(
                "[gpu] disposed ({} resources acquired, {} pipelines/bind groups dropped)",
                ledger.acquired_count(),
                rest.len()
            );
        })
    }

}

impl Renderer for GpuState<'_> {
    fn resize(&mut self, width: u32, height: u32) {
        self.resize_if_needed(width, height);
    }

    fn render(&mut self, scene: &Scene) -> anyhow::Result<()> {
        match self.render_scene(scene) {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.reconfigure();
                Ok(())
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("[gpu] surface timeout, skipping frame");
                Ok(())
            }
            Err(e) => Err(anyhow::anyhow!("surface error: {e:?}")),
        }
    }
}

impl Drop for GpuState<'_> {
    fn drop(&mut self) {
        self.dispose();
    }
}
