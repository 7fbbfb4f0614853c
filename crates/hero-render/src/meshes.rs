use super::helpers::{
    self, sampler_entry, texture_entry, uniform_entry, TrackedBuffer, TrackedTexture, DEPTH_FORMAT, HDR_FORMAT,
};
use super::uniforms::{FieldUniforms, MeshVertex, ObjectUniforms, ParticleInstance};
use glam::Mat4;
use hero_core::{ParticleField, ResourceKind, ResourceLedger, TerrainObject, TextureImage};

pub(crate) struct ScenePipelines {
    pub(crate) frame_bgl: wgpu::BindGroupLayout,
    pub(crate) object_bgl: wgpu::BindGroupLayout,
    pub(crate) field_bgl: wgpu::BindGroupLayout,
    pub(crate) sky: wgpu::RenderPipeline,
    pub(crate) mesh: wgpu::RenderPipeline,
    pub(crate) particle_alpha: wgpu::RenderPipeline,
    pub(crate) particle_additive: wgpu::RenderPipeline,
}

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    },
};

fn depth_state(write: bool, compare: wgpu::CompareFunction) -> Option<wgpu::DepthStencilState> {
    Some(wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    })
}

#[allow(clippy::too_many_arguments)]
fn pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vs: &str,
    fs: &str,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    blend: wgpu::BlendState,
    depth: Option<wgpu::DepthStencilState>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: depth,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

pub(crate) fn create_scene_pipelines(
    device: &wgpu::Device,
    ledger: &mut ResourceLedger,
    shader: &wgpu::ShaderModule,
) -> ScenePipelines {
    let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("frame_bgl"),
        entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
    });
    let object_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("object_bgl"),
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
            texture_entry(1),
            sampler_entry(2),
        ],
    });
    let field_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("field_bgl"),
        entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
    });
    let layout = |label: &str, groups: &[&wgpu::BindGroupLayout]| {
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: groups,
            push_constant_ranges: &[],
        })
    };
    let pl_sky = layout("pl_sky", &[&frame_bgl]);
    let pl_mesh = layout("pl_mesh", &[&frame_bgl, &object_bgl]);
    let pl_field = layout("pl_field", &[&frame_bgl, &field_bgl]);

    let sky = pipeline(
        device,
        "sky_pipeline",
        &pl_sky,
        shader,
        "vs_sky",
        "fs_sky",
        &[],
        wgpu::BlendState::REPLACE,
        depth_state(false, wgpu::CompareFunction::Always),
    );
    let mesh = pipeline(
        device,
        "mesh_pipeline",
        &pl_mesh,
        shader,
        "vs_mesh",
        "fs_mesh",
        &[MeshVertex::layout()],
        wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
        depth_state(true, wgpu::CompareFunction::Less),
    );
    let particle_alpha = pipeline(
        device,
        "particle_alpha_pipeline",
        &pl_field,
        shader,
        "vs_particle",
        "fs_particle",
        &[ParticleInstance::layout()],
        wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
        depth_state(false, wgpu::CompareFunction::Less),
    );
    let particle_additive = pipeline(
        device,
        "particle_additive_pipeline",
        &pl_field,
        shader,
        "vs_particle",
        "fs_particle",
        &[ParticleInstance::layout()],
        ADDITIVE,
        depth_state(false, wgpu::CompareFunction::Less),
    );
    for label in [
        "sky_pipeline",
        "mesh_pipeline",
        "particle_alpha_pipeline",
        "particle_additive_pipeline",
    ] {
        ledger.acquire(ResourceKind::Pipeline, label);
    }

    ScenePipelines {
        frame_bgl,
        object_bgl,
        field_bgl,
        sky,
        mesh,
        particle_alpha,
        particle_additive,
    }
}

/// GPU copy of one terrain object: geometry, material uniforms and texture.
pub(crate) struct MeshGpu {
    pub(crate) vertex: TrackedBuffer,
    pub(crate) index: TrackedBuffer,
    pub(crate) index_count: u32,
    pub(crate) uniform: TrackedBuffer,
    pub(crate) texture: TrackedTexture,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl MeshGpu {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        ledger: &mut ResourceLedger,
        pipelines: &ScenePipelines,
        sampler: &wgpu::Sampler,
        object: &TerrainObject,
        model: Mat4,
    ) -> Self {
        let i = object.index;
        let vertices = MeshVertex::interleave(&object.mesh);
        let vertex = helpers::create_buffer(
            device,
            ledger,
            &format!("terrain_{i}_vertices"),
            bytemuck::cast_slice(&vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let index = helpers::create_buffer(
            device,
            ledger,
            &format!("terrain_{i}_indices"),
            bytemuck::cast_slice(&object.mesh.indices),
            wgpu::BufferUsages::INDEX,
        );
        let uniforms = ObjectUniforms::new(object, model);
        let uniform = helpers::create_buffer(
            device,
            ledger,
            &format!("terrain_{i}_uniforms"),
            bytemuck::bytes_of(&uniforms),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let white = TextureImage::white();
        let image = object.texture.as_ref().unwrap_or(&white);
        let texture = helpers::upload_image(device, queue, ledger, &format!("terrain_{i}_surface"), image);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain_bg"),
            layout: &pipelines.object_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        ledger.acquire(ResourceKind::BindGroup, format!("terrain_{i}_bg"));
        Self {
            vertex,
            index,
            index_count: object.mesh.indices.len() as u32,
            uniform,
            texture,
            bind_group,
        }
    }

    pub(crate) fn update(&self, queue: &wgpu::Queue, object: &TerrainObject, model: Mat4) {
        let uniforms = ObjectUniforms::new(object, model);
        queue.write_buffer(&self.uniform.buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub(crate) fn release(&self, ledger: &mut ResourceLedger) {
        self.vertex.release(ledger);
        self.index.release(ledger);
        self.uniform.release(ledger);
        self.texture.release(ledger);
    }
}

/// GPU copy of one particle field. Instances are rewritten every frame.
pub(crate) struct FieldGpu {
    pub(crate) instances: TrackedBuffer,
    pub(crate) count: u32,
    pub(crate) uniform: TrackedBuffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) additive: bool,
}

impl FieldGpu {
    pub(crate) fn new(
        device: &wgpu::Device,
        ledger: &mut ResourceLedger,
        pipelines: &ScenePipelines,
        field: &ParticleField,
        index: usize,
    ) -> Self {
        let instances = helpers::create_buffer(
            device,
            ledger,
            &format!("particles_{index}_instances"),
            bytemuck::cast_slice(&ParticleInstance::pack(field)),
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );
        let uniform = helpers::create_buffer(
            device,
            ledger,
            &format!("particles_{index}_uniforms"),
            bytemuck::bytes_of(&FieldUniforms::new(field)),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particles_bg"),
            layout: &pipelines.field_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.buffer.as_entire_binding(),
            }],
        });
        ledger.acquire(ResourceKind::BindGroup, format!("particles_{index}_bg"));
        Self {
            instances,
            count: field.len() as u32,
            uniform,
            bind_group,
            additive: field.spec().additive,
        }
    }

    pub(crate) fn update(&self, queue: &wgpu::Queue, field: &ParticleField) {
        let packed = ParticleInstance::pack(field);
        queue.write_buffer(&self.instances.buffer, 0, bytemuck::cast_slice(&packed));
        queue.write_buffer(&self.uniform.buffer, 0, bytemuck::bytes_of(&FieldUniforms::new(field)));
    }

    pub(crate) fn release(&self, ledger: &mut ResourceLedger) {
        self.instances.release(ledger);
        self.uniform.release(ledger);
    }
}
