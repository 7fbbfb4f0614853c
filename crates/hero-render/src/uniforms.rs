use glam::Mat4;
use hero_core::{Light, MeshData, ParticleField, Scene, TerrainObject, MAX_LIGHTS};

const KIND_AMBIENT: f32 = 0.0;
const KIND_DIRECTIONAL: f32 = 1.0;
const KIND_POINT: f32 = 2.0;

#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct LightPacked {
    position: [f32; 4],
    color: [f32; 4],
    params: [f32; 4],
}

impl LightPacked {
    fn pack(light: &Light) -> Self {
        match *light {
            Light::Ambient { color, intensity } => Self {
                position: [0.0, 0.0, 0.0, KIND_AMBIENT],
                color: rgba(color.0, intensity),
                params: [0.0; 4],
            },
            Light::Directional {
                color,
                intensity,
                position,
                ..
            } => Self {
                position: position.extend(KIND_DIRECTIONAL).to_array(),
                color: rgba(color.0, intensity),
                params: [0.0; 4],
            },
            Light::Point {
                color,
                intensity,
                position,
                range,
            } => Self {
                position: position.extend(KIND_POINT).to_array(),
                color: rgba(color.0, intensity),
                params: [range, 0.0, 0.0, 0.0],
            },
        }
    }
}

fn rgba(c: [f32; 3], a: f32) -> [f32; 4] {
    [c[0], c[1], c[2], a]
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FrameUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    sky_top: [f32; 4],
    sky_bottom: [f32; 4],
    counts: [f32; 4],
    lights: [LightPacked; MAX_LIGHTS],
}

impl FrameUniforms {
    pub(crate) fn from_scene(scene: &Scene) -> Self {
        let camera = scene.camera();
        let bg = scene.background();
        let mut lights = [LightPacked::default(); MAX_LIGHTS];
        let resolved = scene.lights();
        let count = resolved.len().min(MAX_LIGHTS);
        for (slot, light) in lights.iter_mut().zip(&resolved) {
            *slot = LightPacked::pack(light);
        }
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            camera_pos: camera.eye.extend(scene.elapsed()).to_array(),
            sky_top: rgba(bg.top.0, bg.opacity.clamp(0.0, 1.0)),
            sky_bottom: rgba(bg.bottom.0, 1.0),
            counts: [count as f32, 0.0, 0.0, 0.0],
            lights,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ObjectUniforms {
    model: [[f32; 4]; 4],
    tint_opacity: [f32; 4],
    emissive: [f32; 4],
    flags: [f32; 4],
}

impl ObjectUniforms {
    pub(crate) fn new(object: &TerrainObject, model: Mat4) -> Self {
        let m = &object.material;
        let e = m.emissive.scaled(m.emissive_intensity);
        Self {
            model: model.to_cols_array_2d(),
            tint_opacity: rgba(m.tint.0, m.opacity),
            emissive: rgba(e.0, m.shininess),
            flags: [
                if m.vertex_colors { 1.0 } else { 0.0 },
                if object.texture.is_some() { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FieldUniforms {
    model: [[f32; 4]; 4],
    params: [f32; 4],
}

impl FieldUniforms {
    pub(crate) fn new(field: &ParticleField) -> Self {
        Self {
            model: field.model_matrix().to_cols_array_2d(),
            params: [field.spec().opacity, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) blur_dir: [f32; 2],
    pub(crate) bloom_strength: f32,
    pub(crate) threshold: f32,
    pub(crate) _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshVertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
    color: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2, 3 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    pub(crate) fn interleave(mesh: &MeshData) -> Vec<MeshVertex> {
        (0..mesh.vertex_count())
            .map(|i| MeshVertex {
                position: mesh.positions[i].to_array(),
                normal: mesh.normals[i].to_array(),
                uv: mesh.uvs[i].to_array(),
                color: mesh.colors[i],
            })
            .collect()
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ParticleInstance {
    center: [f32; 3],
    size: f32,
    color: [f32; 4],
}

impl ParticleInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x4];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    pub(crate) fn pack(field: &ParticleField) -> Vec<ParticleInstance> {
        let size = field.spec().size;
        field
            .positions
            .iter()
            .zip(&field.colors)
            .map(|(p, c)| ParticleInstance {
                center: p.to_array(),
                size,
                color: rgba(c.0, 1.0),
            })
            .collect()
    }
}
