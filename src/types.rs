/// Camera uniform buffer data for the ray-march pass
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub inv_view: [[f32; 4]; 4],
    pub inv_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub time: f32, // Seconds since startup, drives the scene animation
    pub resolution: [f32; 2],
    pub _pad: [f32; 2],
}

/// Transform uniform for the mesh pass
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

/// Vertex with position and texture coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl TexturedVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // WGSL uniform layout: mat4 blocks, then vec3 + f32, then vec2 padded to 16
    #[test]
    fn camera_uniform_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 160);
        assert_eq!(std::mem::size_of::<CameraUniform>() % 16, 0);
    }

    #[test]
    fn mesh_uniform_is_two_matrices() {
        assert_eq!(std::mem::size_of::<MeshUniform>(), 128);
    }

    #[test]
    fn vertex_stride_is_five_floats() {
        assert_eq!(TexturedVertex::layout().array_stride, 20);
        assert_eq!(TexturedVertex::ATTRIBUTES[1].offset, 12);
    }
}
