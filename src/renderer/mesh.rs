use bytemuck::Zeroable;
use glam::{Mat4, Quat, Vec3};
use log::debug;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, RenderPipeline};

use super::framebuffer::{depth_state, COLOR_FORMAT};
use super::{SceneFrame, ScenePass};
use crate::assets::{mip_chain, mip_level_count, TextureData, MESH_SHADER};
use crate::core::gpu_context::{GpuContext, ValidationTarget};
use crate::error::GpuError;
use crate::types::{MeshUniform, TexturedVertex};

pub const CUBE_CENTER: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const CUBE_SIZE: f32 = 2.0;
/// Spin rate in radians per second
pub const CUBE_SPIN_RATE: f32 = 0.6;

/// (outward normal, right, up) per face, with right x up == normal
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
];

/// Unit cube centred on the origin, four vertices per face so each face
/// carries the full texture
pub fn cube_geometry() -> (Vec<TexturedVertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, right, up) in FACES {
        let center = normal * 0.5;
        let base = vertices.len() as u16;

        let corners = [
            (center - right * 0.5 - up * 0.5, [0.0f32, 1.0]),
            (center + right * 0.5 - up * 0.5, [1.0, 1.0]),
            (center + right * 0.5 + up * 0.5, [1.0, 0.0]),
            (center - right * 0.5 + up * 0.5, [0.0, 0.0]),
        ];
        vertices.extend(
            corners
                .iter()
                .map(|(p, uv)| TexturedVertex::new(p.to_array(), *uv)),
        );
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

/// Model matrix of the spinning cube at `time` seconds
pub fn cube_model(time: f32) -> Mat4 {
    let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
    Mat4::from_scale_rotation_translation(
        Vec3::splat(CUBE_SIZE),
        Quat::from_axis_angle(axis, time * CUBE_SPIN_RATE),
        CUBE_CENTER,
    )
}

/// Textured rotating cube drawn with depth testing
pub struct MeshPass {
    pipeline: RenderPipeline,
    bind_group: BindGroup,
    uniform_buffer: Buffer,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

impl MeshPass {
    pub fn new(gpu: &GpuContext, texture: &TextureData) -> Result<Self, GpuError> {
        let device = gpu.device();
        let shader = gpu.create_shader("Mesh Shader", MESH_SHADER)?;

        let (vertices, indices) = cube_geometry();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Uniform Buffer"),
            contents: bytemuck::bytes_of(&MeshUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let texture_view = Self::upload_texture(gpu, texture)?;
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Mesh Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = gpu.validated(ValidationTarget::Pipeline, "Mesh Pipeline", |device| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Mesh Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[TexturedVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: COLOR_FORMAT,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        })?;

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        })
    }

    /// Upload `data` with a full mip chain
    fn upload_texture(gpu: &GpuContext, data: &TextureData) -> Result<wgpu::TextureView, GpuError> {
        let levels = mip_chain(data);
        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };

        let texture = gpu.validated(ValidationTarget::Texture, "Mesh Texture", |device| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Mesh Texture"),
                size,
                mip_level_count: mip_level_count(data.width, data.height),
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });

            for (level, mip) in levels.iter().enumerate() {
                gpu.queue().write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &texture,
                        mip_level: level as u32,
                        origin: wgpu::Origin3d::ZERO,
                        aspect: wgpu::TextureAspect::All,
                    },
                    &mip.pixels,
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * mip.width),
                        rows_per_image: Some(mip.height),
                    },
                    wgpu::Extent3d {
                        width: mip.width,
                        height: mip.height,
                        depth_or_array_layers: 1,
                    },
                );
            }
            texture
        })?;
        debug!(
            "Uploaded mesh texture {}x{} with {} mip levels",
            data.width,
            data.height,
            levels.len()
        );

        Ok(texture.create_view(&wgpu::TextureViewDescriptor::default()))
    }
}

impl ScenePass for MeshPass {
    fn name(&self) -> &str {
        "mesh"
    }

    fn prepare(&mut self, queue: &wgpu::Queue, frame: &SceneFrame<'_>) {
        let uniform = MeshUniform {
            view_proj: frame.camera.view_projection().to_cols_array_2d(),
            model: cube_model(frame.time).to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
