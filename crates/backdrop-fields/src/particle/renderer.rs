use anyhow::{Result, ensure};
use bytemuck::{Pod, Zeroable};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wgpu::util::DeviceExt;

use backdrop_engine::camera::PerspectiveCamera;
use backdrop_engine::paint::{Color, srgb_to_linear};
use backdrop_engine::render::{RenderCtx, RenderTarget, premul_alpha_blend};
use backdrop_engine::stage::{StageFrame, Visual};

use super::cloud::{ParticleCloud, SpiralParams};
use super::config::ParticleFieldOptions;

/// Spiral particle field visual.
///
/// The cloud is uploaded once at setup. Per frame only the frame uniform
/// (matrices, viewport, time) is written.
pub struct ParticleField {
    cloud: ParticleCloud,
    background: Color,
    opacity: f32,
    time: f32,
    gpu: Option<ParticleGpu>,
}

struct ParticleGpu {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    frame_ubo: wgpu::Buffer,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    instance_vbo: wgpu::Buffer,
    instance_count: u32,
}

impl ParticleField {
    pub fn new(options: &ParticleFieldOptions) -> Self {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cloud =
            ParticleCloud::generate(options.particle_count(), &SpiralParams::default(), &mut rng);

        Self {
            cloud,
            background: Color::from_hex(options.background_color, 1.0),
            opacity: options.opacity(),
            time: 0.0,
            gpu: None,
        }
    }

    pub fn cloud(&self) -> &ParticleCloud {
        &self.cloud
    }

    /// Elapsed-time uniform value.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_set_up(&self) -> bool {
        self.gpu.is_some()
    }

    fn instances(&self) -> Vec<ParticleInstance> {
        let cloud = &self.cloud;
        cloud
            .positions()
            .iter()
            .zip(cloud.shades())
            .zip(cloud.sizes())
            .map(|((pos, shade), size)| ParticleInstance {
                pos: pos.to_array(),
                // Shades are authored as display values.
                shade: shade.map(srgb_to_linear),
                size: *size,
            })
            .collect()
    }
}

impl Visual for ParticleField {
    fn name(&self) -> &'static str {
        "particle field"
    }

    fn clear_color(&self) -> Color {
        self.background
    }

    fn setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        if self.gpu.is_some() {
            return Ok(());
        }
        ensure!(!self.cloud.is_empty(), "particle cloud is empty");

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/particles.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("particle bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<FrameUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particle pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), ParticleInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let frame_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particle bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            }],
        });

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instances = self.instances();
        let instance_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle instance vbo"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::debug!("particle field: uploaded {} particles", instances.len());

        self.gpu = Some(ParticleGpu {
            pipeline,
            bind_group,
            frame_ubo,
            quad_vbo,
            quad_ibo,
            instance_vbo,
            instance_count: instances.len() as u32,
        });
        Ok(())
    }

    fn update(&mut self, frame: &StageFrame) {
        if self.gpu.is_none() {
            return;
        }
        self.time = frame.time;
    }

    fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &PerspectiveCamera,
    ) {
        let Some(gpu) = self.gpu.as_ref() else { return };

        let (width, height) = ctx.surface_size;
        let uniform = FrameUniform {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            viewport: [width.max(1) as f32, height.max(1) as f32],
            time: self.time,
            opacity: self.opacity,
        };
        ctx.queue
            .write_buffer(&gpu.frame_ubo, 0, bytemuck::bytes_of(&uniform));

        let mut rpass = target.begin_load_pass("particle pass");
        rpass.set_pipeline(&gpu.pipeline);
        rpass.set_bind_group(0, &gpu.bind_group, &[]);
        rpass.set_vertex_buffer(0, gpu.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, gpu.instance_vbo.slice(..));
        rpass.set_index_buffer(gpu.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..gpu.instance_count);
    }

    fn dispose(&mut self) {
        let Some(gpu) = self.gpu.take() else { return };
        gpu.frame_ubo.destroy();
        gpu.quad_vbo.destroy();
        gpu.quad_ibo.destroy();
        gpu.instance_vbo.destroy();
        self.time = 0.0;
        log::debug!("particle field: released {} particles", gpu.instance_count);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Frame uniform (144 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    viewport: [f32; 2],
    time: f32,
    opacity: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    corner: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Instance data layout (28 bytes):
///
///  offset  0  pos    [f32; 3]  loc 1
///  offset 12  shade  [f32; 3]  loc 2
///  offset 24  size   f32       loc 3
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ParticleInstance {
    pos: [f32; 3],
    shade: [f32; 3],
    size: f32,
}

impl ParticleInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x3, // pos
        2 => Float32x3, // shade
        3 => Float32    // size
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
