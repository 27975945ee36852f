use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use backdrop_engine::camera::PerspectiveCamera;
use backdrop_engine::paint::Color;
use backdrop_engine::render::{RenderCtx, RenderTarget, premul_alpha_blend};
use backdrop_engine::stage::{StageFrame, Visual};

use super::config::WaveFieldOptions;
use super::field::WaveScene;
use super::line_pool::LineVertex;

/// Wave-interference grid visual.
///
/// Geometry lives on the CPU in a [`WaveScene`]; each layer owns one vertex
/// buffer sized for its whole line pool, rewritten only when the pool is
/// dirty.
pub struct WaveField {
    scene: WaveScene,
    background: Color,
    line: Color,
    gpu: Option<WaveGpu>,
}

struct WaveGpu {
    pipeline: wgpu::RenderPipeline,
    layers: Vec<LayerGpu>,
}

struct LayerGpu {
    vbo: wgpu::Buffer,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl WaveField {
    pub fn new(options: &WaveFieldOptions) -> Self {
        let settings = options.resolve();
        Self {
            background: settings.background,
            line: settings.line,
            scene: WaveScene::new(settings),
            gpu: None,
        }
    }

    pub fn scene(&self) -> &WaveScene {
        &self.scene
    }

    pub fn is_set_up(&self) -> bool {
        self.gpu.is_some()
    }
}

impl Visual for WaveField {
    fn name(&self) -> &'static str {
        "wave field"
    }

    fn clear_color(&self) -> Color {
        self.background
    }

    fn setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        if self.gpu.is_some() {
            return Ok(());
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("wave lines shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lines.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("wave layer bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<LayerUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("wave lines pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("wave lines pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[LineVertex::layout()],
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
                topology: wgpu::PrimitiveTopology::LineStrip,
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

        let layers = self
            .scene
            .layers()
            .iter()
            .enumerate()
            .map(|(i, layer)| {
                let vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("wave layer {i} vbo")),
                    size: layer.pool().byte_len(),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("wave layer {i} ubo")),
                    size: std::mem::size_of::<LayerUniform>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("wave layer {i} bind group")),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: ubo.as_entire_binding(),
                    }],
                });
                LayerGpu { vbo, ubo, bind_group }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "wave field: {} layer(s), {} lines x {} vertices each",
            layers.len(),
            self.scene.layers().first().map_or(0, |l| l.pool().line_count()),
            self.scene.settings().resolution + 1
        );

        self.gpu = Some(WaveGpu { pipeline, layers });
        Ok(())
    }

    fn update(&mut self, frame: &StageFrame) {
        if self.gpu.is_none() {
            return;
        }
        self.scene.advance(frame);
    }

    fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &PerspectiveCamera,
    ) {
        let Some(gpu) = self.gpu.as_ref() else { return };

        let parent = camera.view_projection_matrix() * self.scene.main_matrix();
        let color = self.line.to_array();

        for (layer, layer_gpu) in self.scene.layers_mut().iter_mut().zip(&gpu.layers) {
            let uniform = LayerUniform::new(parent * layer.model_matrix(), color);
            ctx.queue
                .write_buffer(&layer_gpu.ubo, 0, bytemuck::bytes_of(&uniform));

            if layer.pool_mut().take_dirty() {
                ctx.queue.write_buffer(
                    &layer_gpu.vbo,
                    0,
                    bytemuck::cast_slice(layer.pool().vertices()),
                );
            }
        }

        let mut rpass = target.begin_load_pass("wave lines pass");
        rpass.set_pipeline(&gpu.pipeline);

        for (layer, layer_gpu) in self.scene.layers().iter().zip(&gpu.layers) {
            rpass.set_bind_group(0, &layer_gpu.bind_group, &[]);
            rpass.set_vertex_buffer(0, layer_gpu.vbo.slice(..));

            let per_line = layer.pool().vertices_per_line() as u32;
            for line in 0..layer.pool().line_count() as u32 {
                let start = line * per_line;
                rpass.draw(start..start + per_line, 0..1);
            }
        }
    }

    fn dispose(&mut self) {
        let Some(gpu) = self.gpu.take() else { return };
        for layer in &gpu.layers {
            layer.vbo.destroy();
            layer.ubo.destroy();
        }
        log::debug!("wave field: released {} layer buffer(s)", gpu.layers.len());
    }
}

/// Per-layer uniform (80 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LayerUniform {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
}

impl LayerUniform {
    fn new(mvp: Mat4, color: [f32; 4]) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            color,
        }
    }
}
