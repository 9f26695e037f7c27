use std::sync::Arc;

use anyhow::Result;
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::core::gpu_context::{GpuContext, DEPTH_FORMAT};
use crate::core::Viewport;
use crate::scene::{Anchor, Material, Scene};
use crate::simulation::RenderFrame;
use crate::types::{GlobalsUniform, ObjectUniform, Vertex};

const HUD_TITLE: &str = "Alien Ship Simulator";
const HUD_LINES: [&str; 2] = ["Arrow Keys: Move / Rotate", "W: Ascend  S: Descend"];

/// Frame statistics shown in the HUD
#[derive(Debug, Clone, Copy, Default)]
pub struct HudStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub altitude: f32,
    pub speed: f32,
}

/// A mesh on the GPU plus its per-object uniform
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    material: Material,
    anchor: Anchor,
}

impl GpuMesh {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        vertices: &[Vertex],
        indices: &[u32],
        material: Material,
        anchor: Anchor,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform = ObjectUniform::new(
            Mat4::IDENTITY,
            material.color,
            material.opacity,
            material.emissive,
        );
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform_buffer,
            bind_group,
            material,
            anchor,
        }
    }

    fn write_model(&self, queue: &wgpu::Queue, model: Mat4) {
        let uniform = ObjectUniform::new(
            model,
            self.material.color,
            self.material.opacity,
            self.material.emissive,
        );
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

struct Hud {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Hud {
    fn new(window: &Window, gpu: &GpuContext) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(
            gpu.device(),
            gpu.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );
        Self {
            ctx,
            state,
            renderer,
        }
    }

    fn ui(ctx: &egui::Context, stats: &HudStats) {
        egui::Window::new(HUD_TITLE)
            .title_bar(false)
            .resizable(false)
            .fixed_pos(egui::pos2(10.0, 10.0))
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(HUD_TITLE)
                        .size(20.0)
                        .strong()
                        .color(egui::Color32::WHITE),
                );
                for line in HUD_LINES {
                    ui.label(egui::RichText::new(line).size(14.0).color(egui::Color32::WHITE));
                }
                ui.label(
                    egui::RichText::new(format!(
                        "{:.0} FPS  {:.1} ms  alt {:.1}  speed {:.2}",
                        stats.fps, stats.frame_time_ms, stats.altitude, stats.speed
                    ))
                    .size(12.0)
                    .color(egui::Color32::GRAY),
                );
            });
    }

    fn render(
        &mut self,
        window: &Window,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        stats: &HudStats,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| Self::ui(ctx, stats));
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(gpu.device(), gpu.queue(), *id, image_delta);
        }

        let viewport = gpu.viewport();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [viewport.width, viewport.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer.update_buffers(
            gpu.device(),
            gpu.queue(),
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("HUD Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// Forward renderer for the terrain patch, craft and structures
pub struct Renderer {
    window: Arc<Window>,
    gpu: GpuContext,
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    terrain: GpuMesh,
    terrain_vertices: Vec<Vertex>,
    objects: Vec<GpuMesh>,
    scene: Scene,
    hud: Option<Hud>,
}

impl Renderer {
    /// Set up the GPU, upload the scene and the initial terrain patch.
    /// `show_hud` false skips the egui overlay entirely.
    pub async fn new(
        window: Arc<Window>,
        scene: Scene,
        initial: &RenderFrame<'_>,
        show_hud: bool,
    ) -> Result<Self> {
        let gpu = GpuContext::new(window.clone()).await?;
        let device = gpu.device();

        let globals_layout = uniform_layout(device, "Globals Layout");
        let object_layout = uniform_layout(device, "Object Layout");

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<GlobalsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let opaque_pipeline =
            create_pipeline(device, &pipeline_layout, &shader, gpu.surface_format(), false);
        let transparent_pipeline =
            create_pipeline(device, &pipeline_layout, &shader, gpu.surface_format(), true);

        let terrain_vertices = interleave(initial.terrain.positions, initial.terrain.normals);
        let terrain = GpuMesh::new(
            device,
            &object_layout,
            "Terrain",
            &terrain_vertices,
            initial.terrain.indices,
            scene.terrain_material,
            Anchor::World,
        );

        let objects = scene
            .objects
            .iter()
            .map(|object| {
                GpuMesh::new(
                    device,
                    &object_layout,
                    object.name,
                    &object.mesh.vertices,
                    &object.mesh.indices,
                    object.material,
                    object.anchor,
                )
            })
            .collect();

        let hud = show_hud.then(|| Hud::new(&window, &gpu));

        log::info!(
            "Renderer ready: terrain {} vertices, {} scene objects, HUD {}",
            terrain_vertices.len(),
            scene.objects.len(),
            if show_hud { "on" } else { "off" }
        );

        Ok(Self {
            window,
            gpu,
            opaque_pipeline,
            transparent_pipeline,
            globals_buffer,
            globals_bind_group,
            terrain,
            terrain_vertices,
            objects,
            scene,
            hud,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.gpu.resize(viewport);
    }

    /// Offer a window event to the HUD; true if egui consumed it
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match &mut self.hud {
            Some(hud) => hud.state.on_window_event(&self.window, event).consumed,
            None => false,
        }
    }

    /// Upload this frame's state and draw it
    pub fn render(&mut self, frame: &RenderFrame<'_>, stats: &HudStats) -> Result<()> {
        self.upload(frame);

        let Some(output) = self.gpu.acquire()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let [r, g, b] = self.scene.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_bind_group(0, &self.globals_bind_group, &[]);

            pass.set_pipeline(&self.opaque_pipeline);
            self.terrain.draw(&mut pass);
            let (opaque, transparent): (Vec<_>, Vec<_>) = self
                .objects
                .iter()
                .partition(|o| !o.material.is_transparent());
            for object in opaque {
                object.draw(&mut pass);
            }
            pass.set_pipeline(&self.transparent_pipeline);
            for object in transparent {
                object.draw(&mut pass);
            }
        }

        if let Some(hud) = &mut self.hud {
            hud.render(&self.window, &self.gpu, &mut encoder, &view, stats);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn upload(&mut self, frame: &RenderFrame<'_>) {
        let queue = self.gpu.queue();

        let globals = frame.globals().with_lighting(&self.scene.lighting);
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::cast_slice(&[globals]));

        // Heights change every frame; topology does not
        for (vertex, (position, normal)) in self
            .terrain_vertices
            .iter_mut()
            .zip(frame.terrain.positions.iter().zip(frame.terrain.normals))
        {
            *vertex = Vertex::new(*position, *normal);
        }
        queue.write_buffer(
            &self.terrain.vertex_buffer,
            0,
            bytemuck::cast_slice(&self.terrain_vertices),
        );
        self.terrain
            .write_model(queue, Mat4::from_translation(frame.terrain.offset));

        let craft_matrix = frame.craft.matrix();
        for object in &self.objects {
            let model = match object.anchor {
                Anchor::Craft => craft_matrix,
                Anchor::World => Mat4::IDENTITY,
            };
            object.write_model(queue, model);
        }
    }
}

fn interleave(positions: &[[f32; 3]], normals: &[[f32; 3]]) -> Vec<Vertex> {
    positions
        .iter()
        .zip(normals)
        .map(|(p, n)| Vertex::new(*p, *n))
        .collect()
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    transparent: bool,
) -> wgpu::RenderPipeline {
    let (label, blend) = if transparent {
        ("Transparent Pipeline", wgpu::BlendState::ALPHA_BLENDING)
    } else {
        ("Opaque Pipeline", wgpu::BlendState::REPLACE)
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            // Terrain is visible from below when the craft dives under it
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: !transparent,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
