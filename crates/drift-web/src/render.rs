//! WebGPU renderer for the hero scene.
//!
//! Sprites and lines are drawn additively into an HDR target, then a bright
//! pass, a separable blur and a composite with the frame's bloom intensity
//! produce the swapchain image.

mod geometry;
mod helpers;
mod post;
mod targets;

use crate::dom;
use drift_core::constants::{BLOOM_THRESHOLD, FLOW_KNOT_RADIUS, ORB_RADIUS};
use drift_core::{rotation_matrix, Camera, RenderError, RenderSize, SceneFrame, SceneObject, SceneRenderer};
use glam::{Mat4, Vec3};
use helpers::{linear_rgba, GrowableBuffer, ADDITIVE, HDR_FORMAT};
use post::{PostBindGroups, PostPass, PostResources, PostUniforms};
use targets::RenderTargets;
use web_sys as web;

// Sprite shapes, matching scene.wgsl.
const SHAPE_GLOW: f32 = 0.0;
const SHAPE_RING: f32 = 1.0;
const SHAPE_BODY: f32 = 2.0;
const SHAPE_SHARD: f32 = 3.0;

const PARTICLE_SIZE: f32 = 0.07;
const SHARD_SIZE: f32 = 0.22;
const GLOW_SIZE: f32 = 0.45;
const HALO_SIZE: f32 = 1.0;
const ORB_WIRE_DETAIL: u32 = 2;
const FLOW_SEGMENTS: usize = 220;

const KEY_LIGHT_INTENSITY: f32 = 1.1;
const FILL_LIGHT_INTENSITY: f32 = 0.5;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
    cam_back: [f32; 4],
    key_light: [f32; 4],
    fill_light: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteInstance {
    center_size: [f32; 4],
    color: [f32; 4],
    params: [f32; 4],
}

impl SpriteInstance {
    fn new(center: Vec3, size: f32, color: [f32; 4], roll: f32, shape: f32) -> Self {
        Self {
            center_size: [center.x, center.y, center.z, size],
            color,
            params: [roll, shape, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LineVertex {
    position: [f32; 4],
    color: [f32; 4],
}

impl LineVertex {
    fn new(p: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: [p.x, p.y, p.z, 1.0],
            color,
        }
    }
}

fn object_matrix(object: &SceneObject) -> Mat4 {
    Mat4::from_translation(object.position)
        * rotation_matrix(object.rotation)
        * Mat4::from_scale(Vec3::splat(object.scale))
}

/// CPU-side batches rebuilt each frame.
#[derive(Default)]
struct Batches {
    sprites: Vec<SpriteInstance>,
    lines: Vec<LineVertex>,
}

impl Batches {
    fn clear(&mut self) {
        self.sprites.clear();
        self.lines.clear();
    }

    fn segment(&mut self, a: Vec3, b: Vec3, color: [f32; 4]) {
        self.lines.push(LineVertex::new(a, color));
        self.lines.push(LineVertex::new(b, color));
    }
}

struct SceneMeshes {
    orb_wire: Vec<[Vec3; 2]>,
    flow_knot: Vec<Vec3>,
}

impl SceneMeshes {
    fn new() -> Self {
        Self {
            orb_wire: geometry::icosphere_edges(ORB_RADIUS, ORB_WIRE_DETAIL),
            flow_knot: geometry::torus_knot(FLOW_KNOT_RADIUS, 2, 3, FLOW_SEGMENTS),
        }
    }
}

fn build_batches(batches: &mut Batches, meshes: &SceneMeshes, frame: &SceneFrame<'_>) {
    batches.clear();

    // Orb body and wireframe share the orb transform.
    batches.sprites.push(SpriteInstance::new(
        frame.orb.position,
        ORB_RADIUS,
        linear_rgba(0x4338ca, 0.7),
        0.0,
        SHAPE_BODY,
    ));
    let orb = object_matrix(&frame.orb);
    let wire = linear_rgba(0x8b5cf6, 0.35);
    for [a, b] in meshes.orb_wire.iter() {
        batches.segment(orb.transform_point3(*a), orb.transform_point3(*b), wire);
    }

    let group = object_matrix(&frame.particles);
    let particle = linear_rgba(0xe0e7ff, 0.9);
    batches.sprites.extend(frame.particle_positions.iter().map(|p| {
        SpriteInstance::new(group.transform_point3(*p), PARTICLE_SIZE, particle, 0.0, SHAPE_GLOW)
    }));

    let shard = linear_rgba(0xa5b4fc, 0.8);
    batches.sprites.extend(frame.shards.iter().map(|s| {
        SpriteInstance::new(s.position, SHARD_SIZE, shard, s.rotation.z, SHAPE_SHARD)
    }));

    if frame.flow.is_visible() {
        let flow = object_matrix(&frame.flow);
        let color = linear_rgba(0x2563eb, frame.flow.opacity);
        for pair in meshes.flow_knot.windows(2) {
            batches.segment(flow.transform_point3(pair[0]), flow.transform_point3(pair[1]), color);
        }
    }

    if frame.glow.is_visible() {
        batches.sprites.push(SpriteInstance::new(
            frame.glow.position,
            GLOW_SIZE * frame.glow.scale,
            linear_rgba(0x93c5fd, frame.glow.opacity),
            frame.glow.rotation.z,
            SHAPE_GLOW,
        ));
    }
    if frame.halo.is_visible() {
        batches.sprites.push(SpriteInstance::new(
            frame.halo.position,
            HALO_SIZE * frame.halo.scale,
            linear_rgba(0x60a5fa, frame.halo.opacity),
            frame.halo.rotation.z,
            SHAPE_RING,
        ));
    }
    if frame.link.opacity > 0.0 {
        batches.segment(frame.link.from, frame.link.to, linear_rgba(0x3b82f6, frame.link.opacity));
    }
}

fn globals_for(camera: &Camera, frame: &SceneFrame<'_>) -> Globals {
    let (right, up) = camera.billboard_axes();
    let back = (camera.eye - camera.target).normalize_or_zero();
    let light = |p: Vec3, intensity: f32| [p.x, p.y, p.z, intensity];
    Globals {
        view_proj: camera.view_projection().to_cols_array_2d(),
        cam_right: right.extend(0.0).to_array(),
        cam_up: up.extend(0.0).to_array(),
        cam_back: back.extend(0.0).to_array(),
        key_light: light(frame.key_light, KEY_LIGHT_INTENSITY),
        fill_light: light(frame.fill_light, FILL_LIGHT_INTENSITY),
    }
}

pub struct GpuScene {
    canvas: web::HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,
    post: PostResources,
    post_groups: PostBindGroups,
    globals_buffer: wgpu::Buffer,
    globals_group: wgpu::BindGroup,
    sprite_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    sprite_buffer: GrowableBuffer,
    line_buffer: GrowableBuffer,
    meshes: SceneMeshes,
    batches: Batches,
}

impl GpuScene {
    pub async fn new(canvas: web::HtmlCanvasElement, size: RenderSize) -> anyhow::Result<Self> {
        dom::sync_canvas_backing_size(&canvas, size);
        let (width, height) = (size.width, size.height);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {:?}", e))?;

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
        // The canvas sits over page content; keep it see-through where nothing is drawn.
        let alpha_mode = if caps.alpha_modes.contains(&wgpu::CompositeAlphaMode::PreMultiplied) {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
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

        let targets = RenderTargets::new(&device, width, height);
        let post = post::create_post_resources(&device, format);
        let post_groups = PostBindGroups::new(&device, &post, &targets);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(drift_core::SCENE_WGSL.into()),
        });
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
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
        });
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let scene_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_bgl],
            push_constant_ranges: &[],
        });

        let sprite_attrs = wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4, 2 => Float32x4];
        let line_attrs = wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];
        let scene_pipeline = |label: &str,
                              vs: &str,
                              fs: &str,
                              layout: wgpu::VertexBufferLayout<'_>,
                              topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&scene_pl),
                vertex: wgpu::VertexState {
                    module: &scene_shader,
                    entry_point: Some(vs),
                    buffers: &[layout],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &scene_shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: HDR_FORMAT,
                        blend: Some(ADDITIVE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };
        let sprite_pipeline = scene_pipeline(
            "sprite_pipeline",
            "vs_sprite",
            "fs_sprite",
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SpriteInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &sprite_attrs,
            },
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = scene_pipeline(
            "line_pipeline",
            "vs_line",
            "fs_line",
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &line_attrs,
            },
            wgpu::PrimitiveTopology::LineList,
        );

        let meshes = SceneMeshes::new();
        let sprite_buffer = GrowableBuffer::new(
            &device,
            "sprite_instances",
            (std::mem::size_of::<SpriteInstance>() * 1024) as u64,
        );
        let line_buffer = GrowableBuffer::new(
            &device,
            "line_vertices",
            (std::mem::size_of::<LineVertex>() * (meshes.orb_wire.len() + FLOW_SEGMENTS + 1) * 2) as u64,
        );
        log::info!(
            "[gpu] scene renderer ready: {}x{} {:?}, {} wire edges",
            width,
            height,
            format,
            meshes.orb_wire.len()
        );

        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            targets,
            post,
            post_groups,
            globals_buffer,
            globals_group,
            sprite_pipeline,
            line_pipeline,
            sprite_buffer,
            line_buffer,
            meshes,
            batches: Batches::default(),
        })
    }

    fn write_post_uniforms(&self, bloom_strength: f32) {
        let base = PostUniforms {
            resolution: self.targets.bloom_resolution(),
            blur_dir: [0.0, 0.0],
            bloom_strength,
            threshold: BLOOM_THRESHOLD,
            _pad: [0.0; 2],
        };
        let passes = [
            (PostPass::Bright, [0.0, 0.0]),
            (PostPass::BlurH, [1.0, 0.0]),
            (PostPass::BlurV, [0.0, 1.0]),
            (PostPass::Composite, [0.0, 0.0]),
        ];
        for (pass, blur_dir) in passes {
            let u = PostUniforms { blur_dir, ..base };
            self.queue
                .write_buffer(&self.post.uniform_buffer, pass.offset(), bytemuck::bytes_of(&u));
        }
    }
}

impl SceneRenderer for GpuScene {
    fn resize(&mut self, size: RenderSize) {
        dom::sync_canvas_backing_size(&self.canvas, size);
        if self.config.width != size.width || self.config.height != size.height {
            self.config.width = size.width;
            self.config.height = size.height;
            self.surface.configure(&self.device, &self.config);
        }
        if self.targets.recreate(&self.device, size.width, size.height) {
            self.post_groups = PostBindGroups::new(&self.device, &self.post, &self.targets);
            log::debug!("[gpu] resized to {}x{}", size.width, size.height);
        }
    }

    fn render(&mut self, camera: &Camera, frame: &SceneFrame<'_>) -> Result<(), RenderError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                return Err(RenderError::SurfaceLost)
            }
            Err(e) => return Err(RenderError::Backend(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        build_batches(&mut self.batches, &self.meshes, frame);
        let globals = globals_for(camera, frame);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        let sprite_bytes: &[u8] = bytemuck::cast_slice(&self.batches.sprites);
        let line_bytes: &[u8] = bytemuck::cast_slice(&self.batches.lines);
        self.sprite_buffer.upload(&self.device, &self.queue, sprite_bytes);
        self.line_buffer.upload(&self.device, &self.queue, line_bytes);
        self.write_post_uniforms(frame.bloom_intensity);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_group, &[]);
            if !self.batches.lines.is_empty() {
                rpass.set_pipeline(&self.line_pipeline);
                rpass.set_vertex_buffer(0, self.line_buffer.slice(line_bytes.len() as u64));
                rpass.draw(0..self.batches.lines.len() as u32, 0..1);
            }
            if !self.batches.sprites.is_empty() {
                rpass.set_pipeline(&self.sprite_pipeline);
                rpass.set_vertex_buffer(0, self.sprite_buffer.slice(sprite_bytes.len() as u64));
                rpass.draw(0..6, 0..self.batches.sprites.len() as u32);
            }
        }

        let g = &self.post_groups;
        post::blit(&mut encoder, "bright_pass", &self.targets.bloom_a_view, &self.post.bright_pipeline, &g.bright, None);
        post::blit(&mut encoder, "blur_h", &self.targets.bloom_b_view, &self.post.blur_pipeline, &g.blur_h, None);
        post::blit(&mut encoder, "blur_v", &self.targets.bloom_a_view, &self.post.blur_pipeline, &g.blur_v, None);
        post::blit(
            &mut encoder,
            "composite",
            &view,
            &self.post.composite_pipeline,
            &g.composite,
            Some(&g.bloom_only),
        );

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
