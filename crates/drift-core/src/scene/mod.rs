//! Hero background scene: lifecycle, pointer projection and per-frame motion.
//!
//! [`SceneAnimationController`] mixes three kinds of motion. Pointer-reactive
//! values are lag-smoothed in a [`SceneRig`]; a few rotations are integrated
//! from the frame delta; the particle and shard fields are closed-form
//! functions of the frame timestamp. Drawing is delegated to a
//! [`SceneRenderer`].

pub mod field;
pub mod rig;

pub use field::{OrbitParams, ParticleField, ShardField, ShardInstance, ShardParams};
pub use rig::{halo_scale, LightRig, SceneRig, Spin};

use crate::camera::Camera;
use crate::capability::CapabilityState;
use crate::constants::{MAX_FRAME_DELTA_SEC, MAX_PIXEL_RATIO, PARTICLE_GROUP_OFFSET_Y};
use crate::error::{RenderError, SetupError};
use crate::host::{EventSource, Host, HostEvent, ListenerHandle};
use crate::pointer::PointerInput;
use crate::session::AnimationSession;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;

const SCENE_SOURCES: [EventSource; 4] = [
    EventSource::PointerMove,
    EventSource::PointerLeave,
    EventSource::VisibilityChange,
    EventSource::WindowBlur,
];

const LAYOUT_SOURCES: [EventSource; 2] = [EventSource::Resize, EventSource::OrientationChange];

/// Pose of one drawable entity for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObject {
    pub position: Vec3,
    /// Euler XYZ, radians.
    pub rotation: Vec3,
    pub scale: f32,
    pub opacity: f32,
}

impl SceneObject {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: 1.0,
            opacity: 1.0,
        }
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn faded(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Line from the marker back to the orb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkLine {
    pub from: Vec3,
    pub to: Vec3,
    pub opacity: f32,
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct SceneFrame<'a> {
    pub time_ms: f64,
    pub orb: SceneObject,
    /// Group transform for `particle_positions`.
    pub particles: SceneObject,
    pub particle_positions: &'a [Vec3],
    pub shards: &'a [ShardInstance],
    pub flow: SceneObject,
    pub glow: SceneObject,
    pub halo: SceneObject,
    pub link: LinkLine,
    pub key_light: Vec3,
    pub fill_light: Vec3,
    pub bloom_intensity: f32,
}

/// Container rectangle in CSS px, client coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// `point` relative to the rect, `0..1` inside it. `None` for an empty rect.
    pub fn normalize(&self, point: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (point.x - self.left) / self.width,
            (point.y - self.top) / self.height,
        ))
    }
}

/// Drawing-buffer size handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSize {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl RenderSize {
    /// Physical size for a CSS size, pixel ratio capped. Never zero.
    pub fn from_css(css: Vec2, device_pixel_ratio: f32) -> Self {
        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        let px = |css: f32| ((css.max(0.0) * pixel_ratio).round() as u32).max(1);
        Self {
            width: px(css.x),
            height: px(css.y),
            pixel_ratio,
        }
    }
}

pub trait SceneHost: Host {
    /// `None` once the container is gone.
    fn container_rect(&self) -> Option<Rect>;
    fn device_pixel_ratio(&self) -> f32;
}

pub trait SceneRenderer {
    fn resize(&mut self, size: RenderSize);
    fn render(&mut self, camera: &Camera, frame: &SceneFrame<'_>) -> Result<(), RenderError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneTuning {
    pub particle_count: usize,
    pub shard_count: usize,
    pub bloom: bool,
    pub seed: u64,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            particle_count: 900,
            shard_count: 24,
            bloom: true,
            seed: 0x5eed_d41f,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneMode {
    /// Nothing scheduled.
    Idle,
    /// Frame loop running.
    Animating,
    /// One reduced-motion frame drawn, no loop.
    Static,
}

/// Frame delta from host timestamps. The first frame after a reset is zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Seconds since the previous tick, clamped to `0..=MAX_FRAME_DELTA_SEC`.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(prev) => ((now_ms - prev) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DELTA_SEC)
        } else {
            0.0
        }
    }
}

/// Read-only view of the scene state, mostly for tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSnapshot {
    pub mode: SceneMode,
    pub pointer_active: bool,
    pub marker: Vec3,
    pub marker_target: Vec3,
    pub glow_opacity: f32,
    pub halo_opacity: f32,
    pub link_opacity: f32,
    pub flow_opacity: f32,
    pub bloom_intensity: f32,
    pub camera_eye: Vec3,
    pub orb_rotation: Vec3,
}

pub struct SceneAnimationController<H: SceneHost, R: SceneRenderer> {
    host: H,
    renderer: R,
    tuning: SceneTuning,
    camera: Camera,
    particles: ParticleField,
    shards: ShardField,
    rig: SceneRig,
    clock: FrameClock,
    mode: SceneMode,
    time_ms: f64,
    session: Option<AnimationSession>,
    layout: SmallVec<[ListenerHandle; 2]>,
}

impl<H: SceneHost, R: SceneRenderer> SceneAnimationController<H, R> {
    /// Build the scene and size it to the container.
    ///
    /// Fails without registering anything if the container is missing.
    pub fn new(mut host: H, renderer: R, tuning: SceneTuning) -> Result<Self, SetupError> {
        if host.container_rect().is_none() {
            return Err(SetupError::MissingAnchor("scene container"));
        }
        let mut rng = StdRng::seed_from_u64(tuning.seed);
        let particles = ParticleField::generate(tuning.particle_count, &mut rng);
        let shards = ShardField::generate(tuning.shard_count, &mut rng);

        let layout = LAYOUT_SOURCES
            .iter()
            .filter_map(|&source| host.listen(source))
            .collect();

        let mut controller = Self {
            host,
            renderer,
            rig: SceneRig::new(tuning.bloom),
            tuning,
            camera: Camera::default(),
            particles,
            shards,
            clock: FrameClock::default(),
            mode: SceneMode::Idle,
            time_ms: 0.0,
            session: None,
            layout,
        };
        controller.resize();
        log::debug!(
            "[scene] built {} particles, {} shards",
            controller.particles.len(),
            controller.shards.len()
        );
        Ok(controller)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn tuning(&self) -> &SceneTuning {
        &self.tuning
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn shards(&self) -> &ShardField {
        &self.shards
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == SceneMode::Animating
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            mode: self.mode,
            pointer_active: self.rig.pointer_active(),
            marker: self.rig.marker(),
            marker_target: self.rig.marker_target(),
            glow_opacity: self.rig.glow_opacity(),
            halo_opacity: self.rig.halo_opacity(),
            link_opacity: self.rig.link_opacity(),
            flow_opacity: self.rig.flow_opacity(),
            bloom_intensity: self.rig.bloom_intensity(),
            camera_eye: self.camera.eye,
            orb_rotation: self.rig.orb_rotation(),
        }
    }

    /// Animate unless reduced motion is requested, in which case draw once.
    pub fn evaluate(&mut self, capabilities: &CapabilityState) {
        if capabilities.reduced_motion {
            self.render_static();
        } else {
            self.start();
        }
    }

    /// Start the frame loop from a clean rig. No-op while already running.
    pub fn start(&mut self) {
        if self.mode == SceneMode::Animating {
            return;
        }
        let mut session = AnimationSession::open(&mut self.host, &SCENE_SOURCES);
        self.rig = SceneRig::new(self.tuning.bloom);
        self.camera.eye = self.rig.camera_eye();
        self.clock.reset();
        session.schedule_frame(&mut self.host);
        self.session = Some(session);
        self.mode = SceneMode::Animating;
        log::debug!("[scene] started");
    }

    /// Safe to call when not running.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.dispose(&mut self.host);
            log::debug!("[scene] stopped");
        }
        self.mode = SceneMode::Idle;
    }

    /// Stop any loop and draw a single fixed frame.
    pub fn render_static(&mut self) {
        self.stop();
        self.mode = SceneMode::Static;
        self.time_ms = 0.0;
        self.rig.pin_static();
        self.camera.eye = self.rig.camera_eye();
        self.particles.update(self.time_ms);
        self.shards.update(self.time_ms);
        self.draw();
    }

    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Frame { time_ms } => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                session.frame_fired();
                self.advance(time_ms);
                self.draw();
                if let Some(session) = self.session.as_mut() {
                    session.schedule_frame(&mut self.host);
                }
            }
            HostEvent::Pointer(PointerInput::Move { sample, .. }) => {
                if self.is_running() && sample.kind.is_mouse() {
                    self.aim(sample.position);
                }
            }
            HostEvent::Pointer(PointerInput::Leave { .. })
            | HostEvent::VisibilityChanged { hidden: true }
            | HostEvent::WindowBlur => {
                if self.is_running() {
                    self.rig.release_pointer();
                }
            }
            HostEvent::Resize => {
                self.resize();
                if self.mode == SceneMode::Static {
                    self.draw();
                }
            }
            HostEvent::Pointer(_)
            | HostEvent::VisibilityChanged { hidden: false }
            | HostEvent::Timer(_) => {}
        }
    }

    /// Point the marker at a client-space pointer position.
    pub fn aim(&mut self, client: Vec2) {
        let Some(normalized) = self
            .host
            .container_rect()
            .and_then(|rect| rect.normalize(client))
        else {
            return;
        };
        let ndc = Vec2::new(normalized.x * 2.0 - 1.0, -(normalized.y * 2.0 - 1.0));
        let ray = self.camera.ray_from_ndc(ndc);
        self.rig.aim(normalized, &ray);
    }

    /// Match the camera aspect and render targets to the container.
    pub fn resize(&mut self) {
        let Some(rect) = self.host.container_rect() else {
            log::debug!("[scene] resize skipped, container gone");
            return;
        };
        self.camera.set_viewport(rect.width, rect.height);
        let size = RenderSize::from_css(rect.size(), self.host.device_pixel_ratio());
        self.renderer.resize(size);
    }

    /// Advance all motion to `time_ms`.
    pub fn advance(&mut self, time_ms: f64) {
        let dt = self.clock.tick(time_ms);
        self.time_ms = time_ms;
        self.rig.step(dt);
        self.camera.eye = self.rig.camera_eye();
        self.particles.update(time_ms);
        self.shards.update(time_ms);
    }

    pub fn frame(&self) -> SceneFrame<'_> {
        compose_frame(
            &self.rig,
            &self.particles,
            &self.shards,
            self.time_ms,
            self.mode == SceneMode::Static,
        )
    }

    fn draw(&mut self) {
        let frame = compose_frame(
            &self.rig,
            &self.particles,
            &self.shards,
            self.time_ms,
            self.mode == SceneMode::Static,
        );
        match self.renderer.render(&self.camera, &frame) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => {
                log::warn!("[scene] surface lost, reconfiguring");
                self.resize();
            }
            Err(e) => log::error!("[scene] render failed: {}", e),
        }
    }

    /// Stop and release the layout listeners as well.
    pub fn shutdown(&mut self) {
        self.stop();
        for handle in self.layout.drain(..) {
            self.host.unlisten(handle);
        }
    }
}

fn compose_frame<'a>(
    rig: &SceneRig,
    particles: &'a ParticleField,
    shards: &'a ShardField,
    time_ms: f64,
    static_mode: bool,
) -> SceneFrame<'a> {
    let marker = rig.marker();
    let halo = if static_mode { 1.0 } else { halo_scale(time_ms) };
    SceneFrame {
        time_ms,
        orb: SceneObject::at(Vec3::ZERO).rotated(rig.orb_rotation()),
        particles: SceneObject::at(Vec3::new(0.0, PARTICLE_GROUP_OFFSET_Y, 0.0))
            .rotated(rig.particle_group_rotation()),
        particle_positions: particles.positions(),
        shards: shards.instances(),
        flow: SceneObject::at(Vec3::ZERO)
            .rotated(rig.flow_rotation())
            .faded(rig.flow_opacity()),
        glow: SceneObject::at(marker)
            .rotated(rig.glow_rotation())
            .faded(rig.glow_opacity()),
        halo: SceneObject::at(marker)
            .rotated(rig.halo_rotation())
            .scaled(halo)
            .faded(rig.halo_opacity()),
        link: LinkLine {
            from: marker,
            to: Vec3::ZERO,
            opacity: rig.link_opacity(),
        },
        key_light: rig.key_light(),
        fill_light: rig.fill_light(),
        bloom_intensity: rig.bloom_intensity(),
    }
}
