// Recording fakes for the host seam and the scene renderer.

#![allow(dead_code)]

use drift_core::{
    AvatarFlag, AvatarPose, AvatarSurface, Camera, EventSource, FrameHandle, Host, ListenerHandle,
    Rect, RenderError, RenderSize, SceneFrame, SceneHost, SceneRenderer, SetupError, TimerHandle,
};
use glam::{Vec2, Vec3};
use std::collections::BTreeMap;
use std::time::Duration;

/// One observable change made through the surface.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Mount,
    Unmount,
    Flag(AvatarFlag, bool),
    Pose(AvatarPose),
}

#[derive(Debug)]
pub struct FakeHost {
    pub viewport: Vec2,
    pub container: Option<Rect>,
    pub pixel_ratio: f32,
    pub body_ready: bool,
    pub refuse: Vec<EventSource>,

    next_id: i32,
    pub frames: Vec<FrameHandle>,
    pub timers: BTreeMap<i32, Duration>,
    pub listeners: BTreeMap<u32, EventSource>,
    pub frame_requests: usize,
    pub cancelled_frames: usize,
    pub cleared_timers: usize,

    pub mounted: usize,
    pub ops: Vec<SurfaceOp>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(1280.0, 720.0),
            container: Some(Rect::new(0.0, 0.0, 1280.0, 720.0)),
            pixel_ratio: 1.0,
            body_ready: true,
            refuse: Vec::new(),
            next_id: 1,
            frames: Vec::new(),
            timers: BTreeMap::new(),
            listeners: BTreeMap::new(),
            frame_requests: 0,
            cancelled_frames: 0,
            cleared_timers: 0,
            mounted: 0,
            ops: Vec::new(),
        }
    }
}

impl FakeHost {
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width, height),
            ..Self::default()
        }
    }

    pub fn with_container(container: Option<Rect>) -> Self {
        Self {
            container,
            ..Self::default()
        }
    }

    pub fn with_pixel_ratio(pixel_ratio: f32) -> Self {
        Self {
            pixel_ratio,
            ..Self::default()
        }
    }

    /// A host whose `listen` fails for the given sources.
    pub fn refusing(sources: &[EventSource]) -> Self {
        Self {
            refuse: sources.to_vec(),
            ..Self::default()
        }
    }

    fn next(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> Vec<TimerHandle> {
        self.timers.keys().map(|&id| TimerHandle(id)).collect()
    }

    pub fn listening_to(&self, source: EventSource) -> usize {
        self.listeners.values().filter(|s| **s == source).count()
    }

    pub fn flag_ops(&self) -> Vec<(AvatarFlag, bool)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Flag(flag, on) => Some((*flag, *on)),
                _ => None,
            })
            .collect()
    }

    pub fn last_pose(&self) -> Option<AvatarPose> {
        self.ops.iter().rev().find_map(|op| match op {
            SurfaceOp::Pose(pose) => Some(*pose),
            _ => None,
        })
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl Host for FakeHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let handle = FrameHandle(self.next());
        self.frames.push(handle);
        self.frame_requests += 1;
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|h| *h != handle);
        self.cancelled_frames += 1;
    }

    fn set_timeout(&mut self, delay: Duration) -> Option<TimerHandle> {
        let id = self.next();
        self.timers.insert(id, delay);
        Some(TimerHandle(id))
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle.0);
        self.cleared_timers += 1;
    }

    fn listen(&mut self, source: EventSource) -> Option<ListenerHandle> {
        if self.refuse.contains(&source) {
            return None;
        }
        let id = self.next() as u32;
        self.listeners.insert(id, source);
        Some(ListenerHandle(id))
    }

    fn unlisten(&mut self, handle: ListenerHandle) {
        self.listeners.remove(&handle.0);
    }
}

impl AvatarSurface for FakeHost {
    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn mount(&mut self) -> Result<(), SetupError> {
        if !self.body_ready {
            return Err(SetupError::MissingAnchor("body"));
        }
        self.mounted += 1;
        self.ops.push(SurfaceOp::Mount);
        Ok(())
    }

    fn unmount(&mut self) {
        self.mounted = self.mounted.saturating_sub(1);
        self.ops.push(SurfaceOp::Unmount);
    }

    fn set_flag(&mut self, flag: AvatarFlag, on: bool) {
        self.ops.push(SurfaceOp::Flag(flag, on));
    }

    fn apply_pose(&mut self, pose: &AvatarPose) {
        self.ops.push(SurfaceOp::Pose(*pose));
    }
}

impl SceneHost for FakeHost {
    fn container_rect(&self) -> Option<Rect> {
        self.container
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

/// Copy of what one `render` call saw.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFrame {
    pub time_ms: f64,
    pub eye: Vec3,
    pub aspect: f32,
    pub orb_rotation: Vec3,
    pub glow_opacity: f32,
    pub halo_opacity: f32,
    pub link_opacity: f32,
    pub bloom_intensity: f32,
    pub particle_count: usize,
    pub shard_count: usize,
    pub first_particle: Option<Vec3>,
}

#[derive(Debug, Default)]
pub struct FakeRenderer {
    pub sizes: Vec<RenderSize>,
    pub frames: Vec<RenderedFrame>,
    pub fail_next: Option<RenderError>,
}

impl SceneRenderer for FakeRenderer {
    fn resize(&mut self, size: RenderSize) {
        self.sizes.push(size);
    }

    fn render(&mut self, camera: &Camera, frame: &SceneFrame<'_>) -> Result<(), RenderError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.frames.push(RenderedFrame {
            time_ms: frame.time_ms,
            eye: camera.eye,
            aspect: camera.aspect,
            orb_rotation: frame.orb.rotation,
            glow_opacity: frame.glow.opacity,
            halo_opacity: frame.halo.opacity,
            link_opacity: frame.link.opacity,
            bloom_intensity: frame.bloom_intensity,
            particle_count: frame.particle_positions.len(),
            shard_count: frame.shards.len(),
            first_particle: frame.particle_positions.first().copied(),
        });
        Ok(())
    }
}
