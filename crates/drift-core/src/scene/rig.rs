//! Per-frame smoothed and integrated scene state.

use crate::camera::{Bounds, Plane, Ray};
use crate::constants::*;
use crate::follow::Follower;
use glam::{Vec2, Vec3};

/// Rotation integrated across frames: `angles += dt * rate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    angles: Vec3,
    rate: Vec3,
}

impl Spin {
    pub fn new(rate: Vec3) -> Self {
        Self {
            angles: Vec3::ZERO,
            rate,
        }
    }

    pub fn about_z(rate: f32) -> Self {
        Self::new(Vec3::new(0.0, 0.0, rate))
    }

    #[inline]
    pub fn angles(&self) -> Vec3 {
        self.angles
    }

    #[inline]
    pub fn rate(&self) -> Vec3 {
        self.rate
    }

    pub fn set(&mut self, angles: Vec3) {
        self.angles = angles;
    }

    /// `dt` in seconds.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.angles += self.rate * dt;
        self.angles
    }
}

/// Point light trailing the marker from a fixed base offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    base: Vec3,
    follow: [f32; 2],
    position: Follower<Vec3>,
}

impl LightRig {
    pub fn new(base: Vec3, follow: [f32; 2], gain: f32) -> Self {
        Self {
            base,
            follow,
            position: Follower::new(base, gain),
        }
    }

    pub fn key() -> Self {
        Self::new(KEY_LIGHT_BASE, KEY_LIGHT_FOLLOW, LIGHT_GAIN)
    }

    pub fn fill() -> Self {
        Self::new(FILL_LIGHT_BASE, FILL_LIGHT_FOLLOW, LIGHT_GAIN)
    }

    pub fn target_for(&self, marker: Vec3) -> Vec3 {
        self.base + Vec3::new(marker.x * self.follow[0], marker.y * self.follow[1], 0.0)
    }

    pub fn step(&mut self, marker: Vec3) -> Vec3 {
        let target = self.target_for(marker);
        self.position.step_toward(target)
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position.current()
    }
}

/// Everything in the scene that moves per frame rather than per time.
#[derive(Clone, Debug)]
pub struct SceneRig {
    pointer_active: bool,
    bloom_enabled: bool,
    pointer_angle: Follower<Vec2>,
    camera_offset: Follower<Vec2>,
    marker: Follower<Vec3>,
    glow_opacity: Follower<f32>,
    halo_opacity: Follower<f32>,
    link_opacity: Follower<f32>,
    flow_opacity: Follower<f32>,
    bloom: Follower<f32>,
    particle_tilt: Follower<f32>,
    key_light: LightRig,
    fill_light: LightRig,
    orb: Spin,
    flow: Spin,
    glow: Spin,
    halo: Spin,
    particle_group: Spin,
}

impl SceneRig {
    pub fn new(bloom_enabled: bool) -> Self {
        let bloom_rest = if bloom_enabled { BLOOM_IDLE_INTENSITY } else { 0.0 };
        Self {
            pointer_active: false,
            bloom_enabled,
            pointer_angle: Follower::new(Vec2::ZERO, POINTER_ANGLE_GAIN),
            camera_offset: Follower::new(
                Vec2::new(CAMERA_REST_EYE.x, CAMERA_REST_EYE.y),
                CAMERA_OFFSET_GAIN,
            ),
            marker: Follower::new(MARKER_REST, MARKER_GAIN),
            glow_opacity: Follower::new(0.0, GLOW_OPACITY_GAIN),
            halo_opacity: Follower::new(0.0, HALO_OPACITY_GAIN),
            link_opacity: Follower::new(0.0, LINK_OPACITY_GAIN),
            flow_opacity: Follower::new(FLOW_IDLE_OPACITY, FLOW_OPACITY_GAIN),
            bloom: Follower::new(bloom_rest, BLOOM_INTENSITY_GAIN),
            particle_tilt: Follower::new(0.0, PARTICLE_TILT_GAIN),
            key_light: LightRig::key(),
            fill_light: LightRig::fill(),
            orb: Spin::new(ORB_SPIN_RATE),
            flow: Spin::new(FLOW_SPIN_RATE),
            glow: Spin::about_z(GLOW_SPIN_RATE),
            halo: Spin::about_z(HALO_SPIN_RATE),
            particle_group: Spin::new(Vec3::new(0.0, PARTICLE_GROUP_SPIN_RATE, 0.0)),
        }
    }

    #[inline]
    pub fn pointer_active(&self) -> bool {
        self.pointer_active
    }

    /// Feed a pointer position normalized to the container (`0..1`, y down).
    ///
    /// `ray` is the camera ray through that point; a miss leaves the marker
    /// target where it was.
    pub fn aim(&mut self, normalized: Vec2, ray: &Ray) {
        let centered = normalized - Vec2::splat(0.5);
        self.pointer_angle.set_target(Vec2::new(
            centered.x * POINTER_ANGLE_SPAN_X,
            centered.y * POINTER_ANGLE_SPAN_Y,
        ));
        let plane = Plane::new(POINTER_PLANE_NORMAL, POINTER_PLANE_CONSTANT);
        if let Some(hit) = ray.intersect_plane(&plane) {
            let bounds = Bounds::new(MARKER_BOUNDS_MIN, MARKER_BOUNDS_MAX);
            self.marker.set_target(bounds.clamp(hit));
        }
        self.pointer_active = true;
    }

    /// Pointer gone: targets go back to rest and reactive visuals fade out.
    pub fn release_pointer(&mut self) {
        self.pointer_active = false;
        self.pointer_angle.set_target(Vec2::ZERO);
        self.marker.set_target(MARKER_REST);
    }

    /// Advance one frame. `dt` in seconds.
    pub fn step(&mut self, dt: f32) {
        let angle = self.pointer_angle.step();
        self.camera_offset.step_toward(Vec2::new(
            angle.x * CAMERA_LATERAL_PER_ANGLE,
            CAMERA_REST_EYE.y + angle.y * CAMERA_VERTICAL_PER_ANGLE,
        ));

        let marker = self.marker.step();
        self.key_light.step(marker);
        self.fill_light.step(marker);

        let live = self.pointer_active;
        let pick = |active: f32, idle: f32| if live { active } else { idle };
        self.glow_opacity.step_toward(pick(GLOW_ACTIVE_OPACITY, 0.0));
        self.halo_opacity.step_toward(pick(HALO_ACTIVE_OPACITY, 0.0));
        self.link_opacity.step_toward(pick(LINK_ACTIVE_OPACITY, 0.0));
        self.flow_opacity
            .step_toward(pick(FLOW_ACTIVE_OPACITY, FLOW_IDLE_OPACITY));
        if self.bloom_enabled {
            self.bloom
                .step_toward(pick(BLOOM_ACTIVE_INTENSITY, BLOOM_IDLE_INTENSITY));
        } else {
            self.bloom.snap(0.0);
        }

        self.orb.advance(dt);
        self.flow.advance(dt);
        self.glow.advance(dt);
        self.halo.advance(dt);
        self.particle_group.advance(dt);
        self.particle_tilt.step_toward(angle.y);
    }

    /// Fixed pose for the reduced-motion render.
    pub fn pin_static(&mut self) {
        self.pointer_active = false;
        self.pointer_angle.snap(Vec2::ZERO);
        self.camera_offset
            .snap(Vec2::new(CAMERA_REST_EYE.x, CAMERA_REST_EYE.y));
        self.marker.snap(MARKER_REST);
        self.glow_opacity.snap(0.0);
        self.halo_opacity.snap(0.0);
        self.link_opacity.snap(0.0);
        self.flow_opacity.snap(FLOW_IDLE_OPACITY);
        self.bloom.snap(if self.bloom_enabled {
            BLOOM_IDLE_INTENSITY
        } else {
            0.0
        });
        self.particle_tilt.snap(0.0);
        self.key_light = LightRig::key();
        self.fill_light = LightRig::fill();
        self.orb.set(ORB_STATIC_ROTATION);
        self.flow.set(Vec3::ZERO);
        self.glow.set(Vec3::ZERO);
        self.halo.set(Vec3::ZERO);
        self.particle_group.set(Vec3::ZERO);
    }

    pub fn camera_eye(&self) -> Vec3 {
        let offset = self.camera_offset.current();
        Vec3::new(offset.x, offset.y, CAMERA_REST_EYE.z)
    }

    pub fn pointer_angle(&self) -> Vec2 {
        self.pointer_angle.current()
    }

    pub fn marker(&self) -> Vec3 {
        self.marker.current()
    }

    pub fn marker_target(&self) -> Vec3 {
        self.marker.target()
    }

    pub fn glow_opacity(&self) -> f32 {
        self.glow_opacity.current()
    }

    pub fn halo_opacity(&self) -> f32 {
        self.halo_opacity.current()
    }

    pub fn link_opacity(&self) -> f32 {
        self.link_opacity.current()
    }

    pub fn flow_opacity(&self) -> f32 {
        self.flow_opacity.current()
    }

    pub fn bloom_intensity(&self) -> f32 {
        self.bloom.current()
    }

    pub fn particle_tilt(&self) -> f32 {
        self.particle_tilt.current()
    }

    pub fn key_light(&self) -> Vec3 {
        self.key_light.position()
    }

    pub fn fill_light(&self) -> Vec3 {
        self.fill_light.position()
    }

    pub fn orb_rotation(&self) -> Vec3 {
        self.orb.angles()
    }

    pub fn flow_rotation(&self) -> Vec3 {
        self.flow.angles()
    }

    pub fn glow_rotation(&self) -> Vec3 {
        self.glow.angles()
    }

    pub fn halo_rotation(&self) -> Vec3 {
        self.halo.angles()
    }

    pub fn particle_group_rotation(&self) -> Vec3 {
        let spin = self.particle_group.angles();
        Vec3::new(self.particle_tilt.current(), spin.y, 0.0)
    }
}

/// Halo breathing, computed from the timestamp alone.
#[inline]
pub fn halo_scale(time_ms: f64) -> f32 {
    let phase = (time_ms * HALO_PULSE_PER_MS as f64).rem_euclid(std::f64::consts::TAU) as f32;
    HALO_BASE_SCALE + phase.sin() * HALO_PULSE_SCALE
}
