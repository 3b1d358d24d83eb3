//! Closed-form object fields.
//!
//! Each entity keeps only the parameters drawn at creation. Its pose at
//! time `t` is computed directly from `t`, so the motion is the same no
//! matter how many frames were skipped or how often the loop restarted.

use crate::constants::*;
use glam::{Mat3, Vec3};
use rand::Rng;
use std::f64::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitParams {
    pub radius: f32,
    pub speed: f32,
    /// Radians.
    pub phase: f32,
}

impl OrbitParams {
    /// Unwrapped orbit angle at `time_ms`.
    #[inline]
    pub fn phase_at(&self, time_ms: f64, time_scale: f32) -> f64 {
        time_ms * time_scale as f64 * self.speed as f64 + self.phase as f64
    }

    /// Orbit angle at `time_ms`, wrapped to one turn before narrowing to f32.
    #[inline]
    pub fn angle_at(&self, time_ms: f64, time_scale: f32) -> f32 {
        self.phase_at(time_ms, time_scale).rem_euclid(TAU) as f32
    }
}

/// Radial particle cloud orbiting the origin.
#[derive(Clone, Debug, Default)]
pub struct ParticleField {
    params: Vec<OrbitParams>,
    positions: Vec<Vec3>,
}

impl ParticleField {
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let params = (0..count)
            .map(|_| OrbitParams {
                radius: rng.gen_range(PARTICLE_RADIUS_MIN..PARTICLE_RADIUS_MAX),
                speed: rng.gen_range(PARTICLE_SPEED_MIN..PARTICLE_SPEED_MAX),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
            })
            .collect();
        Self::from_params(params)
    }

    pub fn from_params(params: Vec<OrbitParams>) -> Self {
        let mut field = Self {
            positions: vec![Vec3::ZERO; params.len()],
            params,
        };
        field.update(0.0);
        field
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn params(&self) -> &[OrbitParams] {
        &self.params
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn position_at(params: &OrbitParams, time_ms: f64) -> Vec3 {
        let t = params.angle_at(time_ms, PARTICLE_TIME_SCALE);
        Vec3::new(
            t.cos() * params.radius,
            t.sin() * PARTICLE_BOB_HEIGHT,
            t.sin() * params.radius,
        )
    }

    pub fn update(&mut self, time_ms: f64) -> &[Vec3] {
        for (slot, p) in self.positions.iter_mut().zip(&self.params) {
            *slot = Self::position_at(p, time_ms);
        }
        &self.positions
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShardParams {
    pub orbit: OrbitParams,
    /// Tilt of the orbit plane about X, radians.
    pub inclination: f32,
    /// Unit weights spreading the tumble over the three Euler angles.
    pub tumble_axis: Vec3,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShardInstance {
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Small instanced shards on inclined orbits, tumbling as they go.
#[derive(Clone, Debug, Default)]
pub struct ShardField {
    params: Vec<ShardParams>,
    instances: Vec<ShardInstance>,
}

impl ShardField {
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let params = (0..count)
            .map(|_| ShardParams {
                orbit: OrbitParams {
                    radius: rng.gen_range(SHARD_RADIUS_MIN..SHARD_RADIUS_MAX),
                    speed: rng.gen_range(SHARD_SPEED_MIN..SHARD_SPEED_MAX),
                    phase: rng.gen_range(0.0..std::f32::consts::TAU),
                },
                inclination: rng.gen_range(-SHARD_MAX_INCLINATION..SHARD_MAX_INCLINATION),
                tumble_axis: Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
                .try_normalize()
                .unwrap_or(Vec3::Y),
            })
            .collect();
        Self::from_params(params)
    }

    pub fn from_params(params: Vec<ShardParams>) -> Self {
        let mut field = Self {
            instances: vec![ShardInstance::default(); params.len()],
            params,
        };
        field.update(0.0);
        field
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn instances(&self) -> &[ShardInstance] {
        &self.instances
    }

    pub fn instance_at(params: &ShardParams, time_ms: f64) -> ShardInstance {
        let phase = params.orbit.phase_at(time_ms, SHARD_TIME_SCALE);
        let t = phase.rem_euclid(TAU) as f32;
        let flat = Vec3::new(t.cos(), 0.0, t.sin()) * params.orbit.radius;
        let tumble = phase * SHARD_TUMBLE_PER_ORBIT as f64;
        let wrap = |weight: f32| (tumble * weight as f64).rem_euclid(TAU) as f32;
        ShardInstance {
            position: Mat3::from_rotation_x(params.inclination) * flat,
            rotation: Vec3::new(
                wrap(params.tumble_axis.x),
                wrap(params.tumble_axis.y),
                wrap(params.tumble_axis.z),
            ),
        }
    }

    pub fn update(&mut self, time_ms: f64) -> &[ShardInstance] {
        for (slot, p) in self.instances.iter_mut().zip(&self.params) {
            *slot = Self::instance_at(p, time_ms);
        }
        &self.instances
    }
}
