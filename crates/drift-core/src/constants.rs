//! Frame smoothing and interaction tuning constants.
//!
//! Gains are per-frame fractions for first-order followers; limits are the
//! symmetric clamps applied to velocity-derived targets.
use glam::Vec3;

// ---------------- Cursor avatar ----------------

// Position and scale followers
pub const AVATAR_POSITION_GAIN: f32 = 0.2;
pub const AVATAR_SCALE_GAIN: f32 = 0.2;

// Tilt (degrees) from horizontal velocity
pub const AVATAR_TILT_GAIN: f32 = 0.18;
pub const AVATAR_TILT_PER_VELOCITY: f32 = 14.0;
pub const AVATAR_TILT_LIMIT: f32 = 18.0;

// Bounce (px) from vertical velocity; moving up lifts the avatar
pub const AVATAR_BOUNCE_GAIN: f32 = 0.22;
pub const AVATAR_BOUNCE_PER_VELOCITY: f32 = -18.0;
pub const AVATAR_BOUNCE_LIMIT: f32 = 16.0;

// Eye look offset (px)
pub const AVATAR_LOOK_GAIN: f32 = 0.22;
pub const AVATAR_LOOK_X_PER_VELOCITY: f32 = 16.0;
pub const AVATAR_LOOK_X_LIMIT: f32 = 12.0;
pub const AVATAR_LOOK_Y_PER_VELOCITY: f32 = -14.0;
pub const AVATAR_LOOK_Y_LIMIT: f32 = 10.0;

// Per-frame speed (px) above which the avatar counts as moving
pub const AVATAR_MOVING_SPEED: f32 = 0.45;

// ---------------- Scene camera ----------------

pub const CAMERA_FOV_DEGREES: f32 = 42.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_REST_EYE: Vec3 = Vec3::new(0.0, 1.2, 16.0);
pub const CAMERA_OFFSET_GAIN: f32 = 0.04;
pub const CAMERA_LATERAL_PER_ANGLE: f32 = 12.0;
pub const CAMERA_VERTICAL_PER_ANGLE: f32 = 6.0;
pub const MAX_PIXEL_RATIO: f32 = 2.0;

// ---------------- Pointer projection ----------------

// Pointer angle span across the container (radians)
pub const POINTER_ANGLE_SPAN_X: f32 = std::f32::consts::PI * 0.1;
pub const POINTER_ANGLE_SPAN_Y: f32 = std::f32::consts::PI * 0.08;
pub const POINTER_ANGLE_GAIN: f32 = 0.08;

// Reference plane z = 2.2 expressed as normal·p + constant = 0
pub const POINTER_PLANE_NORMAL: Vec3 = Vec3::Z;
pub const POINTER_PLANE_CONSTANT: f32 = -2.2;

pub const MARKER_REST: Vec3 = Vec3::new(0.0, 0.8, 2.2);
pub const MARKER_BOUNDS_MIN: Vec3 = Vec3::new(-4.5, -2.8, 0.0);
pub const MARKER_BOUNDS_MAX: Vec3 = Vec3::new(4.5, 3.6, 4.0);
pub const MARKER_GAIN: f32 = 0.12;

// ---------------- Marker visuals ----------------

pub const GLOW_ACTIVE_OPACITY: f32 = 0.85;
pub const GLOW_OPACITY_GAIN: f32 = 0.12;
pub const GLOW_SPIN_RATE: f32 = 0.6;

pub const HALO_ACTIVE_OPACITY: f32 = 0.44;
pub const HALO_OPACITY_GAIN: f32 = 0.1;
pub const HALO_SPIN_RATE: f32 = 0.45;
pub const HALO_BASE_SCALE: f32 = 1.15;
pub const HALO_PULSE_SCALE: f32 = 0.25;
pub const HALO_PULSE_PER_MS: f32 = 0.003;

pub const LINK_ACTIVE_OPACITY: f32 = 0.36;
pub const LINK_OPACITY_GAIN: f32 = 0.12;

// ---------------- Scene objects ----------------

pub const ORB_RADIUS: f32 = 3.2;
pub const ORB_SPIN_RATE: Vec3 = Vec3::new(0.12, 0.2, 0.0);
pub const ORB_STATIC_ROTATION: Vec3 = Vec3::new(0.3, 0.6, 0.0);

pub const FLOW_KNOT_RADIUS: f32 = 6.5;
pub const FLOW_SPIN_RATE: Vec3 = Vec3::new(0.0, -0.06, 0.04);
pub const FLOW_IDLE_OPACITY: f32 = 0.18;
pub const FLOW_ACTIVE_OPACITY: f32 = 0.24;
pub const FLOW_OPACITY_GAIN: f32 = 0.06;

pub const PARTICLE_RADIUS_MIN: f32 = 6.0;
pub const PARTICLE_RADIUS_MAX: f32 = 14.0;
pub const PARTICLE_SPEED_MIN: f32 = 0.5;
pub const PARTICLE_SPEED_MAX: f32 = 1.2;
pub const PARTICLE_TIME_SCALE: f32 = 0.0002; // radians per ms at speed 1
pub const PARTICLE_BOB_HEIGHT: f32 = 1.5;
pub const PARTICLE_GROUP_OFFSET_Y: f32 = 0.4;
pub const PARTICLE_GROUP_SPIN_RATE: f32 = 0.08;
pub const PARTICLE_TILT_GAIN: f32 = 0.02;

pub const SHARD_RADIUS_MIN: f32 = 4.5;
pub const SHARD_RADIUS_MAX: f32 = 7.5;
pub const SHARD_SPEED_MIN: f32 = 0.6;
pub const SHARD_SPEED_MAX: f32 = 1.4;
pub const SHARD_TIME_SCALE: f32 = 0.00035;
pub const SHARD_TUMBLE_PER_ORBIT: f32 = 3.0;
pub const SHARD_MAX_INCLINATION: f32 = 0.5; // radians

// ---------------- Lights ----------------

pub const KEY_LIGHT_BASE: Vec3 = Vec3::new(6.0, 6.0, 4.0);
pub const KEY_LIGHT_FOLLOW: [f32; 2] = [0.35, 0.25];
pub const FILL_LIGHT_BASE: Vec3 = Vec3::new(-6.0, -4.0, 6.0);
pub const FILL_LIGHT_FOLLOW: [f32; 2] = [0.3, 0.2];
pub const LIGHT_GAIN: f32 = 0.08;

// ---------------- Post-processing ----------------

pub const BLOOM_IDLE_INTENSITY: f32 = 0.6;
pub const BLOOM_ACTIVE_INTENSITY: f32 = 0.9;
pub const BLOOM_INTENSITY_GAIN: f32 = 0.05;
pub const BLOOM_THRESHOLD: f32 = 0.6;

// ---------------- Frame clock ----------------

// Largest step the integrators take after a stalled frame (seconds)
pub const MAX_FRAME_DELTA_SEC: f32 = 0.1;
