// Host-side tests for the scene animation controller.

mod common;

use common::{FakeHost, FakeRenderer};
use drift_core::constants::*;
use drift_core::scene::{halo_scale, OrbitParams, ParticleField, ShardField};
use drift_core::{
    CapabilityState, DeviceKind, EventSource, FrameClock, HostEvent, PointerInput, PointerSample,
    Rect, RenderError, RenderSize, SceneAnimationController, SceneMode, SceneTuning, SetupError,
};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

type Controller = SceneAnimationController<FakeHost, FakeRenderer>;

fn small_tuning() -> SceneTuning {
    SceneTuning {
        particle_count: 64,
        shard_count: 8,
        ..SceneTuning::default()
    }
}

fn controller(host: FakeHost) -> Controller {
    match SceneAnimationController::new(host, FakeRenderer::default(), small_tuning()) {
        Ok(c) => c,
        Err(e) => panic!("setup failed: {}", e),
    }
}

fn running() -> Controller {
    let mut c = controller(FakeHost::default());
    c.start();
    c
}

fn tick(c: &mut Controller, time_ms: f64) {
    c.host_mut().frames.pop();
    c.handle(HostEvent::Frame { time_ms });
}

fn pointer_to(c: &mut Controller, x: f32, y: f32) {
    c.handle(HostEvent::Pointer(PointerInput::Move {
        sample: PointerSample::mouse(x, y),
        hit: None,
    }));
}

fn reduced() -> CapabilityState {
    CapabilityState {
        reduced_motion: true,
        ..CapabilityState::DESKTOP
    }
}

fn approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, 1e-3)
}

#[test]
fn missing_container_aborts_setup() {
    let host = FakeHost::with_container(None);
    let result = SceneAnimationController::new(host, FakeRenderer::default(), small_tuning());
    assert!(matches!(result, Err(SetupError::MissingAnchor(_))));
}

#[test]
fn setup_sizes_renderer_and_watches_layout() {
    let c = controller(FakeHost::default());
    assert_eq!(c.mode(), SceneMode::Idle);
    assert_eq!(
        c.renderer().sizes,
        vec![RenderSize {
            width: 1280,
            height: 720,
            pixel_ratio: 1.0
        }]
    );
    assert!((c.camera().aspect - 1280.0 / 720.0).abs() < 1e-6);
    assert_eq!(c.host().listening_to(EventSource::Resize), 1);
    assert_eq!(c.host().listening_to(EventSource::OrientationChange), 1);
    assert_eq!(c.host().pending_frames(), 0);
    assert_eq!(c.particles().len(), 64);
    assert_eq!(c.shards().len(), 8);
}

#[test]
fn pixel_ratio_is_capped() {
    let host = FakeHost::with_pixel_ratio(3.0);
    let c = controller(host);
    let size = c.renderer().sizes[0];
    assert_eq!(size.pixel_ratio, 2.0);
    assert_eq!((size.width, size.height), (2560, 1440));
}

#[test]
fn start_is_idempotent() {
    let mut c = running();
    c.start();
    assert!(c.is_running());
    assert_eq!(c.host().frame_requests, 1);
    assert_eq!(c.host().listeners.len(), 6);
}

#[test]
fn stop_releases_the_session_but_not_layout_listeners() {
    let mut c = running();
    tick(&mut c, 0.0);
    c.stop();
    assert_eq!(c.mode(), SceneMode::Idle);
    assert_eq!(c.host().pending_frames(), 0);
    assert_eq!(c.host().listeners.len(), 2);

    let rendered = c.renderer().frames.len();
    c.handle(HostEvent::Frame { time_ms: 50.0 });
    assert_eq!(c.renderer().frames.len(), rendered);
    c.stop();
}

#[test]
fn shutdown_releases_everything() {
    let mut c = running();
    c.shutdown();
    assert!(c.host().listeners.is_empty());
    assert_eq!(c.host().pending_frames(), 0);
}

#[test]
fn first_frame_after_start_has_zero_delta() {
    let mut c = running();
    tick(&mut c, 5_000.0);
    assert_eq!(c.renderer().frames[0].orb_rotation, Vec3::ZERO);

    tick(&mut c, 5_016.0);
    let expected = ORB_SPIN_RATE * 0.016;
    assert!(approx(c.renderer().frames[1].orb_rotation, expected));
}

#[test]
fn long_stalls_are_clamped() {
    let mut c = running();
    tick(&mut c, 0.0);
    tick(&mut c, 60_000.0);
    let expected = ORB_SPIN_RATE * MAX_FRAME_DELTA_SEC;
    assert!(approx(c.snapshot().orb_rotation, expected));
}

#[test]
fn each_frame_schedules_the_next() {
    let mut c = running();
    for i in 0..5 {
        tick(&mut c, i as f64 * 16.0);
        assert_eq!(c.host().pending_frames(), 1);
    }
    assert_eq!(c.renderer().frames.len(), 5);
}

#[test]
fn pointer_at_center_projects_onto_the_reference_plane() {
    let mut c = running();
    pointer_to(&mut c, 640.0, 360.0);
    let snap = c.snapshot();
    assert!(snap.pointer_active);

    // Ray from the rest eye through the view center, cut at z = 2.2.
    let eye = CAMERA_REST_EYE;
    let t = (eye.z - 2.2) / eye.z;
    let expected = Vec3::new(0.0, eye.y * (1.0 - t), 2.2);
    assert!(
        snap.marker_target.abs_diff_eq(expected, 5e-3),
        "{:?}",
        snap.marker_target
    );
}

#[test]
fn marker_target_is_clamped_to_the_bounds() {
    let mut c = running();
    pointer_to(&mut c, 4_000.0, -3_000.0);
    let target = c.snapshot().marker_target;
    assert_eq!(target.x, MARKER_BOUNDS_MAX.x);
    assert_eq!(target.y, MARKER_BOUNDS_MAX.y);
    assert!(target.z >= MARKER_BOUNDS_MIN.z && target.z <= MARKER_BOUNDS_MAX.z);
}

#[test]
fn pointer_offsets_follow_the_container_origin() {
    let host = FakeHost::with_container(Some(Rect::new(100.0, 50.0, 400.0, 200.0)));
    let mut c = controller(host);
    c.start();
    pointer_to(&mut c, 300.0, 150.0);
    assert!(c.snapshot().marker_target.x.abs() < 1e-3);
}

#[test]
fn live_pointer_fades_visuals_in_and_leave_fades_them_out() {
    let mut c = running();
    pointer_to(&mut c, 900.0, 200.0);
    for i in 0..60 {
        tick(&mut c, i as f64 * 16.0);
    }
    let live = c.snapshot();
    assert!(live.glow_opacity > 0.5 * GLOW_ACTIVE_OPACITY);
    assert!(live.halo_opacity > 0.0 && live.halo_opacity <= HALO_ACTIVE_OPACITY);
    assert!(live.link_opacity > 0.0 && live.link_opacity <= LINK_ACTIVE_OPACITY);
    assert!(live.bloom_intensity > BLOOM_IDLE_INTENSITY);
    assert!(live.camera_eye.x > 0.0);

    c.handle(HostEvent::Pointer(PointerInput::Leave {
        kind: DeviceKind::Mouse,
    }));
    let left = c.snapshot();
    assert!(!left.pointer_active);
    assert_eq!(left.marker_target, MARKER_REST);

    for i in 60..400 {
        tick(&mut c, i as f64 * 16.0);
    }
    let idle = c.snapshot();
    assert!(idle.glow_opacity < 0.01);
    assert!((idle.bloom_intensity - BLOOM_IDLE_INTENSITY).abs() < 0.01);
    assert!((idle.flow_opacity - FLOW_IDLE_OPACITY).abs() < 0.01);
}

#[test]
fn blur_and_hidden_release_the_pointer() {
    for event in [HostEvent::WindowBlur, HostEvent::VisibilityChanged { hidden: true }] {
        let mut c = running();
        pointer_to(&mut c, 900.0, 200.0);
        c.handle(event);
        let snap = c.snapshot();
        assert!(!snap.pointer_active);
        assert_eq!(snap.marker_target, MARKER_REST);
    }
}

#[test]
fn non_mouse_pointers_do_not_aim() {
    let mut c = running();
    c.handle(HostEvent::Pointer(PointerInput::Move {
        sample: PointerSample::new(900.0, 200.0, DeviceKind::Touch),
        hit: None,
    }));
    let snap = c.snapshot();
    assert!(!snap.pointer_active);
    assert_eq!(snap.marker_target, MARKER_REST);
}

#[test]
fn pointer_is_ignored_while_idle() {
    let mut c = controller(FakeHost::default());
    pointer_to(&mut c, 900.0, 200.0);
    assert!(!c.snapshot().pointer_active);
}

#[test]
fn reduced_motion_renders_one_static_frame() {
    let mut c = controller(FakeHost::default());
    c.evaluate(&reduced());
    assert_eq!(c.mode(), SceneMode::Static);
    assert_eq!(c.host().pending_frames(), 0);
    assert_eq!(c.host().listeners.len(), 2);

    let frames = &c.renderer().frames;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].glow_opacity, 0.0);
    assert_eq!(frames[0].halo_opacity, 0.0);
    assert_eq!(frames[0].link_opacity, 0.0);
    assert_eq!(frames[0].orb_rotation, ORB_STATIC_ROTATION);
    assert_eq!(frames[0].eye, CAMERA_REST_EYE);
}

#[test]
fn reduced_motion_halts_a_running_loop() {
    let mut c = running();
    pointer_to(&mut c, 900.0, 200.0);
    tick(&mut c, 0.0);
    tick(&mut c, 16.0);

    c.evaluate(&reduced());
    assert_eq!(c.mode(), SceneMode::Static);
    assert_eq!(c.host().pending_frames(), 0);
    assert!(!c.snapshot().pointer_active);
    assert_eq!(c.snapshot().glow_opacity, 0.0);

    c.evaluate(&CapabilityState::DESKTOP);
    assert!(c.is_running());
    assert_eq!(c.host().pending_frames(), 1);
}

#[test]
fn resize_refits_camera_and_targets() {
    let mut c = running();
    c.host_mut().container = Some(Rect::new(0.0, 0.0, 640.0, 480.0));
    c.handle(HostEvent::Resize);
    assert!((c.camera().aspect - 640.0 / 480.0).abs() < 1e-6);
    assert_eq!(c.renderer().sizes.len(), 2);
    assert_eq!(c.renderer().sizes[1].width, 640);
    assert!(c.renderer().frames.is_empty());
}

#[test]
fn resize_while_static_redraws() {
    let mut c = controller(FakeHost::default());
    c.render_static();
    c.host_mut().container = Some(Rect::new(0.0, 0.0, 800.0, 800.0));
    c.handle(HostEvent::Resize);
    assert_eq!(c.renderer().frames.len(), 2);
    assert!((c.renderer().frames[1].aspect - 1.0).abs() < 1e-6);
}

#[test]
fn lost_surface_is_reconfigured_and_the_loop_continues() {
    let mut c = running();
    tick(&mut c, 0.0);
    let sizes = c.renderer().sizes.len();
    set_failure(&mut c, RenderError::SurfaceLost);
    tick(&mut c, 16.0);
    assert_eq!(c.renderer().sizes.len(), sizes + 1);
    assert_eq!(c.host().pending_frames(), 1);

    set_failure(&mut c, RenderError::Backend("oom".into()));
    tick(&mut c, 32.0);
    assert!(c.is_running());
}

fn set_failure(c: &mut Controller, err: RenderError) {
    c.renderer_mut().fail_next = Some(err);
}

#[test]
fn restart_begins_from_a_clean_rig() {
    let mut c = running();
    pointer_to(&mut c, 900.0, 200.0);
    for i in 0..30 {
        tick(&mut c, i as f64 * 16.0);
    }
    c.stop();
    c.start();
    let snap = c.snapshot();
    assert!(!snap.pointer_active);
    assert_eq!(snap.marker, MARKER_REST);
    assert_eq!(snap.glow_opacity, 0.0);
    assert_eq!(snap.orb_rotation, Vec3::ZERO);
    assert_eq!(snap.camera_eye, CAMERA_REST_EYE);
}

#[test]
fn closed_form_fields_ignore_frame_history() {
    let mut stepped = running();
    for i in 0..=100 {
        tick(&mut stepped, i as f64 * 16.0);
    }
    let mut jumped = running();
    tick(&mut jumped, 1_600.0);

    let a = stepped.renderer().frames.last().and_then(|f| f.first_particle);
    let b = jumped.renderer().frames.last().and_then(|f| f.first_particle);
    assert!(a.is_some());
    assert_eq!(a, b);
    assert_eq!(stepped.shards().instances(), jumped.shards().instances());
}

#[test]
fn particles_stay_on_their_orbits() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut field = ParticleField::generate(200, &mut rng);
    for t in [0.0, 1_234.0, 987_654.0] {
        field.update(t);
        for (p, params) in field.positions().iter().zip(field.params()) {
            let flat = Vec2::new(p.x, p.z).length();
            assert!((flat - params.radius).abs() < 1e-3);
            assert!((PARTICLE_RADIUS_MIN..PARTICLE_RADIUS_MAX).contains(&params.radius));
            assert!(p.y.abs() <= PARTICLE_BOB_HEIGHT + 1e-5);
        }
    }
}

#[test]
fn particle_bob_follows_the_orbit_angle() {
    let params = OrbitParams {
        radius: 8.0,
        speed: 1.0,
        phase: 0.7,
    };
    let p = ParticleField::position_at(&params, 0.0);
    assert!((p.x - 0.7f32.cos() * 8.0).abs() < 1e-5);
    assert!((p.y - 0.7f32.sin() * PARTICLE_BOB_HEIGHT).abs() < 1e-5);
    assert!((p.z - 0.7f32.sin() * 8.0).abs() < 1e-5);
}

#[test]
fn shards_keep_their_radius_and_wrap_rotation() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut field = ShardField::generate(32, &mut rng);
    field.update(3.0e7);
    for shard in field.instances() {
        let r = shard.position.length();
        assert!(r >= SHARD_RADIUS_MIN - 1e-3 && r <= SHARD_RADIUS_MAX + 1e-3);
        let tau = std::f32::consts::TAU;
        for angle in shard.rotation.to_array() {
            assert!((0.0..=tau).contains(&angle));
        }
    }
}

#[test]
fn same_seed_same_fields() {
    let a = controller(FakeHost::default());
    let b = controller(FakeHost::default());
    assert_eq!(a.particles().params(), b.particles().params());
}

#[test]
fn halo_breathes_around_its_base_scale() {
    assert!((halo_scale(0.0) - HALO_BASE_SCALE).abs() < 1e-6);
    for t in [100.0, 523.0, 10_000.0] {
        let s = halo_scale(t);
        assert!(s >= HALO_BASE_SCALE - HALO_PULSE_SCALE - 1e-6);
        assert!(s <= HALO_BASE_SCALE + HALO_PULSE_SCALE + 1e-6);
    }
}

#[test]
fn frame_clock_starts_at_zero_and_clamps() {
    let mut clock = FrameClock::default();
    assert_eq!(clock.tick(1_000.0), 0.0);
    assert!((clock.tick(1_016.0) - 0.016).abs() < 1e-6);
    assert_eq!(clock.tick(900.0), 0.0);
    assert_eq!(clock.tick(10_000.0), MAX_FRAME_DELTA_SEC);
    clock.reset();
    assert_eq!(clock.tick(20_000.0), 0.0);
}

#[test]
fn render_size_never_collapses() {
    let size = RenderSize::from_css(Vec2::ZERO, f32::NAN);
    assert_eq!((size.width, size.height), (1, 1));
    assert_eq!(size.pixel_ratio, 1.0);
}

#[test]
fn bloom_disabled_pins_intensity_to_zero() {
    let host = FakeHost::default();
    let tuning = SceneTuning {
        bloom: false,
        ..small_tuning()
    };
    let mut c = match SceneAnimationController::new(host, FakeRenderer::default(), tuning) {
        Ok(c) => c,
        Err(e) => panic!("setup failed: {}", e),
    };
    c.start();
    pointer_to(&mut c, 900.0, 200.0);
    tick(&mut c, 0.0);
    tick(&mut c, 16.0);
    assert_eq!(c.snapshot().bloom_intensity, 0.0);
}
