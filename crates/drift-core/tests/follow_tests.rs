// Host-side tests for first-order followers.

use drift_core::{clamp_symmetric, Follower};
use glam::{Vec2, Vec3};

#[test]
fn step_moves_a_fixed_fraction_of_the_gap() {
    let mut f = Follower::new(0.0_f32, 0.2);
    f.set_target(10.0);
    assert!((f.step() - 2.0).abs() < 1e-6);
    assert!((f.step() - 3.6).abs() < 1e-6);
}

#[test]
fn never_overshoots_and_converges() {
    let mut f = Follower::new(Vec2::ZERO, 0.2);
    let target = Vec2::new(400.0, 300.0);
    f.set_target(target);
    let mut last = f.remaining();
    for _ in 0..200 {
        let p = f.step();
        assert!(p.x <= target.x && p.y <= target.y);
        let d = f.remaining();
        assert!(d <= last);
        last = d;
    }
    assert!(f.is_settled(1e-3));
}

#[test]
fn repeated_identical_target_is_idempotent_at_rest() {
    let mut f = Follower::new(Vec3::new(1.0, 2.0, 3.0), 0.5);
    for _ in 0..10 {
        assert_eq!(f.step_toward(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }
}

#[test]
fn gain_is_clamped_into_unit_interval() {
    assert_eq!(Follower::new(0.0_f32, 3.0).gain(), 1.0);
    assert!(Follower::new(0.0_f32, -1.0).gain() > 0.0);
    assert!(Follower::new(0.0_f32, f32::NAN).gain() > 0.0);

    let mut unit = Follower::new(0.0_f32, 1.0);
    assert_eq!(unit.step_toward(5.0), 5.0);
}

#[test]
fn snap_jumps_current_and_target() {
    let mut f = Follower::new(0.0_f32, 0.1);
    f.set_target(8.0);
    f.snap(3.0);
    assert_eq!(f.current(), 3.0);
    assert_eq!(f.target(), 3.0);
    assert_eq!(f.remaining(), 0.0);
}

#[test]
fn clamp_symmetric_limits_both_sides() {
    assert_eq!(clamp_symmetric(30.0, 18.0), 18.0);
    assert_eq!(clamp_symmetric(-30.0, 18.0), -18.0);
    assert_eq!(clamp_symmetric(4.0, 18.0), 4.0);
}
