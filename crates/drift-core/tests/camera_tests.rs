// Host-side tests for camera, ray and plane math.

use drift_core::{rotation_matrix, Bounds, Camera, Plane, Ray};
use glam::{Vec2, Vec3};

#[test]
fn center_ray_points_at_the_target() {
    let cam = Camera::default();
    let ray = cam.ray_from_ndc(Vec2::ZERO);
    let forward = (cam.target - cam.eye).normalize();
    assert_eq!(ray.origin, cam.eye);
    assert!(ray.direction.abs_diff_eq(forward, 1e-4));
}

#[test]
fn right_edge_ray_leans_right() {
    let cam = Camera::default();
    let ray = cam.ray_from_ndc(Vec2::new(1.0, 0.0));
    assert!(ray.direction.x > 0.0);
    let half_fov_x = ((cam.fovy_radians * 0.5).tan() * cam.aspect).atan();
    let forward = (cam.target - cam.eye).normalize();
    let angle = ray.direction.angle_between(forward);
    assert!((angle - half_fov_x).abs() < 1e-3);
}

#[test]
fn viewport_updates_aspect_but_ignores_degenerate_sizes() {
    let mut cam = Camera::default();
    cam.set_viewport(1600.0, 800.0);
    assert_eq!(cam.aspect, 2.0);
    cam.set_viewport(0.0, 800.0);
    cam.set_viewport(1600.0, -1.0);
    assert_eq!(cam.aspect, 2.0);
}

#[test]
fn billboard_axes_are_orthonormal() {
    let cam = Camera::default();
    let (right, up) = cam.billboard_axes();
    assert!((right.length() - 1.0).abs() < 1e-5);
    assert!((up.length() - 1.0).abs() < 1e-5);
    assert!(right.dot(up).abs() < 1e-5);
    assert!(right.x > 0.9);
}

#[test]
fn ray_hits_plane_in_front() {
    let plane = Plane::new(Vec3::Z, -2.0);
    let ray = Ray {
        origin: Vec3::new(1.0, 1.0, 10.0),
        direction: Vec3::NEG_Z,
    };
    assert_eq!(ray.intersect_plane(&plane), Some(Vec3::new(1.0, 1.0, 2.0)));
}

#[test]
fn plane_behind_the_ray_is_missed() {
    let plane = Plane::new(Vec3::Z, -2.0);
    let ray = Ray {
        origin: Vec3::new(0.0, 0.0, 10.0),
        direction: Vec3::Z,
    };
    assert_eq!(ray.intersect_plane(&plane), None);
}

#[test]
fn parallel_rays_hit_only_when_lying_in_the_plane() {
    let plane = Plane::new(Vec3::Z, -2.0);
    let inside = Ray {
        origin: Vec3::new(0.0, 0.0, 2.0),
        direction: Vec3::X,
    };
    let above = Ray {
        origin: Vec3::new(0.0, 0.0, 3.0),
        direction: Vec3::X,
    };
    assert_eq!(inside.intersect_plane(&plane), Some(inside.origin));
    assert_eq!(above.intersect_plane(&plane), None);
}

#[test]
fn plane_normal_is_normalized() {
    let plane = Plane::new(Vec3::new(0.0, 0.0, 5.0), -2.0);
    assert_eq!(plane.normal, Vec3::Z);
    assert_eq!(plane.distance_to(Vec3::new(0.0, 0.0, 2.0)), 0.0);
}

#[test]
fn bounds_order_and_clamp() {
    let b = Bounds::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(-1.0, -1.0, -1.0));
    assert_eq!(b.min, Vec3::splat(-1.0));
    assert_eq!(b.clamp(Vec3::new(5.0, -5.0, 0.5)), Vec3::new(1.0, -1.0, 0.5));
    assert!(b.contains(Vec3::ZERO));
    assert!(!b.contains(Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn rotation_matrix_of_zero_is_identity() {
    assert_eq!(rotation_matrix(Vec3::ZERO), glam::Mat4::IDENTITY);
}
