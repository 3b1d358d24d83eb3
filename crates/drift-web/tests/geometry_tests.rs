// Host-side tests for the renderer's line geometry.
// The web crate is wasm-only, so the pure module is included directly.

#![allow(dead_code)]
mod geometry {
    include!("../src/render/geometry.rs");
}

use geometry::*;

#[test]
fn icosahedron_has_thirty_edges() {
    let edges = icosphere_edges(1.0, 0);
    assert_eq!(edges.len(), 30);
}

#[test]
fn subdivided_icosphere_edge_count_matches_euler() {
    // n segments per base edge: E = 30 n^2
    for detail in 1..4u32 {
        let n = (detail + 1) as usize;
        assert_eq!(icosphere_edges(3.2, detail).len(), 30 * n * n, "detail {}", detail);
    }
}

#[test]
fn icosphere_vertices_lie_on_radius() {
    for [a, b] in icosphere_edges(3.2, 2) {
        assert!((a.length() - 3.2).abs() < 1e-4);
        assert!((b.length() - 3.2).abs() < 1e-4);
        assert!(a.distance(b) > 0.1);
    }
}

#[test]
fn torus_knot_is_closed() {
    let knot = torus_knot(6.5, 2, 3, 220);
    assert_eq!(knot.len(), 221);
    let first = knot[0];
    let last = knot[knot.len() - 1];
    assert!(first.distance(last) < 1e-3);
    // u = 0 sits on the outer ring at 1.5 * radius.
    assert!((first - glam::Vec3::new(9.75, 0.0, 0.0)).length() < 1e-4);
}

#[test]
fn torus_knot_stays_within_its_envelope() {
    let radius = 6.5;
    for p in torus_knot(radius, 2, 3, 220) {
        let planar = (p.x * p.x + p.y * p.y).sqrt();
        assert!(planar >= radius * 0.5 - 1e-3 && planar <= radius * 1.5 + 1e-3);
        assert!(p.z.abs() <= radius * 0.5 + 1e-3);
    }
}

#[test]
fn torus_knot_clamps_segment_count() {
    assert_eq!(torus_knot(1.0, 2, 3, 0).len(), 4);
}
