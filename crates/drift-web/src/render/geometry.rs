// Line geometry for the orb wireframe and the flow knot, in object space.

use fnv::FnvHashSet;
use glam::Vec3;

const ICO_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn ico_vertices() -> [Vec3; 12] {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
}

// Grid point on the base solid as integer weights over its 12 vertices.
// Points shared between faces get the same key whatever face produced them.
type PointKey = [u32; 12];

/// Unique edges of an icosphere: each base face split `detail + 1` ways per side.
pub fn icosphere_edges(radius: f32, detail: u32) -> Vec<[Vec3; 2]> {
    let base = ico_vertices();
    let n = detail + 1;
    let point = |weights: [(usize, u32); 3]| -> (PointKey, Vec3) {
        let mut key = [0u32; 12];
        let mut p = Vec3::ZERO;
        for (index, weight) in weights {
            key[index] += weight;
            p += base[index] * weight as f32;
        }
        (key, (p / n as f32).normalize() * radius)
    };

    let mut seen: FnvHashSet<(PointKey, PointKey)> = FnvHashSet::default();
    let mut edges = Vec::new();
    let mut push = |(ka, a): (PointKey, Vec3), (kb, b): (PointKey, Vec3)| {
        let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
        if seen.insert(key) {
            edges.push([a, b]);
        }
    };
    for face in ICO_FACES.iter() {
        // i steps toward the second vertex, j toward the third.
        let at = |i: u32, j: u32| point([(face[0], n - i - j), (face[1], i), (face[2], j)]);
        for i in 0..n {
            for j in 0..(n - i) {
                let p0 = at(i, j);
                let p1 = at(i + 1, j);
                let p2 = at(i, j + 1);
                push(p0, p1);
                push(p1, p2);
                push(p2, p0);
            }
        }
    }
    edges
}

/// Centerline of a (p, q) torus knot as a closed polyline.
pub fn torus_knot(radius: f32, p: u32, q: u32, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(3);
    let turns = p as f32 * std::f32::consts::TAU;
    (0..=segments)
        .map(|i| {
            let u = i as f32 / segments as f32 * turns;
            let qu = q as f32 / p as f32 * u;
            let ring = radius * (2.0 + qu.cos()) * 0.5;
            Vec3::new(ring * u.cos(), ring * u.sin(), radius * qu.sin() * 0.5)
        })
        .collect()
}
