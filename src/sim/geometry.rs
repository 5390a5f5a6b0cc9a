//! Geometry kernel: robot hulls, SAT overlap and ray casting
//!
//! Robots collide as oriented rectangles stretched forward by their blade.
//! All polygons here are convex quads given in winding order.

use glam::Vec2;

use super::state::RobotState;
use crate::config::RobotConfig;
use crate::consts::RAY_PARALLEL_EPSILON;
use crate::rotate_local;

/// Collision hull corners: front-left, front-right, rear-right, rear-left
pub type Hull = [Vec2; 4];

/// Result of a separating-axis test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatResult {
    /// Whether the two polygons overlap on every axis
    pub colliding: bool,
    /// Smallest positive overlap across all axes (0 when not colliding)
    pub overlap: f32,
    /// Unit axis of the smallest overlap (zero when not colliding)
    pub axis: Vec2,
}

impl SatResult {
    pub fn miss() -> Self {
        Self {
            colliding: false,
            overlap: 0.0,
            axis: Vec2::ZERO,
        }
    }
}

/// World-space hull of a robot
pub fn robot_corners(config: &RobotConfig, state: &RobotState) -> Hull {
    let hw = config.width / 2.0;
    let hl = config.length / 2.0;
    let front = -hl - config.blade_overhang;
    let origin = state.position();

    [
        Vec2::new(-hw, front),
        Vec2::new(hw, front),
        Vec2::new(hw, hl),
        Vec2::new(-hw, hl),
    ]
    .map(|local| rotate_local(origin, local, state.rotation))
}

/// Unit edge normals of a polygon, skipping zero-length edges
fn edge_normals(poly: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = poly.len();
    (0..n).filter_map(move |i| {
        let edge = poly[(i + 1) % n] - poly[i];
        let len = edge.length();
        (len > 0.0).then(|| Vec2::new(-edge.y / len, edge.x / len))
    })
}

/// Project a polygon onto an axis, returning (min, max)
fn project(poly: &[Vec2], axis: Vec2) -> (f32, f32) {
    poly.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), p| {
        let d = p.dot(axis);
        (min.min(d), max.max(d))
    })
}

/// Separating Axis Theorem test between two convex quads.
///
/// Any axis with non-positive overlap separates the shapes. Otherwise the
/// minimum overlap and its axis are reported.
pub fn sat_collision(a: &Hull, b: &Hull) -> SatResult {
    let mut min_overlap = f32::INFINITY;
    let mut min_axis = Vec2::ZERO;

    for axis in edge_normals(a).chain(edge_normals(b)) {
        let (min_a, max_a) = project(a, axis);
        let (min_b, max_b) = project(b, axis);
        let overlap = (max_a - min_b).min(max_b - min_a);
        if overlap <= 0.0 {
            return SatResult::miss();
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            min_axis = axis;
        }
    }

    if !min_overlap.is_finite() {
        // Every edge was degenerate
        return SatResult::miss();
    }

    SatResult {
        colliding: true,
        overlap: min_overlap,
        axis: min_axis,
    }
}

/// Distance along a ray to the nearest polygon edge.
///
/// Returns `max_range` when nothing is hit, so detection must be checked with
/// a strict `distance < range`.
pub fn ray_polygon_distance(origin: Vec2, dir: Vec2, max_range: f32, poly: &[Vec2]) -> f32 {
    let n = poly.len();
    let mut closest = max_range;

    for i in 0..n {
        let p1 = poly[i];
        let edge = poly[(i + 1) % n] - p1;
        let denom = dir.perp_dot(edge);
        if denom.abs() < RAY_PARALLEL_EPSILON {
            continue;
        }

        let to_edge = p1 - origin;
        let t = to_edge.perp_dot(edge) / denom;
        let u = to_edge.perp_dot(dir) / denom;

        if t >= 0.0 && t < closest && (0.0..=1.0).contains(&u) {
            closest = t;
        }
    }

    closest
}
