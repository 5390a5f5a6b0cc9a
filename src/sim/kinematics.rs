//! Differential-drive kinematics
//!
//! Wheel speeds are arena units per tick. Equal speeds drive straight along
//! the heading; unequal speeds swing the robot around the instantaneous
//! center of curvature (ICC) between the wheels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_WHEEL_BASE, STRAIGHT_EPSILON};
use crate::heading_vector;

/// Position and heading after one integration step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    /// Degrees, clockwise-positive
    pub rotation: f32,
}

/// Integrate one tick of differential drive.
///
/// `wheel_base` below [`MIN_WHEEL_BASE`] has no defined turning radius and
/// falls back to straight-line motion at the mean wheel speed.
pub fn differential_drive(pose: Pose, left: f32, right: f32, wheel_base: f32) -> Pose {
    if (left - right).abs() < STRAIGHT_EPSILON || wheel_base < MIN_WHEEL_BASE {
        let distance = (left + right) / 2.0;
        return Pose {
            position: pose.position + heading_vector(pose.rotation) * distance,
            rotation: pose.rotation,
        };
    }

    let (sin, cos) = pose.rotation.to_radians().sin_cos();
    let radius = (wheel_base / 2.0) * (left + right) / (right - left);
    let omega = (right - left) / wheel_base;

    let icc = pose.position - Vec2::new(cos, sin) * radius;
    let arm = pose.position - icc;
    let position = icc + Vec2::from_angle(omega).rotate(arm);

    Pose {
        position,
        rotation: pose.rotation + omega.to_degrees(),
    }
}
