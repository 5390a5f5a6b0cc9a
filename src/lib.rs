//! Sumo Sim - a deterministic mini-sumo robot simulation
//!
//! Core modules:
//! - `sim`: Pure simulation engine (geometry, kinematics, sensors, controller, judge)
//! - `config`: Robot shape, sensor and wheel configuration
//! - `harness`: Fixed-tick match driver that owns the canonical state

pub mod config;
pub mod harness;
pub mod sim;

pub use config::{ConfigError, LineSensor, LineSensorSlot, ProximitySensor, RobotConfig, SensorSlot, WheelConfig};
pub use harness::{MatchDriver, MatchReport, SeriesSummary, run_series};

use glam::Vec2;

/// Arena and tuning constants
pub mod consts {
    /// Fixed simulation tick length in milliseconds
    pub const TICK_MS: u64 = 16;

    /// Dohyo (arena) dimensions, in arena units
    pub const DOHYO_DIAMETER: f32 = 154.0;
    pub const DOHYO_RADIUS: f32 = DOHYO_DIAMETER / 2.0;
    /// Width of the white border ring at the arena edge
    pub const BORDER_WIDTH: f32 = 4.0;
    /// A robot whose center is further than `DOHYO_RADIUS - RING_OUT_MARGIN` is out
    pub const RING_OUT_MARGIN: f32 = 2.0;

    /// Full forward wheel speed (arena units per tick)
    pub const BASE_SPEED: f32 = 0.8;
    /// Fraction of SAT overlap converted into separation per tick
    pub const PUSH_FORCE: f32 = 0.4;
    /// Extra push fraction for the robot with the steeper wedge
    pub const WEDGE_BONUS: f32 = 0.15;

    /// Wheel speed difference below which motion is treated as a straight line
    pub const STRAIGHT_EPSILON: f32 = 0.001;
    /// Wheel base below which turning is undefined and motion is straight
    pub const MIN_WHEEL_BASE: f32 = 1e-6;
    /// Ray/edge cross product below which the two are treated as parallel
    pub const RAY_PARALLEL_EPSILON: f32 = 1e-10;

    /// Starting placements (x, y, rotation in degrees)
    pub const ROBOT_START: (f32, f32, f32) = (0.0, 40.0, 0.0);
    pub const OPPONENT_START: (f32, f32, f32) = (0.0, -40.0, 180.0);
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Unit forward vector for a heading in degrees.
///
/// 0° faces "up" on screen (negative y) and angles grow clockwise.
#[inline]
pub fn heading_vector(rotation_deg: f32) -> Vec2 {
    let rad = rotation_deg.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}

/// Rotate a robot-local offset by a heading (degrees) and translate it to `origin`
#[inline]
pub fn rotate_local(origin: Vec2, local: Vec2, rotation_deg: f32) -> Vec2 {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    Vec2::new(
        origin.x + local.x * cos - local.y * sin,
        origin.y + local.x * sin + local.y * cos,
    )
}
