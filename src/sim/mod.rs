//! Deterministic simulation module
//!
//! The match engine lives here. This module must be pure and deterministic:
//! - Fixed tick only, no timers
//! - No I/O or platform dependencies
//! - State in, state out (`step_simulation`)

pub mod controller;
pub mod geometry;
pub mod kinematics;
pub mod sensors;
pub mod state;
pub mod tick;

pub use controller::{LineEscape, WheelCommand, bearing_to, player_command, seek_command};
pub use geometry::{Hull, SatResult, ray_polygon_distance, robot_corners, sat_collision};
pub use kinematics::{Pose, differential_drive};
pub use sensors::{Ray, SensorFrame, is_on_white_border, line_sensor_world_pos, proximity_ray, sense};
pub use state::{
    RobotState, SensorReading, SensorReadings, SimState, SimStatus, Winner, create_initial_sim_state,
};
pub use tick::{judge, resolve_collision, step_simulation};
