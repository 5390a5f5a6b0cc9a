//! Match state and lifecycle
//!
//! `SimState` is the single aggregate threaded through successive ticks. The
//! owning layer holds the canonical copy; the engine only maps old to new.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::kinematics::Pose;
use crate::consts::{OPPONENT_START, ROBOT_START};

/// Match lifecycle: idle -> running <-> paused -> finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

/// Match outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Robot,
    Opponent,
    Draw,
}

/// Last-tick value of one sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorReading {
    /// Proximity ray distance (equals the sensor range when nothing is seen)
    Distance(f32),
    /// Line sensor is over the white border
    Line(bool),
}

impl SensorReading {
    pub fn distance(&self) -> Option<f32> {
        match self {
            SensorReading::Distance(d) => Some(*d),
            SensorReading::Line(_) => None,
        }
    }

    pub fn triggered(&self) -> Option<bool> {
        match self {
            SensorReading::Line(on) => Some(*on),
            SensorReading::Distance(_) => None,
        }
    }
}

/// Sensor id -> reading, ordered for stable output
pub type SensorReadings = BTreeMap<String, SensorReading>;

/// Dynamic state of one robot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotState {
    pub x: f32,
    pub y: f32,
    /// Degrees; 0 faces negative y, clockwise-positive
    pub rotation: f32,
    // Carried for API completeness; motion derives from wheel speeds each tick
    pub vx: f32,
    pub vy: f32,
    pub angular_velocity: f32,
    /// Arena units per tick
    pub left_wheel_speed: f32,
    pub right_wheel_speed: f32,
}

impl RobotState {
    pub fn new(x: f32, y: f32, rotation: f32) -> Self {
        Self {
            x,
            y,
            rotation,
            ..Default::default()
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position(),
            rotation: self.rotation,
        }
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.x = pose.position.x;
        self.y = pose.position.y;
        self.rotation = pose.rotation;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Distance from the arena center
    #[inline]
    pub fn distance_from_center(&self) -> f32 {
        self.position().length()
    }
}

/// Complete match state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimState {
    pub status: SimStatus,
    pub robot: RobotState,
    pub opponent: RobotState,
    /// Milliseconds of simulated time
    pub elapsed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub robot_sensor_readings: SensorReadings,
    #[serde(default)]
    pub opponent_sensor_readings: SensorReadings,
}

impl Default for SimState {
    fn default() -> Self {
        create_initial_sim_state()
    }
}

/// Fresh idle match with both robots at their start marks
pub fn create_initial_sim_state() -> SimState {
    let (rx, ry, rr) = ROBOT_START;
    let (ox, oy, or) = OPPONENT_START;
    SimState {
        status: SimStatus::Idle,
        robot: RobotState::new(rx, ry, rr),
        opponent: RobotState::new(ox, oy, or),
        elapsed: 0,
        winner: None,
        robot_sensor_readings: SensorReadings::new(),
        opponent_sensor_readings: SensorReadings::new(),
    }
}

impl SimState {
    /// Begin or resume the match. Only valid from idle or paused.
    pub fn start(&mut self) -> bool {
        match self.status {
            SimStatus::Idle | SimStatus::Paused => {
                self.status = SimStatus::Running;
                true
            }
            SimStatus::Running | SimStatus::Finished => {
                log::debug!("Ignoring start while {:?}", self.status);
                false
            }
        }
    }

    /// Suspend a running match
    pub fn pause(&mut self) -> bool {
        if self.status == SimStatus::Running {
            self.status = SimStatus::Paused;
            true
        } else {
            log::debug!("Ignoring pause while {:?}", self.status);
            false
        }
    }

    /// Discard the match and return to the idle start position
    pub fn reset(&mut self) {
        *self = create_initial_sim_state();
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == SimStatus::Running
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status == SimStatus::Finished
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.elapsed / crate::consts::TICK_MS
    }
}
