//! Robot configuration
//!
//! Static shape, sensor and wheel description of one robot. Owned and edited
//! by the configuration layer; the simulation reads a snapshot every tick.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of proximity sensors a robot can carry
pub const MAX_PROXIMITY_SENSORS: usize = 4;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Proximity sensor mounting slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensorSlot {
    FrontLeft,
    FrontRight,
    Left,
    Right,
}

impl SensorSlot {
    pub const ALL: [SensorSlot; 4] = [
        SensorSlot::FrontLeft,
        SensorSlot::FrontRight,
        SensorSlot::Left,
        SensorSlot::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorSlot::FrontLeft => "front-left",
            SensorSlot::FrontRight => "front-right",
            SensorSlot::Left => "left",
            SensorSlot::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "front-left" => Some(SensorSlot::FrontLeft),
            "front-right" => Some(SensorSlot::FrontRight),
            "left" => Some(SensorSlot::Left),
            "right" => Some(SensorSlot::Right),
            _ => None,
        }
    }

    /// Anchor point of the slot on the un-rotated hull (robot-local, -y forward)
    pub fn anchor(&self, width: f32, length: f32, blade_overhang: f32) -> Vec2 {
        let hw = width / 2.0;
        let front = -length / 2.0 - blade_overhang;
        match self {
            SensorSlot::FrontLeft => Vec2::new(-hw, front),
            SensorSlot::FrontRight => Vec2::new(hw, front),
            SensorSlot::Left => Vec2::new(-hw, 0.0),
            SensorSlot::Right => Vec2::new(hw, 0.0),
        }
    }
}

/// Line sensor mounting slot (underside of the robot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineSensorSlot {
    BottomFrontLeft,
    BottomFrontRight,
    BottomRearLeft,
    BottomRearRight,
}

impl LineSensorSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineSensorSlot::BottomFrontLeft => "bottom-front-left",
            LineSensorSlot::BottomFrontRight => "bottom-front-right",
            LineSensorSlot::BottomRearLeft => "bottom-rear-left",
            LineSensorSlot::BottomRearRight => "bottom-rear-right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bottom-front-left" => Some(LineSensorSlot::BottomFrontLeft),
            "bottom-front-right" => Some(LineSensorSlot::BottomFrontRight),
            "bottom-rear-left" => Some(LineSensorSlot::BottomRearLeft),
            "bottom-rear-right" => Some(LineSensorSlot::BottomRearRight),
            _ => None,
        }
    }
}

/// Ranged opponent detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximitySensor {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub position: SensorSlot,
    /// Detection range (arena units)
    pub range: f32,
    pub enabled: bool,
    /// Degrees from forward (negative = left, positive = right)
    #[serde(default)]
    pub angle: f32,
    /// Offset from the slot anchor (arena units)
    #[serde(default)]
    pub offset_x: f32,
    /// Offset from the slot anchor (arena units, negative = forward)
    #[serde(default)]
    pub offset_y: f32,
}

impl ProximitySensor {
    /// Robot-local ray origin: slot anchor plus configured offset
    pub fn local_origin(&self, config: &RobotConfig) -> Vec2 {
        self.position
            .anchor(config.width, config.length, config.blade_overhang)
            + Vec2::new(self.offset_x, self.offset_y)
    }
}

/// Downward-facing border detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSensor {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub position: LineSensorSlot,
    pub enabled: bool,
    /// Offset from robot center (arena units)
    pub offset_x: f32,
    /// Offset from robot center (arena units, negative = forward)
    pub offset_y: f32,
}

impl LineSensor {
    /// Front-mounted sensors sit ahead of the center (negative y)
    #[inline]
    pub fn is_front_mounted(&self) -> bool {
        self.offset_y < 0.0
    }
}

/// One drive wheel. Offsets only affect wheel base and visualization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelConfig {
    pub offset_x: f32,
    /// Positive = toward the rear
    pub offset_y: f32,
    pub radius: f32,
    pub width: f32,
}

/// Full static description of a robot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotConfig {
    pub name: String,
    pub width: f32,
    pub length: f32,
    /// Grams
    pub mass: f32,
    /// Front ramp steepness in degrees (0 = flat)
    pub wedge_angle: f32,
    /// Forward extension of the hull past the body
    pub blade_overhang: f32,
    /// Presentation only
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub proximity_sensors: Vec<ProximitySensor>,
    #[serde(default)]
    pub line_sensors: Vec<LineSensor>,
    pub left_wheel: WheelConfig,
    pub right_wheel: WheelConfig,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::default_robot("Robot", "#3b82f6", "r")
    }
}

impl RobotConfig {
    /// Factory robot: 30x30 body, 500 g, four proximity and four line sensors.
    /// Sensor ids are prefixed with `prefix` so two robots never share ids.
    pub fn default_robot(name: &str, color: &str, prefix: &str) -> Self {
        let prox = |suffix: &str, label: &str, position: SensorSlot, range: f32, angle: f32| {
            ProximitySensor {
                id: format!("{prefix}-{suffix}"),
                label: label.to_string(),
                position,
                range,
                enabled: true,
                angle,
                offset_x: 0.0,
                offset_y: 0.0,
            }
        };
        let line = |suffix: &str, label: &str, position: LineSensorSlot, offset_x: f32, offset_y: f32| {
            LineSensor {
                id: format!("{prefix}-{suffix}"),
                label: label.to_string(),
                position,
                enabled: true,
                offset_x,
                offset_y,
            }
        };

        Self {
            name: name.to_string(),
            width: 30.0,
            length: 30.0,
            mass: 500.0,
            wedge_angle: 15.0,
            blade_overhang: 5.0,
            color: color.to_string(),
            proximity_sensors: vec![
                prox("pfl", "Front Left", SensorSlot::FrontLeft, 50.0, 0.0),
                prox("pfr", "Front Right", SensorSlot::FrontRight, 50.0, 0.0),
                prox("sl", "Side Left", SensorSlot::Left, 30.0, -90.0),
                prox("sr", "Side Right", SensorSlot::Right, 30.0, 90.0),
            ],
            line_sensors: vec![
                line("lfl", "Line Front Left", LineSensorSlot::BottomFrontLeft, -10.0, -14.0),
                line("lfr", "Line Front Right", LineSensorSlot::BottomFrontRight, 10.0, -14.0),
                line("lrl", "Line Rear Left", LineSensorSlot::BottomRearLeft, -10.0, 14.0),
                line("lrr", "Line Rear Right", LineSensorSlot::BottomRearRight, 10.0, 14.0),
            ],
            left_wheel: WheelConfig {
                offset_x: -13.0,
                offset_y: 10.0,
                radius: 4.0,
                width: 3.0,
            },
            right_wheel: WheelConfig {
                offset_x: 13.0,
                offset_y: 10.0,
                radius: 4.0,
                width: 3.0,
            },
        }
    }

    /// Factory opponent (red, `op` sensor prefix)
    pub fn default_opponent() -> Self {
        Self::default_robot("Opponent", "#ef4444", "op")
    }

    /// Same robot with every sensor switched off
    pub fn without_sensors(mut self) -> Self {
        for s in &mut self.proximity_sensors {
            s.enabled = false;
        }
        for s in &mut self.line_sensors {
            s.enabled = false;
        }
        self
    }

    /// Distance between the two wheel mounts along x
    #[inline]
    pub fn wheel_base(&self) -> f32 {
        (self.right_wheel.offset_x - self.left_wheel.offset_x).abs()
    }

    /// Ids of all enabled sensors, proximity first
    pub fn enabled_sensor_ids(&self) -> Vec<&str> {
        self.proximity_sensors
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.id.as_str())
            .chain(
                self.line_sensors
                    .iter()
                    .filter(|s| s.enabled)
                    .map(|s| s.id.as_str()),
            )
            .collect()
    }

    /// Edit a proximity sensor in place. Returns false if no sensor has `id`.
    pub fn update_proximity_sensor<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut ProximitySensor),
    {
        match self.proximity_sensors.iter_mut().find(|s| s.id == id) {
            Some(sensor) => {
                edit(sensor);
                true
            }
            None => false,
        }
    }

    /// Edit a line sensor in place. Returns false if no sensor has `id`.
    pub fn update_line_sensor<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut LineSensor),
    {
        match self.line_sensors.iter_mut().find(|s| s.id == id) {
            Some(sensor) => {
                edit(sensor);
                true
            }
            None => false,
        }
    }

    /// Check physical and sensor constraints.
    ///
    /// The simulation never calls this; it is for loaders and editors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("length", self.length),
            ("mass", self.mass),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }
        if !self.blade_overhang.is_finite() || self.blade_overhang < 0.0 {
            return Err(ConfigError::invalid(
                "bladeOverhang",
                format!("must be non-negative, got {}", self.blade_overhang),
            ));
        }
        if !self.wedge_angle.is_finite() {
            return Err(ConfigError::invalid("wedgeAngle", "must be finite"));
        }
        if self.proximity_sensors.len() > MAX_PROXIMITY_SENSORS {
            return Err(ConfigError::invalid(
                "proximitySensors",
                format!(
                    "at most {MAX_PROXIMITY_SENSORS} allowed, got {}",
                    self.proximity_sensors.len()
                ),
            ));
        }
        for s in &self.proximity_sensors {
            if !s.range.is_finite() || s.range <= 0.0 {
                return Err(ConfigError::invalid(
                    format!("proximitySensors[{}].range", s.id),
                    format!("must be positive, got {}", s.range),
                ));
            }
        }

        let mut seen = std::collections::HashSet::new();
        let ids = self
            .proximity_sensors
            .iter()
            .map(|s| &s.id)
            .chain(self.line_sensors.iter().map(|s| &s.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(ConfigError::invalid("sensors", format!("duplicate sensor id `{id}`")));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        config.validate()?;
        log::info!("Loaded robot config `{}` from {}", config.name, path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Robot config `{}` saved to {}", self.name, path.display());
        Ok(())
    }
}
