//! Sensor model: proximity rays and border line sensors

use glam::Vec2;

use super::geometry::{Hull, ray_polygon_distance};
use super::state::{RobotState, SensorReading, SensorReadings};
use crate::config::{LineSensor, ProximitySensor, RobotConfig};
use crate::consts::{BORDER_WIDTH, DOHYO_RADIUS};
use crate::{heading_vector, rotate_local};

/// A world-space sensor ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    /// Unit direction
    pub dir: Vec2,
}

/// World ray of a proximity sensor mounted on a robot
pub fn proximity_ray(config: &RobotConfig, state: &RobotState, sensor: &ProximitySensor) -> Ray {
    Ray {
        origin: rotate_local(state.position(), sensor.local_origin(config), state.rotation),
        dir: heading_vector(state.rotation + sensor.angle),
    }
}

/// Raw ray distance to the target hull. Not clamped to a detection decision:
/// a value equal to `sensor.range` means nothing was seen.
pub fn proximity_distance(
    config: &RobotConfig,
    state: &RobotState,
    sensor: &ProximitySensor,
    target: &Hull,
) -> f32 {
    let ray = proximity_ray(config, state, sensor);
    ray_polygon_distance(ray.origin, ray.dir, sensor.range, target)
}

/// World position of a line sensor (offsets are relative to robot center)
pub fn line_sensor_world_pos(state: &RobotState, sensor: &LineSensor) -> Vec2 {
    rotate_local(
        state.position(),
        Vec2::new(sensor.offset_x, sensor.offset_y),
        state.rotation,
    )
}

/// Whether a point lies on the white border band or beyond
#[inline]
pub fn is_on_white_border(point: Vec2) -> bool {
    point.length() >= DOHYO_RADIUS - BORDER_WIDTH
}

/// One enabled proximity sensor and its distance this tick
#[derive(Debug, Clone, Copy)]
pub struct ProximityHit<'a> {
    pub sensor: &'a ProximitySensor,
    pub distance: f32,
}

impl ProximityHit<'_> {
    /// Strictly inside range
    #[inline]
    pub fn detected(&self) -> bool {
        self.distance < self.sensor.range
    }
}

/// One enabled line sensor and its state this tick
#[derive(Debug, Clone, Copy)]
pub struct LineHit<'a> {
    pub sensor: &'a LineSensor,
    pub triggered: bool,
}

/// Everything a robot sensed this tick, in configuration order
#[derive(Debug, Clone, Default)]
pub struct SensorFrame<'a> {
    pub proximity: Vec<ProximityHit<'a>>,
    pub line: Vec<LineHit<'a>>,
}

impl SensorFrame<'_> {
    /// Flatten into the id -> reading map kept on the state
    pub fn readings(&self) -> SensorReadings {
        let prox = self
            .proximity
            .iter()
            .map(|h| (h.sensor.id.clone(), SensorReading::Distance(h.distance)));
        let line = self
            .line
            .iter()
            .map(|h| (h.sensor.id.clone(), SensorReading::Line(h.triggered)));
        prox.chain(line).collect()
    }
}

/// Read every enabled sensor of a robot against the other robot's hull
pub fn sense<'a>(config: &'a RobotConfig, state: &RobotState, target: &Hull) -> SensorFrame<'a> {
    let proximity = config
        .proximity_sensors
        .iter()
        .filter(|s| s.enabled)
        .map(|sensor| ProximityHit {
            sensor,
            distance: proximity_distance(config, state, sensor, target),
        })
        .collect();

    let line = config
        .line_sensors
        .iter()
        .filter(|s| s.enabled)
        .map(|sensor| LineHit {
            sensor,
            triggered: is_on_white_border(line_sensor_world_pos(state, sensor)),
        })
        .collect();

    SensorFrame { proximity, line }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensorSlot;
    use crate::sim::geometry::robot_corners;

    #[test]
    fn test_front_left_ray_origin() {
        let cfg = RobotConfig::default();
        let state = RobotState::new(0.0, 40.0, 0.0);
        let ray = proximity_ray(&cfg, &state, &cfg.proximity_sensors[0]);
        assert!((ray.origin - Vec2::new(-15.0, 20.0)).length() < 1e-4);
        assert!((ray.dir - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_side_sensor_points_sideways() {
        let cfg = RobotConfig::default();
        let state = RobotState::new(0.0, 0.0, 0.0);
        // Left sensor is angled -90°: it looks toward negative x
        let ray = proximity_ray(&cfg, &state, &cfg.proximity_sensors[2]);
        assert!((ray.origin - Vec2::new(-15.0, 0.0)).length() < 1e-4);
        assert!((ray.dir - Vec2::new(-1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_sensor_offset_applied_before_rotation() {
        let mut cfg = RobotConfig::default();
        cfg.update_proximity_sensor("r-pfr", |s| {
            s.offset_x = -5.0;
            s.offset_y = 2.0;
        });
        let state = RobotState::new(0.0, 0.0, 90.0);
        let sensor = cfg
            .proximity_sensors
            .iter()
            .find(|s| s.position == SensorSlot::FrontRight)
            .unwrap();
        let ray = proximity_ray(&cfg, &state, sensor);
        // Local (10, -18) rotated 90° clockwise -> (18, 10)
        assert!((ray.origin - Vec2::new(18.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn test_distance_to_opponent_ahead() {
        let cfg = RobotConfig::default();
        let robot = RobotState::new(0.0, 40.0, 0.0);
        let opponent = RobotState::new(-5.0, -10.0, 180.0);
        let hull = robot_corners(&cfg, &opponent);
        // Opponent blade reaches y = 10; sensor sits at y = 20, x = -15
        let d = proximity_distance(&cfg, &robot, &cfg.proximity_sensors[0], &hull);
        assert!((d - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_detection_reports_range() {
        let cfg = RobotConfig::default();
        let robot = RobotState::new(0.0, 40.0, 0.0);
        // Opponent well off to the side of the forward ray
        let opponent = RobotState::new(45.0, -40.0, 180.0);
        let hull = robot_corners(&cfg, &opponent);
        let frame = sense(&cfg, &robot, &hull);
        let pfl = frame.proximity[0];
        assert_eq!(pfl.distance, 50.0);
        assert!(!pfl.detected());
    }

    #[test]
    fn test_line_sensor_border() {
        let cfg = RobotConfig::default();
        assert!(!is_on_white_border(Vec2::new(72.9, 0.0)));
        assert!(is_on_white_border(Vec2::new(73.0, 0.0)));
        assert!(is_on_white_border(Vec2::new(0.0, -80.0)));

        // Robot facing up near the top edge: front sensors hit the border first
        let state = RobotState::new(0.0, -60.0, 0.0);
        let frame = sense(&cfg, &state, &[Vec2::ZERO; 4]);
        let triggered: Vec<_> = frame.line.iter().map(|h| h.triggered).collect();
        assert_eq!(triggered, vec![true, true, false, false]);
    }

    #[test]
    fn test_disabled_sensors_produce_no_readings() {
        let mut cfg = RobotConfig::default();
        cfg.update_proximity_sensor("r-sl", |s| s.enabled = false);
        cfg.update_line_sensor("r-lfl", |s| s.enabled = false);
        let state = RobotState::new(0.0, 0.0, 0.0);
        let readings = sense(&cfg, &state, &[Vec2::ZERO; 4]).readings();
        assert_eq!(readings.len(), 6);
        assert!(!readings.contains_key("r-sl"));
        assert!(!readings.contains_key("r-lfl"));
        assert!(matches!(readings["r-pfl"], SensorReading::Distance(_)));
        assert!(matches!(readings["r-lrr"], SensorReading::Line(false)));
    }
}
