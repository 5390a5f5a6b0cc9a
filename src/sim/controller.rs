//! Reactive wheel controllers
//!
//! Fixed heuristics that turn one tick of sensor readings into wheel speeds.
//! The player robot reacts to its proximity sensors; the opponent seeks the
//! player by bearing. Both back away from the border on line triggers.

use glam::Vec2;

use super::sensors::{LineHit, ProximityHit, SensorFrame};
use crate::config::SensorSlot;
use crate::consts::BASE_SPEED;
use crate::normalize_degrees;

/// Bearing error (degrees) inside which the seeker drives straight
pub const SEEK_DEADBAND_DEG: f32 = 5.0;
/// Seeker cruise fraction of `BASE_SPEED`
pub const SEEK_CRUISE: f32 = 0.85;
/// Seeker inner-wheel fraction while turning
pub const SEEK_TURN_INNER: f32 = 0.3;
/// Front proximity detection slows the matching wheel to this fraction
pub const FRONT_DETECT_SCALE: f32 = 0.6;

/// Wheel speeds for one tick (arena units per tick)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelCommand {
    pub left: f32,
    pub right: f32,
}

impl WheelCommand {
    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Both wheels at the same fraction of `BASE_SPEED`
    pub const fn uniform(fraction: f32) -> Self {
        Self::new(BASE_SPEED * fraction, BASE_SPEED * fraction)
    }
}

/// Border escape speeds used when a line sensor fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEscape {
    /// Applied when a front-mounted sensor is on the border
    pub front: WheelCommand,
    /// Applied when a rear-mounted sensor is on the border
    pub rear: WheelCommand,
}

impl LineEscape {
    /// Player robot: full reverse with a swing, or full forward away from the edge
    pub const PLAYER: LineEscape = LineEscape {
        front: WheelCommand::new(-BASE_SPEED, -BASE_SPEED * 0.5),
        rear: WheelCommand::new(BASE_SPEED, BASE_SPEED * 0.5),
    };

    /// Seeker: same pattern at cruise speed
    pub const SEEKER: LineEscape = LineEscape {
        front: WheelCommand::new(-BASE_SPEED * SEEK_CRUISE, -BASE_SPEED * 0.5),
        rear: WheelCommand::new(BASE_SPEED * SEEK_CRUISE, BASE_SPEED * 0.5),
    };
}

/// Override `cmd` for every triggered line sensor, in order; the last one wins
pub fn apply_line_escape(mut cmd: WheelCommand, line: &[LineHit<'_>], escape: LineEscape) -> WheelCommand {
    for hit in line.iter().filter(|h| h.triggered) {
        cmd = if hit.sensor.is_front_mounted() {
            escape.front
        } else {
            escape.rear
        };
        log::trace!("Line sensor {} on border", hit.sensor.id);
    }
    cmd
}

/// Adjust full-forward speeds for each proximity sensor that sees the opponent
pub fn apply_proximity(mut cmd: WheelCommand, proximity: &[ProximityHit<'_>]) -> WheelCommand {
    for hit in proximity.iter().filter(|h| h.detected()) {
        match hit.sensor.position {
            SensorSlot::FrontLeft => cmd.left *= FRONT_DETECT_SCALE,
            SensorSlot::FrontRight => cmd.right *= FRONT_DETECT_SCALE,
            SensorSlot::Left => cmd = WheelCommand::new(-BASE_SPEED * 0.5, BASE_SPEED),
            SensorSlot::Right => cmd = WheelCommand::new(BASE_SPEED, -BASE_SPEED * 0.5),
        }
    }
    cmd
}

/// Player robot: charge forward, steer on proximity, escape the border
pub fn player_command(frame: &SensorFrame<'_>) -> WheelCommand {
    let cmd = apply_proximity(WheelCommand::uniform(1.0), &frame.proximity);
    apply_line_escape(cmd, &frame.line, LineEscape::PLAYER)
}

/// Heading (degrees) that points from `from` toward `to`
#[inline]
pub fn bearing_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.x.atan2(-d.y).to_degrees()
}

/// Opponent robot: turn toward the target by bearing, then escape the border.
/// Proximity readings are recorded by the caller but not used here.
pub fn seek_command(position: Vec2, rotation: f32, target: Vec2, frame: &SensorFrame<'_>) -> WheelCommand {
    let error = normalize_degrees(bearing_to(position, target) - rotation);

    let cmd = if error > SEEK_DEADBAND_DEG {
        WheelCommand::new(BASE_SPEED * SEEK_CRUISE, BASE_SPEED * SEEK_TURN_INNER)
    } else if error < -SEEK_DEADBAND_DEG {
        WheelCommand::new(BASE_SPEED * SEEK_TURN_INNER, BASE_SPEED * SEEK_CRUISE)
    } else {
        WheelCommand::uniform(SEEK_CRUISE)
    };

    apply_line_escape(cmd, &frame.line, LineEscape::SEEKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LineSensor, LineSensorSlot, ProximitySensor};

    fn prox(position: SensorSlot) -> ProximitySensor {
        ProximitySensor {
            id: position.as_str().to_string(),
            label: String::new(),
            position,
            range: 50.0,
            enabled: true,
            angle: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    fn line(id: &str, offset_y: f32) -> LineSensor {
        LineSensor {
            id: id.to_string(),
            label: String::new(),
            position: LineSensorSlot::BottomFrontLeft,
            enabled: true,
            offset_x: 0.0,
            offset_y,
        }
    }

    #[test]
    fn test_default_is_full_forward() {
        let frame = SensorFrame::default();
        assert_eq!(player_command(&frame), WheelCommand::new(BASE_SPEED, BASE_SPEED));
    }

    #[test]
    fn test_front_detection_scales_matching_wheel() {
        let fl = prox(SensorSlot::FrontLeft);
        let fr = prox(SensorSlot::FrontRight);
        let frame = SensorFrame {
            proximity: vec![ProximityHit { sensor: &fl, distance: 20.0 }],
            line: vec![],
        };
        let cmd = player_command(&frame);
        assert!((cmd.left - BASE_SPEED * 0.6).abs() < 1e-6);
        assert_eq!(cmd.right, BASE_SPEED);

        let frame = SensorFrame {
            proximity: vec![
                ProximityHit { sensor: &fl, distance: 20.0 },
                ProximityHit { sensor: &fr, distance: 20.0 },
            ],
            line: vec![],
        };
        let cmd = player_command(&frame);
        assert!((cmd.left - BASE_SPEED * 0.6).abs() < 1e-6);
        assert!((cmd.right - BASE_SPEED * 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_reading_at_range_is_not_detection() {
        let fl = prox(SensorSlot::FrontLeft);
        let frame = SensorFrame {
            proximity: vec![ProximityHit { sensor: &fl, distance: 50.0 }],
            line: vec![],
        };
        assert_eq!(player_command(&frame), WheelCommand::uniform(1.0));
    }

    #[test]
    fn test_side_detection_turns_sharply() {
        let left = prox(SensorSlot::Left);
        let right = prox(SensorSlot::Right);
        let frame = SensorFrame {
            proximity: vec![ProximityHit { sensor: &left, distance: 5.0 }],
            line: vec![],
        };
        assert_eq!(player_command(&frame), WheelCommand::new(-BASE_SPEED * 0.5, BASE_SPEED));

        // Later sensors override earlier ones
        let frame = SensorFrame {
            proximity: vec![
                ProximityHit { sensor: &left, distance: 5.0 },
                ProximityHit { sensor: &right, distance: 5.0 },
            ],
            line: vec![],
        };
        assert_eq!(player_command(&frame), WheelCommand::new(BASE_SPEED, -BASE_SPEED * 0.5));
    }

    #[test]
    fn test_line_override_beats_proximity() {
        let left = prox(SensorSlot::Left);
        let front = line("lf", -14.0);
        let frame = SensorFrame {
            proximity: vec![ProximityHit { sensor: &left, distance: 5.0 }],
            line: vec![LineHit { sensor: &front, triggered: true }],
        };
        assert_eq!(player_command(&frame), LineEscape::PLAYER.front);
    }

    #[test]
    fn test_last_triggered_line_sensor_wins() {
        let front = line("lf", -14.0);
        let rear = line("lr", 14.0);
        let center = line("lc", 0.0);
        let frame = SensorFrame {
            proximity: vec![],
            line: vec![
                LineHit { sensor: &front, triggered: true },
                LineHit { sensor: &rear, triggered: true },
            ],
        };
        assert_eq!(player_command(&frame), LineEscape::PLAYER.rear);

        // Zero offset counts as rear-mounted
        let frame = SensorFrame {
            proximity: vec![],
            line: vec![
                LineHit { sensor: &center, triggered: true },
                LineHit { sensor: &front, triggered: false },
            ],
        };
        assert_eq!(player_command(&frame), LineEscape::PLAYER.rear);
    }

    #[test]
    fn test_bearing_convention() {
        assert!(bearing_to(Vec2::ZERO, Vec2::new(0.0, -10.0)).abs() < 1e-4);
        assert!((bearing_to(Vec2::ZERO, Vec2::new(10.0, 0.0)) - 90.0).abs() < 1e-4);
        assert!((bearing_to(Vec2::ZERO, Vec2::new(0.0, 10.0)).abs() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_seek_straight_when_aligned() {
        let frame = SensorFrame::default();
        let cmd = seek_command(Vec2::new(0.0, -40.0), 180.0, Vec2::new(0.0, 40.0), &frame);
        assert_eq!(cmd, WheelCommand::uniform(SEEK_CRUISE));
    }

    #[test]
    fn test_seek_turn_branches() {
        let frame = SensorFrame::default();
        // Target to the right (bearing 90°) while facing 0°
        let cmd = seek_command(Vec2::ZERO, 0.0, Vec2::new(10.0, 0.0), &frame);
        assert_eq!(cmd, WheelCommand::new(BASE_SPEED * SEEK_CRUISE, BASE_SPEED * SEEK_TURN_INNER));

        let cmd = seek_command(Vec2::ZERO, 0.0, Vec2::new(-10.0, 0.0), &frame);
        assert_eq!(cmd, WheelCommand::new(BASE_SPEED * SEEK_TURN_INNER, BASE_SPEED * SEEK_CRUISE));

        // Target at bearing 2°: facing 350° wraps to a 12° error, facing 358° to 4°
        let target = Vec2::new(2.0f32.to_radians().sin(), -2.0f32.to_radians().cos()) * 10.0;
        let cmd = seek_command(Vec2::ZERO, 350.0, target, &frame);
        assert_ne!(cmd, WheelCommand::uniform(SEEK_CRUISE));
        let cmd = seek_command(Vec2::ZERO, 358.0, target, &frame);
        assert_eq!(cmd, WheelCommand::uniform(SEEK_CRUISE));
    }

    #[test]
    fn test_seek_line_escape() {
        let front = line("lf", -14.0);
        let frame = SensorFrame {
            proximity: vec![],
            line: vec![LineHit { sensor: &front, triggered: true }],
        };
        let cmd = seek_command(Vec2::ZERO, 0.0, Vec2::new(0.0, -10.0), &frame);
        assert_eq!(cmd, LineEscape::SEEKER.front);
    }
}
