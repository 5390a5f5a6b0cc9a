//! Fixed-tick match step and judge
//!
//! `step_simulation` maps one `SimState` to the next. It owns no timers and
//! performs no I/O; the caller re-invokes it every `TICK_MS` while running.

use glam::Vec2;

use super::controller::{WheelCommand, player_command, seek_command};
use super::geometry::{SatResult, robot_corners, sat_collision};
use super::kinematics::differential_drive;
use super::sensors::sense;
use super::state::{RobotState, SimState, SimStatus, Winner};
use crate::config::RobotConfig;
use crate::consts::*;

/// Advance a running match by one tick.
///
/// Any state that is not running is returned unchanged. Configs are read
/// fresh on every call, so the caller may edit them between ticks.
pub fn step_simulation(prev: &SimState, robot_cfg: &RobotConfig, opponent_cfg: &RobotConfig) -> SimState {
    if prev.status != SimStatus::Running {
        return prev.clone();
    }

    let mut robot = prev.robot;
    let mut opponent = prev.opponent;

    // Sense against the pre-tick hulls
    let robot_hull = robot_corners(robot_cfg, &robot);
    let opponent_hull = robot_corners(opponent_cfg, &opponent);
    let robot_frame = sense(robot_cfg, &robot, &opponent_hull);
    let opponent_frame = sense(opponent_cfg, &opponent, &robot_hull);

    let robot_cmd = player_command(&robot_frame);
    let opponent_cmd = seek_command(
        opponent.position(),
        opponent.rotation,
        robot.position(),
        &opponent_frame,
    );

    drive(&mut robot, robot_cmd, robot_cfg.wheel_base());
    drive(&mut opponent, opponent_cmd, opponent_cfg.wheel_base());

    let contact = sat_collision(
        &robot_corners(robot_cfg, &robot),
        &robot_corners(opponent_cfg, &opponent),
    );
    if contact.colliding {
        resolve_collision(&mut robot, &mut opponent, robot_cfg, opponent_cfg, &contact);
    }

    let mut next = SimState {
        status: prev.status,
        robot,
        opponent,
        elapsed: prev.elapsed + TICK_MS,
        winner: prev.winner,
        robot_sensor_readings: robot_frame.readings(),
        opponent_sensor_readings: opponent_frame.readings(),
    };

    if let Some(winner) = judge(&next.robot, &next.opponent) {
        next.status = SimStatus::Finished;
        next.winner = Some(winner);
        log::info!("Match finished after {} ms: {:?}", next.elapsed, winner);
    }

    next
}

/// Record wheel speeds and integrate one tick of motion
fn drive(state: &mut RobotState, cmd: WheelCommand, wheel_base: f32) {
    state.left_wheel_speed = cmd.left;
    state.right_wheel_speed = cmd.right;
    let pose = differential_drive(state.pose(), cmd.left, cmd.right, wheel_base);
    state.set_pose(pose);
}

/// Push overlapping robots apart along the line between their centers.
///
/// Each robot moves by `overlap * PUSH_FORCE` scaled by the other robot's
/// share of the total mass; the steeper wedge gets an extra `WEDGE_BONUS`.
pub fn resolve_collision(
    robot: &mut RobotState,
    opponent: &mut RobotState,
    robot_cfg: &RobotConfig,
    opponent_cfg: &RobotConfig,
    contact: &SatResult,
) {
    let between = robot.position() - opponent.position();
    let dist = between.length();
    // Coincident centers have no push direction
    let normal = if dist > 0.0 { between / dist } else { Vec2::ZERO };

    let total_mass = robot_cfg.mass + opponent_cfg.mass;
    let (robot_share, opponent_share) = if total_mass > 0.0 {
        (opponent_cfg.mass / total_mass, robot_cfg.mass / total_mass)
    } else {
        (0.5, 0.5)
    };

    let robot_bonus = if robot_cfg.wedge_angle > opponent_cfg.wedge_angle {
        WEDGE_BONUS
    } else {
        0.0
    };
    let opponent_bonus = if opponent_cfg.wedge_angle > robot_cfg.wedge_angle {
        WEDGE_BONUS
    } else {
        0.0
    };

    let push = contact.overlap * PUSH_FORCE;
    robot.translate(normal * push * (robot_share + robot_bonus));
    opponent.translate(-normal * push * (opponent_share + opponent_bonus));

    log::debug!("Collision overlap {:.3}, push {:.3}", contact.overlap, push);
}

/// Ring-out check. `None` while both robots are inside the limit.
pub fn judge(robot: &RobotState, opponent: &RobotState) -> Option<Winner> {
    let limit = DOHYO_RADIUS - RING_OUT_MARGIN;
    let robot_out = robot.distance_from_center() > limit;
    let opponent_out = opponent.distance_from_center() > limit;

    match (robot_out, opponent_out) {
        (true, true) => Some(Winner::Draw),
        (true, false) => Some(Winner::Opponent),
        (false, true) => Some(Winner::Robot),
        (false, false) => None,
    }
}
