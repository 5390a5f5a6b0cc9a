//! Fixed-tick match driver
//!
//! The imperative shell around the pure engine: owns the canonical
//! `SimState`, the two config snapshots, and an optional tick cap. The engine
//! itself never times out; bounding match length is done here.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::RobotConfig;
use crate::consts::TICK_MS;
use crate::sim::{SimState, SimStatus, Winner, create_initial_sim_state, step_simulation};

/// Default cap: one minute of simulated time
pub const DEFAULT_MAX_TICKS: u64 = 60_000 / TICK_MS;

/// Random perturbation of the start marks
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StartJitter {
    /// Max offset along each axis (arena units)
    pub max_offset: f32,
    /// Max heading change (degrees)
    pub max_rotation: f32,
}

impl StartJitter {
    pub fn is_zero(&self) -> bool {
        self.max_offset == 0.0 && self.max_rotation == 0.0
    }

    /// Apply to both robots of a fresh state, deterministically for `seed`
    pub fn apply(&self, state: &mut SimState, seed: u64) {
        if self.is_zero() {
            return;
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        let offset = self.max_offset.abs();
        let turn = self.max_rotation.abs();
        for robot in [&mut state.robot, &mut state.opponent] {
            robot.x += rng.random_range(-offset..=offset);
            robot.y += rng.random_range(-offset..=offset);
            robot.rotation += rng.random_range(-turn..=turn);
        }
    }
}

/// Outcome of one driven match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub winner: Option<Winner>,
    pub ticks: u64,
    pub elapsed_ms: u64,
    /// The tick cap stopped the match before a ring-out
    pub timed_out: bool,
    pub final_state: SimState,
}

/// Drives one match tick by tick
#[derive(Debug, Clone)]
pub struct MatchDriver {
    state: SimState,
    robot: RobotConfig,
    opponent: RobotConfig,
    max_ticks: u64,
}

impl MatchDriver {
    pub fn new(robot: RobotConfig, opponent: RobotConfig) -> Self {
        Self {
            state: create_initial_sim_state(),
            robot,
            opponent,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Perturb the start marks. Only meaningful before the first tick.
    pub fn with_start_jitter(mut self, seed: u64, jitter: StartJitter) -> Self {
        jitter.apply(&mut self.state, seed);
        self
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn robot_config(&self) -> &RobotConfig {
        &self.robot
    }

    pub fn opponent_config(&self) -> &RobotConfig {
        &self.opponent
    }

    /// Swap the player config; takes effect on the next tick
    pub fn set_robot_config(&mut self, config: RobotConfig) {
        self.robot = config;
    }

    /// Swap the opponent config; takes effect on the next tick
    pub fn set_opponent_config(&mut self, config: RobotConfig) {
        self.opponent = config;
    }

    pub fn start(&mut self) -> bool {
        self.state.start()
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Advance one tick. Returns whether the match is still running.
    pub fn tick(&mut self) -> bool {
        self.state = step_simulation(&self.state, &self.robot, &self.opponent);
        self.state.is_running()
    }

    /// Start (or resume) and step until a ring-out or the tick cap
    pub fn run(&mut self) -> MatchReport {
        self.start();
        log::info!(
            "Match start: {} vs {} (cap {} ticks)",
            self.robot.name,
            self.opponent.name,
            self.max_ticks
        );

        let mut ticks = 0;
        while self.state.is_running() && ticks < self.max_ticks {
            self.tick();
            ticks += 1;
        }

        let timed_out = self.state.status == SimStatus::Running;
        if timed_out {
            log::info!("Match stopped at tick cap after {} ms", self.state.elapsed);
            self.pause();
        }

        MatchReport {
            winner: self.state.winner,
            ticks,
            elapsed_ms: self.state.elapsed,
            timed_out,
            final_state: self.state.clone(),
        }
    }
}

/// Aggregate of a series of jittered matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub matches: u32,
    pub robot_wins: u32,
    pub opponent_wins: u32,
    pub draws: u32,
    pub timeouts: u32,
    pub mean_ticks: f64,
}

impl SeriesSummary {
    fn record(&mut self, report: &MatchReport) {
        self.matches += 1;
        match report.winner {
            Some(Winner::Robot) => self.robot_wins += 1,
            Some(Winner::Opponent) => self.opponent_wins += 1,
            Some(Winner::Draw) => self.draws += 1,
            None => self.timeouts += 1,
        }
        // Running mean
        self.mean_ticks += (report.ticks as f64 - self.mean_ticks) / self.matches as f64;
    }
}

/// Run `matches` matches, match `i` jittered with seed `seed + i`
pub fn run_series(
    robot: &RobotConfig,
    opponent: &RobotConfig,
    seed: u64,
    matches: u32,
    max_ticks: u64,
    jitter: StartJitter,
) -> SeriesSummary {
    let mut summary = SeriesSummary::default();
    for i in 0..matches {
        let report = MatchDriver::new(robot.clone(), opponent.clone())
            .with_max_ticks(max_ticks)
            .with_start_jitter(seed.wrapping_add(u64::from(i)), jitter)
            .run();
        log::debug!("Match {}: {:?} after {} ticks", i, report.winner, report.ticks);
        summary.record(&report);
    }
    summary
}
