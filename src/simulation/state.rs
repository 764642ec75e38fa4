//! Simulation driver
//!
//! Owns the two policy systems and advances them in lock-step over
//! identical synthetic traffic. Single-threaded and externally clocked:
//! the host calls [`SimulationState::step`] once per tick, and all
//! commands apply between steps.

use anyhow::Result;
use log::{error, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::config::SimConfig;
use super::fixed_timing;
use super::greedy;
use super::resolver;
use super::system::System;

/// Default milliseconds between host-driven steps
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 500;

/// Default traffic arrival rate on the 1-10 scale
pub const DEFAULT_TRAFFIC_RATE: u32 = 5;

/// Which control policy drives a system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Greedy,
    FixedTiming,
}

impl PolicyKind {
    /// Human-readable label used in logs and console output
    pub fn label(self) -> &'static str {
        match self {
            PolicyKind::Greedy => "game theory",
            PolicyKind::FixedTiming => "fixed timing",
        }
    }
}

/// The whole simulation: two parallel systems plus shared scalars
pub struct SimulationState {
    pub greedy_system: System,
    pub fixed_timing_system: System,
    /// Monotonic step counter, shared by both systems
    pub tick: u64,
    /// Host-facing run flag; `step` itself is always available
    pub running: bool,
    pub step_interval_ms: u64,
    pub traffic_rate: u32,
    /// Seeded RNG for reproducible runs, thread RNG otherwise
    rng: Option<StdRng>,
}

impl SimulationState {
    pub fn new(config: &SimConfig) -> Result<Self> {
        Self::new_internal(config, None)
    }

    /// Create a simulation with a seeded RNG for reproducible runs
    pub fn new_with_seed(config: &SimConfig, seed: u64) -> Result<Self> {
        Self::new_internal(config, Some(StdRng::seed_from_u64(seed)))
    }

    fn new_internal(config: &SimConfig, mut rng: Option<StdRng>) -> Result<Self> {
        let (greedy_system, fixed_timing_system) = Self::build_systems(config, &mut rng)?;
        Ok(Self {
            greedy_system,
            fixed_timing_system,
            tick: 0,
            running: false,
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
            traffic_rate: DEFAULT_TRAFFIC_RATE,
            rng,
        })
    }

    fn build_systems(config: &SimConfig, rng: &mut Option<StdRng>) -> Result<(System, System)> {
        match rng {
            Some(rng) => Ok((System::new(config, rng)?, System::new(config, rng)?)),
            None => {
                let mut thread_rng = rand::rng();
                Ok((
                    System::new(config, &mut thread_rng)?,
                    System::new(config, &mut thread_rng)?,
                ))
            }
        }
    }

    pub fn light_count(&self) -> usize {
        self.greedy_system.lights.len()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Rebuild both systems from the given configuration and rewind the
    /// tick counter. Traffic rate and step interval are preserved. A bad
    /// configuration is rejected without touching the current state.
    pub fn reset(&mut self, config: &SimConfig) -> Result<()> {
        let (greedy_system, fixed_timing_system) = Self::build_systems(config, &mut self.rng)?;
        self.greedy_system = greedy_system;
        self.fixed_timing_system = fixed_timing_system;
        self.tick = 0;
        self.running = false;
        Ok(())
    }

    /// Changing light count or grouping destroys and recreates the
    /// systems; there is no incremental reconfiguration.
    pub fn reconfigure(&mut self, config: &SimConfig) -> Result<()> {
        self.reset(config)
    }

    pub fn set_traffic_rate(&mut self, rate: u32) -> Result<()> {
        SimConfig::validate_traffic_rate(rate)?;
        self.traffic_rate = rate;
        Ok(())
    }

    pub fn set_step_interval_ms(&mut self, ms: u64) {
        self.step_interval_ms = ms;
    }

    /// Advance the whole simulation by one tick
    ///
    /// Each system independently receives arrivals, flow processing, its
    /// policy decision, and conflict resolution; the shared tick counter
    /// then increments once. The systems never interact.
    pub fn step(&mut self) {
        let mut thread_rng;
        let rng: &mut dyn RngCore = match &mut self.rng {
            Some(rng) => rng,
            None => {
                thread_rng = rand::rng();
                &mut thread_rng
            }
        };
        step_system(&mut self.greedy_system, PolicyKind::Greedy, self.traffic_rate, rng);
        step_system(
            &mut self.fixed_timing_system,
            PolicyKind::FixedTiming,
            self.traffic_rate,
            rng,
        );
        self.tick += 1;
    }
}

fn step_system(system: &mut System, policy: PolicyKind, traffic_rate: u32, rng: &mut dyn RngCore) {
    system.apply_arrivals(traffic_rate, rng);
    system.process_flow();
    match policy {
        PolicyKind::Greedy => greedy::decide(system),
        PolicyKind::FixedTiming => fixed_timing::decide(system),
    }
    if system.has_any_conflict() {
        // A conflict here is a policy defect; recover and keep going
        warn!(
            "conflicting green signals under the {} policy, forcing them yellow",
            policy.label()
        );
        resolver::resolve(system);
        if system.has_any_conflict() {
            error!(
                "conflict survived resolution under the {} policy, forcing the involved lights red",
                policy.label()
            );
            resolver::force_all_red(system);
        }
    }
}
