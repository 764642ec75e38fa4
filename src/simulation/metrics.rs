//! Derived statistics comparing the two control policies
//!
//! Recomputed from the current state every step rather than accumulated
//! incrementally.

use super::state::SimulationState;
use super::system::System;

/// Comparable statistics for one policy's system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyMetrics {
    pub total_wait_time: u64,
    pub avg_queue_length: f64,
    /// Approximation of cumulative vehicles served, clamped at zero. A
    /// reporting heuristic, not a conserved quantity.
    pub throughput: u64,
}

/// One snapshot covering both systems
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationMetrics {
    pub greedy: PolicyMetrics,
    pub fixed_timing: PolicyMetrics,
}

/// Compute the current metrics snapshot. Pure function of the state.
pub fn snapshot(state: &SimulationState) -> SimulationMetrics {
    SimulationMetrics {
        greedy: policy_metrics(&state.greedy_system, state.tick),
        fixed_timing: policy_metrics(&state.fixed_timing_system, state.tick),
    }
}

fn policy_metrics(system: &System, tick: u64) -> PolicyMetrics {
    let light_count = system.lights.len() as u64;
    PolicyMetrics {
        total_wait_time: system.total_wait_time,
        avg_queue_length: system.total_queue() as f64 / light_count as f64,
        throughput: (tick * light_count).saturating_sub(system.total_wait_time),
    }
}

/// Relative improvement of the greedy value over the fixed-timing
/// baseline, as a percentage. Positive means the greedy policy did
/// better under the given orientation.
pub fn improvement_percent(greedy: f64, fixed: f64, lower_is_better: bool) -> f64 {
    if fixed == 0.0 {
        return 0.0;
    }
    let delta = if lower_is_better {
        fixed - greedy
    } else {
        greedy - fixed
    };
    delta / fixed * 100.0
}
