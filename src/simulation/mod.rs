//! Core traffic-signal control simulation
//!
//! This module contains all the simulation logic: the per-light phase
//! state machine, the conflict topology, the two control policies, and
//! the driver that advances both policy systems over identical traffic.
//! It performs no internal timing; the host invokes one step at a time.

pub mod config;
pub mod conflicts;
pub mod fixed_timing;
pub mod greedy;
pub mod metrics;
pub mod resolver;
pub mod state;
pub mod system;
pub mod types;

// Re-export the primary types for external use
pub use config::{SimConfig, MAX_LIGHT_COUNT, MAX_TRAFFIC_RATE, MIN_LIGHT_COUNT, MIN_TRAFFIC_RATE};
pub use conflicts::ConflictGraph;
pub use metrics::{PolicyMetrics, SimulationMetrics};
pub use state::{PolicyKind, SimulationState, DEFAULT_STEP_INTERVAL_MS, DEFAULT_TRAFFIC_RATE};
pub use system::System;
pub use types::{
    GroupId, Light, LightId, Phase, DEFAULT_MAX_GREEN_TIME, DEFAULT_MIN_GREEN_TIME,
    INITIAL_QUEUE_MAX, YELLOW_DURATION,
};
