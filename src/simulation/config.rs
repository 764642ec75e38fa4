//! Simulation configuration and validation
//!
//! A configuration is checked in full before any system is built, so a
//! caller never receives a partially constructed system.

use anyhow::{ensure, Result};

use super::types::{DEFAULT_MAX_GREEN_TIME, DEFAULT_MIN_GREEN_TIME};

/// Supported number of signal heads per system
pub const MIN_LIGHT_COUNT: usize = 2;
pub const MAX_LIGHT_COUNT: usize = 12;

/// Supported traffic arrival rate scale
pub const MIN_TRAFFIC_RATE: u32 = 1;
pub const MAX_TRAFFIC_RATE: u32 = 10;

/// Parameters for building a [`super::System`]
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub light_count: usize,
    /// Sync-group assignment indexed by light id. An empty vec puts every
    /// light in its own group.
    pub sync_groups: Vec<usize>,
    /// Explicit conflict pairs. `None` derives the default topology from
    /// the sync-group assignment: every cross-group pair conflicts.
    pub explicit_conflicts: Option<Vec<(usize, usize)>>,
    pub min_green_time: u32,
    pub max_green_time: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(4, vec![0, 0, 1, 1])
    }
}

impl SimConfig {
    pub fn new(light_count: usize, sync_groups: Vec<usize>) -> Self {
        Self {
            light_count,
            sync_groups,
            explicit_conflicts: None,
            min_green_time: DEFAULT_MIN_GREEN_TIME,
            max_green_time: DEFAULT_MAX_GREEN_TIME,
        }
    }

    /// Sync group for the given light id, falling back to one group per
    /// light when no assignment was supplied
    pub fn sync_group_of(&self, light: usize) -> usize {
        self.sync_groups.get(light).copied().unwrap_or(light)
    }

    /// Reject an unusable configuration before any system is constructed
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (MIN_LIGHT_COUNT..=MAX_LIGHT_COUNT).contains(&self.light_count),
            "light count {} is outside the supported range [{}, {}]",
            self.light_count,
            MIN_LIGHT_COUNT,
            MAX_LIGHT_COUNT
        );
        if !self.sync_groups.is_empty() {
            ensure!(
                self.sync_groups.len() == self.light_count,
                "sync-group assignment covers {} lights but the system has {}",
                self.sync_groups.len(),
                self.light_count
            );
        }
        ensure!(self.min_green_time >= 1, "minimum green time must be at least one tick");
        ensure!(
            self.min_green_time <= self.max_green_time,
            "minimum green time {} exceeds maximum green time {}",
            self.min_green_time,
            self.max_green_time
        );
        if let Some(pairs) = &self.explicit_conflicts {
            for &(a, b) in pairs {
                ensure!(
                    a < self.light_count && b < self.light_count,
                    "conflict pair ({}, {}) references an unknown light",
                    a,
                    b
                );
                ensure!(a != b, "light {} cannot conflict with itself", a);
                ensure!(
                    self.sync_group_of(a) != self.sync_group_of(b),
                    "conflict pair ({}, {}) lies within a single sync group",
                    a,
                    b
                );
            }
        }
        Ok(())
    }

    /// Validate an externally supplied traffic rate (1-10 scale)
    pub fn validate_traffic_rate(rate: u32) -> Result<()> {
        ensure!(
            (MIN_TRAFFIC_RATE..=MAX_TRAFFIC_RATE).contains(&rate),
            "traffic rate {} is outside the supported range [{}, {}]",
            rate,
            MIN_TRAFFIC_RATE,
            MAX_TRAFFIC_RATE
        );
        Ok(())
    }
}
