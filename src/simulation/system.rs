//! A simulated intersection cluster
//!
//! Owns the lights, the accumulated wait time, and the conflict topology,
//! and performs the per-tick queue/flow processing. Phase changes into
//! Green or Yellow are the exclusive business of the control policies.

use anyhow::Result;
use rand::{Rng, RngCore};
use std::collections::BTreeSet;

use super::config::SimConfig;
use super::conflicts::ConflictGraph;
use super::types::{GroupId, Light, LightId, Phase, INITIAL_QUEUE_MAX};

/// One intersection cluster with its queues, phases, and conflict set
#[derive(Debug, Clone)]
pub struct System {
    /// All lights, index-addressable by id
    pub lights: Vec<Light>,
    /// Ticks vehicles have spent waiting at Red, monotonically non-decreasing
    pub total_wait_time: u64,
    /// Immutable mutual-exclusion topology
    pub conflicts: ConflictGraph,
}

impl System {
    /// Build a system from a validated configuration. The first light
    /// starts Green, everything else Red, and initial queues are drawn
    /// from the injected randomness source.
    pub fn new(config: &SimConfig, rng: &mut dyn RngCore) -> Result<Self> {
        config.validate()?;

        let mut lights = Vec::with_capacity(config.light_count);
        for i in 0..config.light_count {
            let mut light = Light::new(
                LightId(i),
                GroupId(config.sync_group_of(i)),
                config.min_green_time,
                config.max_green_time,
                rng.random_range(0..INITIAL_QUEUE_MAX),
            );
            if i == 0 {
                light.begin_green();
            }
            lights.push(light);
        }

        let conflicts = match &config.explicit_conflicts {
            Some(pairs) => ConflictGraph::from_pairs(config.light_count, pairs),
            None => ConflictGraph::derive(&lights),
        };

        Ok(Self {
            lights,
            total_wait_time: 0,
            conflicts,
        })
    }

    /// Add newly arrived vehicles to every queue
    ///
    /// Each light independently gains between zero and
    /// `ceil(traffic_rate / 10 * 5)` vehicles, so the per-tick bound
    /// scales linearly from 1 to 5 across the rate range.
    pub fn apply_arrivals(&mut self, traffic_rate: u32, rng: &mut dyn RngCore) {
        let max_new = (traffic_rate * 5).div_ceil(10);
        for light in &mut self.lights {
            light.queue_length += rng.random_range(0..=max_new);
        }
    }

    /// Advance phase timers and drain queues for one tick
    ///
    /// Yellow counts down and falls back to Red at the start of the tick
    /// after its countdown hits zero. Green discharges one vehicle and
    /// accrues green time. Red accrues one wait-tick per queued vehicle.
    pub fn process_flow(&mut self) {
        for light in &mut self.lights {
            match light.phase {
                Phase::Yellow => {
                    if light.yellow_time_remaining == 0 {
                        light.clear_to_red();
                    } else {
                        light.yellow_time_remaining -= 1;
                    }
                }
                Phase::Green => {
                    light.queue_length = light.queue_length.saturating_sub(1);
                    light.green_time_elapsed += 1;
                }
                Phase::Red => {
                    self.total_wait_time += u64::from(light.queue_length);
                }
            }
        }
    }

    /// True iff any conflicting pair is simultaneously Green
    pub fn has_any_conflict(&self) -> bool {
        self.conflicts.has_any_conflict(&self.lights)
    }

    /// All sync group ids present in the system, ascending
    pub fn group_ids(&self) -> Vec<GroupId> {
        let groups: BTreeSet<GroupId> = self.lights.iter().map(|l| l.sync_group).collect();
        groups.into_iter().collect()
    }

    /// Total vehicles currently queued across all lights
    pub fn total_queue(&self) -> u64 {
        self.lights.iter().map(|l| u64::from(l.queue_length)).sum()
    }
}
