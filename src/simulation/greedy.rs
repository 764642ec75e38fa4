//! Greedy queue-bidding control policy
//!
//! Each sync group bids its total queue length as its utility for being
//! served next; the highest bidder wins, subject to the conflict
//! constraints and the per-light minimum/maximum green bounds. Runs once
//! per tick, after the flow processor.

use std::collections::BTreeMap;

use super::system::System;
use super::types::{GroupId, LightId, YELLOW_DURATION};

/// A Green group whose queues have drained to this size may hand over
/// once its minimum green time is served
pub const LOW_QUEUE_THRESHOLD: u32 = 2;

/// Decide this tick's transitions: demote served groups, then promote the
/// highest-bidding eligible group.
///
/// Candidates and conflicts are evaluated against the post-demotion state,
/// so a group vacating this tick no longer blocks the handover.
pub fn decide(system: &mut System) {
    downgrade_served_groups(system);
    if let Some(group) = best_candidate_group(system) {
        for light in system.lights.iter_mut().filter(|l| l.sync_group == group) {
            light.begin_green();
        }
    }
}

/// Demote every Green group that has served its minimum and either drained
/// its queue or exhausted its maximum. The whole group moves as one unit.
fn downgrade_served_groups(system: &mut System) {
    for i in 0..system.lights.len() {
        let light = &system.lights[i];
        if !light.is_green() {
            continue;
        }
        let should_turn_yellow = light.green_time_elapsed >= light.min_green_time
            && (light.queue_length <= LOW_QUEUE_THRESHOLD
                || light.green_time_elapsed >= light.max_green_time);
        if !should_turn_yellow {
            continue;
        }
        let group = light.sync_group;
        for member in system.lights.iter_mut().filter(|l| l.sync_group == group) {
            if member.is_green() {
                member.begin_yellow(YELLOW_DURATION);
            }
        }
    }
}

/// Pick the all-Red group with the largest total queue that would not
/// conflict with any light still Green. Ties go to the lowest group id.
/// Returns None when no eligible group has waiting vehicles.
fn best_candidate_group(system: &System) -> Option<GroupId> {
    let mut members_by_group: BTreeMap<GroupId, Vec<LightId>> = BTreeMap::new();
    for light in &system.lights {
        members_by_group
            .entry(light.sync_group)
            .or_default()
            .push(light.id);
    }

    let mut best: Option<(GroupId, u32)> = None;
    for (group, members) in &members_by_group {
        if !members.iter().all(|id| system.lights[id.0].is_red()) {
            continue;
        }
        let blocked = members
            .iter()
            .any(|id| !system.conflicts.green_conflicts(*id, &system.lights).is_empty());
        if blocked {
            continue;
        }
        let benefit: u32 = members
            .iter()
            .map(|id| system.lights[id.0].queue_length)
            .sum();
        match best {
            Some((_, best_benefit)) if benefit <= best_benefit => {}
            _ => best = Some((*group, benefit)),
        }
    }

    match best {
        Some((group, benefit)) if benefit > 0 => Some(group),
        _ => None,
    }
}
