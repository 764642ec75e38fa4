//! Fixed round-robin control policy
//!
//! The comparison baseline: sync groups are served in ascending-id cyclic
//! order for a fixed green interval each, ignoring queue lengths entirely.
//! The flow processor owns all timer advancement; this policy only
//! performs the transitions the timers call for.

use super::system::System;
use super::types::{GroupId, Phase};

/// Ticks a group holds Green under the fixed schedule
pub const FIXED_GREEN_TIME: u32 = 20;

/// Ticks a group holds Yellow under the fixed schedule
pub const FIXED_YELLOW_TIME: u32 = 5;

/// Run the fixed schedule with the default cycle lengths
pub fn decide(system: &mut System) {
    decide_with(system, FIXED_GREEN_TIME, FIXED_YELLOW_TIME);
}

/// Run the fixed schedule with explicit cycle lengths
///
/// Exactly one group is ever Green or Yellow at a time: the active group
/// is found by scanning lights in id order, Green rolls over to Yellow
/// once `green_time` has elapsed, and when the Yellow countdown a group
/// entered with is exhausted the next group in cyclic order takes over.
pub fn decide_with(system: &mut System, green_time: u32, yellow_time: u32) {
    let groups = system.group_ids();
    let first = match groups.first() {
        Some(&group) => group,
        None => return,
    };

    let mut active: Option<GroupId> = None;
    let mut active_was_yellow = false;
    for light in &system.lights {
        match light.phase {
            Phase::Green => {
                active = Some(light.sync_group);
                break;
            }
            Phase::Yellow => {
                active = Some(light.sync_group);
                active_was_yellow = true;
                break;
            }
            Phase::Red => {}
        }
    }

    // Cold start: nothing is being served yet
    let active = match active {
        Some(group) => group,
        None => {
            activate_group(system, first);
            return;
        }
    };

    for light in system.lights.iter_mut().filter(|l| l.sync_group == active) {
        match light.phase {
            Phase::Green if light.green_time_elapsed >= green_time => {
                light.begin_yellow(yellow_time);
            }
            Phase::Yellow if light.yellow_time_remaining == 0 => {
                light.clear_to_red();
            }
            _ => {}
        }
    }

    // Hand over once the countdown the group entered Yellow with has
    // fully drained
    let yellow_finished = system
        .lights
        .iter()
        .filter(|l| l.sync_group == active)
        .all(|l| !l.is_yellow());
    if active_was_yellow && yellow_finished {
        let index = groups.iter().position(|&g| g == active).unwrap_or(0);
        let next = groups[(index + 1) % groups.len()];
        activate_group(system, next);
    }
}

fn activate_group(system: &mut System, group: GroupId) {
    for light in system.lights.iter_mut().filter(|l| l.sync_group == group) {
        light.begin_green();
    }
}
