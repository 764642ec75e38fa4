//! Safety net that de-conflicts simultaneous greens
//!
//! The policies should never produce two conflicting Green lights; if one
//! does, the resolver restores the exclusion invariant without halting
//! the simulation.

use super::system::System;
use super::types::YELLOW_DURATION;

/// Force every light participating in a Green-Green conflicting pair to
/// Yellow, leaving non-conflicting Green lights untouched. Idempotent.
/// Returns how many lights were forced.
pub fn resolve(system: &mut System) -> usize {
    let participants = system.conflicts.green_conflict_participants(&system.lights);
    for id in &participants {
        let light = &mut system.lights[id.0];
        if light.is_green() {
            light.begin_yellow(YELLOW_DURATION);
        }
    }
    participants.len()
}

/// Last-resort recovery: drop every conflict participant straight to Red.
/// Only reachable if a conflict somehow survives [`resolve`], which would
/// be a policy-engine defect. Returns how many lights were forced.
pub fn force_all_red(system: &mut System) -> usize {
    let participants = system.conflicts.green_conflict_participants(&system.lights);
    for id in &participants {
        system.lights[id.0].clear_to_red();
    }
    participants.len()
}
