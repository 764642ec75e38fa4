//! Core types for the signal simulation
//!
//! These are standalone types that don't depend on any host runtime.

/// A unique identifier for a signal head
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(pub usize);

/// A wrapper type for synchronization group ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

/// The phase a signal head is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Green,
    Yellow,
    Red,
}

impl Phase {
    /// Single-character representation for compact console output
    pub fn glyph(self) -> char {
        match self {
            Phase::Green => 'G',
            Phase::Yellow => 'Y',
            Phase::Red => 'R',
        }
    }
}

/// Ticks a light spends in Yellow when a policy or the resolver demotes it
pub const YELLOW_DURATION: u32 = 3;

/// Default minimum ticks a group must hold Green before it may hand over
pub const DEFAULT_MIN_GREEN_TIME: u32 = 5;

/// Default maximum ticks a group may hold Green regardless of demand
pub const DEFAULT_MAX_GREEN_TIME: u32 = 30;

/// Exclusive upper bound for randomly drawn initial queue lengths
pub const INITIAL_QUEUE_MAX: u32 = 10;

/// A single signal head with its own queue and phase timers
#[derive(Debug, Clone)]
pub struct Light {
    pub id: LightId,
    /// Vehicles currently waiting at this light
    pub queue_length: u32,
    pub phase: Phase,
    /// Ticks left in Yellow; meaningful only while the phase is Yellow
    pub yellow_time_remaining: u32,
    /// Ticks spent continuously in Green since the last activation
    pub green_time_elapsed: u32,
    pub min_green_time: u32,
    pub max_green_time: u32,
    /// Lights with the same sync group transition together
    pub sync_group: GroupId,
}

impl Light {
    pub fn new(
        id: LightId,
        sync_group: GroupId,
        min_green_time: u32,
        max_green_time: u32,
        queue_length: u32,
    ) -> Self {
        Self {
            id,
            queue_length,
            phase: Phase::Red,
            yellow_time_remaining: 0,
            green_time_elapsed: 0,
            min_green_time,
            max_green_time,
            sync_group,
        }
    }

    pub fn is_green(&self) -> bool {
        self.phase == Phase::Green
    }

    pub fn is_yellow(&self) -> bool {
        self.phase == Phase::Yellow
    }

    pub fn is_red(&self) -> bool {
        self.phase == Phase::Red
    }

    /// Activate this light, restarting the green timer
    pub fn begin_green(&mut self) {
        self.phase = Phase::Green;
        self.green_time_elapsed = 0;
    }

    /// Demote this light to Yellow with the given countdown
    pub fn begin_yellow(&mut self, duration: u32) {
        self.phase = Phase::Yellow;
        self.yellow_time_remaining = duration;
        self.green_time_elapsed = 0;
    }

    /// Drop this light to Red and clear the yellow countdown
    pub fn clear_to_red(&mut self) {
        self.phase = Phase::Red;
        self.yellow_time_remaining = 0;
    }
}
