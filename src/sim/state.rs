//! Rig state and payout ledger

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::motion::endpoint;
use crate::settings::RigConfig;

/// Phase of one catch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RigState {
    /// Rope at rest length, claw oscillating
    #[default]
    Swing,
    /// Rope growing toward the play field
    Extend,
    /// Rope shrinking back, possibly with a held object
    Retract,
}

/// Reference to the collectible currently in the claw
///
/// The play field owns the collectible; the rig only copies its identity and
/// catalog values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldObject {
    pub tag: String,
    pub value: u32,
    pub weight: f32,
    /// Visual size along the rope, used to hang the object below the claw
    pub extent: f32,
}

/// The single claw/rope instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rig {
    pub(crate) current_length: f32,
    pub(crate) swing_angle: f32,
    pub(crate) swing_clock: f32,
    pub(crate) state: RigState,
    pub(crate) hit_latched: bool,
    pub(crate) pending_deepen_length: Option<f32>,
    pub(crate) held: Option<HeldObject>,
    pub(crate) min_length: f32,
    pub(crate) max_length: f32,
}

impl Rig {
    /// A resting rig at `min_length` with the given reach
    pub fn new(config: &RigConfig, max_length: f32) -> Self {
        Self {
            current_length: config.min_length,
            swing_angle: 0.0,
            swing_clock: 0.0,
            state: RigState::Swing,
            hit_latched: false,
            pending_deepen_length: None,
            held: None,
            min_length: config.min_length,
            max_length: max_length.max(config.min_length),
        }
    }

    pub fn state(&self) -> RigState {
        self.state
    }

    pub fn current_length(&self) -> f32 {
        self.current_length
    }

    pub fn min_length(&self) -> f32 {
        self.min_length
    }

    pub fn max_length(&self) -> f32 {
        self.max_length
    }

    pub fn swing_angle(&self) -> f32 {
        self.swing_angle
    }

    pub fn swing_clock(&self) -> f32 {
        self.swing_clock
    }

    pub fn hit_latched(&self) -> bool {
        self.hit_latched
    }

    pub fn pending_deepen_length(&self) -> Option<f32> {
        self.pending_deepen_length
    }

    pub fn held(&self) -> Option<&HeldObject> {
        self.held.as_ref()
    }

    /// Value of the held object, 0 when empty
    pub fn held_value(&self) -> u32 {
        self.held.as_ref().map_or(0, |h| h.value)
    }

    /// Weight of the held object, 1.0 (no penalty) when empty
    pub fn held_weight(&self) -> f32 {
        self.held.as_ref().map_or(1.0, |h| h.weight)
    }

    /// Claw position relative to the pivot
    pub fn claw_position(&self) -> Vec2 {
        endpoint(self.swing_angle, self.current_length)
    }

    /// Clear everything tied to the current catch cycle in one step
    ///
    /// Returns whatever was held so the caller can settle it.
    pub(crate) fn reset_cycle(&mut self) -> Option<HeldObject> {
        self.hit_latched = false;
        self.pending_deepen_length = None;
        self.held.take()
    }

    /// True when every rig invariant holds
    pub fn is_consistent(&self) -> bool {
        let in_bounds =
            self.current_length >= self.min_length && self.current_length <= self.max_length;
        let latch_ok = !(self.state == RigState::Swing && self.hit_latched);
        let swing_empty = self.state != RigState::Swing || self.held.is_none();
        let held_ok = self.held.is_none() || self.hit_latched;
        in_bounds && latch_ok && swing_empty && held_ok
    }
}

/// Running money total for the session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayoutLedger {
    total_money: u64,
    catches: u32,
}

impl PayoutLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_money(&self) -> u64 {
        self.total_money
    }

    /// Completed catches with a non-zero payout
    pub fn catches(&self) -> u32 {
        self.catches
    }

    /// Add a settled catch, returning the new total
    pub fn settle(&mut self, value: u32) -> u64 {
        self.total_money = self.total_money.saturating_add(u64::from(value));
        self.catches += 1;
        self.total_money
    }
}
