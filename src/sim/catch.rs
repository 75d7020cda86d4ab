//! Catch arbitration
//!
//! Decides whether a sensor contact reported by the collision backend is a
//! valid catch. Only the first collectible touched during an extend phase is
//! taken; everything else is a no-op.

use serde::{Deserialize, Serialize};

use super::state::{HeldObject, Rig, RigState};
use crate::catalog::ValueCatalog;

/// A sensor overlap reported by the collision backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Identity of the other object, resolved through the catalog
    pub tag: String,
    /// Visual size of the other object along the rope (0 when unknown)
    #[serde(default)]
    pub extent: f32,
}

impl Contact {
    pub fn new(tag: impl Into<String>, extent: f32) -> Self {
        Self {
            tag: tag.into(),
            extent: extent.max(0.0),
        }
    }
}

impl From<&str> for Contact {
    fn from(tag: &str) -> Self {
        Self::new(tag, 0.0)
    }
}

impl From<String> for Contact {
    fn from(tag: String) -> Self {
        Self::new(tag, 0.0)
    }
}

/// Why a contact did not produce a catch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Contact outside the extend phase
    NotExtending,
    /// Something was already caught this cycle
    AlreadyLatched,
    /// Tag has no catalog value (floor, walls, ...)
    NotCollectible,
}

/// Outcome of a contact
#[derive(Debug, Clone, PartialEq)]
pub enum CatchResult {
    Caught(HeldObject),
    Ignored(IgnoreReason),
}

impl CatchResult {
    pub fn is_caught(&self) -> bool {
        matches!(self, CatchResult::Caught(_))
    }
}

/// Resolve a contact against the rig
///
/// On a catch the rig is latched, the held object recorded, and the rope is
/// allowed to deepen by `hit_depth` (capped at the rig's reach) before it
/// reverses.
pub fn on_contact(
    rig: &mut Rig,
    catalog: &ValueCatalog,
    contact: &Contact,
    hit_depth: f32,
) -> CatchResult {
    if rig.state != RigState::Extend {
        return CatchResult::Ignored(IgnoreReason::NotExtending);
    }
    if rig.hit_latched {
        return CatchResult::Ignored(IgnoreReason::AlreadyLatched);
    }

    let resolved = catalog.lookup(&contact.tag);
    if !resolved.is_collectible() {
        log::debug!("Ignoring contact with non-collectible {:?}", contact.tag);
        return CatchResult::Ignored(IgnoreReason::NotCollectible);
    }

    let held = HeldObject {
        tag: contact.tag.clone(),
        value: resolved.value,
        weight: resolved.weight,
        extent: contact.extent,
    };
    let target = (rig.current_length + hit_depth.max(0.0)).min(rig.max_length);

    rig.hit_latched = true;
    rig.held = Some(held.clone());
    rig.pending_deepen_length = Some(target);

    // Nothing left to deepen: reverse now so a zero-length tick can't do it later
    if rig.current_length >= target {
        rig.state = RigState::Retract;
    }

    log::info!(
        "Caught {} (value {}, weight {}) at length {:.1}",
        held.tag,
        held.value,
        held.weight,
        rig.current_length
    );
    CatchResult::Caught(held)
}
