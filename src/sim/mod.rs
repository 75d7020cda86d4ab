//! Deterministic rig simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Position derived from (angle, length), never integrated
//! - Time only advances through `dt`
//! - No rendering, physics, or platform dependencies

pub mod catch;
pub mod motion;
pub mod session;
pub mod state;
pub mod tick;

pub use catch::{CatchResult, Contact, IgnoreReason, on_contact};
pub use motion::{ClawPose, RopeGeometry, chase_velocity, endpoint, facing_angle_degrees, swing_angle};
pub use session::{Frame, GameEvent, HeldObjectFollow, PopupRequest, Session, SessionError};
pub use state::{HeldObject, PayoutLedger, Rig, RigState};
pub use tick::{StepOutcome, start_extend, step};
