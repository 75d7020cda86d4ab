//! Claw Crane - simulation core for a rope-and-claw arcade game
//!
//! Core modules:
//! - `sim`: Deterministic rig simulation (motion, catch arbitration, state machine, payout)
//! - `catalog`: Data-driven collectible values and weights
//! - `settings`: Per-session rig configuration
//! - `field`: Reference play field (collectible scatter and sensor contacts)
//! - `hud`: Reference HUD collaborators (digit strip, timed popup)

pub mod catalog;
pub mod field;
pub mod hud;
pub mod settings;
pub mod sim;

pub use catalog::{CatalogEntry, CatalogError, CatalogValue, ValueCatalog};
pub use settings::{ConfigError, FieldGeometry, RigConfig};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep used by the demo loop
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Smallest frame time used when deriving a chase velocity
    pub const MIN_CHASE_DT: f32 = 1.0 / 120.0;
}
