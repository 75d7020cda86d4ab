//! Play session: the single active rig, its catalog, and the payout ledger
//!
//! Tick contract, in order:
//! 1. `advance(dt)` moves the rope and runs the state machine
//! 2. the collision backend reports overlaps via `report_contact`
//! 3. `present()` reads the post-update claw for rendering and held-object follow
//!
//! HUD and popup collaborators drain [`GameEvent`]s; the core never looks them up.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catch::{self, CatchResult, Contact, IgnoreReason};
use super::motion::{ClawPose, RopeGeometry, facing_angle_degrees};
use super::state::{PayoutLedger, Rig, RigState};
use super::tick;
use crate::catalog::ValueCatalog;
use crate::settings::{ConfigError, FieldGeometry, RigConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a rig is already active in this session")]
    RigAlreadyActive,
}

/// Timed popup showing a payout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopupRequest {
    pub value: u32,
    pub duration_secs: f32,
}

/// Notifications for collaborators outside the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Rig changed phase
    StateChanged { from: RigState, to: RigState },
    /// A catch was latched; the play field should attach the object to the claw
    Caught { tag: String, value: u32 },
    /// New money total for the HUD
    HudTotal(u64),
    /// Show a payout popup
    Popup(PopupRequest),
    /// Payout settled; the play field may destroy the collectible
    Settled { tag: String },
}

/// Position for the collectible hanging from the claw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeldObjectFollow {
    pub position: Vec2,
}

/// Everything the render pass needs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub rope: RopeGeometry,
    pub claw: ClawPose,
    pub held: Option<HeldObjectFollow>,
}

/// One play session
#[derive(Debug)]
pub struct Session {
    config: RigConfig,
    catalog: ValueCatalog,
    rig: Option<Rig>,
    ledger: PayoutLedger,
    events: Vec<GameEvent>,
}

impl Session {
    /// A session with no rig yet
    ///
    /// The config is validated here so every rig it drives stays in bounds.
    pub fn new(config: RigConfig, catalog: ValueCatalog) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            catalog,
            rig: None,
            ledger: PayoutLedger::new(),
            events: Vec::new(),
        })
    }

    /// A session with its rig already spawned
    pub fn with_rig(
        config: RigConfig,
        catalog: ValueCatalog,
        geometry: Option<FieldGeometry>,
    ) -> Result<Self, ConfigError> {
        let mut session = Self::new(config, catalog)?;
        session.install_rig(geometry);
        Ok(session)
    }

    /// Spawn the session's rig
    ///
    /// Only one rig may be active. A second spawn is refused and the existing
    /// rig stays authoritative.
    pub fn spawn_rig(&mut self, geometry: Option<FieldGeometry>) -> Result<&Rig, SessionError> {
        if self.rig.is_some() {
            log::warn!("Duplicate rig spawn refused; keeping the active rig");
            return Err(SessionError::RigAlreadyActive);
        }
        Ok(self.install_rig(geometry))
    }

    fn install_rig(&mut self, geometry: Option<FieldGeometry>) -> &Rig {
        let max_length = self.config.derive_max_length(geometry);
        log::info!("Rig spawned with reach {}", max_length);
        self.rig.insert(Rig::new(&self.config, max_length))
    }

    /// Remove the rig at session end
    pub fn despawn_rig(&mut self) -> Option<Rig> {
        self.rig.take()
    }

    pub fn rig(&self) -> Option<&Rig> {
        self.rig.as_ref()
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ValueCatalog {
        &self.catalog
    }

    pub fn total_money(&self) -> u64 {
        self.ledger.total_money()
    }

    pub fn ledger(&self) -> &PayoutLedger {
        &self.ledger
    }

    /// Tap/click input. Ignored unless the rig is swinging.
    pub fn start_extend(&mut self) -> bool {
        let Some(rig) = self.rig.as_mut() else {
            return false;
        };
        let started = tick::start_extend(rig);
        if started {
            self.events.push(GameEvent::StateChanged {
                from: RigState::Swing,
                to: RigState::Extend,
            });
        }
        started
    }

    /// Sensor overlap from the collision backend
    ///
    /// Duplicates and irrelevant contacts are tolerated; at most one object is
    /// caught per extend phase.
    pub fn report_contact(&mut self, contact: impl Into<Contact>) -> CatchResult {
        let Some(rig) = self.rig.as_mut() else {
            return CatchResult::Ignored(IgnoreReason::NotExtending);
        };
        let contact = contact.into();
        let from = rig.state();
        let result = catch::on_contact(rig, &self.catalog, &contact, self.config.hit_depth);

        if let CatchResult::Caught(held) = &result {
            self.events.push(GameEvent::Caught {
                tag: held.tag.clone(),
                value: held.value,
            });
            let to = rig.state();
            if to != from {
                self.events.push(GameEvent::StateChanged { from, to });
            }
        }
        result
    }

    /// Advance the simulation by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let Some(rig) = self.rig.as_mut() else {
            return;
        };
        let outcome = tick::step(rig, &self.config, dt);

        if let Some((from, to)) = outcome.transition {
            self.events.push(GameEvent::StateChanged { from, to });
        }

        if let Some(held) = outcome.settled.filter(|h| h.value > 0) {
            let total = self.ledger.settle(held.value);
            log::info!("Settled {} for {}, total {}", held.tag, held.value, total);
            self.events.push(GameEvent::HudTotal(total));
            self.events.push(GameEvent::Popup(PopupRequest {
                value: held.value,
                duration_secs: self.config.popup_duration_secs,
            }));
            self.events.push(GameEvent::Settled { tag: held.tag });
        }
    }

    /// Read-only view of the current claw for rendering
    pub fn present(&self) -> Option<Frame> {
        let rig = self.rig.as_ref()?;
        let position = rig.claw_position();

        let held = rig.held().map(|h| {
            // Hang the object from its top edge: push it away from the pivot
            let outward = position.normalize_or_zero();
            HeldObjectFollow {
                position: position + outward * h.extent * 0.5,
            }
        });

        Some(Frame {
            rope: RopeGeometry::new(position, self.config.rope_width, self.config.hide_at_claw),
            claw: ClawPose {
                position,
                angle_degrees: facing_angle_degrees(position, self.config.claw_angle_offset_deg),
            },
            held,
        })
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn session() -> Session {
        Session::with_rig(RigConfig::default(), ValueCatalog::default(), None).unwrap()
    }

    #[test]
    fn test_duplicate_rig_rejected() {
        let mut session = session();
        start_and_advance(&mut session, 0.5);
        let length = session.rig().unwrap().current_length();

        assert_eq!(
            session.spawn_rig(None).unwrap_err(),
            SessionError::RigAlreadyActive
        );
        // First rig untouched
        assert_eq!(session.rig().unwrap().current_length(), length);
        assert_eq!(session.rig().unwrap().state(), RigState::Extend);
    }

    #[test]
    fn test_spawn_after_despawn() {
        let mut session = Session::new(RigConfig::default(), ValueCatalog::default()).unwrap();
        assert!(session.present().is_none());
        session.advance(1.0);
        assert!(!session.start_extend());

        let geometry = FieldGeometry {
            mount_y: 300.0,
            field_bottom_y: -300.0,
        };
        assert_eq!(session.spawn_rig(Some(geometry)).unwrap().max_length(), 720.0);
        assert!(session.despawn_rig().is_some());
        assert!(session.spawn_rig(None).is_ok());
    }

    fn start_and_advance(session: &mut Session, secs: f32) {
        assert!(session.start_extend());
        session.advance(secs);
    }

    #[test]
    fn test_contact_emits_caught_event() {
        let mut session = session();
        start_and_advance(&mut session, 1.0);
        session.drain_events();

        let result = session.report_contact("GoldNugget-3");
        assert!(result.is_caught());
        let rig = session.rig().unwrap();
        assert_eq!(rig.held_value(), 500);
        assert_eq!(rig.held_weight(), 2.0);
        assert_eq!(
            rig.pending_deepen_length(),
            Some(rig.current_length() + session.config().hit_depth)
        );
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::Caught {
                tag: "GoldNugget-3".into(),
                value: 500
            }]
        );
    }

    #[test]
    fn test_settle_emits_hud_and_popup_once() {
        let mut session = session();
        start_and_advance(&mut session, 1.0);
        session.report_contact("GoldNugget-1");
        session.report_contact("GoldNugget-1");

        for _ in 0..10_000 {
            session.advance(SIM_DT);
            if session.rig().unwrap().state() == RigState::Swing {
                break;
            }
        }

        let events = session.drain_events();
        let popups: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Popup(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(
            popups,
            vec![PopupRequest {
                value: 100,
                duration_secs: 0.8
            }]
        );
        assert!(events.contains(&GameEvent::HudTotal(100)));
        assert!(events.contains(&GameEvent::Settled {
            tag: "GoldNugget-1".into()
        }));
        assert_eq!(session.total_money(), 100);
        assert_eq!(session.rig().unwrap().held_value(), 0);
    }

    #[test]
    fn test_empty_retract_settles_nothing() {
        let mut session = session();
        assert!(session.start_extend());
        for _ in 0..10_000 {
            session.advance(SIM_DT);
            if session.rig().unwrap().state() == RigState::Swing {
                break;
            }
        }
        let events = session.drain_events();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::HudTotal(_) | GameEvent::Popup(_)))
        );
        assert_eq!(session.total_money(), 0);
        assert_eq!(session.ledger().catches(), 0);
    }

    #[test]
    fn test_present_follows_claw() {
        let mut session = session();
        start_and_advance(&mut session, 1.0);
        session.report_contact(Contact::new("MoneyBag", 30.0));

        let frame = session.present().unwrap();
        let rig = session.rig().unwrap();
        assert_eq!(frame.rope.origin, Vec2::ZERO);
        assert_eq!(frame.rope.endpoint, rig.claw_position());
        assert_eq!(frame.claw.position, rig.claw_position());

        let held = frame.held.unwrap();
        let offset = held.position - frame.claw.position;
        assert!((offset.length() - 15.0).abs() < 1e-3);
        // Further from the pivot than the claw
        assert!(held.position.length() > frame.claw.position.length());
    }

    #[test]
    fn test_present_without_held_object() {
        let session = session();
        let frame = session.present().unwrap();
        assert!(frame.held.is_none());
        assert!((frame.claw.angle_degrees + 36.0).abs() < 1e-3);
    }

    #[test]
    fn test_start_ignored_while_busy() {
        let mut session = session();
        start_and_advance(&mut session, 0.2);
        assert!(!session.start_extend());
        assert_eq!(session.rig().unwrap().state(), RigState::Extend);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = RigConfig {
            extend_speed: -100.0,
            ..RigConfig::default()
        };
        let err = Session::with_rig(config, ValueCatalog::default(), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                field: "extend_speed",
                ..
            }
        ));

        let config = RigConfig {
            max_length: 70.0,
            ..RigConfig::default()
        };
        assert!(matches!(
            Session::new(config, ValueCatalog::default()),
            Err(ConfigError::LengthBounds { .. })
        ));
    }

    #[test]
    fn test_zero_advance_with_reach_equal_to_min() {
        // 0 - 50 + 120 lands exactly on min_length, so the default reach is kept
        let geometry = FieldGeometry {
            mount_y: 0.0,
            field_bottom_y: 50.0,
        };
        let mut session =
            Session::with_rig(RigConfig::default(), ValueCatalog::default(), Some(geometry))
                .unwrap();
        assert_eq!(session.rig().unwrap().max_length(), 500.0);

        assert!(session.start_extend());
        session.drain_events();
        for _ in 0..3 {
            session.advance(0.0);
        }
        assert_eq!(session.rig().unwrap().state(), RigState::Extend);
        assert!(session.drain_events().is_empty());
    }
}
