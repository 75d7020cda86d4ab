//! Claw Crane headless demo
//!
//! Runs an automated session: taps whenever the claw is swinging, feeds field
//! overlaps back as contacts, and logs each payout.
//!
//! Usage: claw-crane [config.json] [catalog.json] [seed]

use std::process::ExitCode;

use glam::Vec2;

use claw_crane::consts::{MAX_SUBSTEPS, SIM_DT};
use claw_crane::field::{FieldBounds, PlayField};
use claw_crane::hud::Hud;
use claw_crane::sim::{RigState, Session};
use claw_crane::{ConfigError, RigConfig, ValueCatalog};

/// Simulated wall-clock length of the demo
const RUN_SECS: f32 = 90.0;
/// Frame time of the pretend display (deliberately not a multiple of SIM_DT)
const FRAME_SECS: f32 = 1.0 / 45.0;
/// Pause between returning to swing and the next tap
const TAP_DELAY_SECS: f32 = 0.7;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => match RigConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => RigConfig::default(),
    };
    let catalog = match args.get(1) {
        Some(path) => match ValueCatalog::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Catalog {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => ValueCatalog::default(),
    };
    let seed = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(7);

    log::info!("Claw Crane (headless) starting with seed {}", seed);
    match run(config, catalog, seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Invalid rig config: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: RigConfig, catalog: ValueCatalog, seed: u64) -> Result<(), ConfigError> {
    let bounds = FieldBounds::new(Vec2::new(-220.0, -420.0), Vec2::new(220.0, -160.0));
    let mut field = PlayField::new(bounds);
    field.scatter(&catalog, seed, 14);

    let sensor_radius = config.sensor_radius;
    let mut session = Session::with_rig(config, catalog, Some(bounds.geometry()))?;
    let mut hud = Hud::default();

    let mut accumulator = 0.0;
    let mut elapsed = 0.0;
    let mut idle = 0.0;

    while elapsed < RUN_SECS {
        elapsed += FRAME_SECS;
        accumulator += FRAME_SECS;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let swinging = session.rig().is_some_and(|r| r.state() == RigState::Swing);
            if swinging {
                idle += SIM_DT;
                if idle >= TAP_DELAY_SECS {
                    session.start_extend();
                    idle = 0.0;
                }
            }

            session.advance(SIM_DT);

            // Physics pass: sensor overlaps at the post-update claw position
            if let Some(claw) = session.rig().map(|r| r.claw_position()) {
                for contact in field.contacts(claw, sensor_radius) {
                    session.report_contact(contact);
                }
            }

            if let Some(frame) = session.present() {
                if let Some(follow) = frame.held {
                    field.follow(&follow);
                }
            }

            let events = session.drain_events();
            field.apply_events(&events);
            hud.apply_events(&events);
            hud.update(SIM_DT);

            accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    let digits: String = hud.glyphs().iter().map(|g| char::from(b'0' + g.digit)).collect();
    log::info!(
        "Finished: {} catches, total {} (HUD shows {}), {} collectibles left",
        session.ledger().catches(),
        session.total_money(),
        digits,
        field.items().len()
    );
    Ok(())
}
