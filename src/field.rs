//! Reference play field
//!
//! Owns the collectibles and stands in for the physics backend: it scatters
//! objects deterministically from a seed, reports claw sensor overlaps as
//! contacts, hangs the caught object from the claw, and destroys it once the
//! payout settles. Coordinates share the rig's pivot-relative space (y up).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ValueCatalog;
use crate::settings::FieldGeometry;
use crate::sim::{Contact, GameEvent, HeldObjectFollow};

/// Errors raised while placing collectibles
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// Contacts and session events name objects by tag, so tags must be unique
    #[error("a collectible tagged {0:?} is already in the field")]
    DuplicateTag(String),
}

/// Axis-aligned region objects are scattered in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl FieldBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Reach geometry for a rig mounted at the local origin
    pub fn geometry(&self) -> FieldGeometry {
        FieldGeometry {
            mount_y: 0.0,
            field_bottom_y: self.min.y,
        }
    }
}

/// A catchable object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub tag: String,
    pub value: u32,
    pub weight: f32,
    pub position: Vec2,
    pub radius: f32,
    /// Currently hanging from the claw
    pub held: bool,
}

/// Collectibles in play
#[derive(Debug, Clone)]
pub struct PlayField {
    bounds: FieldBounds,
    items: Vec<Collectible>,
    next_id: u32,
}

impl PlayField {
    pub fn new(bounds: FieldBounds) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            next_id: 1,
        }
    }

    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    pub fn items(&self) -> &[Collectible] {
        &self.items
    }

    pub fn get(&self, tag: &str) -> Option<&Collectible> {
        self.items.iter().find(|c| c.tag == tag)
    }

    /// Place one object; its value and weight come from the catalog
    ///
    /// Refuses a tag already in play and leaves the field unchanged.
    pub fn spawn(
        &mut self,
        catalog: &ValueCatalog,
        tag: impl Into<String>,
        position: Vec2,
        radius: f32,
    ) -> Result<u32, FieldError> {
        let tag = tag.into();
        if self.get(&tag).is_some() {
            return Err(FieldError::DuplicateTag(tag));
        }
        let resolved = catalog.lookup(&tag);
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Collectible {
            id,
            tag,
            value: resolved.value,
            weight: resolved.weight,
            position,
            radius: radius.max(0.0),
            held: false,
        });
        Ok(id)
    }

    /// Scatter `count` objects drawn from the catalog's patterns
    ///
    /// Same seed and catalog give the same layout.
    pub fn scatter(&mut self, catalog: &ValueCatalog, seed: u64, count: usize) {
        let patterns: Vec<String> = catalog.entries().iter().map(|e| e.pattern.clone()).collect();
        if patterns.is_empty() {
            log::warn!("Catalog is empty, nothing to scatter");
            return;
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let (min, max) = (self.bounds.min, self.bounds.max);
        for _ in 0..count {
            let pattern = &patterns[rng.random_range(0..patterns.len())];
            let position = Vec2::new(
                sample(&mut rng, min.x, max.x),
                sample(&mut rng, min.y, max.y),
            );
            let radius = rng.random_range(8.0..20.0);
            // Ids never repeat, so repeated scatters keep tags unique
            let tag = format!("{pattern}#{}", self.next_id);
            if let Err(e) = self.spawn(catalog, tag, position, radius) {
                log::warn!("Skipping scattered object: {}", e);
            }
        }
        log::info!("Scattered {} collectibles (seed {})", count, seed);
    }

    /// Objects overlapping a circular sensor at `claw`, in spawn order
    pub fn contacts(&self, claw: Vec2, sensor_radius: f32) -> Vec<Contact> {
        self.items
            .iter()
            .filter(|c| !c.held)
            .filter(|c| c.position.distance(claw) <= sensor_radius + c.radius)
            .map(|c| Contact::new(c.tag.clone(), c.radius * 2.0))
            .collect()
    }

    /// Move the held object to the claw's follow point
    pub fn follow(&mut self, follow: &HeldObjectFollow) {
        if let Some(item) = self.items.iter_mut().find(|c| c.held) {
            item.position = follow.position;
        }
    }

    pub fn remove(&mut self, tag: &str) -> Option<Collectible> {
        let index = self.items.iter().position(|c| c.tag == tag)?;
        Some(self.items.remove(index))
    }

    /// React to session events: attach caught objects, destroy settled ones
    pub fn apply_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Caught { tag, .. } => {
                    if let Some(item) = self.items.iter_mut().find(|c| &c.tag == tag) {
                        item.held = true;
                    }
                }
                GameEvent::Settled { tag } => {
                    if self.remove(tag).is_none() {
                        log::debug!("Settled {:?} was not in the field", tag);
                    }
                }
                _ => {}
            }
        }
    }
}

fn sample(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
