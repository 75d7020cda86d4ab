//! Reference HUD collaborators
//!
//! Consume session events and keep the display-side state: a sprite strip of
//! decimal digits for the money total and a payout popup that hides itself
//! after a fixed interval.

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, PopupRequest};

/// Fallback glyph width when no sprite size is known
pub const DEFAULT_DIGIT_WIDTH: f32 = 20.0;

/// One digit sprite in a strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DigitGlyph {
    pub digit: u8,
    /// Offset from the strip origin
    pub x: f32,
}

/// Horizontal strip of digit sprites
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DigitStrip {
    pub digit_width: f32,
    pub spacing: f32,
}

impl Default for DigitStrip {
    fn default() -> Self {
        Self {
            digit_width: DEFAULT_DIGIT_WIDTH,
            spacing: 2.0,
        }
    }
}

impl DigitStrip {
    /// Lay out `value` left to right, most significant digit first
    pub fn layout(&self, value: u64) -> Vec<DigitGlyph> {
        value
            .to_string()
            .bytes()
            .enumerate()
            .map(|(i, b)| DigitGlyph {
                digit: b - b'0',
                x: i as f32 * (self.digit_width + self.spacing),
            })
            .collect()
    }
}

/// Payout popup with a fire-and-forget hide timer
#[derive(Debug, Clone, Default)]
pub struct PopupTimer {
    shown: Option<(u32, f32)>,
}

impl PopupTimer {
    pub fn show(&mut self, request: PopupRequest) {
        self.shown = Some((request.value, request.duration_secs.max(0.0)));
    }

    /// Count down; hides once the interval has elapsed
    pub fn update(&mut self, dt: f32) {
        if let Some((_, remaining)) = self.shown.as_mut() {
            *remaining -= dt.max(0.0);
            if *remaining <= 0.0 {
                self.shown = None;
            }
        }
    }

    /// Value currently on screen
    pub fn visible(&self) -> Option<u32> {
        self.shown.map(|(value, _)| value)
    }
}

/// Money counter plus popup
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub strip: DigitStrip,
    pub popup: PopupTimer,
    total: u64,
}

impl Hud {
    pub fn new(strip: DigitStrip) -> Self {
        Self {
            strip,
            ..Default::default()
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn apply_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::HudTotal(total) => self.total = *total,
                GameEvent::Popup(request) => self.popup.show(*request),
                _ => {}
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.popup.update(dt);
    }

    pub fn glyphs(&self) -> Vec<DigitGlyph> {
        self.strip.layout(self.total)
    }
}
