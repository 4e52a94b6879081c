//! Color-grid driver: paints a 22x6 color canvas onto the per-key LEDs.
//!
//! The grid is swept in column-major order (all rows of column 0, then
//! column 1, ...) with a pacing delay after each write so the keyboard's
//! controller can keep up. Unmapped cells cost nothing: no packet, no
//! delay.

use crate::channel::FeatureWriter;
use crate::error::Result;
use crate::layout::{KeyLayout, GRID_COLUMNS, GRID_ROWS};
use crate::protocol::{encode_set_key_color, Profile};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// One RGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A 22x6 canvas of colors, one cell per key-grid coordinate.
///
/// Callers are responsible for resampling larger images down to this
/// canvas before handing it over; the driver never scales.
#[derive(Debug, Clone)]
pub struct ColorGrid {
    pixels: [[Rgb; GRID_ROWS]; GRID_COLUMNS],
}

impl ColorGrid {
    /// All-black canvas.
    pub fn new() -> Self {
        Self {
            pixels: [[Rgb::default(); GRID_ROWS]; GRID_COLUMNS],
        }
    }

    /// Canvas filled with one color.
    pub fn filled(color: Rgb) -> Self {
        Self {
            pixels: [[color; GRID_ROWS]; GRID_COLUMNS],
        }
    }

    /// Set one cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, col: usize, row: usize, color: Rgb) {
        if col < GRID_COLUMNS && row < GRID_ROWS {
            self.pixels[col][row] = color;
        }
    }

    /// Color at a cell. Out-of-range coordinates read black.
    pub fn get(&self, col: usize, row: usize) -> Rgb {
        if col < GRID_COLUMNS && row < GRID_ROWS {
            self.pixels[col][row]
        } else {
            Rgb::default()
        }
    }
}

impl Default for ColorGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Delay strategy between successive key-color writes.
///
/// Purely a throughput/reliability knob: it never affects packet contents,
/// only how many of them the controller manages to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pacing {
    /// Busy-spin for at least 0.8 ms. Fast enough for animation frames,
    /// at the cost of a pinned core and occasional missed key updates.
    Fast,
    /// Sleep for roughly 1 ms, yielding the scheduling quantum. Slower but
    /// every key lands; use for static scenes.
    Relaxed,
}

impl Pacing {
    /// Block until the delay for this strategy has elapsed.
    pub fn pause(self) {
        match self {
            // The sub-millisecond target is below reliable sleep
            // granularity, so this spins on the monotonic clock.
            Pacing::Fast => {
                let start = Instant::now();
                while start.elapsed() < Duration::from_micros(800) {
                    std::hint::spin_loop();
                }
            }
            Pacing::Relaxed => std::thread::sleep(Duration::from_millis(1)),
        }
    }
}

/// Paint `grid` onto the keyboard, one set-key-color packet per mapped cell.
///
/// Sequential and blocking, pacing included; the first write error aborts
/// the sweep. A grid whose cells all resolve to unmapped keys performs
/// zero writes.
pub fn apply_color_grid(
    writer: &dyn FeatureWriter,
    layout: &KeyLayout,
    grid: &ColorGrid,
    profile: Profile,
    pacing: Pacing,
) -> Result<()> {
    let mut sent = 0usize;
    for col in 0..GRID_COLUMNS {
        for row in 0..GRID_ROWS {
            let led = layout.led_at(col, row);
            let color = grid.get(col, row);
            let Some(packet) = encode_set_key_color(
                profile,
                led,
                color.r as i32,
                color.g as i32,
                color.b as i32,
            ) else {
                continue;
            };
            writer.write_feature(&packet)?;
            sent += 1;
            pacing.pause();
        }
    }
    debug!(sent, ?pacing, "color grid applied");
    Ok(())
}
