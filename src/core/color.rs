//! Three-segment color ramp for the visit-count choropleth

use serde::Serialize;

/// 8-bit RGBA color as handed to the render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }
}

/// Alpha applied to every cell
pub const CELL_ALPHA: u8 = 200;

const LOW_BREAK: f64 = 0.33;
const HIGH_BREAK: f64 = 0.66;

/// Map a value and the dataset maximum to a cell color
///
/// blue -> cyan below 0.33, cyan -> yellow up to 0.66, orange -> red above.
/// A non-positive `max` (or a NaN ratio) paints the ratio 0 color. The ratio
/// is clamped to `[0, 1]` so malformed values land on the ramp ends.
pub fn color_for(value: f64, max: f64) -> Rgba {
    let ratio = if max > 0.0 { value / max } else { 0.0 };
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };

    if ratio < LOW_BREAK {
        let t = ratio / LOW_BREAK;
        Rgba::new(0, channel(255.0 * t), 255, CELL_ALPHA)
    } else if ratio < HIGH_BREAK {
        let t = (ratio - LOW_BREAK) / (HIGH_BREAK - LOW_BREAK);
        Rgba::new(255, channel(255.0 * (1.0 - t)), 0, CELL_ALPHA)
    } else {
        let t = (ratio - HIGH_BREAK) / (1.0 - HIGH_BREAK);
        Rgba::new(255, channel(128.0 * (1.0 - t)), 0, CELL_ALPHA)
    }
}

fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
