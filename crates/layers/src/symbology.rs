use std::fmt;

use foundation::time::Hour;

/// Hue at fraction 0 (earliest hour): warm orange.
pub const HUE_START_DEG: f64 = 20.0;
/// Hue span covered from fraction 0 to 1; ends on a cool violet.
pub const HUE_SPAN_DEG: f64 = 300.0;
pub const SATURATION_PCT: u8 = 90;
pub const LIGHTNESS_PCT: u8 = 55;

/// An HSL color, displayed in CSS notation: `hsl(140, 90%, 55%)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hsl {
    pub hue_deg: f64,
    pub saturation_pct: u8,
    pub lightness_pct: u8,
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue_deg, self.saturation_pct, self.lightness_pct
        )
    }
}

/// Maps a normalized time fraction to its isochrone color.
///
/// Total: the fraction is clamped to `[0, 1]` and non-finite input is
/// treated as 0. Hue grows linearly with the fraction, so colors never
/// invert order. Both the map styling and the legend go through here.
pub fn color_for(fraction: f64) -> Hsl {
    let t = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Hsl {
        hue_deg: HUE_START_DEG + HUE_SPAN_DEG * t,
        saturation_pct: SATURATION_PCT,
        lightness_pct: LIGHTNESS_PCT,
    }
}

/// `hour / max(1, max_hour)`.
pub fn hour_fraction(hour: Hour, max_hour: Hour) -> f64 {
    f64::from(hour) / f64::from(max_hour.max(1))
}

/// How strongly an isochrone is drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Emphasis {
    /// Freshly indexed, not yet composited.
    Base,
    /// An hour already passed by the cursor.
    Trail,
    /// The hour under the cursor.
    Current,
}

impl Emphasis {
    pub fn weight_px(self) -> f64 {
        match self {
            Emphasis::Base => 2.0,
            Emphasis::Trail => 1.5,
            Emphasis::Current => 3.0,
        }
    }

    pub fn fill_opacity(self) -> f64 {
        match self {
            Emphasis::Base => 0.08,
            Emphasis::Trail => 0.05,
            Emphasis::Current => 0.12,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PolygonStyle {
    pub color: Hsl,
    pub weight_px: f64,
    pub fill_opacity: f64,
    pub emphasis: Emphasis,
}

impl PolygonStyle {
    pub fn new(color: Hsl, emphasis: Emphasis) -> Self {
        Self {
            color,
            weight_px: emphasis.weight_px(),
            fill_opacity: emphasis.fill_opacity(),
            emphasis,
        }
    }

    pub fn for_hour(hour: Hour, max_hour: Hour, emphasis: Emphasis) -> Self {
        Self::new(color_for(hour_fraction(hour, max_hour)), emphasis)
    }
}
