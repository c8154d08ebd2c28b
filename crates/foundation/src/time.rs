//! Hour and playback-rate primitives.

use std::time::Duration;

/// Elapsed simulated hours since ignition.
pub type Hour = u32;

/// Base timer period at speed 1.0.
pub const BASE_STEP_MS: f64 = 700.0;
/// Fastest allowed timer period.
pub const MIN_STEP_MS: f64 = 80.0;
/// Slowest allowed timer period, so deadlines stay representable.
pub const MAX_STEP_MS: f64 = 3_600_000.0;

/// Cursor readout text for an hour, e.g. `H+3`.
pub fn hour_label(hour: Hour) -> String {
    format!("H+{hour}")
}

/// Playback speed factor. Always finite and strictly positive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaybackSpeed(f64);

impl PlaybackSpeed {
    pub const NORMAL: PlaybackSpeed = PlaybackSpeed(1.0);

    /// Returns `None` for non-positive or non-finite factors.
    pub fn new(factor: f64) -> Option<Self> {
        (factor.is_finite() && factor > 0.0).then_some(PlaybackSpeed(factor))
    }

    /// Like [`PlaybackSpeed::new`] but falls back to normal speed.
    pub fn or_normal(factor: f64) -> Self {
        Self::new(factor).unwrap_or(Self::NORMAL)
    }

    pub fn factor(self) -> f64 {
        self.0
    }

    /// Auto-advance period: `max(80ms, 700ms / factor)`.
    pub fn step_period(self) -> Duration {
        let ms = (BASE_STEP_MS / self.0).clamp(MIN_STEP_MS, MAX_STEP_MS);
        Duration::from_micros((ms * 1000.0).round() as u64)
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self::NORMAL
    }
}
