use foundation::bounds::GeoBounds;
use foundation::time::Hour;
use layers::legend::Legend;
use simulation::Download;

use crate::controls::ControlState;

/// Padding applied when the map is fitted to a result, in pixels.
pub const FIT_PADDING_PX: [u32; 2] = [20, 20];

/// Which playback button the timeline shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackAffordance {
    /// Stopped; the play button is shown.
    Paused,
    /// Running; the pause button is shown.
    Playing,
}

/// Side effects a session asks the UI to perform, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Cursor readout text, e.g. `H+3`.
    CursorLabel(String),
    /// Timeline slider bounds and position.
    Timeline { max: Hour, value: Hour },
    Playback(PlaybackAffordance),
    FitBounds {
        bounds: GeoBounds,
        padding_px: [u32; 2],
    },
    Legend(Legend),
    SlopeInfo(String),
    WeatherInfo(String),
    WindCompass { from_deg: f64, towards_deg: f64 },
    Controls(ControlState),
    /// Blocking message for the user.
    Notification(String),
    Download(Download),
    SimulationFinished { succeeded: bool },
}
