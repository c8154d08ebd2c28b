use foundation::bearing::wind_towards_deg;
use layers::{HourIndex, LayerSet};
use runtime::event_bus::EventBus;
use runtime::timer::TimerSlot;
use scene::components::Geometry;
use simulation::{SimulationParams, SimulationResult};
use tracing::debug;

use crate::controls::ControlState;
use crate::events::ViewEvent;
use crate::playback::PlaybackState;

/// All mutable state of one interactive session.
///
/// Every operation runs to completion on `&mut self`; nothing is shared.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) perimeter: Option<Geometry>,
    pub(crate) params: SimulationParams,
    pub(crate) controls: ControlState,
    pub(crate) result: Option<SimulationResult>,
    pub(crate) index: HourIndex,
    pub(crate) playback: PlaybackState,
    pub(crate) timer: TimerSlot,
    pub(crate) visible: LayerSet,
    /// Latest PNG capture of the map, sent along with report requests.
    pub(crate) map_snapshot: Vec<u8>,
    /// Bumped on every dispatched simulation.
    pub(crate) generation: u64,
    /// Runs up to this generation were invalidated by a reset; their
    /// responses are dropped.
    pub(crate) discarded_through: u64,
    pub(crate) events: EventBus<ViewEvent>,
}

impl Session {
    pub fn new(params: SimulationParams) -> Self {
        let mut controls = ControlState::default();
        controls.apply_weather_toggle(params.use_meteo);
        Self {
            params,
            controls,
            ..Self::default()
        }
    }

    pub fn perimeter(&self) -> Option<&Geometry> {
        self.perimeter.as_ref()
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn index(&self) -> &HourIndex {
        &self.index
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn timer(&self) -> &TimerSlot {
        &self.timer
    }

    pub fn visible(&self) -> &LayerSet {
        &self.visible
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn events(&self) -> &EventBus<ViewEvent> {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        self.events.drain_events()
    }

    /// Replaces the perimeter with a newly drawn one.
    pub fn perimeter_created(&mut self, geometry: Geometry) {
        self.reset_results();
        self.perimeter = Some(geometry);
    }

    pub fn perimeter_edited(&mut self, geometry: Geometry) {
        self.perimeter = Some(geometry);
        self.reset_results();
    }

    pub fn perimeter_deleted(&mut self) {
        self.perimeter = None;
        self.reset_results();
    }

    /// Drops the perimeter along with any result.
    pub fn clear(&mut self) {
        self.perimeter_deleted();
    }

    pub fn update_params(&mut self, params: SimulationParams) {
        self.controls.apply_weather_toggle(params.use_meteo);
        self.events.emit(ViewEvent::Controls(self.controls));
        self.events.emit(ViewEvent::WindCompass {
            from_deg: params.wind_deg,
            towards_deg: wind_towards_deg(params.wind_deg),
        });
        self.params = params;
    }

    pub fn set_map_snapshot(&mut self, png: Vec<u8>) {
        self.map_snapshot = png;
    }

    /// Invalidates the result, any run still in flight, and every piece of
    /// temporal state derived from them. The perimeter and parameters are
    /// kept.
    pub fn reset_results(&mut self) {
        debug!(had_result = self.result.is_some(), "resetting results");
        self.discarded_through = self.generation;
        self.result = None;
        self.index = HourIndex::empty();
        self.visible.clear();
        self.set_max(0);
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>) {
        self.events.emit(ViewEvent::Notification(message.into()));
    }

    pub(crate) fn emit_controls(&mut self) {
        self.events.emit(ViewEvent::Controls(self.controls));
    }
}
