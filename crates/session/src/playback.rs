//! Timeline cursor and auto-advance.

use foundation::time::{Hour, PlaybackSpeed, hour_label};
use layers::show_up_to;
use runtime::timer::TimerToken;
use tracing::{debug, warn};

use crate::events::{PlaybackAffordance, ViewEvent};
use crate::session::Session;

/// Cursor position over `[1, max_hour]` and the auto-advance settings.
///
/// With `max_hour == 0` there is nothing to show: the cursor sits at 1 and
/// playback cannot start.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaybackState {
    pub cursor: Hour,
    pub max_hour: Hour,
    pub playing: bool,
    pub speed: PlaybackSpeed,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            cursor: 1,
            max_hour: 0,
            playing: false,
            speed: PlaybackSpeed::NORMAL,
        }
    }
}

impl PlaybackState {
    /// Clamps a requested hour into the timeline.
    pub fn clamp(&self, hour: i64) -> Hour {
        if self.max_hour == 0 {
            return 1;
        }
        hour.clamp(1, i64::from(self.max_hour)) as Hour
    }
}

impl Session {
    /// Resets the timeline to `[1, max_hour]` with the cursor at the end.
    pub fn set_max(&mut self, max_hour: Hour) {
        self.timer.cancel();
        self.playback.playing = false;
        self.playback.max_hour = max_hour;
        self.playback.cursor = max_hour.max(1);
        self.emit_timeline();
        self.events
            .emit(ViewEvent::Playback(PlaybackAffordance::Paused));
        self.events
            .emit(ViewEvent::CursorLabel(hour_label(self.playback.cursor)));
    }

    /// Moves the cursor on user request. Stops auto-advance first.
    pub fn seek(&mut self, hour: i64) {
        if self.playback.playing {
            self.pause();
        }
        self.goto(hour);
    }

    pub fn first(&mut self) {
        self.seek(1);
    }

    pub fn last(&mut self) {
        self.seek(i64::from(self.playback.max_hour));
    }

    pub fn prev(&mut self) {
        self.seek(i64::from(self.playback.cursor) - 1);
    }

    pub fn next(&mut self) {
        self.seek(i64::from(self.playback.cursor) + 1);
    }

    /// Starts auto-advance. Returns the token of the new timer, or `None`
    /// when there is nothing to play.
    pub fn play(&mut self) -> Option<TimerToken> {
        if self.playback.max_hour == 0 {
            debug!("nothing to play");
            return None;
        }
        let token = self.timer.start(self.playback.speed.step_period());
        self.playback.playing = true;
        self.events
            .emit(ViewEvent::Playback(PlaybackAffordance::Playing));
        Some(token)
    }

    pub fn pause(&mut self) {
        self.timer.cancel();
        self.playback.playing = false;
        self.events
            .emit(ViewEvent::Playback(PlaybackAffordance::Paused));
    }

    /// Invalid factors fall back to normal speed. A running timer is
    /// restarted with the new period.
    pub fn change_speed(&mut self, factor: f64) {
        let speed = PlaybackSpeed::new(factor).unwrap_or_else(|| {
            warn!(factor, "invalid playback speed, using 1.0");
            PlaybackSpeed::NORMAL
        });
        self.playback.speed = speed;
        if self.playback.playing {
            self.timer.start(speed.step_period());
        }
    }

    /// Handles one auto-advance tick. Ticks from a replaced or cancelled
    /// timer are ignored and return `false`.
    pub fn tick(&mut self, token: TimerToken) -> bool {
        if !self.timer.is_live(token) {
            debug!(token = token.0, "ignoring stale tick");
            return false;
        }
        let cursor = self.playback.cursor;
        if cursor >= self.playback.max_hour {
            self.pause();
        } else {
            debug!(cursor = cursor + 1, "advancing");
            self.goto(i64::from(cursor) + 1);
        }
        true
    }

    /// Moves the cursor without touching the timer.
    fn goto(&mut self, hour: i64) {
        let cursor = self.playback.clamp(hour);
        self.playback.cursor = cursor;
        self.emit_timeline();
        self.render(cursor);
    }

    /// Redraws the overlay for `hour` and updates the readout.
    pub(crate) fn render(&mut self, hour: Hour) -> bool {
        let drawn = show_up_to(&mut self.index, &mut self.visible, hour);
        if drawn {
            self.events.emit(ViewEvent::CursorLabel(hour_label(hour)));
        }
        drawn
    }

    fn emit_timeline(&mut self) {
        self.events.emit(ViewEvent::Timeline {
            max: self.playback.max_hour.max(1),
            value: self.playback.cursor,
        });
    }
}
