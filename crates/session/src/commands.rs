//! User gestures as commands, and the control table that produces them.

use scene::components::Geometry;
use simulation::{ReportRequest, SimulationParams};
use tracing::{debug, warn};

use crate::orchestrator::PendingRun;
use crate::session::Session;

/// One user gesture or collaborator notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UpdateParams(SimulationParams),
    PerimeterCreated(Geometry),
    PerimeterEdited(Geometry),
    PerimeterDeleted,
    /// PNG capture of the map surface for the next report.
    MapSnapshot(Vec<u8>),
    Clear,
    Simulate,
    Seek(i64),
    First,
    Last,
    Prev,
    Next,
    Play,
    Pause,
    ChangeSpeed(f64),
    ExportGeoJson,
    ExportReport,
    SelfTest,
}

/// Remote work requested by a command, to be carried out by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Simulate(PendingRun),
    Report(ReportRequest),
    SelfTest,
}

/// How a control's value becomes a command.
#[derive(Debug, Copy, Clone)]
pub enum Binding {
    Fixed(fn() -> Command),
    /// The control's value is parsed as a number; `fallback` stands in for
    /// a missing or unparsable value, otherwise the event is dropped.
    Valued {
        make: fn(f64) -> Command,
        fallback: Option<f64>,
    },
}

/// Timeline and toolbar controls, by element id.
pub const BINDINGS: &[(&str, Binding)] = &[
    ("tl-first", Binding::Fixed(|| Command::First)),
    ("tl-last", Binding::Fixed(|| Command::Last)),
    ("tl-prev", Binding::Fixed(|| Command::Prev)),
    ("tl-next", Binding::Fixed(|| Command::Next)),
    ("tl-play", Binding::Fixed(|| Command::Play)),
    ("tl-pause", Binding::Fixed(|| Command::Pause)),
    (
        "tl-range",
        Binding::Valued {
            make: |v| Command::Seek(v.trunc() as i64),
            fallback: None,
        },
    ),
    (
        "tl-speed",
        Binding::Valued {
            make: Command::ChangeSpeed,
            fallback: Some(1.0),
        },
    ),
    ("btn-simulate", Binding::Fixed(|| Command::Simulate)),
    ("btn-clear", Binding::Fixed(|| Command::Clear)),
    ("btn-export-geojson", Binding::Fixed(|| Command::ExportGeoJson)),
    ("btn-export-pdf", Binding::Fixed(|| Command::ExportReport)),
    ("btn-selftest", Binding::Fixed(|| Command::SelfTest)),
];

/// Looks up the command for a control event.
pub fn command_for(control: &str, value: Option<&str>) -> Option<Command> {
    let (_, binding) = BINDINGS.iter().find(|(id, _)| *id == control)?;
    match *binding {
        Binding::Fixed(make) => Some(make()),
        Binding::Valued { make, fallback } => {
            let parsed = value.and_then(|v| v.trim().parse::<f64>().ok());
            let Some(v) = parsed.or(fallback) else {
                warn!(control, ?value, "ignoring non-numeric control value");
                return None;
            };
            Some(make(v))
        }
    }
}

impl Session {
    /// Applies one command. Remote work is returned rather than performed.
    pub fn dispatch(&mut self, command: Command) -> Effect {
        debug!(?command, "dispatch");
        match command {
            Command::UpdateParams(params) => self.update_params(params),
            Command::PerimeterCreated(geometry) => self.perimeter_created(geometry),
            Command::PerimeterEdited(geometry) => self.perimeter_edited(geometry),
            Command::PerimeterDeleted => self.perimeter_deleted(),
            Command::MapSnapshot(png) => self.set_map_snapshot(png),
            Command::Clear => self.clear(),
            Command::Simulate => {
                return match self.begin_simulation() {
                    Ok(pending) => Effect::Simulate(pending),
                    Err(_) => Effect::None,
                };
            }
            Command::Seek(hour) => self.seek(hour),
            Command::First => self.first(),
            Command::Last => self.last(),
            Command::Prev => self.prev(),
            Command::Next => self.next(),
            Command::Play => {
                self.play();
            }
            Command::Pause => self.pause(),
            Command::ChangeSpeed(factor) => self.change_speed(factor),
            Command::ExportGeoJson => {
                let _ = self.export_geojson();
            }
            Command::ExportReport => {
                return match self.prepare_report() {
                    Ok(request) => Effect::Report(request),
                    Err(_) => Effect::None,
                };
            }
            Command::SelfTest => return Effect::SelfTest,
        }
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::{BINDINGS, Command, Effect, command_for};
    use crate::session::Session;
    use crate::testing::{completed_session, square};
    use pretty_assertions::assert_eq;

    #[test]
    fn every_control_maps_to_a_command() {
        let expected = [
            ("tl-first", Some("1"), Command::First),
            ("tl-last", None, Command::Last),
            ("tl-prev", None, Command::Prev),
            ("tl-next", None, Command::Next),
            ("tl-play", None, Command::Play),
            ("tl-pause", None, Command::Pause),
            ("tl-range", Some("4"), Command::Seek(4)),
            ("tl-speed", Some("2.5"), Command::ChangeSpeed(2.5)),
            ("btn-simulate", None, Command::Simulate),
            ("btn-clear", None, Command::Clear),
            ("btn-export-geojson", None, Command::ExportGeoJson),
            ("btn-export-pdf", None, Command::ExportReport),
            ("btn-selftest", None, Command::SelfTest),
        ];
        assert_eq!(expected.len(), BINDINGS.len());
        for (control, value, command) in expected {
            assert_eq!(command_for(control, value), Some(command), "{control}");
        }
    }

    #[test]
    fn unknown_controls_and_bad_values() {
        assert_eq!(command_for("tl-rewind", None), None);
        assert_eq!(command_for("tl-range", Some("abc")), None);
        assert_eq!(command_for("tl-range", None), None);
        assert_eq!(command_for("tl-speed", Some("")), Some(Command::ChangeSpeed(1.0)));
    }

    #[test]
    fn simulate_without_perimeter_has_no_effect() {
        let mut session = Session::default();
        assert_eq!(session.dispatch(Command::Simulate), Effect::None);
    }

    #[test]
    fn simulate_returns_the_pending_run() {
        let mut session = Session::default();
        session.dispatch(Command::PerimeterCreated(square(1.0)));
        match session.dispatch(Command::Simulate) {
            Effect::Simulate(pending) => assert_eq!(pending.generation, 1),
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn timeline_commands_drive_playback() {
        let mut session = completed_session(&[1, 2, 3]);
        session.dispatch(command_for("tl-first", None).unwrap());
        assert_eq!(session.playback().cursor, 1);
        session.dispatch(command_for("tl-next", None).unwrap());
        assert_eq!(session.playback().cursor, 2);
        session.dispatch(command_for("tl-range", Some("3")).unwrap());
        assert_eq!(session.playback().cursor, 3);
        session.dispatch(Command::First);
        session.dispatch(Command::Play);
        assert!(session.playback().playing);
        session.dispatch(Command::Pause);
        assert!(!session.playback().playing);
    }

    #[test]
    fn report_and_self_test_are_deferred() {
        let mut session = completed_session(&[1]);
        session.dispatch(Command::MapSnapshot(vec![1, 2, 3]));
        assert!(matches!(
            session.dispatch(Command::ExportReport),
            Effect::Report(_)
        ));
        assert_eq!(session.dispatch(Command::SelfTest), Effect::SelfTest);
        assert_eq!(Session::default().dispatch(Command::ExportReport), Effect::None);
    }
}
