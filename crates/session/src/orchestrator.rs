//! Simulation runs, exports and self-tests.
//!
//! Remote calls are split into a synchronous `begin_*` half that validates and
//! builds the request and a `finish_*`/`complete_*` half that ingests the
//! outcome, so an event loop can keep handling input while a call is in
//! flight.

use foundation::bounds::GeoBounds;
use layers::{HourIndex, Legend};
use serde_json::Value;
use simulation::{
    Download, ReportRequest, SelfTestReport, ServiceError, ServiceResult, SimulateRequest,
    SimulationParams, SimulationResult, SimulationService, slope_advisory, weather_advisory,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::controls::ButtonState;
use crate::events::{FIT_PADDING_PX, ViewEvent};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Draw a perimeter first.")]
    MissingPerimeter,

    #[error("Run a simulation first.")]
    NoResult,

    #[error("{0}")]
    Remote(#[from] ServiceError),

    /// A newer simulation or a perimeter change happened before this run
    /// completed.
    #[error("superseded by a newer simulation or perimeter change")]
    Superseded,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// A dispatched simulation awaiting its response.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRun {
    pub generation: u64,
    pub request: SimulateRequest,
}

impl Session {
    /// Validates the perimeter, resets temporal state and builds the request.
    ///
    /// Without a perimeter nothing is reset and no request is produced.
    pub fn begin_simulation(&mut self) -> SessionResult<PendingRun> {
        let Some(perimeter) = self.perimeter.clone() else {
            self.notify(SessionError::MissingPerimeter.to_string());
            return Err(SessionError::MissingPerimeter);
        };
        self.reset_results();
        self.controls.apply_derived_inputs(&self.params);
        self.controls.simulate = ButtonState::Busy;
        self.emit_controls();
        self.generation += 1;
        info!(
            generation = self.generation,
            hours = self.params.hours,
            use_dem = self.params.use_dem,
            use_meteo = self.params.use_meteo,
            "dispatching simulation"
        );
        Ok(PendingRun {
            generation: self.generation,
            request: SimulateRequest {
                perimeter,
                params: self.params.clone(),
            },
        })
    }

    /// Ingests the outcome of a run started by [`Session::begin_simulation`].
    pub fn complete_simulation(
        &mut self,
        pending: PendingRun,
        outcome: ServiceResult<Value>,
    ) -> SessionResult<&SimulationResult> {
        if pending.generation != self.generation {
            warn!(
                generation = pending.generation,
                current = self.generation,
                "discarding superseded simulation response"
            );
            return Err(SessionError::Superseded);
        }
        if pending.generation <= self.discarded_through {
            warn!(
                generation = pending.generation,
                "discarding simulation response for a changed perimeter"
            );
            self.controls.simulate = ButtonState::Idle;
            self.emit_controls();
            self.events
                .emit(ViewEvent::SimulationFinished { succeeded: false });
            return Err(SessionError::Superseded);
        }
        let parsed = outcome.and_then(|raw| Ok(SimulationResult::from_json(raw)?));
        self.controls.simulate = ButtonState::Idle;
        match parsed {
            Ok(result) => {
                self.ingest(result, &pending.request.params);
                self.emit_controls();
                self.events
                    .emit(ViewEvent::SimulationFinished { succeeded: true });
                self.result.as_ref().ok_or(SessionError::NoResult)
            }
            Err(err) => {
                error!(%err, "simulation failed");
                self.notify(format!("API error: {err}"));
                self.emit_controls();
                self.events
                    .emit(ViewEvent::SimulationFinished { succeeded: false });
                Err(err.into())
            }
        }
    }

    /// Runs a whole simulation against `service`.
    pub async fn run_simulation(
        &mut self,
        service: &dyn SimulationService,
    ) -> SessionResult<&SimulationResult> {
        let pending = self.begin_simulation()?;
        let outcome = service.simulate(pending.request.clone()).await;
        self.complete_simulation(pending, outcome)
    }

    fn ingest(&mut self, result: SimulationResult, params: &SimulationParams) {
        let meta = result.meta();
        self.events
            .emit(ViewEvent::SlopeInfo(slope_advisory(&meta, params)));
        self.events
            .emit(ViewEvent::WeatherInfo(weather_advisory(&meta, params)));

        self.index = HourIndex::build(result.hour_features());
        self.result = Some(result);
        let max_hour = self.index.max_hour();
        self.set_max(max_hour);
        self.seek(i64::from(max_hour));

        if let Some(bounds) = self.visible.bounds().filter(GeoBounds::is_valid) {
            self.events.emit(ViewEvent::FitBounds {
                bounds,
                padding_px: FIT_PADDING_PX,
            });
        }
        self.events
            .emit(ViewEvent::Legend(Legend::for_max_hour(max_hour)));
        info!(
            max_hour,
            indexed = self.index.len(),
            "simulation result ingested"
        );
    }

    /// Offers the last result as a GeoJSON download.
    pub fn export_geojson(&mut self) -> SessionResult<Download> {
        let Some(result) = &self.result else {
            self.notify(SessionError::NoResult.to_string());
            return Err(SessionError::NoResult);
        };
        let download = Download::geojson(result).map_err(ServiceError::from)?;
        info!(bytes = download.bytes.len(), "exporting isochrones");
        self.events.emit(ViewEvent::Download(download.clone()));
        Ok(download)
    }

    /// Builds a report request from the current parameters and map snapshot.
    pub fn prepare_report(&mut self) -> SessionResult<ReportRequest> {
        if self.result.is_none() {
            self.notify(SessionError::NoResult.to_string());
            return Err(SessionError::NoResult);
        }
        info!(snapshot_bytes = self.map_snapshot.len(), "requesting report");
        Ok(ReportRequest::new(self.params.clone(), &self.map_snapshot))
    }

    pub fn finish_report(&mut self, outcome: ServiceResult<Vec<u8>>) -> SessionResult<Download> {
        match outcome {
            Ok(pdf) => {
                let download = Download::report(pdf);
                info!(bytes = download.bytes.len(), "report received");
                self.events.emit(ViewEvent::Download(download.clone()));
                Ok(download)
            }
            Err(err) => {
                error!(%err, "report failed");
                self.notify(format!("PDF error: {err}"));
                Err(err.into())
            }
        }
    }

    pub async fn export_report(
        &mut self,
        service: &dyn SimulationService,
    ) -> SessionResult<Download> {
        let request = self.prepare_report()?;
        let outcome = service.report(request).await;
        self.finish_report(outcome)
    }

    /// Surfaces the service self-test verdicts.
    pub fn finish_self_test(
        &mut self,
        outcome: ServiceResult<SelfTestReport>,
    ) -> SessionResult<SelfTestReport> {
        match outcome {
            Ok(report) => {
                info!(passed = report.passed(), "self-test finished");
                self.notify(report.summary());
                Ok(report)
            }
            Err(err) => {
                error!(%err, "self-test failed");
                self.notify("Self-test failed");
                Err(err.into())
            }
        }
    }

    pub async fn self_test(
        &mut self,
        service: &dyn SimulationService,
    ) -> SessionResult<SelfTestReport> {
        let outcome = service.self_test().await;
        self.finish_self_test(outcome)
    }
}
