//! Fixtures shared by the session tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use scene::components::Geometry;
use serde_json::{Value, json};
use simulation::{
    BoxFuture, ReportRequest, SelfTestReport, ServiceError, ServiceResult, SimulateRequest,
    SimulationService,
};

use crate::session::Session;

pub fn square(size: f64) -> Geometry {
    Geometry::Polygon(vec![vec![
        [0.0, 0.0],
        [size, 0.0],
        [size, size],
        [0.0, size],
        [0.0, 0.0],
    ]])
}

/// A feature collection with one nested square per hour.
pub fn collection(hours: &[i64]) -> Value {
    let features: Vec<Value> = hours
        .iter()
        .map(|&h| {
            json!({
                "type": "Feature",
                "properties": {"hour": h},
                "geometry": serde_json::to_value(square(h as f64)).unwrap(),
            })
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features, "meta": {}})
}

/// A session that has completed one simulation over `hours`.
pub fn completed_session(hours: &[i64]) -> Session {
    let mut session = Session::default();
    session.perimeter_created(square(1.0));
    let pending = session.begin_simulation().unwrap();
    session
        .complete_simulation(pending, Ok(collection(hours)))
        .unwrap();
    session
}

/// In-memory service answering from queued responses.
///
/// Once the simulation queue is empty, each run answers with one square per
/// requested hour.
#[derive(Default)]
pub struct ScriptedService {
    simulations: Mutex<VecDeque<ServiceResult<Value>>>,
    reports: Mutex<VecDeque<ServiceResult<Vec<u8>>>>,
    latency: Duration,
    simulate_calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_simulation(self, outcome: ServiceResult<Value>) -> Self {
        self.simulations.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_report(self, outcome: ServiceResult<Vec<u8>>) -> Self {
        self.reports.lock().unwrap().push_back(outcome);
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn simulate_calls(&self) -> usize {
        self.simulate_calls.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn unscripted<T>() -> ServiceResult<T> {
    Err(ServiceError::status(503, "no scripted response"))
}

impl SimulationService for ScriptedService {
    fn simulate(&self, request: SimulateRequest) -> BoxFuture<'_, ServiceResult<Value>> {
        self.simulate_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.simulations.lock().unwrap().pop_front();
        Box::pin(async move {
            self.delay().await;
            outcome.unwrap_or_else(|| {
                let hours: Vec<i64> = (1..=i64::from(request.params.hours)).collect();
                Ok(collection(&hours))
            })
        })
    }

    fn report(&self, _request: ReportRequest) -> BoxFuture<'_, ServiceResult<Vec<u8>>> {
        let outcome = self.reports.lock().unwrap().pop_front();
        Box::pin(async move {
            self.delay().await;
            outcome.unwrap_or_else(unscripted)
        })
    }

    fn self_test(&self) -> BoxFuture<'_, ServiceResult<SelfTestReport>> {
        Box::pin(async move {
            self.delay().await;
            Ok(SelfTestReport {
                area_increasing: true,
                nested: true,
                areas_m2: vec![1.0, 4.0],
            })
        })
    }
}
