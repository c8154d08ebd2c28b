//! Simulation service abstraction.
//!
//! [`SimulationService`] is the network boundary of the client. The HTTP
//! implementation talks to the FeuCast backend; tests substitute in-memory
//! services.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ServiceError, ServiceResult};
use crate::protocol::{
    REPORT_PATH, ReportRequest, SELFTEST_PATH, SIMULATE_PATH, SelfTestReport, SimulateRequest,
};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote simulation backend.
///
/// Methods return boxed futures for dyn-compatibility. Each call issues
/// exactly one request; there are no retries.
pub trait SimulationService: Send + Sync {
    /// Runs a simulation and returns the raw response document.
    fn simulate(&self, request: SimulateRequest) -> BoxFuture<'_, ServiceResult<Value>>;

    /// Renders a report document (PDF bytes).
    fn report(&self, request: ReportRequest) -> BoxFuture<'_, ServiceResult<Vec<u8>>>;

    fn self_test(&self) -> BoxFuture<'_, ServiceResult<SelfTestReport>>;
}

#[derive(Debug, Clone)]
pub struct HttpSimulationService {
    base_url: String,
    http: reqwest::Client,
}

impl HttpSimulationService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ServiceResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn ensure_success(resp: reqwest::Response) -> ServiceResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    error!(status = status.as_u16(), "simulation service returned an error");
    Err(ServiceError::status(status.as_u16(), body))
}

impl SimulationService for HttpSimulationService {
    fn simulate(&self, request: SimulateRequest) -> BoxFuture<'_, ServiceResult<Value>> {
        Box::pin(async move {
            let url = self.url(SIMULATE_PATH);
            debug!(%url, hours = request.params.hours, "POST simulate");
            let resp = self.http.post(&url).json(&request).send().await?;
            let bytes = ensure_success(resp).await?.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        })
    }

    fn report(&self, request: ReportRequest) -> BoxFuture<'_, ServiceResult<Vec<u8>>> {
        Box::pin(async move {
            let url = self.url(REPORT_PATH);
            debug!(%url, "POST report");
            let resp = self.http.post(&url).json(&request).send().await?;
            let bytes = ensure_success(resp).await?.bytes().await?;
            Ok(bytes.to_vec())
        })
    }

    fn self_test(&self) -> BoxFuture<'_, ServiceResult<SelfTestReport>> {
        Box::pin(async move {
            let url = self.url(SELFTEST_PATH);
            debug!(%url, "GET selftest");
            let resp = self.http.get(&url).send().await?;
            let bytes = ensure_success(resp).await?.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        })
    }
}
