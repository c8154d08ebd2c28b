use thiserror::Error;

/// Failure talking to the simulation service.
///
/// `Display` is what the user sees: a non-success response shows the
/// service's body verbatim.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    /// Non-success response; an empty body is replaced by the status line.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let body = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body
        };
        ServiceError::Status { status, body }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
