use chrono::Utc;
use serde_json::Value;
use std::fmt;
use tracing::error;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// Errors surfaced to addon callers.
#[derive(Debug, thiserror::Error)]
pub enum AddonError {
    #[error("Invalid TMDB ID format: {0}")]
    InvalidIdentifierFormat(String),

    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    #[error("Error in {context}: {message}")]
    UpstreamOperationFailed {
        context: OperationContext,
        message: String,
    },
}

/// Which addon handler an upstream call was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationContext {
    Catalog,
    Meta,
}

impl OperationContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationContext::Catalog => "catalog",
            OperationContext::Meta => "meta",
        }
    }
}

impl fmt::Display for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed TMDB call. `status` is absent for transport, timeout and decode failures.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct UpstreamError {
    pub status: Option<u16>,
    pub message: String,
    pub body: Option<Value>,
}

impl UpstreamError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            body: None,
        }
    }

    pub fn http(status: u16, body: Option<Value>) -> Self {
        Self {
            status: Some(status),
            message: format!("Request failed with status code {}", status),
            body,
        }
    }
}

/// Logs the failure and turns it into the caller-facing error.
pub fn classify(err: UpstreamError, context: OperationContext) -> AddonError {
    let data = err
        .body
        .as_ref()
        .map(|body| body.to_string())
        .unwrap_or_default();
    error!(
        context = %context,
        timestamp = %Utc::now().to_rfc3339(),
        status = ?err.status,
        data = %data,
        "{}",
        err.message
    );

    if err.status == Some(429) {
        return AddonError::RateLimited;
    }
    AddonError::UpstreamOperationFailed {
        context,
        message: err.message,
    }
}
