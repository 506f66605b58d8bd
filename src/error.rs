use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    /// Missing depot or unknown location id.
    #[error("location not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Geocoding or road-routing collaborator failed.
    #[error("{service} unavailable: {reason}")]
    UpstreamUnavailable {
        service: &'static str,
        reason: String,
    },
}

impl CostError {
    pub(crate) fn upstream(service: &'static str, reason: impl Into<String>) -> Self {
        CostError::UpstreamUnavailable {
            service,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CostError>;
