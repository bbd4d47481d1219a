//! Error taxonomy for talking to the transaction backend.

/// Errors produced by the gateway and the typed operations over it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Network failure or unreachable service. Retryable; surfaced with a
    /// generic message and the triggering action stays available.
    #[error("Could not reach the transaction service. Please try again.")]
    Transport(String),

    /// The backend answered with a non-success status. Surfaced verbatim
    /// when the backend supplied a message; never retried automatically.
    #[error("{message}")]
    Application { status: i64, message: String },

    /// The response did not match the envelope or operation shape.
    /// Treated like a transport failure for surfacing purposes.
    #[error("The transaction service returned an unexpected response.")]
    Malformed(String),
}

impl GatewayError {
    /// Only pure transport failures are eligible for automatic retry;
    /// application-level rejections never are.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }

    pub fn application(status: i64, message: Option<String>) -> Self {
        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => format!("The request was rejected by the service (status {status})"),
        };
        GatewayError::Application { status, message }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        GatewayError::Malformed(detail.into())
    }
}
