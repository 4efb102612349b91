use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type RelayResult<T> = Result<T, RelayError>;

/// Everything that can go wrong while relaying one message.
///
/// The first two variants are the caller's fault and never reach the remote
/// store. The rest happen after validation, while talking to the remote.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Malformed request body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request has no message")]
    EmptyMessage,

    #[error("Cannot build outbound request: {0}")]
    OutboundBuild(String),

    #[error("Outbound request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Cannot read remote response: {0}")]
    ResponseRead(#[source] reqwest::Error),

    #[error("Remote rejected the write with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Relay task did not finish: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Decode(_) | RelayError::EmptyMessage => StatusCode::BAD_REQUEST,
            RelayError::OutboundBuild(_) | RelayError::TaskFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Transport(_)
            | RelayError::ResponseRead(_)
            | RelayError::Rejected { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// True when the request itself was at fault
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_client_error() {
            tracing::warn!(error = %self, "rejected request");
        } else {
            tracing::error!(error = %self, "relay failed");
        }

        // Only the reason phrase goes back; details stay in the log.
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}
