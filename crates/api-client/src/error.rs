use analysis::ModelError;
use serde_json::Value;
use thiserror::Error;

/// Shown when an error carries no usable message.
pub const GENERIC_FAILURE: &str = "Analysis failed. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request failed with status code {status}")]
    Http { status: u16, detail: Option<String> },
    #[error("Invalid response format")]
    InvalidResponseFormat,
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid analysis payload: {0}")]
    Model(#[from] ModelError),
    #[error("job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },
    #[error("job {job_id} still pending after {attempts} poll(s)")]
    JobTimedOut { job_id: String, attempts: u32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Message for the error banner: the server's `detail` when there is
    /// one, otherwise the error's own message, otherwise a generic line.
    pub fn user_message(&self) -> String {
        if let ClientError::Http {
            detail: Some(detail),
            ..
        } = self
        {
            if !detail.trim().is_empty() {
                return detail.clone();
            }
        }

        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Pulls a human readable detail out of an error body.
///
/// FastAPI style bodies carry `detail` (a string, or a list of validation
/// errors); others use `error`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail").or_else(|| value.get("error"))?;
    match detail {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
