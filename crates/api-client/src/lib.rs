/// Client for the screenplay analysis service
///
/// Every [`AnalysisApi`] method performs exactly one HTTP call; the only
/// repetition is the explicit job polling in [`poll::wait_for_job`].
use serde_json::Value;
use std::path::Path;

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod poll;
pub mod wire;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, GENERIC_FAILURE};
pub use mock::{MockApi, MockCall, MockReply};
pub use poll::{wait_for_job, PollPolicy};
pub use wire::{AnalysisResponse, JobId, JobRecord, JobState};

/// Title sent with pasted text when none is given.
pub const DEFAULT_TITLE: &str = "Screenplay";

/// Operations of the analysis service.
#[async_trait::async_trait]
pub trait AnalysisApi: Send + Sync {
    /// `POST /analyze` with raw script text
    async fn analyze(&self, script_text: &str, title: &str)
        -> Result<AnalysisResponse, ClientError>;

    /// `POST /upload` with the file at `path` as multipart
    async fn upload_file(
        &self,
        path: &Path,
        title: Option<&str>,
    ) -> Result<AnalysisResponse, ClientError>;

    /// `GET /jobs/{id}`
    async fn get_job(&self, job_id: &JobId) -> Result<JobRecord, ClientError>;

    /// `GET /health`
    async fn health(&self) -> Result<Value, ClientError>;

    /// `GET /export/{id}/pdf`
    async fn export_pdf(&self, job_id: &JobId) -> Result<Vec<u8>, ClientError>;
}
