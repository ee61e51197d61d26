/// Orchestrates uploads, selection and exports around one [`Session`]
use crate::reconcile::analyze_upload;
use crate::state::{Applied, Generation, ScriptInfo, Session};
use crate::upload::{prepare_upload, Upload};
use crate::SessionError;
use analysis::BeatRef;
use api_client::{AnalysisApi, ClientError, PollPolicy};
use exporters::ExportError;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// PDF export failures. Reported to the user separately from the
/// analysis error banner.
#[derive(Debug, Error)]
pub enum PdfExportError {
    #[error("No analysis job to export")]
    NoJob,
    #[error("Failed to export PDF: {}", .0.user_message())]
    Download(#[from] ClientError),
    #[error("Failed to export PDF: {0}")]
    Write(#[from] ExportError),
}

pub struct Workbench {
    api: Arc<dyn AnalysisApi>,
    session: Mutex<Session>,
    policy: PollPolicy,
}

impl Workbench {
    pub fn new(api: Arc<dyn AnalysisApi>, policy: PollPolicy) -> Self {
        Self {
            api,
            session: Mutex::new(Session::new()),
            policy,
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    /// Reads the selected files and submits them. A rejected selection is
    /// reported to the caller and leaves the session untouched.
    pub async fn submit_files(&self, paths: &[PathBuf]) -> Result<Applied, SessionError> {
        let upload = prepare_upload(paths).await?;
        Ok(self.submit(upload).await)
    }

    /// Submits an already prepared upload.
    pub async fn submit(&self, upload: Upload) -> Applied {
        let generation = self.session.lock().begin();
        self.run(generation, upload).await
    }

    async fn run(&self, generation: Generation, upload: Upload) -> Applied {
        let script = ScriptInfo {
            title: upload.title().to_string(),
            text: upload.script_text().map(str::to_string),
            length: upload.script_length(),
        };

        let outcome = analyze_upload(self.api.as_ref(), &upload, &self.policy).await;
        self.session.lock().apply(generation, script, outcome)
    }

    pub fn select_beat(&self, raw: &str) -> Result<BeatRef, SessionError> {
        self.session.lock().select_beat(raw)
    }

    /// Writes the full session JSON.
    pub fn export_session_json(&self, dest: &Path) -> Result<PathBuf, SessionError> {
        let session = self.session.lock();
        let result = session.result().ok_or(SessionError::NoResult)?;
        Ok(exporters::export_session(
            result,
            session.script().length,
            dest,
        )?)
    }

    /// Writes the selected beat with its scene.
    pub fn export_selected_beat(&self, dest: &Path) -> Result<PathBuf, SessionError> {
        let session = self.session.lock();
        let result = session.result().ok_or(SessionError::NoResult)?;
        let at = session.selected().ok_or(SessionError::NoSelection)?;
        Ok(exporters::export_beat(result, at, dest)?)
    }

    /// Downloads the server-rendered PDF for the current job.
    pub async fn export_pdf(&self, dest: &Path) -> Result<PathBuf, PdfExportError> {
        let (job_id, title) = {
            let session = self.session.lock();
            let job_id = session.job_id().cloned().ok_or(PdfExportError::NoJob)?;
            (job_id, session.script().title.clone())
        };

        let outcome = async {
            let bytes = self.api.export_pdf(&job_id).await?;
            let path = exporters::save_pdf(&bytes, Some(title.as_str()), dest)?;
            Ok::<_, PdfExportError>(path)
        }
        .await;

        match &outcome {
            Ok(path) => info!("PDF for job {} saved to {}", job_id, path.display()),
            Err(err) => error!("{}", err),
        }
        outcome
    }
}
