/// In-memory analysis service for tests and offline runs
use crate::error::ClientError;
use crate::wire::{AnalysisResponse, JobId, JobRecord};
use crate::AnalysisApi;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What a scripted call answers.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Body(Value),
    Http { status: u16, detail: Option<String> },
}

#[derive(Debug, Clone)]
pub struct MockReply {
    pub outcome: MockOutcome,
    pub delay: Duration,
}

impl MockReply {
    pub fn body(body: Value) -> Self {
        Self {
            outcome: MockOutcome::Body(body),
            delay: Duration::ZERO,
        }
    }

    pub fn http(status: u16, detail: Option<&str>) -> Self {
        Self {
            outcome: MockOutcome::Http {
                status,
                detail: detail.map(str::to_string),
            },
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Analyze { script_text: String, title: String },
    Upload { path: PathBuf, title: Option<String> },
    GetJob(JobId),
    Health,
    ExportPdf(JobId),
}

#[derive(Default)]
struct MockState {
    submissions: VecDeque<MockReply>,
    jobs: HashMap<JobId, (Vec<JobRecord>, usize)>,
    pdfs: HashMap<JobId, Vec<u8>>,
    calls: Vec<MockCall>,
}

/// Scripted stand-in for the remote service.
///
/// `analyze` and `upload_file` share one FIFO of replies. Each job answers
/// its records in order and keeps repeating the last one.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<MockState>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply for the next `analyze`/`upload_file` call.
    pub fn push_reply(&self, reply: MockReply) {
        self.state.lock().submissions.push_back(reply);
    }

    pub fn set_job(&self, job_id: &JobId, records: Vec<JobRecord>) {
        self.state.lock().jobs.insert(job_id.clone(), (records, 0));
    }

    pub fn set_pdf(&self, job_id: &JobId, bytes: Vec<u8>) {
        self.state.lock().pdfs.insert(job_id.clone(), bytes);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    pub fn job_polls(&self, job_id: &JobId) -> usize {
        self.state
            .lock()
            .jobs
            .get(job_id)
            .map(|(_, polls)| *polls)
            .unwrap_or(0)
    }

    async fn next_submission(&self, call: MockCall) -> Result<AnalysisResponse, ClientError> {
        let reply = {
            let mut state = self.state.lock();
            state.calls.push(call);
            state.submissions.pop_front()
        };

        let reply = reply.unwrap_or_else(|| MockReply::http(500, Some("no scripted reply")));
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        match reply.outcome {
            MockOutcome::Body(body) => AnalysisResponse::try_from(body),
            MockOutcome::Http { status, detail } => Err(ClientError::Http { status, detail }),
        }
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::Http {
        status: 404,
        detail: Some(format!("{what} not found")),
    }
}

#[async_trait::async_trait]
impl AnalysisApi for MockApi {
    async fn analyze(
        &self,
        script_text: &str,
        title: &str,
    ) -> Result<AnalysisResponse, ClientError> {
        self.next_submission(MockCall::Analyze {
            script_text: script_text.to_string(),
            title: title.to_string(),
        })
        .await
    }

    async fn upload_file(
        &self,
        path: &Path,
        title: Option<&str>,
    ) -> Result<AnalysisResponse, ClientError> {
        self.next_submission(MockCall::Upload {
            path: path.to_path_buf(),
            title: title.map(str::to_string),
        })
        .await
    }

    async fn get_job(&self, job_id: &JobId) -> Result<JobRecord, ClientError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::GetJob(job_id.clone()));

        let (records, polls) = state.jobs.get_mut(job_id).ok_or_else(|| not_found("Job"))?;
        let index = (*polls).min(records.len().saturating_sub(1));
        *polls += 1;
        records.get(index).cloned().ok_or_else(|| not_found("Job"))
    }

    async fn health(&self) -> Result<Value, ClientError> {
        self.state.lock().calls.push(MockCall::Health);
        Ok(serde_json::json!({"status": "healthy", "service": "mock"}))
    }

    async fn export_pdf(&self, job_id: &JobId) -> Result<Vec<u8>, ClientError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::ExportPdf(job_id.clone()));
        state
            .pdfs
            .get(job_id)
            .cloned()
            .ok_or_else(|| not_found("Job"))
    }
}
