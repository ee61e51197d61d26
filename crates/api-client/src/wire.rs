/// Response shapes of the analysis service
use crate::error::ClientError;
use analysis::{AnalysisResult, Scene};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Analysis job identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts a non-empty string or a number, as sent in `job_id`.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of `POST /analyze` and `POST /upload`.
///
/// The service either embeds the finished analysis or hands back a job
/// handle that has to be polled.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResponse {
    /// `result` is present; `job_id` is kept for the PDF export.
    Embedded {
        result: Box<Scene>,
        job_id: Option<JobId>,
    },
    /// Only `job_id` is present.
    Job { job_id: JobId },
}

impl AnalysisResponse {
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            AnalysisResponse::Embedded { job_id, .. } => job_id.as_ref(),
            AnalysisResponse::Job { job_id } => Some(job_id),
        }
    }
}

impl TryFrom<Value> for AnalysisResponse {
    type Error = ClientError;

    fn try_from(mut body: Value) -> Result<Self, Self::Error> {
        let map = body
            .as_object_mut()
            .ok_or(ClientError::InvalidResponseFormat)?;
        let job_id = map.get("job_id").and_then(JobId::from_value);

        match map.remove("result") {
            None | Some(Value::Null) => {}
            Some(result @ Value::Object(_)) => {
                let scene: Scene = serde_json::from_value(result)?;
                return Ok(AnalysisResponse::Embedded {
                    result: Box::new(scene),
                    job_id,
                });
            }
            Some(_) => return Err(ClientError::InvalidResponseFormat),
        }

        match job_id {
            Some(job_id) => Ok(AnalysisResponse::Job { job_id }),
            None => Err(ClientError::InvalidResponseFormat),
        }
    }
}

/// Body of `GET /jobs/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default)]
    pub job_id: Option<Value>,

    /// pending / processing / completed / failed
    #[serde(default)]
    pub status: Option<String>,

    /// JSON-encoded scene payload
    #[serde(default)]
    pub result_json: Option<String>,

    /// Same payload, already decoded (newer service builds)
    #[serde(default)]
    pub result: Option<Value>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub progress: Option<f64>,
}

/// Where a job stands after one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Complete(AnalysisResult),
    Pending {
        status: Option<String>,
        progress: Option<f64>,
    },
    Failed(String),
}

impl JobRecord {
    pub fn state(&self, job_id: &JobId) -> Result<JobState, ClientError> {
        if let Some(raw) = self.result_json.as_deref().filter(|r| !r.trim().is_empty()) {
            return Ok(JobState::Complete(AnalysisResult::from_result_json(raw)?));
        }

        if let Some(result @ Value::Object(_)) = &self.result {
            let scene: Scene = serde_json::from_value(result.clone())?;
            return Ok(JobState::Complete(AnalysisResult::from_scene(scene)));
        }

        match self.status.as_deref() {
            Some("failed") => Ok(JobState::Failed(
                self.error
                    .clone()
                    .unwrap_or_else(|| format!("job {job_id} failed")),
            )),
            // Completed without a payload: nothing to show.
            Some("completed") => Err(ClientError::InvalidResponseFormat),
            status => Ok(JobState::Pending {
                status: status.map(str::to_string),
                progress: self.progress,
            }),
        }
    }
}
