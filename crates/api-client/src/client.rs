/// HTTP client for the screenplay analysis service
use crate::config::ClientConfig;
use crate::error::{extract_detail, ClientError};
use crate::wire::{AnalysisResponse, JobId, JobRecord};
use crate::{AnalysisApi, DEFAULT_TITLE};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Talks to one analysis service instance. Cheap to share behind an `Arc`.
pub struct ApiClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{base}/{path}`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base(), path.trim_start_matches('/'))
    }

    /// Sends one request and turns non-2xx statuses into `ClientError::Http`.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let request_id = Uuid::new_v4().to_string();
        let response = request
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await?;

        let status = response.status();
        debug!("Request {} answered {}", request_id, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        Ok(response)
    }

    async fn send_json(&self, request: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Mime type sent for an uploaded script.
pub fn upload_mime(path: &Path) -> &'static str {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        "application/pdf"
    } else {
        "text/plain"
    }
}

#[async_trait::async_trait]
impl AnalysisApi for ApiClient {
    async fn analyze(
        &self,
        script_text: &str,
        title: &str,
    ) -> Result<AnalysisResponse, ClientError> {
        let url = self.endpoint("analyze");
        let title = if title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            title
        };

        info!("Submitting {} bytes of script text as {:?}", script_text.len(), title);

        let body = serde_json::json!({
            "script_text": script_text,
            "title": title,
        });
        let value = self.send_json(self.client.post(&url).json(&body)).await?;
        AnalysisResponse::try_from(value)
    }

    async fn upload_file(
        &self,
        path: &Path,
        title: Option<&str>,
    ) -> Result<AnalysisResponse, ClientError> {
        let url = self.endpoint("upload");

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "script".to_string());

        info!("Uploading {} ({} bytes)", file_name, bytes.len());

        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(upload_mime(path))?;

        let mut form = reqwest::multipart::Form::new().part("file", file_part);
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            form = form.text("title", title.to_string());
        }

        let value = self.send_json(self.client.post(&url).multipart(form)).await?;
        AnalysisResponse::try_from(value)
    }

    async fn get_job(&self, job_id: &JobId) -> Result<JobRecord, ClientError> {
        let url = self.endpoint(&format!("jobs/{}", job_id));
        let value = self.send_json(self.client.get(&url)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn health(&self) -> Result<Value, ClientError> {
        let url = self.endpoint("health");
        self.send_json(self.client.get(&url)).await
    }

    async fn export_pdf(&self, job_id: &JobId) -> Result<Vec<u8>, ClientError> {
        let url = self.endpoint(&format!("export/{}/pdf", job_id));
        debug!("Downloading PDF for job {}", job_id);

        let response = self.send(self.client.get(&url)).await?;
        let bytes = response.bytes().await?;

        info!("Downloaded {} byte PDF for job {}", bytes.len(), job_id);
        Ok(bytes.to_vec())
    }
}
