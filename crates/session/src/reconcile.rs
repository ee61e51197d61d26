/// Turns a service response into the analysis view model
use crate::upload::Upload;
use analysis::AnalysisResult;
use api_client::{wait_for_job, AnalysisApi, AnalysisResponse, ClientError, JobId, PollPolicy};
use tracing::{debug, info, warn};

/// A reconciled analysis and the job it came from, if the service named one.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub result: AnalysisResult,
    pub job_id: Option<JobId>,
}

/// Sends `upload` with the matching call: PDFs as a multipart upload,
/// text as a JSON analyze request.
pub async fn submit(api: &dyn AnalysisApi, upload: &Upload) -> Result<AnalysisResponse, ClientError> {
    match upload {
        Upload::Pdf { path, title } => api.upload_file(path, Some(title.as_str())).await,
        Upload::Text { text, title } => api.analyze(text, title).await,
    }
}

/// Resolves either response branch into an [`AnalysisResult`].
///
/// An embedded result is used directly. A bare job handle is polled under
/// `policy` until the job completes, fails, or the policy runs out.
pub async fn resolve(
    api: &dyn AnalysisApi,
    response: AnalysisResponse,
    policy: &PollPolicy,
) -> Result<Resolved, ClientError> {
    let resolved = match response {
        AnalysisResponse::Embedded { result, job_id } => {
            debug!("Response carried an embedded result");
            Resolved {
                result: AnalysisResult::from_scene(*result),
                job_id,
            }
        }
        AnalysisResponse::Job { job_id } => {
            info!("Waiting for analysis job {}", job_id);
            let result = wait_for_job(api, &job_id, policy).await?;
            Resolved {
                result,
                job_id: Some(job_id),
            }
        }
    };

    check(&resolved.result)?;
    Ok(resolved)
}

/// Submits and resolves in one step.
pub async fn analyze_upload(
    api: &dyn AnalysisApi,
    upload: &Upload,
    policy: &PollPolicy,
) -> Result<Resolved, ClientError> {
    let response = submit(api, upload).await?;
    resolve(api, response, policy).await
}

/// Duplicate ids are refused; other model issues are only logged.
fn check(result: &AnalysisResult) -> Result<(), ClientError> {
    result.ensure_unique_ids()?;
    for issue in result.validate() {
        warn!("Analysis issue: {}", issue);
    }
    Ok(())
}
