/// Bounded polling of analysis jobs
use crate::error::ClientError;
use crate::wire::{JobId, JobState};
use crate::AnalysisApi;
use analysis::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// How long to keep asking the service about a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    /// Polls before giving up (at least one poll is always made)
    pub max_attempts: u32,

    /// Pause between polls
    pub interval_ms: u64,

    /// Overall deadline; 0 disables it
    pub timeout_secs: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval_ms: 1000,
            timeout_secs: 120,
        }
    }
}

impl PollPolicy {
    /// One poll, no waiting: a pending job is reported as timed out.
    pub fn single_shot() -> Self {
        Self {
            max_attempts: 1,
            interval_ms: 0,
            timeout_secs: 0,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_interval_ms(mut self, ms: u64) -> Self {
        self.interval_ms = ms;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Polls `job_id` until it completes, fails, or the policy runs out.
pub async fn wait_for_job(
    api: &dyn AnalysisApi,
    job_id: &JobId,
    policy: &PollPolicy,
) -> Result<AnalysisResult, ClientError> {
    let attempts = policy.max_attempts.max(1);

    let polls = AtomicU32::new(0);
    let polling = poll_until_settled(api, job_id, policy, attempts, &polls);

    match policy.timeout() {
        Some(limit) => match tokio::time::timeout(limit, polling).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ClientError::JobTimedOut {
                job_id: job_id.to_string(),
                attempts: polls.load(Ordering::Relaxed),
            }),
        },
        None => polling.await,
    }
}

async fn poll_until_settled(
    api: &dyn AnalysisApi,
    job_id: &JobId,
    policy: &PollPolicy,
    attempts: u32,
    polls: &AtomicU32,
) -> Result<AnalysisResult, ClientError> {
    for attempt in 1..=attempts {
        polls.fetch_add(1, Ordering::Relaxed);
        let record = api.get_job(job_id).await?;
        match record.state(job_id)? {
            JobState::Complete(result) => {
                info!("Job {} completed after {} poll(s)", job_id, attempt);
                return Ok(result);
            }
            JobState::Failed(message) => {
                return Err(ClientError::JobFailed {
                    job_id: job_id.to_string(),
                    message,
                });
            }
            JobState::Pending { status, progress } => {
                debug!(
                    "Job {} pending (status: {:?}, progress: {:?}), attempt {}/{}",
                    job_id, status, progress, attempt, attempts
                );
            }
        }

        if attempt < attempts && policy.interval_ms > 0 {
            tokio::time::sleep(policy.interval()).await;
        }
    }

    Err(ClientError::JobTimedOut {
        job_id: job_id.to_string(),
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use crate::wire::JobRecord;
    use serde_json::json;

    fn pending() -> JobRecord {
        serde_json::from_value(json!({"status": "processing", "progress": 10})).unwrap()
    }

    fn done() -> JobRecord {
        serde_json::from_value(json!({
            "status": "completed",
            "result_json": "{\"scene_id\":1,\"beats\":[]}"
        }))
        .unwrap()
    }

    fn fast(attempts: u32) -> PollPolicy {
        PollPolicy::default()
            .with_max_attempts(attempts)
            .with_interval_ms(1)
    }

    #[test]
    fn test_policy_defaults() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 30);
        assert_eq!(policy.interval(), Duration::from_secs(1));
        assert_eq!(policy.timeout(), Some(Duration::from_secs(120)));
        assert_eq!(PollPolicy::single_shot().timeout(), None);
    }

    #[tokio::test]
    async fn test_stops_on_first_completed_record() {
        let api = MockApi::new();
        let id = JobId::new("job-1");
        api.set_job(&id, vec![pending(), pending(), done()]);

        let result = wait_for_job(&api, &id, &fast(10)).await.unwrap();
        assert_eq!(result.scenes.len(), 1);
        assert_eq!(api.job_polls(&id), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let api = MockApi::new();
        let id = JobId::new("job-2");
        api.set_job(&id, vec![pending()]);

        let err = wait_for_job(&api, &id, &fast(4)).await.unwrap_err();
        assert!(matches!(err, ClientError::JobTimedOut { attempts: 4, .. }));
        assert_eq!(api.job_polls(&id), 4);
    }

    #[tokio::test]
    async fn test_single_shot_polls_once() {
        let api = MockApi::new();
        let id = JobId::new("job-3");
        api.set_job(&id, vec![pending(), done()]);

        let err = wait_for_job(&api, &id, &PollPolicy::single_shot())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::JobTimedOut { attempts: 1, .. }));
        assert_eq!(api.job_polls(&id), 1);
    }

    #[tokio::test]
    async fn test_failed_job_carries_server_error() {
        let api = MockApi::new();
        let id = JobId::new("job-4");
        let failed: JobRecord =
            serde_json::from_value(json!({"status": "failed", "error": "No valid scenes"}))
                .unwrap();
        api.set_job(&id, vec![pending(), failed]);

        match wait_for_job(&api, &id, &fast(10)).await {
            Err(ClientError::JobFailed { job_id, message }) => {
                assert_eq!(job_id, "job-4");
                assert_eq!(message, "No valid scenes");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_overall_timeout() {
        let api = MockApi::new();
        let id = JobId::new("job-5");
        api.set_job(&id, vec![pending()]);

        let policy = PollPolicy {
            max_attempts: 1000,
            interval_ms: 400,
            timeout_secs: 1,
        };
        let err = wait_for_job(&api, &id, &policy).await.unwrap_err();
        let polled = api.job_polls(&id);
        assert!(polled < 10);
        match err {
            ClientError::JobTimedOut { attempts, .. } => assert_eq!(attempts as usize, polled),
            other => panic!("unexpected {other:?}"),
        }
    }
}
