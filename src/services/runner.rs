use reqwest::StatusCode;
use std::sync::Arc;

use crate::models::image::ImageRef;
use crate::models::job::{JobSpec, JobStatus, SubmissionOutcome};
use crate::services::poller::{JobPoller, PollConfig};
use crate::services::replicate::{JobClient, JobError};

/// Submits a job and, when it is not done yet, polls it to completion.
#[derive(Clone)]
pub struct JobRunner {
    client: Arc<dyn JobClient>,
    poll: PollConfig,
}

impl JobRunner {
    pub fn new(client: Arc<dyn JobClient>, poll: PollConfig) -> Self {
        Self { client, poll }
    }

    /// Run one job and return its output image.
    pub async fn run(&self, spec: &JobSpec) -> Result<ImageRef, RunError> {
        match self.client.submit(spec).await? {
            SubmissionOutcome::Succeeded(image) => Ok(image),
            SubmissionOutcome::Pending(handle) => JobPoller::new(self.client.as_ref(), self.poll)
                .await_completion(&handle)
                .await
                .ok_or(RunError::NoResult { job_id: handle.id }),
            SubmissionOutcome::Rejected(status) => Err(RunError::Rejected(status)),
            SubmissionOutcome::Terminated(status) => Err(RunError::Terminated(status)),
        }
    }
}

/// Why a job produced no image.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("transport error: {0}")]
    Transport(#[from] JobError),

    #[error("submission rejected with status {0}")]
    Rejected(StatusCode),

    #[error("job ended as {0} without an image")]
    Terminated(JobStatus),

    #[error("job {job_id} failed, was canceled or did not finish within the polling budget")]
    NoResult { job_id: String },
}
