use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::ApiToken;
use crate::models::job::{JobHandle, JobSpec, Prediction, SubmissionOutcome};

/// Transport to a remote inference service with a submit/poll contract.
///
/// Implementations only move jobs over the wire; they do not interpret
/// what a job means.
#[async_trait]
pub trait JobClient: Send + Sync {
    /// Submit a job. A non-success HTTP status is reported as
    /// [`SubmissionOutcome::Rejected`], not as an error.
    async fn submit(&self, spec: &JobSpec) -> Result<SubmissionOutcome, JobError>;

    /// Fetch the current state of a pending job.
    async fn fetch(&self, handle: &JobHandle) -> Result<Prediction, JobError>;
}

/// Client for the Replicate predictions API.
pub struct ReplicateClient {
    http: Client,
    base_url: String,
    token: ApiToken,
}

impl ReplicateClient {
    pub fn new(
        base_url: impl Into<String>,
        token: ApiToken,
        timeout: Duration,
    ) -> Result<Self, JobError> {
        let http = Client::builder()
            .user_agent(concat!("headshot-enhance/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }
}

#[async_trait]
impl JobClient for ReplicateClient {
    async fn submit(&self, spec: &JobSpec) -> Result<SubmissionOutcome, JobError> {
        let url = format!("{}/predictions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token.expose())
            .json(spec)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                version = %spec.version,
                status = status.as_u16(),
                "Prediction submission rejected"
            );
            return Ok(SubmissionOutcome::Rejected(status));
        }

        let prediction: Prediction = response.json().await?;
        tracing::debug!(
            prediction_id = %prediction.id,
            status = %prediction.status,
            "Prediction submitted"
        );

        Ok(prediction.into())
    }

    async fn fetch(&self, handle: &JobHandle) -> Result<Prediction, JobError> {
        let url = format!("{}/predictions/{}", self.base_url, handle.id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.token.expose())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobError::Status(status));
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote service answered with status {0}")]
    Status(StatusCode),
}
