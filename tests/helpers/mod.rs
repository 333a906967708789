//! Test helper utilities: an in-memory stand-in for the remote job service.

#![allow(dead_code)]

use async_trait::async_trait;
use headshot_enhance::models::job::{JobHandle, JobSpec, JobStatus, Prediction, SubmissionOutcome};
use headshot_enhance::services::poller::PollConfig;
use headshot_enhance::services::replicate::{JobClient, JobError};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the fake answers one submission.
#[derive(Debug, Clone)]
pub enum Script {
    /// Completes synchronously with this output.
    Immediate(Value),
    /// Accepted; polls answer with these steps, then `processing` forever.
    Pending(Vec<PollStep>),
    /// Already failed in the submission response.
    FailedOnSubmit,
    /// The submit call returns this HTTP status.
    Reject(StatusCode),
    /// The submit call errors at the transport level.
    TransportError,
}

/// One answer to a status poll.
#[derive(Debug, Clone)]
pub enum PollStep {
    Status(JobStatus),
    Succeeded(Value),
    Error(StatusCode),
}

/// Scripted [`JobClient`] that records every submission and poll.
///
/// Submissions consume scripts in order; once the script runs out every
/// further submission is rejected with a 500.
#[derive(Default)]
pub struct ScriptedJobClient {
    scripts: Mutex<VecDeque<Script>>,
    submissions: Mutex<Vec<JobSpec>>,
    polls: Mutex<Vec<String>>,
    pending: Mutex<HashMap<String, VecDeque<PollStep>>>,
}

impl ScriptedJobClient {
    pub fn new(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            ..Default::default()
        })
    }

    pub fn submissions(&self) -> Vec<JobSpec> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.polls.lock().unwrap().len()
    }

    fn prediction(id: &str, status: JobStatus, output: Option<Value>) -> Prediction {
        Prediction {
            id: id.to_string(),
            status,
            output,
            error: None,
        }
    }
}

#[async_trait]
impl JobClient for ScriptedJobClient {
    async fn submit(&self, spec: &JobSpec) -> Result<SubmissionOutcome, JobError> {
        let id = {
            let mut submissions = self.submissions.lock().unwrap();
            submissions.push(spec.clone());
            format!("job-{}", submissions.len())
        };

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Script::Reject(StatusCode::INTERNAL_SERVER_ERROR));

        match script {
            Script::Immediate(output) => {
                Ok(Self::prediction(&id, JobStatus::Succeeded, Some(output)).into())
            }
            Script::Pending(steps) => {
                self.pending
                    .lock()
                    .unwrap()
                    .insert(id.clone(), steps.into());
                Ok(Self::prediction(&id, JobStatus::Starting, None).into())
            }
            Script::FailedOnSubmit => Ok(Self::prediction(&id, JobStatus::Failed, None).into()),
            Script::Reject(status) => Ok(SubmissionOutcome::Rejected(status)),
            Script::TransportError => Err(JobError::Status(StatusCode::BAD_GATEWAY)),
        }
    }

    async fn fetch(&self, handle: &JobHandle) -> Result<Prediction, JobError> {
        self.polls.lock().unwrap().push(handle.id.clone());

        let step = self
            .pending
            .lock()
            .unwrap()
            .get_mut(&handle.id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(PollStep::Status(JobStatus::Processing));

        match step {
            PollStep::Status(status) => Ok(Self::prediction(&handle.id, status, None)),
            PollStep::Succeeded(output) => {
                Ok(Self::prediction(&handle.id, JobStatus::Succeeded, Some(output)))
            }
            PollStep::Error(status) => Err(JobError::Status(status)),
        }
    }
}

/// [`JobClient`] that panics on every call.
pub struct PanickingJobClient;

#[async_trait]
impl JobClient for PanickingJobClient {
    async fn submit(&self, _spec: &JobSpec) -> Result<SubmissionOutcome, JobError> {
        panic!("remote client blew up on submit")
    }

    async fn fetch(&self, _handle: &JobHandle) -> Result<Prediction, JobError> {
        panic!("remote client blew up on fetch")
    }
}

/// Polling budget with no wait between polls.
pub fn instant_polls() -> PollConfig {
    PollConfig {
        interval: Duration::ZERO,
        max_attempts: 30,
    }
}
