use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::models::image::ImageRef;

/// Lifecycle status of a remote prediction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// No further state change happens after a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Job description sent to the submit endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobSpec {
    /// Model version identifier
    pub version: String,
    pub input: serde_json::Value,
}

impl JobSpec {
    pub fn new(version: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            version: version.into(),
            input,
        }
    }
}

/// Wire shape shared by the submit and status endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl Prediction {
    /// The image carried by `output`, if any. A list yields its first element.
    pub fn output_image(&self) -> Option<ImageRef> {
        self.output.as_ref().and_then(first_image)
    }
}

/// Normalise a model output to a single image reference.
pub fn first_image(output: &serde_json::Value) -> Option<ImageRef> {
    match output {
        serde_json::Value::String(s) if !s.is_empty() => Some(ImageRef::new(s.as_str())),
        serde_json::Value::Array(items) => items.first().and_then(first_image),
        _ => None,
    }
}

/// Handle to an accepted but unfinished prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub id: String,
    pub status: JobStatus,
}

/// What the submit call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Completed synchronously.
    Succeeded(ImageRef),
    /// Accepted; needs polling.
    Pending(JobHandle),
    /// The submission call itself failed with this HTTP status.
    Rejected(StatusCode),
    /// Accepted but already in a terminal non-success state.
    Terminated(JobStatus),
}

impl From<Prediction> for SubmissionOutcome {
    fn from(prediction: Prediction) -> Self {
        match prediction.status {
            JobStatus::Succeeded => match prediction.output_image() {
                Some(image) => Self::Succeeded(image),
                None => Self::Terminated(JobStatus::Succeeded),
            },
            status if status.is_terminal() => Self::Terminated(status),
            status => Self::Pending(JobHandle {
                id: prediction.id,
                status,
            }),
        }
    }
}
