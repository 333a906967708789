use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::models::image::ImageRef;
use crate::models::job::{JobHandle, JobStatus};
use crate::services::replicate::JobClient;

/// Polling budget for one pending job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// Waits for a pending job to reach a terminal status.
pub struct JobPoller<'a> {
    client: &'a dyn JobClient,
    config: PollConfig,
}

impl<'a> JobPoller<'a> {
    pub fn new(client: &'a dyn JobClient, config: PollConfig) -> Self {
        Self { client, config }
    }

    /// Poll at a fixed interval until the job finishes or the budget runs out.
    ///
    /// Returns the output image of a succeeded job. Failed, canceled and
    /// timed-out jobs yield `None`. Transport errors only cost an attempt.
    pub async fn await_completion(&self, handle: &JobHandle) -> Option<ImageRef> {
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            sleep(self.config.interval).await;
            metrics::counter!("remote_job_polls_total").increment(1);

            let prediction = match self.client.fetch(handle).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(job_id = %handle.id, attempt, error = %e, "Polling request failed");
                    continue;
                }
            };

            debug!(
                job_id = %handle.id,
                attempt,
                max_attempts,
                status = %prediction.status,
                "Polled remote job"
            );

            match prediction.status {
                JobStatus::Succeeded => match prediction.output_image() {
                    Some(image) => return Some(image),
                    None => {
                        warn!(job_id = %handle.id, "Job succeeded without an image output");
                        return None;
                    }
                },
                JobStatus::Failed => {
                    warn!(job_id = %handle.id, error = ?prediction.error, "Job failed");
                    return None;
                }
                JobStatus::Canceled => {
                    warn!(job_id = %handle.id, "Job canceled");
                    return None;
                }
                _ => {}
            }
        }

        warn!(job_id = %handle.id, max_attempts, "Polling budget exhausted");
        None
    }
}
