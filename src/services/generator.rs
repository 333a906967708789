use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::image::ImageRef;
use crate::models::job::JobSpec;
use crate::services::poller::PollConfig;
use crate::services::replicate::JobClient;
use crate::services::runner::{JobRunner, RunError};

/// TencentARC PhotoMaker.
pub const PHOTOMAKER_VERSION: &str =
    "467d062309da518648ba89d226490e02b8ed09b5abc15026e54e31c5a8cd0769";

/// Generates a headshot from a text prompt alone.
pub struct HeadshotGenerator {
    runner: JobRunner,
}

impl HeadshotGenerator {
    pub fn new(client: Arc<dyn JobClient>, poll: PollConfig) -> Self {
        Self {
            runner: JobRunner::new(client, poll),
        }
    }

    pub fn build_job(prompt: &str) -> JobSpec {
        JobSpec::new(
            PHOTOMAKER_VERSION,
            json!({
                "prompt": prompt,
                "num_outputs": 1,
                "style_name": "Photographic (Default)",
                "num_steps": 30,
                "style_strength_ratio": 20
            }),
        )
    }

    pub async fn generate(&self, prompt: &str) -> Result<ImageRef, RunError> {
        info!(prompt_len = prompt.len(), "Generating headshot");

        match self.runner.run(&Self::build_job(prompt)).await {
            Ok(image) => {
                metrics::counter!("headshot_generations_total", "outcome" => "succeeded")
                    .increment(1);
                Ok(image)
            }
            Err(e) => {
                warn!(error = %e, "Headshot generation failed");
                metrics::counter!("headshot_generations_total", "outcome" => "failed")
                    .increment(1);
                Err(e)
            }
        }
    }
}
