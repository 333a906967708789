use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::models::enhancement::{EnhancementRequest, EnhancementResult};
use crate::services::poller::PollConfig;
use crate::services::replicate::JobClient;
use crate::services::runner::JobRunner;
use crate::services::stages::{self, PipelineStage, StageOutcome};

/// Runs the enhancement stages in order over one working image.
pub struct EnhancementPipeline {
    runner: JobRunner,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl EnhancementPipeline {
    pub fn new(client: Arc<dyn JobClient>, poll: PollConfig) -> Self {
        Self::with_stages(client, poll, stages::default_stages())
    }

    pub fn with_stages(
        client: Arc<dyn JobClient>,
        poll: PollConfig,
        stages: Vec<Box<dyn PipelineStage>>,
    ) -> Self {
        Self {
            runner: JobRunner::new(client, poll),
            stages,
        }
    }

    /// Enhance the first input image.
    ///
    /// Fails only when there is no image to start from. Stage failures
    /// leave the working image untouched and add no label.
    pub async fn run(&self, request: EnhancementRequest) -> Result<EnhancementResult, PipelineError> {
        let settings = request.settings();
        let mut image = request
            .input_images
            .into_iter()
            .next()
            .ok_or(PipelineError::NoInputImage)?;
        let mut enhancements_applied = Vec::new();

        let start = Instant::now();
        metrics::counter!("enhancement_requests_total").increment(1);
        info!(?settings, image = %image, "Starting enhancement pipeline");

        for stage in &self.stages {
            let outcome = stages::execute(stage.as_ref(), &self.runner, &image, &settings).await;

            let result = match outcome {
                StageOutcome::Applied {
                    image: output,
                    label,
                } => {
                    info!(stage = stage.name(), label = %label, "Stage applied");
                    image = output;
                    enhancements_applied.push(label);
                    "applied"
                }
                StageOutcome::Skipped => "skipped",
                StageOutcome::Failed(_) => "failed",
            };

            metrics::counter!(
                "enhancement_stage_outcomes_total",
                "stage" => stage.name(),
                "outcome" => result
            )
            .increment(1);
        }

        metrics::histogram!("enhancement_pipeline_seconds").record(start.elapsed().as_secs_f64());
        info!(
            applied = enhancements_applied.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Enhancement pipeline finished"
        );

        Ok(EnhancementResult {
            image,
            enhancements_applied,
            settings,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Please provide at least one input image")]
    NoInputImage,
}
