use std::sync::Arc;

use crate::config::CredentialError;
use crate::services::{
    generator::HeadshotGenerator, pipeline::EnhancementPipeline, poller::PollConfig,
    replicate::JobClient,
};

/// Shared application state passed to all route handlers.
///
/// Holds the credential error instead of the services when the service
/// token was missing or malformed at startup.
#[derive(Clone)]
pub struct AppState {
    remote: Result<RemoteServices, CredentialError>,
}

/// Everything that talks to the remote job service.
#[derive(Clone)]
pub struct RemoteServices {
    pub pipeline: Arc<EnhancementPipeline>,
    pub generator: Arc<HeadshotGenerator>,
}

impl AppState {
    pub fn new(client: Arc<dyn JobClient>, poll: PollConfig) -> Self {
        Self {
            remote: Ok(RemoteServices {
                pipeline: Arc::new(EnhancementPipeline::new(Arc::clone(&client), poll)),
                generator: Arc::new(HeadshotGenerator::new(client, poll)),
            }),
        }
    }

    pub fn unconfigured(error: CredentialError) -> Self {
        Self { remote: Err(error) }
    }

    pub fn remote(&self) -> Result<&RemoteServices, CredentialError> {
        self.remote.as_ref().map_err(Clone::clone)
    }
}
