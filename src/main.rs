use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use headshot_enhance::app_state::AppState;
use headshot_enhance::config::AppConfig;
use headshot_enhance::routes;
use headshot_enhance::services::replicate::ReplicateClient;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing headshot-enhance server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    metrics::describe_counter!(
        "enhancement_requests_total",
        "Enhancement requests that reached the pipeline"
    );
    metrics::describe_counter!(
        "enhancement_stage_outcomes_total",
        "Stage results by stage and outcome (applied, skipped, failed)"
    );
    metrics::describe_histogram!(
        "enhancement_pipeline_seconds",
        "Wall time of one enhancement pipeline run"
    );
    metrics::describe_counter!(
        "remote_job_polls_total",
        "Status polls issued against pending predictions"
    );
    metrics::describe_counter!(
        "headshot_generations_total",
        "Prompt-only headshot generations by outcome"
    );

    // A bad credential degrades the service instead of stopping it
    let state = match config.api_token() {
        Ok(token) => {
            tracing::info!(base_url = %config.replicate_api_base, "Initializing Replicate client");
            let client = ReplicateClient::new(
                config.replicate_api_base.as_str(),
                token,
                config.request_timeout(),
            )
            .expect("Failed to initialize Replicate client");
            AppState::new(Arc::new(client), config.poll_config())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Replicate credential unusable, serving 503 for model calls");
            AppState::unconfigured(e)
        }
    };

    let app = routes::router(state, Some(prometheus_handle), config.max_body_bytes);

    tracing::info!("Starting headshot-enhance on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
