use headshot_enhance::config::ApiToken;
use headshot_enhance::models::enhancement::{BackgroundOption, EnhancementRequest};
use headshot_enhance::models::image::ImageRef;
use headshot_enhance::services::pipeline::EnhancementPipeline;
use headshot_enhance::services::poller::PollConfig;
use headshot_enhance::services::replicate::ReplicateClient;
use std::sync::Arc;
use std::time::Duration;

/// E2E test: full pipeline against the live prediction API.
///
/// Requires `REPLICATE_API_TOKEN` and `TEST_IMAGE_URL` (a publicly
/// reachable portrait). Spends real credits.
#[tokio::test]
#[ignore] // Run with: cargo test --test e2e_test -- --ignored
async fn test_live_enhancement() {
    dotenvy::dotenv().ok();

    let token = ApiToken::parse(std::env::var("REPLICATE_API_TOKEN").ok().as_deref())
        .expect("REPLICATE_API_TOKEN missing or malformed");
    let image_url = std::env::var("TEST_IMAGE_URL").expect("TEST_IMAGE_URL not set");

    let client = ReplicateClient::new(
        "https://api.replicate.com/v1",
        token,
        Duration::from_secs(60),
    )
    .expect("Failed to build client");
    let pipeline = EnhancementPipeline::new(Arc::new(client), PollConfig::default());

    let mut request = EnhancementRequest::new(vec![ImageRef::new(image_url.as_str())]);
    request.background_option = Some(BackgroundOption::StudioGray);

    let result = pipeline.run(request).await.expect("Pipeline rejected request");

    println!("  enhancements: {:?}", result.enhancements_applied);
    println!("  image: {}", result.image);
    assert!(!result.image.as_str().is_empty());
}
