use serde::{Deserialize, Serialize};

use crate::models::image::ImageRef;

/// Prompt used when the caller sends none.
pub const DEFAULT_HEADSHOT_PROMPT: &str = "Professional B&W corporate headshot. Dark navy suit, white shirt, silk tie. Sharp 8K quality. Soft studio lighting. Blurred office background. Eyes in focus.";

/// Body of `POST /api/generate`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerateRequest {
    pub fn resolved_prompt(&self) -> &str {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_HEADSHOT_PROMPT)
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub image: ImageRef,
}
