use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to an image as the remote models accept it: a URL (or other
/// opaque identifier) or an inline `data:` URI with base64 content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Check the reference is usable as model input.
    ///
    /// Inline images must decode to a format the `image` crate recognises.
    /// Everything else is handed to the remote service as-is.
    pub fn check(&self) -> Result<(), ImageRefError> {
        if self.0.trim().is_empty() {
            return Err(ImageRefError::Empty);
        }
        if !self.is_inline() {
            return Ok(());
        }

        let (header, payload) = self.0["data:".len()..]
            .split_once(',')
            .ok_or(ImageRefError::MalformedDataUri)?;

        if !header.ends_with(";base64") {
            return Err(ImageRefError::MalformedDataUri);
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(ImageRefError::Base64)?;

        image::guess_format(&bytes).map_err(|_| ImageRefError::UnsupportedFormat)?;
        Ok(())
    }
}

impl fmt::Display for ImageRef {
    /// Inline payloads are elided so log lines stay readable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inline() {
            let header = self.0.split(',').next().unwrap_or("data:");
            write!(f, "{},<{} bytes>", header, self.0.len())
        } else {
            f.write_str(&self.0)
        }
    }
}

/// garde hook for image reference lists.
pub fn validate_image_ref(value: &ImageRef, _ctx: &()) -> garde::Result {
    value
        .check()
        .map_err(|e| garde::Error::new(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ImageRefError {
    #[error("image reference is empty")]
    Empty,

    #[error("inline image must be a base64 data URI")]
    MalformedDataUri,

    #[error("inline image is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("inline image format is not supported")]
    UnsupportedFormat,
}
