//! Data models shared by the generator, backends, and download action.

use crate::{Error, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// MIME type used when presenting a generated image as a data URI.
pub const DATA_URI_MIME: &str = "image/png";

/// Output aspect ratio requested from the image model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
        }
    }
}

/// A single image generation call. One request yields at most one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    pub fn square(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::Square,
        }
    }
}

/// An image extracted from a model response, kept as its base64 payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    data: String,
}

impl GeneratedImage {
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Raw base64 payload as returned by the model.
    pub fn base64(&self) -> &str {
        &self.data
    }

    /// Self-contained `data:` URI usable directly as an image source.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", DATA_URI_MIME, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| Error::Decode(format!("Failed to decode base64 image: {}", e)))
    }
}
