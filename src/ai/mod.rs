//! AI service integration for image generation
//!
//! Defines the backend seam the generator fans requests out to, with a
//! Gemini REST implementation and an in-process mock.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiImageClient;
pub use mock::MockImageGenerationClient;

use crate::models::GenerationRequest;
use crate::Result;
use async_trait::async_trait;
use gemini::types::GenerateContentResponse;

/// A backend that performs one image generation call.
///
/// Implementations return the raw response; picking the image out of it is
/// left to the caller since the response shape is not guaranteed.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_content(&self, request: &GenerationRequest)
        -> Result<GenerateContentResponse>;
}
