//! Fans a prompt out to several image generation calls and gathers the results.

use crate::ai::gemini::types::GenerateContentResponse;
use crate::ai::ImageGenerationService;
use crate::models::{GeneratedImage, GenerationRequest};
use crate::{Error, Result};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of images the front end asks for per topic.
pub const DEFAULT_IMAGE_COUNT: usize = 2;

pub struct ImageGenerator {
    backend: Arc<dyn ImageGenerationService>,
}

impl ImageGenerator {
    pub fn new(backend: Arc<dyn ImageGenerationService>) -> Self {
        Self { backend }
    }

    /// Generate up to `count` images for `prompt`.
    ///
    /// One request is issued per image and all of them run concurrently. A
    /// request that fails or comes back without an image contributes nothing;
    /// the call only fails when no request produced an image. Images are
    /// returned in request order regardless of completion order.
    pub async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<GeneratedImage>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::Validation("prompt must not be empty".to_string()));
        }
        if count == 0 {
            return Err(Error::Validation(
                "image count must be at least 1".to_string(),
            ));
        }

        info!("Requesting {} image(s) for prompt: {}", count, prompt);

        let requests: Vec<GenerationRequest> = (0..count)
            .map(|_| GenerationRequest::square(prompt))
            .collect();

        let results = join_all(
            requests
                .iter()
                .map(|request| self.backend.generate_content(request)),
        )
        .await;

        let images: Vec<GeneratedImage> = results
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| match result {
                Ok(response) => {
                    let image = extract_image(&response);
                    if image.is_none() {
                        debug!("[{}] Response carried no image", index + 1);
                    }
                    image
                }
                Err(e) => {
                    warn!("[{}] Image request failed: {}", index + 1, e);
                    None
                }
            })
            .collect();

        info!("Generated {}/{} image(s)", images.len(), count);

        if images.is_empty() {
            return Err(Error::Generation("no images were generated".to_string()));
        }

        Ok(images)
    }
}

/// Pull the first inline image out of the first candidate, if there is one.
pub fn extract_image(response: &GenerateContentResponse) -> Option<GeneratedImage> {
    response
        .first_inline_data()
        .map(|inline| GeneratedImage::from_base64(inline.data.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::types::{Candidate, Content, Part};
    use crate::ai::MockImageGenerationClient;
    use crate::models::AspectRatio;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn generator(mock: &Arc<MockImageGenerationClient>) -> ImageGenerator {
        ImageGenerator::new(mock.clone())
    }

    fn text_only() -> GenerateContentResponse {
        GenerateContentResponse::with_parts(vec![Part::text("I can't draw that")])
    }

    #[tokio::test]
    async fn test_issues_one_request_per_image() {
        let mock = Arc::new(MockImageGenerationClient::new());

        let images = generator(&mock).generate("a lighthouse", 5).await.unwrap();

        assert_eq!(images.len(), 5);
        assert_eq!(mock.get_call_count(), 5);
    }

    #[tokio::test]
    async fn test_red_fox_example() {
        let mock = Arc::new(
            MockImageGenerationClient::new()
                .with_image_response("QUJD")
                .with_response(text_only()),
        );

        let images = generator(&mock)
            .generate("a red fox in snow", 2)
            .await
            .unwrap();

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            assert_eq!(request.prompt, "a red fox in snow");
            assert_eq!(request.aspect_ratio, AspectRatio::Square);
        }

        assert_eq!(images, vec![GeneratedImage::from_base64("QUJD")]);
        assert_eq!(images[0].data_uri(), "data:image/png;base64,QUJD");
        assert_eq!(images[0].decode().unwrap(), b"ABC".to_vec());
    }

    #[tokio::test]
    async fn test_results_follow_request_order() {
        let mock = Arc::new(
            MockImageGenerationClient::new()
                .with_delayed_image_response("Zmlyc3Q=", Duration::from_millis(50))
                .with_image_response("c2Vjb25k")
                .with_image_response("dGhpcmQ="),
        );

        let images = generator(&mock).generate("order", 3).await.unwrap();

        let payloads: Vec<&str> = images.iter().map(|i| i.base64()).collect();
        assert_eq!(payloads, vec!["Zmlyc3Q=", "c2Vjb25k", "dGhpcmQ="]);
    }

    #[tokio::test]
    async fn test_requests_run_concurrently() {
        let delay = Duration::from_millis(200);
        let mock = Arc::new(
            (0..4).fold(MockImageGenerationClient::new(), |mock, _| {
                mock.with_delayed_image_response("QUJD", delay)
            }),
        );

        let started = std::time::Instant::now();
        let images = generator(&mock).generate("slow backend", 4).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(images.len(), 4);
        assert_eq!(mock.get_call_count(), 4);
        // Sequential calls would take at least 4 * delay.
        assert!(elapsed < delay * 2, "took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_single_failure_keeps_other_images() {
        let mock = Arc::new(
            MockImageGenerationClient::new()
                .with_image_response("b25l")
                .with_failure("connection reset")
                .with_image_response("dGhyZWU="),
        );

        let images = generator(&mock).generate("partial", 3).await.unwrap();

        let payloads: Vec<&str> = images.iter().map(|i| i.base64()).collect();
        assert_eq!(payloads, vec!["b25l", "dGhyZWU="]);
        assert_eq!(mock.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_all_failures_is_generation_error() {
        let mock = Arc::new(MockImageGenerationClient::new().with_failure("quota exceeded"));

        let err = generator(&mock).generate("nothing", 2).await.unwrap_err();

        assert!(matches!(err, Error::Generation(ref m) if m == "no images were generated"));
        assert_eq!(mock.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_no_image_parts_is_generation_error() {
        let mock = Arc::new(
            MockImageGenerationClient::new()
                .with_response(GenerateContentResponse::default())
                .with_response(text_only()),
        );

        let err = generator(&mock).generate("empty", 2).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_without_requests() {
        let mock = Arc::new(MockImageGenerationClient::new());

        for prompt in ["", "   ", "\n\t"] {
            let err = generator(&mock).generate(prompt, 2).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_count_rejected_without_requests() {
        let mock = Arc::new(MockImageGenerationClient::new());

        let err = generator(&mock).generate("a cat", 0).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_is_trimmed() {
        let mock = Arc::new(MockImageGenerationClient::new());

        generator(&mock).generate("  a cat  ", 1).await.unwrap();

        assert_eq!(mock.get_requests()[0].prompt, "a cat");
    }

    #[test]
    fn test_extract_takes_first_image_part_only() {
        let response = GenerateContentResponse::with_parts(vec![
            Part::text("caption"),
            Part::inline_data("image/png", "Zmlyc3Q="),
            Part::inline_data("image/png", "c2Vjb25k"),
        ]);

        let image = extract_image(&response).unwrap();
        assert_eq!(image.base64(), "Zmlyc3Q=");
    }

    #[test]
    fn test_extract_handles_missing_content() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate { content: None }],
        };
        assert!(extract_image(&response).is_none());

        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content::default()),
            }],
        };
        assert!(extract_image(&response).is_none());

        assert!(extract_image(&GenerateContentResponse::default()).is_none());
    }
}
