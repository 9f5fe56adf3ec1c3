use super::gemini::types::{GenerateContentResponse, Part};
use super::ImageGenerationService;
use crate::models::GenerationRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 1x1 PNG, base64 encoded.
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR4nGP4z8AAAAMBAQDJ/pLvAAAAAElFTkSuQmCC";

fn image_response(base64: &str) -> GenerateContentResponse {
    GenerateContentResponse::with_parts(vec![Part::inline_data("image/png", base64)])
}

#[derive(Debug, Clone)]
enum MockOutcome {
    Response(GenerateContentResponse),
    Failure(String),
}

#[derive(Debug, Clone)]
struct ScriptedCall {
    outcome: MockOutcome,
    delay: Option<Duration>,
}

/// Scripted backend. Calls consume the script in order and cycle once it
/// runs out; with an empty script every call returns [`TINY_PNG_BASE64`].
pub struct MockImageGenerationClient {
    script: Arc<Mutex<Vec<ScriptedCall>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(self, outcome: MockOutcome, delay: Option<Duration>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push(ScriptedCall { outcome, delay });
        self
    }

    pub fn with_image_response(self, base64: &str) -> Self {
        self.push(MockOutcome::Response(image_response(base64)), None)
    }

    pub fn with_delayed_image_response(self, base64: &str, delay: Duration) -> Self {
        self.push(MockOutcome::Response(image_response(base64)), Some(delay))
    }

    pub fn with_response(self, response: GenerateContentResponse) -> Self {
        self.push(MockOutcome::Response(response), None)
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.push(MockOutcome::Failure(message.to_string()), None)
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerateContentResponse> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            let index = requests.len() - 1;

            let script = self.script.lock().unwrap();
            if script.is_empty() {
                None
            } else {
                Some(script[index % script.len()].clone())
            }
        };

        let Some(call) = call else {
            return Ok(image_response(TINY_PNG_BASE64));
        };

        if let Some(delay) = call.delay {
            tokio::time::sleep(delay).await;
        }

        match call.outcome {
            MockOutcome::Response(response) => Ok(response),
            MockOutcome::Failure(message) => Err(Error::AiProvider(message)),
        }
    }
}
