use async_trait::async_trait;
use datagen_gemini::{
    Error, Result,
    llm::{GenerateContentRequest, GenerateContentResponse, GenerativeClient},
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

/// Mock generative client for testing.
///
/// Clones share their recorded requests, so a pool factory can hand out
/// clones while the test keeps one to inspect.
#[derive(Debug, Clone)]
pub struct MockGenerativeClient {
    pub response: GenerateContentResponse,
    pub requests: Arc<Mutex<Vec<(String, GenerateContentRequest)>>>,
    pub error: Option<String>,
    pub delay: Duration,
}

impl MockGenerativeClient {
    pub fn new() -> Self {
        Self {
            response: GenerateContentResponse::default(),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_response(GenerateContentResponse::with_text(text))
    }

    pub fn with_response(mut self, response: GenerateContentResponse) -> Self {
        self.response = response;
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn get_requests(&self) -> Vec<(String, GenerateContentRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeClient for MockGenerativeClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(ref error) = self.error {
            return Err(Error::remote(error.clone()));
        }

        Ok(self.response.clone())
    }
}

impl Default for MockGenerativeClient {
    fn default() -> Self {
        Self::new()
    }
}
