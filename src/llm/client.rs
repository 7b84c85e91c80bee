use super::types::*;
use crate::{Error, Result, config::VertexConfig};
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// Vertex AI client for `publishers/google` models.
pub struct VertexClient {
    client: reqwest::Client,
    api_base: Url,
    project_id: String,
    location: String,
    access_token: Option<String>,
}

impl VertexClient {
    pub fn new(config: &VertexConfig) -> Result<Self> {
        if config.project_id.is_empty() {
            return Err(Error::config("Vertex AI project id is required"));
        }
        if config.location.is_empty() {
            return Err(Error::config("Vertex AI location is required"));
        }

        let api_base = Url::parse(&config.api_base())
            .map_err(|e| Error::config(format!("Invalid Vertex AI base URL: {}", e)))?;
        if api_base.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Invalid Vertex AI base URL: {}",
                api_base
            )));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base,
            project_id: config.project_id.clone(),
            location: config.location.clone(),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Every caller-supplied piece is appended as one percent-encoded path
    /// segment, so a model name cannot change the path or add a query.
    fn endpoint(&self, model: &str) -> Result<Url> {
        let method = format!("{}:generateContent", model);
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("Vertex AI base URL cannot hold a path"))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "locations",
                self.location.as_str(),
                "publishers",
                "google",
                "models",
                method.as_str(),
            ]);
        Ok(url)
    }
}

#[async_trait]
impl GenerativeClient for VertexClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(model)?;
        debug!(model = %model, "Sending generateContent request");

        let mut req_builder = self.client.post(url).json(request);
        if let Some(ref token) = self.access_token {
            req_builder = req_builder.bearer_auth(token);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| Error::remote(format!("request to Vertex AI failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::remote(format!(
                "Vertex AI returned {}: {}",
                status,
                body.trim()
            )));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::remote(format!("failed to decode Vertex AI response: {}", e)))?;

        debug!(
            "Received generateContent response with {} candidates",
            response.candidates.len()
        );

        Ok(response)
    }
}
