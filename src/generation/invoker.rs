use super::{ModelConfig, extract_json_array};
use crate::{
    Error, Result,
    llm::{Content, GenerateContentRequest, GenerativeClient},
};
use serde_json::value::RawValue;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

/// A validated prompt ready to be sent to the model.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub prompt_input: String,
    pub model: String,
    pub model_config: ModelConfig,
}

impl PromptRequest {
    pub fn new(
        prompt_input: impl Into<String>,
        model: impl Into<String>,
        model_config: ModelConfig,
    ) -> Result<Self> {
        let prompt_input = prompt_input.into();
        let model = model.into();

        if prompt_input.is_empty() || model.is_empty() {
            return Err(Error::validation("check your promptInput and model again"));
        }

        Ok(Self {
            prompt_input,
            model,
            model_config,
        })
    }

    fn to_request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user_text(self.prompt_input.clone())],
            generation_config: Some(self.model_config.to_generation_config()),
        }
    }
}

/// Issues one generation call that must finish before `deadline`, then
/// validates that the model answered with a JSON array.
pub async fn generate(
    client: &dyn GenerativeClient,
    input: &PromptRequest,
    deadline: Instant,
) -> Result<Box<RawValue>> {
    let request = input.to_request();

    let response = timeout_at(deadline, client.generate_content(&input.model, &request))
        .await
        .map_err(|_| Error::remote("context deadline exceeded"))??;

    if let Some(ref usage) = response.usage_metadata {
        debug!(
            prompt_tokens = usage.prompt_token_count,
            candidate_tokens = usage.candidates_token_count,
            total_tokens = usage.total_token_count,
            "Generation usage"
        );
    }

    Ok(extract_json_array(&response)?)
}
