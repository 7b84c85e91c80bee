use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub prompt_input: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub model_config: Option<Box<RawValue>>,
}

/// Envelope written for every request. `data` is `null` on failure and
/// `errorMessage` is empty on success.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub data: Option<Box<RawValue>>,
    pub error_message: String,
}

impl GenerateResponse {
    pub fn success(data: Box<RawValue>) -> Self {
        Self {
            data: Some(data),
            error_message: String::new(),
        }
    }

    pub fn failure(error: &crate::Error) -> Self {
        Self {
            data: None,
            error_message: error.to_string(),
        }
    }
}
