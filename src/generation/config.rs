use crate::llm::{GenerationConfig, JSON_MIME_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, value::RawValue};
use tracing::{debug, warn};

/// Sampling parameters for a single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelConfig {
    pub temperature: f32,
    pub max_output_tokens: i32,
    pub top_p: f32,
    pub top_k: i32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_output_tokens: 1000,
            top_p: 0.95,
            top_k: 1,
        }
    }
}

impl ModelConfig {
    /// Remote generation config asking for JSON output.
    pub fn to_generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: Some(self.temperature),
            max_output_tokens: Some(self.max_output_tokens),
            top_p: Some(self.top_p),
            top_k: Some(self.top_k),
            response_mime_type: Some(JSON_MIME_TYPE.to_string()),
        }
    }
}

/// Overlays caller-supplied fields on the defaults.
///
/// Only an overlay that parses completely takes effect; any error yields the
/// defaults untouched.
pub fn parse_model_config(raw: Option<&RawValue>) -> ModelConfig {
    let Some(raw) = raw else {
        debug!("No model config supplied, using defaults");
        return ModelConfig::default();
    };

    // Going through a map rejects arrays, which serde would otherwise accept
    // positionally for a struct.
    let parsed = serde_json::from_str::<Option<Map<String, Value>>>(raw.get()).and_then(|map| {
        map.map(|map| ModelConfig::deserialize(Value::Object(map)))
            .transpose()
    });

    match parsed {
        Ok(Some(config)) => config,
        Ok(None) => ModelConfig::default(),
        Err(e) => {
            warn!(
                "Default value used due to error unmarshaling model config: {}",
                e
            );
            ModelConfig::default()
        }
    }
}
