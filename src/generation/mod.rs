mod config;
mod invoker;
mod validator;

pub use config::{ModelConfig, parse_model_config};
pub use invoker::{PromptRequest, generate};
pub use validator::extract_json_array;
