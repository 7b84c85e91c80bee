use super::types::{GenerateRequest, GenerateResponse};
use crate::{
    Error,
    generation::{self, PromptRequest, parse_model_config},
    llm::GenerativeClient,
    pool::ClientPool,
};
use axum::{body::Bytes, extract::State, response::Json};
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

pub type SharedClientPool = Arc<ClientPool<Box<dyn GenerativeClient>>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: SharedClientPool,
    pub context_timeout: Duration,
}

pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, Error> {
    let request: GenerateRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Failed to decode request body: {}", e);
        Error::Decode(e)
    })?;

    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let span = info_span!("generate", request_id = %request_id, model = %request.model);

    async move {
        let deadline = deadline_after(state.context_timeout);
        let result = process(&state, request, deadline).await;

        let reason = if Instant::now() >= deadline {
            "deadline exceeded"
        } else {
            "completed"
        };
        info!("Done, context closed due to: {}", reason);

        match result {
            Ok(data) => Ok(Json(GenerateResponse::success(data))),
            Err(e) => {
                error!("Generation failed: {}", e);
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

/// Deadline `timeout` from now, saturating at roughly thirty years out.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(86400 * 365 * 30))
}

async fn process(
    state: &AppState,
    request: GenerateRequest,
    deadline: Instant,
) -> crate::Result<Box<serde_json::value::RawValue>> {
    let client = state.pool.acquire()?;

    let model_config = parse_model_config(request.model_config.as_deref());
    let input = PromptRequest::new(request.prompt_input, request.model, model_config)?;

    generation::generate(&**client, &input, deadline).await
}
