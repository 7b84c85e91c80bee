use anyhow::{Context, Result};
use datagen_gemini::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging depends on the loaded config, so failures here go to stderr.
    let config = config::load()
        .await
        .context("Failed to load configuration")?;

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = config.server.logs.env_filter(rust_log.as_deref())?;
    let directives = filter.to_string();

    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!(log_filter = %directives, "Starting data generator");
    info!(
        project_id = %config.vertex.project_id,
        location = %config.vertex.location,
        context_timeout_s = config.server.context_timeout_s,
        "Configuration loaded"
    );

    server::run(config).await?;

    Ok(())
}
