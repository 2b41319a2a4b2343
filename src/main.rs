use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use construction_docgen::{
    app, config, logging,
    services::{
        AiDocumentGenerator, DemoDocumentGenerator, DocumentGenerator, DocumentSchema,
        GenerationPipeline, RetryPolicy,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        demo_mode = settings.demo_mode,
        "Starting construction document generator"
    );

    // Schema is parsed once and shared by every request
    let schema = DocumentSchema::load()?;

    let generator: Arc<dyn DocumentGenerator> = if settings.demo_mode {
        tracing::warn!("Demo mode enabled - documents are synthesized without the LLM provider");
        Arc::new(DemoDocumentGenerator::with_latency(Duration::from_millis(
            settings.demo_latency_ms,
        )))
    } else {
        Arc::new(AiDocumentGenerator::from_settings(
            &settings.openai,
            schema,
            RetryPolicy::new(settings.max_attempts),
        )?)
    };

    // Create application state
    let state = app::AppState::new(settings.clone(), GenerationPipeline::new(generator));

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
