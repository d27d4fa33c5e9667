mod config;
mod error;
mod handlers;
mod models;
mod services;
mod web; // HTTP routes and static frontend

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;

use config::Config;
use handlers::FoodAnalyzer;
use services::{AIService, GeminiService, NutritionDatabase};
use web::server::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.environment.default_log_level()),
    )
    .init();

    log::info!("🚀 Starting food analysis server...");
    if config.environment.is_debug() {
        log::debug!("🐛 Debug mode enabled");
    }

    let nutrition = Arc::new(NutritionDatabase::builtin());
    log::info!("✅ Nutrition database loaded: {} foods", nutrition.len());

    let gemini = GeminiService::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_api_base.clone(),
        config.gemini_timeout,
    )?;
    let ai: Arc<dyn AIService> = Arc::new(gemini);
    log::info!(
        "✅ Gemini service initialized with model: {} (timeout {}s)",
        config.gemini_model,
        config.gemini_timeout.as_secs()
    );

    let analyzer = Arc::new(FoodAnalyzer::new(ai, nutrition.clone()));

    let app = create_router(AppState {
        analyzer,
        nutrition,
        gemini_configured: !config.gemini_api_key.is_empty(),
        static_dir: config.static_dir.clone(),
        max_upload_bytes: config.max_upload_bytes,
    });

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    log::info!("🌐 Server listening on http://{}", addr);
    log::info!("📁 Serving frontend from {}", config.static_dir.display());
    log::info!(
        "📦 Upload limit: {}MB",
        config.max_upload_bytes / (1024 * 1024)
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("🛑 Shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
