use actix_web::{web, HttpServer};
use anyhow::Context;

use pv_api::bootstrap::build_components;
use pv_api::config::LoadConfig;
use pv_api::telemetry::init_tracing;
use pv_api::{create_app, AppState};
use pv_shared::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment-specific file first so it wins over the generic .env
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        storage = ?config.storage.backend,
        rate_limit = ?config.rate_limit.backend,
        sms = ?config.sms.provider,
        "Starting phone verification API"
    );

    let components = build_components(&config)
        .await
        .context("Failed to initialize components")?;

    let cleanup_handle = components.cleanup_task.clone().start_background_task();

    let app_state = web::Data::new(AppState::new(
        components.otp_manager.clone(),
        config.server.trust_forwarded_headers,
    ));

    let bind_address = config.server.bind_address();
    tracing::info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(handle) = cleanup_handle {
        handle.abort();
    }
    if let Some(database) = components.database {
        database.close().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}
