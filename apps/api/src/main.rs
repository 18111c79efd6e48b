use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use auth_cell::services::AuthService;
use doctor_cell::services::{load_seed_file, seed_doctors};
use shared_config::AppConfig;
use shared_database::AppState;

/// Admin account and optional doctor list, inserted only where missing.
async fn bootstrap(state: &AppState) -> anyhow::Result<()> {
    let config = &state.config;

    AuthService::new(state)
        .seed_admin(&config.admin_username, &config.admin_password)
        .await
        .context("seeding admin account")?;

    match &config.doctor_seed_path {
        Some(path) => {
            let doctors = load_seed_file(path)
                .with_context(|| format!("reading doctor seed {}", path.display()))?;
            seed_doctors(state.store.as_ref(), doctors)
                .await
                .context("seeding doctors")?;
        }
        None => warn!("DOCTOR_SEED_PATH not set, starting without seed doctors"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MedConnect API server");

    // Load configuration
    let config = AppConfig::from_env();
    if !config.is_configured() {
        warn!("Configuration incomplete, check SESSION_JWT_SECRET and the Supabase settings");
    }

    let store = shared_database::connect(&config);
    let state = Arc::new(AppState::new(config, store));
    bootstrap(&state).await?;

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let bind_address = state.config.bind_address.clone();

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
