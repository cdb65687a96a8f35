use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use staybook::config::AppConfig;
use staybook::db::SqliteStore;
use staybook::services::notifications::{
    ConfirmationSender, HttpConfirmationSender, NoopConfirmationSender,
};
use staybook::services::realtime::ChangeBus;
use staybook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store = SqliteStore::open(&config.database_url)?;

    let confirmations: Box<dyn ConfirmationSender> = if config.functions_url.is_empty() {
        tracing::warn!("FUNCTIONS_URL not set, booking confirmations disabled");
        Box::new(NoopConfirmationSender)
    } else {
        tracing::info!("sending booking confirmations via {}", config.functions_url);
        Box::new(HttpConfirmationSender::new(
            &config.functions_url,
            config.functions_key.clone(),
        ))
    };

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let cors = if config.cors_allow_origin == "*" {
        cors.allow_origin(Any)
    } else {
        let origin: HeaderValue = config.cors_allow_origin.parse()?;
        cors.allow_origin(origin)
    };

    let state = Arc::new(AppState {
        store: Arc::new(store),
        config: config.clone(),
        confirmations,
        changes: ChangeBus::new(),
    });

    let app = staybook::app(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
