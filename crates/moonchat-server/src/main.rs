mod api;
mod config;
mod static_assets;

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use moonchat_ai::MoonshotClient;
use tower_http::cors::CorsLayer;

use config::ServerConfig;

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> axum::Json<Health> {
    axum::Json(Health {
        status: "moonchat relay is up".to_string(),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,moonchat_server=debug".into()),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting Moonchat relay");

    // Fails fast when the provider credential is missing
    let config = ServerConfig::load().expect("Failed to load Moonchat configuration");

    let client = Arc::new(
        MoonshotClient::new(&config.api_key)
            .expect("Failed to construct provider client")
            .with_base_url(&config.base_url)
            .with_model(&config.model)
            .with_temperature(config.temperature),
    );
    tracing::info!(model = client.model(), "Provider client ready");

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(api::chat::relay_chat))
        .fallback(static_assets::static_handler)
        .layer(cors)
        .with_state(client);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|err| panic!("Failed to bind to {addr}: {err}"));

    tracing::info!("Moonchat relay running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
