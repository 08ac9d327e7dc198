//! GST Verification API Server

mod auth;
mod db;
mod error;
mod rbac;
mod routes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use gst_core::{GstVerifier, OcrClient, OcrConfig, VerifierConfig};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers
pub struct AppState {
    pub db: sqlx::PgPool,
    pub verifier: GstVerifier,
    pub ocr: OcrClient,
    pub config: AppConfig,
}

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub max_upload_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/gst_service".to_string()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "development-secret-change-in-production".to_string()),
            max_upload_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gst_api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GST Verification API Server");

    let config = AppConfig::default();

    // Connect to database
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run migrations");

    info!("Database migrations complete");

    // External collaborators
    let verifier = GstVerifier::new(VerifierConfig {
        base_url: std::env::var("GST_API_URL")
            .unwrap_or_else(|_| VerifierConfig::default().base_url),
        api_key: std::env::var("GST_API_KEY").ok(),
        ..VerifierConfig::default()
    })
    .expect("Failed to build verification client");

    let ocr = OcrClient::new(OcrConfig {
        endpoint: std::env::var("OCR_API_URL").unwrap_or_else(|_| OcrConfig::default().endpoint),
        api_key: std::env::var("OCR_API_KEY").ok(),
    })
    .expect("Failed to build OCR client");

    let max_upload_size = config.max_upload_size;

    // Create shared state
    let state = Arc::new(AppState {
        db,
        verifier,
        ocr,
        config,
    });

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(routes::health_check))

        // Authentication
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))

        // GST verification
        .route("/api/gst/verify", post(routes::gst::verify))
        .route("/api/gst/details/:user_id", get(routes::gst::details))
        .route("/api/gst/test/:gst_number", get(routes::gst::test_verify))

        // Admin
        .route("/api/admin/stats", get(routes::admin::get_stats))

        // Uploads up to the configured document limit
        .layer(DefaultBodyLimit::max(max_upload_size))

        // CORS
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))

        // Tracing
        .layer(TraceLayer::new_for_http())

        // State
        .with_state(state);

    // Start server
    let addr = "0.0.0.0:3000";
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
