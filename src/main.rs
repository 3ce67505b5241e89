//! FreshiFy Backend
//!
//! Food freshness detection services for the FreshiFy mobile app.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      FRESHIFY BACKEND                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐  ┌────────────┐  ┌────────────────────────┐ │
//! │  │  Sensor    │  │  Image     │  │  Notify / CRUD / Auth  │ │
//! │  │  Service   │  │  Service   │  │  Service               │ │
//! │  │  :5000     │  │  :5001     │  │  :5002                 │ │
//! │  └─────┬──────┘  └─────┬──────┘  └───────────┬────────────┘ │
//! │        │   ┌───────────┴──────────┐          │              │
//! │        ├───┤  Model artifacts     │          │              │
//! │        │   │  (ONNX + JSON, RAM)  │          │              │
//! │        │   └──────────────────────┘          │              │
//! │        └──────────────┬───────────────────────┘              │
//! │                       ▼                                      │
//! │                ┌─────────────┐                               │
//! │                │ PostgreSQL  │                               │
//! │                └─────────────┘                               │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod ml;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freshify_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("FreshiFy Backend starting...");
    tracing::info!(
        "Database: {}",
        config.database_url.split('@').last().unwrap_or("***")
    );

    // Initialize database pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Load model artifacts. The process must not serve traffic with a
    // partially loaded model, so any failure here is fatal.
    let models = ml::ModelBundle::load(&config).expect("Failed to load model artifacts");

    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    // Build application state
    let state = AppState {
        pool,
        config: config.clone(),
        models: Arc::new(models),
    };

    // Serve the three listeners until one of them dies
    tokio::join!(
        serve(
            create_sensor_router(state.clone()),
            config.sensor_port,
            "sensor-service"
        ),
        serve(
            create_image_router(state.clone()),
            config.image_port,
            "image-service"
        ),
        serve(
            create_notify_router(state.clone()),
            config.notify_port,
            "notify-service"
        ),
    );
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: config::Config,
    pub models: Arc<ml::ModelBundle>,
}

async fn serve(router: Router, port: u16, service: &'static str) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🚀 {} listening on http://{}", service, addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, router).await.unwrap();
}

/// Sensor prediction service
fn create_sensor_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::sensor))
        .route("/predict-sensor", post(handlers::sensor::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Image prediction service
fn create_image_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::image))
        .route("/predict-image", post(handlers::image::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Notify/CRUD service; also hosts auth and the dashboard reads
fn create_notify_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::notify))
        // Notifications
        .route("/notify", post(handlers::notify::add))
        .route("/notifications", get(handlers::notify::list))
        .route("/notifications/:id", delete(handlers::notify::delete))
        // Thoughts
        .route("/thoughts/add", post(handlers::thoughts::add))
        .route("/thoughts/list", get(handlers::thoughts::list))
        // Calendar
        .route("/calendar/add", post(handlers::calendar::add))
        .route("/calendar/events", get(handlers::calendar::list))
        .route("/calendar/delete/:id", delete(handlers::calendar::delete))
        // Blogs
        .route("/blogs/add", post(handlers::blogs::add))
        .route("/blogs/list", get(handlers::blogs::list))
        .route("/blogs/:id", get(handlers::blogs::get))
        .route("/blogs/delete/:id", delete(handlers::blogs::delete))
        // Expenses
        .route("/expenses/add", post(handlers::expenses::add))
        .route("/expenses/list", get(handlers::expenses::list))
        .route("/expenses/summary", get(handlers::expenses::summary))
        // Dashboard reads
        .route("/stats", get(handlers::history::stats))
        .route("/history", get(handlers::history::history))
        // Auth
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    // Profile routes (user JWT auth)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
