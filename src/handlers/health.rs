//! Health check handlers
//!
//! Always 200 once startup has completed: model loading is fatal at boot,
//! so a serving process by definition has its artifacts, and DB
//! availability is intentionally not probed here.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    model_loaded: Option<bool>,
    timestamp: i64,
}

fn respond(service: &'static str, model_loaded: Option<bool>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service,
        version: env!("CARGO_PKG_VERSION"),
        model_loaded,
        timestamp: chrono::Utc::now().timestamp(),
    })
}

pub async fn sensor() -> Json<HealthResponse> {
    respond("sensor-service", Some(true))
}

pub async fn image() -> Json<HealthResponse> {
    respond("image-service", Some(true))
}

pub async fn notify() -> Json<HealthResponse> {
    respond("notify-service", None)
}
