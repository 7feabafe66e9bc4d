//! HTTP handlers for the battle station.

use std::time::Duration;

use actix_web::{
    HttpResponse, error,
    web::{self, Data, Json},
};
use battlestation_core::Classified;
use battlestation_runtime::{AttackCoordinator, AttackRequest, CannonReport, MetricsSnapshot};
use serde::Serialize;
use tokio::time::Instant;

use crate::response::{json_error, status_for};

pub const SERVICE_NAME: &str = "battlestation";

/// Shared state behind every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub coordinator: AttackCoordinator,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(coordinator: AttackCoordinator, request_timeout: Duration) -> Self {
        Self {
            coordinator,
            request_timeout,
        }
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    cannons: Vec<CannonReport>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    cannons: usize,
    metrics: MetricsSnapshot,
}

pub(crate) async fn attack(state: Data<AppState>, request: Json<AttackRequest>) -> HttpResponse {
    match state.coordinator.execute(&request, state.deadline()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => json_error(status_for(err.class()), err.to_string()),
    }
}

pub(crate) async fn status(state: Data<AppState>) -> HttpResponse {
    let cannons = state
        .coordinator
        .manager()
        .status_report(state.deadline())
        .await;
    HttpResponse::Ok().json(StatusResponse { cannons })
}

pub(crate) async fn health(state: Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        cannons: state.coordinator.manager().len(),
        metrics: state.coordinator.metrics().snapshot(),
    })
}

/// JSON extractor settings: undecodable bodies get the same error shape as
/// every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!(error = %err, "rejected attack body");
        let response = json_error(
            actix_web::http::StatusCode::BAD_REQUEST,
            format!("failed to parse request: {err}"),
        );
        error::InternalError::from_response(err, response).into()
    })
}

/// Registers the battle station routes and their extractor config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/attack", web::post().to(attack))
        .route("/status", web::get().to(status))
        .route("/health", web::get().to(health));
}
