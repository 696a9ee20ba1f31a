use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    database: String,
    moderation_checks: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse),
        (status = 503, description = "Service unavailable")
    )
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    match state.review_repo.ping().await {
        Ok(_) => {
            info!("Health check passed");
            Ok(Json(HealthResponse {
                status: "OK".to_string(),
                database: "healthy".to_string(),
                moderation_checks: state
                    .moderator
                    .active_checks()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }))
        }
        Err(e) => {
            error!("Database health check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
