use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, types::HealthDto};
use crate::state::SharedState;

pub async fn health(
    State(state): State<Arc<SharedState>>,
) -> Result<Json<ApiResponse<HealthDto>>, ApiError> {
    let database = match state.store.ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            "unreachable".to_string()
        }
    };

    Ok(Json(ApiResponse::success(HealthDto {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
    })))
}
