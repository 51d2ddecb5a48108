use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

mod error;
mod pokemon;
mod system;
pub mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[must_use]
pub fn router(state: Arc<SharedState>) -> Router {
    let api_router = Router::new()
        .route("/pokemon", get(pokemon::get_pokemon))
        .route("/system/health", get(system::health))
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
