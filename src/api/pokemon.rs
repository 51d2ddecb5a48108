use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, PokemonDto, validation};
use crate::services::PokedexService;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct PokemonQuery {
    pub name: Option<String>,
}

/// The read endpoint: resolves a species by name through cache, store and
/// upstream. Unknown names are 404; a blank or missing name never reaches
/// the resolver.
pub async fn get_pokemon(
    State(state): State<Arc<SharedState>>,
    Query(query): Query<PokemonQuery>,
) -> Result<Json<ApiResponse<PokemonDto>>, ApiError> {
    let name = validation::validate_name(query.name.as_deref())?;

    match state.pokedex.get_by_name(name).await? {
        Some(found) => Ok(Json(ApiResponse::success(found))),
        None => Err(ApiError::pokemon_not_found(name)),
    }
}
