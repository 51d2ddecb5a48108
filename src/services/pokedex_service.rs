//! Domain service for species resolution.
//!
//! The resolver is consumed through [`PokedexService`]; its collaborators
//! (store, upstream catalog) sit behind traits so tests can instrument
//! call counts without a database or network.

use thiserror::Error;

use crate::api::types::PokemonDto;
use crate::clients::pokeapi::{ClientError, RawPokemon, RawTypeDetail};
use crate::models::pokemon::Pokemon;

/// Domain errors for species resolution.
///
/// Not-found is deliberately absent: an unknown name is a legitimate empty
/// result (`Ok(None)`), not a failure.
#[derive(Debug, Error)]
pub enum PokedexError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Upstream catalog error: {0}")]
    Upstream(#[from] ClientError),
}

/// Resolves a species by display name through cache, store and upstream,
/// in that order.
#[async_trait::async_trait]
pub trait PokedexService: Send + Sync {
    /// # Errors
    ///
    /// - [`PokedexError::Database`] when the store lookup or persist fails
    /// - [`PokedexError::Upstream`] when the upstream fetch fails
    async fn get_by_name(&self, name: &str) -> Result<Option<PokemonDto>, PokedexError>;
}

/// Durable tier of the resolution path.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<Pokemon>>;

    async fn insert(&self, record: &Pokemon) -> anyhow::Result<()>;

    async fn missing_type_names(&self, names: &[String]) -> anyhow::Result<Vec<String>>;
}

/// Remote tier, consulted only on a full miss.
#[async_trait::async_trait]
pub trait UpstreamCatalog: Send + Sync {
    async fn fetch_pokemon(&self, name: &str) -> Result<Option<RawPokemon>, ClientError>;

    async fn fetch_type(&self, id: i64) -> Result<RawTypeDetail, ClientError>;
}

/// Maps the canonical record to the lean response shape: URLs and damage
/// relations are dropped, ability/type names keep their slot order.
#[must_use]
pub fn pokemon_to_dto(record: &Pokemon) -> PokemonDto {
    PokemonDto {
        id: record.pokeapi_id,
        name: record.name.clone(),
        sprite: record.sprite_url.clone(),
        abilities: record.abilities.iter().map(|a| a.name.clone()).collect(),
        types: record.types.iter().map(|t| t.name.clone()).collect(),
    }
}
