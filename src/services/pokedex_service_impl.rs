use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::clients::pokeapi::{
    ClientError, PokeApiClient, RawPokemon, RawTypeDetail, id_from_resource_url,
};
use crate::db::Store;
use crate::models::pokemon::{DamageRelations, Pokemon};
use crate::services::pokedex_service::{
    CatalogStore, PokedexError, PokedexService, UpstreamCatalog, pokemon_to_dto,
};

use crate::api::types::PokemonDto;

#[async_trait::async_trait]
impl CatalogStore for Store {
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<Pokemon>> {
        self.find_pokemon_by_name(name).await
    }

    async fn insert(&self, record: &Pokemon) -> anyhow::Result<()> {
        self.insert_pokemon(record).await
    }

    async fn missing_type_names(&self, names: &[String]) -> anyhow::Result<Vec<String>> {
        Self::missing_type_names(self, names).await
    }
}

#[async_trait::async_trait]
impl UpstreamCatalog for PokeApiClient {
    async fn fetch_pokemon(&self, name: &str) -> Result<Option<RawPokemon>, ClientError> {
        Self::fetch_pokemon(self, name).await
    }

    async fn fetch_type(&self, id: i64) -> Result<RawTypeDetail, ClientError> {
        Self::fetch_type(self, id).await
    }
}

/// Read-through resolver: cache, then store, then upstream, writing back
/// into both lower tiers on an upstream hit.
///
/// Concurrent misses for the same name are collapsed behind a per-key
/// in-flight lock, so one miss episode performs at most one upstream fetch
/// and one persist; the losers of the race are served from the cache the
/// winner filled.
pub struct CachedPokedexService {
    store: Arc<dyn CatalogStore>,
    upstream: Arc<dyn UpstreamCatalog>,
    cache: Arc<TtlCache<Pokemon>>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CachedPokedexService {
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        upstream: Arc<dyn UpstreamCatalog>,
        cache: Arc<TtlCache<Pokemon>>,
    ) -> Self {
        Self {
            store,
            upstream,
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Store and upstream tiers, entered only behind the in-flight lock.
    async fn resolve_miss(&self, name: &str) -> Result<Option<PokemonDto>, PokedexError> {
        // A concurrent resolution may have finished while we waited on the
        // key lock.
        if let Some(hit) = self.cache.get(name) {
            debug!("Resolved {} from cache after waiting in flight", name);
            return Ok(Some(pokemon_to_dto(&hit)));
        }

        let stored = self
            .store
            .find_by_name(name)
            .await
            .map_err(|e| PokedexError::Database(e.to_string()))?;

        if let Some(record) = stored {
            info!("Resolved {} from store", name);
            let record = Arc::new(record);
            self.cache.set(name, Arc::clone(&record));
            return Ok(Some(pokemon_to_dto(&record)));
        }

        let Some(raw) = self.upstream.fetch_pokemon(name).await? else {
            debug!("{} unknown to upstream catalog", name);
            return Ok(None);
        };

        let mut record = Pokemon::from_raw(raw);
        self.prefetch_type_relations(&mut record).await?;

        self.store
            .insert(&record)
            .await
            .map_err(|e| PokedexError::Database(e.to_string()))?;

        info!("Resolved {} from upstream", name);
        let record = Arc::new(record);
        self.cache.set(name, Arc::clone(&record));
        Ok(Some(pokemon_to_dto(&record)))
    }

    /// Fetches extended detail for types the store has never seen, BEFORE
    /// the insert transaction opens. Keeps network out of the transaction.
    async fn prefetch_type_relations(&self, record: &mut Pokemon) -> Result<(), PokedexError> {
        let names: Vec<String> = record.types.iter().map(|t| t.name.clone()).collect();
        let missing = self
            .store
            .missing_type_names(&names)
            .await
            .map_err(|e| PokedexError::Database(e.to_string()))?;

        for type_slot in &mut record.types {
            if !missing.contains(&type_slot.name) {
                continue;
            }

            let Some(type_id) = id_from_resource_url(&type_slot.url) else {
                warn!("Unparseable type URL for {}: {}", type_slot.name, type_slot.url);
                continue;
            };

            let detail = self.upstream.fetch_type(type_id).await?;
            type_slot.damage_relations = Some(DamageRelations::from_raw(detail.damage_relations));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl PokedexService for CachedPokedexService {
    async fn get_by_name(&self, name: &str) -> Result<Option<PokemonDto>, PokedexError> {
        if let Some(hit) = self.cache.get(name) {
            debug!("Resolved {} from cache", name);
            return Ok(Some(pokemon_to_dto(&hit)));
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(in_flight.entry(name.to_string()).or_default())
        };

        let result = {
            let _guard = key_lock.lock().await;
            self.resolve_miss(name).await
        };

        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(name)
            .is_some_and(|lock| Arc::strong_count(lock) == 2)
        {
            in_flight.remove(name);
        }

        result
    }
}
