use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::clients::pokeapi::PokeApiClient;
use crate::config::Config;
use crate::db::Store;
use crate::models::pokemon::Pokemon;
use crate::services::{CachedPokedexService, PokedexService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reusing one client across services enables connection pooling and
/// avoids socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Dexarr/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub pokeapi: Arc<PokeApiClient>,

    pub cache: Arc<TtlCache<Pokemon>>,

    pub pokedex: Arc<dyn PokedexService>,

    pub start_time: std::time::Instant,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        let http_client = build_shared_http_client(config.upstream.request_timeout_seconds)?;
        let pokeapi = Arc::new(PokeApiClient::with_shared_client(
            http_client,
            config.upstream.base_url.clone(),
        ));

        let cache = Arc::new(TtlCache::new(Duration::from_secs(config.cache.ttl_seconds)));

        let pokedex = Arc::new(CachedPokedexService::new(
            Arc::new(store.clone()),
            Arc::clone(&pokeapi) as Arc<dyn crate::services::UpstreamCatalog>,
            Arc::clone(&cache),
        )) as Arc<dyn PokedexService>;

        Ok(Self {
            config,
            store,
            pokeapi,
            cache,
            pokedex,
            start_time: std::time::Instant::now(),
        })
    }
}
