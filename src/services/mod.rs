pub mod pokedex_service;
pub use pokedex_service::{CatalogStore, PokedexError, PokedexService, UpstreamCatalog};

pub mod pokedex_service_impl;
pub use pokedex_service_impl::CachedPokedexService;
