pub mod prelude;

pub mod abilities;
pub mod pokemon;
pub mod pokemon_abilities;
pub mod pokemon_types;
pub mod types;
