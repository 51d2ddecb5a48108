pub use super::abilities::Entity as Abilities;
pub use super::pokemon::Entity as Pokemon;
pub use super::pokemon_abilities::Entity as PokemonAbilities;
pub use super::pokemon_types::Entity as PokemonTypes;
pub use super::types::Entity as Types;
