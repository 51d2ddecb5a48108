use serde::{Deserialize, Serialize};

use crate::clients::pokeapi::{RawDamageRelations, RawPokemon};

/// Canonical, normalized representation of a species record.
///
/// `pokeapi_id` is upstream provenance only; `name` is the lookup key the
/// rest of the system uses. Ability and type lists are kept sorted by slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub pokeapi_id: i32,
    pub name: String,
    pub sprite_url: String,
    pub abilities: Vec<AbilitySlot>,
    pub types: Vec<TypeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub name: String,
    pub url: String,
    pub is_hidden: bool,
    pub slot: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSlot {
    pub name: String,
    pub url: String,
    pub slot: i32,
    /// Filled in by the resolver for types not yet known to the store.
    pub damage_relations: Option<DamageRelations>,
}

/// Matchup chart for a single type, names only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageRelations {
    pub double_damage_from: Vec<String>,
    pub double_damage_to: Vec<String>,
    pub half_damage_from: Vec<String>,
    pub half_damage_to: Vec<String>,
    pub no_damage_from: Vec<String>,
    pub no_damage_to: Vec<String>,
}

impl Pokemon {
    /// Normalizes a raw upstream payload into the canonical shape.
    ///
    /// Pure: the only transformation beyond field mapping is sorting the
    /// ability and type lists by slot ascending, so downstream consumers can
    /// rely on slot order without re-sorting.
    #[must_use]
    pub fn from_raw(raw: RawPokemon) -> Self {
        let mut abilities: Vec<AbilitySlot> = raw
            .abilities
            .into_iter()
            .map(|a| AbilitySlot {
                name: a.ability.name,
                url: a.ability.url,
                is_hidden: a.is_hidden,
                slot: a.slot,
            })
            .collect();
        abilities.sort_by_key(|a| a.slot);

        let mut types: Vec<TypeSlot> = raw
            .types
            .into_iter()
            .map(|t| TypeSlot {
                name: t.type_info.name,
                url: t.type_info.url,
                slot: t.slot,
                damage_relations: None,
            })
            .collect();
        types.sort_by_key(|t| t.slot);

        Self {
            pokeapi_id: raw.id,
            name: raw.name,
            sprite_url: raw.sprites.front_default.unwrap_or_default(),
            abilities,
            types,
        }
    }
}

impl DamageRelations {
    #[must_use]
    pub fn from_raw(raw: RawDamageRelations) -> Self {
        let names = |resources: Vec<crate::clients::pokeapi::RawNamedResource>| {
            resources.into_iter().map(|r| r.name).collect()
        };

        Self {
            double_damage_from: names(raw.double_damage_from),
            double_damage_to: names(raw.double_damage_to),
            half_damage_from: names(raw.half_damage_from),
            half_damage_to: names(raw.half_damage_to),
            no_damage_from: names(raw.no_damage_from),
            no_damage_to: names(raw.no_damage_to),
        }
    }
}
