use std::collections::HashSet;

use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{abilities, pokemon, pokemon_abilities, pokemon_types, types};
use crate::models::pokemon::{AbilitySlot, Pokemon, TypeSlot};

pub struct PokemonRepository {
    conn: DatabaseConnection,
}

impl PokemonRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Exact-match lookup by display name. An absent row is `Ok(None)`,
    /// never an error. Ability and type lists come back ordered by slot.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Pokemon>> {
        let Some(row) = pokemon::Entity::find()
            .filter(pokemon::Column::Name.eq(name))
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let ability_rows = pokemon_abilities::Entity::find()
            .filter(pokemon_abilities::Column::PokemonId.eq(row.id))
            .order_by_asc(pokemon_abilities::Column::Slot)
            .find_also_related(abilities::Entity)
            .all(&self.conn)
            .await?;

        let abilities = ability_rows
            .into_iter()
            .filter_map(|(assoc, ability)| {
                ability.map(|a| AbilitySlot {
                    name: a.name,
                    url: a.pokeapi_url,
                    is_hidden: assoc.is_hidden,
                    slot: assoc.slot,
                })
            })
            .collect();

        let type_rows = pokemon_types::Entity::find()
            .filter(pokemon_types::Column::PokemonId.eq(row.id))
            .order_by_asc(pokemon_types::Column::Slot)
            .find_also_related(types::Entity)
            .all(&self.conn)
            .await?;

        let types = type_rows
            .into_iter()
            .filter_map(|(assoc, type_row)| {
                type_row.map(|t| TypeSlot {
                    name: t.name,
                    url: t.pokeapi_url,
                    slot: assoc.slot,
                    damage_relations: t
                        .damage_relations
                        .and_then(|json| serde_json::from_str(&json).ok()),
                })
            })
            .collect();

        Ok(Some(Pokemon {
            pokeapi_id: row.pokeapi_id,
            name: row.name,
            sprite_url: row.sprite_url,
            abilities,
            types,
        }))
    }

    /// Persists a record and all of its associations in one transaction.
    ///
    /// Abilities and types are de-duplicated by name: an existing row's id
    /// is reused, a missing one is inserted. A record row that already
    /// exists for the same upstream id is likewise reused, so retrying the
    /// whole insert cannot duplicate the record itself. Association rows
    /// are written unconditionally; the resolver's single-flight barrier
    /// guarantees at most one insert call per miss.
    pub async fn insert(&self, record: &Pokemon) -> Result<()> {
        let txn = self.conn.begin().await?;
        let created_at = chrono::Utc::now().to_rfc3339();

        let pokemon_id = match pokemon::Entity::find()
            .filter(pokemon::Column::PokeapiId.eq(record.pokeapi_id))
            .one(&txn)
            .await?
        {
            Some(existing) => existing.id,
            None => {
                pokemon::Entity::insert(pokemon::ActiveModel {
                    pokeapi_id: Set(record.pokeapi_id),
                    name: Set(record.name.clone()),
                    sprite_url: Set(record.sprite_url.clone()),
                    created_at: Set(created_at),
                    ..Default::default()
                })
                .exec(&txn)
                .await?
                .last_insert_id
            }
        };

        for ability in &record.abilities {
            let ability_id = match abilities::Entity::find()
                .filter(abilities::Column::Name.eq(&ability.name))
                .one(&txn)
                .await?
            {
                Some(existing) => existing.id,
                None => {
                    abilities::Entity::insert(abilities::ActiveModel {
                        name: Set(ability.name.clone()),
                        pokeapi_url: Set(ability.url.clone()),
                        ..Default::default()
                    })
                    .exec(&txn)
                    .await?
                    .last_insert_id
                }
            };

            pokemon_abilities::Entity::insert(pokemon_abilities::ActiveModel {
                pokemon_id: Set(pokemon_id),
                ability_id: Set(ability_id),
                is_hidden: Set(ability.is_hidden),
                slot: Set(ability.slot),
                ..Default::default()
            })
            .exec(&txn)
            .await?;
        }

        for type_slot in &record.types {
            let type_id = match types::Entity::find()
                .filter(types::Column::Name.eq(&type_slot.name))
                .one(&txn)
                .await?
            {
                Some(existing) => existing.id,
                None => {
                    let damage_relations = type_slot
                        .damage_relations
                        .as_ref()
                        .and_then(|r| serde_json::to_string(r).ok());

                    types::Entity::insert(types::ActiveModel {
                        name: Set(type_slot.name.clone()),
                        pokeapi_url: Set(type_slot.url.clone()),
                        damage_relations: Set(damage_relations),
                        ..Default::default()
                    })
                    .exec(&txn)
                    .await?
                    .last_insert_id
                }
            };

            pokemon_types::Entity::insert(pokemon_types::ActiveModel {
                pokemon_id: Set(pokemon_id),
                type_id: Set(type_id),
                slot: Set(type_slot.slot),
                ..Default::default()
            })
            .exec(&txn)
            .await?;
        }

        txn.commit().await?;

        info!(
            "Persisted {} ({} abilities, {} types)",
            record.name,
            record.abilities.len(),
            record.types.len()
        );
        Ok(())
    }

    /// Returns the subset of the given type names that have no row yet.
    /// The resolver uses this to fetch extended type detail before any
    /// transaction is opened.
    pub async fn missing_type_names(&self, names: &[String]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let existing: HashSet<String> = types::Entity::find()
            .filter(types::Column::Name.is_in(names.iter().cloned()))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|t| t.name)
            .collect();

        Ok(names
            .iter()
            .filter(|name| !existing.contains(*name))
            .cloned()
            .collect())
    }
}
