use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub pokeapi_url: String,
    /// Damage relations against other types, serialized as JSON. Populated
    /// from the upstream type-detail endpoint when the row is first created.
    #[sea_orm(column_type = "Text", nullable)]
    pub damage_relations: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pokemon_types::Entity")]
    PokemonTypes,
}

impl Related<super::pokemon_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PokemonTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
