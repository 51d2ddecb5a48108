use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pokemon")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub pokeapi_id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub sprite_url: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pokemon_abilities::Entity")]
    PokemonAbilities,
    #[sea_orm(has_many = "super::pokemon_types::Entity")]
    PokemonTypes,
}

impl Related<super::pokemon_abilities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PokemonAbilities.def()
    }
}

impl Related<super::pokemon_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PokemonTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
