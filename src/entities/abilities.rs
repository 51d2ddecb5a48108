use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "abilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub pokeapi_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pokemon_abilities::Entity")]
    PokemonAbilities,
}

impl Related<super::pokemon_abilities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PokemonAbilities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
