use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pokemon_abilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pokemon_id: i32,
    pub ability_id: i32,
    pub is_hidden: bool,
    pub slot: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pokemon::Entity",
        from = "Column::PokemonId",
        to = "super::pokemon::Column::Id"
    )]
    Pokemon,
    #[sea_orm(
        belongs_to = "super::abilities::Entity",
        from = "Column::AbilityId",
        to = "super::abilities::Column::Id"
    )]
    Ability,
}

impl Related<super::pokemon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pokemon.def()
    }
}

impl Related<super::abilities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ability.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
