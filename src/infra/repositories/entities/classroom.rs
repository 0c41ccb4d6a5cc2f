//! Classroom database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Classroom;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "classrooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub place: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::borrowing::Entity")]
    Borrowing,
}

impl Related<super::borrowing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrowing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Borrows are attached separately when requested.
impl From<Model> for Classroom {
    fn from(model: Model) -> Self {
        Classroom {
            id: model.id,
            name: model.name,
            place: model.place,
            description: model.description,
            borrows: None,
        }
    }
}
