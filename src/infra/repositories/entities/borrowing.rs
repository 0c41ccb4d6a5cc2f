//! Borrow database entity for SeaORM.
//!
//! `from` and `to` are reserved words in SQL, so the slot bounds are stored
//! as `from_slot` and `to_slot`.

use sea_orm::entity::prelude::*;

use crate::domain::Borrow;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "borrowings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub classroom_id: String,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub from_slot: i32,
    pub to_slot: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::classroom::Entity",
        from = "Column::ClassroomId",
        to = "super::classroom::Column::Id"
    )]
    Classroom,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::classroom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Borrow {
    fn from(model: Model) -> Self {
        Borrow {
            id: model.id,
            user_id: model.user_id,
            classroom_id: model.classroom_id,
            start_time: model.start_time,
            end_time: model.end_time,
            from: model.from_slot,
            to: model.to_slot,
        }
    }
}
