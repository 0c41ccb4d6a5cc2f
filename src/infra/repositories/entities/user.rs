//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Password, UserCredentials, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub department_id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub password: String,
    pub job: String,
    pub extension: String,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    #[sea_orm(has_many = "super::borrowing::Entity")]
    Borrowing,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::borrowing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrowing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UserCredentials {
    fn from(model: Model) -> Self {
        UserCredentials {
            id: model.id,
            username: model.username,
            role: UserRole::from(model.role.as_str()),
            password: Password::from_hash(model.password),
        }
    }
}
