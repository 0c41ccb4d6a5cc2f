//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20241016_000001_create_departments_and_users;
mod m20241016_000002_create_classrooms_and_borrowings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241016_000001_create_departments_and_users::Migration),
            Box::new(m20241016_000002_create_classrooms_and_borrowings::Migration),
        ]
    }
}
