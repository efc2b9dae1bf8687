// ABOUTME: SeaORM migration module for database schema management
// ABOUTME: Runs at startup so demo-mode in-memory databases get the same schema

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_profile_tables::Migration),
        ]
    }
}

pub mod m20250601_000001_create_profile_tables;
