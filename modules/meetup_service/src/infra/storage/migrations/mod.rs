//! Database migrations for meetup service

use sea_orm_migration::prelude::*;

mod m20230801_000001_create_participants;
mod m20230801_000002_create_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20230801_000001_create_participants::Migration),
            Box::new(m20230801_000002_create_events::Migration),
        ]
    }
}

