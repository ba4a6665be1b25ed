pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20250724_000001_identity_tables;
mod m20250724_000002_bookmaker_tables;
mod m20250724_000003_link_tables;
mod m20250724_000004_telegram_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250724_000001_identity_tables::Migration),
            Box::new(m20250724_000002_bookmaker_tables::Migration),
            Box::new(m20250724_000003_link_tables::Migration),
            Box::new(m20250724_000004_telegram_table::Migration),
        ]
    }
}
