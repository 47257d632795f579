pub use sea_orm_migration::prelude::*;

mod m20250110_000000_bootstrap;
mod m20250110_000001_create_pricing_rates;
mod m20250110_000002_create_hidden_dependency_rules;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000000_bootstrap::Migration),
            Box::new(m20250110_000001_create_pricing_rates::Migration),
            Box::new(m20250110_000002_create_hidden_dependency_rules::Migration),
        ]
    }
}
