pub use sea_orm_migration::prelude::*;

mod util;
mod m20250802_101500_init;
mod m20250804_093000_seed_demo_company;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250802_101500_init::Migration),
            Box::new(m20250804_093000_seed_demo_company::Migration),
        ]
    }
}
