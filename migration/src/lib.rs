pub use sea_orm_migration::prelude::*;

mod util;
mod m20260212_093045_init;
mod m20260218_114530_seed_demo_company;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260212_093045_init::Migration),
            Box::new(m20260218_114530_seed_demo_company::Migration),
        ]
    }
}
