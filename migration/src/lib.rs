pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20251019_000001_users;
mod m20251019_000002_device_templates;
mod m20251019_000003_device_profiles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251019_000001_users::Migration),
            Box::new(m20251019_000002_device_templates::Migration),
            Box::new(m20251019_000003_device_profiles::Migration),
        ]
    }
}
