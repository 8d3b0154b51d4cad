pub mod pool;
pub mod seed;

pub use pool::create_pool;
#[cfg(test)]
pub use pool::create_memory_pool;

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Ensures the schema exists and seeds an empty table. Safe to run on every
/// startup.
pub async fn initialize(db: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR.run(db).await?;
    tracing::info!("Database migrations applied");

    if seed::seed_if_empty(db).await? {
        tracing::info!(count = seed::SEED_MEALS.len(), "Seeded empty meals table");
    }

    Ok(())
}
