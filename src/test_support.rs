#![cfg(test)]

use crate::migration::apply_migrations;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process.
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connection pool for tests against the database in `DATABASE_URL`.
pub async fn get_pool() -> Result<PgPool, anyhow::Error> {
    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    MIGRATED
        .get_or_init(|| async {
            apply_migrations(&pool).await.expect("apply migrations");
        })
        .await;
    Ok(pool)
}
