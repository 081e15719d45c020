//! Bootstrap DDL for the customers table and its unique indexes.
//! Idempotent; runs on every startup.

use crate::error::AppError;
use sqlx::PgPool;

pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id BIGSERIAL PRIMARY KEY,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(150) NOT NULL,
            document_type VARCHAR(3) NOT NULL,
            document_number VARCHAR(20) NOT NULL,
            email VARCHAR(254) NOT NULL,
            phone VARCHAR(20),
            birth_date DATE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            is_active BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // These indexes are the actual uniqueness enforcement; the store's
    // pre-checks only produce friendlier messages.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS customers_document_type_number_key \
         ON customers (document_type, document_number)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS customers_email_key ON customers (email)")
        .execute(pool)
        .await?;

    Ok(())
}
