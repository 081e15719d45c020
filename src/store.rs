//! Customer persistence: database bootstrap and the create/list operations.

use crate::error::AppError;
use crate::model::{Customer, NewCustomer};
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const CUSTOMER_COLUMNS: &str = "id, first_name, last_name, document_type, document_number, \
     email, phone, birth_date, created_at, updated_at, is_active";

pub struct CustomerStore;

impl CustomerStore {
    /// Insert one customer and return the fully populated record.
    ///
    /// The duplicate pre-checks exist for the friendlier error message; the
    /// unique indexes remain the actual enforcement, so a violation that
    /// escapes the pre-check under concurrent writers maps to the same error.
    /// Nothing is written on failure.
    pub async fn create(pool: &PgPool, candidate: &NewCustomer) -> Result<Customer, AppError> {
        let document_taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE document_type = $1 AND document_number = $2)",
        )
        .bind(candidate.document_type.as_str())
        .bind(&candidate.document_number)
        .fetch_one(pool)
        .await?;
        if document_taken {
            return Err(AppError::DuplicateDocument);
        }

        let email_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1)")
                .bind(&candidate.email)
                .fetch_one(pool)
                .await?;
        if email_taken {
            return Err(AppError::DuplicateEmail);
        }

        tracing::debug!(
            document_type = candidate.document_type.as_str(),
            "insert customer"
        );
        let sql = format!(
            "INSERT INTO customers \
                 (first_name, last_name, document_type, document_number, email, phone, birth_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {}",
            CUSTOMER_COLUMNS
        );
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(&candidate.first_name)
            .bind(&candidate.last_name)
            .bind(candidate.document_type.as_str())
            .bind(&candidate.document_number)
            .bind(&candidate.email)
            .bind(&candidate.phone)
            .bind(candidate.birth_date)
            .fetch_one(pool)
            .await
            .map_err(map_unique_violation)?;
        Ok(row)
    }

    /// All customers, newest first. Ties on created_at fall back to id so
    /// the order is total.
    pub async fn list(pool: &PgPool) -> Result<Vec<Customer>, AppError> {
        let sql = format!(
            "SELECT {} FROM customers ORDER BY created_at DESC, id DESC",
            CUSTOMER_COLUMNS
        );
        let rows = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
        Ok(rows)
    }
}

/// Translate a unique-index violation raised by the insert itself (the
/// pre-check lost a race) into the matching duplicate error.
fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = err {
        if matches!(db.kind(), ErrorKind::UniqueViolation) {
            return match db.constraint() {
                Some("customers_email_key") => AppError::DuplicateEmail,
                _ => AppError::DuplicateDocument,
            };
        }
    }
    AppError::Db(err)
}

/// Ensure the database in `database_url` exists; create it if not. Connects
/// to the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(AppError::Db)?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await
            .map_err(AppError::Db)?;
    if !exists.0 {
        let quoted = quote_ident(&db_name);
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::Db(sqlx::Error::Configuration("DATABASE_URL: no path".into())))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
