//! HTTP handlers for customer create and list.

use crate::error::AppError;
use crate::model::{Customer, CustomerPayload};
use crate::state::AppState;
use crate::store::CustomerStore;
use crate::validation::RequestValidator;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

/// Create a customer.
///
/// Validation runs before any store call and reports every failing field at
/// once. Authentication is a precondition enforced by upstream middleware,
/// not here.
#[utoipa::path(
    post,
    path = "/api/customers/",
    request_body = CustomerPayload,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Validation failure or duplicate record"),
    ),
    tag = "customers",
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let payload = CustomerPayload::from_value(body)?;
    let candidate = RequestValidator::validate(&payload)?;
    let created = CustomerStore::create(&state.pool, &candidate).await?;
    tracing::info!(id = created.id, "customer created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// List all customers, newest first. Read-only; open to anonymous callers.
#[utoipa::path(
    get,
    path = "/api/customers/",
    responses((status = 200, description = "All customers, newest first", body = [Customer])),
    tag = "customers",
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let rows = CustomerStore::list(&state.pool).await?;
    Ok(Json(rows))
}
