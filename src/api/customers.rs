//! Customer record management endpoints. All of these require an
//! authenticated session.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;

use super::error::{ApiError, ResultExt};
use crate::auth::CurrentCustomer;
use crate::db::{CustomerProfile, CustomerView, Database};

#[derive(Clone)]
pub struct CustomersState {
    pub db: Database,
}

pub fn router(state: CustomersState) -> Router {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route("/me", get(current_customer))
        .route("/by-email", get(get_by_email))
        .route("/page/{page_no}/{page_size}", get(list_page))
        .route("/{uuid}", get(get_by_uuid))
        .route("/{uuid}", put(update_customer))
        .route("/{uuid}", delete(delete_customer))
        .with_state(state)
}

async fn create_customer(
    State(state): State<CustomersState>,
    CurrentCustomer(_session): CurrentCustomer,
    Json(profile): Json<CustomerProfile>,
) -> Result<impl IntoResponse, ApiError> {
    let email = profile.email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("Email cannot be empty"));
    }

    let existing = state
        .db
        .customers()
        .get_by_email(email)
        .await
        .db_err("Failed to check for existing customer")?;
    if existing.is_some() {
        return Err(ApiError::conflict("A customer with this email already exists"));
    }

    let uuid = uuid::Uuid::new_v4().to_string();
    state
        .db
        .customers()
        .create(&uuid, "", &profile)
        .await
        .db_err("Failed to create customer")?;

    let customer = state
        .db
        .customers()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to load created customer")?
        .ok_or_else(|| ApiError::internal("Created customer not found"))?;

    tracing::info!(uuid = %uuid, "Customer created");
    Ok((StatusCode::CREATED, Json(CustomerView::from(&customer))))
}

async fn list_customers(
    State(state): State<CustomersState>,
    CurrentCustomer(_session): CurrentCustomer,
) -> Result<impl IntoResponse, ApiError> {
    let customers = state
        .db
        .customers()
        .list_all()
        .await
        .db_err("Failed to list customers")?;

    let views: Vec<CustomerView> = customers.iter().map(CustomerView::from).collect();
    Ok(Json(views))
}

async fn current_customer(
    CurrentCustomer(session): CurrentCustomer,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(CustomerView::from(&session.customer)))
}

#[derive(Deserialize)]
struct ByEmailQuery {
    email: String,
}

async fn get_by_email(
    State(state): State<CustomersState>,
    CurrentCustomer(_session): CurrentCustomer,
    Query(query): Query<ByEmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .db
        .customers()
        .get_by_email(&query.email)
        .await
        .db_err("Failed to get customer")?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    Ok(Json(CustomerView::from(&customer)))
}

async fn get_by_uuid(
    State(state): State<CustomersState>,
    CurrentCustomer(_session): CurrentCustomer,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .db
        .customers()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to get customer")?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    Ok(Json(CustomerView::from(&customer)))
}

async fn update_customer(
    State(state): State<CustomersState>,
    CurrentCustomer(_session): CurrentCustomer,
    Path(uuid): Path<String>,
    Json(profile): Json<CustomerProfile>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .db
        .customers()
        .update(&uuid, &profile)
        .await
        .db_err("Failed to update customer")?;
    if !updated {
        return Err(ApiError::not_found("Customer not found"));
    }

    let customer = state
        .db
        .customers()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to load updated customer")?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    tracing::info!(uuid = %uuid, "Customer updated");
    Ok(Json(CustomerView::from(&customer)))
}

async fn delete_customer(
    State(state): State<CustomersState>,
    CurrentCustomer(session): CurrentCustomer,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if session.customer.uuid == uuid {
        return Err(ApiError::bad_request("Logged in customer cannot be deleted"));
    }

    let deleted = state
        .db
        .customers()
        .delete(&uuid)
        .await
        .db_err("Failed to delete customer")?;
    if !deleted {
        return Err(ApiError::not_found("Customer not found"));
    }

    tracing::info!(uuid = %uuid, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_page(
    State(state): State<CustomersState>,
    CurrentCustomer(_session): CurrentCustomer,
    Path((page_no, page_size)): Path<(u32, u32)>,
) -> Result<impl IntoResponse, ApiError> {
    if page_size == 0 {
        return Err(ApiError::bad_request("Page size must be at least 1"));
    }

    let customers = state
        .db
        .customers()
        .list_page(page_no, page_size)
        .await
        .db_err("Failed to list customers page-wise")?;

    let views: Vec<CustomerView> = customers.iter().map(CustomerView::from).collect();
    Ok(Json(views))
}
