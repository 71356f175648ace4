//! Endpoint triggering a pull-and-merge from the remote directory.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use std::sync::Arc;

use super::error::ApiError;
use crate::auth::CurrentCustomer;
use crate::db::{CustomerView, Database};
use crate::sync::{RemoteConfig, RemoteDirectory, SyncError, merge_customers};

#[derive(Clone)]
pub struct SyncState {
    pub db: Database,
    pub remote: Option<Arc<RemoteConfig>>,
}

pub fn router(state: SyncState) -> Router {
    Router::new()
        .route("/sync", post(sync_customers))
        .with_state(state)
}

async fn sync_customers(
    State(state): State<SyncState>,
    CurrentCustomer(session): CurrentCustomer,
) -> Result<impl IntoResponse, ApiError> {
    let remote = state
        .remote
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Remote directory is not configured"))?;

    let directory = RemoteDirectory::new(remote.as_ref().clone());
    let records = directory.fetch_customers().await.map_err(|e| {
        tracing::error!(error = %e, "Remote fetch failed");
        ApiError::bad_gateway(e.to_string())
    })?;

    let written = merge_customers(&state.db, &records, &session.customer.uuid)
        .await
        .map_err(|e| match e {
            SyncError::Database(e) => ApiError::db_error("Failed to merge synced customers", e),
            other => ApiError::bad_gateway(other.to_string()),
        })?;

    let views: Vec<CustomerView> = written.iter().map(CustomerView::from).collect();
    Ok((StatusCode::CREATED, Json(views)))
}
