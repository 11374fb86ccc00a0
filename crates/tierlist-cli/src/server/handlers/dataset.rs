//! Dataset id handler.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Response for the dataset endpoint.
#[derive(Serialize)]
pub struct DatasetResponse {
    /// Namespace clients scope their saved state by.
    pub dataset: String,
}

/// GET /api/dataset
pub async fn get_dataset(State(state): State<AppState>) -> Result<Json<DatasetResponse>, ApiError> {
    let dataset = state.store().dataset()?;
    Ok(Json(DatasetResponse { dataset }))
}
