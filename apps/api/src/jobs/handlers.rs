//! Axum route handlers for the job search API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::{SearchCriteria, SearchResults};
use crate::state::AppState;

/// POST /api/jobs/search
///
/// Runs the full pipeline: scrape → normalize → relevance filter.
/// Backend trouble during filtering degrades to unfiltered listings; only
/// source or snapshot failures surface as a 500.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(criteria): Json<SearchCriteria>,
) -> Result<Json<SearchResults>, AppError> {
    if criteria.position.trim().is_empty() {
        return Err(AppError::Validation("position cannot be empty".to_string()));
    }
    if criteria.location.trim().is_empty() {
        return Err(AppError::Validation("location cannot be empty".to_string()));
    }

    let results = state
        .pipeline
        .run(&criteria)
        .await
        .map_err(|e| AppError::Search(e.to_string()))?;

    Ok(Json(results))
}
