//! Job record handlers.

use axum::extract::{Path, State};
use axum::Json;

use retitle_models::{Job, JobId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/jobs/:job_id
///
/// The persisted record is the sole observability channel for both
/// progress and failure, so this returns it verbatim.
///
/// Returns:
/// - 200: the job record
/// - 404: no record for this id
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Job>> {
    let job = state
        .store
        .get(&JobId::from_string(job_id.as_str()))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}
