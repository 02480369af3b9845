//! Channel submission handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use retitle_models::{Event, Job, JobId, SubmitJob};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Submission request body.
///
/// Fields are optional so a missing one produces the contract's 400
/// message instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub email: Option<SubmitEmail>,
    /// Accepted for compatibility; a server-side id is generated when absent.
    #[serde(default, rename = "jobId")]
    pub job_id: Option<String>,
}

/// Nested email object in the submission body.
#[derive(Debug, Deserialize)]
pub struct SubmitEmail {
    #[serde(default)]
    pub email: Option<String>,
}

/// Created-job acknowledgment.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(rename = "jobId")]
    pub job_id: String,
    pub message: String,
}

/// POST /api/submit
///
/// Creates a queued job record and triggers the pipeline by emitting
/// `yt.submit`. The record exists before the event goes out, so every
/// downstream stage finds it.
///
/// Returns:
/// - 201: job created
/// - 400: missing channel or email (nothing persisted)
pub async fn submit_channel(
    State(state): State<AppState>,
    Json(body): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    let channel = body.channel.unwrap_or_default();
    let email = body.email.and_then(|e| e.email).unwrap_or_default();

    if channel.is_empty() || email.is_empty() {
        return Err(ApiError::bad_request(
            "Missing required fields: channel and email",
        ));
    }

    let job_id = body
        .job_id
        .filter(|id| !id.is_empty())
        .map(JobId::from_string)
        .unwrap_or_default();

    let job = Job::new(job_id.clone(), email.as_str(), channel.as_str());
    state.store.put(&job).await?;

    info!(job_id = %job_id, channel = %channel, email = %email, "Job created");

    state.bus.emit(Event::Submit(SubmitJob {
        job_id: job_id.clone(),
        email,
        channel,
    }));

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            job_id: job_id.to_string(),
            message: "Your request has been queued! You will soon get an email with improved video titles."
                .to_string(),
        }),
    ))
}
