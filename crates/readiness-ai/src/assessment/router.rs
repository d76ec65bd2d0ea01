use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{NewAssessmentSubmission, SubmissionId, SubmissionStatus};
use super::pipeline::{AssessmentPipeline, PipelineError};
use super::repository::{FollowUpRepository, RepositoryError, SubmissionRepository};

/// Router builder exposing HTTP endpoints for intake and status polling.
pub fn assessment_router<S, F>(pipeline: Arc<AssessmentPipeline<S, F>>) -> Router
where
    S: SubmissionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<S, F>))
        .route(
            "/api/v1/assessments/:submission_id",
            get(status_handler::<S, F>),
        )
        .with_state(pipeline)
}

/// Intake payloads that cannot enter the pipeline at all.
fn validate_intake(intake: &NewAssessmentSubmission) -> Result<(), &'static str> {
    if !intake.email.contains('@') {
        return Err("a valid contact email is required");
    }
    if intake.company_name.trim().is_empty() || intake.contact_name.trim().is_empty() {
        return Err("company and contact names are required");
    }
    if !intake.processing_consent {
        return Err("processing consent is required to run the assessment");
    }
    if intake.responses.iter().all(|set| set.responses.is_empty()) {
        return Err("at least one answered question is required");
    }
    Ok(())
}

pub(crate) async fn submit_handler<S, F>(
    State(pipeline): State<Arc<AssessmentPipeline<S, F>>>,
    axum::Json(intake): axum::Json<NewAssessmentSubmission>,
) -> Response
where
    S: SubmissionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    if let Err(reason) = validate_intake(&intake) {
        let payload = json!({
            "error": reason,
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match pipeline.submit(intake) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(PipelineError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "submission already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<S, F>(
    State(pipeline): State<Arc<AssessmentPipeline<S, F>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    S: SubmissionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    let id = SubmissionId(submission_id);
    match pipeline.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        // Unknown ids read as still-pending rather than erroring; intake
        // and polling are not synchronized on the client side.
        Err(PipelineError::NotFound(_)) => {
            let payload = json!({
                "submission_id": id.0,
                "status": SubmissionStatus::Pending.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
