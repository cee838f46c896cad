use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Map, Value};

use super::domain::{OwnerId, RawFields};
use super::repository::{ReportRepository, RepositoryError};
use super::service::{AssessmentReportService, Clock, ReportServiceError};

/// Router builder exposing the report lifecycle over HTTP.
pub fn report_router<R, C>(service: Arc<AssessmentReportService<R, C>>) -> Router
where
    R: ReportRepository + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/api/v1/reports/:owner_id", get(report_handler::<R, C>))
        .route(
            "/api/v1/reports/:owner_id/steps/:step",
            put(save_step_handler::<R, C>),
        )
        .route(
            "/api/v1/reports/:owner_id/generate",
            post(generate_handler::<R, C>),
        )
        .route(
            "/api/v1/reports/:owner_id/summary",
            get(summary_handler::<R, C>),
        )
        .with_state(service)
}

pub(crate) async fn report_handler<R, C>(
    State(service): State<Arc<AssessmentReportService<R, C>>>,
    Path(owner_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    C: Clock + 'static,
{
    match service.get_report(&OwnerId(owner_id)) {
        Ok(report) => {
            let payload = json!({ "success": true, "report": report });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn save_step_handler<R, C>(
    State(service): State<Arc<AssessmentReportService<R, C>>>,
    Path((owner_id, step)): Path<(String, u32)>,
    axum::Json(fields): axum::Json<Map<String, Value>>,
) -> Response
where
    R: ReportRepository + 'static,
    C: Clock + 'static,
{
    match service.save_step(&OwnerId(owner_id), Some(step), RawFields::from(fields)) {
        Ok(report) => {
            let payload = json!({ "success": true, "report": report });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn generate_handler<R, C>(
    State(service): State<Arc<AssessmentReportService<R, C>>>,
    Path(owner_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    C: Clock + 'static,
{
    match service.generate(&OwnerId(owner_id)) {
        Ok(generated) => {
            let payload = json!({
                "success": true,
                "report": generated.report,
                "calculations": generated.calculations,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn summary_handler<R, C>(
    State(service): State<Arc<AssessmentReportService<R, C>>>,
    Path(owner_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    C: Clock + 'static,
{
    match service.summary(&OwnerId(owner_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => failure_response(error),
    }
}

fn failure_response(error: ReportServiceError) -> Response {
    let status = match &error {
        ReportServiceError::InvalidStep(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReportServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ReportServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "success": false,
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
