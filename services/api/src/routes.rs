use crate::infra::AppState;
use accredit::workflows::assessment::{
    grade_bands, report_router, AssessmentReportService, Clock, Criterion, GradeBand,
    ReportRepository, MAX_CRITERION_SCORE,
};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CriterionView {
    pub(crate) number: u8,
    pub(crate) label: &'static str,
    pub(crate) base_score: f64,
    pub(crate) max_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RubricResponse {
    pub(crate) criteria: Vec<CriterionView>,
    pub(crate) grade_bands: Vec<GradeBandView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GradeBandView {
    pub(crate) grade: &'static str,
    pub(crate) description: &'static str,
    pub(crate) min_grade_point: f64,
}

impl From<&GradeBand> for GradeBandView {
    fn from(band: &GradeBand) -> Self {
        Self {
            grade: band.grade.label(),
            description: band.grade.description(),
            min_grade_point: band.min_grade_point,
        }
    }
}

pub(crate) fn with_report_routes<R, C>(
    service: Arc<AssessmentReportService<R, C>>,
) -> axum::Router
where
    R: ReportRepository + 'static,
    C: Clock + 'static,
{
    report_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/rubric", axum::routing::get(rubric_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Static description of the criteria and grade scale used for scoring.
pub(crate) async fn rubric_endpoint() -> Json<RubricResponse> {
    let criteria = Criterion::ordered()
        .iter()
        .map(|criterion| CriterionView {
            number: criterion.number(),
            label: criterion.label(),
            base_score: criterion.base_score(),
            max_score: MAX_CRITERION_SCORE,
        })
        .collect();

    Json(RubricResponse {
        criteria,
        grade_bands: grade_bands().iter().map(GradeBandView::from).collect(),
    })
}
