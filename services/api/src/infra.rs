use accredit::error::AppError;
use accredit::workflows::assessment::{
    AssessmentReport, AssessmentReportService, OwnerId, RawFields, ReportRepository,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ReportService = AssessmentReportService<InMemoryReportRepository>;

/// Process-local report store used by the service binary and the demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<HashMap<OwnerId, AssessmentReport>>>,
}

impl InMemoryReportRepository {
    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<OwnerId, AssessmentReport>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("report store mutex poisoned".to_string()))
    }
}

impl ReportRepository for InMemoryReportRepository {
    fn find(&self, owner_id: &OwnerId) -> Result<Option<AssessmentReport>, RepositoryError> {
        Ok(self.guard()?.get(owner_id).cloned())
    }

    fn insert(&self, report: AssessmentReport) -> Result<AssessmentReport, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&report.owner_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.owner_id.clone(), report.clone());
        Ok(report)
    }

    fn update(&self, report: AssessmentReport) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&report.owner_id) {
            guard.insert(report.owner_id.clone(), report);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

/// Read a JSON object of raw wizard fields from disk.
pub(crate) fn read_fields(path: &Path) -> Result<RawFields, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_fields(&raw)
}

pub(crate) fn parse_fields(raw: &str) -> Result<RawFields, AppError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(RawFields::from(map)),
        other => Err(AppError::Payload(serde::de::Error::custom(format!(
            "expected a JSON object of fields, found {}",
            json_kind(&other)
        )))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
