use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::config::WizardConfig;
use crate::workflows::assessment::domain::{AssessmentReport, OwnerId, RawFields};
use crate::workflows::assessment::repository::{ReportRepository, RepositoryError};
use crate::workflows::assessment::service::{AssessmentReportService, Clock};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn owner(name: &str) -> OwnerId {
    OwnerId(name.to_string())
}

pub(super) fn fields(value: Value) -> RawFields {
    match value {
        Value::Object(map) => RawFields::from(map),
        other => panic!("fixture must be a JSON object, got {other}"),
    }
}

/// Inputs that fire most bonuses; expected criterion scores are
/// 4.0, 3.5, 2.85, 3.5, 3.1, 2.6, 3.3 for a mean of 22.85 / 7.
pub(super) fn strong_institution() -> RawFields {
    fields(json!({
        "totalStudentsUG": 900,
        "totalStudentsPG": 250,
        "totalStudentsPhD": 50,
        "teachingStaff": 80,
        "publications": 120,
        "placedStudents": 1000,
        "researchProjects": [
            {"title": "Groundwater mapping", "amount": 2_500_000},
            {"title": "Crop genomics", "amount": 2_000_000},
            {"title": "Edge AI", "amount": 1_500_000},
            {"title": "Battery recycling", "amount": 1_500_000},
            {"title": "Rural health", "amount": 1_000_000},
            {"title": "Heritage archive", "amount": 500_000},
        ],
        "classrooms": 20,
        "ictClassrooms": 18,
        "programmesRevised": 12,
        "collectsFeedback": true,
        "academicFlexibility": ["choice based credits", "open electives"],
        "valueAddedCourses": ["communication skills"],
        "crossCuttingIssues": ["gender", "environment", "human values"],
        "admissionProcess": "Merit list published per state norms",
        "assessmentMethods": ["written", "practical", "seminar", "project"],
        "patents": 2,
        "consultancyRevenue": 250_000,
        "laboratories": 15,
        "libraryBooks": 25_000,
        "internetBandwidth": 500,
        "computers": 400,
        "scholarshipRecipients": 300,
        "higherStudies": 120,
        "visionStatement": "Knowledge for inclusive growth",
        "missionStatement": "Accessible, research-led education",
        "iqacMeetings": 4,
        "strategicPlan": true,
        "environmentalInitiatives": ["solar", "rainwater harvesting", "green audit"],
        "genderEquity": true,
        "inclusivity": "Ramps, lifts and scribe support",
        "bestPractices": ["community outreach clinic"],
        "institutionalDistinctiveness": "Tribal language preservation centre",
    }))
}

pub(super) fn wizard() -> WizardConfig {
    WizardConfig::new(8).expect("non-zero wizard length")
}

pub(super) fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Clock that advances one minute per reading.
#[derive(Default)]
pub(super) struct SteppingClock {
    ticks: AtomicI64,
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        generated_at() + Duration::minutes(tick)
    }
}

pub(super) type TestService<R> = AssessmentReportService<R, SteppingClock>;

pub(super) fn build_service() -> (TestService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = service_with(repository.clone());
    (service, repository)
}

pub(super) fn service_with<R>(repository: Arc<R>) -> TestService<R>
where
    R: ReportRepository + 'static,
{
    AssessmentReportService::with_clock(repository, Arc::new(SteppingClock::default()), wizard())
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<OwnerId, AssessmentReport>>>,
    pub(super) updates: Arc<AtomicUsize>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, owner_id: &OwnerId) -> Option<AssessmentReport> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(owner_id)
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ReportRepository for MemoryRepository {
    fn find(&self, owner_id: &OwnerId) -> Result<Option<AssessmentReport>, RepositoryError> {
        Ok(self.stored(owner_id))
    }

    fn insert(&self, report: AssessmentReport) -> Result<AssessmentReport, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&report.owner_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.owner_id.clone(), report.clone());
        Ok(report)
    }

    fn update(&self, report: AssessmentReport) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&report.owner_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(report.owner_id.clone(), report);
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn find(&self, _owner_id: &OwnerId) -> Result<Option<AssessmentReport>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _report: AssessmentReport) -> Result<AssessmentReport, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _report: AssessmentReport) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Misses the first lookup, then loses the insert race to another writer.
pub(super) struct RacingRepository {
    pub(super) inner: MemoryRepository,
    lookups: AtomicUsize,
}

impl RacingRepository {
    pub(super) fn with_existing(report: AssessmentReport) -> Self {
        let inner = MemoryRepository::default();
        inner
            .records
            .lock()
            .expect("repository mutex poisoned")
            .insert(report.owner_id.clone(), report);
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }
}

impl ReportRepository for RacingRepository {
    fn find(&self, owner_id: &OwnerId) -> Result<Option<AssessmentReport>, RepositoryError> {
        if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(None);
        }
        self.inner.find(owner_id)
    }

    fn insert(&self, report: AssessmentReport) -> Result<AssessmentReport, RepositoryError> {
        self.inner.insert(report)
    }

    fn update(&self, report: AssessmentReport) -> Result<(), RepositoryError> {
        self.inner.update(report)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
