use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{AssessmentReport, OwnerId, RawFields, ReportSummaryView, StepNumber};
use super::repository::{ReportRepository, RepositoryError};
use super::scoring::{calculate, Calculations};
use crate::config::WizardConfig;

/// Source of finalization timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One mutex per owner so read-modify-write cycles on a report never interleave.
/// Reports of different owners proceed independently. An owner's entry is dropped
/// once no caller holds or waits on it.
#[derive(Debug, Default)]
pub struct OwnerLocks {
    locks: Mutex<HashMap<OwnerId, Arc<Mutex<()>>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner<T>(&self, owner_id: &OwnerId, operation: impl FnOnce() -> T) -> T {
        let lock = {
            let mut registry = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            registry.entry(owner_id.clone()).or_default().clone()
        };

        let outcome = {
            let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);
            operation()
        };

        // Clones are only taken under the registry lock, so a count of two
        // (registry plus this call) means nobody else is queued on the owner.
        let mut registry = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&lock) == 2 {
            registry.remove(owner_id);
        }
        outcome
    }

    /// Number of owners with an operation in flight.
    pub fn active_owners(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Report returned by generation together with the fresh snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub report: AssessmentReport,
    pub calculations: Calculations,
}

/// Service composing the report store with the scoring engine.
pub struct AssessmentReportService<R, C = SystemClock> {
    repository: Arc<R>,
    clock: Arc<C>,
    locks: Arc<OwnerLocks>,
    wizard: WizardConfig,
}

impl<R> AssessmentReportService<R, SystemClock>
where
    R: ReportRepository + 'static,
{
    pub fn new(repository: Arc<R>, wizard: WizardConfig) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock), wizard)
    }
}

impl<R, C> AssessmentReportService<R, C>
where
    R: ReportRepository + 'static,
    C: Clock + 'static,
{
    pub fn with_clock(repository: Arc<R>, clock: Arc<C>, wizard: WizardConfig) -> Self {
        Self {
            repository,
            clock,
            locks: Arc::new(OwnerLocks::new()),
            wizard,
        }
    }

    /// Share a lock registry with other services writing to the same store.
    pub fn with_locks(mut self, locks: Arc<OwnerLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn wizard(&self) -> WizardConfig {
        self.wizard
    }

    /// Fetch the owner's report, creating an empty one on first access.
    pub fn get_report(&self, owner_id: &OwnerId) -> Result<AssessmentReport, ReportServiceError> {
        self.locks
            .with_owner(owner_id, || self.load_or_create(owner_id))
            .inspect_err(|err| log_failure(owner_id, "get_report", err))
    }

    /// Merge a wizard step into the report and mark the step as saved.
    pub fn save_step(
        &self,
        owner_id: &OwnerId,
        step: Option<u32>,
        fields: RawFields,
    ) -> Result<AssessmentReport, ReportServiceError> {
        let step = step
            .map(|value| StepNumber::new(value).ok_or(ReportServiceError::InvalidStep(value)))
            .transpose()?;
        let field_count = fields.len();

        self.locks
            .with_owner(owner_id, || {
                let mut report = self.load_or_create(owner_id)?;
                report.record_step(step, fields);
                self.repository.update(report.clone())?;

                debug!(
                    owner = %owner_id,
                    step = step.map(StepNumber::get),
                    field_count,
                    completed_steps = report.completed_steps.len(),
                    "wizard step saved"
                );
                Ok(report)
            })
            .inspect_err(|err| log_failure(owner_id, "save_step", err))
    }

    /// Score the report's current inputs, snapshot the result, and mark it completed.
    pub fn generate(&self, owner_id: &OwnerId) -> Result<GeneratedReport, ReportServiceError> {
        self.locks
            .with_owner(owner_id, || {
                let mut report = self.load_or_create(owner_id)?;
                let calculations = calculate(&report.raw_fields);
                report.finalize(calculations.clone(), self.clock.now());
                self.repository.update(report.clone())?;

                info!(
                    owner = %owner_id,
                    grade = %calculations.grade,
                    grade_point = calculations.overall_grade_point,
                    completed_steps = report.completed_steps.len(),
                    "assessment report generated"
                );
                Ok(GeneratedReport {
                    report,
                    calculations,
                })
            })
            .inspect_err(|err| log_failure(owner_id, "generate", err))
    }

    /// Progress and grade overview for dashboards.
    pub fn summary(&self, owner_id: &OwnerId) -> Result<ReportSummaryView, ReportServiceError> {
        let report = self.get_report(owner_id)?;
        Ok(report.summary_view(self.wizard.total_steps()))
    }

    fn load_or_create(&self, owner_id: &OwnerId) -> Result<AssessmentReport, ReportServiceError> {
        if let Some(report) = self.repository.find(owner_id)? {
            return Ok(report);
        }

        match self.repository.insert(AssessmentReport::new(owner_id.clone())) {
            Ok(report) => {
                debug!(owner = %owner_id, "assessment report created");
                Ok(report)
            }
            // Another writer outside this service created it first.
            Err(RepositoryError::Conflict) => self
                .repository
                .find(owner_id)?
                .ok_or(ReportServiceError::Repository(RepositoryError::NotFound)),
            Err(err) => Err(err.into()),
        }
    }
}

fn log_failure(owner_id: &OwnerId, operation: &'static str, err: &ReportServiceError) {
    match err {
        ReportServiceError::Repository(source) if source.is_unavailable() => {
            warn!(owner = %owner_id, operation, error = %source, "report storage unavailable");
        }
        other => debug!(owner = %owner_id, operation, error = %other, "report operation failed"),
    }
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("wizard steps start at 1, got {0}")]
    InvalidStep(u32),
}
