//! Accreditation self-assessment: wizard report state and rubric scoring.
//!
//! Wizard steps merge into a per-owner [`AssessmentReport`]. Generating the report runs the
//! metric aggregator, the seven criterion evaluators, and the composite grader over the
//! merged inputs and stores the result as a snapshot on the report.

pub mod domain;
pub mod fields;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentReport, InvalidStepNumber, OwnerId, RawFields, ReportProgress, ReportStatus,
    ReportSummaryView, StepNumber,
};
pub use fields::{InstitutionProfile, ResearchProject};
pub use metrics::DerivedMetrics;
pub use repository::{ReportRepository, RepositoryError};
pub use router::report_router;
pub use scoring::{
    calculate, grade_bands, grade_for, BonusAward, Calculations, Criterion, CriterionScore,
    GradeBand, LetterGrade, CRITERIA_COUNT, MAX_CRITERION_SCORE,
};
pub use service::{
    AssessmentReportService, Clock, GeneratedReport, OwnerLocks, ReportServiceError, SystemClock,
};
