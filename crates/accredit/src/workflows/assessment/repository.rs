use super::domain::{AssessmentReport, OwnerId};

/// Storage abstraction for assessment reports, keyed by owner.
///
/// Implementations must round-trip `raw_fields` and numeric values exactly. The service
/// serializes access per owner, so stores need no record-level locking of their own.
pub trait ReportRepository: Send + Sync {
    fn find(&self, owner_id: &OwnerId) -> Result<Option<AssessmentReport>, RepositoryError>;
    fn insert(&self, report: AssessmentReport) -> Result<AssessmentReport, RepositoryError>;
    fn update(&self, report: AssessmentReport) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("report already exists")]
    Conflict,
    #[error("report not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, RepositoryError::Unavailable(_))
    }
}
