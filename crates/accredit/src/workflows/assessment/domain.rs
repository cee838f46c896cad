use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::scoring::Calculations;

/// Identity of the institution (or reviewer) a report belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Position in the data-collection wizard. Numbering starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StepNumber(u32);

impl StepNumber {
    pub const FIRST: StepNumber = StepNumber(1);

    pub const fn new(value: u32) -> Option<Self> {
        if value >= 1 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StepNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("wizard steps start at 1, got {0}")]
pub struct InvalidStepNumber(pub u32);

impl TryFrom<u32> for StepNumber {
    type Error = InvalidStepNumber;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidStepNumber(value))
    }
}

impl From<StepNumber> for u32 {
    fn from(value: StepNumber) -> Self {
        value.0
    }
}

/// Wizard inputs exactly as submitted.
///
/// Values are kept verbatim so any payload shape round-trips through storage. Scoring reads
/// them through [`InstitutionProfile`](super::fields::InstitutionProfile), never directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFields(Map<String, Value>);

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Shallow merge: incoming keys replace existing ones, everything else is left alone.
    pub fn merge(&mut self, incoming: RawFields) {
        for (key, value) in incoming.0 {
            self.0.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawFields {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl FromIterator<(String, Value)> for RawFields {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Lifecycle position of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    New,
    InProgress,
    Completed,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::New => "new",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Completed => "completed",
        }
    }
}

/// Self-assessment report; exactly one exists per owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub owner_id: OwnerId,
    #[serde(default)]
    pub raw_fields: RawFields,
    pub current_step: StepNumber,
    #[serde(default)]
    pub completed_steps: BTreeSet<StepNumber>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculations: Option<Calculations>,
}

impl AssessmentReport {
    pub fn new(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            raw_fields: RawFields::new(),
            current_step: StepNumber::FIRST,
            completed_steps: BTreeSet::new(),
            is_completed: false,
            generated_at: None,
            calculations: None,
        }
    }

    pub fn status(&self) -> ReportStatus {
        if self.is_completed {
            ReportStatus::Completed
        } else if self.completed_steps.is_empty() && self.raw_fields.is_empty() {
            ReportStatus::New
        } else {
            ReportStatus::InProgress
        }
    }

    /// Merge a wizard step's fields and record the step as saved.
    pub fn record_step(&mut self, step: Option<StepNumber>, fields: RawFields) {
        self.raw_fields.merge(fields);
        if let Some(step) = step {
            self.current_step = step;
            self.completed_steps.insert(step);
        }
    }

    /// Replace the scoring snapshot. Finalization may be repeated.
    pub fn finalize(&mut self, calculations: Calculations, generated_at: DateTime<Utc>) {
        self.calculations = Some(calculations);
        self.generated_at = Some(generated_at);
        self.is_completed = true;
    }

    pub fn progress(&self, total_steps: u32) -> ReportProgress {
        let completed = self
            .completed_steps
            .iter()
            .filter(|step| step.get() <= total_steps)
            .count() as u32;
        let percent_complete = if total_steps == 0 {
            0
        } else {
            ((completed * 100) / total_steps).min(100) as u8
        };

        ReportProgress {
            current_step: self.current_step.get(),
            completed,
            total_steps,
            percent_complete,
        }
    }

    pub fn summary_view(&self, total_steps: u32) -> ReportSummaryView {
        let progress = self.progress(total_steps);
        ReportSummaryView {
            owner_id: self.owner_id.clone(),
            status: self.status().label(),
            current_step: progress.current_step,
            completed_steps: self.completed_steps.iter().map(|step| step.get()).collect(),
            percent_complete: progress.percent_complete,
            grade: self
                .calculations
                .as_ref()
                .map(|calculations| calculations.grade.label()),
            overall_grade_point: self
                .calculations
                .as_ref()
                .map(Calculations::rounded_grade_point),
            generated_at: self.generated_at,
        }
    }
}

/// Wizard completion relative to the configured number of steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProgress {
    pub current_step: u32,
    pub completed: u32,
    pub total_steps: u32,
    pub percent_complete: u8,
}

/// Compact report status exposed to dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummaryView {
    pub owner_id: OwnerId,
    pub status: &'static str,
    pub current_step: u32,
    pub completed_steps: Vec<u32>,
    pub percent_complete: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_grade_point: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}
