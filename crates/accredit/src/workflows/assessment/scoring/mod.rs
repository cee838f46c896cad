mod grade;
mod rules;

pub use grade::{grade_bands, grade_for, GradeBand, LetterGrade};
pub use rules::score_criteria;

use serde::{Deserialize, Serialize};

use super::domain::RawFields;
use super::fields::InstitutionProfile;
use super::metrics::DerivedMetrics;

/// Ceiling shared by every criterion of the rubric.
pub const MAX_CRITERION_SCORE: f64 = 4.0;

pub const CRITERIA_COUNT: usize = 7;

/// The seven rubric dimensions, in rubric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    CurricularAspects,
    TeachingLearningEvaluation,
    ResearchInnovationExtension,
    InfrastructureLearningResources,
    StudentSupportProgression,
    GovernanceLeadershipManagement,
    InstitutionalValuesBestPractices,
}

impl Criterion {
    pub const fn ordered() -> [Criterion; CRITERIA_COUNT] {
        [
            Criterion::CurricularAspects,
            Criterion::TeachingLearningEvaluation,
            Criterion::ResearchInnovationExtension,
            Criterion::InfrastructureLearningResources,
            Criterion::StudentSupportProgression,
            Criterion::GovernanceLeadershipManagement,
            Criterion::InstitutionalValuesBestPractices,
        ]
    }

    pub const fn number(self) -> u8 {
        match self {
            Criterion::CurricularAspects => 1,
            Criterion::TeachingLearningEvaluation => 2,
            Criterion::ResearchInnovationExtension => 3,
            Criterion::InfrastructureLearningResources => 4,
            Criterion::StudentSupportProgression => 5,
            Criterion::GovernanceLeadershipManagement => 6,
            Criterion::InstitutionalValuesBestPractices => 7,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Criterion::CurricularAspects => "Curricular Aspects",
            Criterion::TeachingLearningEvaluation => "Teaching-Learning and Evaluation",
            Criterion::ResearchInnovationExtension => "Research, Innovations and Extension",
            Criterion::InfrastructureLearningResources => {
                "Infrastructure and Learning Resources"
            }
            Criterion::StudentSupportProgression => "Student Support and Progression",
            Criterion::GovernanceLeadershipManagement => {
                "Governance, Leadership and Management"
            }
            Criterion::InstitutionalValuesBestPractices => {
                "Institutional Values and Best Practices"
            }
        }
    }

    /// Starting score before bonuses. Criteria with more bonus room start lower.
    pub const fn base_score(self) -> f64 {
        match self {
            Criterion::CurricularAspects => 2.0,
            Criterion::ResearchInnovationExtension => 1.0,
            Criterion::TeachingLearningEvaluation
            | Criterion::InfrastructureLearningResources
            | Criterion::StudentSupportProgression
            | Criterion::GovernanceLeadershipManagement
            | Criterion::InstitutionalValuesBestPractices => 1.5,
        }
    }
}

/// One bonus that fired while scoring a criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusAward {
    pub points: f64,
    pub reason: String,
}

/// Score for a single criterion with the bonuses that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub base: f64,
    pub score: f64,
    pub awards: Vec<BonusAward>,
    /// Bonuses summed past the ceiling and were cut back to it.
    pub clamped: bool,
}

impl CriterionScore {
    /// Two-decimal value for display. Averaging uses `score`.
    pub fn rounded(&self) -> f64 {
        round_hundredths(self.score)
    }
}

/// Snapshot stored on a report when it is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculations {
    pub criteria: Vec<CriterionScore>,
    pub overall_grade_point: f64,
    pub grade: LetterGrade,
    pub description: String,
    pub metrics: DerivedMetrics,
}

impl Calculations {
    pub fn criterion(&self, criterion: Criterion) -> Option<&CriterionScore> {
        self.criteria
            .iter()
            .find(|score| score.criterion == criterion)
    }

    pub fn rounded_grade_point(&self) -> f64 {
        round_hundredths(self.overall_grade_point)
    }
}

/// Arithmetic mean over all seven criteria.
pub fn composite(scores: &[CriterionScore; CRITERIA_COUNT]) -> f64 {
    scores.iter().map(|score| score.score).sum::<f64>() / CRITERIA_COUNT as f64
}

/// Aggregate, score, and grade a set of wizard inputs.
pub fn calculate(raw: &RawFields) -> Calculations {
    let profile = InstitutionProfile::from_raw(raw);
    let metrics = DerivedMetrics::aggregate(&profile);
    let scores = score_criteria(&profile, &metrics);
    let overall_grade_point = composite(&scores);
    let grade = grade_for(overall_grade_point);

    Calculations {
        criteria: scores.into(),
        overall_grade_point,
        grade,
        description: grade.description().to_string(),
        metrics,
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
