use std::fmt;

use serde::{Deserialize, Serialize};

/// Floating-point slack so a mean that lands on a boundary takes the higher band.
///
/// This relaxes the plain `grade_point >= threshold` comparison on purpose: a
/// mean up to 1e-9 below a threshold is summation noise and grades into the
/// higher band.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Letter grades of the accreditation scale, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A++")]
    APlusPlus,
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B++")]
    BPlusPlus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
}

impl LetterGrade {
    pub const fn label(self) -> &'static str {
        match self {
            LetterGrade::APlusPlus => "A++",
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlusPlus => "B++",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            LetterGrade::APlusPlus => "Outstanding",
            LetterGrade::APlus => "Excellent",
            LetterGrade::A => "Very Good",
            LetterGrade::BPlusPlus => "Good",
            LetterGrade::BPlus => "Above Average",
            LetterGrade::B => "Average",
            LetterGrade::C => "Below Average",
            LetterGrade::D => "Poor",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive lower bound for a letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBand {
    pub min_grade_point: f64,
    pub grade: LetterGrade,
}

const GRADE_BANDS: [GradeBand; 8] = [
    GradeBand {
        min_grade_point: 3.51,
        grade: LetterGrade::APlusPlus,
    },
    GradeBand {
        min_grade_point: 3.26,
        grade: LetterGrade::APlus,
    },
    GradeBand {
        min_grade_point: 3.01,
        grade: LetterGrade::A,
    },
    GradeBand {
        min_grade_point: 2.76,
        grade: LetterGrade::BPlusPlus,
    },
    GradeBand {
        min_grade_point: 2.51,
        grade: LetterGrade::BPlus,
    },
    GradeBand {
        min_grade_point: 2.01,
        grade: LetterGrade::B,
    },
    GradeBand {
        min_grade_point: 1.51,
        grade: LetterGrade::C,
    },
    GradeBand {
        min_grade_point: 0.0,
        grade: LetterGrade::D,
    },
];

/// Grade table ordered from the highest threshold down.
pub fn grade_bands() -> &'static [GradeBand] {
    &GRADE_BANDS
}

/// First band whose lower bound the grade-point reaches, scanning from the top.
pub fn grade_for(grade_point: f64) -> LetterGrade {
    GRADE_BANDS
        .iter()
        .find(|band| grade_point + BOUNDARY_TOLERANCE >= band.min_grade_point)
        .map(|band| band.grade)
        .unwrap_or(LetterGrade::D)
}
