//! Derived institutional metrics.
//!
//! Every divisor that may be zero or absent is floored at 1, so each metric is a
//! non-negative finite number for any input.

use serde::{Deserialize, Serialize};

use super::fields::InstitutionProfile;

/// Ratios and totals the rubric evaluates alongside the raw inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub total_students: f64,
    pub student_teacher_ratio: f64,
    pub publication_count: u64,
    pub publications_per_faculty: f64,
    pub placement_percentage: f64,
    pub research_funding: f64,
    pub research_intensity: f64,
    pub classroom_utilization: f64,
}

impl DerivedMetrics {
    pub fn aggregate(profile: &InstitutionProfile) -> Self {
        Self {
            total_students: profile.total_students(),
            student_teacher_ratio: student_teacher_ratio(profile),
            publication_count: profile.publication_count,
            publications_per_faculty: publications_per_faculty(profile),
            placement_percentage: placement_percentage(profile),
            research_funding: profile.research_funding(),
            research_intensity: research_intensity(profile),
            classroom_utilization: classroom_utilization(profile),
        }
    }
}

fn floored(divisor: f64) -> f64 {
    divisor.max(1.0)
}

pub fn student_teacher_ratio(profile: &InstitutionProfile) -> f64 {
    profile.total_students() / floored(profile.teaching_staff)
}

pub fn publications_per_faculty(profile: &InstitutionProfile) -> f64 {
    profile.publication_count as f64 / floored(profile.teaching_staff)
}

pub fn placement_percentage(profile: &InstitutionProfile) -> f64 {
    let total = profile.total_students();
    if total > 0.0 {
        profile.placed_students / total * 100.0
    } else {
        0.0
    }
}

pub fn research_intensity(profile: &InstitutionProfile) -> f64 {
    profile.research_funding() / floored(profile.teaching_staff)
}

pub fn classroom_utilization(profile: &InstitutionProfile) -> f64 {
    profile.total_students() / floored(profile.classrooms)
}
