use super::super::fields::InstitutionProfile;
use super::super::metrics::DerivedMetrics;
use super::{BonusAward, Criterion, CriterionScore, CRITERIA_COUNT, MAX_CRITERION_SCORE};

/// Threshold band worth `points`. Tables are scanned top-down; the first match wins.
struct Tier {
    limit: f64,
    points: f64,
}

const STUDENT_TEACHER_TIERS: [Tier; 4] = [
    Tier { limit: 15.0, points: 0.8 },
    Tier { limit: 20.0, points: 0.6 },
    Tier { limit: 25.0, points: 0.4 },
    Tier { limit: 30.0, points: 0.2 },
];

const ICT_CLASSROOM_TIERS: [Tier; 3] = [
    Tier { limit: 0.8, points: 0.6 },
    Tier { limit: 0.5, points: 0.4 },
    Tier { limit: 0.3, points: 0.2 },
];

const STUDENTS_PER_CLASSROOM_TIERS: [Tier; 2] = [
    Tier { limit: 60.0, points: 0.5 },
    Tier { limit: 80.0, points: 0.3 },
];

const PLACEMENT_TIERS: [Tier; 3] = [
    Tier { limit: 80.0, points: 1.0 },
    Tier { limit: 60.0, points: 0.7 },
    Tier { limit: 40.0, points: 0.4 },
];

const SCHOLARSHIP_TIERS: [Tier; 2] = [
    Tier { limit: 0.3, points: 0.5 },
    Tier { limit: 0.2, points: 0.3 },
];

const RESEARCH_INTENSITY_THRESHOLD: f64 = 100_000.0;
const LIBRARY_BOOKS_THRESHOLD: f64 = 10_000.0;
const BANDWIDTH_THRESHOLD_MBPS: f64 = 100.0;
const COMPUTERS_PER_STUDENT_THRESHOLD: f64 = 0.3;
const IQAC_MEETINGS_THRESHOLD: u64 = 4;

/// Summation noise allowed before a total counts as over the ceiling.
const CEILING_TOLERANCE: f64 = 1e-9;

/// Ascending limits; the value must not exceed the limit.
fn at_most(value: f64, tiers: &[Tier]) -> Option<&Tier> {
    tiers.iter().find(|tier| value <= tier.limit)
}

/// Descending limits; the value must reach the limit.
fn at_least(value: f64, tiers: &[Tier]) -> Option<&Tier> {
    tiers.iter().find(|tier| value >= tier.limit)
}

/// Bonus trail for one criterion. Never shared between criteria.
struct Scorecard {
    criterion: Criterion,
    awards: Vec<BonusAward>,
}

impl Scorecard {
    fn new(criterion: Criterion) -> Self {
        Self {
            criterion,
            awards: Vec::new(),
        }
    }

    fn award(&mut self, points: f64, reason: String) {
        if points > 0.0 {
            self.awards.push(BonusAward { points, reason });
        }
    }

    fn award_if(&mut self, condition: bool, points: f64, reason: impl FnOnce() -> String) {
        if condition {
            self.award(points, reason());
        }
    }

    fn award_tier(&mut self, tier: Option<&Tier>, reason: impl FnOnce() -> String) {
        if let Some(tier) = tier {
            self.award(tier.points, reason());
        }
    }

    fn finish(self) -> CriterionScore {
        let base = self.criterion.base_score();
        let total = base + self.awards.iter().map(|award| award.points).sum::<f64>();
        CriterionScore {
            criterion: self.criterion,
            base,
            score: total.clamp(0.0, MAX_CRITERION_SCORE),
            awards: self.awards,
            clamped: total > MAX_CRITERION_SCORE + CEILING_TOLERANCE,
        }
    }
}

/// Evaluate every criterion against the same inputs.
pub fn score_criteria(
    profile: &InstitutionProfile,
    metrics: &DerivedMetrics,
) -> [CriterionScore; CRITERIA_COUNT] {
    [
        curricular_aspects(profile),
        teaching_learning(profile, metrics),
        research_innovation(profile, metrics),
        infrastructure(profile, metrics),
        student_support(profile, metrics),
        governance(profile),
        institutional_values(profile),
    ]
}

pub(crate) fn curricular_aspects(profile: &InstitutionProfile) -> CriterionScore {
    let mut card = Scorecard::new(Criterion::CurricularAspects);

    card.award_if(profile.programmes_revised > 0.0, 0.5, || {
        format!("{} programmes revised", profile.programmes_revised)
    });
    card.award_if(profile.collects_feedback, 0.3, || {
        "structured stakeholder feedback on curricula".to_string()
    });
    card.award_if(profile.academic_flexibility > 0, 0.4, || {
        format!("{} academic flexibility options", profile.academic_flexibility)
    });
    card.award_if(profile.value_added_courses > 0, 0.5, || {
        format!("{} value-added courses", profile.value_added_courses)
    });
    card.award_if(profile.cross_cutting_issues >= 3, 0.3, || {
        format!(
            "{} cross-cutting issues integrated",
            profile.cross_cutting_issues
        )
    });

    card.finish()
}

pub(crate) fn teaching_learning(
    profile: &InstitutionProfile,
    metrics: &DerivedMetrics,
) -> CriterionScore {
    let mut card = Scorecard::new(Criterion::TeachingLearningEvaluation);

    card.award_if(profile.admission_process, 0.3, || {
        "documented admission process".to_string()
    });

    // Staff falls back to the floor of 1; only an empty student body skips the tier.
    if metrics.total_students > 0.0 {
        let ratio = metrics.student_teacher_ratio;
        card.award_tier(at_most(ratio, &STUDENT_TEACHER_TIERS), || {
            format!("student-teacher ratio {ratio:.1}:1")
        });
    }

    let ict_ratio = profile.ict_classrooms / profile.classrooms.max(1.0);
    card.award_tier(at_least(ict_ratio, &ICT_CLASSROOM_TIERS), || {
        format!("{:.0}% of classrooms ICT-enabled", ict_ratio * 100.0)
    });

    card.award_if(profile.assessment_methods >= 3, 0.3, || {
        format!("{} assessment methods in use", profile.assessment_methods)
    });

    card.finish()
}

pub(crate) fn research_innovation(
    profile: &InstitutionProfile,
    metrics: &DerivedMetrics,
) -> CriterionScore {
    let mut card = Scorecard::new(Criterion::ResearchInnovationExtension);

    let projects = profile.research_projects.len();
    card.award((0.1 * projects as f64).min(0.5), format!("{projects} research projects"));

    if metrics.publication_count > 0 {
        card.award(
            (0.3 * metrics.publications_per_faculty).min(1.0),
            format!(
                "{:.2} publications per faculty member",
                metrics.publications_per_faculty
            ),
        );
    }

    if profile.patents > 0 {
        card.award(
            (0.1 * profile.patents as f64).min(0.3),
            format!("{} patents", profile.patents),
        );
    }

    card.award_if(profile.consultancy_revenue > 0.0, 0.2, || {
        format!("consultancy revenue {:.0}", profile.consultancy_revenue)
    });
    card.award_if(
        metrics.research_intensity > RESEARCH_INTENSITY_THRESHOLD,
        0.5,
        || {
            format!(
                "research funding {:.0} per faculty member",
                metrics.research_intensity
            )
        },
    );

    card.finish()
}

pub(crate) fn infrastructure(
    profile: &InstitutionProfile,
    metrics: &DerivedMetrics,
) -> CriterionScore {
    let mut card = Scorecard::new(Criterion::InfrastructureLearningResources);

    if profile.classrooms > 0.0 {
        let per_classroom = metrics.classroom_utilization;
        card.award_tier(at_most(per_classroom, &STUDENTS_PER_CLASSROOM_TIERS), || {
            format!("{per_classroom:.0} students per classroom")
        });
    }

    card.award_if(profile.laboratories > 0.0, 0.3, || {
        format!("{} laboratories", profile.laboratories)
    });
    card.award_if(profile.library_books >= LIBRARY_BOOKS_THRESHOLD, 0.4, || {
        format!("{} library volumes", profile.library_books)
    });
    card.award_if(
        profile.internet_bandwidth >= BANDWIDTH_THRESHOLD_MBPS,
        0.3,
        || format!("{} Mbps internet bandwidth", profile.internet_bandwidth),
    );

    if metrics.total_students > 0.0 {
        let per_student = profile.computers / metrics.total_students;
        card.award_if(per_student >= COMPUTERS_PER_STUDENT_THRESHOLD, 0.5, || {
            format!("{per_student:.2} computers per student")
        });
    }

    card.finish()
}

pub(crate) fn student_support(
    profile: &InstitutionProfile,
    metrics: &DerivedMetrics,
) -> CriterionScore {
    let mut card = Scorecard::new(Criterion::StudentSupportProgression);

    let placement = metrics.placement_percentage;
    card.award_tier(at_least(placement, &PLACEMENT_TIERS), || {
        format!("{placement:.1}% placement")
    });

    if metrics.total_students > 0.0 {
        let scholarship_ratio = profile.scholarship_recipients / metrics.total_students;
        card.award_tier(at_least(scholarship_ratio, &SCHOLARSHIP_TIERS), || {
            format!("{:.0}% of students on scholarships", scholarship_ratio * 100.0)
        });
    }

    card.award_if(profile.higher_studies > 0.0, 0.3, || {
        format!("{} graduates progressed to higher studies", profile.higher_studies)
    });

    card.finish()
}

pub(crate) fn governance(profile: &InstitutionProfile) -> CriterionScore {
    let mut card = Scorecard::new(Criterion::GovernanceLeadershipManagement);

    card.award_if(profile.vision_statement && profile.mission_statement, 0.3, || {
        "vision and mission statements published".to_string()
    });
    card.award_if(profile.iqac_meetings >= IQAC_MEETINGS_THRESHOLD, 0.5, || {
        format!("{} quality assurance cell meetings", profile.iqac_meetings)
    });
    card.award_if(profile.strategic_plan, 0.3, || {
        "strategic plan in place".to_string()
    });

    card.finish()
}

pub(crate) fn institutional_values(profile: &InstitutionProfile) -> CriterionScore {
    let mut card = Scorecard::new(Criterion::InstitutionalValuesBestPractices);

    card.award_if(profile.environmental_initiatives >= 3, 0.5, || {
        format!(
            "{} environmental initiatives",
            profile.environmental_initiatives
        )
    });
    card.award_if(profile.gender_equity, 0.3, || {
        "gender equity practices".to_string()
    });
    card.award_if(profile.inclusivity, 0.3, || "inclusivity practices".to_string());
    card.award_if(profile.best_practices, 0.4, || {
        "best practices documented".to_string()
    });
    card.award_if(profile.institutional_distinctiveness, 0.3, || {
        "institutional distinctiveness documented".to_string()
    });

    card.finish()
}
