//! Typed reading of wizard inputs.
//!
//! Each known key maps to one typed slot. A stored value with an unexpected shape reads as
//! zero, false, or empty; keys the rubric does not know are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::RawFields;

/// Field names submitted by the wizard.
pub mod keys {
    pub const STUDENTS_UG: &str = "totalStudentsUG";
    pub const STUDENTS_PG: &str = "totalStudentsPG";
    pub const STUDENTS_PHD: &str = "totalStudentsPhD";
    pub const TEACHING_STAFF: &str = "teachingStaff";
    pub const PUBLICATIONS: &str = "publications";
    pub const PLACED_STUDENTS: &str = "placedStudents";
    pub const RESEARCH_PROJECTS: &str = "researchProjects";
    pub const CLASSROOMS: &str = "classrooms";
    pub const ICT_CLASSROOMS: &str = "ictClassrooms";
    pub const PROGRAMMES_REVISED: &str = "programmesRevised";
    pub const COLLECTS_FEEDBACK: &str = "collectsFeedback";
    pub const ACADEMIC_FLEXIBILITY: &str = "academicFlexibility";
    pub const VALUE_ADDED_COURSES: &str = "valueAddedCourses";
    pub const CROSS_CUTTING_ISSUES: &str = "crossCuttingIssues";
    pub const ADMISSION_PROCESS: &str = "admissionProcess";
    pub const ASSESSMENT_METHODS: &str = "assessmentMethods";
    pub const PATENTS: &str = "patents";
    pub const CONSULTANCY_REVENUE: &str = "consultancyRevenue";
    pub const LABORATORIES: &str = "laboratories";
    pub const LIBRARY_BOOKS: &str = "libraryBooks";
    pub const INTERNET_BANDWIDTH: &str = "internetBandwidth";
    pub const COMPUTERS: &str = "computers";
    pub const SCHOLARSHIP_RECIPIENTS: &str = "scholarshipRecipients";
    pub const HIGHER_STUDIES: &str = "higherStudies";
    pub const VISION_STATEMENT: &str = "visionStatement";
    pub const MISSION_STATEMENT: &str = "missionStatement";
    pub const IQAC_MEETINGS: &str = "iqacMeetings";
    pub const STRATEGIC_PLAN: &str = "strategicPlan";
    pub const ENVIRONMENTAL_INITIATIVES: &str = "environmentalInitiatives";
    pub const GENDER_EQUITY: &str = "genderEquity";
    pub const INCLUSIVITY: &str = "inclusivity";
    pub const BEST_PRACTICES: &str = "bestPractices";
    pub const INSTITUTIONAL_DISTINCTIVENESS: &str = "institutionalDistinctiveness";
}

/// Funded research project; only the amount feeds the rubric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchProject {
    pub amount: f64,
}

/// Rubric inputs with every slot defaulted. Quantities are non-negative and finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstitutionProfile {
    pub students_ug: f64,
    pub students_pg: f64,
    pub students_phd: f64,
    pub teaching_staff: f64,
    pub publication_count: u64,
    pub placed_students: f64,
    pub research_projects: Vec<ResearchProject>,
    pub classrooms: f64,
    pub ict_classrooms: f64,

    pub programmes_revised: f64,
    pub collects_feedback: bool,
    pub academic_flexibility: u64,
    pub value_added_courses: u64,
    pub cross_cutting_issues: u64,

    pub admission_process: bool,
    pub assessment_methods: u64,

    pub patents: u64,
    pub consultancy_revenue: f64,

    pub laboratories: f64,
    pub library_books: f64,
    pub internet_bandwidth: f64,
    pub computers: f64,

    pub scholarship_recipients: f64,
    pub higher_studies: f64,

    pub vision_statement: bool,
    pub mission_statement: bool,
    pub iqac_meetings: u64,
    pub strategic_plan: bool,

    pub environmental_initiatives: u64,
    pub gender_equity: bool,
    pub inclusivity: bool,
    pub best_practices: bool,
    pub institutional_distinctiveness: bool,
}

impl InstitutionProfile {
    pub fn from_raw(raw: &RawFields) -> Self {
        let amount = |key: &str| quantity(raw.get(key));
        let count = |key: &str| tally(raw.get(key));
        let flag = |key: &str| affirmed(raw.get(key));

        Self {
            students_ug: amount(keys::STUDENTS_UG),
            students_pg: amount(keys::STUDENTS_PG),
            students_phd: amount(keys::STUDENTS_PHD),
            teaching_staff: amount(keys::TEACHING_STAFF),
            publication_count: count(keys::PUBLICATIONS),
            placed_students: amount(keys::PLACED_STUDENTS),
            research_projects: research_projects(raw.get(keys::RESEARCH_PROJECTS)),
            classrooms: amount(keys::CLASSROOMS),
            ict_classrooms: amount(keys::ICT_CLASSROOMS),

            programmes_revised: amount(keys::PROGRAMMES_REVISED),
            collects_feedback: flag(keys::COLLECTS_FEEDBACK),
            academic_flexibility: count(keys::ACADEMIC_FLEXIBILITY),
            value_added_courses: count(keys::VALUE_ADDED_COURSES),
            cross_cutting_issues: count(keys::CROSS_CUTTING_ISSUES),

            admission_process: flag(keys::ADMISSION_PROCESS),
            assessment_methods: count(keys::ASSESSMENT_METHODS),

            patents: count(keys::PATENTS),
            consultancy_revenue: amount(keys::CONSULTANCY_REVENUE),

            laboratories: amount(keys::LABORATORIES),
            library_books: amount(keys::LIBRARY_BOOKS),
            internet_bandwidth: amount(keys::INTERNET_BANDWIDTH),
            computers: amount(keys::COMPUTERS),

            scholarship_recipients: amount(keys::SCHOLARSHIP_RECIPIENTS),
            higher_studies: amount(keys::HIGHER_STUDIES),

            vision_statement: flag(keys::VISION_STATEMENT),
            mission_statement: flag(keys::MISSION_STATEMENT),
            iqac_meetings: count(keys::IQAC_MEETINGS),
            strategic_plan: flag(keys::STRATEGIC_PLAN),

            environmental_initiatives: count(keys::ENVIRONMENTAL_INITIATIVES),
            gender_equity: flag(keys::GENDER_EQUITY),
            inclusivity: flag(keys::INCLUSIVITY),
            best_practices: flag(keys::BEST_PRACTICES),
            institutional_distinctiveness: flag(keys::INSTITUTIONAL_DISTINCTIVENESS),
        }
    }

    pub fn total_students(&self) -> f64 {
        self.students_ug + self.students_pg + self.students_phd
    }

    pub fn research_funding(&self) -> f64 {
        self.research_projects
            .iter()
            .map(|project| project.amount)
            .sum()
    }
}

/// Numbers and numeric strings; negatives and anything else read as 0.
pub(crate) fn quantity(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(0.0)
}

/// Array length, or a whole count when the wizard submitted a number.
pub(crate) fn tally(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Array(entries)) => entries.len() as u64,
        other => quantity(other).floor() as u64,
    }
}

/// Whether a flag was set or a free-text answer was documented.
pub(crate) fn affirmed(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => {
            let text = text.trim();
            !(text.is_empty()
                || text.eq_ignore_ascii_case("false")
                || text.eq_ignore_ascii_case("no"))
        }
        Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value > 0.0),
        Some(Value::Array(entries)) => !entries.is_empty(),
        Some(Value::Object(entries)) => !entries.is_empty(),
        Some(Value::Null) | None => false,
    }
}

fn research_projects(value: Option<&Value>) -> Vec<ResearchProject> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| ResearchProject {
                amount: quantity(entry.get("amount")),
            })
            .collect(),
        _ => Vec::new(),
    }
}
