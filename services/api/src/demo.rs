use crate::infra::{read_fields, InMemoryReportRepository, ReportService};
use accredit::config::WizardConfig;
use accredit::error::AppError;
use accredit::workflows::assessment::{calculate, Calculations, OwnerId, RawFields};
use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding an object of wizard fields
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the full calculation snapshot as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Owner identifier used for the demo report
    #[arg(long, default_value = "demo-college")]
    pub(crate) owner: String,
    /// Print the stored report as JSON after generation
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let fields = read_fields(&args.input)?;
    let calculations = calculate(&fields);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&calculations)?);
    } else {
        println!("Scored {} fields from {}", fields.len(), args.input.display());
        render_calculations(&calculations);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = ReportService::new(
        Arc::new(InMemoryReportRepository::default()),
        WizardConfig::default(),
    );
    let owner = OwnerId(args.owner);

    println!("Self-assessment walkthrough for {owner}");
    for (index, payload) in demo_steps().into_iter().enumerate() {
        let step = index as u32 + 1;
        let fields = match payload {
            Value::Object(map) => RawFields::from(map),
            _ => RawFields::new(),
        };
        let field_count = fields.len();
        service.save_step(&owner, Some(step), fields)?;

        let progress = service
            .get_report(&owner)?
            .progress(service.wizard().total_steps());
        println!(
            "- step {step}/{} saved ({field_count} fields) | {}% complete",
            progress.total_steps, progress.percent_complete
        );
    }

    let generated = service.generate(&owner)?;
    println!();
    render_calculations(&generated.calculations);

    if args.json {
        println!("\nStored report:");
        println!("{}", serde_json::to_string_pretty(&generated.report)?);
    }
    Ok(())
}

fn render_calculations(calculations: &Calculations) {
    println!(
        "Overall grade point {:.2} -> {} ({})",
        calculations.rounded_grade_point(),
        calculations.grade,
        calculations.description
    );
    for score in &calculations.criteria {
        let clamp_note = if score.clamped { " [capped]" } else { "" };
        println!(
            "  C{} {}: {:.2} (base {:.1}){clamp_note}",
            score.criterion.number(),
            score.criterion.label(),
            score.rounded(),
            score.base
        );
        for award in &score.awards {
            println!("      +{:.2} {}", award.points, award.reason);
        }
    }

    let metrics = &calculations.metrics;
    println!(
        "  Metrics: {:.0} students | {:.1}:1 student-teacher | {:.1}% placed | {:.0} funding per faculty",
        metrics.total_students,
        metrics.student_teacher_ratio,
        metrics.placement_percentage,
        metrics.research_intensity
    );
}

/// Eight wizard pages of a mid-sized affiliated college.
fn demo_steps() -> Vec<Value> {
    vec![
        json!({
            "totalStudentsUG": 1450,
            "totalStudentsPG": 310,
            "totalStudentsPhD": 40,
            "teachingStaff": 95,
        }),
        json!({
            "programmesRevised": 6,
            "collectsFeedback": true,
            "academicFlexibility": ["choice based credits"],
            "valueAddedCourses": ["data literacy", "spoken english"],
            "crossCuttingIssues": ["gender", "environment", "ethics"],
        }),
        json!({
            "admissionProcess": "Centralised counselling",
            "classrooms": 32,
            "ictClassrooms": 20,
            "assessmentMethods": ["written", "practical", "seminar"],
        }),
        json!({
            "publications": 140,
            "patents": 1,
            "consultancyRevenue": 180_000,
            "researchProjects": [
                { "title": "Lake restoration", "amount": 1_800_000 },
                { "title": "Low-cost sensors", "amount": 950_000 },
                { "title": "Folk archive", "amount": 300_000 },
            ],
        }),
        json!({
            "laboratories": 18,
            "libraryBooks": 32_000,
            "internetBandwidth": 200,
            "computers": 420,
        }),
        json!({
            "placedStudents": 1050,
            "scholarshipRecipients": 390,
            "higherStudies": 160,
        }),
        json!({
            "visionStatement": "Learning that serves the region",
            "missionStatement": "Affordable, inclusive higher education",
            "iqacMeetings": 4,
            "strategicPlan": true,
        }),
        json!({
            "environmentalInitiatives": ["solar rooftop", "composting", "plastic-free campus"],
            "genderEquity": true,
            "inclusivity": true,
            "bestPractices": ["peer mentoring"],
        }),
    ]
}
