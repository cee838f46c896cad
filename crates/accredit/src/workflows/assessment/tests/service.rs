use super::common::*;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::workflows::assessment::domain::{
    AssessmentReport, RawFields, ReportStatus, StepNumber,
};
use crate::workflows::assessment::repository::RepositoryError;
use crate::workflows::assessment::scoring::{calculate, LetterGrade};
use crate::workflows::assessment::service::{OwnerLocks, ReportServiceError};

fn steps(values: &[u32]) -> BTreeSet<StepNumber> {
    values
        .iter()
        .map(|value| StepNumber::new(*value).expect("positive step"))
        .collect()
}

#[test]
fn first_access_creates_a_fresh_report() {
    let (service, repository) = build_service();
    let id = owner("inst-001");

    let report = service.get_report(&id).expect("report created");

    assert_eq!(report.owner_id, id);
    assert_eq!(report.current_step, StepNumber::FIRST);
    assert!(report.completed_steps.is_empty());
    assert!(!report.is_completed);
    assert!(report.generated_at.is_none());
    assert!(report.calculations.is_none());
    assert_eq!(report.status(), ReportStatus::New);
    assert_eq!(repository.stored(&id), Some(report));
}

#[test]
fn repeated_reads_return_the_same_report() {
    let (service, repository) = build_service();
    let id = owner("inst-002");

    let first = service.get_report(&id).expect("first read");
    let second = service.get_report(&id).expect("second read");

    assert_eq!(first, second);
    assert_eq!(repository.len(), 1);
}

#[test]
fn save_step_merges_shallowly() {
    let (service, _) = build_service();
    let id = owner("inst-003");

    service
        .save_step(
            &id,
            Some(1),
            fields(json!({ "teachingStaff": 40, "classrooms": 12 })),
        )
        .expect("step 1 saved");
    let report = service
        .save_step(
            &id,
            Some(2),
            fields(json!({ "classrooms": 15, "laboratories": 6 })),
        )
        .expect("step 2 saved");

    assert_eq!(report.raw_fields.get("teachingStaff"), Some(&json!(40)));
    assert_eq!(report.raw_fields.get("classrooms"), Some(&json!(15)));
    assert_eq!(report.raw_fields.get("laboratories"), Some(&json!(6)));
    assert_eq!(report.current_step.get(), 2);
    assert_eq!(report.completed_steps, steps(&[1, 2]));
    assert_eq!(report.status(), ReportStatus::InProgress);
}

#[test]
fn saving_the_same_step_twice_is_idempotent() {
    let (service, repository) = build_service();
    let id = owner("inst-004");

    let once = service
        .save_step(&id, Some(3), fields(json!({ "programmesRevised": 2 })))
        .expect("first save");
    let twice = service
        .save_step(&id, Some(3), fields(json!({ "programmesRevised": 2 })))
        .expect("second save");

    assert_eq!(once, twice);
    assert_eq!(twice.completed_steps, steps(&[3]));
    assert_eq!(repository.stored(&id), Some(twice));
}

#[test]
fn payload_shapes_are_stored_verbatim() {
    let (service, repository) = build_service();
    let id = owner("inst-005");
    let payload = json!({
        "researchProjects": [{ "title": "Soil health", "amount": "12.5e4", "pi": { "name": "R. Iyer" } }],
        "teachingStaff": "forty",
        "accreditationHistory": null,
    });

    service
        .save_step(&id, Some(4), fields(payload.clone()))
        .expect("malformed payload still saved");

    let stored = repository.stored(&id).expect("report persisted");
    assert_eq!(serde_json::to_value(&stored.raw_fields).expect("serializes"), payload);
}

#[test]
fn step_without_number_merges_fields_only() {
    let (service, _) = build_service();
    let id = owner("inst-006");

    service
        .save_step(&id, Some(2), fields(json!({ "libraryBooks": 8000 })))
        .expect("step saved");
    let report = service
        .save_step(&id, None, fields(json!({ "libraryBooks": 12000 })))
        .expect("draft saved");

    assert_eq!(report.current_step.get(), 2);
    assert_eq!(report.completed_steps, steps(&[2]));
    assert_eq!(report.raw_fields.get("libraryBooks"), Some(&json!(12000)));
}

#[test]
fn step_zero_is_rejected_before_touching_storage() {
    let (service, repository) = build_service();

    match service.save_step(&owner("inst-007"), Some(0), RawFields::new()) {
        Err(ReportServiceError::InvalidStep(0)) => {}
        other => panic!("expected invalid step, got {other:?}"),
    }
    assert_eq!(repository.len(), 0);
}

#[test]
fn generating_an_empty_report_yields_the_base_grade() {
    let (service, repository) = build_service();
    let id = owner("inst-008");

    let generated = service.generate(&id).expect("generation succeeds");

    // Base scores average 10.5 / 7 = 1.5, below the 1.51 floor of C.
    assert!(generated.report.is_completed);
    assert_eq!(generated.report.status(), ReportStatus::Completed);
    assert_eq!(generated.report.generated_at, Some(generated_at()));
    assert_close(generated.calculations.overall_grade_point, 1.5);
    assert_eq!(generated.calculations.grade, LetterGrade::D);
    assert_eq!(
        generated.report.calculations.as_ref(),
        Some(&generated.calculations)
    );
    assert_eq!(repository.stored(&id), Some(generated.report));
}

#[test]
fn regeneration_recomputes_identically_and_restamps() {
    let (service, _) = build_service();
    let id = owner("inst-009");
    service
        .save_step(&id, Some(1), strong_institution())
        .expect("step saved");

    let first = service.generate(&id).expect("first generation");
    let second = service.generate(&id).expect("second generation");

    assert_eq!(first.calculations, second.calculations);
    assert!(second.report.generated_at > first.report.generated_at);
}

#[test]
fn completed_reports_stay_editable() {
    let (service, repository) = build_service();
    let id = owner("inst-010");

    let before = service.generate(&id).expect("initial generation");
    let edited = service
        .save_step(&id, Some(5), strong_institution())
        .expect("edit after completion");
    assert!(edited.is_completed);
    assert_eq!(edited.calculations, before.report.calculations);

    let after = service.generate(&id).expect("regeneration");
    assert_eq!(after.calculations, calculate(&strong_institution()));
    assert_eq!(after.calculations.grade, LetterGrade::APlus);
    assert_eq!(after.report.completed_steps, steps(&[5]));
    assert_eq!(
        repository.stored(&id).and_then(|report| report.calculations),
        Some(after.calculations)
    );
}

#[test]
fn storage_outages_surface_as_unavailable() {
    let service = service_with(Arc::new(UnavailableRepository));
    let id = owner("inst-011");

    for result in [
        service.get_report(&id).map(|_| ()),
        service.save_step(&id, Some(1), RawFields::new()).map(|_| ()),
        service.generate(&id).map(|_| ()),
    ] {
        match result {
            Err(ReportServiceError::Repository(RepositoryError::Unavailable(reason))) => {
                assert_eq!(reason, "database offline");
            }
            other => panic!("expected storage unavailable, got {other:?}"),
        }
    }
}

#[test]
fn losing_the_creation_race_reloads_the_winner() {
    let id = owner("inst-012");
    let mut existing = AssessmentReport::new(id.clone());
    existing.record_step(StepNumber::new(2), fields(json!({ "patents": 1 })));
    let repository = Arc::new(RacingRepository::with_existing(existing.clone()));
    let service = service_with(repository);

    let report = service.get_report(&id).expect("winner reloaded");

    assert_eq!(report, existing);
}

#[test]
fn summary_reports_progress_and_grade() {
    let (service, _) = build_service();
    let id = owner("inst-013");

    service
        .save_step(&id, Some(1), fields(json!({ "teachingStaff": 10 })))
        .expect("step 1");
    service
        .save_step(&id, Some(2), fields(json!({ "totalStudentsUG": 150 })))
        .expect("step 2");
    let pending = service.summary(&id).expect("summary");
    assert_eq!(pending.status, "in_progress");
    assert_eq!(pending.percent_complete, 25);
    assert!(pending.grade.is_none());

    service.generate(&id).expect("generated");
    let done = service.summary(&id).expect("summary");
    assert_eq!(done.status, "completed");
    assert_eq!(done.completed_steps, vec![1, 2]);
    assert_eq!(done.grade, Some("C"));
    assert_eq!(done.overall_grade_point, Some(1.61));
}

#[test]
fn concurrent_saves_for_one_owner_do_not_lose_fields() {
    let (service, repository) = build_service();
    let id = owner("inst-014");

    std::thread::scope(|scope| {
        for step in 1..=8u32 {
            let service = &service;
            let id = &id;
            scope.spawn(move || {
                service
                    .save_step(
                        id,
                        Some(step),
                        fields(json!({ format!("answer{step}"): step })),
                    )
                    .expect("concurrent save");
            });
        }
    });

    let report = repository.stored(&id).expect("report persisted");
    assert_eq!(report.raw_fields.len(), 8);
    assert_eq!(report.completed_steps.len(), 8);
    assert_eq!(repository.updates.load(Ordering::SeqCst), 8);
}

#[test]
fn owner_locks_are_released_after_each_call() {
    let locks = Arc::new(OwnerLocks::new());
    let (service, _) = build_service();
    let service = service.with_locks(locks.clone());

    for name in ["inst-015", "inst-016", "inst-017"] {
        let id = owner(name);
        service.get_report(&id).expect("report created");
        service
            .save_step(&id, Some(1), fields(json!({ "patents": 1 })))
            .expect("step saved");
        service.summary(&id).expect("summary");
        service.generate(&id).expect("generated");
    }
    service
        .save_step(&owner("inst-018"), Some(0), RawFields::new())
        .expect_err("step zero rejected");

    assert_eq!(locks.active_owners(), 0);
}

#[test]
fn owner_locks_drain_after_contended_saves() {
    let locks = Arc::new(OwnerLocks::new());
    let (service, _) = build_service();
    let service = service.with_locks(locks.clone());
    let id = owner("inst-019");

    std::thread::scope(|scope| {
        for step in 1..=8u32 {
            let service = &service;
            let id = &id;
            scope.spawn(move || {
                service
                    .save_step(id, Some(step), fields(json!({ "iqacMeetings": step })))
                    .expect("concurrent save");
            });
        }
    });

    assert_eq!(locks.active_owners(), 0);
}

#[test]
fn owner_lock_is_tracked_while_held() {
    let locks = OwnerLocks::new();
    let id = owner("inst-020");

    let seen = locks.with_owner(&id, || locks.active_owners());

    assert_eq!(seen, 1);
    assert_eq!(locks.active_owners(), 0);
}

#[test]
fn service_reports_its_wizard_length() {
    let (service, _) = build_service();
    assert_eq!(service.wizard().total_steps(), 8);
}
