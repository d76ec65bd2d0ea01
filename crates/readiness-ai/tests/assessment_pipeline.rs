//! Integration coverage for the assessment pipeline: staged processing,
//! soft-ordering recovery, failure persistence, and follow-up scheduling.

mod common;

use std::time::{Duration, Instant};

use chrono::Utc;
use common::{build_pipeline, build_pipeline_with, MemoryMail, StubPdf};
use readiness_ai::assessment::{
    AssessmentSubmission, Category, FollowUpKind, FollowUpRepository, PipelineError, SubmissionId,
    SubmissionStatus,
};

fn seeded(harness: &common::Harness, id: &str) -> SubmissionId {
    let id = SubmissionId(id.to_string());
    harness.repository.seed(AssessmentSubmission::from_intake(
        id.clone(),
        common::intake(),
        Utc::now(),
    ));
    id
}

async fn wait_for_status(
    harness: &common::Harness,
    id: &SubmissionId,
    wanted: SubmissionStatus,
) -> AssessmentSubmission {
    let deadline = Instant::now() + Duration::from_secs(15);
    loop {
        if let Ok(record) = harness.pipeline.get(id) {
            if record.status == wanted {
                return record;
            }
        }
        assert!(
            Instant::now() < deadline,
            "submission {id} never reached {wanted:?}"
        );
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

#[tokio::test]
async fn stages_run_in_order_through_the_hooks() {
    let harness = build_pipeline();
    let id = seeded(&harness, "asmt-test-001");

    harness.pipeline.run_scoring_stage(&id).expect("scoring");
    let scored = harness.pipeline.get(&id).expect("record");
    assert_eq!(scored.status, SubmissionStatus::Processing);
    assert_eq!(scored.overall_score, Some(58));
    let scores = scored.category_scores.as_ref().expect("category scores");
    assert_eq!(scores.get(&Category::Strategy), Some(&67));
    assert_eq!(scores.get(&Category::Data), Some(&50));
    assert_eq!(scores.get(&Category::Technology), Some(&70));
    assert_eq!(scores.get(&Category::Talent), Some(&45));

    harness.pipeline.run_report_stage(&id).expect("report");
    let reported = harness.pipeline.get(&id).expect("record");
    assert!(reported.report_generated);
    let report_url = reported.report_url.as_deref().expect("report url");
    assert!(report_url.starts_with("/api/reports/assessment-report-asmt-test-001-"));
    assert_eq!(harness.store.artifact_count(), 1);

    harness.pipeline.run_delivery_stage(&id).expect("delivery");
    let completed = harness.pipeline.get(&id).expect("record");
    assert_eq!(completed.status, SubmissionStatus::Completed);
    assert!(completed.report_sent_at.is_some());

    let sent = harness.mail.sent();
    let report_mail = sent
        .iter()
        .find(|message| message.subject.contains("58/100"))
        .expect("report email sent");
    assert_eq!(report_mail.to, "dana@initech.example");
    assert_eq!(report_mail.attachments.len(), 1);
    assert_eq!(report_mail.attachments[0].content_type, "application/pdf");
    assert!(report_mail.attachments[0].filename.ends_with(".pdf"));
}

#[tokio::test]
async fn delivery_schedules_the_follow_up_trio() {
    let harness = build_pipeline();
    let id = seeded(&harness, "asmt-test-002");

    harness.pipeline.run_scoring_stage(&id).expect("scoring");
    harness.pipeline.run_report_stage(&id).expect("report");
    harness.pipeline.run_delivery_stage(&id).expect("delivery");

    let record = harness.pipeline.get(&id).expect("record");
    let sent_at = record.report_sent_at.expect("sent timestamp");

    let mut follow_ups = harness.follow_ups.for_submission(&id).expect("follow-ups");
    follow_ups.sort_by_key(|entry| entry.scheduled_for);
    let offsets: Vec<(FollowUpKind, i64)> = follow_ups
        .iter()
        .map(|entry| {
            let minutes = (entry.scheduled_for - sent_at).num_minutes() as f64;
            (entry.kind, (minutes / (24.0 * 60.0)).round() as i64)
        })
        .collect();

    assert_eq!(
        offsets,
        vec![
            (FollowUpKind::ConsultationOffer, 2),
            (FollowUpKind::ImplementationGuide, 7),
            (FollowUpKind::SurveyFeedback, 14),
        ]
    );
}

#[tokio::test]
async fn report_stage_before_scoring_is_an_expected_retry() {
    let harness = build_pipeline();
    let id = seeded(&harness, "asmt-test-003");

    let err = harness
        .pipeline
        .run_report_stage(&id)
        .expect_err("report cannot run yet");
    assert!(matches!(err, PipelineError::PreconditionNotMet { .. }));
    assert!(err.is_expected());

    // The miss is part of normal pacing; the record is untouched.
    let record = harness.pipeline.get(&id).expect("record");
    assert_eq!(record.status, SubmissionStatus::Pending);
    assert!(record.processing_error.is_none());
    assert!(!record.report_generated);
}

#[tokio::test]
async fn failed_submissions_are_terminal() {
    let harness = build_pipeline();
    let id = SubmissionId("asmt-test-004".to_string());
    let mut record =
        AssessmentSubmission::from_intake(id.clone(), common::intake(), Utc::now());
    record.status = SubmissionStatus::Failed;
    record.processing_error = Some("earlier failure".to_string());
    harness.repository.seed(record);

    let err = harness
        .pipeline
        .run_scoring_stage(&id)
        .expect_err("halted record is not reprocessed");
    assert!(matches!(err, PipelineError::Halted(_)));

    let stored = harness.pipeline.get(&id).expect("record");
    assert_eq!(stored.status, SubmissionStatus::Failed);
    assert_eq!(stored.processing_error.as_deref(), Some("earlier failure"));
    assert!(stored.overall_score.is_none());
}

#[tokio::test]
async fn render_failure_persists_the_failed_state() {
    let harness = build_pipeline_with(MemoryMail::default(), StubPdf { fail: true });
    let id = seeded(&harness, "asmt-test-005");

    harness.pipeline.run_scoring_stage(&id).expect("scoring");
    let err = harness
        .pipeline
        .run_report_stage(&id)
        .expect_err("renderer crashes");
    assert!(matches!(err, PipelineError::Rendering(_)));
    assert!(!err.is_expected());

    let record = harness.pipeline.get(&id).expect("record");
    assert_eq!(record.status, SubmissionStatus::Failed);
    let detail = record.processing_error.expect("failure detail");
    assert!(detail.contains("rendering failed"));
}

#[tokio::test]
async fn mail_failure_persists_failed_and_skips_follow_ups() {
    let harness = build_pipeline_with(MemoryMail::failing(10), StubPdf::default());
    let id = seeded(&harness, "asmt-test-006");

    harness.pipeline.run_scoring_stage(&id).expect("scoring");
    harness.pipeline.run_report_stage(&id).expect("report");
    let err = harness
        .pipeline
        .run_delivery_stage(&id)
        .expect_err("transport is down");
    assert!(matches!(err, PipelineError::Mail(_)));

    let record = harness.pipeline.get(&id).expect("record");
    assert_eq!(record.status, SubmissionStatus::Failed);
    assert!(record.report_sent_at.is_none());
    assert!(harness
        .follow_ups
        .for_submission(&id)
        .expect("follow-ups")
        .is_empty());
}

#[tokio::test]
async fn unknown_submissions_surface_not_found() {
    let harness = build_pipeline();
    let err = harness
        .pipeline
        .get(&SubmissionId("asmt-missing".to_string()))
        .expect_err("nothing stored");
    assert!(matches!(err, PipelineError::NotFound(_)));
}

#[tokio::test]
async fn submit_sends_confirmation_and_completes_through_the_queues() {
    let harness = build_pipeline();
    let record = harness.pipeline.submit(common::intake()).expect("submit");
    assert_eq!(record.status, SubmissionStatus::Pending);
    assert!(record.id.0.starts_with("asmt-"));

    let confirmation = harness
        .mail
        .sent()
        .into_iter()
        .find(|message| message.subject.contains("received"));
    assert!(confirmation.is_some(), "confirmation email goes out at intake");

    let completed = wait_for_status(&harness, &record.id, SubmissionStatus::Completed).await;
    assert_eq!(completed.overall_score, Some(58));
    assert!(completed.report_generated);
    assert!(completed.report_sent_at.is_some());
    assert_eq!(
        harness
            .follow_ups
            .for_submission(&record.id)
            .expect("follow-ups")
            .len(),
        3
    );
}

#[tokio::test]
async fn confirmation_failure_does_not_block_intake() {
    let harness = build_pipeline_with(MemoryMail::failing(1), StubPdf::default());
    let record = harness
        .pipeline
        .submit(common::intake())
        .expect("intake survives a dropped confirmation");

    // The pipeline still completes; only the confirmation was lost.
    let completed = wait_for_status(&harness, &record.id, SubmissionStatus::Completed).await;
    assert_eq!(completed.status, SubmissionStatus::Completed);
}
