//! Orchestration of the assessment lead pipeline: three staggered queues
//! (scoring, report generation, email delivery) over dependency-injected
//! collaborators.
//!
//! Stage ordering is best-effort pacing, not a dependency graph: a stage
//! that fires before its input exists raises a precondition error and lets
//! the queue's retry/backoff absorb the race.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use super::domain::{
    AssessmentSubmission, FollowUp, FollowUpId, FollowUpKind, NewAssessmentSubmission,
    SubmissionId, SubmissionStatus,
};
use super::notifications::{self, EmailAttachment, MailError, MailSettings, MailTransport};
use super::queue::{JobFuture, JobHandler, JobQueue, QueueConfig};
use super::report::{self, PageOptions, PdfEngine, RenderError};
use super::repository::{FollowUpRepository, RepositoryError, SubmissionRepository};
use super::scoring;
use super::storage::{ReportStore, StorageError};

/// Queue tuning for the scoring stage.
pub const SCORING_QUEUE: QueueConfig = QueueConfig {
    name: "assessment-processing",
    attempts: 3,
    backoff_base: Duration::from_millis(2000),
    concurrency: 3,
};

/// Queue tuning for report generation. Rendering is resource-heavy, so its
/// pool is deliberately the smallest.
pub const REPORT_QUEUE: QueueConfig = QueueConfig {
    name: "report-generation",
    attempts: 2,
    backoff_base: Duration::from_millis(5000),
    concurrency: 2,
};

/// Queue tuning for email delivery; IO-bound and cheap, so it parallelizes
/// the widest.
pub const EMAIL_QUEUE: QueueConfig = QueueConfig {
    name: "email-delivery",
    attempts: 3,
    backoff_base: Duration::from_millis(3000),
    concurrency: 5,
};

/// Stage pacing. The defaults stagger the report and email enqueues behind
/// scoring; tests shrink them to keep the suite fast.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub report_delay: Duration,
    pub email_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            report_delay: Duration::from_secs(2),
            email_delay: Duration::from_secs(10),
        }
    }
}

/// Payload for the email-delivery queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryJob {
    Report(SubmissionId),
    FollowUp {
        submission: SubmissionId,
        kind: FollowUpKind,
    },
}

/// Error taxonomy for pipeline stages. Expected errors (missing records and
/// unmet stage preconditions) are retried without touching the submission;
/// everything else marks it failed before the queue counts the attempt.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("submission {0} not found")]
    NotFound(SubmissionId),
    #[error("submission {id} is not ready: {missing} missing")]
    PreconditionNotMet {
        id: SubmissionId,
        missing: &'static str,
    },
    #[error("submission {0} already failed terminally")]
    Halted(SubmissionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Rendering(#[from] RenderError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

impl PipelineError {
    /// Whether this failure is part of the soft-ordering design rather than
    /// an incident. Expected errors never move a submission to failed.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::PreconditionNotMet { .. } | Self::Halted(_)
        )
    }
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static FOLLOW_UP_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("asmt-{id:06}"))
}

fn next_follow_up_id() -> FollowUpId {
    let id = FOLLOW_UP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    FollowUpId(format!("fu-{id:06}"))
}

struct PipelineInner<S, F> {
    submissions: Arc<S>,
    follow_ups: Arc<F>,
    mail: Arc<dyn MailTransport>,
    pdf: Arc<dyn PdfEngine>,
    store: Arc<dyn ReportStore>,
    mail_settings: MailSettings,
}

/// Service composing the scoring engine, renderers, and queues. Must be
/// started inside a tokio runtime; `start` spawns the worker pools.
pub struct AssessmentPipeline<S, F> {
    inner: Arc<PipelineInner<S, F>>,
    scoring: JobQueue<SubmissionId>,
    report: JobQueue<SubmissionId>,
    delivery: JobQueue<DeliveryJob>,
    config: PipelineConfig,
}

impl<S, F> AssessmentPipeline<S, F>
where
    S: SubmissionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        submissions: Arc<S>,
        follow_ups: Arc<F>,
        mail: Arc<dyn MailTransport>,
        pdf: Arc<dyn PdfEngine>,
        store: Arc<dyn ReportStore>,
        mail_settings: MailSettings,
        config: PipelineConfig,
    ) -> Self {
        let inner = Arc::new(PipelineInner {
            submissions,
            follow_ups,
            mail,
            pdf,
            store,
            mail_settings,
        });

        let (scoring, scoring_runner) = JobQueue::channel(SCORING_QUEUE);
        let (report, report_runner) = JobQueue::channel(REPORT_QUEUE);
        let (delivery, delivery_runner) = JobQueue::channel(EMAIL_QUEUE);

        scoring_runner.start(Arc::new(ScoringWorker {
            inner: Arc::clone(&inner),
        }));
        report_runner.start(Arc::new(ReportWorker {
            inner: Arc::clone(&inner),
        }));
        delivery_runner.start(Arc::new(DeliveryWorker {
            inner: Arc::clone(&inner),
            delivery: delivery.clone(),
        }));

        Self {
            inner,
            scoring,
            report,
            delivery,
            config,
        }
    }

    /// Intake entry point: persists a pending record, sends the confirmation
    /// email best-effort, and kicks off the pipeline.
    pub fn submit(
        &self,
        intake: NewAssessmentSubmission,
    ) -> Result<AssessmentSubmission, PipelineError> {
        let record =
            AssessmentSubmission::from_intake(next_submission_id(), intake, Utc::now());
        let stored = self.inner.submissions.create(record)?;

        let confirmation =
            notifications::confirmation_email(&self.inner.mail_settings, &stored);
        if let Err(err) = self.inner.mail.send(&confirmation) {
            warn!(submission = %stored.id, %err, "confirmation email was not delivered");
        }

        self.process_assessment_submission(stored.id.clone());
        Ok(stored)
    }

    /// Enqueues one job per stage with staggered delays. The delays pace the
    /// pipeline; they are not barriers.
    pub fn process_assessment_submission(&self, id: SubmissionId) {
        info!(submission = %id, "assessment queued for processing");
        self.scoring.enqueue(id.clone());
        self.report.enqueue_after(id.clone(), self.config.report_delay);
        self.delivery
            .enqueue_after(DeliveryJob::Report(id), self.config.email_delay);
    }

    pub fn get(&self, id: &SubmissionId) -> Result<AssessmentSubmission, PipelineError> {
        self.inner
            .submissions
            .fetch(id)?
            .ok_or_else(|| PipelineError::NotFound(id.clone()))
    }

    /// Runs the scoring stage body once, with the worker's failure handling.
    pub fn run_scoring_stage(&self, id: &SubmissionId) -> Result<(), PipelineError> {
        let outcome = self.inner.score_submission(id);
        self.inner.complete_stage(id, outcome)
    }

    /// Runs the report-generation stage body once.
    pub fn run_report_stage(&self, id: &SubmissionId) -> Result<(), PipelineError> {
        let outcome = self.inner.generate_report(id);
        self.inner.complete_stage(id, outcome)
    }

    /// Runs the report-delivery stage body once, scheduling follow-ups on
    /// success.
    pub fn run_delivery_stage(&self, id: &SubmissionId) -> Result<(), PipelineError> {
        let outcome = self.inner.deliver_report(id, &self.delivery);
        self.inner.complete_stage(id, outcome)
    }

    /// Sends one follow-up email immediately.
    pub fn run_follow_up_stage(
        &self,
        id: &SubmissionId,
        kind: FollowUpKind,
    ) -> Result<(), PipelineError> {
        self.inner.send_follow_up(id, kind)
    }
}

impl<S, F> PipelineInner<S, F>
where
    S: SubmissionRepository,
    F: FollowUpRepository,
{
    /// Loads a submission, refusing to touch records that already failed.
    fn load(&self, id: &SubmissionId) -> Result<AssessmentSubmission, PipelineError> {
        let record = self
            .submissions
            .fetch(id)?
            .ok_or_else(|| PipelineError::NotFound(id.clone()))?;
        if record.status == SubmissionStatus::Failed {
            return Err(PipelineError::Halted(id.clone()));
        }
        Ok(record)
    }

    fn score_submission(&self, id: &SubmissionId) -> Result<(), PipelineError> {
        let mut record = self.load(id)?;

        let scores = scoring::score_all_categories(&record.responses);
        let overall = scoring::calculate_overall_score(&scores);

        // Category and overall scores land in one update so no reader ever
        // observes one without the other.
        record.category_scores = Some(scores);
        record.overall_score = Some(overall);
        if record.status == SubmissionStatus::Pending {
            record.status = SubmissionStatus::Processing;
        }
        record.processing_error = None;
        self.submissions.update(record)?;

        info!(submission = %id, overall, "submission scored");
        Ok(())
    }

    fn generate_report(&self, id: &SubmissionId) -> Result<(), PipelineError> {
        let mut record = self.load(id)?;
        let overall = record
            .overall_score
            .ok_or_else(|| PipelineError::PreconditionNotMet {
                id: id.clone(),
                missing: "overall score",
            })?;
        let scores: BTreeMap<_, _> = record
            .category_scores
            .clone()
            .ok_or_else(|| PipelineError::PreconditionNotMet {
                id: id.clone(),
                missing: "category scores",
            })?;

        let generated_at = Utc::now();
        let data = report::build_report_data(&record, overall, &scores, generated_at);
        let html = report::render_report_html(&data);
        let bytes = self.pdf.render(&html, &PageOptions::default())?;

        let filename = report::report_filename(id, generated_at);
        let path = self.store.save(&filename, &bytes)?;

        record.report_generated = true;
        record.report_path = Some(path);
        record.report_url = Some(format!("/api/reports/{filename}"));
        self.submissions.update(record)?;

        info!(submission = %id, filename, "report artifact generated");
        Ok(())
    }

    fn deliver_report(
        &self,
        id: &SubmissionId,
        delivery: &JobQueue<DeliveryJob>,
    ) -> Result<(), PipelineError> {
        let mut record = self.load(id)?;
        let report_path =
            record
                .report_path
                .clone()
                .ok_or_else(|| PipelineError::PreconditionNotMet {
                    id: id.clone(),
                    missing: "report artifact",
                })?;
        let overall = record
            .overall_score
            .ok_or_else(|| PipelineError::PreconditionNotMet {
                id: id.clone(),
                missing: "overall score",
            })?;

        let bytes = self.store.load(&report_path)?;
        let attachment_name = Path::new(&report_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ai-readiness-report.pdf".to_string());

        let mut message = notifications::report_email(&self.mail_settings, &record, overall);
        message.attachments.push(EmailAttachment {
            filename: attachment_name,
            content_type: "application/pdf",
            bytes,
        });
        self.mail.send(&message)?;

        let now = Utc::now();
        record.status = SubmissionStatus::Completed;
        record.report_sent_at = Some(now);
        self.submissions.update(record)?;
        info!(submission = %id, "report delivered; submission completed");

        // Follow-ups exist only once the primary send succeeded. A
        // scheduled time already in the past (clock skew, long delays)
        // clamps to immediate delivery.
        for (kind, days) in FollowUpKind::schedule() {
            let scheduled_for = now + chrono::Duration::days(days);
            self.follow_ups.schedule(FollowUp {
                id: next_follow_up_id(),
                assessment_id: id.clone(),
                kind,
                scheduled_for,
            })?;

            let delay = (scheduled_for - Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO);
            delivery.enqueue_after(
                DeliveryJob::FollowUp {
                    submission: id.clone(),
                    kind,
                },
                delay,
            );
        }

        Ok(())
    }

    fn send_follow_up(&self, id: &SubmissionId, kind: FollowUpKind) -> Result<(), PipelineError> {
        let record = self.load(id)?;
        let message = notifications::follow_up_email(&self.mail_settings, &record, kind);
        self.mail.send(&message)?;
        info!(submission = %id, kind = kind.label(), "follow-up email sent");
        Ok(())
    }

    /// Applies the stage failure policy: unexpected errors persist the
    /// terminal failed state (best-effort) before the queue counts the
    /// attempt.
    fn complete_stage(
        &self,
        id: &SubmissionId,
        outcome: Result<(), PipelineError>,
    ) -> Result<(), PipelineError> {
        if let Err(err) = &outcome {
            if !err.is_expected() {
                self.record_failure(id, err);
            }
        }
        outcome
    }

    fn record_failure(&self, id: &SubmissionId, err: &PipelineError) {
        let record = match self.submissions.fetch(id) {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(fetch_err) => {
                error!(submission = %id, %fetch_err, "unable to load record while persisting failure");
                return;
            }
        };

        let mut failed = record;
        failed.status = SubmissionStatus::Failed;
        failed.processing_error = Some(err.to_string());
        if let Err(update_err) = self.submissions.update(failed) {
            // Only logged: persisting the failure must not mask the
            // original error.
            error!(submission = %id, %update_err, "unable to persist failure state");
        }
    }
}

struct ScoringWorker<S, F> {
    inner: Arc<PipelineInner<S, F>>,
}

impl<S, F> JobHandler<SubmissionId> for ScoringWorker<S, F>
where
    S: SubmissionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    fn run(&self, id: SubmissionId) -> JobFuture<'_> {
        Box::pin(async move {
            let outcome = self.inner.score_submission(&id);
            self.inner.complete_stage(&id, outcome)
        })
    }
}

struct ReportWorker<S, F> {
    inner: Arc<PipelineInner<S, F>>,
}

impl<S, F> JobHandler<SubmissionId> for ReportWorker<S, F>
where
    S: SubmissionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    fn run(&self, id: SubmissionId) -> JobFuture<'_> {
        Box::pin(async move {
            let outcome = self.inner.generate_report(&id);
            self.inner.complete_stage(&id, outcome)
        })
    }
}

struct DeliveryWorker<S, F> {
    inner: Arc<PipelineInner<S, F>>,
    delivery: JobQueue<DeliveryJob>,
}

impl<S, F> JobHandler<DeliveryJob> for DeliveryWorker<S, F>
where
    S: SubmissionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    fn run(&self, job: DeliveryJob) -> JobFuture<'_> {
        Box::pin(async move {
            match job {
                DeliveryJob::Report(id) => {
                    let outcome = self.inner.deliver_report(&id, &self.delivery);
                    self.inner.complete_stage(&id, outcome)
                }
                // A follow-up failure never fails the submission; the
                // primary report already went out.
                DeliveryJob::FollowUp { submission, kind } => {
                    self.inner.send_follow_up(&submission, kind)
                }
            }
        })
    }
}
