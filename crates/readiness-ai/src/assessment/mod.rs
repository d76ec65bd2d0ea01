//! AI-readiness assessment pipeline: intake, weighted scoring, report
//! rendering, and staged email delivery.
//!
//! The pipeline runs on three in-process queues so a slow PDF render or a
//! flaky mail transport never blocks intake. Stage ordering is soft; each
//! worker validates its own preconditions and leans on retry/backoff when an
//! earlier stage has not finished yet.

pub mod catalog;
pub mod domain;
pub mod notifications;
pub mod pipeline;
pub mod queue;
pub mod recommendations;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod storage;

pub use catalog::{question_catalog, questions_for, AnswerOption, AssessmentQuestion, QuestionKind};
pub use domain::{
    AssessmentSubmission, BenchmarkData, Category, CategoryResponses, FollowUp, FollowUpId,
    FollowUpKind, MarketPosition, NewAssessmentSubmission, Priority, QuestionResponse,
    ReadinessLevel, SubmissionId, SubmissionStatus, SubmissionStatusView,
};
pub use notifications::{EmailAttachment, EmailMessage, MailError, MailSettings, MailTransport};
pub use pipeline::{
    AssessmentPipeline, DeliveryJob, PipelineConfig, PipelineError, EMAIL_QUEUE, REPORT_QUEUE,
    SCORING_QUEUE,
};
pub use queue::{JobHandler, JobQueue, JobRunner, QueueConfig};
pub use recommendations::{
    generate_benchmarks, generate_recommendations, RecommendationSection, INDUSTRY_AVERAGE,
    TOP_PERFORMERS,
};
pub use report::{
    build_report_data, render_report_html, report_filename, PageOptions, PdfEngine, RenderError,
    ReportData,
};
pub use repository::{FollowUpRepository, RepositoryError, SubmissionRepository};
pub use router::assessment_router;
pub use storage::{FileReportStore, ReportStore, StorageError};
