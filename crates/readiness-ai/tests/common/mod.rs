//! Shared in-memory doubles for pipeline and router integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use readiness_ai::assessment::{
    AssessmentPipeline, AssessmentSubmission, Category, CategoryResponses, EmailMessage,
    FollowUp, FollowUpRepository, MailError, MailSettings, MailTransport, NewAssessmentSubmission,
    PageOptions, PdfEngine, PipelineConfig, QuestionResponse, RenderError, ReportStore,
    RepositoryError, StorageError, SubmissionId, SubmissionRepository,
};

#[derive(Default, Clone)]
pub struct MemoryRepository {
    records: Arc<Mutex<HashMap<SubmissionId, AssessmentSubmission>>>,
}

impl SubmissionRepository for MemoryRepository {
    fn create(&self, record: AssessmentSubmission) -> Result<AssessmentSubmission, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<AssessmentSubmission>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, record: AssessmentSubmission) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

impl MemoryRepository {
    pub fn seed(&self, record: AssessmentSubmission) {
        self.records
            .lock()
            .expect("lock")
            .insert(record.id.clone(), record);
    }
}

#[derive(Default, Clone)]
pub struct MemoryFollowUps {
    entries: Arc<Mutex<Vec<FollowUp>>>,
}

impl FollowUpRepository for MemoryFollowUps {
    fn schedule(&self, follow_up: FollowUp) -> Result<FollowUp, RepositoryError> {
        self.entries.lock().expect("lock").push(follow_up.clone());
        Ok(follow_up)
    }

    fn for_submission(&self, id: &SubmissionId) -> Result<Vec<FollowUp>, RepositoryError> {
        Ok(self
            .entries
            .lock()
            .expect("lock")
            .iter()
            .filter(|entry| &entry.assessment_id == id)
            .cloned()
            .collect())
    }
}

/// Transport double recording every send; can be primed to fail the first
/// N attempts.
#[derive(Default, Clone)]
pub struct MemoryMail {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail_remaining: Arc<AtomicU32>,
}

impl MemoryMail {
    pub fn failing(times: u32) -> Self {
        Self {
            sent: Arc::default(),
            fail_remaining: Arc::new(AtomicU32::new(times)),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("lock").clone()
    }
}

impl MailTransport for MemoryMail {
    fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(MailError::Transport("relay unavailable".to_string()));
        }
        self.sent.lock().expect("lock").push(message.clone());
        Ok(())
    }
}

/// PDF engine double returning the HTML bytes, or failing when primed.
#[derive(Default, Clone)]
pub struct StubPdf {
    pub fail: bool,
}

impl PdfEngine for StubPdf {
    fn render(&self, html: &str, _options: &PageOptions) -> Result<Vec<u8>, RenderError> {
        if self.fail {
            return Err(RenderError::Engine("renderer crashed".to_string()));
        }
        Ok(html.as_bytes().to_vec())
    }
}

#[derive(Default, Clone)]
pub struct MemoryStore {
    artifacts: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn artifact_count(&self) -> usize {
        self.artifacts.lock().expect("lock").len()
    }
}

impl ReportStore for MemoryStore {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = format!("mem://{filename}");
        self.artifacts
            .lock()
            .expect("lock")
            .insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.artifacts
            .lock()
            .expect("lock")
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }
}

pub fn mail_settings() -> MailSettings {
    MailSettings {
        from: "assessments@clearpathadvisory.example".to_string(),
        reply_to: None,
    }
}

pub fn fast_config() -> PipelineConfig {
    PipelineConfig {
        report_delay: Duration::from_millis(40),
        email_delay: Duration::from_millis(120),
    }
}

pub struct Harness {
    pub pipeline: Arc<AssessmentPipeline<MemoryRepository, MemoryFollowUps>>,
    pub repository: MemoryRepository,
    pub follow_ups: MemoryFollowUps,
    pub mail: MemoryMail,
    pub store: MemoryStore,
}

pub fn build_pipeline() -> Harness {
    build_pipeline_with(MemoryMail::default(), StubPdf::default())
}

pub fn build_pipeline_with(mail: MemoryMail, pdf: StubPdf) -> Harness {
    let repository = MemoryRepository::default();
    let follow_ups = MemoryFollowUps::default();
    let store = MemoryStore::default();

    let pipeline = Arc::new(AssessmentPipeline::start(
        Arc::new(repository.clone()),
        Arc::new(follow_ups.clone()),
        Arc::new(mail.clone()),
        Arc::new(pdf),
        Arc::new(store.clone()),
        mail_settings(),
        fast_config(),
    ));

    Harness {
        pipeline,
        repository,
        follow_ups,
        mail,
        store,
    }
}

fn responses_for(category: Category, entries: &[(&str, &str, u8)]) -> CategoryResponses {
    CategoryResponses {
        category,
        responses: entries
            .iter()
            .map(|(question_id, answer, score)| QuestionResponse {
                question_id: question_id.to_string(),
                answer: answer.to_string(),
                score: *score,
            })
            .collect(),
    }
}

/// A mid-strength intake covering four categories.
pub fn intake() -> NewAssessmentSubmission {
    NewAssessmentSubmission {
        email: "dana@initech.example".to_string(),
        company_name: "Initech".to_string(),
        contact_name: "Dana Whitfield".to_string(),
        phone: Some("+1 515 555 0170".to_string()),
        source: "website".to_string(),
        marketing_consent: true,
        processing_consent: true,
        responses: vec![
            responses_for(
                Category::Strategy,
                &[("strategy-1", "piloting", 75), ("strategy-2", "3", 50)],
            ),
            responses_for(
                Category::Data,
                &[("data-1", "2", 25), ("data-2", "yes", 100)],
            ),
            responses_for(
                Category::Technology,
                &[("technology-1", "defined", 50), ("technology-2", "yes", 100)],
            ),
            responses_for(
                Category::Talent,
                &[("talent-1", "4", 75), ("talent-2", "no", 0)],
            ),
        ],
    }
}
