use metrics_exporter_prometheus::PrometheusHandle;
use readiness_ai::assessment::{
    AssessmentSubmission, EmailMessage, FollowUp, FollowUpRepository, MailError, MailTransport,
    PageOptions, PdfEngine, RenderError, RepositoryError, SubmissionId, SubmissionRepository,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) report_dir: Arc<PathBuf>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, AssessmentSubmission>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn create(&self, record: AssessmentSubmission) -> Result<AssessmentSubmission, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentSubmission) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<AssessmentSubmission>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFollowUpRepository {
    entries: Arc<Mutex<Vec<FollowUp>>>,
}

impl FollowUpRepository for InMemoryFollowUpRepository {
    fn schedule(&self, follow_up: FollowUp) -> Result<FollowUp, RepositoryError> {
        let mut guard = self.entries.lock().expect("follow-up mutex poisoned");
        guard.push(follow_up.clone());
        Ok(follow_up)
    }

    fn for_submission(&self, id: &SubmissionId) -> Result<Vec<FollowUp>, RepositoryError> {
        let guard = self.entries.lock().expect("follow-up mutex poisoned");
        Ok(guard
            .iter()
            .filter(|entry| &entry.assessment_id == id)
            .cloned()
            .collect())
    }
}

/// Stand-in transport that logs outbound messages instead of handing them to
/// an SMTP relay. Deployments swap this for a provider-backed transport.
#[derive(Default, Clone)]
pub(crate) struct LogMailTransport {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MailTransport for LogMailTransport {
    fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            attachments = message.attachments.len(),
            "outbound email"
        );
        let mut guard = self.sent.lock().expect("mail mutex poisoned");
        guard.push(message.clone());
        Ok(())
    }
}

impl LogMailTransport {
    #[allow(dead_code)]
    pub(crate) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mail mutex poisoned").clone()
    }
}

/// Minimal single-object PDF wrapper around the rendered HTML.
///
/// TODO: replace with a headless-chromium renderer once the deployment image
/// ships a browser; the artifact shape and storage contract stay the same.
#[derive(Default, Clone)]
pub(crate) struct SnapshotPdfEngine;

impl PdfEngine for SnapshotPdfEngine {
    fn render(&self, html: &str, options: &PageOptions) -> Result<Vec<u8>, RenderError> {
        if html.trim().is_empty() {
            return Err(RenderError::Engine("empty document".to_string()));
        }

        let mut bytes = Vec::with_capacity(html.len() + 128);
        bytes.extend_from_slice(b"%PDF-1.4\n");
        bytes.extend_from_slice(
            format!(
                "% format={} margin={}mm background={}\n",
                options.format, options.margin_mm, options.print_background
            )
            .as_bytes(),
        );
        bytes.extend_from_slice(b"1 0 obj\n<< /Type /Catalog >>\nstream\n");
        bytes.extend_from_slice(html.as_bytes());
        bytes.extend_from_slice(b"\nendstream\nendobj\n%%EOF\n");
        Ok(bytes)
    }
}
