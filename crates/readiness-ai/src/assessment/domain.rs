use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for assessment submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed set of AI-maturity dimensions every assessment is scored across.
///
/// The `Ord` derive gives category maps a canonical iteration order, which keeps
/// recommendation output deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Strategy,
    Data,
    Technology,
    Talent,
    Governance,
    Culture,
    Processes,
    Infrastructure,
}

impl Category {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Strategy,
            Self::Data,
            Self::Technology,
            Self::Talent,
            Self::Governance,
            Self::Culture,
            Self::Processes,
            Self::Infrastructure,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strategy => "AI Strategy",
            Self::Data => "Data Readiness",
            Self::Technology => "Technology Stack",
            Self::Talent => "Talent & Skills",
            Self::Governance => "Governance & Risk",
            Self::Culture => "Culture & Adoption",
            Self::Processes => "Process Maturity",
            Self::Infrastructure => "Infrastructure",
        }
    }

    /// Share of the overall readiness score carried by this category.
    /// The weights sum to 1.00 across the full set; the overall score
    /// renormalizes over whichever categories are actually present.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Strategy | Self::Data => 0.20,
            Self::Technology | Self::Talent => 0.15,
            Self::Governance | Self::Culture => 0.10,
            Self::Processes | Self::Infrastructure => 0.05,
        }
    }
}

/// Lifecycle of a submission as it moves through the pipeline.
/// `Failed` is terminal; no worker transitions a failed record forward again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Readiness bands shared by scoring, recommendations, report, and email
/// rendering. This is the single home of the 85/70/50 thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ReadinessLevel {
    pub const fn from_score(score: u8) -> Self {
        if score >= 85 {
            Self::Excellent
        } else if score >= 70 {
            Self::Good
        } else if score >= 50 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#16a34a",
            Self::Good => "#2563eb",
            Self::Fair => "#d97706",
            Self::Poor => "#dc2626",
        }
    }
}

/// Remediation urgency derived from a category score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn from_score(score: u8) -> Self {
        if score < 50 {
            Self::High
        } else if score < 70 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn ordered() -> [Self; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High Priority",
            Self::Medium => "Medium Priority",
            Self::Low => "Low Priority",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::High => "#dc2626",
            Self::Medium => "#d97706",
            Self::Low => "#16a34a",
        }
    }
}

/// Raw answer captured for one catalog question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question_id: String,
    pub answer: String,
    pub score: u8,
}

/// Answer set for one category; the intake form produces one entry per
/// category, with question ids unique within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponses {
    pub category: Category,
    pub responses: Vec<QuestionResponse>,
}

/// Contact, consent, and answer payload captured by the intake form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssessmentSubmission {
    pub email: String,
    pub company_name: String,
    pub contact_name: String,
    pub phone: Option<String>,
    pub source: String,
    pub marketing_consent: bool,
    pub processing_consent: bool,
    pub responses: Vec<CategoryResponses>,
}

/// The central pipeline record. Derived fields are written only by the
/// pipeline workers, never by the submitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub id: SubmissionId,
    pub email: String,
    pub company_name: String,
    pub contact_name: String,
    pub phone: Option<String>,
    pub source: String,
    pub marketing_consent: bool,
    pub processing_consent: bool,
    pub responses: Vec<CategoryResponses>,
    pub overall_score: Option<u8>,
    pub category_scores: Option<BTreeMap<Category, u8>>,
    pub status: SubmissionStatus,
    pub processing_error: Option<String>,
    pub report_generated: bool,
    pub report_path: Option<String>,
    pub report_url: Option<String>,
    pub report_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AssessmentSubmission {
    pub fn from_intake(
        id: SubmissionId,
        intake: NewAssessmentSubmission,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email: intake.email,
            company_name: intake.company_name,
            contact_name: intake.contact_name,
            phone: intake.phone,
            source: intake.source,
            marketing_consent: intake.marketing_consent,
            processing_consent: intake.processing_consent,
            responses: intake.responses,
            overall_score: None,
            category_scores: None,
            status: SubmissionStatus::Pending,
            processing_error: None,
            report_generated: false,
            report_path: None,
            report_url: None,
            report_sent_at: None,
            created_at,
        }
    }

    /// Sanitized status snapshot for API responses.
    pub fn status_view(&self) -> SubmissionStatusView {
        SubmissionStatusView {
            submission_id: self.id.clone(),
            status: self.status.label(),
            overall_score: self.overall_score,
            report_url: self.report_url.clone(),
            processing_error: self.processing_error.clone(),
        }
    }
}

/// Exposed representation of a submission's pipeline progress.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStatusView {
    pub submission_id: SubmissionId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_error: Option<String>,
}

/// Identifier wrapper for scheduled follow-up emails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowUpId(pub String);

/// Drip email variants sent after the primary report delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FollowUpKind {
    ConsultationOffer,
    ImplementationGuide,
    SuccessStories,
    SurveyFeedback,
}

impl FollowUpKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ConsultationOffer => "consultation-offer",
            Self::ImplementationGuide => "implementation-guide",
            Self::SuccessStories => "success-stories",
            Self::SurveyFeedback => "survey-feedback",
        }
    }

    /// The trio scheduled after a successful report delivery, with the
    /// offset in days from the moment the report email went out.
    pub const fn schedule() -> [(Self, i64); 3] {
        [
            (Self::ConsultationOffer, 2),
            (Self::ImplementationGuide, 7),
            (Self::SurveyFeedback, 14),
        ]
    }
}

/// One scheduled future email, created only after the primary report email
/// was delivered successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: FollowUpId,
    pub assessment_id: SubmissionId,
    pub kind: FollowUpKind,
    pub scheduled_for: DateTime<Utc>,
}

/// Where the overall score lands relative to the fixed reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketPosition {
    TopQuartile,
    AboveAverage,
    Average,
    BelowAverage,
}

impl MarketPosition {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TopQuartile => "Top Quartile",
            Self::AboveAverage => "Above Average",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
        }
    }
}

/// Benchmark comparison embedded in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkData {
    pub industry_average: u8,
    pub top_performers: u8,
    pub position: MarketPosition,
}
