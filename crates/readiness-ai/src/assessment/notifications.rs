//! Email bodies for confirmation, report delivery, and follow-up messages.
//!
//! Rendering only builds the message; the caller owns attachments and the
//! transport. Score bands come from [`ReadinessLevel`] so the email copy can
//! never drift from the report.

use std::fmt::Write as _;

use super::domain::{AssessmentSubmission, FollowUpKind, ReadinessLevel};
use super::report::escape_html;

/// Binary attachment carried alongside the HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Fully assembled outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
    pub attachments: Vec<EmailAttachment>,
}

/// Trait describing the opaque mail transport (SMTP or provider API).
pub trait MailTransport: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Mail dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport rejected message: {0}")]
    Transport(String),
}

/// Sender identity applied to every outbound message.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: String,
    pub reply_to: Option<String>,
}

impl MailSettings {
    fn message(&self, to: &str, subject: String, html: String, text: Option<String>) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            from: self.from.clone(),
            reply_to: self.reply_to.clone(),
            subject,
            html,
            text,
            attachments: Vec::new(),
        }
    }
}

/// Sent immediately after intake, before any processing has happened.
pub fn confirmation_email(
    settings: &MailSettings,
    submission: &AssessmentSubmission,
) -> EmailMessage {
    let name = escape_html(&submission.contact_name);
    let company = escape_html(&submission.company_name);

    let mut html = String::new();
    writeln!(html, "<h2>Thanks for completing the AI readiness assessment</h2>").expect("heading");
    writeln!(
        html,
        "<p>Hi {name},</p><p>We received your assessment for <strong>{company}</strong>. \
         Our team is scoring your responses now; your personalized readiness report \
         will arrive in this inbox shortly.</p>"
    )
    .expect("body");
    writeln!(
        html,
        "<p>No action is needed from you in the meantime.</p><p>The Clearpath AI Advisory team</p>"
    )
    .expect("signoff");

    let text = format!(
        "Hi {},\n\nWe received your AI readiness assessment for {}. Your personalized \
         report will arrive in this inbox shortly.\n\nThe Clearpath AI Advisory team\n",
        submission.contact_name, submission.company_name
    );

    settings.message(
        &submission.email,
        "We received your AI readiness assessment".to_string(),
        html,
        Some(text),
    )
}

/// The primary report-delivery email. The PDF is attached by the caller.
pub fn report_email(
    settings: &MailSettings,
    submission: &AssessmentSubmission,
    overall_score: u8,
) -> EmailMessage {
    let level = ReadinessLevel::from_score(overall_score);
    let name = escape_html(&submission.contact_name);
    let company = escape_html(&submission.company_name);

    let mut html = String::new();
    writeln!(html, "<h2>Your AI readiness report is ready</h2>").expect("heading");
    writeln!(html, "<p>Hi {name},</p>").expect("greeting");
    writeln!(
        html,
        "<p>The assessment for <strong>{company}</strong> is complete. Your overall \
         readiness score is <strong style=\"color:{color}\">{score}/100 ({label})</strong>.</p>",
        color = level.color(),
        score = overall_score,
        label = level.label()
    )
    .expect("score line");
    writeln!(
        html,
        "<p>The attached report breaks the score down by category, benchmarks you \
         against your industry, and lays out a prioritized implementation roadmap.</p>"
    )
    .expect("body");
    writeln!(
        html,
        "<p>Questions about the results? Just reply to this email.</p>\
         <p>The Clearpath AI Advisory team</p>"
    )
    .expect("signoff");

    let text = format!(
        "Hi {},\n\nThe AI readiness assessment for {} is complete. Overall score: \
         {}/100 ({}). The attached report has the full category breakdown, benchmarks, \
         and roadmap.\n\nThe Clearpath AI Advisory team\n",
        submission.contact_name,
        submission.company_name,
        overall_score,
        level.label()
    );

    settings.message(
        &submission.email,
        format!("Your AI readiness report: {overall_score}/100"),
        html,
        Some(text),
    )
}

/// Drip follow-ups sent days after the report, selected by kind.
pub fn follow_up_email(
    settings: &MailSettings,
    submission: &AssessmentSubmission,
    kind: FollowUpKind,
) -> EmailMessage {
    let name = escape_html(&submission.contact_name);
    let company = escape_html(&submission.company_name);

    let (subject, body) = match kind {
        FollowUpKind::ConsultationOffer => (
            "A complimentary consultation on your AI readiness results".to_string(),
            format!(
                "<p>Hi {name},</p><p>You recently received the AI readiness report for \
                 <strong>{company}</strong>. If you'd like to walk through the findings, \
                 we're offering a complimentary 45-minute consultation with one of our \
                 advisors to map the report into a concrete plan.</p>\
                 <p>Reply to this email and we'll find a time.</p>"
            ),
        ),
        FollowUpKind::ImplementationGuide => (
            "Your practical guide to acting on the assessment".to_string(),
            format!(
                "<p>Hi {name},</p><p>A week in, teams usually ask the same question: \
                 where do we start? We've put together an implementation guide that \
                 pairs with the readiness report for <strong>{company}</strong>, \
                 covering how to sequence the roadmap phases and staff the first pilot.</p>\
                 <p>Reply if you'd like us to send it over.</p>"
            ),
        ),
        FollowUpKind::SuccessStories => (
            "How companies like yours put their AI roadmap to work".to_string(),
            format!(
                "<p>Hi {name},</p><p>We've collected a few short case studies from \
                 organizations that started where <strong>{company}</strong> is today \
                 and what their first two quarters looked like.</p>\
                 <p>Reply and we'll share the ones closest to your situation.</p>"
            ),
        ),
        FollowUpKind::SurveyFeedback => (
            "Two minutes of feedback on your assessment experience".to_string(),
            format!(
                "<p>Hi {name},</p><p>It's been two weeks since <strong>{company}</strong> \
                 received its AI readiness report. We'd value two minutes of feedback: \
                 was the report useful, and what would have made it more actionable?</p>\
                 <p>Just reply with your thoughts.</p>"
            ),
        ),
    };

    let html = format!("{body}<p>The Clearpath AI Advisory team</p>");
    settings.message(&submission.email, subject, html, None)
}
