//! Assembles the readiness report and renders it as a styled HTML document.
//!
//! The HTML is handed to an opaque [`PdfEngine`] for conversion into the
//! binary artifact; visual styling is incidental, but section ordering and
//! the score-to-color / score-to-bar-width mapping are part of the report's
//! contract.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::domain::{
    AssessmentSubmission, BenchmarkData, Category, CategoryResponses, Priority, ReadinessLevel,
    SubmissionId,
};
use super::recommendations::{self, RecommendationSection};

/// Page setup forwarded to the rendering engine.
#[derive(Debug, Clone, Copy)]
pub struct PageOptions {
    pub format: &'static str,
    pub margin_mm: u8,
    pub print_background: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            format: "A4",
            margin_mm: 14,
            print_background: true,
        }
    }
}

/// Trait describing the HTML-to-PDF rendering collaborator.
pub trait PdfEngine: Send + Sync {
    fn render(&self, html: &str, options: &PageOptions) -> Result<Vec<u8>, RenderError>;
}

/// Document rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("document rendering failed: {0}")]
    Engine(String),
}

/// Everything the renderer needs, assembled once by the report worker.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub submission_id: SubmissionId,
    pub company_name: String,
    pub contact_name: String,
    pub overall_score: u8,
    pub level: ReadinessLevel,
    pub category_scores: BTreeMap<Category, u8>,
    pub responses: Vec<CategoryResponses>,
    pub recommendations: Vec<RecommendationSection>,
    pub benchmarks: BenchmarkData,
    pub generated_at: DateTime<Utc>,
}

pub fn build_report_data(
    submission: &AssessmentSubmission,
    overall_score: u8,
    category_scores: &BTreeMap<Category, u8>,
    generated_at: DateTime<Utc>,
) -> ReportData {
    ReportData {
        submission_id: submission.id.clone(),
        company_name: submission.company_name.clone(),
        contact_name: submission.contact_name.clone(),
        overall_score,
        level: ReadinessLevel::from_score(overall_score),
        category_scores: category_scores.clone(),
        responses: submission.responses.clone(),
        recommendations: recommendations::generate_recommendations(category_scores),
        benchmarks: recommendations::generate_benchmarks(overall_score),
        generated_at,
    }
}

/// Storage name for the rendered artifact.
pub fn report_filename(id: &SubmissionId, generated_at: DateTime<Utc>) -> String {
    format!(
        "assessment-report-{}-{}.pdf",
        id,
        generated_at.timestamp_millis()
    )
}

/// Renders the full document in its contractual section order: cover,
/// executive summary, category breakdown, recommendations, benchmarks,
/// roadmap, appendix.
pub fn render_report_html(data: &ReportData) -> String {
    let mut html = String::new();
    html.push_str(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>\
         body{font-family:Helvetica,Arial,sans-serif;color:#1f2937;margin:0}\
         section{padding:28px 36px;page-break-after:always}\
         h1{font-size:30px}h2{font-size:22px;border-bottom:2px solid #e5e7eb;padding-bottom:6px}\
         .bar-track{background:#e5e7eb;border-radius:4px;height:14px;width:100%}\
         .bar-fill{border-radius:4px;height:14px}\
         .pill{display:inline-block;padding:2px 10px;border-radius:10px;color:#fff;font-size:12px}\
         table{border-collapse:collapse;width:100%}td,th{padding:6px 8px;text-align:left}\
         </style></head><body>",
    );

    render_cover(&mut html, data);
    render_executive_summary(&mut html, data);
    render_category_breakdown(&mut html, data);
    render_recommendation_sections(&mut html, data);
    render_benchmarks(&mut html, data);
    render_roadmap(&mut html, data);
    render_appendix(&mut html, data);

    html.push_str("</body></html>");
    html
}

fn render_cover(html: &mut String, data: &ReportData) {
    writeln!(html, "<section><h1>AI Readiness Assessment</h1>").expect("cover heading");
    writeln!(
        html,
        "<p><strong>{}</strong><br>Prepared for {}</p>",
        escape_html(&data.company_name),
        escape_html(&data.contact_name)
    )
    .expect("cover identity");
    writeln!(
        html,
        "<p style=\"font-size:52px;margin:24px 0 6px;color:{}\">{}<span style=\"font-size:22px;color:#6b7280\">/100</span></p>",
        data.level.color(),
        data.overall_score
    )
    .expect("cover score");
    writeln!(
        html,
        "<p><span class=\"pill\" style=\"background:{}\">{} readiness</span></p>",
        data.level.color(),
        data.level.label()
    )
    .expect("cover level");
    writeln!(
        html,
        "<p style=\"color:#6b7280\">Generated {}</p></section>",
        data.generated_at.format("%B %d, %Y")
    )
    .expect("cover date");
}

fn render_executive_summary(html: &mut String, data: &ReportData) {
    let mut ranked: Vec<(Category, u8)> = data
        .category_scores
        .iter()
        .map(|(&category, &score)| (category, score))
        .collect();
    // Descending by score, canonical order on ties.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let strongest: Vec<&(Category, u8)> = ranked.iter().take(3).collect();
    let weakest: Vec<&(Category, u8)> = ranked.iter().rev().take(3).collect();
    let weakest_category = weakest.first().map(|(category, _)| *category);

    writeln!(html, "<section><h2>Executive Summary</h2>").expect("summary heading");

    html.push_str("<h3>Strongest areas</h3><ul>");
    for (category, score) in &strongest {
        writeln!(html, "<li>{}: {}/100</li>", category.label(), score).expect("strength item");
    }
    html.push_str("</ul><h3>Biggest opportunities</h3><ul>");
    for (category, score) in &weakest {
        writeln!(html, "<li>{}: {}/100</li>", category.label(), score).expect("weakness item");
    }
    html.push_str("</ul>");

    writeln!(
        html,
        "<p><strong>Primary recommendation:</strong> {}</p></section>",
        primary_recommendation(data.overall_score, weakest_category)
    )
    .expect("primary recommendation");
}

/// Single-sentence headline advice, selected by the overall readiness band.
fn primary_recommendation(overall_score: u8, weakest: Option<Category>) -> String {
    let weakest_label = weakest.map_or("your weakest capability", Category::label);
    match ReadinessLevel::from_score(overall_score) {
        ReadinessLevel::Excellent => format!(
            "Your organization is AI-ready; protect that position by closing the remaining \
             gap in {weakest_label} before scaling further."
        ),
        ReadinessLevel::Good => format!(
            "Strengthen {weakest_label} while piloting AI in a high-value process to \
             convert readiness into results."
        ),
        ReadinessLevel::Fair => format!(
            "Focus the next two quarters on foundation-building, starting with \
             {weakest_label}, before committing to production AI workloads."
        ),
        ReadinessLevel::Poor => format!(
            "A full foundational rebuild is needed before AI investment pays off; begin \
             with {weakest_label} and revisit the assessment in six months."
        ),
    }
}

fn score_bar(html: &mut String, label: &str, score: u8, color: &str) {
    writeln!(
        html,
        "<tr><td style=\"width:30%\">{label}</td>\
         <td><div class=\"bar-track\"><div class=\"bar-fill\" style=\"width:{score}%;background:{color}\"></div></div></td>\
         <td style=\"width:10%\">{score}</td></tr>",
    )
    .expect("score bar");
}

fn render_category_breakdown(html: &mut String, data: &ReportData) {
    writeln!(html, "<section><h2>Score Breakdown</h2><table>").expect("breakdown heading");
    for category in Category::ordered() {
        if let Some(&score) = data.category_scores.get(&category) {
            score_bar(
                html,
                category.label(),
                score,
                ReadinessLevel::from_score(score).color(),
            );
        }
    }
    html.push_str("</table></section>");
}

fn render_recommendation_sections(html: &mut String, data: &ReportData) {
    writeln!(html, "<section><h2>Recommendations</h2>").expect("recommendations heading");
    for priority in Priority::ordered() {
        let group: Vec<&RecommendationSection> = data
            .recommendations
            .iter()
            .filter(|section| section.priority == priority)
            .collect();
        if group.is_empty() {
            continue;
        }

        writeln!(
            html,
            "<h3 style=\"color:{}\">{}</h3>",
            priority.color(),
            priority.label()
        )
        .expect("priority heading");

        for section in group {
            writeln!(
                html,
                "<h4>{} ({}/100, {})</h4>",
                section.category.label(),
                section.score,
                section.level.label()
            )
            .expect("section heading");
            html.push_str("<ul>");
            for recommendation in &section.recommendations {
                writeln!(html, "<li>{}</li>", escape_html(recommendation)).expect("rec item");
            }
            html.push_str("</ul><p><em>Next steps:</em></p><ul>");
            for step in &section.next_steps {
                writeln!(html, "<li>{}</li>", escape_html(step)).expect("step item");
            }
            html.push_str("</ul>");
        }
    }
    html.push_str("</section>");
}

fn render_benchmarks(html: &mut String, data: &ReportData) {
    writeln!(html, "<section><h2>Benchmark Comparison</h2><table>").expect("benchmark heading");
    score_bar(html, "Your score", data.overall_score, data.level.color());
    score_bar(
        html,
        "Industry average",
        data.benchmarks.industry_average,
        "#9ca3af",
    );
    score_bar(
        html,
        "Top performers",
        data.benchmarks.top_performers,
        "#4b5563",
    );
    writeln!(
        html,
        "</table><p>Position: <strong>{}</strong></p></section>",
        data.benchmarks.position.label()
    )
    .expect("benchmark position");
}

fn render_roadmap(html: &mut String, data: &ReportData) {
    const PHASES: [(Priority, &str, &str); 3] = [
        (Priority::High, "Phase 1", "0-3 months"),
        (Priority::Medium, "Phase 2", "3-6 months"),
        (Priority::Low, "Phase 3", "6-12 months"),
    ];

    writeln!(html, "<section><h2>Implementation Roadmap</h2>").expect("roadmap heading");
    for (priority, phase, window) in PHASES {
        writeln!(html, "<h3>{phase} ({window})</h3>").expect("phase heading");
        let items: Vec<&RecommendationSection> = data
            .recommendations
            .iter()
            .filter(|section| section.priority == priority)
            .collect();
        if items.is_empty() {
            html.push_str("<p style=\"color:#6b7280\">No items scheduled for this phase.</p>");
            continue;
        }
        html.push_str("<ul>");
        for section in items {
            let headline = section
                .recommendations
                .first()
                .map(String::as_str)
                .unwrap_or("Review this capability with your advisor.");
            writeln!(
                html,
                "<li><strong>{}:</strong> {}</li>",
                section.category.label(),
                escape_html(headline)
            )
            .expect("roadmap item");
        }
        html.push_str("</ul>");
    }
    html.push_str("</section>");
}

fn render_appendix(html: &mut String, data: &ReportData) {
    let answered: usize = data.responses.iter().map(|set| set.responses.len()).sum();
    writeln!(html, "<section><h2>Appendix</h2>").expect("appendix heading");
    writeln!(
        html,
        "<h3>Methodology</h3><p>Scores are weighted averages of {answered} questionnaire \
         responses across {} capability dimensions. Each category contributes a fixed \
         share of the overall score; unanswered questions are excluded from both the \
         numerator and the denominator rather than counted as zero.</p>",
        data.category_scores.len()
    )
    .expect("methodology");
    html.push_str(
        "<h3>Scoring legend</h3><ul>\
         <li>85-100: Excellent</li>\
         <li>70-84: Good</li>\
         <li>50-69: Fair</li>\
         <li>0-49: Poor</li></ul>",
    );
    html.push_str(
        "<h3>Contact</h3><p>Clearpath AI Advisory \
         &middot; advisors@clearpathadvisory.example</p></section>",
    );
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::NewAssessmentSubmission;

    fn sample_data() -> ReportData {
        let submission = AssessmentSubmission::from_intake(
            SubmissionId("asmt-000007".to_string()),
            NewAssessmentSubmission {
                email: "lee@globex.example".to_string(),
                company_name: "Globex <Industries>".to_string(),
                contact_name: "Lee Chen".to_string(),
                phone: None,
                source: "webinar".to_string(),
                marketing_consent: false,
                processing_consent: true,
                responses: Vec::new(),
            },
            Utc::now(),
        );
        let scores: BTreeMap<Category, u8> = [
            (Category::Strategy, 82),
            (Category::Data, 35),
            (Category::Technology, 60),
            (Category::Talent, 91),
        ]
        .into_iter()
        .collect();
        build_report_data(&submission, 64, &scores, Utc::now())
    }

    #[test]
    fn sections_appear_in_contract_order() {
        let html = render_report_html(&sample_data());
        let order = [
            "AI Readiness Assessment",
            "Executive Summary",
            "Score Breakdown",
            "Recommendations",
            "Benchmark Comparison",
            "Implementation Roadmap",
            "Appendix",
        ];
        let mut last = 0;
        for marker in order {
            let position = html[last..]
                .find(marker)
                .unwrap_or_else(|| panic!("missing section {marker}"));
            last += position;
        }
    }

    #[test]
    fn company_name_is_escaped() {
        let html = render_report_html(&sample_data());
        assert!(html.contains("Globex &lt;Industries&gt;"));
        assert!(!html.contains("Globex <Industries>"));
    }

    #[test]
    fn bar_widths_track_scores() {
        let html = render_report_html(&sample_data());
        assert!(html.contains("width:35%"));
        assert!(html.contains("width:91%"));
    }

    #[test]
    fn primary_recommendation_follows_the_overall_band() {
        assert!(primary_recommendation(90, Some(Category::Data)).contains("protect"));
        assert!(primary_recommendation(75, Some(Category::Data)).contains("piloting"));
        assert!(primary_recommendation(55, Some(Category::Data)).contains("foundation-building"));
        assert!(primary_recommendation(30, Some(Category::Data)).contains("rebuild"));
    }

    #[test]
    fn roadmap_buckets_by_priority() {
        let html = render_report_html(&sample_data());
        let phase1 = html.find("Phase 1").expect("phase 1");
        let phase2 = html.find("Phase 2").expect("phase 2");
        // Data (35, high) lands in phase 1; Technology (60, medium) in phase 2.
        let data_item = html.find("Data Readiness:").expect("data roadmap item");
        let tech_item = html.find("Technology Stack:").expect("tech roadmap item");
        assert!(data_item > phase1 && data_item < phase2);
        assert!(tech_item > phase2);
    }

    #[test]
    fn report_filename_embeds_id_and_timestamp() {
        let at = Utc::now();
        let name = report_filename(&SubmissionId("asmt-000007".to_string()), at);
        assert!(name.starts_with("assessment-report-asmt-000007-"));
        assert!(name.ends_with(".pdf"));
        assert!(name.contains(&at.timestamp_millis().to_string()));
    }
}
