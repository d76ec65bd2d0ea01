use chrono::Utc;
use clap::{Args, ValueEnum};
use readiness_ai::assessment::{
    build_report_data, question_catalog, render_report_html, AssessmentSubmission, Category,
    CategoryResponses, MailSettings, NewAssessmentSubmission, QuestionResponse, ReadinessLevel,
    SubmissionId,
};
use readiness_ai::assessment::{notifications, scoring};
use readiness_ai::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Company name used for the sample submission
    #[arg(long, default_value = "Acme Manufacturing")]
    pub(crate) company: String,
    /// Contact name used for the sample submission
    #[arg(long, default_value = "Jordan Ellis")]
    pub(crate) contact: String,
    /// Answer profile for the generated questionnaire
    #[arg(long, value_enum, default_value = "mixed")]
    pub(crate) profile: DemoProfile,
    /// Write the rendered report HTML to this path
    #[arg(long)]
    pub(crate) write_html: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub(crate) enum DemoProfile {
    /// Highest-scoring answer for every question
    Strong,
    /// Alternating strong and weak answers
    #[default]
    Mixed,
    /// Lowest-scoring answer for every question
    Weak,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        company,
        contact,
        profile,
        write_html,
    } = args;

    println!("AI readiness assessment demo");
    println!("Company: {company} | Contact: {contact} | Profile: {profile:?}");

    let intake = demo_submission(&company, &contact, profile);
    let record = AssessmentSubmission::from_intake(
        SubmissionId("asmt-demo-01".to_string()),
        intake,
        Utc::now(),
    );

    let scores = scoring::score_all_categories(&record.responses);
    let overall = scoring::calculate_overall_score(&scores);
    let level = ReadinessLevel::from_score(overall);

    println!("\nCategory scores");
    for category in Category::ordered() {
        if let Some(score) = scores.get(&category) {
            println!("- {}: {}/100", category.label(), score);
        }
    }
    println!("\nOverall: {overall}/100 ({})", level.label());

    let data = build_report_data(&record, overall, &scores, Utc::now());
    println!("\nBenchmark position: {}", data.benchmarks.position.label());

    println!("\nRecommendations (weakest first)");
    for section in &data.recommendations {
        println!(
            "- [{}] {} ({}/100)",
            section.priority.label(),
            section.category.label(),
            section.score
        );
        for item in section.recommendations.iter().take(2) {
            println!("    * {item}");
        }
    }

    let settings = MailSettings {
        from: "assessments@clearpathadvisory.example".to_string(),
        reply_to: None,
    };
    let report_mail = notifications::report_email(&settings, &record, overall);
    println!("\nReport email subject: {}", report_mail.subject);

    let html = render_report_html(&data);
    match write_html {
        Some(path) => {
            std::fs::write(&path, &html)?;
            println!("Report HTML written to {}", path.display());
        }
        None => {
            println!("Report HTML: {} bytes (use --write-html to save it)", html.len());
        }
    }

    Ok(())
}

fn demo_submission(
    company: &str,
    contact: &str,
    profile: DemoProfile,
) -> NewAssessmentSubmission {
    let mut by_category: Vec<CategoryResponses> = Category::ordered()
        .into_iter()
        .map(|category| CategoryResponses {
            category,
            responses: Vec::new(),
        })
        .collect();

    for (index, question) in question_catalog().iter().enumerate() {
        let options = question.options;
        let best = options.iter().max_by_key(|option| option.score);
        let worst = options.iter().min_by_key(|option| option.score);
        let option = match profile {
            DemoProfile::Strong => best,
            DemoProfile::Weak => worst,
            DemoProfile::Mixed => {
                if index % 2 == 0 {
                    best
                } else {
                    worst
                }
            }
        };
        let Some(option) = option else { continue };

        if let Some(set) = by_category
            .iter_mut()
            .find(|set| set.category == question.category)
        {
            set.responses.push(QuestionResponse {
                question_id: question.id.to_string(),
                answer: option.value.to_string(),
                score: option.score,
            });
        }
    }

    NewAssessmentSubmission {
        email: "demo@clearpathadvisory.example".to_string(),
        company_name: company.to_string(),
        contact_name: contact.to_string(),
        phone: None,
        source: "cli-demo".to_string(),
        marketing_consent: false,
        processing_consent: true,
        responses: by_category,
    }
}
