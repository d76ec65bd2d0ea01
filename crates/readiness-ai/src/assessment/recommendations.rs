//! Derives prioritized recommendation text and benchmark context from
//! category scores. Guidance text is a static category-by-level table with a
//! generic fallback for categories the table does not cover.

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{BenchmarkData, Category, MarketPosition, Priority, ReadinessLevel};

/// Fixed reference points for the benchmark comparison.
pub const INDUSTRY_AVERAGE: u8 = 62;
pub const TOP_PERFORMERS: u8 = 85;

/// One per-category block of the generated report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSection {
    pub category: Category,
    pub score: u8,
    pub level: ReadinessLevel,
    pub priority: Priority,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Builds one section per scored category, sorted ascending by score so the
/// most urgent category comes first. Ties break on canonical category order,
/// keeping the output independent of map iteration order.
pub fn generate_recommendations(
    category_scores: &BTreeMap<Category, u8>,
) -> Vec<RecommendationSection> {
    let mut sections: Vec<RecommendationSection> = category_scores
        .iter()
        .map(|(&category, &score)| {
            let level = ReadinessLevel::from_score(score);
            let (recommendations, next_steps) = guidance(category, level);
            RecommendationSection {
                category,
                score,
                level,
                priority: Priority::from_score(score),
                recommendations,
                next_steps,
            }
        })
        .collect();

    sections.sort_by(|a, b| a.score.cmp(&b.score).then(a.category.cmp(&b.category)));
    sections
}

/// Benchmark comparison against the fixed industry references, with a
/// ten-point band on either side of the average counting as "average".
pub fn generate_benchmarks(overall_score: u8) -> BenchmarkData {
    let position = if overall_score >= TOP_PERFORMERS {
        MarketPosition::TopQuartile
    } else if overall_score > INDUSTRY_AVERAGE + 10 {
        MarketPosition::AboveAverage
    } else if overall_score + 10 >= INDUSTRY_AVERAGE {
        MarketPosition::Average
    } else {
        MarketPosition::BelowAverage
    };

    BenchmarkData {
        industry_average: INDUSTRY_AVERAGE,
        top_performers: TOP_PERFORMERS,
        position,
    }
}

const FALLBACK_RECOMMENDATIONS: [&str; 3] = [
    "Benchmark current capabilities in this area against peers in your industry.",
    "Identify one high-impact improvement and assign a clear owner.",
    "Review progress quarterly and adjust investment accordingly.",
];

const FALLBACK_NEXT_STEPS: [&str; 3] = [
    "Run a focused discovery workshop with the teams involved.",
    "Document the current state and the top three gaps.",
    "Define a 90-day improvement target.",
];

fn guidance(category: Category, level: ReadinessLevel) -> (Vec<String>, Vec<String>) {
    let entry = match (category, level) {
        (Category::Strategy, ReadinessLevel::Excellent) => Some((
            &[
                "Extend your AI strategy into adjacent business units.",
                "Formalize a portfolio review cadence for AI initiatives.",
            ][..],
            &[
                "Publish an internal AI investment thesis.",
                "Set expansion targets for the next two quarters.",
            ][..],
        )),
        (Category::Strategy, ReadinessLevel::Good) => Some((
            &[
                "Tie every AI initiative to a measurable business outcome.",
                "Close the gap between strategy documents and funded roadmaps.",
            ][..],
            &[
                "Assign executive sponsors to each workstream.",
                "Define success metrics before the next planning cycle.",
            ][..],
        )),
        (Category::Strategy, ReadinessLevel::Fair) => Some((
            &[
                "Draft a one-page AI strategy with explicit business priorities.",
                "Select two candidate use cases with clear ROI potential.",
            ][..],
            &[
                "Hold a leadership alignment session on AI priorities.",
                "Budget a discovery phase for the top use case.",
            ][..],
        )),
        (Category::Strategy, ReadinessLevel::Poor) => Some((
            &[
                "Start with education: leadership needs a shared view of what AI can and cannot do.",
                "Anchor any AI discussion to a concrete business problem, not the technology.",
            ][..],
            &[
                "Schedule an executive AI briefing.",
                "Inventory the processes where manual effort dominates cost.",
            ][..],
        )),
        (Category::Data, ReadinessLevel::Excellent) => Some((
            &[
                "Operationalize data quality monitoring with alerting.",
                "Expose curated datasets for self-serve experimentation.",
            ][..],
            &[
                "Stand up data contracts for the most-used pipelines.",
                "Review access policies for new AI workloads.",
            ][..],
        )),
        (Category::Data, ReadinessLevel::Good) => Some((
            &[
                "Consolidate scattered sources into your central warehouse.",
                "Introduce ownership for the datasets AI projects depend on.",
            ][..],
            &[
                "Name data stewards for the top five datasets.",
                "Automate the most error-prone ingestion path.",
            ][..],
        )),
        (Category::Data, ReadinessLevel::Fair) => Some((
            &[
                "Audit data quality in the systems your first AI use case needs.",
                "Establish a single source of truth for customer and product data.",
            ][..],
            &[
                "Run a data quality assessment on two core systems.",
                "Pick a warehouse or lakehouse platform and migrate one domain.",
            ][..],
        )),
        (Category::Data, ReadinessLevel::Poor) => Some((
            &[
                "Begin with basic data hygiene: dedupe, standardize, and centralize.",
                "Treat data collection gaps as the first blocker to any AI effort.",
            ][..],
            &[
                "List the systems of record and their owners.",
                "Fix the highest-volume data entry quality issue.",
            ][..],
        )),
        (Category::Technology, ReadinessLevel::Excellent) => Some((
            &[
                "Standardize your model deployment path to cut iteration time.",
                "Evaluate build-versus-buy for the next platform capability.",
            ][..],
            &[
                "Document the golden path for shipping a model to production.",
                "Pilot one managed AI service against your in-house equivalent.",
            ][..],
        )),
        (Category::Technology, ReadinessLevel::Good) => Some((
            &[
                "Close integration gaps so AI services can reach production systems.",
                "Introduce environment parity between experimentation and production.",
            ][..],
            &[
                "Add API access to the two systems AI pilots need most.",
                "Containerize the current experimentation stack.",
            ][..],
        )),
        (Category::Technology, ReadinessLevel::Fair) => Some((
            &[
                "Adopt managed AI services before building custom platforms.",
                "Modernize the integration layer ahead of your first pilot.",
            ][..],
            &[
                "Shortlist managed services for your top use case.",
                "Stand up a sandbox environment with production-like data.",
            ][..],
        )),
        (Category::Technology, ReadinessLevel::Poor) => Some((
            &[
                "Address foundational tooling first; AI layers poorly over brittle systems.",
                "Favor off-the-shelf AI features in software you already own.",
            ][..],
            &[
                "Map current systems and their integration points.",
                "Enable AI features already included in existing vendor contracts.",
            ][..],
        )),
        (Category::Talent, ReadinessLevel::Excellent) => Some((
            &[
                "Create internal mobility paths into AI-focused roles.",
                "Capture and share delivery playbooks from your experienced teams.",
            ][..],
            &[
                "Launch an internal AI guild or community of practice.",
                "Rotate one engineer per quarter through the AI team.",
            ][..],
        )),
        (Category::Talent, ReadinessLevel::Good) => Some((
            &[
                "Deepen hands-on skills with project-based upskilling.",
                "Pair domain experts with technical staff on every pilot.",
            ][..],
            &[
                "Fund certifications for two practitioners this quarter.",
                "Embed a domain expert in the next AI pilot team.",
            ][..],
        )),
        (Category::Talent, ReadinessLevel::Fair) => Some((
            &[
                "Build a small nucleus of AI capability before scaling headcount.",
                "Use external partners to accelerate while internal skills grow.",
            ][..],
            &[
                "Define the first AI-capable role and hire or train for it.",
                "Set up a structured training budget.",
            ][..],
        )),
        (Category::Talent, ReadinessLevel::Poor) => Some((
            &[
                "Start with awareness training across the teams AI will touch.",
                "Lean on vendors and consultants for early delivery capacity.",
            ][..],
            &[
                "Enroll key staff in an AI fundamentals course.",
                "Identify one internal champion per department.",
            ][..],
        )),
        // Remaining categories use the generic fallback.
        _ => None,
    };

    match entry {
        Some((recommendations, next_steps)) => (
            recommendations.iter().map(|s| (*s).to_string()).collect(),
            next_steps.iter().map(|s| (*s).to_string()).collect(),
        ),
        None => (
            FALLBACK_RECOMMENDATIONS.iter().map(|s| (*s).to_string()).collect(),
            FALLBACK_NEXT_STEPS.iter().map(|s| (*s).to_string()).collect(),
        ),
    }
}
