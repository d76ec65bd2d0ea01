//! Static assessment question catalog.
//!
//! The scoring engine trusts these definitions: option scores stay within
//! 0..=100 and weights are non-negative, so computed scores stay in range
//! without explicit clamping.

use super::domain::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice,
    Scale,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOption {
    pub value: &'static str,
    pub label: &'static str,
    pub score: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct AssessmentQuestion {
    pub id: &'static str,
    pub category: Category,
    pub question: &'static str,
    pub kind: QuestionKind,
    pub options: &'static [AnswerOption],
    pub weight: f64,
    pub description: Option<&'static str>,
}

const MATURITY_OPTIONS: &[AnswerOption] = &[
    AnswerOption { value: "none", label: "No activity yet", score: 0 },
    AnswerOption { value: "exploring", label: "Exploring options", score: 25 },
    AnswerOption { value: "defined", label: "Defined but not started", score: 50 },
    AnswerOption { value: "piloting", label: "Piloting in one area", score: 75 },
    AnswerOption { value: "executing", label: "Executing at scale", score: 100 },
];

const SCALE_OPTIONS: &[AnswerOption] = &[
    AnswerOption { value: "1", label: "1 - Not at all", score: 0 },
    AnswerOption { value: "2", label: "2 - Early", score: 25 },
    AnswerOption { value: "3", label: "3 - Developing", score: 50 },
    AnswerOption { value: "4", label: "4 - Established", score: 75 },
    AnswerOption { value: "5", label: "5 - Leading", score: 100 },
];

const YES_NO_OPTIONS: &[AnswerOption] = &[
    AnswerOption { value: "yes", label: "Yes", score: 100 },
    AnswerOption { value: "no", label: "No", score: 0 },
];

static CATALOG: [AssessmentQuestion; 16] = [
    AssessmentQuestion {
        id: "strategy-1",
        category: Category::Strategy,
        question: "How far along is your organization's AI strategy?",
        kind: QuestionKind::MultipleChoice,
        options: MATURITY_OPTIONS,
        weight: 2.0,
        description: Some("Covers vision, funded roadmap, and executive sponsorship."),
    },
    AssessmentQuestion {
        id: "strategy-2",
        category: Category::Strategy,
        question: "Are AI initiatives tied to measurable business outcomes?",
        kind: QuestionKind::Scale,
        options: SCALE_OPTIONS,
        weight: 1.0,
        description: None,
    },
    AssessmentQuestion {
        id: "data-1",
        category: Category::Data,
        question: "How would you rate the quality and accessibility of your data?",
        kind: QuestionKind::Scale,
        options: SCALE_OPTIONS,
        weight: 2.0,
        description: Some("Considers completeness, freshness, and self-serve access."),
    },
    AssessmentQuestion {
        id: "data-2",
        category: Category::Data,
        question: "Do you maintain a central data catalog or warehouse?",
        kind: QuestionKind::Boolean,
        options: YES_NO_OPTIONS,
        weight: 1.0,
        description: None,
    },
    AssessmentQuestion {
        id: "technology-1",
        category: Category::Technology,
        question: "How mature is your machine learning tooling and platform?",
        kind: QuestionKind::MultipleChoice,
        options: MATURITY_OPTIONS,
        weight: 1.5,
        description: None,
    },
    AssessmentQuestion {
        id: "technology-2",
        category: Category::Technology,
        question: "Can your systems integrate with external AI services via APIs?",
        kind: QuestionKind::Boolean,
        options: YES_NO_OPTIONS,
        weight: 1.0,
        description: None,
    },
    AssessmentQuestion {
        id: "talent-1",
        category: Category::Talent,
        question: "Does your team include people with hands-on AI/ML experience?",
        kind: QuestionKind::Scale,
        options: SCALE_OPTIONS,
        weight: 1.5,
        description: None,
    },
    AssessmentQuestion {
        id: "talent-2",
        category: Category::Talent,
        question: "Is there a budget for AI upskilling and training?",
        kind: QuestionKind::Boolean,
        options: YES_NO_OPTIONS,
        weight: 1.0,
        description: None,
    },
    AssessmentQuestion {
        id: "governance-1",
        category: Category::Governance,
        question: "How developed are your AI governance and risk policies?",
        kind: QuestionKind::MultipleChoice,
        options: MATURITY_OPTIONS,
        weight: 1.5,
        description: Some("Model review, privacy, and responsible-use guidelines."),
    },
    AssessmentQuestion {
        id: "governance-2",
        category: Category::Governance,
        question: "Is there a named owner for AI compliance?",
        kind: QuestionKind::Boolean,
        options: YES_NO_OPTIONS,
        weight: 1.0,
        description: None,
    },
    AssessmentQuestion {
        id: "culture-1",
        category: Category::Culture,
        question: "How receptive is your organization to AI-driven change?",
        kind: QuestionKind::Scale,
        options: SCALE_OPTIONS,
        weight: 1.5,
        description: None,
    },
    AssessmentQuestion {
        id: "culture-2",
        category: Category::Culture,
        question: "Do leaders actively champion AI experiments?",
        kind: QuestionKind::Boolean,
        options: YES_NO_OPTIONS,
        weight: 1.0,
        description: None,
    },
    AssessmentQuestion {
        id: "processes-1",
        category: Category::Processes,
        question: "Are your core business processes documented and repeatable?",
        kind: QuestionKind::Scale,
        options: SCALE_OPTIONS,
        weight: 1.0,
        description: None,
    },
    AssessmentQuestion {
        id: "processes-2",
        category: Category::Processes,
        question: "Have you already automated any manual workflows?",
        kind: QuestionKind::Boolean,
        options: YES_NO_OPTIONS,
        weight: 1.0,
        description: None,
    },
    AssessmentQuestion {
        id: "infrastructure-1",
        category: Category::Infrastructure,
        question: "How would you describe your compute and hosting footprint?",
        kind: QuestionKind::MultipleChoice,
        options: MATURITY_OPTIONS,
        weight: 1.0,
        description: Some("Cloud adoption, scalability, and environment parity."),
    },
    AssessmentQuestion {
        id: "infrastructure-2",
        category: Category::Infrastructure,
        question: "Can you provision new environments in under a day?",
        kind: QuestionKind::Boolean,
        options: YES_NO_OPTIONS,
        weight: 1.0,
        description: None,
    },
];

pub fn question_catalog() -> &'static [AssessmentQuestion] {
    &CATALOG
}

/// Questions belonging to one category, in catalog order.
pub fn questions_for(category: Category) -> impl Iterator<Item = &'static AssessmentQuestion> {
    CATALOG.iter().filter(move |q| q.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_questions() {
        for category in Category::ordered() {
            assert!(
                questions_for(category).count() >= 1,
                "{} has no catalog questions",
                category.label()
            );
        }
    }

    #[test]
    fn question_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for question in question_catalog() {
            assert!(seen.insert(question.id), "duplicate question id {}", question.id);
        }
    }

    #[test]
    fn option_scores_stay_in_range() {
        for question in question_catalog() {
            assert!(question.weight >= 0.0);
            for option in question.options {
                assert!(option.score <= 100);
            }
        }
    }
}
