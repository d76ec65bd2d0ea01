//! Pure scoring engine turning raw answer sets into category and overall
//! readiness scores.

use std::collections::BTreeMap;

use super::catalog;
use super::domain::{Category, CategoryResponses, QuestionResponse};

/// Weighted average of the answered catalog questions in one category,
/// rounded to an integer in [0, 100].
///
/// A catalog question with no matching response contributes neither score
/// nor weight, so partially answered submissions are averaged over what was
/// actually answered rather than penalized for missing weight mass. Returns
/// 0 when nothing in the category was answered.
pub fn calculate_category_score(responses: &[CategoryResponses], category: Category) -> u8 {
    let answered: Vec<&QuestionResponse> = responses
        .iter()
        .filter(|set| set.category == category)
        .flat_map(|set| set.responses.iter())
        .collect();

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for question in catalog::questions_for(category) {
        if let Some(response) = answered.iter().find(|r| r.question_id == question.id) {
            weighted_sum += f64::from(response.score) * question.weight;
            total_weight += question.weight;
        }
    }

    if total_weight == 0.0 {
        0
    } else {
        (weighted_sum / total_weight).round() as u8
    }
}

/// Weighted average over whichever categories carry a score, renormalized
/// so absent categories contribute nothing to either side of the division.
/// Returns 0 when no categories are scored.
pub fn calculate_overall_score(category_scores: &BTreeMap<Category, u8>) -> u8 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (category, score) in category_scores {
        weighted_sum += f64::from(*score) * category.weight();
        total_weight += category.weight();
    }

    if total_weight == 0.0 {
        0
    } else {
        (weighted_sum / total_weight).round() as u8
    }
}

/// Category scores for every category present in the answer set.
pub fn score_all_categories(responses: &[CategoryResponses]) -> BTreeMap<Category, u8> {
    let mut scores = BTreeMap::new();
    for set in responses {
        scores
            .entry(set.category)
            .or_insert_with(|| calculate_category_score(responses, set.category));
    }
    scores
}
