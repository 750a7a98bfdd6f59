//! Type classifier: 60 ratings → 4-letter code + per-pole percentages.
//!
//! Questions 1-15 score E/I, 16-30 S/N, 31-45 T/F, 46-60 J/P. Inside each
//! range odd ids feed the first pole and even ids the second.

use serde::Serialize;

use super::model::{
    AnswerSet, AxisPair, AxisPercentages, AxisScores, PersonalityType, Pole, QUESTIONS_PER_AXIS,
};

/// Classifier output for one questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub personality_type: PersonalityType,
    pub scores: AxisScores,
    pub percentages: AxisPercentages,
}

/// The pole a question contributes to, or `None` outside 1-60.
pub fn pole_for_question(question_id: u8) -> Option<Pole> {
    if question_id == 0 {
        return None;
    }
    let range = (question_id - 1) / QUESTIONS_PER_AXIS;
    let pair = *AxisPair::ALL.get(usize::from(range))?;
    let (first, second) = pair.poles();
    Some(if question_id % 2 == 1 { first } else { second })
}

/// Sum ratings into the eight pole accumulators.
pub fn calculate_scores(answers: &AnswerSet) -> AxisScores {
    let mut scores = AxisScores::default();
    for answer in answers.iter() {
        if let Some(pole) = pole_for_question(answer.question_id) {
            scores.add(pole, u32::from(answer.rating));
        }
    }
    scores
}

/// Majority pole per pair; ties go to E, S, T, J.
pub fn determine_type(scores: &AxisScores) -> PersonalityType {
    let poles = AxisPair::ALL.map(|pair| {
        let (first, second) = pair.poles();
        if scores.get(first) >= scores.get(second) {
            first
        } else {
            second
        }
    });
    PersonalityType::from_poles(poles)
}

/// round(100 × part / total), half away from zero, in integer arithmetic.
fn round_percent(part: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * u64::from(part) + u64::from(total)) / (2 * u64::from(total));
    rounded.min(100) as u8
}

/// Convert raw scores to display percentages, each pole rounded on its own.
pub fn to_percentages(scores: &AxisScores) -> AxisPercentages {
    let mut percentages = AxisPercentages::default();
    for pair in AxisPair::ALL {
        let total = scores.pair_total(pair);
        let (first, second) = pair.poles();
        percentages.set(first, round_percent(scores.get(first), total));
        percentages.set(second, round_percent(scores.get(second), total));
    }
    percentages
}

/// Classify a complete answer set.
pub fn classify(answers: &AnswerSet) -> Classification {
    let scores = calculate_scores(answers);
    Classification {
        personality_type: determine_type(&scores),
        scores,
        percentages: to_percentages(&scores),
    }
}
