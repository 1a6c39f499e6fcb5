use std::collections::BTreeMap;

use async_graphql::{Enum, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz::OptionLetter;

pub const EXCELLENT_THRESHOLD: f64 = 80.0;
pub const GOOD_THRESHOLD: f64 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
pub enum PerformanceBand {
    Excellent,
    Good,
    NeedsReview,
}

impl PerformanceBand {
    /// Lower bounds are inclusive: 80 is Excellent, 60 is Good.
    pub fn from_score(score_percent: f64) -> Self {
        if score_percent >= EXCELLENT_THRESHOLD {
            PerformanceBand::Excellent
        } else if score_percent >= GOOD_THRESHOLD {
            PerformanceBand::Good
        } else {
            PerformanceBand::NeedsReview
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent work! You've mastered this topic!",
            PerformanceBand::Good => "Good job! Review the explanations and try again to improve.",
            PerformanceBand::NeedsReview => "Keep studying! Review the material and try again.",
        }
    }
}

/// Answers selected so far for the quiz currently on screen, keyed by
/// 0-based question index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerSubmission {
    answers: BTreeMap<usize, String>,
}

impl AnswerSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the answer for one question.
    pub fn record(&mut self, index: usize, letter: impl Into<String>) {
        self.answers.insert(index, letter.into());
    }

    pub fn with_answer(mut self, index: usize, letter: impl Into<String>) -> Self {
        self.record(index, letter);
        self
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(usize, String)> for AnswerSubmission {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct QuestionGrade {
    pub index: usize,
    pub correct: bool,
    pub submitted_letter: Option<String>,
    pub correct_letter: OptionLetter,
    pub rationale: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct GradeResult {
    pub per_question: Vec<QuestionGrade>,
    pub correct_count: usize,
    pub total_count: usize,
    pub score_percent: f64,
    pub band: PerformanceBand,
}
