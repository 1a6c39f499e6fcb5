use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::grade::{GradeResult, PerformanceBand};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct QuizAttempt {
    pub id: String,
    #[graphql(skip)]
    pub user_id: String,
    pub session_id: String,
    pub correct_count: usize,
    pub total_count: usize,
    pub score_percent: f64,
    pub band: PerformanceBand,
    pub submitted_at: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn from_grade(user_id: &str, session_id: &str, grade: &GradeResult) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            correct_count: grade.correct_count,
            total_count: grade.total_count,
            score_percent: grade.score_percent,
            band: grade.band,
            submitted_at: Utc::now(),
        }
    }
}

/// Aggregate over every attempt a user has submitted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttemptStats {
    pub total_attempts: u64,
    pub average_score: f64,
}

impl AttemptStats {
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let total: f64 = scores.iter().sum();
        AttemptStats {
            total_attempts: scores.len() as u64,
            average_score: total / scores.len() as f64,
        }
    }
}
