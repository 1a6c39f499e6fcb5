use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{DifficultyLevel, StudySession, User};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub learning_level: DifficultyLevel,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            username: user.username,
            learning_level: user.learning_level,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

/// History row; the full session is fetched by id.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct StudySessionSummaryDto {
    pub id: String,
    pub topic: String,
    pub learning_level: DifficultyLevel,
    pub question_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<StudySession> for StudySessionSummaryDto {
    fn from(session: StudySession) -> Self {
        StudySessionSummaryDto {
            id: session.id,
            topic: session.topic,
            learning_level: session.learning_level,
            question_count: session.quiz.len(),
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UserStatsDto {
    pub total_sessions: u64,
    pub unique_topics: u64,
    pub total_attempts: u64,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ExtractedMaterialDto {
    pub file_name: String,
    pub text: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ImprovementSuggestion {
    pub session_id: String,
    pub suggestion: String,
}
