use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{difficulty::DifficultyLevel, quiz::Quiz};

/// One generation run: the explanation, summary and quiz produced for a topic.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct StudySession {
    pub id: String,
    #[graphql(skip)]
    pub user_id: String,
    pub topic: String,
    pub learning_level: DifficultyLevel,
    pub explanation: String,
    pub summary: String,
    pub quiz: Quiz,
    pub created_at: DateTime<Utc>,
}

impl StudySession {
    pub fn new(
        user_id: &str,
        topic: &str,
        learning_level: DifficultyLevel,
        explanation: String,
        summary: String,
        quiz: Quiz,
    ) -> Self {
        StudySession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            topic: topic.to_string(),
            learning_level,
            explanation,
            summary,
            quiz,
            created_at: Utc::now(),
        }
    }
}
