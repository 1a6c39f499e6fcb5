use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::difficulty::DifficultyLevel;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub password_salt: String,
    pub learning_level: DifficultyLevel,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a new account; the caller supplies an already salted hash.
    pub fn new(
        username: &str,
        password_hash: String,
        password_salt: String,
        learning_level: DifficultyLevel,
    ) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash,
            password_salt,
            learning_level,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(username: &str) -> Self {
        User::new(
            username,
            "hash".to_string(),
            "salt".to_string(),
            DifficultyLevel::Beginner,
        )
    }
}
