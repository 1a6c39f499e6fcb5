use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{AttemptStats, Feedback, QuizAttempt, StudySession, User},
    repositories::{
        FeedbackRepository, QuizAttemptRepository, StudySessionRepository, UserRepository,
    },
};

pub mod fixtures {
    pub const TWO_PLUS_TWO_REPLY: &str = "Here you go:\n```json\n{\"questions\":[{\"question\":\"2+2?\",\"options\":[\"A) 3\",\"B) 4\",\"C) 5\",\"D) 6\"],\"correct_answer\":\"B\",\"explanation\":\"basic arithmetic\"}]}\n```";

    pub const REFUSAL_REPLY: &str = "I cannot comply with that request.";
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::AlreadyExists(user.username));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStudySessionRepository {
    sessions: Arc<RwLock<Vec<StudySession>>>,
}

#[async_trait]
impl StudySessionRepository for InMemoryStudySessionRepository {
    async fn create(&self, session: StudySession) -> AppResult<StudySession> {
        self.sessions.write().await.push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<StudySession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_recent_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<StudySession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        let sessions = self.sessions.read().await;
        Ok(sessions.iter().filter(|s| s.user_id == user_id).count() as u64)
    }

    async fn distinct_topics_by_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        let sessions = self.sessions.read().await;
        let mut topics: Vec<String> = sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.topic.clone())
            .collect();
        topics.sort();
        topics.dedup();
        Ok(topics)
    }
}

#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    feedback: Arc<RwLock<Vec<Feedback>>>,
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn create(&self, feedback: Feedback) -> AppResult<Feedback> {
        self.feedback.write().await.push(feedback.clone());
        Ok(feedback)
    }

    async fn list_by_session(&self, session_id: &str) -> AppResult<Vec<Feedback>> {
        let feedback = self.feedback.read().await;
        Ok(feedback
            .iter()
            .filter(|f| f.session_id == session_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: Arc<RwLock<Vec<QuizAttempt>>>,
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.attempts.write().await.push(attempt.clone());
        Ok(attempt)
    }

    async fn list_by_session(&self, user_id: &str, session_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id && a.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn stats_for_user(&self, user_id: &str) -> AppResult<AttemptStats> {
        let attempts = self.attempts.read().await;
        let scores: Vec<f64> = attempts
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.score_percent)
            .collect();
        Ok(AttemptStats::from_scores(&scores))
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_users_enforce_unique_username() {
        let repo = InMemoryUserRepository::default();
        repo.create(User::test_user("alice")).await.expect("first insert");

        let duplicate = repo.create(User::test_user("alice")).await;
        assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));
    }
}
