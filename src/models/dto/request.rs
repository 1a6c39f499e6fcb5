use async_graphql::InputObject;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::domain::{AnswerSubmission, DifficultyLevel};

pub const MAX_QUESTION_COUNT: u32 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 50;

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    #[serde(default)]
    pub learning_level: Option<String>,
}

impl SignupRequest {
    pub fn learning_level(&self) -> DifficultyLevel {
        self.learning_level
            .as_deref()
            .map(DifficultyLevel::parse_or_default)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct GenerateStudyInput {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub topic: String,

    /// Free-form label; anything unrecognised is treated as Beginner.
    pub learning_level: Option<String>,

    /// Text extracted from uploaded material.
    pub context: Option<String>,

    #[validate(range(min = 1, max = 20))]
    pub question_count: Option<u32>,
}

impl GenerateStudyInput {
    pub fn learning_level(&self) -> DifficultyLevel {
        self.learning_level
            .as_deref()
            .map(DifficultyLevel::parse_or_default)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct AnswerInput {
    pub question_index: u32,
    #[validate(length(max = 8))]
    pub letter: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitAnswersInput {
    #[validate(length(min = 1))]
    pub session_id: String,

    #[validate(nested)]
    pub answers: Vec<AnswerInput>,
}

impl SubmitAnswersInput {
    /// Later entries for the same question replace earlier ones.
    pub fn to_submission(&self) -> AnswerSubmission {
        self.answers
            .iter()
            .map(|answer| (answer.question_index as usize, answer.letter.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct FeedbackInput {
    #[validate(length(min = 1))]
    pub session_id: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,

    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractParams {
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, password: &str, confirm: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            learning_level: None,
        }
    }

    #[test]
    fn test_valid_signup_request() {
        assert!(signup("alice", "password123", "password123").validate().is_ok());
    }

    #[test]
    fn test_signup_password_mismatch() {
        assert!(signup("alice", "password123", "password124").validate().is_err());
    }

    #[test]
    fn test_signup_username_too_short() {
        assert!(signup("al", "password123", "password123").validate().is_err());
    }

    #[test]
    fn test_signup_learning_level_defaults_to_beginner() {
        let mut request = signup("alice", "password123", "password123");
        assert_eq!(request.learning_level(), DifficultyLevel::Beginner);

        request.learning_level = Some("advanced".to_string());
        assert_eq!(request.learning_level(), DifficultyLevel::Advanced);
    }

    #[test]
    fn test_generate_input_rejects_blank_topic_and_bad_count() {
        let mut input = GenerateStudyInput {
            topic: "   ".to_string(),
            learning_level: None,
            context: None,
            question_count: Some(5),
        };
        assert!(input.validate().is_err());

        input.topic = "Photosynthesis".to_string();
        assert!(input.validate().is_ok());

        input.question_count = Some(0);
        assert!(input.validate().is_err());

        input.question_count = Some(MAX_QUESTION_COUNT + 1);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_feedback_rating_range() {
        let mut input = FeedbackInput {
            session_id: "s-1".to_string(),
            rating: 5,
            comment: None,
        };
        assert!(input.validate().is_ok());

        input.rating = 0;
        assert!(input.validate().is_err());

        input.rating = 6;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_submit_answers_builds_sparse_submission() {
        let input = SubmitAnswersInput {
            session_id: "s-1".to_string(),
            answers: vec![
                AnswerInput {
                    question_index: 0,
                    letter: "A".to_string(),
                },
                AnswerInput {
                    question_index: 2,
                    letter: "C".to_string(),
                },
                AnswerInput {
                    question_index: 0,
                    letter: "B".to_string(),
                },
            ],
        };

        let submission = input.to_submission();
        assert_eq!(submission.get(0), Some("B"));
        assert_eq!(submission.get(1), None);
        assert_eq!(submission.get(2), Some("C"));
    }
}
