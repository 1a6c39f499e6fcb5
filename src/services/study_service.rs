use std::{num::NonZeroU32, sync::Arc};

use validator::Validate;

use crate::{
    auth::require_owner,
    errors::{AppError, AppResult},
    models::{
        domain::{Feedback, GradeResult, Quiz, QuizAttempt, StudySession},
        dto::{
            request::{FeedbackInput, GenerateStudyInput, SubmitAnswersInput, MAX_HISTORY_LIMIT},
            response::{ImprovementSuggestion, StudySessionSummaryDto, UserStatsDto},
        },
    },
    repositories::{FeedbackRepository, QuizAttemptRepository, StudySessionRepository},
    services::{
        model_service::{ModelClient, ModelError},
        prompt_builder::{
            build_explanation_prompt, build_improvement_prompt, build_quiz_prompt,
            build_summary_prompt, QuizRequest,
        },
        quiz_grading_service,
        quiz_response_parser::resolve_quiz,
    },
};

const DEFAULT_HISTORY_LIMIT: i64 = 10;

pub struct StudyService {
    model: Arc<dyn ModelClient>,
    sessions: Arc<dyn StudySessionRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    default_question_count: NonZeroU32,
}

impl StudyService {
    pub fn new(
        model: Arc<dyn ModelClient>,
        sessions: Arc<dyn StudySessionRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        default_question_count: NonZeroU32,
    ) -> Self {
        Self {
            model,
            sessions,
            feedback,
            attempts,
            default_question_count,
        }
    }

    /// Generates explanation, summary and quiz for a topic and stores them
    /// as a new session. Model failures end up inside the session, not as
    /// an error.
    pub async fn generate_study_materials(
        &self,
        user_id: &str,
        input: GenerateStudyInput,
    ) -> AppResult<StudySession> {
        input.validate()?;

        let topic = input.topic.trim();
        let level = input.learning_level();
        let question_count = input
            .question_count
            .and_then(NonZeroU32::new)
            .unwrap_or(self.default_question_count);

        log::info!(
            "Generating study materials on '{}' ({}, {} questions)",
            topic,
            level,
            question_count
        );

        let explanation_prompt = build_explanation_prompt(topic, level, input.context.as_deref());
        let (explanation, summary, quiz) = match self.model.complete(&explanation_prompt).await {
            Ok(explanation) => {
                let summary_prompt = build_summary_prompt(topic, &explanation, level);
                let quiz_prompt = build_quiz_prompt(
                    &QuizRequest::new(topic, level, &explanation).with_question_count(question_count),
                );

                let (summary, quiz_outcome) = tokio::join!(
                    self.model.complete(&summary_prompt),
                    self.model.complete(&quiz_prompt)
                );

                let summary = summary.unwrap_or_else(|e| artifact_error("summary", &e));
                (explanation, summary, resolve_quiz(quiz_outcome, topic))
            }
            Err(err) => {
                log::error!("Explanation generation for '{}' failed: {}", topic, err);
                (
                    artifact_error("explanation", &err),
                    artifact_error("summary", &err),
                    Quiz::from_invocation_failure(&err),
                )
            }
        };

        if let Some(error) = &quiz.generation_error {
            log::warn!("Quiz for '{}' degraded: {}", topic, error);
        }

        let session = StudySession::new(user_id, topic, level, explanation, summary, quiz);
        self.sessions.create(session).await
    }

    pub async fn get_session(&self, user_id: &str, session_id: &str) -> AppResult<StudySession> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Study session '{}' not found", session_id)))?;

        require_owner(user_id, &session.user_id)?;
        Ok(session)
    }

    pub async fn history(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> AppResult<Vec<StudySessionSummaryDto>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT);

        let sessions = self.sessions.list_recent_by_user(user_id, limit).await?;
        Ok(sessions.into_iter().map(StudySessionSummaryDto::from).collect())
    }

    /// Grades answers against the quiz stored with the session and records
    /// the attempt.
    pub async fn submit_answers(
        &self,
        user_id: &str,
        input: SubmitAnswersInput,
    ) -> AppResult<GradeResult> {
        input.validate()?;

        let session = self.get_session(user_id, &input.session_id).await?;
        let result = quiz_grading_service::grade(&session.quiz, &input.to_submission());

        self.attempts
            .create(QuizAttempt::from_grade(user_id, &session.id, &result))
            .await?;

        log::info!(
            "Graded session {}: {}/{} ({:.0}%)",
            session.id,
            result.correct_count,
            result.total_count,
            result.score_percent
        );
        Ok(result)
    }

    pub async fn list_attempts(&self, user_id: &str, session_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let session = self.get_session(user_id, session_id).await?;
        self.attempts.list_by_session(user_id, &session.id).await
    }

    pub async fn submit_feedback(&self, user_id: &str, input: FeedbackInput) -> AppResult<Feedback> {
        input.validate()?;

        let session = self.get_session(user_id, &input.session_id).await?;
        let feedback = Feedback::new(&session.id, user_id, input.rating, input.comment);
        self.feedback.create(feedback).await
    }

    pub async fn improve_from_feedback(
        &self,
        user_id: &str,
        session_id: &str,
        feedback: &str,
    ) -> AppResult<ImprovementSuggestion> {
        if feedback.trim().is_empty() {
            return Err(AppError::ValidationError("Feedback must not be blank".to_string()));
        }

        let session = self.get_session(user_id, session_id).await?;
        let prompt = build_improvement_prompt(&session.topic, feedback.trim());

        let suggestion = match self.model.complete(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                log::error!("Feedback processing for session {} failed: {}", session.id, err);
                format!("Error processing feedback: {}", err)
            }
        };

        Ok(ImprovementSuggestion {
            session_id: session.id,
            suggestion,
        })
    }

    pub async fn user_stats(&self, user_id: &str) -> AppResult<UserStatsDto> {
        let total_sessions = self.sessions.count_by_user(user_id).await?;
        let unique_topics = self.sessions.distinct_topics_by_user(user_id).await?.len() as u64;
        let attempts = self.attempts.stats_for_user(user_id).await?;

        Ok(UserStatsDto {
            total_sessions,
            unique_topics,
            total_attempts: attempts.total_attempts,
            average_score: attempts.average_score,
        })
    }
}

fn artifact_error(artifact: &str, err: &ModelError) -> String {
    format!("Error generating {}: {}", artifact, err)
}
