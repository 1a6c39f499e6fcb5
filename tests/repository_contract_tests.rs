use std::{collections::HashMap, num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use study_assistant_server::{
    auth::JwtService,
    errors::{AppError, AppResult},
    models::{
        domain::{
            AttemptStats, DifficultyLevel, Feedback, GenerationErrorKind, PerformanceBand,
            QuizAttempt, StudySession, User,
        },
        dto::request::{
            AnswerInput, FeedbackInput, GenerateStudyInput, LoginRequest, SignupRequest,
            SubmitAnswersInput,
        },
    },
    repositories::{
        FeedbackRepository, QuizAttemptRepository, StudySessionRepository, UserRepository,
    },
    services::{
        model_service::{ModelClient, ModelError},
        study_service::StudyService,
        user_service::UserService,
    },
};

const QUIZ_REPLY: &str = r#"```json
{"questions":[{"question":"2+2?","options":["A) 3","B) 4","C) 5","D) 6"],"correct_answer":"B","explanation":"basic arithmetic"}]}
```"#;

/// Answers quiz prompts with a fixed payload and everything else with prose.
struct ScriptedModel {
    quiz_reply: Option<&'static str>,
    fail: bool,
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        if self.fail {
            return Err(ModelError::Api("connection refused".to_string()));
        }
        if prompt.contains("multiple choice quiz") {
            return Ok(self.quiz_reply.unwrap_or(QUIZ_REPLY).to_string());
        }
        Ok("Addition combines two numbers.".to_string())
    }
}

#[derive(Default)]
struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::AlreadyExists(format!(
                "User '{}' already exists",
                user.username
            )));
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
struct InMemoryStudySessionRepository {
    sessions: RwLock<Vec<StudySession>>,
}

#[async_trait]
impl StudySessionRepository for InMemoryStudySessionRepository {
    async fn create(&self, session: StudySession) -> AppResult<StudySession> {
        self.sessions.write().await.push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<StudySession>> {
        Ok(self.sessions.read().await.iter().find(|s| s.id == id).cloned())
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
struct InMemoryFeedbackRepository {
    feedback: RwLock<Vec<Feedback>>,
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn create(&self, feedback: Feedback) -> AppResult<Feedback> {
        self.feedback.write().await.push(feedback.clone());
        Ok(feedback)
    }

    async fn list_by_session(&self, session_id: &str) -> AppResult<Vec<Feedback>> {
        let feedback = self.feedback.read().await;
        Ok(feedback.iter().filter(|f| f.session_id == session_id).cloned().collect())
    }
}

#[derive(Default)]
struct InMemoryQuizAttemptRepository {
    attempts: RwLock<Vec<QuizAttempt>>,
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

struct Harness {
    study: StudyService,
    feedback: Arc<InMemoryFeedbackRepository>,
}

fn harness(model: ScriptedModel) -> Harness {
    let feedback = Arc::new(InMemoryFeedbackRepository::default());
    let study = StudyService::new(
        Arc::new(model),
        Arc::new(InMemoryStudySessionRepository::default()),
        feedback.clone(),
        Arc::new(InMemoryQuizAttemptRepository::default()),
        NonZeroU32::MIN,
    );
    Harness { study, feedback }
}

fn working_model() -> ScriptedModel {
    ScriptedModel {
        quiz_reply: None,
        fail: false,
    }
}

fn generate_input(topic: &str) -> GenerateStudyInput {
    GenerateStudyInput {
        topic: topic.to_string(),
        learning_level: Some("intermediate".to_string()),
        context: None,
        question_count: Some(1),
    }
}

fn answers(session_id: &str, letter: &str) -> SubmitAnswersInput {
    SubmitAnswersInput {
        session_id: session_id.to_string(),
        answers: vec![AnswerInput {
            question_index: 0,
            letter: letter.to_string(),
        }],
    }
}

#[tokio::test]
async fn signup_login_and_duplicate_contract() {
    let jwt = JwtService::new(&SecretString::from("contract-test-secret".to_string()), 1);
    let users = UserService::new(Arc::new(InMemoryUserRepository::default()), jwt.clone());

    let signup = || SignupRequest {
        username: "student".to_string(),
        password: "password123".to_string(),
        confirm_password: "password123".to_string(),
        learning_level: Some("advanced".to_string()),
    };

    let user = users.signup(signup()).await.expect("signup");
    assert_eq!(user.learning_level, DifficultyLevel::Advanced);

    let duplicate = users.signup(signup()).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let auth = users
        .login(LoginRequest {
            username: "student".to_string(),
            password: "password123".to_string(),
        })
        .await
        .expect("login");
    assert_eq!(jwt.validate_token(&auth.token).expect("token").sub, user.id);

    let rejected = users
        .login(LoginRequest {
            username: "student".to_string(),
            password: "wrong-password".to_string(),
        })
        .await;
    assert!(matches!(rejected, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn generate_grade_and_stats() {
    let h = harness(working_model());

    let session = h
        .study
        .generate_study_materials("user-1", generate_input("Arithmetic"))
        .await
        .expect("generate");
    assert_eq!(session.learning_level, DifficultyLevel::Intermediate);
    assert_eq!(session.explanation, "Addition combines two numbers.");
    assert_eq!(session.quiz.len(), 1);
    assert!(session.quiz.generation_error.is_none());

    let perfect = h.study.submit_answers("user-1", answers(&session.id, "b")).await.expect("grade");
    assert_eq!(perfect.score_percent, 100.0);
    assert_eq!(perfect.band, PerformanceBand::Excellent);

    let miss = h.study.submit_answers("user-1", answers(&session.id, "A")).await.expect("grade");
    assert_eq!(miss.score_percent, 0.0);
    assert_eq!(miss.band, PerformanceBand::NeedsReview);

    let attempts = h.study.list_attempts("user-1", &session.id).await.expect("attempts");
    assert_eq!(attempts.len(), 2);

    let stats = h.study.user_stats("user-1").await.expect("stats");
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.unique_topics, 1);
    assert_eq!(stats.total_attempts, 2);
    assert_eq!(stats.average_score, 50.0);
}

#[tokio::test]
async fn sessions_are_private_to_their_owner() {
    let h = harness(working_model());
    let session = h
        .study
        .generate_study_materials("owner", generate_input("Cells"))
        .await
        .expect("generate");

    let foreign = h.study.get_session("intruder", &session.id).await;
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));

    let missing = h.study.get_session("owner", "no-such-session").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let grading = h.study.submit_answers("intruder", answers(&session.id, "B")).await;
    assert!(matches!(grading, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn refusal_reply_is_stored_as_fallback_quiz() {
    let h = harness(ScriptedModel {
        quiz_reply: Some("I cannot comply with that request."),
        fail: false,
    });

    let session = h
        .study
        .generate_study_materials("user-1", generate_input("Photosynthesis"))
        .await
        .expect("generate");

    assert_eq!(session.quiz.len(), 1);
    assert_eq!(session.quiz.error_kind(), Some(GenerationErrorKind::MalformedPayload));
}

#[tokio::test]
async fn model_outage_is_recorded_not_raised() {
    let h = harness(ScriptedModel {
        quiz_reply: None,
        fail: true,
    });

    let session = h
        .study
        .generate_study_materials("user-1", generate_input("Gravity"))
        .await
        .expect("generation still yields a session");

    assert!(session.quiz.is_empty());
    assert_eq!(session.quiz.error_kind(), Some(GenerationErrorKind::InvocationFailed));
    assert!(session.explanation.contains("connection refused"));

    let result = h.study.submit_answers("user-1", answers(&session.id, "A")).await.expect("grade");
    assert_eq!(result.total_count, 0);
    assert_eq!(result.score_percent, 0.0);

    let suggestion = h
        .study
        .improve_from_feedback("user-1", &session.id, "Too short")
        .await
        .expect("suggestion");
    assert!(suggestion.suggestion.starts_with("Error processing feedback:"));
}

#[tokio::test]
async fn history_is_newest_first_and_clamped() {
    let h = harness(working_model());
    for topic in ["First", "Second", "Third"] {
        h.study
            .generate_study_materials("user-1", generate_input(topic))
            .await
            .expect("generate");
    }

    let history = h.study.history("user-1", None).await.expect("history");
    let topics: Vec<&str> = history.iter().map(|s| s.topic.as_str()).collect();
    assert_eq!(topics, vec!["Third", "Second", "First"]);

    let one = h.study.history("user-1", Some(0)).await.expect("history");
    assert_eq!(one.len(), 1);

    assert!(h.study.history("someone-else", None).await.expect("history").is_empty());
}

#[tokio::test]
async fn feedback_is_validated_and_stored() {
    let h = harness(working_model());
    let session = h
        .study
        .generate_study_materials("user-1", generate_input("Tides"))
        .await
        .expect("generate");

    let out_of_range = h
        .study
        .submit_feedback(
            "user-1",
            FeedbackInput {
                session_id: session.id.clone(),
                rating: 6,
                comment: None,
            },
        )
        .await;
    assert!(matches!(out_of_range, Err(AppError::ValidationError(_))));

    let stored = h
        .study
        .submit_feedback(
            "user-1",
            FeedbackInput {
                session_id: session.id.clone(),
                rating: 4,
                comment: Some("Clear examples".to_string()),
            },
        )
        .await
        .expect("feedback");
    assert_eq!(stored.rating, 4);

    let listed = h.feedback.list_by_session(&session.id).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].comment.as_deref(), Some("Clear examples"));

    let blank = h.study.improve_from_feedback("user-1", &session.id, "   ").await;
    assert!(matches!(blank, Err(AppError::ValidationError(_))));
}
