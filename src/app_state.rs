use std::{num::NonZeroU32, sync::Arc};

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::{AppError, AppResult},
    repositories::{
        MongoFeedbackRepository, MongoQuizAttemptRepository, MongoStudySessionRepository,
        MongoUserRepository, UserRepository,
    },
    services::{
        content_processor::ContentProcessor,
        model_service::{ModelClient, OpenAiModelClient},
        study_service::StudyService,
        user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub study_service: Arc<StudyService>,
    pub content_processor: Arc<ContentProcessor>,
    pub jwt_service: JwtService,
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let session_repository = Arc::new(MongoStudySessionRepository::new(&db));
        session_repository.ensure_indexes().await?;

        let feedback_repository = Arc::new(MongoFeedbackRepository::new(&db));
        feedback_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let model: Arc<dyn ModelClient> = Arc::new(OpenAiModelClient::new(&config.model));
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        let default_question_count = NonZeroU32::new(config.default_quiz_questions)
            .ok_or_else(|| AppError::InternalError("DEFAULT_QUIZ_QUESTIONS must be positive".into()))?;

        Ok(Self {
            user_service: Arc::new(UserService::new(user_repository, jwt_service.clone())),
            study_service: Arc::new(StudyService::new(
                model,
                session_repository,
                feedback_repository,
                attempt_repository,
                default_question_count,
            )),
            content_processor: Arc::new(ContentProcessor::new(config.max_upload_bytes)),
            jwt_service,
            db: Some(db),
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by in-memory repositories and the given model.
    pub fn for_tests(model: Arc<dyn ModelClient>) -> Self {
        use crate::test_utils::{
            InMemoryFeedbackRepository, InMemoryQuizAttemptRepository,
            InMemoryStudySessionRepository, InMemoryUserRepository,
        };

        let config = Config::test_config();
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        Self {
            user_service: Arc::new(UserService::new(
                Arc::new(InMemoryUserRepository::default()),
                jwt_service.clone(),
            )),
            study_service: Arc::new(StudyService::new(
                model,
                Arc::new(InMemoryStudySessionRepository::default()),
                Arc::new(InMemoryFeedbackRepository::default()),
                Arc::new(InMemoryQuizAttemptRepository::default()),
                NonZeroU32::new(config.default_quiz_questions).unwrap_or(NonZeroU32::MIN),
            )),
            content_processor: Arc::new(ContentProcessor::new(config.max_upload_bytes)),
            jwt_service,
            db: None,
            config: Arc::new(config),
        }
    }
}
