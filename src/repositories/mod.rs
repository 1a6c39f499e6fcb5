pub mod feedback_repository;
pub mod quiz_attempt_repository;
pub mod study_session_repository;
pub mod user_repository;

pub use feedback_repository::{FeedbackRepository, MongoFeedbackRepository};
pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use study_session_repository::{MongoStudySessionRepository, StudySessionRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
