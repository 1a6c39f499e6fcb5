pub mod difficulty;
pub mod feedback;
pub mod grade;
pub mod quiz;
pub mod quiz_attempt;
pub mod study_session;
pub mod user;

pub use difficulty::DifficultyLevel;
pub use feedback::Feedback;
pub use grade::{AnswerSubmission, GradeResult, PerformanceBand, QuestionGrade};
pub use quiz::{GenerationError, GenerationErrorKind, OptionLetter, Quiz, QuizQuestion};
pub use quiz_attempt::{AttemptStats, QuizAttempt};
pub use study_session::StudySession;
pub use user::User;
