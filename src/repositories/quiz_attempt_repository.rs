use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{Database, QUIZ_ATTEMPTS_COLLECTION},
    errors::AppResult,
    models::domain::{AttemptStats, QuizAttempt},
};

#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn list_by_session(&self, user_id: &str, session_id: &str) -> AppResult<Vec<QuizAttempt>>;
    async fn stats_for_user(&self, user_id: &str) -> AppResult<AttemptStats>;
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(QUIZ_ATTEMPTS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let user_session_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "session_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_session".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(user_session_index).await?;
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn list_by_session(&self, user_id: &str, session_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! {
                "user_id": user_id,
                "session_id": session_id
            })
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn stats_for_user(&self, user_id: &str) -> AppResult<AttemptStats> {
        let pipeline = vec![
            doc! { "$match": { "user_id": user_id } },
            doc! {
                "$group": {
                    "_id": null,
                    "total_attempts": { "$sum": 1 },
                    "average_score": { "$avg": "$score_percent" }
                }
            },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let summary = cursor.try_next().await?;
        Ok(summary.as_ref().map(stats_from_summary).unwrap_or_default())
    }
}

/// Reads the single `$group` row; no row means no attempts.
fn stats_from_summary(summary: &Document) -> AttemptStats {
    let total_attempts = match summary.get("total_attempts") {
        Some(Bson::Int32(n)) => u64::try_from(*n).unwrap_or(0),
        Some(Bson::Int64(n)) => u64::try_from(*n).unwrap_or(0),
        _ => 0,
    };

    AttemptStats {
        total_attempts,
        average_score: summary.get_f64("average_score").unwrap_or(0.0),
    }
}
