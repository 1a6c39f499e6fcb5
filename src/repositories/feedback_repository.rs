use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{Database, FEEDBACK_COLLECTION},
    errors::AppResult,
    models::domain::Feedback,
};

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, feedback: Feedback) -> AppResult<Feedback>;
    async fn list_by_session(&self, session_id: &str) -> AppResult<Vec<Feedback>>;
}

pub struct MongoFeedbackRepository {
    collection: Collection<Feedback>,
}

impl MongoFeedbackRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(FEEDBACK_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let session_index = IndexModel::builder()
            .keys(doc! { "session_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("session_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(session_index).await?;
        Ok(())
    }
}

#[async_trait]
impl FeedbackRepository for MongoFeedbackRepository {
    async fn create(&self, feedback: Feedback) -> AppResult<Feedback> {
        self.collection.insert_one(&feedback).await?;
        Ok(feedback)
    }

    async fn list_by_session(&self, session_id: &str) -> AppResult<Vec<Feedback>> {
        let feedback = self
            .collection
            .find(doc! { "session_id": session_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(feedback)
    }
}
