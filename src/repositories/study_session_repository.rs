use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{Database, STUDY_SESSIONS_COLLECTION},
    errors::AppResult,
    models::domain::StudySession,
};

#[async_trait]
pub trait StudySessionRepository: Send + Sync {
    async fn create(&self, session: StudySession) -> AppResult<StudySession>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<StudySession>>;
    /// Newest first.
    async fn list_recent_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<StudySession>>;
    async fn count_by_user(&self, user_id: &str) -> AppResult<u64>;
    async fn distinct_topics_by_user(&self, user_id: &str) -> AppResult<Vec<String>>;
}

pub struct MongoStudySessionRepository {
    collection: Collection<StudySession>,
}

impl MongoStudySessionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(STUDY_SESSIONS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_created_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_created".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_created_index).await?;
        log::info!("Created indexes for study_sessions collection");

        Ok(())
    }
}

#[async_trait]
impl StudySessionRepository for MongoStudySessionRepository {
    async fn create(&self, session: StudySession) -> AppResult<StudySession> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<StudySession>> {
        let session = self.collection.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn list_recent_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<StudySession>> {
        let sessions = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(sessions)
    }

    async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "user_id": user_id })
            .await?;
        Ok(count)
    }

    async fn distinct_topics_by_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        let topics = self
            .collection
            .distinct("topic", doc! { "user_id": user_id })
            .await?
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect();
        Ok(topics)
    }
}
