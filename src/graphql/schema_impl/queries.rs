use async_graphql::{Context, Object, ID};

use crate::{
    graphql::helpers::{authenticated, IntoGraphQLResult},
    models::{
        domain::{QuizAttempt, StudySession},
        dto::response::{StudySessionSummaryDto, UserDto, UserStatsDto},
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<UserDto> {
        let (state, claims) = authenticated(ctx)?;
        state.user_service.get_user(claims.user_id()).await.into_graphql()
    }

    async fn study_session(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<StudySession> {
        let (state, claims) = authenticated(ctx)?;
        state
            .study_service
            .get_session(claims.user_id(), &id)
            .await
            .into_graphql()
    }

    /// Most recent sessions first; `limit` defaults to 10 and is capped at 50.
    async fn study_history(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
    ) -> async_graphql::Result<Vec<StudySessionSummaryDto>> {
        let (state, claims) = authenticated(ctx)?;
        state
            .study_service
            .history(claims.user_id(), limit)
            .await
            .into_graphql()
    }

    async fn user_stats(&self, ctx: &Context<'_>) -> async_graphql::Result<UserStatsDto> {
        let (state, claims) = authenticated(ctx)?;
        state
            .study_service
            .user_stats(claims.user_id())
            .await
            .into_graphql()
    }

    async fn quiz_attempts(
        &self,
        ctx: &Context<'_>,
        session_id: ID,
    ) -> async_graphql::Result<Vec<QuizAttempt>> {
        let (state, claims) = authenticated(ctx)?;
        state
            .study_service
            .list_attempts(claims.user_id(), &session_id)
            .await
            .into_graphql()
    }
}
