use async_graphql::{Context, Object, ID};

use crate::{
    graphql::helpers::{authenticated, IntoGraphQLResult},
    models::{
        domain::{Feedback, GradeResult, StudySession},
        dto::{
            request::{FeedbackInput, GenerateStudyInput, SubmitAnswersInput},
            response::ImprovementSuggestion,
        },
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn generate_study_materials(
        &self,
        ctx: &Context<'_>,
        input: GenerateStudyInput,
    ) -> async_graphql::Result<StudySession> {
        let (state, claims) = authenticated(ctx)?;
        state
            .study_service
            .generate_study_materials(claims.user_id(), input)
            .await
            .into_graphql()
    }

    async fn submit_quiz_answers(
        &self,
        ctx: &Context<'_>,
        input: SubmitAnswersInput,
    ) -> async_graphql::Result<GradeResult> {
        let (state, claims) = authenticated(ctx)?;
        state
            .study_service
            .submit_answers(claims.user_id(), input)
            .await
            .into_graphql()
    }

    async fn submit_feedback(
        &self,
        ctx: &Context<'_>,
        input: FeedbackInput,
    ) -> async_graphql::Result<Feedback> {
        let (state, claims) = authenticated(ctx)?;
        state
            .study_service
            .submit_feedback(claims.user_id(), input)
            .await
            .into_graphql()
    }

    async fn improve_from_feedback(
        &self,
        ctx: &Context<'_>,
        session_id: ID,
        feedback: String,
    ) -> async_graphql::Result<ImprovementSuggestion> {
        let (state, claims) = authenticated(ctx)?;
        state
            .study_service
            .improve_from_feedback(claims.user_id(), &session_id, &feedback)
            .await
            .into_graphql()
    }
}
