pub mod mutations;
pub mod queries;

use async_graphql::{EmptySubscription, Schema as GraphQLSchema};

use crate::app_state::AppState;

pub use mutations::MutationRoot;
pub use queries::QueryRoot;

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .finish()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_graphql::Request;

    use super::*;
    use crate::{
        auth::Claims,
        services::model_service::MockModelClient,
        test_utils::fixtures::TWO_PLUS_TWO_REPLY,
    };

    fn claims(user_id: &str) -> Claims {
        Claims {
            sub: user_id.to_string(),
            username: "student".to_string(),
            iat: 0,
            exp: 9999999999,
        }
    }

    fn schema() -> Schema {
        let mut model = MockModelClient::new();
        model.expect_complete().returning(|prompt| {
            if prompt.contains("multiple choice quiz") {
                Ok(TWO_PLUS_TWO_REPLY.to_string())
            } else {
                Ok("Some text.".to_string())
            }
        });
        create_schema(AppState::for_tests(Arc::new(model)))
    }

    #[tokio::test]
    async fn unauthenticated_queries_report_code() {
        let response = schema().execute("{ userStats { totalSessions } }").await;

        assert_eq!(response.errors.len(), 1);
        let extensions = response.errors[0]
            .extensions
            .as_ref()
            .expect("extensions should be set");
        assert_eq!(
            extensions.get("code"),
            Some(&async_graphql::Value::from("UNAUTHORIZED"))
        );
    }

    #[tokio::test]
    async fn generate_and_grade_through_schema() {
        let schema = schema();

        let generated = schema
            .execute(
                Request::new(
                    r#"mutation {
                        generateStudyMaterials(input: { topic: "Arithmetic", questionCount: 1 }) {
                            id
                            learningLevel
                            quiz { questions { questionText options } generationError { kind } }
                        }
                    }"#,
                )
                .data(claims("user-1")),
            )
            .await;
        assert!(generated.errors.is_empty(), "{:?}", generated.errors);

        let json = generated.data.into_json().expect("data should be json");
        let session = &json["generateStudyMaterials"];
        assert_eq!(session["learningLevel"], "BEGINNER");
        assert_eq!(session["quiz"]["questions"][0]["questionText"], "2+2?");
        assert_eq!(session["quiz"]["questions"][0]["options"][1], "B) 4");
        assert!(session["quiz"]["generationError"].is_null());

        let session_id = session["id"].as_str().expect("id").to_string();
        let graded = schema
            .execute(
                Request::new(format!(
                    r#"mutation {{
                        submitQuizAnswers(input: {{ sessionId: "{}", answers: [{{ questionIndex: 0, letter: "a" }}] }}) {{
                            correctCount totalCount scorePercent band
                            perQuestion {{ correctLetter rationale }}
                        }}
                    }}"#,
                    session_id
                ))
                .data(claims("user-1")),
            )
            .await;
        assert!(graded.errors.is_empty(), "{:?}", graded.errors);

        let json = graded.data.into_json().expect("data should be json");
        assert_eq!(json["submitQuizAnswers"]["scorePercent"], 0.0);
        assert_eq!(json["submitQuizAnswers"]["band"], "NEEDS_REVIEW");
        assert_eq!(json["submitQuizAnswers"]["perQuestion"][0]["correctLetter"], "B");
        assert_eq!(
            json["submitQuizAnswers"]["perQuestion"][0]["rationale"],
            "basic arithmetic"
        );

        let foreign = schema
            .execute(
                Request::new(format!(r#"{{ studySession(id: "{}") {{ topic }} }}"#, session_id))
                    .data(claims("user-2")),
            )
            .await;
        assert_eq!(foreign.errors.len(), 1);
    }

    #[tokio::test]
    async fn answer_key_is_not_exposed_before_grading() {
        let schema = schema();

        let response = schema
            .execute(
                Request::new(
                    r#"mutation {
                        generateStudyMaterials(input: { topic: "Arithmetic", questionCount: 1 }) {
                            quiz { questions { correctAnswerLetter rationale } }
                        }
                    }"#,
                )
                .data(claims("user-1")),
            )
            .await;

        assert!(!response.errors.is_empty());
        assert!(response.errors[0].message.contains("correctAnswerLetter"));
    }
}
