use async_graphql::{Context, ErrorExtensions};

use crate::{
    app_state::AppState,
    auth::{extract_claims_from_context, Claims},
    errors::AppResult,
};

/// Converts service errors into GraphQL errors carrying a `code` extension.
pub trait IntoGraphQLResult<T> {
    fn into_graphql(self) -> async_graphql::Result<T>;
}

impl<T> IntoGraphQLResult<T> for AppResult<T> {
    fn into_graphql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.extend())
    }
}

/// State and caller claims for an authenticated resolver.
pub fn authenticated<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<(&'a AppState, Claims)> {
    let state = ctx.data::<AppState>()?;
    let claims = extract_claims_from_context(ctx).into_graphql()?;
    Ok((state, claims))
}
