use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
};

/// Callers may only touch records they created.
pub fn require_owner(user_id: &str, resource_owner: &str) -> AppResult<()> {
    if user_id != resource_owner {
        return Err(AppError::Forbidden(
            "You can only access your own study sessions".to_string(),
        ));
    }
    Ok(())
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}
