use std::sync::Arc;

use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{LoginRequest, SignupRequest},
};

#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<Arc<AppState>>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.signup(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[post("/auth/login")]
pub async fn login(
    state: web::Data<Arc<AppState>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.user_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
