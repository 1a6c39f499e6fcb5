use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{
        password::{generate_salt, hash_password, verify_password},
        JwtService,
    },
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::{
            request::{LoginRequest, SignupRequest},
            response::{AuthResponse, UserDto},
        },
    },
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    jwt_service: JwtService,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, jwt_service: JwtService) -> Self {
        Self {
            repository,
            jwt_service,
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> AppResult<UserDto> {
        request.validate()?;

        let username = request.username.trim();
        if self.repository.find_by_username(username).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let salt = generate_salt();
        let password_hash = hash_password(&request.password, &salt);
        let user = User::new(username, password_hash, salt, request.learning_level());

        let user = self.repository.create(user).await?;
        log::info!("Created account '{}'", user.username);
        Ok(user.into())
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

        let user = self
            .repository
            .find_by_username(request.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_salt, &user.password_hash) {
            log::info!("Failed login for '{}'", user.username);
            return Err(invalid());
        }

        let token = self.jwt_service.create_token(&user)?;
        Ok(AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
        })
    }

    pub async fn get_user(&self, user_id: &str) -> AppResult<UserDto> {
        self.repository
            .find_by_id(user_id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", user_id)))
    }
}
