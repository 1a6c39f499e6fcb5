use std::{env, time::Duration};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";
const MIN_JWT_SECRET_LEN: usize = 32;

/// Settings for the chat-completions backend that generates study material.
#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub api_key: SecretString,
    pub api_base: String,
    pub model_name: String,
    /// Tried in order after `model_name` when a call fails.
    pub fallback_models: Vec<String>,
    pub timeout: Duration,
}

impl ModelConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: SecretString::from(env::var("MODEL_API_KEY").unwrap_or_default()),
            api_base: env::var("MODEL_API_BASE").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
            }),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            fallback_models: parse_model_list(
                &env::var("MODEL_FALLBACKS")
                    .unwrap_or_else(|_| "gemini-flash-latest,gemini-2.0-flash".to_string()),
            ),
            timeout: Duration::from_secs(
                env::var("MODEL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }

    /// Primary model first, then fallbacks, without duplicates.
    pub fn candidate_models(&self) -> Vec<String> {
        let mut models = vec![self.model_name.clone()];
        for name in &self.fallback_models {
            if !models.contains(name) {
                models.push(name.clone());
            }
        }
        models
    }
}

fn parse_model_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub model: ModelConfig,
    pub default_quiz_questions: u32,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "study-assistant-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            model: ModelConfig::from_env(),
            default_quiz_questions: env::var("DEFAULT_QUIZ_QUESTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .filter(|n| (1..=20).contains(n))
                .unwrap_or(5),
            max_upload_bytes: env::var("MAX_UPLOAD_MB")
                .ok()
                .and_then(|m| m.parse::<usize>().ok())
                .unwrap_or(10)
                * 1024
                * 1024,
        }
    }

    /// Rejects settings that are only acceptable on a developer machine.
    pub fn validate_for_production(&self) -> AppResult<()> {
        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEV_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the default value".to_string(),
            ));
        }

        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}), must be at least {} characters",
                jwt_secret.len(),
                MIN_JWT_SECRET_LEN
            )));
        }

        if self.model.api_key.expose_secret().is_empty() {
            return Err(AppError::InternalError(
                "MODEL_API_KEY is not set".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "study-assistant-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            model: ModelConfig {
                api_key: SecretString::from("test-key".to_string()),
                api_base: "http://localhost:9999/v1".to_string(),
                model_name: "test-model".to_string(),
                fallback_models: vec!["test-fallback".to_string()],
                timeout: Duration::from_secs(5),
            },
            default_quiz_questions: 5,
            max_upload_bytes: 1024 * 1024,
        }
    }
}
