use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::user::User;
use crate::usecase::error::UsecaseError;
use crate::usecase::jwt::TokenPair;

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

fn auth_response(user: User, tokens: TokenPair) -> AuthResponse {
    AuthResponse {
        user: UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        },
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
    }
}

#[tracing::instrument(skip(state, payload))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling register request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let (user, tokens) = state
        .auth_usecase
        .register(payload.username, payload.email, payload.password)
        .await?;

    tracing::debug!(user_id = %user.id, "user registered successfully");
    Ok((StatusCode::CREATED, Json(auth_response(user, tokens))))
}

#[tracing::instrument(skip(state, payload))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling login request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let (user, tokens) = state
        .auth_usecase
        .login(payload.email, payload.password)
        .await?;

    tracing::debug!(user_id = %user.id, "user logged in successfully");
    Ok((StatusCode::OK, Json(auth_response(user, tokens))))
}

#[tracing::instrument(skip(state, payload))]
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling refresh token request");

    let tokens = state.auth_usecase.refresh(payload.refresh_token).await?;

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
        }),
    ))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling get profile request");

    let profile = state.auth_usecase.get_profile(user.user_id).await?;

    Ok((
        StatusCode::OK,
        Json(UserResponse {
            id: profile.id,
            username: profile.username,
            email: profile.email,
            created_at: profile.created_at,
        }),
    ))
}
