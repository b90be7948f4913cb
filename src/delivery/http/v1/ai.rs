use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::usecase::ai::RecommendationPrefs;
use crate::usecase::error::UsecaseError;

#[derive(Deserialize, Validate)]
pub struct GenerateRecipeRequest {
    #[validate(length(min = 1))]
    pub ingredients: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsRequest {
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub cuisine_types: Vec<String>,
    pub cooking_time: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SubstitutionsRequest {
    #[validate(length(min = 1))]
    pub ingredient: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    #[validate(length(min = 1))]
    pub recipe_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub image_url: String,
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn generate_recipe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<GenerateRecipeRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling generate recipe request");

    if payload.validate().is_err() {
        return Err(UsecaseError::Validation(
            "At least one ingredient is required".to_string(),
        ));
    }

    let recipe = state.ai_usecase.generate_recipe(payload.ingredients).await?;

    tracing::debug!(name = %recipe.name, "recipe generated successfully");
    Ok((StatusCode::OK, Json(recipe)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<RecommendationsRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling recommendations request");

    let prefs = RecommendationPrefs {
        dietary_restrictions: payload.dietary_restrictions,
        cuisine_types: payload.cuisine_types,
        cooking_time: payload.cooking_time,
        difficulty: payload.difficulty,
    };

    let recommended = state.ai_usecase.recommendations(prefs).await?;

    tracing::debug!(count = recommended.len(), "recommendations built successfully");
    Ok((StatusCode::OK, Json(recommended)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn substitutions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<SubstitutionsRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling substitutions request");

    if payload.validate().is_err() {
        return Err(UsecaseError::Validation(
            "Ingredient is required".to_string(),
        ));
    }

    let subs = state.ai_usecase.substitutions(payload.ingredient).await?;

    Ok((StatusCode::OK, Json(subs)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<GenerateImageRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling generate image request");

    if payload.validate().is_err() {
        return Err(UsecaseError::Validation(
            "Recipe name is required".to_string(),
        ));
    }

    let image_url = state.ai_usecase.generate_image(payload.recipe_name).await?;

    Ok((StatusCode::OK, Json(GenerateImageResponse { image_url })))
}
