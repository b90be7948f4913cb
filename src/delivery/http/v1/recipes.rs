use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::recipe::{Ingredient, Recipe, RecipeDraft, RecipePatch, RecipeSummaryRow};
use crate::usecase::error::UsecaseError;
use crate::usecase::recipe_provider::ProviderRecipe;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Listing shape shared with the external provider API, so the frontend
/// renders local and provider results with the same code path.
#[derive(Serialize)]
pub struct RecipeSummaryResponse {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub image_url: Option<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Vec<Ingredient>,
    pub source_url: String,
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
}

#[derive(Serialize)]
pub struct RecipesData {
    pub recipes: Vec<RecipeSummaryResponse>,
}

#[derive(Serialize)]
pub struct RecipesEnvelope {
    pub data: RecipesData,
}

#[derive(Serialize)]
pub struct RecipeData {
    pub recipe: RecipeSummaryResponse,
}

#[derive(Serialize)]
pub struct RecipeEnvelope {
    pub data: RecipeData,
}

#[derive(Deserialize, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub image_url: Option<String>,
    #[serde(rename = "isAIGenerated", default)]
    pub is_ai_generated: bool,
    #[serde(rename = "sourceUrl")]
    pub source_url: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct UpdateRecipeRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub image_url: Option<String>,
    #[serde(rename = "sourceUrl")]
    pub source_url: Option<String>,
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub creator_id: Uuid,
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
    #[serde(rename = "sourceUrl")]
    pub source_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn recipe_to_response(r: Recipe) -> RecipeResponse {
    RecipeResponse {
        id: r.id,
        title: r.title,
        description: r.description,
        ingredients: r.ingredients,
        instructions: r.instructions,
        image_url: r.image_url,
        cooking_time: r.cooking_time,
        servings: r.servings,
        creator_id: r.creator_id,
        is_ai_generated: r.is_ai_generated,
        source_url: r.source_url,
        created_at: r.created_at,
    }
}

fn summary_row_to_response(row: RecipeSummaryRow) -> RecipeSummaryResponse {
    RecipeSummaryResponse {
        id: row.id.to_string(),
        title: row.title,
        publisher: row.publisher.unwrap_or_default(),
        image_url: row.image_url,
        cooking_time: row.cooking_time,
        servings: row.servings,
        ingredients: row.ingredients,
        source_url: row.source_url.unwrap_or_default(),
        is_ai_generated: row.is_ai_generated,
    }
}

fn provider_recipe_to_response(recipe: ProviderRecipe) -> RecipeSummaryResponse {
    RecipeSummaryResponse {
        id: recipe.id,
        title: recipe.title,
        publisher: recipe.publisher.unwrap_or_default(),
        image_url: recipe.image_url,
        cooking_time: recipe.cooking_time,
        servings: recipe.servings,
        ingredients: recipe
            .ingredients
            .unwrap_or_default()
            .into_iter()
            .map(|i| Ingredient {
                quantity: i.quantity,
                unit: i.unit,
                description: i.description.unwrap_or_default(),
            })
            .collect(),
        source_url: recipe.source_url.unwrap_or_default(),
        is_ai_generated: false,
    }
}

#[tracing::instrument(skip(state, query))]
pub async fn search_recipes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling search recipes request");

    let rows = state.recipes_usecase.search_recipes(query.search).await?;
    let recipes = rows.into_iter().map(summary_row_to_response).collect();

    Ok((
        StatusCode::OK,
        Json(RecipesEnvelope {
            data: RecipesData { recipes },
        }),
    ))
}

/// Detail lookup spans both recipe origins: UUIDs are local records,
/// anything else is treated as an external provider id.
#[tracing::instrument(skip(state), fields(recipe_id = %recipe_id))]
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling get recipe request");

    let recipe = match Uuid::parse_str(&recipe_id) {
        Ok(id) => summary_row_to_response(state.recipes_usecase.get_recipe_summary(id).await?),
        Err(_) => {
            let provider_recipe = state
                .recipe_provider
                .fetch_recipe(&recipe_id)
                .await
                .map_err(|e| UsecaseError::Upstream(e.to_string()))?
                .ok_or_else(|| UsecaseError::NotFound("Recipe".to_string()))?;
            provider_recipe_to_response(provider_recipe)
        }
    };

    Ok((
        StatusCode::OK,
        Json(RecipeEnvelope {
            data: RecipeData { recipe },
        }),
    ))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling create recipe request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(user_id = %user.user_id, ?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let draft = RecipeDraft {
        title: payload.title,
        description: payload.description,
        ingredients: payload.ingredients,
        instructions: payload.instructions,
        image_url: payload.image_url,
        cooking_time: payload.cooking_time,
        servings: payload.servings,
        source_url: payload.source_url,
    };

    let recipe = state
        .recipes_usecase
        .create_recipe(user.user_id, draft, payload.is_ai_generated)
        .await?;

    tracing::debug!(recipe_id = %recipe.id, "recipe created successfully");
    Ok((StatusCode::CREATED, Json(recipe_to_response(recipe))))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id, recipe_id = %recipe_id))]
pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(recipe_id): Path<Uuid>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling update recipe request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(user_id = %user.user_id, ?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let patch = RecipePatch {
        title: payload.title,
        description: payload.description,
        ingredients: payload.ingredients,
        instructions: payload.instructions,
        image_url: payload.image_url,
        cooking_time: payload.cooking_time,
        servings: payload.servings,
        source_url: payload.source_url,
    };

    let recipe = state
        .recipes_usecase
        .update_recipe(user.user_id, recipe_id, patch)
        .await?;

    tracing::debug!(%recipe_id, "recipe updated successfully");
    Ok((StatusCode::OK, Json(recipe_to_response(recipe))))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, recipe_id = %recipe_id))]
pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(recipe_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling delete recipe request");

    state
        .recipes_usecase
        .delete_recipe(user.user_id, recipe_id)
        .await?;

    tracing::debug!(%recipe_id, "recipe deleted successfully");
    Ok(StatusCode::NO_CONTENT)
}
