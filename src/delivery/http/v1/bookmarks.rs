use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::recipe::{Ingredient, Recipe, RecipeRef};
use crate::usecase::error::UsecaseError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBookmarkRequest {
    pub recipe_ref: RecipeRef,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBookmarkResponse {
    pub recipe_id: Uuid,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStatusResponse {
    pub is_bookmarked: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedRecipeResponse {
    pub id: Uuid,
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub image: Option<String>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
    pub source_url: String,
}

fn bookmarked_recipe_to_response(r: Recipe) -> BookmarkedRecipeResponse {
    BookmarkedRecipeResponse {
        id: r.id,
        name: r.title,
        ingredients: r.ingredients,
        instructions: r.instructions,
        image: r.image_url,
        cook_time: r.cooking_time,
        servings: r.servings,
        is_ai_generated: r.is_ai_generated,
        source_url: r.source_url.unwrap_or_default(),
    }
}

/// Bookmarking is a two-step protocol composed here: resolve the incoming
/// ref to a durable local id first (which may persist a recipe), then
/// insert the bookmark for that id.
#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<AddBookmarkRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling add bookmark request");

    let recipe_id = state
        .recipe_resolver
        .resolve_local_id(user.user_id, payload.recipe_ref)
        .await?;

    state
        .bookmarks_usecase
        .add_bookmark(user.user_id, recipe_id)
        .await?;

    tracing::debug!(%recipe_id, "bookmark added successfully");
    Ok((
        StatusCode::CREATED,
        Json(AddBookmarkResponse {
            recipe_id,
            message: "Bookmark added successfully".to_string(),
        }),
    ))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, recipe_id = %recipe_id))]
pub async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(recipe_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling remove bookmark request");

    state
        .bookmarks_usecase
        .remove_bookmark(user.user_id, recipe_id)
        .await?;

    tracing::debug!(%recipe_id, "bookmark removed successfully");
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, recipe_id = %recipe_id))]
pub async fn check_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(recipe_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling check bookmark request");

    let is_bookmarked = state
        .bookmarks_usecase
        .is_bookmarked(user.user_id, recipe_id)
        .await?;

    Ok((StatusCode::OK, Json(BookmarkStatusResponse { is_bookmarked })))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling list bookmarks request");

    let recipes = state.bookmarks_usecase.list_bookmarks(user.user_id).await?;
    let response: Vec<BookmarkedRecipeResponse> = recipes
        .into_iter()
        .map(bookmarked_recipe_to_response)
        .collect();

    tracing::debug!(user_id = %user.user_id, count = response.len(), "bookmarks listed");
    Ok((StatusCode::OK, Json(response)))
}
