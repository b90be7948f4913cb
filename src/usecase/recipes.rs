use uuid::Uuid;

use crate::domain::recipe::{Recipe, RecipeDraft, RecipePatch, RecipeSummaryRow};
use crate::usecase::contracts::RecipeRepository;
use crate::usecase::error::UsecaseError;

pub struct RecipesUseCase<R>
where
    R: RecipeRepository,
{
    recipe_repository: R,
}

impl<R> RecipesUseCase<R>
where
    R: RecipeRepository,
{
    pub fn new(recipe_repository: R) -> Self {
        Self { recipe_repository }
    }

    #[tracing::instrument(skip(self, draft), fields(creator_id = %creator_id, title = %draft.title))]
    pub async fn create_recipe(
        &self,
        creator_id: Uuid,
        draft: RecipeDraft,
        is_ai_generated: bool,
    ) -> Result<Recipe, UsecaseError> {
        tracing::debug!("creating recipe");

        draft
            .validate(is_ai_generated)
            .map_err(UsecaseError::Validation)?;

        let recipe = Recipe::from_draft(draft, creator_id, is_ai_generated);
        self.recipe_repository.create(&recipe).await?;

        tracing::info!(recipe_id = %recipe.id, is_ai_generated, "recipe created");
        Ok(recipe)
    }

    #[tracing::instrument(skip(self), fields(recipe_id = %recipe_id))]
    pub async fn get_recipe_summary(
        &self,
        recipe_id: Uuid,
    ) -> Result<RecipeSummaryRow, UsecaseError> {
        tracing::debug!("getting recipe");

        self.recipe_repository
            .find_summary_by_id(recipe_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Recipe".to_string()))
    }

    #[tracing::instrument(skip(self), fields(?search))]
    pub async fn search_recipes(
        &self,
        search: Option<String>,
    ) -> Result<Vec<RecipeSummaryRow>, UsecaseError> {
        tracing::debug!("searching recipes");

        // Treat "?search=" the same as an absent parameter.
        let search = search.filter(|s| !s.trim().is_empty());
        let rows = self.recipe_repository.search(search).await?;

        tracing::debug!(count = rows.len(), "recipes listed");
        Ok(rows)
    }

    #[tracing::instrument(skip(self, patch), fields(requester_id = %requester_id, recipe_id = %recipe_id))]
    pub async fn update_recipe(
        &self,
        requester_id: Uuid,
        recipe_id: Uuid,
        patch: RecipePatch,
    ) -> Result<Recipe, UsecaseError> {
        tracing::debug!("updating recipe");

        let mut recipe = self
            .recipe_repository
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Recipe".to_string()))?;

        if recipe.creator_id != requester_id {
            tracing::warn!("unauthorized recipe update attempt");
            return Err(UsecaseError::Forbidden("Not authorized".to_string()));
        }

        recipe.apply_patch(patch);
        self.recipe_repository.update(&recipe).await?;

        tracing::debug!(%recipe_id, "recipe updated successfully");
        Ok(recipe)
    }

    #[tracing::instrument(skip(self), fields(requester_id = %requester_id, recipe_id = %recipe_id))]
    pub async fn delete_recipe(
        &self,
        requester_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<(), UsecaseError> {
        tracing::debug!("deleting recipe");

        let recipe = self
            .recipe_repository
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Recipe".to_string()))?;

        if recipe.creator_id != requester_id {
            tracing::warn!("unauthorized recipe delete attempt");
            return Err(UsecaseError::Forbidden("Not authorized".to_string()));
        }

        // Bookmarks referencing this recipe stay behind; listing drops them.
        self.recipe_repository.delete(recipe_id).await?;

        tracing::debug!(%recipe_id, "recipe deleted successfully");
        Ok(())
    }
}
