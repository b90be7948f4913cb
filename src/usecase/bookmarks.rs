use uuid::Uuid;

use crate::domain::bookmark::Bookmark;
use crate::domain::recipe::Recipe;
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::{BookmarkRepository, RecipeRepository};
use crate::usecase::error::UsecaseError;

pub struct BookmarksUseCase<B, R>
where
    B: BookmarkRepository,
    R: RecipeRepository,
{
    bookmark_repository: B,
    recipe_repository: R,
}

impl<B, R> BookmarksUseCase<B, R>
where
    B: BookmarkRepository,
    R: RecipeRepository,
{
    pub fn new(bookmark_repository: B, recipe_repository: R) -> Self {
        Self {
            bookmark_repository,
            recipe_repository,
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    pub async fn add_bookmark(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Bookmark, UsecaseError> {
        tracing::debug!("adding bookmark");

        let existing = self
            .bookmark_repository
            .find_by_user_and_recipe(user_id, recipe_id)
            .await?;
        if existing.is_some() {
            return Err(UsecaseError::Conflict(
                "Recipe already bookmarked".to_string(),
            ));
        }

        let bookmark = Bookmark::new(user_id, recipe_id);
        // The unique index decides races the lookup above cannot see.
        self.bookmark_repository
            .create(&bookmark)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict => {
                    UsecaseError::Conflict("Recipe already bookmarked".to_string())
                }
                other => other.into(),
            })?;

        metrics::counter!("bookmarks_added_total").increment(1);
        tracing::info!(bookmark_id = %bookmark.id, "bookmark added");
        Ok(bookmark)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    pub async fn remove_bookmark(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<(), UsecaseError> {
        tracing::debug!("removing bookmark");

        self.bookmark_repository
            .delete_by_user_and_recipe(user_id, recipe_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => UsecaseError::NotFound("Bookmark".to_string()),
                other => other.into(),
            })?;

        metrics::counter!("bookmarks_removed_total").increment(1);
        tracing::info!("bookmark removed");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    pub async fn is_bookmarked(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<bool, UsecaseError> {
        tracing::debug!("checking bookmark status");

        let existing = self
            .bookmark_repository
            .find_by_user_and_recipe(user_id, recipe_id)
            .await?;

        Ok(existing.is_some())
    }

    /// Returns the user's bookmarked recipes. A bookmark whose recipe no
    /// longer resolves (deleted since bookmarking) is skipped, not an error.
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<Recipe>, UsecaseError> {
        tracing::debug!("listing bookmarks");

        let bookmarks = self.bookmark_repository.find_by_user_id(user_id).await?;

        let mut recipes = Vec::with_capacity(bookmarks.len());
        for bookmark in &bookmarks {
            match self.recipe_repository.find_by_id(bookmark.recipe_id).await? {
                Some(recipe) => recipes.push(recipe),
                None => {
                    tracing::warn!(recipe_id = %bookmark.recipe_id, "dropping bookmark with unresolvable recipe");
                }
            }
        }

        tracing::debug!(user_id = %user_id, count = recipes.len(), "bookmarks listed");
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recipe::{Ingredient, RecipeDraft};
    use crate::usecase::contracts::{MockBookmarkRepository, MockRecipeRepository};

    fn recipe(creator: Uuid) -> Recipe {
        Recipe::from_draft(
            RecipeDraft {
                title: "Test".to_string(),
                description: None,
                ingredients: vec![Ingredient {
                    quantity: Some(1.0),
                    unit: Some("cup".to_string()),
                    description: "rice".to_string(),
                }],
                instructions: vec!["Boil".to_string()],
                image_url: None,
                cooking_time: Some(20),
                servings: Some(2),
                source_url: None,
            },
            creator,
            true,
        )
    }

    #[tokio::test]
    async fn test_add_bookmark_inserts_when_absent() {
        let user_id = Uuid::new_v4();
        let recipe_id = Uuid::new_v4();

        let mut mock_bookmark_repo = MockBookmarkRepository::new();
        mock_bookmark_repo
            .expect_find_by_user_and_recipe()
            .with(
                mockall::predicate::eq(user_id),
                mockall::predicate::eq(recipe_id),
            )
            .times(1)
            .returning(|_, _| Ok(None));
        mock_bookmark_repo
            .expect_create()
            .times(1)
            .returning(|_| Ok(()));

        let usecase = BookmarksUseCase::new(mock_bookmark_repo, MockRecipeRepository::new());
        let bookmark = usecase.add_bookmark(user_id, recipe_id).await.unwrap();

        assert_eq!(bookmark.user_id, user_id);
        assert_eq!(bookmark.recipe_id, recipe_id);
    }

    #[tokio::test]
    async fn test_add_bookmark_duplicate_conflicts() {
        let user_id = Uuid::new_v4();
        let recipe_id = Uuid::new_v4();

        let mut mock_bookmark_repo = MockBookmarkRepository::new();
        mock_bookmark_repo
            .expect_find_by_user_and_recipe()
            .times(1)
            .returning(|user_id, recipe_id| Ok(Some(Bookmark::new(user_id, recipe_id))));

        let usecase = BookmarksUseCase::new(mock_bookmark_repo, MockRecipeRepository::new());
        let result = usecase.add_bookmark(user_id, recipe_id).await;

        assert!(matches!(result, Err(UsecaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_add_bookmark_lost_race_maps_to_conflict() {
        // The pre-check saw nothing, but a concurrent insert won the index.
        let mut mock_bookmark_repo = MockBookmarkRepository::new();
        mock_bookmark_repo
            .expect_find_by_user_and_recipe()
            .times(1)
            .returning(|_, _| Ok(None));
        mock_bookmark_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::Conflict));

        let usecase = BookmarksUseCase::new(mock_bookmark_repo, MockRecipeRepository::new());
        let result = usecase.add_bookmark(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(UsecaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_remove_bookmark_missing_not_found() {
        let mut mock_bookmark_repo = MockBookmarkRepository::new();
        mock_bookmark_repo
            .expect_delete_by_user_and_recipe()
            .times(1)
            .returning(|_, _| Err(RepositoryError::NotFound));

        let usecase = BookmarksUseCase::new(mock_bookmark_repo, MockRecipeRepository::new());
        let result = usecase.remove_bookmark(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_remove_check_roundtrip() {
        let user_id = Uuid::new_v4();
        let recipe_id = Uuid::new_v4();

        let mut mock_bookmark_repo = MockBookmarkRepository::new();
        let mut lookups = vec![Ok(None), Ok(None)].into_iter();
        mock_bookmark_repo
            .expect_find_by_user_and_recipe()
            .times(2)
            .returning(move |_, _| lookups.next().unwrap());
        mock_bookmark_repo
            .expect_create()
            .times(1)
            .returning(|_| Ok(()));
        mock_bookmark_repo
            .expect_delete_by_user_and_recipe()
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = BookmarksUseCase::new(mock_bookmark_repo, MockRecipeRepository::new());

        usecase.add_bookmark(user_id, recipe_id).await.unwrap();
        usecase.remove_bookmark(user_id, recipe_id).await.unwrap();
        let bookmarked = usecase.is_bookmarked(user_id, recipe_id).await.unwrap();

        assert!(!bookmarked);
    }

    #[tokio::test]
    async fn test_list_bookmarks_drops_unresolvable_entries() {
        let user_id = Uuid::new_v4();
        let kept = recipe(user_id);
        let kept_id = kept.id;
        let dangling_id = Uuid::new_v4();

        let mut mock_bookmark_repo = MockBookmarkRepository::new();
        mock_bookmark_repo
            .expect_find_by_user_id()
            .times(1)
            .returning(move |user_id| {
                Ok(vec![
                    Bookmark::new(user_id, kept_id),
                    Bookmark::new(user_id, dangling_id),
                ])
            });

        let mut mock_recipe_repo = MockRecipeRepository::new();
        mock_recipe_repo
            .expect_find_by_id()
            .times(2)
            .returning(move |id| {
                if id == kept_id {
                    Ok(Some(kept.clone()))
                } else {
                    Ok(None)
                }
            });

        let usecase = BookmarksUseCase::new(mock_bookmark_repo, mock_recipe_repo);
        let recipes = usecase.list_bookmarks(user_id).await.unwrap();

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, kept_id);
    }
}
