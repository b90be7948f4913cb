use uuid::Uuid;

use crate::{
    domain::bookmark::Bookmark,
    domain::recipe::{Recipe, RecipeSummaryRow},
    domain::user::User,
    repository::errors::RepositoryError,
};

#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: String) -> Result<Option<User>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RecipeRepository: Send + Sync {
    async fn create(&self, recipe: &Recipe) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RepositoryError>;
    async fn update(&self, recipe: &Recipe) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
    async fn search(&self, search: Option<String>) -> Result<Vec<RecipeSummaryRow>, RepositoryError>;
    async fn find_summary_by_id(&self, id: Uuid) -> Result<Option<RecipeSummaryRow>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait BookmarkRepository: Send + Sync {
    async fn create(&self, bookmark: &Bookmark) -> Result<(), RepositoryError>;
    async fn find_by_user_and_recipe(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Option<Bookmark>, RepositoryError>;
    async fn delete_by_user_and_recipe(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<(), RepositoryError>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Bookmark>, RepositoryError>;
}
