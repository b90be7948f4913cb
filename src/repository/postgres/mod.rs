use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use crate::{
    domain::bookmark::Bookmark,
    domain::recipe::{Recipe, RecipeSummaryRow},
    domain::user::User,
    repository::errors::RepositoryError,
    usecase::contracts::{BookmarkRepository, RecipeRepository, UserRepository},
};

fn map_write_err(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
        _ => RepositoryError::DatabaseError(e.to_string()),
    }
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        tracing::debug!("creating user");

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;

        tracing::debug!(user_id = %user.id, "user created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        tracing::debug!("finding user by id");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    #[tracing::instrument(skip(self, email))]
    async fn find_by_email(&self, email: String) -> Result<Option<User>, RepositoryError> {
        tracing::debug!("finding user by email");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(user)
    }
}

pub struct PostgresRecipeRepository {
    pool: PgPool,
}

impl PostgresRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RecipeRepository for PostgresRecipeRepository {
    #[tracing::instrument(skip(self, recipe), fields(recipe_id = %recipe.id, creator_id = %recipe.creator_id))]
    async fn create(&self, recipe: &Recipe) -> Result<(), RepositoryError> {
        tracing::debug!("creating recipe");

        sqlx::query(
            r#"
            INSERT INTO recipes (id, title, description, ingredients, instructions, image_url,
                                 cooking_time, servings, creator_id, is_ai_generated, source_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(recipe.id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(serde_json::to_value(&recipe.ingredients).unwrap())
        .bind(&recipe.instructions)
        .bind(&recipe.image_url)
        .bind(recipe.cooking_time)
        .bind(recipe.servings)
        .bind(recipe.creator_id)
        .bind(recipe.is_ai_generated)
        .bind(&recipe.source_url)
        .bind(recipe.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;

        tracing::debug!(recipe_id = %recipe.id, "recipe created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(recipe_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RepositoryError> {
        tracing::debug!("finding recipe by id");

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, description, ingredients, instructions, image_url,
                   cooking_time, servings, creator_id, is_ai_generated, source_url, created_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(recipe)
    }

    #[tracing::instrument(skip(self, recipe), fields(recipe_id = %recipe.id))]
    async fn update(&self, recipe: &Recipe) -> Result<(), RepositoryError> {
        tracing::debug!("updating recipe");

        let result = sqlx::query(
            r#"
            UPDATE recipes
            SET title = $2, description = $3, ingredients = $4, instructions = $5,
                image_url = $6, cooking_time = $7, servings = $8, source_url = $9
            WHERE id = $1
            "#,
        )
        .bind(recipe.id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(serde_json::to_value(&recipe.ingredients).unwrap())
        .bind(&recipe.instructions)
        .bind(&recipe.image_url)
        .bind(recipe.cooking_time)
        .bind(recipe.servings)
        .bind(&recipe.source_url)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(recipe_id = %recipe.id, "recipe updated successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(recipe_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        tracing::debug!("deleting recipe");

        let result = sqlx::query(
            r#"
            DELETE FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(recipe_id = %id, "recipe deleted successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(?search))]
    async fn search(&self, search: Option<String>) -> Result<Vec<RecipeSummaryRow>, RepositoryError> {
        tracing::debug!("searching recipes");

        let rows = sqlx::query_as::<_, RecipeSummaryRow>(
            r#"
            SELECT r.id, r.title, r.description, u.username AS publisher,
                   r.ingredients, r.instructions, r.image_url, r.cooking_time,
                   r.servings, r.source_url, r.is_ai_generated, r.created_at
            FROM recipes r
            LEFT JOIN users u ON u.id = r.creator_id
            WHERE $1::text IS NULL
               OR r.title ILIKE '%' || $1 || '%'
               OR r.description ILIKE '%' || $1 || '%'
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(search.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = rows.len(), "recipes found");
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(recipe_id = %id))]
    async fn find_summary_by_id(&self, id: Uuid) -> Result<Option<RecipeSummaryRow>, RepositoryError> {
        tracing::debug!("finding recipe summary by id");

        let row = sqlx::query_as::<_, RecipeSummaryRow>(
            r#"
            SELECT r.id, r.title, r.description, u.username AS publisher,
                   r.ingredients, r.instructions, r.image_url, r.cooking_time,
                   r.servings, r.source_url, r.is_ai_generated, r.created_at
            FROM recipes r
            LEFT JOIN users u ON u.id = r.creator_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(row)
    }
}

pub struct PostgresBookmarkRepository {
    pool: PgPool,
}

impl PostgresBookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BookmarkRepository for PostgresBookmarkRepository {
    #[tracing::instrument(skip(self, bookmark), fields(bookmark_id = %bookmark.id, user_id = %bookmark.user_id, recipe_id = %bookmark.recipe_id))]
    async fn create(&self, bookmark: &Bookmark) -> Result<(), RepositoryError> {
        tracing::debug!("creating bookmark");

        // The unique (user_id, recipe_id) index resolves concurrent inserts
        // for the same pair: one row wins, the loser surfaces as Conflict.
        sqlx::query(
            r#"
            INSERT INTO bookmarks (id, user_id, recipe_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(bookmark.id)
        .bind(bookmark.user_id)
        .bind(bookmark.recipe_id)
        .bind(bookmark.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;

        tracing::debug!(bookmark_id = %bookmark.id, "bookmark created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    async fn find_by_user_and_recipe(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Option<Bookmark>, RepositoryError> {
        tracing::debug!("finding bookmark by user and recipe");

        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, recipe_id, created_at
            FROM bookmarks
            WHERE user_id = $1 AND recipe_id = $2
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(bookmark)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    async fn delete_by_user_and_recipe(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<(), RepositoryError> {
        tracing::debug!("deleting bookmark");

        let result = sqlx::query(
            r#"
            DELETE FROM bookmarks
            WHERE user_id = $1 AND recipe_id = $2
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!("bookmark deleted successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Bookmark>, RepositoryError> {
        tracing::debug!("finding bookmarks by user_id");

        let bookmarks = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, recipe_id, created_at
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(user_id = %user_id, count = bookmarks.len(), "found bookmarks");
        Ok(bookmarks)
    }
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
