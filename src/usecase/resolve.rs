use uuid::Uuid;

use crate::domain::recipe::{Ingredient, Recipe, RecipeDraft, RecipeRef};
use crate::usecase::contracts::RecipeRepository;
use crate::usecase::error::UsecaseError;
use crate::usecase::recipe_provider::{ProviderRecipe, RecipeProviderClient};

/// Maps any bookmark target onto exactly one durable local recipe id.
///
/// A `Local` ref is returned unchanged (no write). An `AiGenerated` ref is
/// persisted on first resolution; the caller holds a `Local` ref from then
/// on, so resolving the same recipe again is a read. An `External` ref is
/// mirrored from the provider into the local store. External mirroring is
/// per-resolution: the same provider id resolved again from scratch gets a
/// fresh local record.
pub struct RecipeResolver<R>
where
    R: RecipeRepository,
{
    recipe_repository: R,
    provider: RecipeProviderClient,
}

impl<R> RecipeResolver<R>
where
    R: RecipeRepository,
{
    pub fn new(recipe_repository: R, provider: RecipeProviderClient) -> Self {
        Self {
            recipe_repository,
            provider,
        }
    }

    #[tracing::instrument(skip(self, recipe_ref), fields(user_id = %user_id))]
    pub async fn resolve_local_id(
        &self,
        user_id: Uuid,
        recipe_ref: RecipeRef,
    ) -> Result<Uuid, UsecaseError> {
        match recipe_ref {
            RecipeRef::Local { id } => {
                tracing::debug!(recipe_id = %id, "resolving local ref");

                self.recipe_repository
                    .find_by_id(id)
                    .await?
                    .map(|recipe| recipe.id)
                    .ok_or_else(|| UsecaseError::NotFound("Recipe".to_string()))
            }
            RecipeRef::AiGenerated { recipe: draft } => {
                tracing::debug!(title = %draft.title, "resolving AI-generated ref");

                draft.validate(true).map_err(UsecaseError::Validation)?;
                let recipe = Recipe::from_draft(draft, user_id, true);
                self.recipe_repository.create(&recipe).await?;

                tracing::info!(recipe_id = %recipe.id, "AI-generated recipe persisted");
                Ok(recipe.id)
            }
            RecipeRef::External { id } => {
                tracing::debug!(external_id = %id, "resolving external ref");

                let provider_recipe = self
                    .provider
                    .fetch_recipe(&id)
                    .await
                    .map_err(|e| UsecaseError::Upstream(e.to_string()))?
                    .ok_or_else(|| UsecaseError::NotFound("Recipe".to_string()))?;

                let recipe =
                    Recipe::from_draft(draft_from_provider(provider_recipe), user_id, false);
                self.recipe_repository.create(&recipe).await?;

                tracing::info!(recipe_id = %recipe.id, external_id = %id, "external recipe mirrored");
                Ok(recipe.id)
            }
        }
    }
}

fn draft_from_provider(recipe: ProviderRecipe) -> RecipeDraft {
    let ingredients = recipe
        .ingredients
        .unwrap_or_default()
        .into_iter()
        .map(|i| Ingredient {
            quantity: i.quantity,
            unit: i.unit,
            description: i.description.unwrap_or_default(),
        })
        .collect();

    RecipeDraft {
        // Provider records carry no description; the title stands in so
        // the mirrored recipe still shows up in description searches.
        description: Some(recipe.title.clone()),
        title: recipe.title,
        ingredients,
        instructions: Vec::new(),
        image_url: recipe.image_url,
        cooking_time: recipe.cooking_time,
        servings: recipe.servings,
        source_url: recipe.source_url,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::usecase::contracts::MockRecipeRepository;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dummy_provider() -> RecipeProviderClient {
        RecipeProviderClient::new("http://localhost:0/recipes".to_string())
    }

    fn ai_draft() -> RecipeDraft {
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
        }
    }

    #[tokio::test]
    async fn test_local_ref_fast_path_performs_no_write() {
        let recipe = Recipe::from_draft(ai_draft(), Uuid::new_v4(), true);
        let recipe_id = recipe.id;

        let mut mock_repo = MockRecipeRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(mockall::predicate::eq(recipe_id))
            .times(1)
            .returning(move |_| Ok(Some(recipe.clone())));
        // No expect_create: a resolved ref must not be written again.

        let resolver = RecipeResolver::new(mock_repo, dummy_provider());
        let resolved = resolver
            .resolve_local_id(Uuid::new_v4(), RecipeRef::Local { id: recipe_id })
            .await
            .unwrap();

        assert_eq!(resolved, recipe_id);
    }

    #[tokio::test]
    async fn test_local_ref_missing_record_not_found() {
        let mut mock_repo = MockRecipeRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let resolver = RecipeResolver::new(mock_repo, dummy_provider());
        let result = resolver
            .resolve_local_id(Uuid::new_v4(), RecipeRef::Local { id: Uuid::new_v4() })
            .await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ai_ref_persists_once_then_resolves_stably() {
        let user_id = Uuid::new_v4();
        let stored: Arc<Mutex<Option<Recipe>>> = Arc::new(Mutex::new(None));

        let mut mock_repo = MockRecipeRepository::new();
        let sink = stored.clone();
        mock_repo.expect_create().times(1).returning(move |recipe| {
            *sink.lock().unwrap() = Some(recipe.clone());
            Ok(())
        });
        let source = stored.clone();
        mock_repo.expect_find_by_id().returning(move |id| {
            Ok(source
                .lock()
                .unwrap()
                .clone()
                .filter(|recipe| recipe.id == id))
        });

        let resolver = RecipeResolver::new(mock_repo, dummy_provider());

        let first = resolver
            .resolve_local_id(user_id, RecipeRef::AiGenerated { recipe: ai_draft() })
            .await
            .unwrap();

        // After the first resolution the client holds a Local ref; a second
        // resolution must return the same id without a second record.
        let second = resolver
            .resolve_local_id(user_id, RecipeRef::Local { id: first })
            .await
            .unwrap();

        assert_eq!(first, second);
        let persisted = stored.lock().unwrap().clone().unwrap();
        assert_eq!(persisted.creator_id, user_id);
        assert!(persisted.is_ai_generated);
    }

    #[tokio::test]
    async fn test_ai_ref_invalid_draft_rejected_before_write() {
        let mock_repo = MockRecipeRepository::new();

        let mut draft = ai_draft();
        draft.instructions.clear();

        let resolver = RecipeResolver::new(mock_repo, dummy_provider());
        let result = resolver
            .resolve_local_id(Uuid::new_v4(), RecipeRef::AiGenerated { recipe: draft })
            .await;

        assert!(matches!(result, Err(UsecaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_external_ref_mirrors_provider_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes/5ed6604591c37cdc054bc886"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "recipe": {
                        "id": "5ed6604591c37cdc054bc886",
                        "title": "Pasta carbonara",
                        "publisher": "Closet Cooking",
                        "image_url": "http://example.com/pasta.jpg",
                        "cooking_time": 45,
                        "servings": 4,
                        "ingredients": [
                            {"quantity": 200.0, "unit": "g", "description": "spaghetti"}
                        ],
                        "source_url": "http://example.com/pasta"
                    }
                }
            })))
            .mount(&server)
            .await;

        let stored: Arc<Mutex<Option<Recipe>>> = Arc::new(Mutex::new(None));
        let mut mock_repo = MockRecipeRepository::new();
        let sink = stored.clone();
        mock_repo.expect_create().times(1).returning(move |recipe| {
            *sink.lock().unwrap() = Some(recipe.clone());
            Ok(())
        });

        let provider = RecipeProviderClient::new(format!("{}/recipes", server.uri()));
        let resolver = RecipeResolver::new(mock_repo, provider);
        let user_id = Uuid::new_v4();

        let id = resolver
            .resolve_local_id(
                user_id,
                RecipeRef::External {
                    id: "5ed6604591c37cdc054bc886".to_string(),
                },
            )
            .await
            .unwrap();

        let persisted = stored.lock().unwrap().clone().unwrap();
        assert_eq!(persisted.id, id);
        assert_eq!(persisted.title, "Pasta carbonara");
        assert_eq!(persisted.creator_id, user_id);
        assert!(!persisted.is_ai_generated);
        assert_eq!(persisted.source_url.as_deref(), Some("http://example.com/pasta"));
        assert_eq!(persisted.ingredients[0].description, "spaghetti");
    }

    #[tokio::test]
    async fn test_external_ref_absent_at_provider_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mock_repo = MockRecipeRepository::new();
        let provider = RecipeProviderClient::new(format!("{}/recipes", server.uri()));
        let resolver = RecipeResolver::new(mock_repo, provider);

        let result = resolver
            .resolve_local_id(
                Uuid::new_v4(),
                RecipeRef::External {
                    id: "missing".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_external_ref_provider_failure_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let mock_repo = MockRecipeRepository::new();
        let provider = RecipeProviderClient::new(format!("{}/recipes", server.uri()));
        let resolver = RecipeResolver::new(mock_repo, provider);

        let result = resolver
            .resolve_local_id(
                Uuid::new_v4(),
                RecipeRef::External {
                    id: "whatever".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(UsecaseError::Upstream(_))));
    }
}
