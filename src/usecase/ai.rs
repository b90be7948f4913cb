use serde::{Deserialize, Serialize};

use crate::domain::recipe::Ingredient;
use crate::usecase::error::UsecaseError;
use crate::usecase::openai::{OpenAIChatRequest, OpenAIClient, OpenAIMessage, ResponseFormat};
use crate::usecase::recipe_provider::RecipeProviderClient;

const CHEF_SYSTEM_PROMPT: &str = "You are a professional chef. You must respond ONLY with valid JSON \
without any additional text, comments or explanations. The JSON must strictly follow the specified structure.";

const MAX_RECOMMENDATIONS: usize = 5;

/// Recipe shape the LLM is asked to produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecipe {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
    pub name: String,
    pub ratio: String,
}

#[derive(Debug, Deserialize)]
struct SubstitutionsEnvelope {
    substitutions: Vec<Substitution>,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationPrefs {
    pub dietary_restrictions: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub cooking_time: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedRecipe {
    pub id: String,
    pub name: String,
    pub publisher: String,
    pub ingredients: Vec<Ingredient>,
    pub image: Option<String>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub source_url: String,
}

pub struct AiUseCase {
    openai: OpenAIClient,
    recipe_provider: RecipeProviderClient,
}

impl AiUseCase {
    pub fn new(openai: OpenAIClient, recipe_provider: RecipeProviderClient) -> Self {
        Self {
            openai,
            recipe_provider,
        }
    }

    #[tracing::instrument(skip(self, ingredients), fields(ingredient_count = ingredients.len()))]
    pub async fn generate_recipe(
        &self,
        ingredients: Vec<String>,
    ) -> Result<GeneratedRecipe, UsecaseError> {
        tracing::debug!("generating recipe");

        let user_prompt = format!(
            r#"Create a detailed recipe using these ingredients: {}.
Respond with ONLY a JSON object in this exact structure (no comments or explanations):
{{
  "name": "Recipe Name",
  "ingredients": [
    {{
      "quantity": 1,
      "unit": "cup",
      "description": "ingredient description"
    }}
  ],
  "instructions": [
    "Step 1: Detailed cooking instruction",
    "Step 2: Detailed cooking instruction"
  ],
  "cookTime": 30,
  "servings": 4
}}"#,
            ingredients.join(", ")
        );

        let content = self.chat_json(user_prompt).await?;
        let recipe = serde_json::from_str::<GeneratedRecipe>(&content).map_err(|e| {
            tracing::error!(error = %e, %content, "failed to parse generated recipe");
            UsecaseError::Upstream(format!("Failed to parse recipe data: {e}"))
        })?;

        metrics::counter!("ai_recipes_generated_total").increment(1);
        tracing::info!(name = %recipe.name, "recipe generated");
        Ok(recipe)
    }

    /// Unweighted pass over provider results: optional cooking-time
    /// threshold, then the first few entries. No ranking.
    #[tracing::instrument(skip(self, prefs))]
    pub async fn recommendations(
        &self,
        prefs: RecommendationPrefs,
    ) -> Result<Vec<RecommendedRecipe>, UsecaseError> {
        tracing::debug!("building recommendations");

        let recipes = self
            .recipe_provider
            .search("")
            .await
            .map_err(|e| UsecaseError::Upstream(e.to_string()))?;

        let max_time = cooking_time_threshold(prefs.cooking_time.as_deref());
        let recommendations: Vec<RecommendedRecipe> = recipes
            .into_iter()
            .filter(|recipe| match max_time {
                Some(max) => recipe.cooking_time.is_some_and(|t| t <= max),
                None => true,
            })
            .take(MAX_RECOMMENDATIONS)
            .map(|recipe| RecommendedRecipe {
                id: recipe.id,
                name: recipe.title,
                publisher: recipe.publisher.unwrap_or_default(),
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
                image: recipe.image_url,
                cook_time: recipe.cooking_time,
                servings: recipe.servings,
                source_url: recipe.source_url.unwrap_or_default(),
            })
            .collect();

        tracing::debug!(count = recommendations.len(), "recommendations built");
        Ok(recommendations)
    }

    #[tracing::instrument(skip(self), fields(ingredient = %ingredient))]
    pub async fn substitutions(
        &self,
        ingredient: String,
    ) -> Result<Vec<Substitution>, UsecaseError> {
        tracing::debug!("requesting substitutions");

        let user_prompt = format!(
            r#"List cooking substitutions for "{ingredient}".
Respond with ONLY a JSON object in this exact structure (no comments or explanations):
{{
  "substitutions": [
    {{"name": "Substitute name", "ratio": "1:1"}}
  ]
}}"#
        );

        let content = self.chat_json(user_prompt).await?;
        let envelope = serde_json::from_str::<SubstitutionsEnvelope>(&content).map_err(|e| {
            tracing::error!(error = %e, %content, "failed to parse substitutions");
            UsecaseError::Upstream(format!("Failed to parse substitution data: {e}"))
        })?;

        Ok(envelope.substitutions)
    }

    #[tracing::instrument(skip(self), fields(recipe_name = %recipe_name))]
    pub async fn generate_image(&self, recipe_name: String) -> Result<String, UsecaseError> {
        tracing::debug!("generating recipe image");

        let prompt = format!(
            "A professional, appetizing food photography style image of {recipe_name}. \
The image should be well-lit, showing the dish from a top-down or 45-degree angle \
on a clean, minimal background. No text or watermarks."
        );

        let url = self
            .openai
            .generate_image(prompt)
            .await
            .map_err(|e| UsecaseError::Upstream(e.to_string()))?;

        tracing::info!("recipe image generated");
        Ok(url)
    }

    async fn chat_json(&self, user_prompt: String) -> Result<String, UsecaseError> {
        let request = OpenAIChatRequest {
            model: self.openai.model().to_string(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: CHEF_SYSTEM_PROMPT.to_string(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
            temperature: Some(0.7),
            max_tokens: Some(1000),
            response_format: Some(ResponseFormat::json_object()),
        };

        let response = self
            .openai
            .chat(request)
            .await
            .map_err(|e| UsecaseError::Upstream(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| UsecaseError::Upstream("LLM returned no content".to_string()))
    }
}

fn cooking_time_threshold(cooking_time: Option<&str>) -> Option<i32> {
    match cooking_time {
        None | Some("any") => None,
        Some("quick (< 30 min)") => Some(30),
        Some("medium (30-60 min)") => Some(60),
        Some(_) => Some(120),
    }
}
