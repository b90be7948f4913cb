use std::time::Duration;

use anyhow::anyhow;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderIngredient {
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub description: Option<String>,
}

/// Recipe shape returned by the external provider API.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRecipe {
    pub id: String,
    pub title: String,
    pub publisher: Option<String>,
    pub image_url: Option<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Option<Vec<ProviderIngredient>>,
    pub source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    recipes: Vec<ProviderRecipe>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    data: SearchData,
}

#[derive(Debug, Deserialize)]
struct DetailData {
    recipe: ProviderRecipe,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    data: DetailData,
}

#[derive(Clone)]
pub struct RecipeProviderClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl RecipeProviderClient {
    pub fn new(base_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("RecipeHub/1.0")
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build recipe provider http client");

        tracing::info!(%base_url, "recipe provider client created");

        Self {
            http_client,
            base_url,
        }
    }

    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<ProviderRecipe>> {
        tracing::debug!(%query, "searching recipe provider");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("search", query)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "recipe provider request failed");
                anyhow!("Recipe provider request failed: {}", e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read recipe provider response");
            anyhow!("Failed to read recipe provider response: {}", e)
        })?;

        if !status.is_success() {
            tracing::error!(%status, %body, "recipe provider returned error");
            return Err(anyhow!("Recipe provider error ({}): {}", status, body));
        }

        let envelope = serde_json::from_str::<SearchEnvelope>(&body).map_err(|e| {
            tracing::error!(error = %e, %body, "failed to parse recipe provider response");
            anyhow!("Failed to parse recipe provider response: {}", e)
        })?;

        tracing::debug!(count = envelope.data.recipes.len(), "recipe provider search done");
        Ok(envelope.data.recipes)
    }

    /// Fetches a recipe detail by provider id. An absent recipe is
    /// `Ok(None)`; transport and shape failures are errors.
    pub async fn fetch_recipe(&self, id: &str) -> anyhow::Result<Option<ProviderRecipe>> {
        let url = format!("{}/{}", self.base_url, id);
        tracing::debug!(%url, "fetching recipe detail from provider");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "recipe provider request failed");
            anyhow!("Recipe provider request failed: {}", e)
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%id, "recipe not found at provider");
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read recipe provider response");
            anyhow!("Failed to read recipe provider response: {}", e)
        })?;

        if !status.is_success() {
            tracing::error!(%status, %body, "recipe provider returned error");
            return Err(anyhow!("Recipe provider error ({}): {}", status, body));
        }

        let envelope = serde_json::from_str::<DetailEnvelope>(&body).map_err(|e| {
            tracing::error!(error = %e, %body, "failed to parse recipe provider response");
            anyhow!("Failed to parse recipe provider response: {}", e)
        })?;

        Ok(Some(envelope.data.recipe))
    }
}
