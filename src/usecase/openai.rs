use std::time::Duration;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OpenAIChatRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChatResponse {
    pub choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAIResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpenAIImageRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub quality: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIImageResponse {
    pub data: Vec<OpenAIImageData>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIImageData {
    pub url: String,
}

#[derive(Clone)]
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    image_model: String,
    api_key: String,
}

impl OpenAIClient {
    pub fn new(base_url: String, model: String, image_model: String, api_key: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");

        tracing::info!(%base_url, %model, %image_model, "OpenAI client created");

        Self {
            http_client,
            base_url,
            model,
            image_model,
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn chat(&self, request: OpenAIChatRequest) -> anyhow::Result<OpenAIChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(%url, model = %request.model, messages_count = request.messages.len(), "sending chat request to OpenAI");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to send request to OpenAI");
                anyhow!("OpenAI request failed: {}", e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read OpenAI response");
            anyhow!("Failed to read OpenAI response: {}", e)
        })?;

        if !status.is_success() {
            tracing::error!(%status, %body, "OpenAI returned error");
            return Err(anyhow!("OpenAI error ({}): {}", status, body));
        }

        serde_json::from_str::<OpenAIChatResponse>(&body).map_err(|e| {
            tracing::error!(error = %e, %body, "failed to parse OpenAI response");
            anyhow!("Failed to parse OpenAI response: {}", e)
        })
    }

    pub async fn generate_image(&self, prompt: String) -> anyhow::Result<String> {
        let url = format!("{}/images/generations", self.base_url);
        tracing::debug!(%url, model = %self.image_model, "sending image request to OpenAI");

        let request = OpenAIImageRequest {
            model: self.image_model.clone(),
            prompt,
            n: 1,
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to send request to OpenAI");
                anyhow!("OpenAI request failed: {}", e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read OpenAI response");
            anyhow!("Failed to read OpenAI response: {}", e)
        })?;

        if !status.is_success() {
            tracing::error!(%status, %body, "OpenAI returned error");
            return Err(anyhow!("OpenAI error ({}): {}", status, body));
        }

        let parsed = serde_json::from_str::<OpenAIImageResponse>(&body).map_err(|e| {
            tracing::error!(error = %e, %body, "failed to parse OpenAI response");
            anyhow!("Failed to parse OpenAI response: {}", e)
        })?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.url)
            .ok_or_else(|| anyhow!("OpenAI returned no image data"))
    }
}
