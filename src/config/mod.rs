use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    #[serde(default = "default_jwt_access_token_minutes")]
    pub jwt_access_token_minutes: i64,
    #[serde(default = "default_jwt_refresh_token_days")]
    pub jwt_refresh_token_days: i64,
    #[serde(default = "default_recipe_api_url")]
    pub recipe_api_url: String,
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,
    pub openai_api_key: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_openai_image_model")]
    pub openai_image_model: String,
}

fn default_jwt_access_token_minutes() -> i64 {
    15
}

fn default_jwt_refresh_token_days() -> i64 {
    30
}

fn default_recipe_api_url() -> String {
    "https://forkify-api.herokuapp.com/api/v2/recipes".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_image_model() -> String {
    "dall-e-3".to_string()
}

impl AppConfig {
    pub fn from_env() -> Self {
        Config::builder()
            .set_default("database_max_connections", 5)
            .unwrap()
            .add_source(Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
