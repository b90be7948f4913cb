mod config;
mod delivery;
mod domain;
mod repository;
mod usecase;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post, put},
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

use crate::delivery::http::v1::ai::{generate_image, generate_recipe, recommendations, substitutions};
use crate::delivery::http::v1::auth::{get_profile, login, refresh_token, register};
use crate::delivery::http::v1::bookmarks::{add_bookmark, check_bookmark, list_bookmarks, remove_bookmark};
use crate::delivery::http::v1::middleware::auth_middleware;
use crate::delivery::http::v1::recipes::{create_recipe, delete_recipe, get_recipe, search_recipes, update_recipe};
use crate::repository::postgres::{
    PostgresBookmarkRepository, PostgresRecipeRepository, PostgresUserRepository, create_pool,
};
use crate::usecase::ai::AiUseCase;
use crate::usecase::auth::AuthUseCase;
use crate::usecase::bookmarks::BookmarksUseCase;
use crate::usecase::jwt::JwtService;
use crate::usecase::openai::OpenAIClient;
use crate::usecase::recipe_provider::RecipeProviderClient;
use crate::usecase::recipes::RecipesUseCase;
use crate::usecase::resolve::RecipeResolver;

pub struct AppState {
    pub auth_usecase: AuthUseCase<PostgresUserRepository>,
    pub recipes_usecase: RecipesUseCase<PostgresRecipeRepository>,
    pub bookmarks_usecase: BookmarksUseCase<PostgresBookmarkRepository, PostgresRecipeRepository>,
    pub recipe_resolver: RecipeResolver<PostgresRecipeRepository>,
    pub ai_usecase: AiUseCase,
    pub recipe_provider: RecipeProviderClient,
    pub jwt_service: JwtService,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::AppConfig::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer());

    tracing::subscriber::set_global_default(subscriber)?;
    tracing::info!("starting the recipehub service");

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");
    metrics_process::Collector::default().describe();
    tracing::info!("prometheus metrics initialized");

    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .expect("failed to create database pool");
    tracing::info!("database pool created");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("database migrations applied");

    let jwt_service = JwtService::new(
        config.jwt_secret.clone(),
        config.jwt_access_token_minutes,
        config.jwt_refresh_token_days,
    );
    let recipe_provider = RecipeProviderClient::new(config.recipe_api_url.clone());
    let openai_client = OpenAIClient::new(
        config.openai_api_url.clone(),
        config.openai_model.clone(),
        config.openai_image_model.clone(),
        config.openai_api_key.clone(),
    );

    let auth_usecase = AuthUseCase::new(
        PostgresUserRepository::new(pool.clone()),
        jwt_service.clone(),
    );
    let recipes_usecase = RecipesUseCase::new(PostgresRecipeRepository::new(pool.clone()));
    let bookmarks_usecase = BookmarksUseCase::new(
        PostgresBookmarkRepository::new(pool.clone()),
        PostgresRecipeRepository::new(pool.clone()),
    );
    let recipe_resolver = RecipeResolver::new(
        PostgresRecipeRepository::new(pool.clone()),
        recipe_provider.clone(),
    );
    let ai_usecase = AiUseCase::new(openai_client, recipe_provider.clone());

    let shared_state = Arc::new(AppState {
        auth_usecase,
        recipes_usecase,
        bookmarks_usecase,
        recipe_resolver,
        ai_usecase,
        recipe_provider,
        jwt_service,
        metrics_handle,
    });

    let protected_api = Router::new()
        .route("/api/v1/auth/profile", get(get_profile))
        .route("/api/v1/recipes", post(create_recipe))
        .route(
            "/api/v1/recipes/{id}",
            put(update_recipe).delete(delete_recipe),
        )
        .route(
            "/api/v1/bookmarks",
            get(list_bookmarks).post(add_bookmark),
        )
        .route("/api/v1/bookmarks/check/{recipe_id}", get(check_bookmark))
        .route(
            "/api/v1/bookmarks/{recipe_id}",
            axum::routing::delete(remove_bookmark),
        )
        .route("/api/v1/ai/generate-recipe", post(generate_recipe))
        .route("/api/v1/ai/recommendations", post(recommendations))
        .route("/api/v1/ai/substitutions", post(substitutions))
        .route("/api/v1/ai/generate-image", post(generate_image))
        .layer(middleware::from_fn_with_state(
            shared_state.clone(),
            auth_middleware,
        ));

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh", post(refresh_token))
        .route("/api/v1/recipes", get(search_recipes))
        .route("/api/v1/recipes/{id}", get(get_recipe))
        .merge(protected_api)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("recipehub service running on 0.0.0.0:8080");
    axum::serve(listener, router).await?;

    Ok(())
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    metrics_process::Collector::default().collect();
    state.metrics_handle.render()
}

#[tracing::instrument]
async fn healthz() -> &'static str {
    "OK"
}
