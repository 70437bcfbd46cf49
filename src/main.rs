use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use user_api::{
    auth::TokenService,
    config::Config,
    create_router, db,
    users::{InMemoryUserRepository, PgUserRepository, UserRepository, UserService},
    AppState,
};

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("User API - Starting...");

    // Reads .env first, if present
    let config = Config::from_env().expect("Invalid configuration");

    let repository: Arc<dyn UserRepository> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(database_url)
                .await
                .expect("Failed to create database pool");
            db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            Arc::new(PgUserRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let state = AppState::new(
        UserService::new(repository),
        TokenService::new(config.jwt_secret.clone(), config.jwt_expires_in),
        config.cookie_config(),
    );

    let app = create_router(state).layer(config.cors_layer());

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("User API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
