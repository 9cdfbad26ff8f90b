use passwordin::app::{AppState, app_router};
use passwordin::core::auth::JwtService;
use passwordin::core::config::Config;
use passwordin::core::db::{DbConfig, create_pool_with_migrations};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("passwordin=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    let db_config = DbConfig::from_env();
    let jwt_service = JwtService::from_env()?;

    tracing::info!(
        "Config loaded: listen_addr={}, hash_cost={}",
        config.listen_addr,
        config.password_hash_cost
    );

    let pool = create_pool_with_migrations(&db_config).await?;
    let state = AppState::new(pool, jwt_service, config.password_hash_cost);
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
