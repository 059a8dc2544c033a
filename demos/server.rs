//! Person API server: reads settings from the environment (and `.env`), ensures the database
//! and tables exist, then serves the person routes plus health, readiness and OpenAPI.

use person_api::{app, apply_migrations, connect_pool, ensure_database_exists, AppState, Settings, Tables};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("person_api=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = connect_pool(&settings).await?;

    let tables = Tables::new(&settings.schema);
    apply_migrations(&pool, &tables).await?;
    let state = AppState::new(pool, tables);

    let listener = TcpListener::bind(settings.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, settings.body_limit)).await?;
    Ok(())
}
