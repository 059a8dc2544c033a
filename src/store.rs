//! Database bootstrap: create the target database if missing and open the pool.

use crate::config::Settings;
use crate::error::{AppError, ConfigError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const MAINTENANCE_DB: &str = "postgres";
const DUPLICATE_DATABASE: &str = "42P04";

/// Target database named by `database_url`, plus options for the maintenance
/// database on the same server. `None` when the url already names the maintenance db.
fn bootstrap_target(database_url: &str) -> Result<Option<(PgConnectOptions, String)>, AppError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|e| ConfigError::Invalid {
        key: "DATABASE_URL",
        reason: e.to_string(),
    })?;
    let name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != MAINTENANCE_DB => name.to_string(),
        _ => return Ok(None),
    };
    Ok(Some((opts.database(MAINTENANCE_DB), name)))
}

/// Create the database named in `database_url` when the server does not have it yet.
/// Run once at startup, before [`connect_pool`].
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin, name)) = bootstrap_target(database_url)? else {
        return Ok(());
    };
    let mut conn = admin.connect().await?;
    let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&name)
        .fetch_optional(&mut conn)
        .await?;
    if found.is_some() {
        return Ok(());
    }
    tracing::info!(database = %name, "creating database");
    let created = sqlx::query(&format!("CREATE DATABASE \"{}\"", name.replace('"', "\"\"")))
        .execute(&mut conn)
        .await;
    match created {
        Ok(_) => Ok(()),
        // Another instance created it between the lookup and the CREATE.
        Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(DUPLICATE_DATABASE) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Open the shared pool. Each request checks out its own connection from it.
pub async fn connect_pool(settings: &Settings) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;
    Ok(pool)
}
