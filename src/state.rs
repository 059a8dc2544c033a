//! Shared application state for all routes.

use crate::service::PersonService;
use crate::sql::Tables;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tables: Tables,
    pub persons: PersonService,
}

impl AppState {
    pub fn new(pool: PgPool, tables: Tables) -> Self {
        let persons = PersonService::new(pool.clone(), tables.clone());
        AppState {
            pool,
            tables,
            persons,
        }
    }
}
