//! DDL for the persons/addresses schema. Idempotent; safe to run on every start.
//! Order follows PostgreSQL dependencies: schema, addresses, persons (FK to addresses), indexes.

use crate::error::AppError;
use crate::sql::Tables;
use sqlx::PgPool;

/// Statements in execution order for the given tables.
pub fn migration_statements(tables: &Tables) -> Vec<String> {
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", tables.schema),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
  "id" SERIAL PRIMARY KEY,
  "country" TEXT NOT NULL,
  "city" TEXT NOT NULL
)"#,
            tables.addresses
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
  "id" SERIAL PRIMARY KEY,
  "first_name" TEXT NOT NULL,
  "last_name" TEXT NOT NULL,
  "age" INTEGER NOT NULL CONSTRAINT "persons_age_check" CHECK ("age" >= 18),
  "email" TEXT NOT NULL CONSTRAINT "persons_email_key" UNIQUE,
  "address_id" INTEGER NOT NULL CONSTRAINT "persons_address_id_fkey" REFERENCES {} ("id")
)"#,
            tables.persons, tables.addresses
        ),
        format!(
            r#"CREATE INDEX IF NOT EXISTS "addresses_city_idx" ON {} ("city")"#,
            tables.addresses
        ),
        format!(
            r#"CREATE INDEX IF NOT EXISTS "persons_address_id_idx" ON {} ("address_id")"#,
            tables.persons
        ),
    ]
}

/// Create the schema, both tables, and their indexes if missing.
pub async fn apply_migrations(pool: &PgPool, tables: &Tables) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for sql in migration_statements(tables) {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(schema = %tables.schema, "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_created_before_persons() {
        let stmts = migration_statements(&Tables::new("crm"));
        let addr = stmts.iter().position(|s| s.contains("TABLE IF NOT EXISTS \"crm\".\"addresses\"")).unwrap();
        let pers = stmts.iter().position(|s| s.contains("TABLE IF NOT EXISTS \"crm\".\"persons\"")).unwrap();
        assert_eq!(stmts[0], "CREATE SCHEMA IF NOT EXISTS \"crm\"");
        assert!(addr < pers);
    }

    #[test]
    fn persons_table_guards_email_and_age_in_storage() {
        let stmts = migration_statements(&Tables::new("public"));
        let persons = stmts.iter().find(|s| s.contains("\"public\".\"persons\" (")).unwrap();
        assert!(persons.contains("\"persons_email_key\" UNIQUE"));
        assert!(persons.contains("CHECK (\"age\" >= 18)"));
        assert!(persons.contains("REFERENCES \"public\".\"addresses\" (\"id\")"));
    }
}
