//! Person writes. Each operation runs in one transaction spanning both tables.

use crate::error::{AppError, FieldError};
use crate::model::{Address, Person};
use crate::service::validation::{PersonValidator, MSG_AGE_MINIMUM, MSG_EMAIL_TAKEN};
use crate::sql::{
    delete_address, delete_person, insert_address, insert_person, lock_person, update_address,
    update_person, Tables,
};
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};

const EMAIL_UNIQUE_CONSTRAINT: &str = "persons_email_key";
const AGE_CHECK_CONSTRAINT: &str = "persons_age_check";

#[derive(Clone, Debug)]
pub struct PersonService {
    pool: PgPool,
    tables: Tables,
    validator: PersonValidator,
}

impl PersonService {
    pub fn new(pool: PgPool, tables: Tables) -> Self {
        let validator = PersonValidator::new(tables.clone());
        PersonService {
            pool,
            tables,
            validator,
        }
    }

    pub fn validator(&self) -> &PersonValidator {
        &self.validator
    }

    /// Insert the address, then the person pointing at it. Input ids are ignored;
    /// the returned person carries the generated ones.
    pub async fn create(&self, input: &Person) -> Result<Person, AppError> {
        let mut person = normalized(input);
        let mut tx = self.pool.begin().await?;
        let result = self.create_in(&mut tx, &mut person).await;
        match result {
            Ok(()) => {
                tx.commit().await.map_err(write_error)?;
                tracing::info!(person_id = person.id, address_id = person.address_id, "person created");
                Ok(person)
            }
            Err(e) => Err(rollback(tx, e, "create").await),
        }
    }

    /// Replace the scalar fields and the address of an existing person. The
    /// address row is the one the stored person already references.
    pub async fn update(&self, id: i32, input: &Person) -> Result<Person, AppError> {
        let mut person = normalized(input);
        let mut tx = self.pool.begin().await?;
        let result = self.update_in(&mut tx, id, &mut person).await;
        match result {
            Ok(()) => {
                tx.commit().await.map_err(write_error)?;
                tracing::info!(person_id = id, "person updated");
                Ok(person)
            }
            Err(e) => Err(rollback(tx, e, "update").await),
        }
    }

    /// Remove a person and the address it references.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let result = self.delete_in(&mut tx, id).await;
        match result {
            Ok(address_id) => {
                tx.commit().await?;
                tracing::info!(person_id = id, address_id, "person deleted");
                Ok(())
            }
            Err(e) => Err(rollback(tx, e, "delete").await),
        }
    }

    async fn create_in(&self, conn: &mut PgConnection, person: &mut Person) -> Result<(), AppError> {
        self.validator.validate(&mut *conn, person, None).await?;
        let row = insert_address(&self.tables, &person.person_address)
            .query()
            .fetch_one(&mut *conn)
            .await
            .map_err(write_error)?;
        let address_id: i32 = row.try_get("id")?;
        let row = insert_person(&self.tables, person, address_id)
            .query()
            .fetch_one(&mut *conn)
            .await
            .map_err(write_error)?;
        person.id = row.try_get("id")?;
        person.address_id = address_id;
        person.person_address.id = address_id;
        Ok(())
    }

    async fn update_in(&self, conn: &mut PgConnection, id: i32, person: &mut Person) -> Result<(), AppError> {
        let address_id = self
            .locked_address_id(conn, id)
            .await?
            .ok_or_else(|| AppError::MissingTarget(format!("There is no any person by ID: {} to update!", id)))?;
        self.validator.validate(&mut *conn, person, Some(id)).await?;
        update_person(&self.tables, id, person)
            .query()
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        update_address(&self.tables, address_id, &person.person_address)
            .query()
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        person.id = id;
        person.address_id = address_id;
        person.person_address.id = address_id;
        Ok(())
    }

    async fn delete_in(&self, conn: &mut PgConnection, id: i32) -> Result<i32, AppError> {
        let address_id = self
            .locked_address_id(conn, id)
            .await?
            .ok_or_else(|| AppError::MissingTarget(format!("There is no any person by ID: {} to delete!", id)))?;
        delete_person(&self.tables, id).query().execute(&mut *conn).await?;
        delete_address(&self.tables, address_id).query().execute(&mut *conn).await?;
        Ok(address_id)
    }

    /// Lock the person row and return the address id it references, if the person exists.
    async fn locked_address_id(&self, conn: &mut PgConnection, id: i32) -> Result<Option<i32>, AppError> {
        let row = lock_person(&self.tables, id).query().fetch_optional(&mut *conn).await?;
        match row {
            Some(r) => Ok(Some(r.try_get("address_id")?)),
            None => Ok(None),
        }
    }
}

async fn rollback(tx: Transaction<'static, Postgres>, err: AppError, op: &'static str) -> AppError {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(op, error = %e, "rollback failed; connection discards the transaction");
    }
    match &err {
        AppError::Validation(errors) => tracing::warn!(op, errors = errors.len(), "rejected by validation"),
        AppError::MissingTarget(msg) => tracing::warn!(op, "{}", msg),
        other => tracing::error!(op, error = %other, "rolled back"),
    }
    err
}

/// Storage constraint violations become the same field errors the validator reports.
fn write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        match db.constraint() {
            Some(EMAIL_UNIQUE_CONSTRAINT) if db.is_unique_violation() => {
                return AppError::Validation(vec![FieldError::new("email", MSG_EMAIL_TAKEN)]);
            }
            Some(AGE_CHECK_CONSTRAINT) if db.is_check_violation() => {
                return AppError::Validation(vec![FieldError::new("age", MSG_AGE_MINIMUM)]);
            }
            _ => {}
        }
    }
    AppError::Db(e)
}

/// Copy of the input with ids cleared. Text is stored as sent.
fn normalized(input: &Person) -> Person {
    Person {
        id: 0,
        address_id: 0,
        person_address: Address {
            id: 0,
            ..input.person_address.clone()
        },
        ..input.clone()
    }
}
