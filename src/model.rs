//! Person and Address entities, and hydration from joined rows.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use utoipa::ToSchema;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub id: i32,
    pub country: String,
    pub city: String,
}

/// A person and the one address it owns through `address_id`.
///
/// Every field defaults when absent from a request body, so incomplete input
/// surfaces as validation errors instead of a body-parse failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub address_id: i32,
    pub person_address: Address,
}

impl Person {
    /// Hydrate from a row shaped by `sql::select_persons`.
    pub fn from_joined_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let address_id: i32 = row.try_get("address_id")?;
        Ok(Person {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            age: row.try_get("age")?,
            email: row.try_get("email")?,
            address_id,
            person_address: Address {
                id: address_id,
                country: row.try_get("country")?,
                city: row.try_get("city")?,
            },
        })
    }
}
