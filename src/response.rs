//! Standard response envelope helpers.

use crate::model::Person;
use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct PersonData {
    pub data: Person,
}

#[derive(Serialize, ToSchema)]
pub struct PersonList {
    pub data: Vec<Person>,
    pub meta: MetaCount,
}

#[derive(Serialize, ToSchema)]
pub struct MetaCount {
    pub count: u64,
}

/// Outcome of a write: a message plus the written person where there is one.
#[derive(Serialize, ToSchema)]
pub struct WriteMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Person>,
}

pub fn success_one(data: Person) -> (StatusCode, Json<PersonData>) {
    (StatusCode::OK, Json(PersonData { data }))
}

pub fn success_many(data: Vec<Person>) -> (StatusCode, Json<PersonList>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(PersonList {
            data,
            meta: MetaCount { count },
        }),
    )
}

pub fn success_message(message: &str, data: Option<Person>) -> (StatusCode, Json<WriteMessage>) {
    (
        StatusCode::OK,
        Json(WriteMessage {
            message: message.to_string(),
            data,
        }),
    )
}
