//! Person handlers. Writes go through `PersonService`; reads query the store directly.

use crate::error::AppError;
use crate::extractors::{City, PersonBody, PersonId};
use crate::model::Person;
use crate::response::{success_many, success_message, success_one};
use crate::sql::{select_persons, PersonFilter, Tables};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use sqlx::PgPool;

pub const MSG_CREATED: &str = "Person has successfully created!";
pub const MSG_UPDATED: &str = "Person has successfully updated!";
pub const MSG_DELETED: &str = "Person has successfully deleted from the database!";

/// One round trip: persons joined to their addresses, in id order.
pub async fn fetch_persons(
    pool: &PgPool,
    tables: &Tables,
    filter: PersonFilter<'_>,
) -> Result<Vec<Person>, AppError> {
    let q = select_persons(tables, filter);
    let rows = q.query().fetch_all(pool).await?;
    let persons = rows
        .iter()
        .map(Person::from_joined_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(persons)
}

#[utoipa::path(
    post,
    path = "/api/Person/CreatePerson",
    tag = "Person",
    request_body = Person,
    responses(
        (status = 200, description = "Person and address created", body = crate::response::WriteMessage),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn create_person(
    State(state): State<AppState>,
    PersonBody(body): PersonBody,
) -> Result<impl IntoResponse, AppError> {
    state.persons.validator().validate(&state.pool, &body, None).await?;
    let created = state.persons.create(&body).await?;
    Ok(success_message(MSG_CREATED, Some(created)))
}

#[utoipa::path(
    get,
    path = "/api/Person/GetPersonById",
    tag = "Person",
    params(("personId" = i32, Query, description = "Person id")),
    responses(
        (status = 200, description = "Person found", body = crate::response::PersonData),
        (status = 404, description = "No person with this id", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn get_person_by_id(
    State(state): State<AppState>,
    PersonId(id): PersonId,
) -> Result<impl IntoResponse, AppError> {
    let person = fetch_persons(&state.pool, &state.tables, PersonFilter::ById(id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("There is no any person by ID: {}", id)))?;
    Ok(success_one(person))
}

#[utoipa::path(
    get,
    path = "/api/Person/GetPersonByCity",
    tag = "Person",
    params(("city" = String, Query, description = "Exact city name")),
    responses(
        (status = 200, description = "Persons living in the city", body = crate::response::PersonList),
        (status = 404, description = "Nobody lives there", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn get_person_by_city(
    State(state): State<AppState>,
    City(city): City,
) -> Result<impl IntoResponse, AppError> {
    let persons = fetch_persons(&state.pool, &state.tables, PersonFilter::ByCity(&city)).await?;
    if persons.is_empty() {
        return Err(AppError::NotFound(format!("There is no person from: {}", city)));
    }
    Ok(success_many(persons))
}

#[utoipa::path(
    get,
    path = "/api/Person/GetAllPersons",
    tag = "Person",
    responses(
        (status = 200, description = "Every person", body = crate::response::PersonList),
        (status = 404, description = "No persons stored", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn get_all_persons(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let persons = fetch_persons(&state.pool, &state.tables, PersonFilter::All).await?;
    if persons.is_empty() {
        return Err(AppError::NotFound("There is no person in the database yet!".into()));
    }
    Ok(success_many(persons))
}

#[utoipa::path(
    put,
    path = "/api/Person/UpdatePerson",
    tag = "Person",
    params(("personId" = i32, Query, description = "Person id")),
    request_body = Person,
    responses(
        (status = 200, description = "Person and address updated", body = crate::response::WriteMessage),
        (status = 400, description = "Unknown id or validation failed", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    PersonId(id): PersonId,
    PersonBody(body): PersonBody,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.persons.update(id, &body).await?;
    Ok(success_message(MSG_UPDATED, Some(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/Person/DeletePerson",
    tag = "Person",
    params(("personId" = i32, Query, description = "Person id")),
    responses(
        (status = 200, description = "Person and address deleted", body = crate::response::WriteMessage),
        (status = 400, description = "Unknown id", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn delete_person(
    State(state): State<AppState>,
    PersonId(id): PersonId,
) -> Result<impl IntoResponse, AppError> {
    state.persons.delete(id).await?;
    Ok(success_message(MSG_DELETED, None))
}
