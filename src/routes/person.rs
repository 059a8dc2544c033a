//! Person routes under /api/Person.

use crate::handlers::person::{
    create_person, delete_person, get_all_persons, get_person_by_city, get_person_by_id,
    update_person,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn person_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/Person/CreatePerson", post(create_person))
        .route("/api/Person/GetPersonById", get(get_person_by_id))
        .route("/api/Person/GetPersonByCity", get(get_person_by_city))
        .route("/api/Person/GetAllPersons", get(get_all_persons))
        .route("/api/Person/UpdatePerson", put(update_person))
        .route("/api/Person/DeletePerson", delete(delete_person))
        .with_state(state)
}
