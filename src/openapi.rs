//! OpenAPI document for the person API.

use crate::error::{ErrorBody, ErrorDetail, FieldError};
use crate::handlers::person;
use crate::model::{Address, Person};
use crate::response::{MetaCount, PersonData, PersonList, WriteMessage};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        person::create_person,
        person::get_person_by_id,
        person::get_person_by_city,
        person::get_all_persons,
        person::update_person,
        person::delete_person
    ),
    components(schemas(
        Person,
        Address,
        PersonData,
        PersonList,
        MetaCount,
        WriteMessage,
        FieldError,
        ErrorBody,
        ErrorDetail
    )),
    tags((name = "Person", description = "Persons and the address each one owns"))
)]
pub struct ApiDoc;
