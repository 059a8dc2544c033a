//! Required query parameters (`personId`, `city`). Names match case-insensitively.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::collections::HashMap;

pub const PERSON_ID_PARAM: &str = "personId";
pub const CITY_PARAM: &str = "city";

/// Integer person id from the `personId` query parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PersonId(pub i32);

/// Exact city name from the `city` query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct City(pub String);

fn required_param(parts: &Parts, name: &str) -> Result<String, AppError> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map_err(|e| AppError::BadRequest(e.body_text()))?;
    params
        .into_iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("query parameter '{}' is required", name)))
}

#[async_trait]
impl<S> FromRequestParts<S> for PersonId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = required_param(parts, PERSON_ID_PARAM)?;
        raw.trim()
            .parse::<i32>()
            .map(PersonId)
            .map_err(|_| AppError::BadRequest(format!("{} must be an integer, got '{}'", PERSON_ID_PARAM, raw)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for City
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        required_param(parts, CITY_PARAM).map(City)
    }
}
