//! HTTP request handlers - thin layer that delegates to domain services

use super::error::Problem;
use crate::contract::{EntityKind, EventDto};
use crate::domain::{EventService, NamedEntityService, NamedResource};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

const CREATED_BODY: &str = "Successfully created";

/// Collection path for an entity kind
pub fn collection_path(kind: EntityKind) -> String {
    format!("/api/{}s", kind.as_str())
}

fn created(kind: EntityKind, id: i32) -> Response {
    let location = format!("{}/{id}", collection_path(kind));
    (StatusCode::OK, [(header::LOCATION, location)], CREATED_BODY).into_response()
}

/// Malformed JSON is reported like any other validation failure
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Problem> {
    payload
        .map(|Json(dto)| dto)
        .map_err(|rejection| {
            tracing::debug!(error = %rejection, "Rejected request body");
            Problem::new(StatusCode::BAD_REQUEST, "Validation error").with_detail(rejection.body_text())
        })
}

/// A non-numeric `{id}` gets a problem body too
fn path_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, Problem> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected path parameter");
        Problem::new(StatusCode::BAD_REQUEST, "Validation error").with_detail(rejection.body_text())
    })
}

// ===== Event Handlers =====

pub async fn list_events(
    Extension(service): Extension<Arc<EventService>>,
) -> Result<Json<Vec<EventDto>>, Problem> {
    Ok(Json(service.get_all().await?))
}

pub async fn get_event(
    Extension(service): Extension<Arc<EventService>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<EventDto>, Problem> {
    let id = path_id(path)?;
    Ok(Json(service.get_by_id(id).await?))
}

/// 200 with a plain-text body and `Location` pointing at the new event
pub async fn create_event(
    Extension(service): Extension<Arc<EventService>>,
    payload: Result<Json<EventDto>, JsonRejection>,
) -> Result<Response, Problem> {
    let created_dto = service.create(body(payload)?).await?;
    Ok(created(EntityKind::Event, created_dto.id))
}

pub async fn update_event(
    Extension(service): Extension<Arc<EventService>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<EventDto>, JsonRejection>,
) -> Result<StatusCode, Problem> {
    let id = path_id(path)?;
    service.update(id, body(payload)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_event(
    Extension(service): Extension<Arc<EventService>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, Problem> {
    let id = path_id(path)?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Speaker / Sponsor Handlers =====

pub async fn list_named<T>(
    Extension(service): Extension<Arc<NamedEntityService<T>>>,
) -> Result<Json<Vec<T::Dto>>, Problem>
where
    T: NamedResource,
    T::Dto: Serialize,
{
    Ok(Json(service.get_all().await?))
}

pub async fn get_named<T>(
    Extension(service): Extension<Arc<NamedEntityService<T>>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<T::Dto>, Problem>
where
    T: NamedResource,
    T::Dto: Serialize,
{
    let id = path_id(path)?;
    Ok(Json(service.get_by_id(id).await?))
}

pub async fn create_named<T>(
    Extension(service): Extension<Arc<NamedEntityService<T>>>,
    payload: Result<Json<T::Dto>, JsonRejection>,
) -> Result<Response, Problem>
where
    T: NamedResource,
    T::Dto: DeserializeOwned,
{
    let created_dto = service.create(body(payload)?).await?;
    Ok(created(T::KIND, T::dto_id(&created_dto)))
}

pub async fn update_named<T>(
    Extension(service): Extension<Arc<NamedEntityService<T>>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<T::Dto>, JsonRejection>,
) -> Result<StatusCode, Problem>
where
    T: NamedResource,
    T::Dto: DeserializeOwned,
{
    let id = path_id(path)?;
    service.update(id, body(payload)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_named<T>(
    Extension(service): Extension<Arc<NamedEntityService<T>>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, Problem>
where
    T: NamedResource,
{
    let id = path_id(path)?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
