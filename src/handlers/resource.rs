//! CRUD handlers shared by every resource.
//!
//! Each handler is generic over the [`Entity`] it serves and reads the
//! matching `web::Data<Collection<E>>`, so the three resources are routed to
//! the same code with different type parameters.

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use serde_json::Value;
use uuid::Uuid;

use crate::database::Collection;
use crate::database::models::Entity;
use crate::error::AppError;
use crate::handlers::shared::{decode_object, json_response};
use crate::middleware::RequestIdExt;

fn not_found<E: Entity>(id: &str) -> AppError {
    AppError::NotFound(format!("{} '{}' not found", E::NAME, id))
}

pub async fn create<E: Entity>(
    collection: web::Data<Collection<E>>,
    input: web::Json<Value>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let mut record: E = decode_object(input.into_inner())?;
    if record.id().is_empty() {
        record.set_id(Uuid::new_v4().to_string());
    }

    let stored = collection.insert(record).await?;
    log::info!(
        "Created {} {} (correlation_id={})",
        E::NAME,
        stored.id(),
        req.correlation_id().unwrap_or_default()
    );

    json_response(StatusCode::CREATED, &stored)
}

pub async fn get_by_id<E: Entity>(
    collection: web::Data<Collection<E>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match collection.find_by_id(&id).await? {
        Some(record) => json_response(StatusCode::OK, &record),
        None => Err(not_found::<E>(&id)),
    }
}

pub async fn get_all<E: Entity>(
    collection: web::Data<Collection<E>>,
) -> Result<HttpResponse, AppError> {
    let records = collection.find_all().await?;
    log::debug!("Listing {} {} records", records.len(), E::NAME);

    json_response(StatusCode::OK, &records)
}

pub async fn update<E: Entity>(
    collection: web::Data<Collection<E>>,
    path: web::Path<String>,
    input: web::Json<Value>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch: E::Patch = decode_object(input.into_inner())?;

    match collection.replace_fields(&id, patch).await? {
        Some(record) => {
            log::info!(
                "Updated {} {} (correlation_id={})",
                E::NAME,
                id,
                req.correlation_id().unwrap_or_default()
            );
            json_response(StatusCode::OK, &record)
        }
        None => Err(not_found::<E>(&id)),
    }
}

pub async fn delete<E: Entity>(
    collection: web::Data<Collection<E>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if collection.delete_by_id(&id).await? {
        log::info!(
            "Deleted {} {} (correlation_id={})",
            E::NAME,
            id,
            req.correlation_id().unwrap_or_default()
        );
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(not_found::<E>(&id))
    }
}
