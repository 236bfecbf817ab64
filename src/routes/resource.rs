use actix_web::web;

use crate::database::models::Entity;
use crate::handlers::resource;

/// Mounts the five CRUD routes for `E` under `/{E::PATH}`.
pub fn configure<E: Entity>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(&format!("/{}", E::PATH))
            .route("", web::post().to(resource::create::<E>))
            .route("", web::get().to(resource::get_all::<E>))
            .route("/{id}", web::get().to(resource::get_by_id::<E>))
            .route("/{id}", web::put().to(resource::update::<E>))
            .route("/{id}", web::delete().to(resource::delete::<E>)),
    );
}
