use actix_web::web;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use config::{Config, StorageBackend};
pub use database::{Collection, Collections, StoreError};
pub use error::AppError;

use database::models::{Community, Location, Membership};

/// Shared handles to the collections, cloned into every worker's `App`.
#[derive(Clone)]
pub struct AppState {
    pub locations: web::Data<Collection<Location>>,
    pub memberships: web::Data<Collection<Membership>>,
    pub communities: web::Data<Collection<Community>>,
}

impl AppState {
    pub fn new(collections: Collections) -> Self {
        Self {
            locations: web::Data::new(collections.locations),
            memberships: web::Data::new(collections.memberships),
            communities: web::Data::new(collections.communities),
        }
    }

    /// Registers the collections and every route on an `App`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.locations.clone())
            .app_data(self.memberships.clone())
            .app_data(self.communities.clone())
            .configure(routes::configure);
    }
}
