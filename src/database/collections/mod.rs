//! Per-entity record collections.
//!
//! A [`Collection`] is either a lock-guarded in-memory list or a table in the
//! SQLite document store. Both expose the same five operations so the HTTP
//! handlers never need to know which backend is active.

use std::time::Duration;

use anyhow::Result;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::{Config, StorageBackend};
use crate::database::init_database;
use crate::database::models::{Community, Entity, Location, Membership};

pub mod document;
pub mod memory;

pub use document::DocumentCollection;
pub use memory::InMemoryCollection;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    #[error("storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("{entity} with id '{id}' already exists")]
    Duplicate { entity: &'static str, id: String },

    #[error("storage operation failed: {0}")]
    Operation(sqlx::Error),

    #[error("failed to encode or decode stored document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolClosed => StoreError::Unavailable("connection pool is closed".into()),
            sqlx::Error::PoolTimedOut => {
                StoreError::Unavailable("timed out acquiring a connection".into())
            }
            sqlx::Error::Io(e) => StoreError::Unavailable(e.to_string()),
            sqlx::Error::Configuration(e) => StoreError::Unavailable(e.to_string()),
            other => StoreError::Operation(other),
        }
    }
}

pub enum Collection<E: Entity> {
    InMemory(InMemoryCollection<E>),
    Document(DocumentCollection<E>),
}

impl<E: Entity> Collection<E> {
    pub fn in_memory() -> Self {
        Collection::InMemory(InMemoryCollection::new())
    }

    pub fn document(pool: SqlitePool, timeout: Duration) -> Self {
        Collection::Document(DocumentCollection::new(pool, timeout))
    }

    pub fn backend(&self) -> StorageBackend {
        match self {
            Collection::InMemory(_) => StorageBackend::Memory,
            Collection::Document(_) => StorageBackend::Document,
        }
    }

    pub async fn insert(&self, record: E) -> Result<E, StoreError> {
        match self {
            Collection::InMemory(c) => c.insert(record).await,
            Collection::Document(c) => c.insert(record).await,
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreError> {
        match self {
            Collection::InMemory(c) => Ok(c.find_by_id(id).await),
            Collection::Document(c) => c.find_by_id(id).await,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<E>, StoreError> {
        match self {
            Collection::InMemory(c) => Ok(c.find_all().await),
            Collection::Document(c) => c.find_all().await,
        }
    }

    pub async fn replace_fields(&self, id: &str, patch: E::Patch) -> Result<Option<E>, StoreError> {
        match self {
            Collection::InMemory(c) => Ok(c.replace_fields(id, patch).await),
            Collection::Document(c) => c.replace_fields(id, patch).await,
        }
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        match self {
            Collection::InMemory(c) => Ok(c.delete_by_id(id).await),
            Collection::Document(c) => c.delete_by_id(id).await,
        }
    }

    pub async fn len(&self) -> Result<usize, StoreError> {
        match self {
            Collection::InMemory(c) => Ok(c.len().await),
            Collection::Document(c) => c.len().await,
        }
    }
}

/// The three collections the service exposes, built once at startup.
pub struct Collections {
    pub locations: Collection<Location>,
    pub memberships: Collection<Membership>,
    pub communities: Collection<Community>,
}

impl Collections {
    pub fn in_memory() -> Self {
        Collections {
            locations: Collection::in_memory(),
            memberships: Collection::in_memory(),
            communities: Collection::in_memory(),
        }
    }

    /// Builds document-backed collections over `pool`, creating the backing
    /// tables when they do not exist yet.
    pub async fn document(pool: SqlitePool, timeout: Duration) -> Result<Self> {
        let locations = DocumentCollection::<Location>::new(pool.clone(), timeout);
        let memberships = DocumentCollection::<Membership>::new(pool.clone(), timeout);
        let communities = DocumentCollection::<Community>::new(pool, timeout);

        locations.ensure_table().await?;
        memberships.ensure_table().await?;
        communities.ensure_table().await?;

        Ok(Collections {
            locations: Collection::Document(locations),
            memberships: Collection::Document(memberships),
            communities: Collection::Document(communities),
        })
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.storage_backend {
            StorageBackend::Memory => Ok(Self::in_memory()),
            StorageBackend::Document => {
                let pool = init_database(&config.database_url).await?;
                Self::document(pool, config.storage_timeout()).await
            }
        }
    }
}
