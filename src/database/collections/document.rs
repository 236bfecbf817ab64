use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use sqlx::SqlitePool;

use super::StoreError;
use crate::database::models::Entity;

/// Collection stored as JSON documents in one SQLite table, keyed by the
/// record's `id`. Rows come back in insertion (rowid) order.
///
/// Every call is bounded by `timeout`; an elapsed deadline surfaces as
/// [`StoreError::Timeout`] and drops the in-flight query.
pub struct DocumentCollection<E> {
    pool: SqlitePool,
    timeout: Duration,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> DocumentCollection<E> {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self {
            pool,
            timeout,
            _entity: PhantomData,
        }
    }

    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        self.bounded(self.create_table()).await
    }

    pub async fn insert(&self, record: E) -> Result<E, StoreError> {
        self.bounded(self.insert_document(&record)).await?;
        Ok(record)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreError> {
        self.bounded(self.select_document(id)).await
    }

    pub async fn find_all(&self) -> Result<Vec<E>, StoreError> {
        self.bounded(self.select_all()).await
    }

    pub async fn replace_fields(&self, id: &str, patch: E::Patch) -> Result<Option<E>, StoreError> {
        self.bounded(self.update_document(id, patch)).await
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.bounded(self.delete_document(id)).await
    }

    pub async fn len(&self) -> Result<usize, StoreError> {
        self.bounded(self.count_documents()).await
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.pool.is_closed() {
            return Err(StoreError::Unavailable(format!(
                "{} store is not initialized",
                E::NAME
            )));
        }

        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("{} store call exceeded {:?}", E::COLLECTION, self.timeout);
                Err(StoreError::Timeout(self.timeout))
            }
        }
    }

    async fn create_table(&self) -> Result<(), StoreError> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY NOT NULL, document TEXT NOT NULL)",
            E::COLLECTION
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_document(&self, record: &E) -> Result<(), StoreError> {
        let query = format!(
            "INSERT INTO {} (id, document) VALUES (?1, ?2)",
            E::COLLECTION
        );
        let document = serde_json::to_string(record)?;

        let result = sqlx::query(&query)
            .bind(record.id())
            .bind(document)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate {
                    entity: E::NAME,
                    id: record.id().to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn select_document(&self, id: &str) -> Result<Option<E>, StoreError> {
        let query = format!("SELECT document FROM {} WHERE id = ?1", E::COLLECTION);

        let document = sqlx::query_scalar::<_, String>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match document {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    async fn select_all(&self) -> Result<Vec<E>, StoreError> {
        let query = format!("SELECT document FROM {} ORDER BY rowid", E::COLLECTION);

        let documents = sqlx::query_scalar::<_, String>(&query)
            .fetch_all(&self.pool)
            .await?;

        documents
            .iter()
            .map(|document| serde_json::from_str(document).map_err(StoreError::from))
            .collect()
    }

    /// Read-modify-write inside one transaction so a concurrent update of the
    /// same document cannot be lost. The write lock is taken at `BEGIN`: a
    /// deferred transaction would hold a read snapshot that SQLite refuses to
    /// upgrade once another writer commits.
    async fn update_document(&self, id: &str, patch: E::Patch) -> Result<Option<E>, StoreError> {
        let select = format!("SELECT document FROM {} WHERE id = ?1", E::COLLECTION);
        let update = format!("UPDATE {} SET document = ?1 WHERE id = ?2", E::COLLECTION);

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let document = sqlx::query_scalar::<_, String>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(document) = document else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut record: E = serde_json::from_str(&document)?;
        record.apply_patch(patch);

        sqlx::query(&update)
            .bind(serde_json::to_string(&record)?)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    async fn delete_document(&self, id: &str) -> Result<bool, StoreError> {
        let query = format!("DELETE FROM {} WHERE id = ?1", E::COLLECTION);

        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_documents(&self) -> Result<usize, StoreError> {
        let query = format!("SELECT COUNT(*) FROM {}", E::COLLECTION);

        let count = sqlx::query_scalar::<_, i64>(&query)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::init_database;
    use crate::database::models::{Community, CommunityPatch, Location, LocationPatch, Membership};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn collection<E: Entity>(dir: &TempDir) -> DocumentCollection<E> {
        let url = format!("sqlite:{}/test.db", dir.path().display());
        let pool = init_database(&url).await.unwrap();
        let collection = DocumentCollection::<E>::new(pool, Duration::from_secs(10));
        collection.ensure_table().await.unwrap();
        collection
    }

    fn community(id: &str) -> Community {
        Community {
            id: id.to_string(),
            name: "Runners".to_string(),
            location: Location {
                id: "loc1".to_string(),
                name: "Park".to_string(),
                latitude: 52.1,
                longitude: 4.3,
            },
            members: vec![Membership {
                id: "m1".to_string(),
                community_id: id.to_string(),
                role: "owner".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn stores_and_reads_back_nested_documents() {
        let dir = TempDir::new().unwrap();
        let communities = collection::<Community>(&dir).await;

        communities.insert(community("c1")).await.unwrap();

        assert_eq!(
            communities.find_by_id("c1").await.unwrap(),
            Some(community("c1"))
        );
        assert_eq!(communities.find_by_id("c2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unique_id_violation_becomes_duplicate() {
        let dir = TempDir::new().unwrap();
        let communities = collection::<Community>(&dir).await;
        communities.insert(community("c1")).await.unwrap();

        let err = communities.insert(community("c1")).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(communities.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn replace_fields_persists_partial_update() {
        let dir = TempDir::new().unwrap();
        let communities = collection::<Community>(&dir).await;
        communities.insert(community("c1")).await.unwrap();

        let patch = CommunityPatch {
            name: Some("Walkers".to_string()),
            ..Default::default()
        };
        let updated = communities.replace_fields("c1", patch).await.unwrap().unwrap();

        assert_eq!(updated.name, "Walkers");
        assert_eq!(updated.members, community("c1").members);
        assert_eq!(communities.find_by_id("c1").await.unwrap(), Some(updated));
        assert!(
            communities
                .replace_fields("missing", CommunityPatch::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn find_all_follows_insertion_order_and_delete_reports_misses() {
        let dir = TempDir::new().unwrap();
        let communities = collection::<Community>(&dir).await;
        for id in ["z", "a", "m"] {
            communities.insert(community(id)).await.unwrap();
        }

        assert!(communities.delete_by_id("a").await.unwrap());
        assert!(!communities.delete_by_id("a").await.unwrap());

        let ids: Vec<String> = communities
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["z", "m"]);
    }

    #[tokio::test]
    async fn closed_pool_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let communities = collection::<Community>(&dir).await;
        communities.pool.close().await;

        let err = communities.find_all().await.unwrap_err();

        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn elapsed_deadline_is_a_timeout() {
        let dir = TempDir::new().unwrap();
        let communities = collection::<Community>(&dir).await;
        let impatient = DocumentCollection::<Community>::new(communities.pool.clone(), Duration::ZERO);

        let err = impatient.find_all().await.unwrap_err();

        assert!(matches!(err, StoreError::Timeout(d) if d == Duration::ZERO));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_on_distinct_ids_all_succeed() {
        let dir = TempDir::new().unwrap();
        let locations = std::sync::Arc::new(collection::<Location>(&dir).await);
        for i in 0..40 {
            locations
                .insert(Location {
                    id: format!("l{}", i),
                    name: "before".to_string(),
                    latitude: i as f64,
                    longitude: 0.0,
                })
                .await
                .unwrap();
        }

        let handles: Vec<_> = (0..40)
            .map(|i| {
                let locations = std::sync::Arc::clone(&locations);
                tokio::spawn(async move {
                    let patch = LocationPatch {
                        name: Some("after".to_string()),
                        ..Default::default()
                    };
                    locations.replace_fields(&format!("l{}", i), patch).await
                })
            })
            .collect();

        for handle in handles {
            let updated = handle.await.unwrap().unwrap();
            assert_eq!(updated.map(|l| l.name), Some("after".to_string()));
        }

        let all = locations.find_all().await.unwrap();
        assert_eq!(all.len(), 40);
        assert!(all.iter().all(|l| l.name == "after"));
        assert_eq!(all[7].latitude, 7.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_on_one_id_are_serialised() {
        let dir = TempDir::new().unwrap();
        let communities = std::sync::Arc::new(collection::<Community>(&dir).await);
        communities.insert(community("c1")).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let communities = std::sync::Arc::clone(&communities);
                tokio::spawn(async move {
                    let patch = CommunityPatch {
                        name: Some(format!("name{}", i)),
                        ..Default::default()
                    };
                    communities.replace_fields("c1", patch).await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().unwrap().is_some());
        }

        let stored = communities.find_by_id("c1").await.unwrap().unwrap();
        assert!(stored.name.starts_with("name"));
        assert_eq!(stored.members, community("c1").members);
    }
}
