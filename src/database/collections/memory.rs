use tokio::sync::RwLock;

use super::StoreError;
use crate::database::models::Entity;

/// Process-lifetime collection kept in insertion order.
///
/// Every read and every check-and-modify sequence runs under the one lock, so
/// concurrent requests cannot interleave an append with a delete or lose an
/// update.
pub struct InMemoryCollection<E> {
    records: RwLock<Vec<E>>,
}

impl<E: Entity> Default for InMemoryCollection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryCollection<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn insert(&self, record: E) -> Result<E, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::Duplicate {
                entity: E::NAME,
                id: record.id().to_string(),
            });
        }
        records.push(record.clone());
        Ok(record)
    }

    pub async fn find_by_id(&self, id: &str) -> Option<E> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub async fn find_all(&self) -> Vec<E> {
        self.records.read().await.clone()
    }

    pub async fn replace_fields(&self, id: &str, patch: E::Patch) -> Option<E> {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|r| r.id() == id)?;
        record.apply_patch(patch);
        Some(record.clone())
    }

    pub async fn delete_by_id(&self, id: &str) -> bool {
        let mut records = self.records.write().await;
        match records.iter().position(|r| r.id() == id) {
            Some(index) => {
                records.remove(index);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}
