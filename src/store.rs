use std::sync::Mutex;

use sqlx::PgPool;
use thiserror::Error;

use crate::models::VoteRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("write failed: {0}")]
    Write(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("record store lock poisoned")]
    LockFailed,
}

/// Create/query operations against the persistent store. Every record lives
/// in one fixed namespace, so a single scoped query sees all of them.
#[rocket::async_trait]
pub trait RecordStore: Send + Sync {
    /// Writes the record and returns it unchanged except for the
    /// store-assigned id.
    async fn put(&self, record: VoteRecord) -> Result<VoteRecord, StoreError>;

    /// All records in the namespace, ordered ascending by submission time.
    async fn query_all(&self) -> Result<Vec<VoteRecord>, StoreError>;

    /// All records in the namespace with a matching party id, in store
    /// order.
    async fn query_by_party(&self, party_id: i32) -> Result<Vec<VoteRecord>, StoreError>;
}

/// Postgres-backed store. The namespace passed to the constructor scopes
/// every statement; this deployment uses a single logical partition.
pub struct PgRecordStore {
    pool: PgPool,
    namespace: String,
}

impl PgRecordStore {
    pub fn new(pool: PgPool, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }
}

#[rocket::async_trait]
impl RecordStore for PgRecordStore {
    async fn put(&self, record: VoteRecord) -> Result<VoteRecord, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO vote_records (namespace, vote_count, party_id, submitted_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&self.namespace)
        .bind(record.vote_count)
        .bind(record.party_id)
        .bind(record.submitted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        Ok(VoteRecord { id, ..record })
    }

    async fn query_all(&self) -> Result<Vec<VoteRecord>, StoreError> {
        sqlx::query_as(
            "SELECT id, vote_count, party_id, submitted_at
             FROM vote_records
             WHERE namespace = $1
             ORDER BY submitted_at, id",
        )
        .bind(&self.namespace)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)
    }

    async fn query_by_party(&self, party_id: i32) -> Result<Vec<VoteRecord>, StoreError> {
        sqlx::query_as(
            "SELECT id, vote_count, party_id, submitted_at
             FROM vote_records
             WHERE namespace = $1 AND party_id = $2",
        )
        .bind(&self.namespace)
        .bind(party_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)
    }
}

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    records: Vec<VoteRecord>,
}

/// Fallback store for database-less runs and the test suite. Ids are handed
/// out sequentially from 1.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put(&self, mut record: VoteRecord) -> Result<VoteRecord, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::LockFailed)?;
        inner.next_id += 1;
        record.id = inner.next_id;
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn query_all(&self) -> Result<Vec<VoteRecord>, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::LockFailed)?;
        let mut records = inner.records.clone();
        // Stable sort: equal timestamps keep insertion order.
        records.sort_by_key(|r| r.submitted_at);
        Ok(records)
    }

    async fn query_by_party(&self, party_id: i32) -> Result<Vec<VoteRecord>, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::LockFailed)?;
        Ok(inner
            .records
            .iter()
            .filter(|r| r.party_id == party_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn record_at(submitted_at: OffsetDateTime, vote_count: i32, party_id: i32) -> VoteRecord {
        VoteRecord {
            id: 0,
            vote_count,
            party_id,
            submitted_at,
        }
    }

    #[tokio::test]
    async fn put_assigns_sequential_ids() {
        let store = MemoryRecordStore::new();
        let a = store
            .put(record_at(datetime!(2014-07-09 08:00 UTC), 5, 1))
            .await
            .unwrap();
        let b = store
            .put(record_at(datetime!(2014-07-09 08:01 UTC), 3, 2))
            .await
            .unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn put_keeps_every_field_but_the_id() {
        let store = MemoryRecordStore::new();
        let submitted_at = datetime!(2014-07-09 08:00 UTC);
        let stored = store.put(record_at(submitted_at, 5, 1)).await.unwrap();

        assert_eq!(stored.vote_count, 5);
        assert_eq!(stored.party_id, 1);
        assert_eq!(stored.submitted_at, submitted_at);
    }

    #[tokio::test]
    async fn query_all_orders_by_submission_time() {
        let store = MemoryRecordStore::new();
        store
            .put(record_at(datetime!(2014-07-09 09:00 UTC), 1, 1))
            .await
            .unwrap();
        store
            .put(record_at(datetime!(2014-07-09 08:00 UTC), 2, 1))
            .await
            .unwrap();
        store
            .put(record_at(datetime!(2014-07-09 10:00 UTC), 3, 2))
            .await
            .unwrap();

        let counts: Vec<i32> = store
            .query_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.vote_count)
            .collect();
        assert_eq!(counts, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn query_all_keeps_insertion_order_for_equal_timestamps() {
        let store = MemoryRecordStore::new();
        let at = datetime!(2014-07-09 08:00 UTC);
        store.put(record_at(at, 1, 1)).await.unwrap();
        store.put(record_at(at, 2, 1)).await.unwrap();

        let ids: Vec<i64> = store
            .query_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn query_by_party_filters_records() {
        let store = MemoryRecordStore::new();
        for (count, party) in [(5, 1), (2, 2), (3, 1)] {
            store
                .put(record_at(datetime!(2014-07-09 08:00 UTC), count, party))
                .await
                .unwrap();
        }

        let first: Vec<i32> = store
            .query_by_party(1)
            .await
            .unwrap()
            .iter()
            .map(|r| r.vote_count)
            .collect();
        assert_eq!(first, vec![5, 3]);

        let second: Vec<i32> = store
            .query_by_party(2)
            .await
            .unwrap()
            .iter()
            .map(|r| r.vote_count)
            .collect();
        assert_eq!(second, vec![2]);

        assert!(store.query_by_party(9).await.unwrap().is_empty());
    }
}
