//! Session middleware configuration.
//!
//! The session is the browser-scoped key-value store that holds the cart
//! blob. Records live in the process in a bounded `moka` cache, so a restart
//! empties every cart; there is no backend persistence.
//!
//! Each record is evicted when its `expiry_date` passes, and the least
//! valuable records are evicted first once `session_capacity` is reached.
//! Abandoned carts therefore do not accumulate.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use tower_sessions::{
    Expiry as SessionExpiry, SessionManagerLayer, SessionStore,
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store,
};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "lw_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<CartSessionStore> {
    SessionManagerLayer::new(CartSessionStore::new(config.session_capacity))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(SessionExpiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

// =============================================================================
// CartSessionStore
// =============================================================================

/// In-process session store backed by a `moka` cache.
///
/// Clones share the same cache.
#[derive(Clone)]
pub struct CartSessionStore {
    cache: Cache<Id, Record>,
}

impl CartSessionStore {
    /// Create a store holding at most `capacity` sessions.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .expire_after(RecordExpiry)
            .build();
        Self { cache }
    }

    /// Number of sessions currently held.
    ///
    /// Approximate until [`run_pending_tasks`](Self::run_pending_tasks) has
    /// applied outstanding evictions.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Apply outstanding evictions and expirations now.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl fmt::Debug for CartSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartSessionStore")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for CartSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .cache
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(session_id).await;
        Ok(())
    }
}

/// Expires each cache entry at its record's `expiry_date`.
struct RecordExpiry;

impl RecordExpiry {
    fn time_to_live(record: &Record) -> Duration {
        Duration::try_from(record.expiry_date - OffsetDateTime::now_utc()).unwrap_or(Duration::ZERO)
    }
}

impl Expiry<Id, Record> for RecordExpiry {
    fn expire_after_create(&self, _id: &Id, record: &Record, _created_at: Instant) -> Option<Duration> {
        Some(Self::time_to_live(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(Self::time_to_live(record))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time::Duration as TimeDuration;

    use super::*;

    fn record_expiring_in(lifetime: TimeDuration) -> Record {
        let mut record = Record {
            id: Id::default(),
            data: Default::default(),
            expiry_date: OffsetDateTime::now_utc() + lifetime,
        };
        record
            .data
            .insert("cart".to_string(), serde_json::Value::String("[]".to_string()));
        record
    }

    #[tokio::test]
    async fn test_active_session_roundtrip() {
        let store = CartSessionStore::new(16);
        let mut record = record_expiring_in(TimeDuration::hours(1));
        store.create(&mut record).await.unwrap();

        let loaded = store.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, record.data);

        store.delete(&record.id).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_not_loaded_and_is_evicted() {
        let store = CartSessionStore::new(16);
        let mut record = record_expiring_in(TimeDuration::seconds(-1));
        store.create(&mut record).await.unwrap();

        assert!(store.load(&record.id).await.unwrap().is_none());

        store.run_pending_tasks().await;
        assert_eq!(store.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_save_extends_expiry() {
        let store = CartSessionStore::new(16);
        let mut record = record_expiring_in(TimeDuration::seconds(-1));
        store.create(&mut record).await.unwrap();

        record.expiry_date = OffsetDateTime::now_utc() + TimeDuration::hours(1);
        store.save(&record).await.unwrap();

        assert!(store.load(&record.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let store = CartSessionStore::new(4);
        for _ in 0..64 {
            let mut record = record_expiring_in(TimeDuration::hours(1));
            store.create(&mut record).await.unwrap();
        }

        store.run_pending_tasks().await;
        assert!(store.entry_count() <= 4);
    }
}
