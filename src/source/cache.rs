//! In-memory TTL cache in front of a slower source

use async_trait::async_trait;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::conversation::ConversationRecord;
use crate::error::Result;

use super::{ConversationSource, SqliteSource, StoredContact, StoredMessage};

/// Serves the last fetched chat list until it is older than the TTL
///
/// Failed fetches are never cached. [`CachedSource::invalidate`] drops the
/// entry so the next fetch goes to the inner source. Writes through a cached
/// [`SqliteSource`] invalidate automatically.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    #[allow(clippy::type_complexity)]
    cache: RwLock<Option<(Vec<ConversationRecord>, Instant)>>,
}

impl<S: ConversationSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: RwLock::new(None),
        }
    }

    /// Drop the cached list
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            *cache = None;
        }
    }

    /// Whether the next fetch will be served from cache
    pub fn is_cached(&self) -> bool {
        self.cached().is_some()
    }

    /// The wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn cached(&self) -> Option<Vec<ConversationRecord>> {
        let cache = self.cache.read().ok()?;
        let (records, cached_at) = cache.as_ref()?;
        if cached_at.elapsed() < self.ttl {
            Some(records.clone())
        } else {
            tracing::debug!("Chat list cache expired");
            None
        }
    }
}

impl CachedSource<SqliteSource> {
    /// Store a message and drop the cached chat list if it was new
    pub fn insert_message(&self, message: &StoredMessage) -> Result<bool> {
        let inserted = self.inner.insert_message(message)?;
        if inserted {
            self.invalidate();
        }
        Ok(inserted)
    }

    /// Update a contact's names and drop the cached chat list
    pub fn upsert_contact(&self, contact: &StoredContact) -> Result<()> {
        self.inner.upsert_contact(contact)?;
        self.invalidate();
        Ok(())
    }
}

#[async_trait]
impl<S: ConversationSource> ConversationSource for CachedSource<S> {
    async fn fetch_conversations(&self) -> Result<Vec<ConversationRecord>> {
        if let Some(records) = self.cached() {
            tracing::debug!(source = self.inner.name(), "Using cached chat list");
            return Ok(records);
        }

        let records = self.inner.fetch_conversations().await?;

        if let Ok(mut cache) = self.cache.write() {
            *cache = Some((records.clone(), Instant::now()));
        }

        Ok(records)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatListError;
    use crate::source::MockConversationSource;

    fn records() -> Vec<ConversationRecord> {
        vec![ConversationRecord::new("222@c.us").with_full_name("Alice")]
    }

    fn mock_source(times: usize) -> MockConversationSource {
        let mut source = MockConversationSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_fetch_conversations()
            .times(times)
            .returning(|| Ok(records()));
        source
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_is_cached() {
        let cached = CachedSource::new(mock_source(1), Duration::from_secs(300));

        assert_eq!(cached.fetch_conversations().await.unwrap(), records());
        assert_eq!(cached.fetch_conversations().await.unwrap(), records());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cached = CachedSource::new(mock_source(2), Duration::from_secs(300));

        cached.fetch_conversations().await.unwrap();
        assert!(cached.is_cached());
        cached.invalidate();
        assert!(!cached.is_cached());
        cached.fetch_conversations().await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cached = CachedSource::new(mock_source(2), Duration::from_millis(10));

        cached.fetch_conversations().await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        cached.fetch_conversations().await.unwrap();
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mut source = MockConversationSource::new();
        source.expect_name().return_const("mock");
        let mut calls = 0;
        source
            .expect_fetch_conversations()
            .times(2)
            .returning(move || {
                calls += 1;
                if calls == 1 {
                    Err(ChatListError::Fetch("offline".to_string()).into())
                } else {
                    Ok(records())
                }
            });

        let cached = CachedSource::new(source, Duration::from_secs(300));
        assert!(cached.fetch_conversations().await.is_err());
        assert_eq!(cached.fetch_conversations().await.unwrap(), records());
    }

    #[test]
    fn test_zero_ttl_always_refetches() {
        let cached = CachedSource::new(mock_source(2), Duration::ZERO);

        tokio_test::block_on(async {
            cached.fetch_conversations().await.unwrap();
            cached.fetch_conversations().await.unwrap();
        });
    }

    #[test]
    fn test_name_comes_from_inner_source() {
        let mut source = MockConversationSource::new();
        source.expect_name().return_const("mock");
        let cached = CachedSource::new(source, Duration::from_secs(1));
        assert_eq!(cached.name(), "mock");
    }
}
