//! Conversation record sources
//!
//! A source is the backend collaborator the conversation list fetches from.
//! Implementations exist for an HTTP backend and for the local SQLite
//! message store; either can be wrapped in a TTL cache.

pub mod cache;
pub mod http;
pub mod sqlite;

pub use cache::CachedSource;
pub use http::HttpSource;
pub use sqlite::{MessageKind, SqliteSource, StoredContact, StoredMessage};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SourceConfig;
use crate::conversation::ConversationRecord;
use crate::error::{ChatListError, Result};

/// Backend that can produce the full conversation record collection
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use chatlist::conversation::ConversationRecord;
/// use chatlist::error::Result;
/// use chatlist::source::ConversationSource;
///
/// struct Fixed;
///
/// #[async_trait]
/// impl ConversationSource for Fixed {
///     async fn fetch_conversations(&self) -> Result<Vec<ConversationRecord>> {
///         Ok(vec![ConversationRecord::new("222@c.us").with_full_name("Alice")])
///     }
///
///     fn name(&self) -> &'static str {
///         "fixed"
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// Fetch every conversation record
    ///
    /// # Errors
    ///
    /// Returns [`ChatListError::Fetch`] (or a lower-level error) when the
    /// backend cannot produce a record collection.
    async fn fetch_conversations(&self) -> Result<Vec<ConversationRecord>>;

    /// Short label used in logs
    fn name(&self) -> &'static str;
}

/// Create a source instance based on configuration
///
/// The source is wrapped in a [`CachedSource`] when
/// `cache_ttl_seconds` is non-zero.
///
/// # Errors
///
/// Returns error if the source type is unknown or initialization fails
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn ConversationSource>> {
    let ttl = Duration::from_secs(config.cache_ttl_seconds);

    match config.source_type.as_str() {
        "http" => {
            let source = HttpSource::new(config.http.clone())?;
            Ok(wrap_with_cache(source, ttl))
        }
        "sqlite" => {
            let source = match &config.sqlite.path {
                Some(path) => SqliteSource::new_with_path(path)?,
                None => SqliteSource::new()?,
            };
            Ok(wrap_with_cache(source, ttl))
        }
        other => Err(ChatListError::Config(format!("Unknown source type: {}", other)).into()),
    }
}

fn wrap_with_cache<S>(source: S, ttl: Duration) -> Arc<dyn ConversationSource>
where
    S: ConversationSource + 'static,
{
    if ttl.is_zero() {
        Arc::new(source)
    } else {
        Arc::new(CachedSource::new(source, ttl))
    }
}
