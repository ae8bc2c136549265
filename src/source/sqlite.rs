//! Local SQLite message store source
//!
//! The messaging backend persists every message it sees into a local store.
//! The chat list is the latest message of each chat, newest chat first,
//! joined with whatever names the address book knows for the chat.

use anyhow::Context;
use async_trait::async_trait;
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use crate::conversation::ConversationRecord;
use crate::error::{ChatListError, Result};

use super::ConversationSource;

const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS messages (
        chat TEXT NOT NULL,
        message_id TEXT PRIMARY KEY,
        timestamp INTEGER NOT NULL,
        kind TEXT NOT NULL,
        body TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_messages_chat_time
    ON messages(chat, timestamp DESC);

    CREATE TABLE IF NOT EXISTS contacts (
        jid TEXT PRIMARY KEY,
        full_name TEXT,
        push_name TEXT,
        short TEXT
    );
";

const SELECT_CHAT_LIST: &str = "
    SELECT m.chat, m.timestamp, m.kind, m.body, c.full_name, c.push_name, c.short
    FROM (
        SELECT
            chat, timestamp, kind, body,
            ROW_NUMBER() OVER (
                PARTITION BY chat
                ORDER BY timestamp DESC, rowid DESC
            ) AS rn
        FROM messages
    ) m
    LEFT JOIN contacts c ON c.jid = m.chat
    WHERE m.rn = 1
    ORDER BY m.timestamp DESC
";

/// Content type of a stored message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Audio,
    Document,
    Sticker,
    Unsupported,
}

impl MessageKind {
    /// Column value for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::Audio => "audio",
            MessageKind::Document => "document",
            MessageKind::Sticker => "sticker",
            MessageKind::Unsupported => "unsupported",
        }
    }

    /// Parse a column value; unknown kinds map to `Unsupported`
    pub fn parse(value: &str) -> Self {
        match value {
            "text" => MessageKind::Text,
            "image" => MessageKind::Image,
            "video" => MessageKind::Video,
            "audio" => MessageKind::Audio,
            "document" => MessageKind::Document,
            "sticker" => MessageKind::Sticker,
            _ => MessageKind::Unsupported,
        }
    }

    /// Text shown in the chat list for a message of this kind
    pub fn snippet(&self, body: Option<&str>) -> String {
        match self {
            MessageKind::Text => body.unwrap_or_default().to_string(),
            MessageKind::Unsupported => "unsupported message type".to_string(),
            media => media.as_str().to_string(),
        }
    }
}

/// One row of the `messages` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub chat: String,
    pub message_id: String,
    /// Unix seconds
    pub timestamp: i64,
    pub kind: MessageKind,
    pub body: Option<String>,
}

impl StoredMessage {
    /// A plain text message
    pub fn text(
        chat: impl Into<String>,
        message_id: impl Into<String>,
        timestamp: i64,
        body: impl Into<String>,
    ) -> Self {
        Self {
            chat: chat.into(),
            message_id: message_id.into(),
            timestamp,
            kind: MessageKind::Text,
            body: Some(body.into()),
        }
    }
}

/// One row of the `contacts` table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredContact {
    pub jid: String,
    pub full_name: Option<String>,
    pub push_name: Option<String>,
    pub short: Option<String>,
}

/// Source that reads the chat list from the local message store
#[derive(Debug, Clone)]
pub struct SqliteSource {
    db_path: PathBuf,
}

impl SqliteSource {
    /// Open the store in the user's data directory
    ///
    /// # Errors
    ///
    /// Returns error if the data directory cannot be determined or created,
    /// or the schema cannot be initialized
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("org", "chatlist", "chatlist").ok_or_else(|| {
            ChatListError::Storage("Could not determine data directory".into())
        })?;

        Self::new_with_path(proj_dirs.data_dir().join("messages.db"))
    }

    /// Open the store at `db_path`, creating the schema if needed
    ///
    /// # Examples
    ///
    /// ```
    /// use chatlist::source::SqliteSource;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let source = SqliteSource::new_with_path(dir.path().join("messages.db")).unwrap();
    /// assert!(source.chat_list().unwrap().is_empty());
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| ChatListError::Storage(e.to_string()))?;
        }

        let source = Self { db_path };
        source.init()?;
        tracing::info!("Initialized SQLite source: {}", source.db_path.display());
        Ok(source)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| ChatListError::Storage(e.to_string()).into())
    }

    fn init(&self) -> Result<()> {
        self.open()?
            .execute_batch(CREATE_SCHEMA)
            .context("Failed to create tables")
            .map_err(|e| ChatListError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Store a message
    ///
    /// Returns `false` when a message with the same id was already stored.
    pub fn insert_message(&self, message: &StoredMessage) -> Result<bool> {
        let changed = self
            .open()?
            .execute(
                "INSERT OR IGNORE INTO messages (chat, message_id, timestamp, kind, body)
                VALUES (?, ?, ?, ?, ?)",
                params![
                    message.chat,
                    message.message_id,
                    message.timestamp,
                    message.kind.as_str(),
                    message.body
                ],
            )
            .context("Failed to insert message")
            .map_err(|e| ChatListError::Storage(e.to_string()))?;
        Ok(changed > 0)
    }

    /// Insert or replace the names known for a chat
    pub fn upsert_contact(&self, contact: &StoredContact) -> Result<()> {
        self.open()?
            .execute(
                "INSERT INTO contacts (jid, full_name, push_name, short)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(jid) DO UPDATE SET
                    full_name = excluded.full_name,
                    push_name = excluded.push_name,
                    short = excluded.short",
                params![
                    contact.jid,
                    contact.full_name,
                    contact.push_name,
                    contact.short
                ],
            )
            .context("Failed to upsert contact")
            .map_err(|e| ChatListError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Latest message of every chat, newest first, as conversation records
    pub fn chat_list(&self) -> Result<Vec<ConversationRecord>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(SELECT_CHAT_LIST)
            .context("Failed to prepare statement")
            .map_err(|e| ChatListError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let kind: String = row.get(2)?;
                let body: Option<String> = row.get(3)?;
                Ok(ConversationRecord {
                    jid: row.get(0)?,
                    full_name: row.get(4)?,
                    push_name: row.get(5)?,
                    short: row.get(6)?,
                    latest_message: Some(MessageKind::parse(&kind).snippet(body.as_deref())),
                    timestamp: Some(row.get(1)?),
                })
            })
            .context("Failed to query chat list")
            .map_err(|e| ChatListError::Storage(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            match row {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable chat row: {}", e),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl ConversationSource for SqliteSource {
    async fn fetch_conversations(&self) -> Result<Vec<ConversationRecord>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.chat_list())
            .await
            .map_err(|e| ChatListError::Fetch(format!("Chat list task failed: {}", e)))?
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
