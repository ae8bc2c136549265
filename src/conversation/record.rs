use serde::{Deserialize, Serialize};

/// Raw conversation data as delivered by a backend
///
/// Field names follow the backend's JSON. Every name field is optional and
/// may also arrive as an empty string; [`super::summarize`] treats both the
/// same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Unique handle of the conversation (contact or group)
    pub jid: String,
    /// Formal name from the address book
    #[serde(default)]
    pub full_name: Option<String>,
    /// Nickname the peer chose for themselves
    #[serde(default)]
    pub push_name: Option<String>,
    /// Short name
    #[serde(default)]
    pub short: Option<String>,
    /// Snippet of the latest activity
    #[serde(default)]
    pub latest_message: Option<String>,
    /// Time of the latest activity (unix seconds)
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl ConversationRecord {
    /// Create a record that carries only a handle
    pub fn new(jid: impl Into<String>) -> Self {
        Self {
            jid: jid.into(),
            ..Default::default()
        }
    }

    /// Set the formal name
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Set the nickname
    pub fn with_push_name(mut self, name: impl Into<String>) -> Self {
        self.push_name = Some(name.into());
        self
    }

    /// Set the short name
    pub fn with_short(mut self, name: impl Into<String>) -> Self {
        self.short = Some(name.into());
        self
    }

    /// Set the latest activity snippet
    pub fn with_latest_message(mut self, text: impl Into<String>) -> Self {
        self.latest_message = Some(text.into());
        self
    }

    /// Set the latest activity time
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
