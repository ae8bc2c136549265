use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::ConversationRecord;

/// Handle suffix the messaging network uses for group conversations
pub const GROUP_SUFFIX: &str = "@g.us";

/// Whether a conversation is a group or a one-to-one contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    /// Group conversation
    Group,
    /// One-to-one conversation
    Contact,
}

impl ConversationKind {
    /// Derive the kind from a handle and the group-suffix marker
    pub fn from_handle(handle: &str, group_suffix: &str) -> Self {
        if handle.ends_with(group_suffix) {
            ConversationKind::Group
        } else {
            ConversationKind::Contact
        }
    }
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationKind::Group => write!(f, "group"),
            ConversationKind::Contact => write!(f, "contact"),
        }
    }
}

/// Display-ready projection of a [`ConversationRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// The record's handle, verbatim
    pub id: String,
    /// First non-empty of formal name, nickname, short name, handle
    pub display_name: String,
    /// Latest activity snippet, empty when absent
    pub subtitle: String,
    /// Group or contact
    pub kind: ConversationKind,
    /// Time of the latest activity (unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<i64>,
}

/// Pick the name shown for a record
///
/// Falls back from formal name to nickname to short name and finally to the
/// handle itself. Only zero-length strings are skipped.
pub fn display_name_for(record: &ConversationRecord) -> &str {
    [&record.full_name, &record.push_name, &record.short]
        .into_iter()
        .filter_map(|name| name.as_deref())
        .find(|name| !name.is_empty())
        .unwrap_or(&record.jid)
}

/// Project one record into its summary
pub fn summarize(record: &ConversationRecord, group_suffix: &str) -> ConversationSummary {
    ConversationSummary {
        id: record.jid.clone(),
        display_name: display_name_for(record).to_string(),
        subtitle: record.latest_message.clone().unwrap_or_default(),
        kind: ConversationKind::from_handle(&record.jid, group_suffix),
        last_activity: record.timestamp,
    }
}

/// Project a whole record set, keeping its order
pub fn summarize_records(
    records: &[ConversationRecord],
    group_suffix: &str,
) -> Vec<ConversationSummary> {
    records
        .iter()
        .map(|record| summarize(record, group_suffix))
        .collect()
}
