//! Conversation list data model
//!
//! Raw backend records ([`ConversationRecord`]) are projected into display
//! summaries ([`ConversationSummary`]) and held, filtered and selected by
//! [`ConversationListModel`].

pub mod filter;
pub mod model;
pub mod record;
pub mod summary;

pub use filter::{filter_summaries, matches_query};
pub use model::{ConversationListModel, DiscardReason, LoadOutcome, LoadTicket};
pub use record::ConversationRecord;
pub use summary::{
    display_name_for, summarize, summarize_records, ConversationKind, ConversationSummary,
    GROUP_SUFFIX,
};
