//! chatlist - conversation list core for a desktop messaging client
//!
//! This library turns raw conversation records from a messaging backend into
//! a searchable, selectable list of display summaries.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `conversation`: records, summaries, filtering and the list model
//! - `source`: backends that produce conversation records (HTTP, SQLite, cache)
//! - `screen`: background loading with teardown-safe completion delivery
//! - `config`: Configuration management and validation
//! - `logging`: tracing subscriber setup
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface
//!
//! # Example
//!
//! ```
//! use chatlist::conversation::{ConversationListModel, ConversationRecord};
//!
//! let mut model = ConversationListModel::default();
//! let ticket = model.begin_load();
//! model.complete_load(
//!     ticket,
//!     Ok(vec![
//!         ConversationRecord::new("111@g.us").with_push_name("Team"),
//!         ConversationRecord::new("222@c.us").with_full_name("Alice"),
//!     ]),
//! );
//!
//! model.set_search_query("al");
//! let visible = model.visible_list();
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].id, "222@c.us");
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod screen;
pub mod source;

// Re-export commonly used types
pub use config::Config;
pub use conversation::{
    ConversationKind, ConversationListModel, ConversationRecord, ConversationSummary, LoadOutcome,
};
pub use error::{ChatListError, Result};
pub use screen::ChatListScreen;
pub use source::{create_source, ConversationSource};

#[cfg(test)]
pub mod test_utils;
