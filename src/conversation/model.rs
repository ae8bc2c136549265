//! Conversation list state owned by a single screen
//!
//! [`ConversationListModel`] keeps the fetched summaries, the search query,
//! the selection and the outcome of the last fetch. All mutators take
//! `&mut self`; the model never locks and is meant to live on the task that
//! renders it. Fetches are split into [`ConversationListModel::begin_load`]
//! and [`ConversationListModel::complete_load`] so the fetch itself can run
//! elsewhere while the result is applied by the owner.

use crate::config::{ListConfig, LoadPolicy};
use crate::error::Result;
use crate::source::ConversationSource;

use super::filter::filter_summaries;
use super::record::ConversationRecord;
use super::summary::{summarize_records, ConversationSummary};

/// Identifies one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// Sequence number of the request; later requests have larger numbers
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Why a completed fetch was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// A newer load was requested after this one
    Superseded,
    /// The model was disposed before the fetch finished
    Disposed,
}

/// What a completed fetch did to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The summary list was replaced with `count` summaries
    Applied {
        /// Number of summaries now held
        count: usize,
    },
    /// The fetch failed; the list was kept and the error flag set
    Failed,
    /// The result was dropped without touching any state
    Discarded(DiscardReason),
}

/// Searchable, selectable list of conversation summaries
#[derive(Debug, Clone)]
pub struct ConversationListModel {
    summaries: Vec<ConversationSummary>,
    query: String,
    selection: Option<String>,
    last_error: Option<String>,
    group_suffix: String,
    load_policy: LoadPolicy,
    issued: u64,
    outstanding: usize,
    disposed: bool,
}

impl ConversationListModel {
    /// Create an empty model
    ///
    /// # Examples
    ///
    /// ```
    /// use chatlist::config::ListConfig;
    /// use chatlist::conversation::ConversationListModel;
    ///
    /// let model = ConversationListModel::new(&ListConfig::default());
    /// assert!(model.visible_list().is_empty());
    /// assert!(model.selected().is_none());
    /// ```
    pub fn new(config: &ListConfig) -> Self {
        Self {
            summaries: Vec::new(),
            query: String::new(),
            selection: None,
            last_error: None,
            group_suffix: config.group_suffix.clone(),
            load_policy: config.load_policy,
            issued: 0,
            outstanding: 0,
            disposed: false,
        }
    }

    /// Fetch records from `source` and apply them
    ///
    /// On success the summary list is replaced by the projection of the
    /// fetched records. On failure the list is kept, the failure is logged
    /// and [`Self::last_error`] reports it. There is no retry.
    pub async fn load(&mut self, source: &dyn ConversationSource) -> LoadOutcome {
        let ticket = self.begin_load();
        tracing::debug!(
            ticket = ticket.sequence(),
            source = source.name(),
            "Fetching conversations"
        );
        let result = source.fetch_conversations().await;
        self.complete_load(ticket, result)
    }

    /// Issue a ticket for a load that is about to start
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.outstanding += 1;
        LoadTicket(self.issued)
    }

    /// Apply the result of the fetch identified by `ticket`
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<ConversationRecord>>,
    ) -> LoadOutcome {
        self.outstanding = self.outstanding.saturating_sub(1);

        if self.disposed {
            tracing::debug!(
                ticket = ticket.sequence(),
                "Discarding conversations for disposed list"
            );
            return LoadOutcome::Discarded(DiscardReason::Disposed);
        }

        if self.load_policy == LoadPolicy::LatestRequest && ticket.0 < self.issued {
            tracing::debug!(
                ticket = ticket.sequence(),
                latest = self.issued,
                "Discarding superseded conversation load"
            );
            return LoadOutcome::Discarded(DiscardReason::Superseded);
        }

        match result {
            Ok(records) => {
                self.summaries = summarize_records(&records, &self.group_suffix);
                self.last_error = None;
                tracing::info!(
                    ticket = ticket.sequence(),
                    count = self.summaries.len(),
                    "Loaded conversations"
                );
                LoadOutcome::Applied {
                    count: self.summaries.len(),
                }
            }
            Err(e) => {
                tracing::warn!(
                    ticket = ticket.sequence(),
                    error = %e,
                    "Failed to fetch conversations"
                );
                self.last_error = Some(format!("{:#}", e));
                LoadOutcome::Failed
            }
        }
    }

    /// Mark the model as torn down
    ///
    /// Completions that arrive afterwards are discarded.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Whether [`Self::dispose`] has been called
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether an issued load has not completed yet
    pub fn is_loading(&self) -> bool {
        self.outstanding > 0
    }

    /// Store the search text verbatim
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// Reset the search text
    pub fn clear_search_query(&mut self) {
        self.query.clear();
    }

    pub fn search_query(&self) -> &str {
        &self.query
    }

    /// Summaries whose display name contains the query, in list order
    pub fn visible_list(&self) -> Vec<&ConversationSummary> {
        filter_summaries(&self.summaries, &self.query)
    }

    /// Every summary from the last applied load
    pub fn summaries(&self) -> &[ConversationSummary] {
        &self.summaries
    }

    /// Highlight the conversation with `handle`
    ///
    /// The handle is not validated; an unknown handle simply resolves to
    /// nothing.
    pub fn select(&mut self, handle: impl Into<String>) {
        self.selection = Some(handle.into());
    }

    pub fn selected_handle(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Resolve the selection against the current list
    pub fn selected(&self) -> Option<&ConversationSummary> {
        let handle = self.selection.as_deref()?;
        self.summaries.iter().find(|summary| summary.id == handle)
    }

    /// Message of the last failed fetch, cleared by the next successful one
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }
}

impl Default for ConversationListModel {
    fn default() -> Self {
        Self::new(&ListConfig::default())
    }
}
