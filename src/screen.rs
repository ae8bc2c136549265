//! Chat list screen driver
//!
//! [`ChatListScreen`] owns a [`ConversationListModel`] and runs its fetches
//! on background tasks. Results travel back over an unbounded
//! [`tokio::sync::mpsc`] channel and are applied only when the owner asks
//! for them, so the model is never touched from another task. Tearing the
//! screen down cancels in-flight fetches through a
//! [`tokio_util::sync::CancellationToken`]; anything that still arrives is
//! discarded by the disposed model.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::ListConfig;
use crate::conversation::{
    ConversationListModel, ConversationRecord, ConversationSummary, LoadOutcome, LoadTicket,
};
use crate::error::{ChatListError, Result};
use crate::source::ConversationSource;

type Completion = (LoadTicket, Result<Vec<ConversationRecord>>);

/// A mounted conversation list
pub struct ChatListScreen {
    model: ConversationListModel,
    source: Arc<dyn ConversationSource>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    shutdown: CancellationToken,
}

impl ChatListScreen {
    pub fn new(source: Arc<dyn ConversationSource>, config: &ListConfig) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            model: ConversationListModel::new(config),
            source,
            completions_tx,
            completions_rx,
            shutdown: CancellationToken::new(),
        }
    }

    /// Start a fetch in the background
    ///
    /// Must be called from within a tokio runtime. A fetch that panics
    /// completes as a failed load. The result is applied by
    /// [`Self::next_completion`] or [`Self::drain_completions`].
    pub fn request_load(&mut self) -> LoadTicket {
        let ticket = self.model.begin_load();
        let source = Arc::clone(&self.source);
        let tx = self.completions_tx.clone();
        let token = self.shutdown.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(ticket = ticket.sequence(), "Conversation fetch cancelled");
                }
                result = AssertUnwindSafe(source.fetch_conversations()).catch_unwind() => {
                    let result = result.unwrap_or_else(|_| {
                        tracing::error!(
                            ticket = ticket.sequence(),
                            source = source.name(),
                            "Conversation fetch panicked"
                        );
                        Err(ChatListError::Fetch("fetch task failed".to_string()).into())
                    });
                    if tx.send((ticket, result)).is_err() {
                        tracing::debug!(
                            ticket = ticket.sequence(),
                            "Chat list screen gone, dropping conversations"
                        );
                    }
                }
            }
        });

        ticket
    }

    /// Wait for the next fetch to finish and apply it
    ///
    /// Returns `None` when nothing is in flight or the screen was shut down.
    pub async fn next_completion(&mut self) -> Option<(LoadTicket, LoadOutcome)> {
        if self.model.is_disposed() || !self.model.is_loading() {
            return None;
        }

        let (ticket, result) = tokio::select! {
            _ = self.shutdown.cancelled() => return None,
            completion = self.completions_rx.recv() => completion?,
        };
        Some((ticket, self.model.complete_load(ticket, result)))
    }

    /// Apply every fetch that has already finished, without waiting
    pub fn drain_completions(&mut self) -> Vec<(LoadTicket, LoadOutcome)> {
        let mut applied = Vec::new();
        while let Ok((ticket, result)) = self.completions_rx.try_recv() {
            applied.push((ticket, self.model.complete_load(ticket, result)));
        }
        applied
    }

    /// Request a load and wait until that particular load has been applied
    ///
    /// Completions of older loads that arrive first are applied (or
    /// discarded) along the way.
    pub async fn refresh(&mut self) -> Option<LoadOutcome> {
        let ticket = self.request_load();
        while let Some((completed, outcome)) = self.next_completion().await {
            if completed == ticket {
                return Some(outcome);
            }
        }
        None
    }

    pub fn model(&self) -> &ConversationListModel {
        &self.model
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.model.set_search_query(text);
    }

    pub fn select(&mut self, handle: impl Into<String>) {
        self.model.select(handle);
    }

    pub fn visible_list(&self) -> Vec<&ConversationSummary> {
        self.model.visible_list()
    }

    pub fn selected(&self) -> Option<&ConversationSummary> {
        self.model.selected()
    }

    /// Tear the screen down
    ///
    /// In-flight fetches are cancelled and the model stops accepting results.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        self.model.dispose();
        for (ticket, outcome) in self.drain_completions() {
            tracing::debug!(
                ticket = ticket.sequence(),
                ?outcome,
                "Dropped conversations after shutdown"
            );
        }
    }
}

impl Drop for ChatListScreen {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
