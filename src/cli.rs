//! Command-line interface definition for chatlist
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for listing, searching and opening conversations.

use clap::{Parser, Subcommand};

/// chatlist - conversation list for a desktop messaging client
///
/// Loads conversations from the configured backend, filters them by a
/// case-insensitive search term and resolves a selected conversation.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the local message store (sqlite source)
    #[arg(long, env = "CHATLIST_DB")]
    pub db_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for chatlist
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List conversations, optionally filtered by a search term
    List {
        /// Case-insensitive substring matched against display names
        #[arg(short, long)]
        query: Option<String>,

        /// Print the visible list as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Select a conversation by handle and show it
    Open {
        /// Conversation handle (for example `12345@g.us`)
        handle: String,

        /// Search term applied before resolving the selection
        #[arg(short, long)]
        query: Option<String>,

        /// Print the resolved summary as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
