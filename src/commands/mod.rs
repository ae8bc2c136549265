/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `conversations`: list, search and open conversations

Handlers mount a [`crate::screen::ChatListScreen`] on the configured source,
load it once and render the result to stdout.
*/

pub mod conversations;

pub use conversations::{run_list, run_open};
