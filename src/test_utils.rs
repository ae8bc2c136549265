//! Test utilities for chatlist
//!
//! Shared fixtures: a throwaway message store, the canonical pair of example
//! records and an assertion helper for error messages.

use crate::conversation::ConversationRecord;
use crate::error::Result;
use crate::source::SqliteSource;
use tempfile::TempDir;

/// Create a message store in a fresh temporary directory
///
/// The directory is removed when the returned `TempDir` is dropped, so keep
/// it alive for as long as the store is used.
pub fn temp_store() -> (SqliteSource, TempDir) {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let source = SqliteSource::new_with_path(dir.path().join("messages.db"))
        .expect("Failed to create message store");
    (source, dir)
}

/// A group named only by nickname and a contact named by formal name
pub fn example_records() -> Vec<ConversationRecord> {
    vec![
        ConversationRecord::new("111@g.us")
            .with_full_name("")
            .with_push_name("Team")
            .with_short("")
            .with_latest_message("hi"),
        ConversationRecord::new("222@c.us")
            .with_full_name("Alice")
            .with_push_name("")
            .with_short("")
            .with_latest_message(""),
    ]
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = format!("{:#}", e);
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatListError;

    #[test]
    fn test_temp_store_creates_database() {
        let (source, dir) = temp_store();
        assert!(source.db_path().starts_with(dir.path()));
        assert!(source.db_path().exists());
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(ChatListError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: Result<()> = Err(ChatListError::Config("different error".to_string()).into());
        assert_error_contains(result, "not present");
    }
}
