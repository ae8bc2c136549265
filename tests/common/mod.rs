use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use chatlist::source::{SqliteSource, StoredContact, StoredMessage};

#[allow(dead_code)]
pub fn create_temp_store() -> (SqliteSource, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("messages.db");
    let store = SqliteSource::new_with_path(db_path).expect("failed to create message store");
    (store, tmp)
}

/// Store holding a named group chat and a named contact, contact newest
#[allow(dead_code)]
pub fn create_seeded_store() -> (SqliteSource, TempDir) {
    let (store, tmp) = create_temp_store();

    store
        .insert_message(&StoredMessage::text("111@g.us", "m1", 1_700_000_000, "hi"))
        .expect("failed to insert group message");
    store
        .insert_message(&StoredMessage::text(
            "222@c.us",
            "m2",
            1_700_000_100,
            "see you tomorrow",
        ))
        .expect("failed to insert contact message");

    store
        .upsert_contact(&StoredContact {
            jid: "111@g.us".to_string(),
            push_name: Some("Team".to_string()),
            ..Default::default()
        })
        .expect("failed to upsert group contact");
    store
        .upsert_contact(&StoredContact {
            jid: "222@c.us".to_string(),
            full_name: Some("Alice".to_string()),
            ..Default::default()
        })
        .expect("failed to upsert contact");

    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
