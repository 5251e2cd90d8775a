// Tests for the config file watcher in src/watcher.rs

use std::{fs, time::Duration};
use tempfile::TempDir;
use zoom_slack_status::reconciler::Event;
use zoom_slack_status::watcher::ConfigWatcher;

#[test]
fn test_writing_config_file_sends_event() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".slack-status-config.json");
    fs::write(&path, "{}").unwrap();

    let (sender, receiver) = crossbeam_channel::unbounded();
    let _watcher = ConfigWatcher::spawn(&path, sender).unwrap();

    fs::write(&path, r#"{"interval": "30s"}"#).unwrap();

    let event = receiver.recv_timeout(Duration::from_secs(5));
    assert_eq!(event, Ok(Event::ConfigChanged));
}

#[test]
fn test_other_files_in_directory_are_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".slack-status-config.json");
    fs::write(&path, "{}").unwrap();

    let (sender, receiver) = crossbeam_channel::unbounded();
    let _watcher = ConfigWatcher::spawn(&path, sender).unwrap();

    fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    assert!(receiver.recv_timeout(Duration::from_millis(500)).is_err());
}
