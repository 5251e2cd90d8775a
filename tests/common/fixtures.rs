// JSON fixtures for config files and Slack API responses
// Allow dead code since fixtures are used by different test files compiled separately
#![allow(dead_code)]

/// Config document with two accounts, one using the default statuses.
pub const CONFIG_TWO_ACCOUNTS: &str = r#"{
    "accounts": [
        {
            "name": "work",
            "token": "xoxp-work",
            "meetingStatus": {"status_text": "On a call", "status_emoji": ":phone:"},
            "noMeetingStatus": {"status_text": "Heads down", "status_emoji": ":computer:"}
        },
        {
            "name": "community",
            "token": "xoxp-community"
        }
    ],
    "interval": "30s"
}"#;

/// The older layout: a bare list of accounts.
pub const CONFIG_LEGACY_ARRAY: &str = r#"[
    {"name": "work", "token": "xoxp-work"},
    {"name": "home", "token": "xoxp-home", "meetingStatus": {"status_text": "Busy", "status_emoji": ":no_entry:"}}
]"#;

/// Window title detection with custom rules.
pub const CONFIG_WINDOW_TITLE: &str = r#"{
    "accounts": [{"name": "work", "token": "xoxp-work"}],
    "detector": "window-title",
    "windowRules": {
        "ignore": ["Zoom - Pro Account"],
        "exact": ["Zoom Meeting"],
        "patterns": ["^Zoom Meeting ID"]
    }
}"#;

/// Window title detection with a pattern that does not compile.
pub const CONFIG_BAD_PATTERN: &str = r#"{
    "accounts": [{"name": "work", "token": "xoxp-work"}],
    "detector": "window-title",
    "windowRules": {"patterns": ["Zoom ("]}
}"#;

/// Slack: successful profile update
pub const SLACK_OK: &str = r#"{"ok": true, "profile": {"status_text": "In a meeting", "status_emoji": ":zoom:"}}"#;

/// Slack: successful profile update with a warning
pub const SLACK_OK_WITH_WARNING: &str = r#"{"ok": true, "warning": "missing_charset", "response_metadata": {"warnings": ["missing_charset"]}}"#;

/// Slack: invalid token
pub const SLACK_INVALID_AUTH: &str = r#"{"ok": false, "error": "invalid_auth"}"#;

/// Slack: rate limited
pub const SLACK_RATELIMITED: &str = r#"{"ok": false, "error": "ratelimited"}"#;
