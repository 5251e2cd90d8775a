// Tests for the Slack client in src/slack.rs

mod common;

use mockito::Matcher;
use serde_json::json;
use zoom_slack_status::config::{StatusMessage, Token};
use zoom_slack_status::slack::{PublishError, SlackClient, SlackResponse, StatusPublisher};

// ============================================================================
// Response Deserialization Tests
// ============================================================================

#[test]
fn test_slack_response_ok() {
    let response: SlackResponse = serde_json::from_str(common::fixtures::SLACK_OK).unwrap();

    assert!(response.ok);
    assert!(response.error.is_empty());
    assert!(response.warning.is_empty());
}

#[test]
fn test_slack_response_error() {
    let response: SlackResponse =
        serde_json::from_str(common::fixtures::SLACK_INVALID_AUTH).unwrap();

    assert!(!response.ok);
    assert_eq!(response.error, "invalid_auth");
}

// ============================================================================
// HTTP Mocking Tests - users.profile.set
// ============================================================================

#[test]
fn test_publish_sends_profile_with_bearer_token() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", "/api/users.profile.set")
        .match_header("authorization", "Bearer xoxp-work")
        .match_header("content-type", "application/json; charset=utf-8")
        .match_body(Matcher::Json(json!({
            "profile": {"status_text": "In a meeting", "status_emoji": ":zoom:"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::fixtures::SLACK_OK)
        .create();

    let client = SlackClient::with_base_url(server.url());
    let result = client.publish(
        &StatusMessage::new("In a meeting", ":zoom:"),
        &Token::new("xoxp-work"),
    );

    mock.assert();
    assert!(result.is_ok());
}

#[test]
fn test_publish_clear_status_sends_empty_fields() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", "/api/users.profile.set")
        .match_body(Matcher::Json(json!({
            "profile": {"status_text": "", "status_emoji": ""}
        })))
        .with_status(200)
        .with_body(common::fixtures::SLACK_OK)
        .create();

    let client = SlackClient::with_base_url(server.url());
    let result = client.publish(&StatusMessage::default_no_meeting(), &Token::new("xoxp-work"));

    mock.assert();
    assert!(result.is_ok());
}

#[test]
fn test_publish_warning_is_still_success() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", "/api/users.profile.set")
        .with_status(200)
        .with_body(common::fixtures::SLACK_OK_WITH_WARNING)
        .create();

    let client = SlackClient::with_base_url(server.url());
    let result = client.publish(&StatusMessage::default_meeting(), &Token::new("t"));

    mock.assert();
    assert!(result.is_ok());
}

#[test]
fn test_publish_rejected_when_not_ok() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", "/api/users.profile.set")
        .with_status(200)
        .with_body(common::fixtures::SLACK_INVALID_AUTH)
        .create();

    let client = SlackClient::with_base_url(server.url());
    let result = client.publish(&StatusMessage::default_meeting(), &Token::new("bad"));

    mock.assert();
    match result {
        Err(PublishError::Rejected(reason)) => assert_eq!(reason, "invalid_auth"),
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[test]
fn test_publish_error_status_body_is_still_decoded() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", "/api/users.profile.set")
        .with_status(429)
        .with_header("retry-after", "30")
        .with_body(common::fixtures::SLACK_RATELIMITED)
        .create();

    let client = SlackClient::with_base_url(server.url());
    let result = client.publish(&StatusMessage::default_meeting(), &Token::new("t"));

    mock.assert();
    assert!(matches!(result, Err(PublishError::Rejected(reason)) if reason == "ratelimited"));
}

#[test]
fn test_publish_non_json_body_is_decode_error() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", "/api/users.profile.set")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html><body>Bad Gateway</body></html>")
        .create();

    let client = SlackClient::with_base_url(server.url());
    let result = client.publish(&StatusMessage::default_meeting(), &Token::new("t"));

    mock.assert();
    match result {
        Err(PublishError::Decode(message)) => assert!(message.contains("502")),
        other => panic!("expected Decode, got {:?}", other),
    }
}

#[test]
fn test_publish_connection_refused_is_transport_error() {
    // Nothing listens on port 1
    let client = SlackClient::with_base_url("http://127.0.0.1:1");
    let result = client.publish(&StatusMessage::default_meeting(), &Token::new("t"));

    assert!(matches!(result, Err(PublishError::Transport(_))));
}

#[test]
fn test_publish_error_display() {
    let err = PublishError::Rejected("invalid_auth".to_string());
    assert!(err.to_string().contains("invalid_auth"));

    let err = PublishError::Transport("connection refused".to_string());
    assert!(err.to_string().contains("connection refused"));

    let err = PublishError::Decode("expected value".to_string());
    assert!(err.to_string().contains("expected value"));
}
