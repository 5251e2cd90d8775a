//! Slack `users.profile.set` client.

use serde::{Deserialize, Serialize};
use std::{sync::OnceLock, time::Duration};
use thiserror::Error;
use ureq::Agent;

use crate::config::{StatusMessage, Token};

pub const DEFAULT_SLACK_BASE_URL: &str = "https://slack.com";

const PROFILE_SET_PATH: &str = "/api/users.profile.set";

static USER_AGENT: OnceLock<String> = OnceLock::new();

pub fn user_agent() -> &'static str {
    USER_AGENT
        .get_or_init(|| format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")))
        .as_str()
}

#[derive(Error, Debug)]
pub enum PublishError {
    /// Connection, TLS, timeout or other I/O failure.
    #[error("request failed: {0}")]
    Transport(String),
    /// The response body was not a Slack API envelope.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// Slack answered with `ok: false`.
    #[error("rejected by Slack: {0}")]
    Rejected(String),
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Pushes a status for one account.
pub trait StatusPublisher {
    fn publish(&self, status: &StatusMessage, token: &Token) -> Result<(), PublishError>;
}

#[derive(Serialize, Debug)]
pub struct ProfileUpdate<'a> {
    pub profile: &'a StatusMessage,
}

/// The common part of every Slack Web API response.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SlackResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub warning: String,
}

pub struct SlackClient {
    agent: Agent,
    base_url: String,
}

impl Default for SlackClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SlackClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_SLACK_BASE_URL)
    }

    /// Create a client that talks to `base_url` instead of slack.com.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        // Slack reports failures in the body, so keep error statuses readable.
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .user_agent(user_agent())
            .http_status_as_error(false)
            .build();

        Self {
            agent: config.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PROFILE_SET_PATH)
    }
}

impl StatusPublisher for SlackClient {
    fn publish(&self, status: &StatusMessage, token: &Token) -> Result<(), PublishError> {
        let body = serde_json::to_string(&ProfileUpdate { profile: status })?;

        let mut response = self
            .agent
            .post(&self.endpoint())
            .header("Content-Type", "application/json; charset=utf-8")
            .header("Authorization", format!("Bearer {}", token.as_str()))
            .send(body)
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let http_status = response.status().as_u16();
        let envelope = response
            .body_mut()
            .read_json::<SlackResponse>()
            .map_err(|e| PublishError::Decode(format!("HTTP {http_status}: {e}")))?;

        interpret_response(envelope)
    }
}

/// Turn a decoded envelope into the publish result.
///
/// Warnings are logged but do not fail the call.
pub fn interpret_response(response: SlackResponse) -> Result<(), PublishError> {
    if !response.warning.is_empty() {
        tracing::warn!(warning = %response.warning, "Slack returned a warning");
    }
    if !response.ok {
        let reason = if response.error.is_empty() {
            "unknown_error".to_string()
        } else {
            response.error
        };
        return Err(PublishError::Rejected(reason));
    }
    Ok(())
}
