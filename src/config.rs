//! Loading and resolving `.slack-status-config.json`.
//!
//! The file is parsed into raw serde types first and then resolved into an
//! immutable [`Config`] snapshot. Default statuses are filled in here, once,
//! so the rest of the program never deals with missing overrides.

use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// File name looked up in the home directory, then in the working directory.
pub const CONFIG_FILE_NAME: &str = ".slack-status-config.json";

/// Poll interval used when the config file does not set one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Longest accepted poll interval.
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Process that only exists while a Zoom meeting is in progress (macOS).
pub const DEFAULT_MEETING_PROCESS: &str = "CptHost";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not find .slack-status-config.json in any of {searched:?}")]
    NotFound { searched: Vec<PathBuf> },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid interval {0:?}, expected something like \"60s\" or \"1m30s\", at most 24h")]
    InvalidInterval(String),
    #[error("invalid window title pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// The status text and emoji pushed to Slack.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessage {
    #[serde(rename = "status_text", alias = "text", default)]
    pub text: String,
    #[serde(rename = "status_emoji", alias = "emoji", default)]
    pub emoji: String,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emoji: emoji.into(),
        }
    }

    /// Status used when an account has no `meetingStatus`.
    pub fn default_meeting() -> Self {
        Self::new("In a meeting", ":zoom:")
    }

    /// Status used when an account has no `noMeetingStatus`. Empty fields clear the status.
    pub fn default_no_meeting() -> Self {
        Self::default()
    }

    pub fn is_clear(&self) -> bool {
        self.text.is_empty() && self.emoji.is_empty()
    }
}

/// A Slack API token. Never printed in full.
#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// A Slack account with both statuses already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub token: Token,
    pub meeting_status: StatusMessage,
    pub no_meeting_status: StatusMessage,
}

impl Account {
    pub fn status_for(&self, in_meeting: bool) -> &StatusMessage {
        if in_meeting {
            &self.meeting_status
        } else {
            &self.no_meeting_status
        }
    }
}

/// Window title rules, kept as written in the config file.
///
/// They are compiled into a `DetectionRuleSet` when the detector is built.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WindowRules {
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub exact: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Default for WindowRules {
    fn default() -> Self {
        Self {
            ignore: vec![
                "Zoom - Pro Account".to_string(),
                "Zoom - Free Account".to_string(),
                "Zoom - Licensed Account".to_string(),
            ],
            exact: vec![
                "Zoom".to_string(),
                "Zoom Meeting".to_string(),
                "Zoom Webinar".to_string(),
            ],
            patterns: vec![
                r"^Zoom Meeting ID:? ?[\d ]+$".to_string(),
                r"^Zoom Webinar ID:? ?[\d ]+$".to_string(),
            ],
        }
    }
}

/// How meetings are detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionConfig {
    /// A meeting is active while one of `hosts` is running.
    ProcessScan { hosts: Vec<String> },
    /// A meeting is active while a window title matches `rules`.
    WindowTitle { rules: WindowRules },
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig::ProcessScan {
            hosts: vec![DEFAULT_MEETING_PROCESS.to_string()],
        }
    }
}

/// Immutable configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub accounts: Vec<Account>,
    pub interval: Duration,
    pub detection: DetectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            interval: DEFAULT_INTERVAL,
            detection: DetectionConfig::default(),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    name: String,
    token: Token,
    meeting_status: Option<StatusMessage>,
    no_meeting_status: Option<StatusMessage>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum DetectorKind {
    #[default]
    Process,
    WindowTitle,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    accounts: Vec<RawAccount>,
    interval: Option<String>,
    #[serde(default)]
    detector: DetectorKind,
    meeting_processes: Option<Vec<String>>,
    window_rules: Option<WindowRules>,
}

impl From<RawAccount> for Account {
    fn from(raw: RawAccount) -> Self {
        Account {
            name: raw.name,
            token: raw.token,
            meeting_status: raw
                .meeting_status
                .unwrap_or_else(StatusMessage::default_meeting),
            no_meeting_status: raw
                .no_meeting_status
                .unwrap_or_else(StatusMessage::default_no_meeting),
        }
    }
}

impl RawConfig {
    fn resolve(self) -> Result<Config, ConfigError> {
        let interval = match self.interval.as_deref() {
            Some(value) => parse_interval(value)?,
            None => DEFAULT_INTERVAL,
        };

        let detection = match self.detector {
            DetectorKind::Process => DetectionConfig::ProcessScan {
                hosts: self
                    .meeting_processes
                    .filter(|hosts| !hosts.is_empty())
                    .unwrap_or_else(|| vec![DEFAULT_MEETING_PROCESS.to_string()]),
            },
            DetectorKind::WindowTitle => DetectionConfig::WindowTitle {
                rules: self.window_rules.unwrap_or_default(),
            },
        };

        Ok(Config {
            accounts: self.accounts.into_iter().map(Account::from).collect(),
            interval,
            detection,
        })
    }
}

/// Parse a config document from a string.
///
/// `path` is only used for error messages.
pub fn parse_config(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    let parse_error = |source: serde_json::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };

    // A top-level array is the older layout: just the list of accounts.
    let raw = if contents.trim_start().starts_with('[') {
        RawConfig {
            accounts: serde_json::from_str(contents).map_err(parse_error)?,
            ..RawConfig::default()
        }
    } else {
        serde_json::from_str::<RawConfig>(contents).map_err(parse_error)?
    };

    raw.resolve()
}

/// Load and resolve the config file at `path`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    tracing::info!(path = %path.display(), "Loading config");

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents, path)?;

    if config.accounts.is_empty() {
        tracing::warn!(path = %path.display(), "No accounts configured, nothing will be updated");
    }
    tracing::info!(
        accounts = config.accounts.len(),
        interval_secs = config.interval.as_secs_f64(),
        "Config loaded"
    );

    Ok(config)
}

/// Candidate locations for the config file, in lookup order.
pub fn config_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(CONFIG_FILE_NAME));
    }
    if let Ok(cwd) = env::current_dir() {
        locations.push(cwd.join(CONFIG_FILE_NAME));
    }
    locations
}

/// Find the first existing config file.
pub fn find_config_file() -> Result<PathBuf, ConfigError> {
    let locations = config_locations();
    match locations.iter().find(|path| path.is_file()) {
        Some(path) => Ok(path.clone()),
        None => Err(ConfigError::NotFound { searched: locations }),
    }
}

/// Parse a duration such as `"60s"`, `"500ms"` or `"1m30s"`.
///
/// A bare number is read as seconds. Zero and anything above [`MAX_INTERVAL`]
/// are rejected.
pub fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidInterval(value.to_string());
    let input = value.trim();
    if input.is_empty() {
        return Err(invalid());
    }

    if let Ok(secs) = input.parse::<u64>() {
        return match Duration::from_secs(secs) {
            interval if interval.is_zero() || interval > MAX_INTERVAL => Err(invalid()),
            interval => Ok(interval),
        };
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        if digits == 0 {
            return Err(invalid());
        }
        let amount: u64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let segment = match &rest[..unit_len] {
            "ms" => Duration::from_millis(amount),
            "s" => Duration::from_secs(amount),
            "m" => Duration::from_secs(amount.saturating_mul(60)),
            "h" => Duration::from_secs(amount.saturating_mul(3600)),
            _ => return Err(invalid()),
        };
        total = total.saturating_add(segment);
        rest = &rest[unit_len..];
    }

    if total.is_zero() || total > MAX_INTERVAL {
        return Err(invalid());
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval_units() {
        assert_eq!(parse_interval("60s").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_interval("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_interval("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_interval("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_interval("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_interval(" 45 ").unwrap(), Duration::from_secs(45));
    }

    #[test]
    fn test_parse_interval_rejects_garbage() {
        for value in ["", "s", "10x", "1.5s", "0s", "0", "m5", "60 s", "10us"] {
            assert!(
                matches!(parse_interval(value), Err(ConfigError::InvalidInterval(_))),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_interval_upper_bound() {
        assert_eq!(parse_interval("24h").unwrap(), MAX_INTERVAL);
        assert_eq!(parse_interval("86400").unwrap(), MAX_INTERVAL);
        for value in ["24h1s", "86401", "18446744073709551615", "999999999999h"] {
            assert!(
                matches!(parse_interval(value), Err(ConfigError::InvalidInterval(_))),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = Token::new("xoxp-secret");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("xoxp-secret"));
        assert_eq!(token.as_str(), "xoxp-secret");
    }

    #[test]
    fn test_account_status_for() {
        let account = Account::from(RawAccount {
            name: "work".to_string(),
            token: Token::new("t"),
            meeting_status: None,
            no_meeting_status: Some(StatusMessage::new("Around", ":wave:")),
        });

        assert_eq!(account.status_for(true), &StatusMessage::default_meeting());
        assert_eq!(
            account.status_for(false),
            &StatusMessage::new("Around", ":wave:")
        );
    }
}
