use regex::Regex;
use std::collections::HashSet;

use super::{DetectionError, MeetingDetector};
use crate::config::{ConfigError, WindowRules};

/// Only titles containing this are checked against the rules.
pub const TITLE_KEYWORD: &str = "Zoom";

/// Lists the titles of all open windows of all processes.
pub trait WindowTitleSource {
    /// Raw, comma separated listing as produced by the OS automation bridge.
    fn window_titles(&self) -> Result<String, DetectionError>;
}

/// Reads window titles through System Events (macOS only).
pub struct OsascriptTitles;

#[cfg(target_os = "macos")]
const WINDOW_TITLE_SCRIPT: &str =
    r#"tell application "System Events" to get the name of every window of every process"#;

impl WindowTitleSource for OsascriptTitles {
    #[cfg(target_os = "macos")]
    fn window_titles(&self) -> Result<String, DetectionError> {
        use std::process::Command;

        let output = Command::new("osascript")
            .args(["-e", WINDOW_TITLE_SCRIPT])
            .output()?;

        if !output.status.success() {
            return Err(DetectionError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    #[cfg(not(target_os = "macos"))]
    fn window_titles(&self) -> Result<String, DetectionError> {
        Err(DetectionError::Unsupported("window title listing"))
    }
}

/// Compiled window title rules.
#[derive(Debug, Clone)]
pub struct DetectionRuleSet {
    ignore: HashSet<String>,
    exact: HashSet<String>,
    patterns: Vec<Regex>,
}

impl DetectionRuleSet {
    /// Compile the rules from the config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first pattern that does not compile.
    pub fn compile(rules: &WindowRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ignore: rules.ignore.iter().cloned().collect(),
            exact: rules.exact.iter().cloned().collect(),
            patterns,
        })
    }

    /// Whether a single, already trimmed title indicates a meeting.
    ///
    /// Rules apply in order: ignore, exact, then patterns.
    pub fn title_matches(&self, title: &str) -> bool {
        if !title.contains(TITLE_KEYWORD) || self.ignore.contains(title) {
            return false;
        }
        self.exact.contains(title) || self.patterns.iter().any(|re| re.is_match(title))
    }

    /// Whether any title in a raw window listing indicates a meeting.
    pub fn listing_matches(&self, listing: &str) -> bool {
        match split_titles(listing).find(|title| self.title_matches(title)) {
            Some(title) => {
                tracing::debug!(title, "Window title matched meeting rules");
                true
            }
            None => false,
        }
    }
}

/// Split a window listing into trimmed, non-empty titles.
pub fn split_titles(listing: &str) -> impl Iterator<Item = &str> {
    listing
        .split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
}

/// Detects a meeting from open window titles.
pub struct WindowTitleDetector<S> {
    source: S,
    rules: DetectionRuleSet,
}

impl<S: WindowTitleSource> WindowTitleDetector<S> {
    pub fn new(source: S, rules: DetectionRuleSet) -> Self {
        Self { source, rules }
    }
}

impl<S: WindowTitleSource> MeetingDetector for WindowTitleDetector<S> {
    fn name(&self) -> &'static str {
        "window-title"
    }

    fn scan(&mut self) -> Result<bool, DetectionError> {
        let listing = self.source.window_titles()?;
        Ok(self.rules.listing_matches(&listing))
    }
}
