//! Meeting detection.
//!
//! Two strategies answer the same question: the process scan looks for the
//! process Zoom only starts during a call, the window title scan matches open
//! window titles against ignore/exact/regex rules.

pub mod process;
pub mod window;

use thiserror::Error;

use crate::config::{ConfigError, DetectionConfig};

pub use process::ProcessDetector;
pub use window::{DetectionRuleSet, OsascriptTitles, WindowTitleDetector, WindowTitleSource};

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    #[error("failed to run window listing command: {0}")]
    Command(#[from] std::io::Error),
    #[error("window listing command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },
}

/// Something that can tell whether a meeting is in progress.
pub trait MeetingDetector {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Check for a meeting, reporting enumeration failures.
    fn scan(&mut self) -> Result<bool, DetectionError>;

    /// Check for a meeting. Failures are logged and count as "no meeting".
    fn detect(&mut self) -> bool {
        tracing::debug!(detector = self.name(), "Checking for active meetings");
        match self.scan() {
            Ok(active) => active,
            Err(e) => {
                tracing::warn!(
                    detector = self.name(),
                    error = %e,
                    "Meeting detection failed, assuming no meeting"
                );
                false
            }
        }
    }
}

/// Build the detector selected in the config.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPattern`] if a window title pattern does not compile.
pub fn build(detection: &DetectionConfig) -> Result<Box<dyn MeetingDetector + Send>, ConfigError> {
    match detection {
        DetectionConfig::ProcessScan { hosts } => {
            tracing::info!(hosts = ?hosts, "Using process scan meeting detection");
            Ok(Box::new(ProcessDetector::new(hosts.clone())))
        }
        DetectionConfig::WindowTitle { rules } => {
            let rules = DetectionRuleSet::compile(rules)?;
            tracing::info!("Using window title meeting detection");
            Ok(Box::new(WindowTitleDetector::new(OsascriptTitles, rules)))
        }
    }
}
