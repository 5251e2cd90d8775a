//! The polling loop that keeps Slack statuses in sync with meeting state.
//!
//! The reconciler owns the config snapshot and the detector, and runs on a
//! single thread. Everything that happens elsewhere (config file edits, the
//! tray's quit action) arrives as an [`Event`] in its inbox and is handled
//! between ticks, so no state is shared with callback threads besides the
//! [`AppState`] the tray reads.

use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::{
    path::PathBuf,
    sync::{Arc, RwLock},
    time::Instant,
};

use crate::config::{self, Config, ConfigError};
use crate::detector::{self, MeetingDetector};
use crate::slack::{PublishError, StatusPublisher};
use crate::state::AppState;

/// Messages delivered to the reconciler loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The config file changed on disk.
    ConfigChanged,
    /// The user asked to quit.
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcilerState {
    pub currently_in_meeting: bool,
    /// Bumped every time a new config snapshot is applied.
    pub config_generation: u64,
    /// The generation that was current at the last completed tick.
    pub published_generation: u64,
}

impl ReconcilerState {
    pub fn config_changed(&self) -> bool {
        self.config_generation != self.published_generation
    }

    /// A push is needed on a meeting state transition or after a config change.
    pub fn needs_push(&self, in_meeting: bool) -> bool {
        in_meeting != self.currently_in_meeting || self.config_changed()
    }
}

/// Result of one push cycle over all accounts.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub attempted: usize,
    pub failures: Vec<(String, PublishError)>,
}

impl PublishReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Short description of the failures, if any.
    pub fn error_summary(&self) -> Option<String> {
        match self.failures.as_slice() {
            [] => None,
            [(account, error)] => Some(format!("{account}: {error}")),
            failures => Some(format!(
                "{} of {} status updates failed",
                failures.len(),
                self.attempted
            )),
        }
    }
}

#[derive(Debug)]
pub struct TickOutcome {
    pub in_meeting: bool,
    /// `None` when the status was already up to date and nothing was sent.
    pub report: Option<PublishReport>,
}

fn describe(in_meeting: bool) -> &'static str {
    if in_meeting {
        "in meeting"
    } else {
        "not in meeting"
    }
}

pub struct Reconciler {
    config: Arc<Config>,
    config_path: Option<PathBuf>,
    detector: Box<dyn MeetingDetector + Send>,
    publisher: Box<dyn StatusPublisher + Send>,
    state: ReconcilerState,
    reload_pending: bool,
}

impl Reconciler {
    pub fn new(
        config: Arc<Config>,
        detector: Box<dyn MeetingDetector + Send>,
        publisher: Box<dyn StatusPublisher + Send>,
    ) -> Self {
        Self {
            config,
            config_path: None,
            detector,
            publisher,
            state: ReconcilerState::default(),
            reload_pending: false,
        }
    }

    /// Reload from `path` whenever an [`Event::ConfigChanged`] arrives.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn state(&self) -> ReconcilerState {
        self.state
    }

    /// Swap in a new config snapshot and force a republish on the next tick.
    ///
    /// The detector is rebuilt when the detection settings changed. If that
    /// fails the new snapshot is rejected and the current one stays in effect.
    pub fn apply_config(&mut self, config: Config) -> Result<(), ConfigError> {
        if config.detection != self.config.detection {
            self.detector = detector::build(&config.detection)?;
        }
        self.config = Arc::new(config);
        self.state.config_generation += 1;
        Ok(())
    }

    /// Re-read the config file. Failures keep the previous snapshot.
    pub fn reload(&mut self) {
        let Some(path) = self.config_path.clone() else {
            tracing::debug!("No config path set, ignoring reload request");
            return;
        };

        match config::load_config(&path).and_then(|config| self.apply_config(config)) {
            Ok(()) => tracing::info!(
                generation = self.state.config_generation,
                "Config reloaded, statuses will be republished"
            ),
            Err(e) => tracing::error!(
                error = %e,
                "Failed to reload config, keeping previous settings"
            ),
        }
    }

    /// Run one poll cycle.
    pub fn tick(&mut self) -> TickOutcome {
        if std::mem::take(&mut self.reload_pending) {
            self.reload();
        }

        let was_in_meeting = self.state.currently_in_meeting;
        let in_meeting = self.detector.detect();

        let report = if self.state.needs_push(in_meeting) {
            if in_meeting == was_in_meeting {
                tracing::info!("Config changed, republishing current status");
            }
            Some(self.publish_all(in_meeting))
        } else {
            tracing::info!("Status already set to {}", describe(in_meeting));
            None
        };

        self.state.currently_in_meeting = in_meeting;
        self.state.published_generation = self.state.config_generation;

        TickOutcome { in_meeting, report }
    }

    /// Push the status for `in_meeting` to every account.
    ///
    /// A failing account is logged and skipped; the others are still attempted.
    pub fn publish_all(&self, in_meeting: bool) -> PublishReport {
        tracing::info!(
            accounts = self.config.accounts.len(),
            "Setting status to {}",
            describe(in_meeting)
        );

        let mut report = PublishReport::default();
        for account in &self.config.accounts {
            let status = account.status_for(in_meeting);
            if status.is_clear() {
                tracing::info!(account = %account.name, "Clearing Slack status");
            } else {
                tracing::info!(
                    account = %account.name,
                    text = %status.text,
                    emoji = %status.emoji,
                    "Setting Slack status"
                );
            }

            report.attempted += 1;
            if let Err(e) = self.publisher.publish(status, &account.token) {
                tracing::error!(
                    account = %account.name,
                    error = %e,
                    "Failed to set Slack status"
                );
                report.failures.push((account.name.clone(), e));
            }
        }
        report
    }

    /// Best-effort final push that marks every account as not in a meeting.
    pub fn on_exit(&mut self) -> PublishReport {
        tracing::info!("Resetting status before exit");
        let report = self.publish_all(false);
        self.state.currently_in_meeting = false;
        report
    }

    /// Tick every interval until [`Event::Quit`] arrives or every sender is gone,
    /// then run [`Reconciler::on_exit`].
    pub fn run(mut self, inbox: Receiver<Event>, app_state: Arc<RwLock<AppState>>) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs_f64(),
            accounts = self.config.accounts.len(),
            "Starting status reconciler"
        );

        loop {
            let outcome = self.tick();
            self.record(&app_state, outcome.in_meeting, outcome.report.as_ref());

            if !self.wait_for_next_tick(&inbox) {
                break;
            }
        }

        let report = self.on_exit();
        self.record(&app_state, false, Some(&report));
        tracing::info!("Status reconciler stopped");
    }

    /// Sleep until the next tick, consuming events meanwhile.
    ///
    /// Returns `false` when the loop should stop.
    fn wait_for_next_tick(&mut self, inbox: &Receiver<Event>) -> bool {
        // An interval too long to represent as a deadline waits for events only.
        let deadline = Instant::now().checked_add(self.config.interval);
        loop {
            let received = match deadline {
                Some(deadline) => {
                    inbox.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => inbox.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(Event::ConfigChanged) => {
                    tracing::debug!("Config change queued for next tick");
                    self.reload_pending = true;
                }
                Ok(Event::Quit) => {
                    tracing::info!("Quit requested");
                    return false;
                }
                Err(RecvTimeoutError::Timeout) => return true,
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::info!("Event channel closed, stopping");
                    return false;
                }
            }
        }
    }

    fn record(
        &self,
        app_state: &Arc<RwLock<AppState>>,
        in_meeting: bool,
        report: Option<&PublishReport>,
    ) {
        if let Ok(mut state) = app_state.write() {
            state.set_in_meeting(in_meeting);
            if let Some(report) = report {
                state.set_error(report.error_summary());
            }
        }
    }
}
