use std::{sync::Arc, thread};
use zoom_slack_status::{
    app::{self, App},
    config, detector, logging,
    reconciler::Reconciler,
    slack::SlackClient,
    state::AppState,
    watcher::ConfigWatcher,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = logging::init();

    let config_path = config::find_config_file()?;
    let config = Arc::new(config::load_config(&config_path)?);
    let detector = detector::build(&config.detection)?;

    let (events, inbox) = crossbeam_channel::unbounded();

    // Without the watcher edits only apply after a restart, which is not worth aborting over.
    let _watcher = match ConfigWatcher::spawn(&config_path, events.clone()) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %config_path.display(),
                "Could not watch config file, changes require a restart"
            );
            None
        }
    };

    let app_state = AppState::new();
    let reconciler = Reconciler::new(config, detector, Box::new(SlackClient::new()))
        .with_config_path(config_path);

    let worker = {
        let app_state = Arc::clone(&app_state);
        thread::Builder::new()
            .name("reconciler".into())
            .spawn(move || reconciler.run(inbox, app_state))?
    };

    app::run(App::new(app_state, events, worker))
}
