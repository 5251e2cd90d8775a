//! Main-thread driver: keeps the tray in sync with the reconciler and turns
//! the tray's quit action into [`Event::Quit`].
//!
//! Linux drives the tray from a plain polling loop (ksni has its own D-Bus
//! thread). Windows and macOS need a native event loop on the main thread for
//! tray-icon menus to work, which winit provides.

use crossbeam_channel::Sender;
use std::{
    sync::{Arc, RwLock},
    thread::JoinHandle,
    time::Duration,
};

use crate::reconciler::Event;
use crate::state::AppState;
use crate::tray::{Tray, TrayCommand};

/// How often the tray is refreshed and polled for menu events.
const TRAY_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct App {
    state: Arc<RwLock<AppState>>,
    events: Sender<Event>,
    worker: Option<JoinHandle<()>>,
    tray: Option<Tray>,
}

impl App {
    pub fn new(state: Arc<RwLock<AppState>>, events: Sender<Event>, worker: JoinHandle<()>) -> Self {
        Self {
            state,
            events,
            worker: Some(worker),
            tray: None,
        }
    }

    fn create_tray(&mut self) {
        match Tray::new() {
            Ok(tray) => self.tray = Some(tray),
            Err(e) => tracing::error!(error = %e, "Failed to create system tray, running headless"),
        }
    }

    /// Refresh the tray and handle its commands. Returns `false` once the app should exit.
    fn step(&mut self) -> bool {
        if self.worker.as_ref().is_some_and(|worker| worker.is_finished()) {
            tracing::warn!("Status reconciler stopped");
            return false;
        }

        let Some(tray) = self.tray.as_mut() else {
            return true;
        };
        tray.update_status(&self.state);
        !matches!(tray.poll_events(), Some(TrayCommand::Quit))
    }

    /// Ask the reconciler to stop and wait until its final status push is done.
    fn shutdown(&mut self) {
        let _ = self.events.send(Event::Quit);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Status reconciler thread panicked");
            }
        }
        tracing::info!("Exiting");
    }
}

#[cfg(target_os = "linux")]
pub fn run(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    app.create_tray();
    while app.step() {
        std::thread::sleep(TRAY_POLL_INTERVAL);
    }
    app.shutdown();
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub use event_loop::run;

#[cfg(not(target_os = "linux"))]
mod event_loop {
    use std::time::Instant;
    use winit::{
        application::ApplicationHandler,
        event::{StartCause, WindowEvent},
        event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
        window::WindowId,
    };

    use super::{App, TRAY_POLL_INTERVAL};

    impl ApplicationHandler for App {
        fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
            // The tray has to be created once the platform event loop is running.
            if matches!(cause, StartCause::Init) {
                self.create_tray();
            }
        }

        fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

        fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, _event: WindowEvent) {}

        fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
            if self.step() {
                event_loop.set_control_flow(ControlFlow::WaitUntil(
                    Instant::now() + TRAY_POLL_INTERVAL,
                ));
            } else {
                event_loop.exit();
            }
        }
    }

    pub fn run(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut app)?;
        app.shutdown();
        Ok(())
    }
}
