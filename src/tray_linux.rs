//! Linux-specific tray implementation using ksni (KDE StatusNotifierItem).
//!
//! This module provides native integration with KDE Plasma and other desktop environments
//! that support the freedesktop StatusNotifierItem specification.

use crossbeam_channel::{Receiver, Sender};
use ksni::blocking::TrayMethods;
use ksni::menu::*;
use std::sync::{Arc, RwLock};

use crate::icon::{themed_icon, to_argb};
use crate::state::AppState;

/// Commands that can be triggered from the tray menu.
pub enum TrayCommand {
    Quit,
}

/// Internal state shared between the tray icon and the main application.
struct TrayState {
    in_meeting: bool,
    status_text: String,
    tooltip: String,
    command_sender: Sender<TrayCommand>,
}

/// The ksni tray implementation.
struct StatusTray {
    state: Arc<RwLock<TrayState>>,
}

impl ksni::Tray for StatusTray {
    // Make left-click open the menu (same as right-click)
    const MENU_ON_ACTIVATE: bool = true;

    fn id(&self) -> String {
        "zoom-slack-status".into()
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        let in_meeting = self.state.read().map(|s| s.in_meeting).unwrap_or(false);
        let image = themed_icon(in_meeting);
        let (width, height) = image.dimensions();

        vec![ksni::Icon {
            width: width as i32,
            height: height as i32,
            data: to_argb(&image),
        }]
    }

    fn title(&self) -> String {
        "Zoom Status".into()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        let description = self
            .state
            .read()
            .map(|s| s.tooltip.clone())
            .unwrap_or_else(|_| "Zoom Status".into());

        ksni::ToolTip {
            icon_name: String::new(),
            icon_pixmap: vec![],
            title: "Zoom Status".into(),
            description,
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        let status_text = self
            .state
            .read()
            .map(|s| s.status_text.clone())
            .unwrap_or_else(|_| "Status: Not In Meeting".into());

        vec![
            // Status display (disabled item, just for showing info)
            StandardItem {
                label: status_text,
                enabled: false,
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Quit Zoom Status".into(),
                enabled: true,
                activate: Box::new(|tray: &mut Self| {
                    if let Ok(state) = tray.state.read() {
                        let _ = state.command_sender.send(TrayCommand::Quit);
                    }
                }),
                ..Default::default()
            }
            .into(),
        ]
    }
}

/// Handle to the tray icon, allowing updates from the main thread.
pub struct Tray {
    handle: ksni::blocking::Handle<StatusTray>,
    tray_state: Arc<RwLock<TrayState>>,
    command_receiver: Receiver<TrayCommand>,
    last_tooltip: String,
}

impl Tray {
    /// Creates a new system tray icon.
    ///
    /// This spawns a background task to handle the D-Bus StatusNotifierItem protocol.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let (command_sender, command_receiver) = crossbeam_channel::unbounded();

        let tray_state = Arc::new(RwLock::new(TrayState {
            in_meeting: false,
            status_text: "Status: Not In Meeting".into(),
            tooltip: "Zoom Status".into(),
            command_sender,
        }));

        let tray = StatusTray {
            state: Arc::clone(&tray_state),
        };

        // Spawn the tray using the blocking API (ksni handles the event loop internally)
        let handle = tray.spawn().map_err(|e| {
            tracing::error!("Failed to spawn ksni tray: {}", e);
            Box::new(std::io::Error::other(format!("ksni spawn failed: {}", e)))
                as Box<dyn std::error::Error>
        })?;

        tracing::info!("System tray initialized (ksni/StatusNotifierItem)");

        Ok(Tray {
            handle,
            tray_state,
            command_receiver,
            last_tooltip: String::new(),
        })
    }

    /// Updates the tray status display based on the current application state.
    pub fn update_status(&mut self, state: &Arc<RwLock<AppState>>) {
        let Ok(app_state) = state.read() else {
            return;
        };

        // The tooltip includes the meeting state, so it changes whenever anything shown does.
        let tooltip = app_state.tooltip();
        if tooltip == self.last_tooltip {
            return;
        }

        if let Ok(mut tray_state) = self.tray_state.write() {
            tray_state.in_meeting = app_state.in_meeting;
            tray_state.status_text = app_state.status_text();
            tray_state.tooltip = tooltip.clone();
        }

        // Signal ksni to refresh the tray
        self.handle.update(|_| {});
        self.last_tooltip = tooltip;
    }

    /// Polls for menu events and returns any command that was triggered.
    pub fn poll_events(&mut self) -> Option<TrayCommand> {
        match self.command_receiver.try_recv() {
            Ok(TrayCommand::Quit) => {
                tracing::info!("Quit requested from tray menu");
                Some(TrayCommand::Quit)
            }
            Err(_) => None,
        }
    }
}
