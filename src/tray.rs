//! System tray implementation using tray-icon (Windows/macOS).
//!
//! This module is only compiled on non-Linux platforms.
//! Linux uses the ksni-based implementation in tray_linux.rs.

use crossbeam_channel::Receiver;
use std::sync::{Arc, RwLock};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};

use crate::icon::themed_icon;
use crate::state::AppState;

pub enum TrayCommand {
    Quit,
}

pub struct Tray {
    tray_icon: TrayIcon,
    menu_receiver: Receiver<MenuEvent>,
    quit_item_id: MenuId,
    status_item: MenuItem,
    last_status: String,
    last_tooltip: String,
    last_in_meeting: bool,
}

impl Tray {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let icon = Self::load_icon(false)?;

        // Status display (disabled, just for showing info)
        let status_item = MenuItem::new("Status: Not In Meeting", false, None);
        let quit_item = MenuItem::new("Quit Zoom Status", true, None);
        let quit_item_id = quit_item.id().clone();

        let menu = Menu::new();
        menu.append(&status_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&quit_item)?;

        let tray_icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip("Zoom Status")
            .with_icon(icon)
            .build()?;

        let menu_receiver = MenuEvent::receiver().clone();

        tracing::info!("System tray initialized");

        Ok(Tray {
            tray_icon,
            menu_receiver,
            quit_item_id,
            status_item,
            last_status: String::new(),
            last_tooltip: String::new(),
            last_in_meeting: false,
        })
    }

    fn load_icon(in_meeting: bool) -> Result<Icon, Box<dyn std::error::Error>> {
        let image = themed_icon(in_meeting);
        let (width, height) = image.dimensions();
        Icon::from_rgba(image.into_raw(), width, height).map_err(|e| e.into())
    }

    pub fn update_status(&mut self, state: &Arc<RwLock<AppState>>) {
        let Ok(state) = state.read() else {
            return;
        };

        let status = state.status_text();
        if status != self.last_status {
            self.status_item.set_text(&status);
            self.last_status = status;
        }
        let tooltip = state.tooltip();
        if tooltip != self.last_tooltip {
            let _ = self.tray_icon.set_tooltip(Some(&tooltip));
            self.last_tooltip = tooltip;
        }

        if self.last_in_meeting != state.in_meeting {
            match Self::load_icon(state.in_meeting) {
                Ok(icon) => {
                    if let Err(e) = self.tray_icon.set_icon(Some(icon)) {
                        tracing::warn!(error = %e, "Failed to update tray icon");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Failed to render tray icon"),
            }
            self.last_in_meeting = state.in_meeting;
        }
    }

    pub fn poll_events(&mut self) -> Option<TrayCommand> {
        while let Ok(event) = self.menu_receiver.try_recv() {
            if event.id == self.quit_item_id {
                tracing::info!("Quit requested from tray menu");
                return Some(TrayCommand::Quit);
            }
        }
        None
    }
}
