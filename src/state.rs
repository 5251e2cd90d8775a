use std::sync::{Arc, RwLock};

/// State shown by the tray, written by the reconciler.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub in_meeting: bool,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn set_in_meeting(&mut self, in_meeting: bool) {
        self.in_meeting = in_meeting;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.last_error = error;
    }

    fn meeting_label(&self) -> &'static str {
        if self.in_meeting {
            "In Meeting"
        } else {
            "Not In Meeting"
        }
    }

    /// Label for the disabled status menu item.
    pub fn status_text(&self) -> String {
        format!("Status: {}", self.meeting_label())
    }

    pub fn tooltip(&self) -> String {
        match &self.last_error {
            Some(error) => format!("Zoom Status: {} ({})", self.meeting_label(), error),
            None => format!("Zoom Status: {}", self.meeting_label()),
        }
    }
}
