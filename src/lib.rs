pub mod app;
pub mod config;
pub mod detector;
pub mod icon;
pub mod logging;
pub mod reconciler;
pub mod slack;
pub mod state;
pub mod watcher;

// Platform-specific tray implementations:
// - Linux: ksni (KDE StatusNotifierItem) for native KDE/freedesktop support
// - Windows/macOS: tray-icon crate
#[cfg(target_os = "linux")]
#[path = "tray_linux.rs"]
pub mod tray;

#[cfg(not(target_os = "linux"))]
pub mod tray;
