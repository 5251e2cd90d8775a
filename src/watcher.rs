//! Watches the config file and notifies the reconciler when it changes.

use crossbeam_channel::Sender;
use notify::{Config, Event as FsEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::reconciler::Event;

/// Keeps the underlying watcher alive. Dropping it stops notifications.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Start watching `path`, sending [`Event::ConfigChanged`] to `sender` on every change.
    ///
    /// The parent directory is watched rather than the file itself, so editors
    /// that save by renaming a temporary file over the original still trigger it.
    pub fn spawn(path: &Path, sender: Sender<Event>) -> notify::Result<Self> {
        let file_name = path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::path_not_found().add_path(path.to_path_buf()))?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<FsEvent>| match res {
                Ok(event) => {
                    if is_relevant(&event, &file_name) {
                        tracing::debug!(kind = ?event.kind, "Config file changed");
                        let _ = sender.send(Event::ConfigChanged);
                    }
                }
                Err(e) => tracing::error!(error = %e, "Config watcher error"),
            },
            Config::default(),
        )?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Watching config file for changes");
        Ok(Self { _watcher: watcher })
    }
}

/// Whether a file system event touches the config file's contents.
fn is_relevant(event: &FsEvent, file_name: &OsString) -> bool {
    let touches_content = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    touches_content
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind};

    fn name() -> OsString {
        OsString::from(".slack-status-config.json")
    }

    #[test]
    fn test_modify_of_config_file_is_relevant() {
        let event = FsEvent::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("/home/me/.slack-status-config.json"));
        assert!(is_relevant(&event, &name()));
    }

    #[test]
    fn test_create_of_config_file_is_relevant() {
        let event = FsEvent::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/home/me/.slack-status-config.json"));
        assert!(is_relevant(&event, &name()));
    }

    #[test]
    fn test_other_files_are_ignored() {
        let event = FsEvent::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/home/me/.bashrc"));
        assert!(!is_relevant(&event, &name()));
    }

    #[test]
    fn test_access_events_are_ignored() {
        let event = FsEvent::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("/home/me/.slack-status-config.json"));
        assert!(!is_relevant(&event, &name()));
    }
}
