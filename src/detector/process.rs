use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};

use super::{DetectionError, MeetingDetector};

/// Detects a meeting by looking for a known meeting host process.
pub struct ProcessDetector {
    system: System,
    hosts: Vec<String>,
}

impl ProcessDetector {
    pub fn new(hosts: Vec<String>) -> Self {
        Self {
            system: System::new_with_specifics(
                RefreshKind::new().with_processes(ProcessRefreshKind::new()),
            ),
            hosts,
        }
    }
}

impl MeetingDetector for ProcessDetector {
    fn name(&self) -> &'static str {
        "process"
    }

    fn scan(&mut self) -> Result<bool, DetectionError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(DetectionError::Unsupported("process listing"));
        }

        self.system
            .refresh_processes_specifics(ProcessesToUpdate::All, true, ProcessRefreshKind::new());

        let names = self
            .system
            .processes()
            .values()
            .map(|process| process.name().to_string_lossy());
        Ok(contains_meeting_host(names, &self.hosts))
    }
}

/// True if any process name equals one of `hosts`, ignoring ASCII case.
pub fn contains_meeting_host<I, S>(names: I, hosts: &[String]) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().any(|name| {
        let name = name.as_ref();
        hosts.iter().any(|host| host.eq_ignore_ascii_case(name))
    })
}
