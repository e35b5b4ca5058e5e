//! Append-only answer log in JSON Lines format.
//!
//! One [`EventRow`] per line. Readers skip lines that do not parse, so a
//! partially written tail or a hand-edited file never blocks reporting.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dynaproof_core::error::EventLogError;
use dynaproof_core::traits::{EventLog, EventRow};

/// File-backed [`EventLog`].
#[derive(Debug)]
pub struct JsonlEventLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, row: &EventRow) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut line = serde_json::to_string(row)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl EventLog for JsonlEventLog {
    fn try_append(&self, row: &EventRow) -> Result<(), EventLogError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write_line(row)
            .map_err(|e| EventLogError::AppendFailure(format!("{}: {e}", self.path.display())))
    }

    fn read_all(&self) -> Vec<EventRow> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "cannot read event log: {e}");
                return Vec::new();
            }
        };

        content
            .trim_start_matches('\u{feff}')
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match serde_json::from_str::<EventRow>(line) {
                Ok(row) => Some(row),
                Err(e) => {
                    tracing::warn!(line = n + 1, "skipping malformed event row: {e}");
                    None
                }
            })
            .collect()
    }
}
