use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Advisory append-only log at `~/.tracelift/debug.log` for
/// troubleshooting hook runs after the fact.
///
/// Opened lazily on first write; every I/O failure is swallowed because
/// the log must never interfere with the host process.
pub struct DebugLog {
    path: Option<PathBuf>,
}

impl DebugLog {
    pub fn new() -> Self {
        Self {
            path: dirs::home_dir().map(|home| home.join(".tracelift").join("debug.log")),
        }
    }

    pub fn log(&self, message: &str) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "[{}] {}", Utc::now().to_rfc3339(), message);
        }
    }
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new()
    }
}
