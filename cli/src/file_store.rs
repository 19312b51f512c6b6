//! Session persistence in a JSON file, the terminal's stand-in for
//! `localStorage`.

#[cfg(test)]
#[path = "file_store_test.rs"]
mod file_store_test;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use authgate::session::Session;
use authgate::supabase::SessionStore;

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read session file");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                None
            }
        }
    }

    fn save(&self, session: &Session) {
        let raw = match serde_json::to_string_pretty(session) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode session");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, raw) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write session file");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "failed to remove session file"),
        }
    }
}
