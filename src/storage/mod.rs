//! Cross-session conveniences persisted under the state directory.
//!
//! Everything here is best-effort: a failure to read or write must never
//! break the board view, so errors are logged and swallowed at the public
//! surface.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::model::BoardScope;

/// Namespaced key the last-visited board is stored under.
const LAST_VISITED_KEY: &str = "stickyboard-last-visited-board";

#[derive(Debug, Serialize, Deserialize)]
struct LastVisitedRecord {
    board_id: String,
    saved_at: i64,
}

/// Remembers the last concrete board the user opened, so the next session
/// can land there directly. Pseudo-boards are never recorded.
#[derive(Debug, Clone)]
pub struct LastVisitedStore {
    path: PathBuf,
}

impl LastVisitedStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(format!("{LAST_VISITED_KEY}.json")),
        }
    }

    /// Records the scope if it names a concrete board. Failures are logged
    /// and swallowed.
    pub fn record(&self, scope: &BoardScope) {
        let Some(board_id) = scope.board_id() else {
            return;
        };
        if let Err(err) = self.write(board_id) {
            tracing::warn!(%err, board_id, "failed to save last visited board");
        }
    }

    /// Returns the remembered board id, or `None` when nothing usable is on
    /// disk.
    pub fn load(&self) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        match self.read() {
            Ok(record) => Some(record.board_id),
            Err(err) => {
                tracing::warn!(%err, "failed to read last visited board");
                None
            }
        }
    }

    fn write(&self, board_id: &str) -> Result<()> {
        let record = LastVisitedRecord {
            board_id: board_id.to_string(),
            saved_at: OffsetDateTime::now_utc().unix_timestamp(),
        };
        let json = serde_json::to_vec_pretty(&record).context("serialising last visited record")?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("ensuring state dir {}", parent.display()))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("persisting {}", self.path.display()))?;
        Ok(())
    }

    fn read(&self) -> Result<LastVisitedRecord> {
        let raw = fs::read(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn records_and_reloads_concrete_boards() {
        let temp = TempDir::new().expect("tempdir");
        let store = LastVisitedStore::new(temp.path());
        assert_eq!(store.load(), None);

        store.record(&BoardScope::Board("b-17".into()));
        assert_eq!(store.load(), Some("b-17".to_string()));

        store.record(&BoardScope::Board("b-18".into()));
        assert_eq!(store.load(), Some("b-18".to_string()));
    }

    #[test]
    fn pseudo_boards_are_never_recorded() {
        let temp = TempDir::new().expect("tempdir");
        let store = LastVisitedStore::new(temp.path());
        store.record(&BoardScope::Board("b-1".into()));
        store.record(&BoardScope::AllNotes);
        store.record(&BoardScope::Archive);
        assert_eq!(store.load(), Some("b-1".to_string()));
    }

    #[test]
    fn corrupt_state_file_degrades_to_none() {
        let temp = TempDir::new().expect("tempdir");
        let store = LastVisitedStore::new(temp.path());
        fs::write(
            temp.path().join("stickyboard-last-visited-board.json"),
            b"not json",
        )
        .expect("write corrupt file");
        assert_eq!(store.load(), None);
    }
}
