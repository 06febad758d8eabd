use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{BoardScope, ChecklistItem, Note};

pub mod memory;

pub use memory::MemoryStore;

/// Failure surfaced by the remote notes collaborator.
///
/// The client never retries; every variant rolls local state back and shows a
/// dialog. Malformed responses are deliberately indistinguishable in handling
/// from transport failures.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The server answered and rejected the request with a message.
    #[error("{0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Message suitable for an error dialog body.
    pub fn dialog_description(&self) -> String {
        self.to_string()
    }
}

/// Partial note update; `None` fields are left untouched. The nested options
/// on `archived_at` and `checklist_items` distinguish "don't change" from
/// "clear".
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub content: Option<String>,
    pub color: Option<String>,
    pub archived_at: Option<Option<OffsetDateTime>>,
    pub checklist_items: Option<Option<Vec<ChecklistItem>>>,
}

impl NoteUpdate {
    pub fn archive(at: OffsetDateTime) -> Self {
        Self {
            archived_at: Some(Some(at)),
            ..Self::default()
        }
    }

    pub fn unarchive() -> Self {
        Self {
            archived_at: Some(None),
            ..Self::default()
        }
    }
}

/// The REST collaborator behind the board view. Implementations are expected
/// to already exclude soft-deleted notes from every fetch.
pub trait NoteStore {
    fn fetch_notes(&mut self, scope: &BoardScope) -> Result<Vec<Note>, StoreError>;

    /// Creates an empty "quick" note for immediate inline editing and returns
    /// the canonical note with server-assigned id and timestamps.
    fn create_quick_note(&mut self, board_id: &str) -> Result<Note, StoreError>;

    fn update_note(
        &mut self,
        board_id: &str,
        note_id: &str,
        update: NoteUpdate,
    ) -> Result<Note, StoreError>;

    fn delete_note(&mut self, board_id: &str, note_id: &str) -> Result<(), StoreError>;
}
