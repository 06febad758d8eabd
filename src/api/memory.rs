//! In-process [`NoteStore`] backed by a plain vector. Reference
//! implementation for demos and the deterministic failure injection the
//! controller tests rely on.

use time::OffsetDateTime;
use uuid::Uuid;

use super::{NoteStore, NoteUpdate, StoreError};
use crate::model::{Author, BoardScope, Note, NOTE_COLORS};

#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: Vec<Note>,
    author: Option<Author>,
    fail_next: Option<StoreError>,
    created: usize,
    pub calls: Vec<StoreCall>,
}

/// Record of one store invocation, kept for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Fetch(String),
    Create(String),
    Update(String),
    Delete(String),
}

impl MemoryStore {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            ..Self::default()
        }
    }

    /// Author stamped onto quick-created notes.
    pub fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    /// Makes the next store call fail with the given error.
    pub fn fail_next(&mut self, error: StoreError) {
        self.fail_next = Some(error);
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    fn take_failure(&mut self) -> Result<(), StoreError> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl NoteStore for MemoryStore {
    fn fetch_notes(&mut self, scope: &BoardScope) -> Result<Vec<Note>, StoreError> {
        self.calls
            .push(StoreCall::Fetch(scope.route_segment().to_string()));
        self.take_failure()?;
        let notes = match scope {
            BoardScope::Board(id) => self
                .notes
                .iter()
                .filter(|n| &n.board_id == id && !n.is_archived())
                .cloned()
                .collect(),
            BoardScope::AllNotes => self
                .notes
                .iter()
                .filter(|n| !n.is_archived())
                .cloned()
                .collect(),
            BoardScope::Archive => self
                .notes
                .iter()
                .filter(|n| n.is_archived())
                .cloned()
                .collect(),
        };
        Ok(notes)
    }

    fn create_quick_note(&mut self, board_id: &str) -> Result<Note, StoreError> {
        self.calls.push(StoreCall::Create(board_id.to_string()));
        self.take_failure()?;
        let now = OffsetDateTime::now_utc();
        let color = NOTE_COLORS[self.created % NOTE_COLORS.len()];
        self.created += 1;
        let note = Note {
            id: Uuid::new_v4().to_string(),
            content: String::new(),
            checklist_items: None,
            color: color.to_string(),
            created_at: now,
            updated_at: now,
            archived_at: None,
            author: self.author.clone().unwrap_or(Author {
                id: "local".to_string(),
                name: None,
                email: "local@stickyboard.invalid".to_string(),
            }),
            board_id: board_id.to_string(),
        };
        self.notes.insert(0, note.clone());
        Ok(note)
    }

    fn update_note(
        &mut self,
        board_id: &str,
        note_id: &str,
        update: NoteUpdate,
    ) -> Result<Note, StoreError> {
        self.calls.push(StoreCall::Update(note_id.to_string()));
        self.take_failure()?;
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == note_id && n.board_id == board_id)
            .ok_or_else(|| StoreError::Rejected("Note not found".to_string()))?;
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(color) = update.color {
            note.color = color;
        }
        if let Some(archived_at) = update.archived_at {
            note.archived_at = archived_at;
        }
        if let Some(items) = update.checklist_items {
            note.checklist_items = items;
        }
        note.updated_at = OffsetDateTime::now_utc();
        Ok(note.clone())
    }

    fn delete_note(&mut self, board_id: &str, note_id: &str) -> Result<(), StoreError> {
        self.calls.push(StoreCall::Delete(note_id.to_string()));
        self.take_failure()?;
        let before = self.notes.len();
        self.notes
            .retain(|n| !(n.id == note_id && n.board_id == board_id));
        if self.notes.len() == before {
            return Err(StoreError::Rejected("Note not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use time::macros::datetime;

    fn note(id: &str, board: &str, archived: bool) -> Note {
        Note {
            id: id.into(),
            content: "x".into(),
            checklist_items: None,
            color: NOTE_COLORS[0].into(),
            created_at: datetime!(2024-01-01 00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00 UTC),
            archived_at: archived.then(|| datetime!(2024-01-02 00:00 UTC)),
            author: Author {
                id: "u1".into(),
                name: None,
                email: "u1@example.com".into(),
            },
            board_id: board.into(),
        }
    }

    #[test]
    fn scopes_partition_active_and_archived_notes() {
        let mut store = MemoryStore::new(vec![
            note("n1", "b1", false),
            note("n2", "b2", false),
            note("n3", "b1", true),
        ]);
        let b1 = store
            .fetch_notes(&BoardScope::Board("b1".into()))
            .expect("fetch b1");
        assert_eq!(b1.len(), 1);
        let all = store.fetch_notes(&BoardScope::AllNotes).expect("fetch all");
        assert_eq!(all.len(), 2);
        let archive = store
            .fetch_notes(&BoardScope::Archive)
            .expect("fetch archive");
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].id, "n3");
    }

    #[test]
    fn quick_create_prepends_an_empty_note() {
        let mut store = MemoryStore::new(vec![note("n1", "b1", false)]);
        let created = store.create_quick_note("b1").expect("create");
        assert!(created.content.is_empty());
        assert_eq!(store.notes()[0].id, created.id);
    }

    #[test]
    fn injected_failure_fires_once() {
        let mut store = MemoryStore::new(vec![note("n1", "b1", false)]);
        store.fail_next(StoreError::Network("offline".into()));
        assert_matches!(
            store.delete_note("b1", "n1"),
            Err(StoreError::Network(_))
        );
        // Note survived the failed call; the retry (user-initiated) succeeds.
        assert!(store.delete_note("b1", "n1").is_ok());
        assert!(store.notes().is_empty());
    }

    #[test]
    fn unarchive_clears_the_timestamp() {
        let mut store = MemoryStore::new(vec![note("n1", "b1", true)]);
        let updated = store
            .update_note("b1", "n1", NoteUpdate::unarchive())
            .expect("update");
        assert_eq!(updated.archived_at, None);
    }
}
