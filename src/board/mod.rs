use std::time::Instant;

use time::OffsetDateTime;

use crate::api::{NoteStore, NoteUpdate, StoreError};
use crate::config::ClientConfig;
use crate::filter::{self, query, DateRange, FilterState};
use crate::layout::{self, BoardLayout};
use crate::model::{Author, BoardScope, Note};

pub mod pending;

use pending::{Debouncer, PendingDeletions};

/// Modal surfaced to the user on a failed or rejected mutation. Requires
/// explicit dismissal; the controller never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: String,
    pub description: String,
}

impl ErrorDialog {
    fn new(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
        }
    }
}

/// Side effects produced by [`BoardController::poll`] for the host to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// The search debounce elapsed; the filtered view and the shareable URL
    /// (see [`BoardController::query_pairs`]) now reflect the latest input.
    SearchApplied { search: String },
    /// The resize debounce elapsed; the host should re-render the layout.
    LayoutInvalidated,
    /// A deferred delete was committed to the store.
    NoteDeleted { note_id: String },
    /// A deferred delete was rejected; the note is back in local state and an
    /// error dialog is set.
    DeleteFailed { note_id: String },
}

/// Owns one board view's client state: the note collection, filters, pending
/// deletions, and the error dialog.
///
/// All mutations update local state synchronously before any store call
/// completes, and every store failure rolls the optimistic change back
/// wholesale. Time enters only through the explicit `now` parameters, which
/// keeps the undo window and both debounces deterministic under test.
#[derive(Debug)]
pub struct BoardController {
    scope: BoardScope,
    current_user: Option<Author>,
    notes: Vec<Note>,
    filter: FilterState,
    applied_search: String,
    search_debounce: Debouncer,
    resize_debounce: Debouncer,
    pending: PendingDeletions,
    viewport_width: u32,
    adding_checklist_item: Option<String>,
    error_dialog: Option<ErrorDialog>,
}

impl BoardController {
    pub fn new(
        scope: BoardScope,
        current_user: Option<Author>,
        viewport_width: u32,
        config: &ClientConfig,
    ) -> Self {
        Self {
            scope,
            current_user,
            notes: Vec::new(),
            filter: FilterState::default(),
            applied_search: String::new(),
            search_debounce: Debouncer::new(config.search_debounce()),
            resize_debounce: Debouncer::new(config.resize_debounce()),
            pending: PendingDeletions::new(config.undo_window()),
            viewport_width,
            adding_checklist_item: None,
            error_dialog: None,
        }
    }

    pub fn scope(&self) -> &BoardScope {
        &self.scope
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn error_dialog(&self) -> Option<&ErrorDialog> {
        self.error_dialog.as_ref()
    }

    pub fn dismiss_error_dialog(&mut self) {
        self.error_dialog = None;
    }

    pub fn adding_checklist_item(&self) -> Option<&str> {
        self.adding_checklist_item.as_deref()
    }

    /// Escape / blur handler: stop tracking the in-progress checklist row.
    pub fn stop_adding_checklist_item(&mut self) {
        self.adding_checklist_item = None;
    }

    pub fn has_pending_deletion(&self, note_id: &str) -> bool {
        self.pending.contains(note_id)
    }

    /// Replaces the whole collection from a fresh fetch. Concurrent edits by
    /// other sessions are reconciled this way only; there is no merge.
    pub fn refresh<S: NoteStore>(&mut self, store: &mut S) -> Result<(), StoreError> {
        let scope = self.scope.clone();
        self.notes = store.fetch_notes(&scope)?;
        Ok(())
    }

    // ---- derived views -------------------------------------------------

    /// Notes in view order under the applied (debounced) filters.
    pub fn filtered_notes(&self) -> Vec<Note> {
        filter::filter_and_sort(
            &self.notes,
            &self.applied_search,
            &self.filter.date_range,
            self.filter.author_id.as_deref(),
            self.current_user.as_ref().map(|u| u.id.as_str()),
        )
    }

    /// One full masonry pass over the filtered view at the current viewport.
    pub fn layout(&self) -> BoardLayout {
        layout::layout_notes(
            &self.filtered_notes(),
            self.viewport_width,
            self.adding_checklist_item.as_deref(),
        )
    }

    pub fn authors(&self) -> Vec<Author> {
        filter::unique_authors(&self.notes)
    }

    /// Query pairs describing the applied filters, for the shareable URL.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let applied = FilterState {
            search: self.applied_search.clone(),
            date_range: self.filter.date_range.clone(),
            author_id: self.filter.author_id.clone(),
        };
        query::to_query_pairs(&applied)
    }

    /// Seeds filters from URL query pairs on page entry. Applies immediately,
    /// without the input debounce.
    pub fn set_filters(&mut self, state: FilterState) {
        self.applied_search = state.search.clone();
        self.filter = state;
        self.search_debounce.cancel();
    }

    // ---- filter inputs -------------------------------------------------

    /// Live search input. The filtered view changes only once the debounce
    /// elapses (see [`Self::poll`]).
    pub fn set_search_input(&mut self, text: &str, now: Instant) {
        self.filter.search = text.to_string();
        self.search_debounce.mark(now);
    }

    /// The clear button bypasses the debounce.
    pub fn clear_search(&mut self) {
        self.filter.search.clear();
        self.applied_search.clear();
        self.search_debounce.cancel();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.filter.date_range = range;
    }

    pub fn set_author_filter(&mut self, author_id: Option<String>) {
        self.filter.author_id = author_id;
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.applied_search.clear();
        self.search_debounce.cancel();
    }

    /// Viewport resize signal; relayout is coalesced through the resize
    /// debounce while the layout itself always reads the latest width.
    pub fn set_viewport_width(&mut self, width: u32, now: Instant) {
        if self.viewport_width != width {
            self.viewport_width = width;
            self.resize_debounce.mark(now);
        }
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    // ---- mutations -----------------------------------------------------

    /// Creates an empty note for inline editing. Nothing is inserted until
    /// the store answers, so a failure leaves local state untouched.
    ///
    /// On the "all notes" pseudo-board a target board must be supplied; the
    /// archive never accepts new notes.
    pub fn quick_create<S: NoteStore>(
        &mut self,
        store: &mut S,
        target_board: Option<&str>,
    ) -> Option<String> {
        let board_id = match &self.scope {
            BoardScope::Board(id) => id.clone(),
            BoardScope::AllNotes => match target_board {
                Some(id) => id.to_string(),
                None => {
                    self.error_dialog = Some(ErrorDialog::new(
                        "Board selection required",
                        "Please select a board to add the note to",
                    ));
                    return None;
                }
            },
            BoardScope::Archive => {
                self.error_dialog = Some(ErrorDialog::new(
                    "Cannot Add Note",
                    "You cannot add notes directly to the archive. Notes are archived from other boards.",
                ));
                return None;
            }
        };

        match store.create_quick_note(&board_id) {
            Ok(note) => {
                let id = note.id.clone();
                self.notes.insert(0, note);
                self.adding_checklist_item = Some(id.clone());
                Some(id)
            }
            Err(err) => {
                tracing::warn!(%err, board_id, "quick note creation failed");
                self.error_dialog = Some(ErrorDialog::new(
                    "Failed to create note",
                    err.dialog_description(),
                ));
                None
            }
        }
    }

    /// Replaces a note with a caller-edited version and writes it through.
    /// The local replace is unconditional; a failed write is logged but not
    /// rolled back (the card component owns its own edit/retry loop).
    pub fn update_note<S: NoteStore>(&mut self, store: &mut S, updated: Note) {
        let Some(slot) = self.notes.iter_mut().find(|n| n.id == updated.id) else {
            return;
        };
        *slot = updated.clone();

        let update = NoteUpdate {
            content: Some(updated.content),
            color: Some(updated.color),
            archived_at: None,
            checklist_items: Some(updated.checklist_items),
        };
        if let Err(err) = store.update_note(&updated.board_id, &updated.id, update) {
            tracing::warn!(%err, note_id = %updated.id, "note update write failed");
        }
    }

    /// Moves a note to the archive. Optimistic removal, rollback to the end
    /// of the list on failure.
    pub fn archive_note<S: NoteStore>(
        &mut self,
        store: &mut S,
        note_id: &str,
        archived_at: OffsetDateTime,
    ) -> bool {
        self.set_archive_state(store, note_id, Some(archived_at))
    }

    /// Restores a note from the archive view. Same rollback shape as
    /// [`Self::archive_note`].
    pub fn unarchive_note<S: NoteStore>(&mut self, store: &mut S, note_id: &str) -> bool {
        self.set_archive_state(store, note_id, None)
    }

    fn set_archive_state<S: NoteStore>(
        &mut self,
        store: &mut S,
        note_id: &str,
        archived_at: Option<OffsetDateTime>,
    ) -> bool {
        let Some(index) = self.notes.iter().position(|n| n.id == note_id) else {
            return false;
        };
        let note = self.notes.remove(index);

        let update = NoteUpdate {
            archived_at: Some(archived_at),
            ..NoteUpdate::default()
        };
        match store.update_note(&note.board_id, &note.id, update) {
            Ok(_) => true,
            Err(err) => {
                let archiving = archived_at.is_some();
                tracing::warn!(%err, note_id, archiving, "archive toggle failed");
                self.notes.push(note);
                self.error_dialog = Some(if archiving {
                    ErrorDialog::new("Archive Failed", "Failed to archive note. Please try again.")
                } else {
                    ErrorDialog::new(
                        "Unarchive Failed",
                        "Failed to unarchive note. Please try again.",
                    )
                });
                false
            }
        }
    }

    /// Optimistically removes the note and schedules the deferred delete.
    /// No network traffic happens until the undo window elapses. Returns
    /// false for unknown ids and for ids already pending deletion.
    pub fn delete_note(&mut self, note_id: &str, now: Instant) -> bool {
        if self.pending.contains(note_id) {
            return false;
        }
        let Some(index) = self.notes.iter().position(|n| n.id == note_id) else {
            return false;
        };
        let note = self.notes.remove(index);
        self.pending.schedule(note, now)
    }

    /// Cancels a pending delete and restores the note to the front of the
    /// list. Never talks to the store; the delete was never sent.
    pub fn undo_delete(&mut self, note_id: &str) -> bool {
        match self.pending.undo(note_id) {
            Some(note) => {
                self.notes.insert(0, note);
                true
            }
            None => false,
        }
    }

    /// Drives every time-based behavior: the search and resize debounces and
    /// due deferred deletes. Call from the host's timer tick.
    pub fn poll<S: NoteStore>(&mut self, store: &mut S, now: Instant) -> Vec<BoardEvent> {
        let mut events = Vec::new();

        if self.search_debounce.poll(now) {
            self.applied_search = self.filter.search.clone();
            events.push(BoardEvent::SearchApplied {
                search: self.applied_search.clone(),
            });
        }

        if self.resize_debounce.poll(now) {
            events.push(BoardEvent::LayoutInvalidated);
        }

        for note in self.pending.drain_due(now) {
            match store.delete_note(&note.board_id, &note.id) {
                Ok(()) => events.push(BoardEvent::NoteDeleted {
                    note_id: note.id.clone(),
                }),
                Err(err) => {
                    tracing::warn!(%err, note_id = %note.id, "deferred delete failed");
                    self.error_dialog = Some(ErrorDialog::new(
                        "Failed to delete note",
                        err.dialog_description(),
                    ));
                    let note_id = note.id.clone();
                    self.notes.insert(0, note);
                    events.push(BoardEvent::DeleteFailed { note_id });
                }
            }
        }

        events
    }
}
