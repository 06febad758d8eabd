use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::model::Note;

/// Trailing-edge debounce driven by explicit `now` values, so the host event
/// loop (or a test) owns the clock.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Starts or restarts the window.
    pub fn mark(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true once the window has elapsed, then rearms to idle.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A note optimistically removed from view, waiting for its deferred delete
/// to commit (or be undone).
#[derive(Debug)]
struct PendingDeletion {
    note: Note,
    deadline: Instant,
}

/// Pending deletions keyed by note id, in scheduling order.
///
/// At most one entry per id: a second delete request while one is pending is
/// treated as a no-op.
#[derive(Debug)]
pub struct PendingDeletions {
    window: Duration,
    entries: IndexMap<String, PendingDeletion>,
}

impl PendingDeletions {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: IndexMap::new(),
        }
    }

    /// Schedules the deferred commit. Returns false (and keeps the existing
    /// record) if this id is already pending.
    pub fn schedule(&mut self, note: Note, now: Instant) -> bool {
        if self.entries.contains_key(&note.id) {
            return false;
        }
        let deadline = now + self.window;
        self.entries
            .insert(note.id.clone(), PendingDeletion { note, deadline });
        true
    }

    pub fn contains(&self, note_id: &str) -> bool {
        self.entries.contains_key(note_id)
    }

    /// Cancels the pending commit and hands the note back for restoration.
    pub fn undo(&mut self, note_id: &str) -> Option<Note> {
        self.entries
            .shift_remove(note_id)
            .map(|pending| pending.note)
    }

    /// Removes and returns every entry whose window has elapsed, in
    /// scheduling order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<Note> {
        let due: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, pending)| now >= pending.deadline)
            .map(|(id, _)| id.clone())
            .collect();
        due.into_iter()
            .filter_map(|id| self.entries.shift_remove(&id))
            .map(|pending| pending.note)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, DEFAULT_NOTE_COLOR};
    use time::macros::datetime;

    fn note(id: &str) -> Note {
        Note {
            id: id.into(),
            content: String::new(),
            checklist_items: None,
            color: DEFAULT_NOTE_COLOR.into(),
            created_at: datetime!(2024-01-01 00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00 UTC),
            archived_at: None,
            author: Author {
                id: "u1".into(),
                name: None,
                email: "u1@example.com".into(),
            },
            board_id: "b1".into(),
        }
    }

    #[test]
    fn debouncer_fires_once_after_the_window() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(50));
        assert!(!debounce.poll(start));
        debounce.mark(start);
        assert!(!debounce.poll(start + Duration::from_millis(49)));
        assert!(debounce.poll(start + Duration::from_millis(50)));
        assert!(!debounce.poll(start + Duration::from_millis(51)));
    }

    #[test]
    fn remarking_extends_the_window() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(50));
        debounce.mark(start);
        debounce.mark(start + Duration::from_millis(40));
        assert!(!debounce.poll(start + Duration::from_millis(60)));
        assert!(debounce.poll(start + Duration::from_millis(90)));
    }

    #[test]
    fn duplicate_schedule_is_rejected() {
        let start = Instant::now();
        let mut pending = PendingDeletions::new(Duration::from_secs(4));
        assert!(pending.schedule(note("n1"), start));
        assert!(!pending.schedule(note("n1"), start + Duration::from_secs(1)));
        assert!(pending.contains("n1"));
    }

    #[test]
    fn drain_due_respects_individual_deadlines() {
        let start = Instant::now();
        let mut pending = PendingDeletions::new(Duration::from_secs(4));
        pending.schedule(note("n1"), start);
        pending.schedule(note("n2"), start + Duration::from_secs(2));

        let due = pending.drain_due(start + Duration::from_secs(4));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "n1");
        assert!(pending.contains("n2"));

        let due = pending.drain_due(start + Duration::from_secs(6));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "n2");
        assert!(pending.is_empty());
    }

    #[test]
    fn undo_cancels_and_returns_the_note() {
        let start = Instant::now();
        let mut pending = PendingDeletions::new(Duration::from_secs(4));
        pending.schedule(note("n1"), start);
        let restored = pending.undo("n1").expect("note back");
        assert_eq!(restored.id, "n1");
        assert!(pending.drain_due(start + Duration::from_secs(10)).is_empty());
    }
}
