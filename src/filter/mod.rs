use indexmap::IndexMap;
use time::Date;

use crate::model::{Author, Note};

pub mod query;

/// Inclusive calendar-day range; either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    fn contains_day(&self, day: Date) -> bool {
        if let Some(start) = self.start {
            if day < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if day > end {
                return false;
            }
        }
        true
    }
}

/// Transient per-view filter state. Mirrored into the page URL (see
/// [`query`]) but never persisted server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub date_range: DateRange,
    pub author_id: Option<String>,
}

impl FilterState {
    pub fn is_filtering(&self) -> bool {
        !self.search.trim().is_empty() || !self.date_range.is_open() || self.author_id.is_some()
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }
}

/// Applies the four filter stages in order (text, author, date range, sort)
/// and returns the notes in view order.
///
/// Pure and stable: notes the comparator considers equal keep their original
/// relative order, and identical inputs always produce identical output.
pub fn filter_and_sort(
    notes: &[Note],
    search: &str,
    date_range: &DateRange,
    author_id: Option<&str>,
    current_user: Option<&str>,
) -> Vec<Note> {
    let mut filtered: Vec<Note> = notes
        .iter()
        .filter(|note| matches_search(note, search))
        .filter(|note| author_id.map_or(true, |id| note.author.id == id))
        .filter(|note| date_range.contains_day(note.created_at.date()))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        if let Some(me) = current_user {
            let a_mine = a.author.id == me;
            let b_mine = b.author.id == me;
            if a_mine != b_mine {
                return b_mine.cmp(&a_mine);
            }
        }
        b.created_at.cmp(&a.created_at)
    });

    filtered
}

/// Case-insensitive substring match against author name (full email when the
/// profile has no name) or note content.
fn matches_search(note: &Note, search: &str) -> bool {
    let search = search.trim();
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    note.author.search_name().to_lowercase().contains(&needle)
        || note.content.to_lowercase().contains(&needle)
}

/// Distinct authors across the given notes, first occurrence wins, sorted by
/// display name for the filter dropdown.
pub fn unique_authors(notes: &[Note]) -> Vec<Author> {
    let mut by_id: IndexMap<&str, &Author> = IndexMap::new();
    for note in notes {
        by_id.entry(note.author.id.as_str()).or_insert(&note.author);
    }
    let mut authors: Vec<Author> = by_id.into_values().cloned().collect();
    authors.sort_by(|a, b| {
        a.display_name()
            .to_lowercase()
            .cmp(&b.display_name().to_lowercase())
    });
    authors
}
