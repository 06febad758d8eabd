use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumString;
use time::OffsetDateTime;

/// Background palette offered for new notes. The first entry doubles as the
/// server-side column default.
pub const NOTE_COLORS: &[&str] = &[
    "#fef3c7", "#fecaca", "#fed7aa", "#d9f99d", "#bfdbfe", "#e9d5ff", "#fbcfe8", "#a7f3d0",
];

pub const DEFAULT_NOTE_COLOR: &str = NOTE_COLORS[0];

/// Denormalized author reference carried on every note. Read-only from the
/// client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
}

impl Author {
    /// Name used for search matching: the full email stands in when the
    /// profile has no display name.
    pub fn search_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }

    /// Name used in the author filter dropdown: falls back to the local part
    /// of the email instead of the whole address.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) => name,
            None => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// A sticky note as returned by the boards API.
///
/// `checklist_items` being present (even as an empty list) switches the card
/// into checklist rendering mode; its absence means free-text mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist_items: Option<Vec<ChecklistItem>>,
    pub color: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub archived_at: Option<OffsetDateTime>,
    #[serde(rename = "user")]
    pub author: Author,
    pub board_id: String,
}

impl Note {
    pub fn is_checklist(&self) -> bool {
        self.checklist_items.is_some()
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

/// Which collection of notes a board view presents. The "all notes" and
/// "archive" views are pseudo-boards addressed by reserved route segments.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum BoardScope {
    #[strum(disabled)]
    Board(String),
    #[strum(serialize = "all-notes")]
    AllNotes,
    #[strum(serialize = "archive")]
    Archive,
}

impl fmt::Display for BoardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_segment())
    }
}

impl BoardScope {
    /// Parses a route segment, treating the reserved pseudo-board segments
    /// specially and everything else as a concrete board id.
    pub fn from_route(segment: &str) -> Self {
        segment
            .parse::<BoardScope>()
            .unwrap_or_else(|_| BoardScope::Board(segment.to_string()))
    }

    pub fn route_segment(&self) -> &str {
        match self {
            BoardScope::Board(id) => id,
            BoardScope::AllNotes => "all-notes",
            BoardScope::Archive => "archive",
        }
    }

    pub fn board_id(&self) -> Option<&str> {
        match self {
            BoardScope::Board(id) => Some(id),
            _ => None,
        }
    }
}
