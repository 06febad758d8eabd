use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;

use crate::filter::{filter_and_sort, query, unique_authors, DateRange, FilterState};
use crate::layout::layout_notes;
use crate::model::Note;

/// Filters shared by the inspection subcommands; mirrors the query
/// parameters of a shareable board URL.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterOpts {
    /// Case-insensitive text filter against note content or author
    #[arg(long)]
    pub search: Option<String>,
    /// Only notes by this author id
    #[arg(long)]
    pub author: Option<String>,
    /// Inclusive start of the created-at day range (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,
    /// Inclusive end of the created-at day range (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,
    /// Sort this user's notes first, the way the board page does
    #[arg(long)]
    pub me: Option<String>,
}

impl FilterOpts {
    fn to_state(&self) -> FilterState {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search));
        }
        if let Some(start) = &self.start_date {
            pairs.push(("startDate", start));
        }
        if let Some(end) = &self.end_date {
            pairs.push(("endDate", end));
        }
        if let Some(author) = &self.author {
            pairs.push(("author", author));
        }
        query::from_query_pairs(pairs)
    }
}

#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Notes JSON export; reads stdin when omitted
    #[arg()]
    pub path: Option<PathBuf>,
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1440)]
    pub viewport: u32,
    #[command(flatten)]
    pub filters: FilterOpts,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Notes JSON export; reads stdin when omitted
    #[arg()]
    pub path: Option<PathBuf>,
    #[command(flatten)]
    pub filters: FilterOpts,
}

#[derive(Args, Debug, Clone)]
pub struct AuthorsArgs {
    /// Notes JSON export; reads stdin when omitted
    #[arg()]
    pub path: Option<PathBuf>,
}

pub fn layout(args: LayoutArgs) -> Result<()> {
    let notes = load_notes(args.path.as_deref())?;
    print!("{}", run_layout(&notes, args.viewport, &args.filters));
    Ok(())
}

pub fn filter(args: FilterArgs) -> Result<()> {
    let notes = load_notes(args.path.as_deref())?;
    print!("{}", run_filter(&notes, &args.filters));
    Ok(())
}

pub fn authors(args: AuthorsArgs) -> Result<()> {
    let notes = load_notes(args.path.as_deref())?;
    print!("{}", run_authors(&notes));
    Ok(())
}

fn run_layout(notes: &[Note], viewport: u32, filters: &FilterOpts) -> String {
    let ordered = apply_filters(notes, filters);
    let layout = layout_notes(&ordered, viewport, None);

    let mut out = String::new();
    for (note, rect) in ordered.iter().zip(&layout.rects) {
        let _ = writeln!(
            out,
            "{:<36}  x={:<5} y={:<6} {}x{}",
            note.id, rect.x, rect.y, rect.width, rect.height
        );
    }
    let _ = writeln!(
        out,
        "{} notes in {} columns, card width {}px, board height {}",
        layout.rects.len(),
        layout.columns,
        layout.card_width,
        layout
            .board_height
            .map(|h| format!("{h}px"))
            .unwrap_or_else(|| "n/a".to_string()),
    );
    out
}

fn run_filter(notes: &[Note], filters: &FilterOpts) -> String {
    let ordered = apply_filters(notes, filters);
    let mut out = String::new();
    for note in &ordered {
        let created = note
            .created_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| note.created_at.unix_timestamp().to_string());
        let preview: String = note.content.chars().take(40).collect();
        let _ = writeln!(
            out,
            "{:<36}  {}  {}  {}",
            note.id,
            created,
            note.author.display_name(),
            preview.replace('\n', " ")
        );
    }
    let _ = writeln!(out, "{} of {} notes match", ordered.len(), notes.len());
    out
}

fn run_authors(notes: &[Note]) -> String {
    let mut out = String::new();
    for author in unique_authors(notes) {
        let _ = writeln!(out, "{:<36}  {} <{}>", author.id, author.display_name(), author.email);
    }
    out
}

fn apply_filters(notes: &[Note], filters: &FilterOpts) -> Vec<Note> {
    let state = filters.to_state();
    filter_and_sort(
        notes,
        &state.search,
        &state.date_range,
        state.author_id.as_deref(),
        filters.me.as_deref(),
    )
}

/// Accepts either the raw `{"notes": [...]}` API response shape or a bare
/// JSON array of notes.
fn load_notes(path: Option<&std::path::Path>) -> Result<Vec<Note>> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading notes export {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading notes export from stdin")?;
            buffer
        }
    };
    parse_notes(&raw)
}

#[derive(Deserialize)]
struct NotesEnvelope {
    notes: Vec<Note>,
}

fn parse_notes(raw: &str) -> Result<Vec<Note>> {
    if let Ok(envelope) = serde_json::from_str::<NotesEnvelope>(raw) {
        return Ok(envelope.notes);
    }
    serde_json::from_str::<Vec<Note>>(raw).context("parsing notes export json")
}
