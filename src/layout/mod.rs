use serde::Serialize;

use crate::model::Note;

pub mod config;
pub mod height;

pub use config::{resolve_config, LayoutProfile};
pub use height::estimate_height;

/// Viewport split between the grid and mobile placement profiles.
///
/// Intentionally a separate constant from the resolver's bracket table: the
/// two systems disagree near the edges and the rendered output at exactly
/// 768px depends on keeping them apart.
const MOBILE_BREAKPOINT: u32 = 768;

/// Clamp band applied to the computed card width in the grid profile.
const GRID_WIDTH_SHRINK: i64 = 40;
const GRID_WIDTH_GROW: i64 = 80;

/// Narrower minimum used by the mobile profile when counting columns.
const MOBILE_WIDTH_SHRINK: i64 = 20;

const BOARD_FOOTER_MARGIN: u32 = 100;
const MIN_BOARD_HEIGHT_GRID: u32 = 600;
const MIN_BOARD_HEIGHT_MOBILE: u32 = 500;

/// Absolute placement of one card, recomputed wholesale on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Result of one layout pass. `rects` is index-aligned with the input notes;
/// `board_height` is `None` when there was nothing to place (the page falls
/// back to viewport-sized chrome in that case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    pub rects: Vec<LayoutRect>,
    pub board_height: Option<u32>,
    pub columns: u32,
    pub card_width: u32,
}

/// Lays out the given (already filtered and ordered) notes for the viewport.
///
/// Greedy shortest-column placement: each card lands in the column with the
/// least accumulated height, ties broken toward the lowest column index.
/// Output is exactly reproducible for identical inputs.
pub fn layout_notes(
    notes: &[Note],
    viewport_width: u32,
    adding_checklist_item: Option<&str>,
) -> BoardLayout {
    let profile = resolve_config(viewport_width);
    let mobile = viewport_width < MOBILE_BREAKPOINT;

    let container_width = viewport_width as i64 - 2 * profile.container_padding as i64;
    let gap = profile.grid_gap as i64;

    let column_unit = if mobile {
        profile.card_width as i64 - MOBILE_WIDTH_SHRINK
    } else {
        profile.card_width as i64
    };
    let columns = ((container_width + gap) / (column_unit + gap)).max(1);

    let available = container_width - (columns - 1) * gap;
    let computed = available / columns;
    let card_width = if mobile {
        computed.max(1)
    } else {
        let min = profile.card_width as i64 - GRID_WIDTH_SHRINK;
        let max = profile.card_width as i64 + GRID_WIDTH_GROW;
        computed.clamp(min, max)
    } as u32;

    let offset_x = profile.container_padding;
    let mut bottoms = vec![profile.container_padding; columns as usize];

    let rects: Vec<LayoutRect> = notes
        .iter()
        .map(|note| {
            let height =
                estimate_height(note, card_width, profile.card_padding, adding_checklist_item);

            let mut best = 0usize;
            for (col, bottom) in bottoms.iter().enumerate().skip(1) {
                if *bottom < bottoms[best] {
                    best = col;
                }
            }

            let x = offset_x + best as u32 * (card_width + profile.grid_gap);
            let y = bottoms[best];
            bottoms[best] = y + height + profile.grid_gap;

            LayoutRect {
                x,
                y,
                width: card_width,
                height,
            }
        })
        .collect();

    let board_height = rects
        .iter()
        .map(|rect| rect.y + rect.height)
        .max()
        .map(|max_bottom| {
            let floor = if mobile {
                MIN_BOARD_HEIGHT_MOBILE
            } else {
                MIN_BOARD_HEIGHT_GRID
            };
            (max_bottom + BOARD_FOOTER_MARGIN).max(floor)
        });

    BoardLayout {
        rects,
        board_height,
        columns: columns as u32,
        card_width,
    }
}
