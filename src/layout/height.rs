use unicode_segmentation::UnicodeSegmentation;

use crate::model::Note;

const HEADER_HEIGHT: u32 = 60;
const MIN_CONTENT_HEIGHT: u32 = 60;
const LINE_HEIGHT: u32 = 28;
const AVG_CHAR_WIDTH: u32 = 9;
const CONTENT_INSET: u32 = 16;
const MIN_TEXT_LINES: u32 = 3;

const CHECKLIST_ITEM_HEIGHT: u32 = 28;
const CHECKLIST_ITEM_SPACING: u32 = 4;
const CHECKLIST_DRAFT_ROW_HEIGHT: u32 = 32;
const ADD_TASK_BUTTON_HEIGHT: u32 = 36;

/// Estimates the rendered pixel height of a card at the given width.
///
/// Deterministic and allocation-free; this runs for every note on every
/// layout pass, including during resize.
///
/// A note with a checklist field (even an empty one) sizes in checklist mode;
/// free text sizes by greedy line wrapping at an average glyph width.
/// `adding_checklist_item` is the note currently showing an in-progress
/// new-item row, which costs one extra row of height.
pub fn estimate_height(
    note: &Note,
    card_width: u32,
    card_padding: u32,
    adding_checklist_item: Option<&str>,
) -> u32 {
    let padding_height = card_padding * 2;

    if let Some(items) = &note.checklist_items {
        let count = items.len() as u32;
        let spacing = count.saturating_sub(1) * CHECKLIST_ITEM_SPACING;
        let draft_row = if adding_checklist_item == Some(note.id.as_str()) {
            CHECKLIST_DRAFT_ROW_HEIGHT
        } else {
            0
        };
        let checklist_height = count * CHECKLIST_ITEM_HEIGHT + spacing + draft_row;
        let content = checklist_height.max(MIN_CONTENT_HEIGHT);
        return HEADER_HEIGHT + padding_height + content + ADD_TASK_BUTTON_HEIGHT;
    }

    let content_width = card_width.saturating_sub(card_padding * 2 + CONTENT_INSET);
    let chars_per_line = (content_width / AVG_CHAR_WIDTH).max(1);

    let mut total_lines: u32 = 0;
    for line in note.content.split('\n') {
        let len = line.graphemes(true).count() as u32;
        if len == 0 {
            total_lines += 1;
        } else {
            total_lines += len.div_ceil(chars_per_line).max(1);
        }
    }
    total_lines = total_lines.max(MIN_TEXT_LINES);

    let content_height = (total_lines * LINE_HEIGHT).max(MIN_CONTENT_HEIGHT);
    HEADER_HEIGHT + padding_height + content_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, ChecklistItem, Note, DEFAULT_NOTE_COLOR};
    use time::macros::datetime;

    fn text_note(content: &str) -> Note {
        Note {
            id: "n1".into(),
            content: content.into(),
            checklist_items: None,
            color: DEFAULT_NOTE_COLOR.into(),
            created_at: datetime!(2024-01-01 00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00 UTC),
            archived_at: None,
            author: Author {
                id: "u1".into(),
                name: Some("Pat".into()),
                email: "pat@example.com".into(),
            },
            board_id: "b1".into(),
        }
    }

    fn checklist_note(items: usize) -> Note {
        let mut note = text_note("ignored");
        note.checklist_items = Some(
            (0..items)
                .map(|i| ChecklistItem {
                    id: format!("c{i}"),
                    text: format!("item {i}"),
                    completed: false,
                })
                .collect(),
        );
        note
    }

    #[test]
    fn short_text_uses_the_three_line_floor() {
        let note = text_note("hi");
        // 60 header + 32 padding + 3 * 28 content
        assert_eq!(estimate_height(&note, 320, 16, None), 60 + 32 + 84);
    }

    #[test]
    fn empty_lines_each_count_one_line() {
        let note = text_note("a\n\n\nb");
        assert_eq!(estimate_height(&note, 320, 16, None), 60 + 32 + 4 * 28);
    }

    #[test]
    fn narrower_card_never_shrinks_a_text_note() {
        let note = text_note(&"a".repeat(100));
        let wide = estimate_height(&note, 320, 16, None);
        let narrow = estimate_height(&note, 260, 16, None);
        assert!(narrow >= wide, "narrow={narrow} wide={wide}");
    }

    #[test]
    fn wrapping_matches_average_char_width() {
        // 320 - 32 - 16 = 272 usable, 272 / 9 = 30 chars per line.
        let note = text_note(&"a".repeat(100));
        // ceil(100 / 30) = 4 lines.
        assert_eq!(estimate_height(&note, 320, 16, None), 60 + 32 + 4 * 28);
    }

    #[test]
    fn degenerate_width_clamps_to_one_char_per_line() {
        let note = text_note("abcdef");
        // chars_per_line floors at 1, so six wrapped lines.
        assert_eq!(estimate_height(&note, 10, 16, None), 60 + 32 + 6 * 28);
    }

    #[test]
    fn empty_checklist_sizes_in_checklist_mode() {
        let mut note = checklist_note(0);
        note.content = "this text must not influence sizing".into();
        // 60 header + 32 padding + 60 floor + 36 add-task control
        assert_eq!(estimate_height(&note, 320, 16, None), 60 + 32 + 60 + 36);
    }

    #[test]
    fn checklist_items_stack_with_spacing() {
        let note = checklist_note(4);
        // 4 * 28 + 3 * 4 = 124 content
        assert_eq!(estimate_height(&note, 320, 16, None), 60 + 32 + 124 + 36);
    }

    #[test]
    fn in_progress_item_row_adds_height_only_for_the_edited_note() {
        let note = checklist_note(4);
        let base = estimate_height(&note, 320, 16, None);
        let editing = estimate_height(&note, 320, 16, Some("n1"));
        let other = estimate_height(&note, 320, 16, Some("n2"));
        assert_eq!(editing, base + 32);
        assert_eq!(other, base);
    }
}
