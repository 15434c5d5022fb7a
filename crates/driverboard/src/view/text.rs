//! Plain-text rendering for terminals.

use crate::driver::Field;

use super::{BoardView, CardView, EMPTY_HEADLINE, EMPTY_PROMPT};

/// Render the board as text blocks separated by blank lines.
#[must_use]
pub fn render_board(view: &BoardView) -> String {
    let mut out = String::new();

    if let Some(notice) = &view.notice {
        out.push_str(&format!("! {notice}\n\n"));
    }

    if view.is_empty() {
        out.push_str(&format!("{EMPTY_HEADLINE}\n{EMPTY_PROMPT}\n"));
        return out;
    }

    let blocks: Vec<String> = view.cards.iter().map(render_card).collect();
    out.push_str(&blocks.join("\n"));
    out
}

/// Render one card.
#[must_use]
pub fn render_card(card: &CardView) -> String {
    let fields = card.draft.as_ref().unwrap_or(&card.fields);
    let marker = if card.is_editing() { " (editing)" } else { "" };

    let mut out = format!("#{}{marker}\n", card.id);
    for field in Field::ALL {
        out.push_str(&format!("  {:<20} {}\n", field.label(), fields.get(field)));
    }
    out.push_str(&format!("  {:<20} {}\n", "Joined The Site", card.created_ago));
    out
}
