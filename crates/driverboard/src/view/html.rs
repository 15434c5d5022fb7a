//! HTML markup for the driver list and the page around it.
//!
//! Every control carries `data-action` and `data-driver-id` attributes so a
//! single listener on the list container can route clicks and keystrokes
//! (see [`crate::board::BoardEvent::delegate`]).

use crate::driver::{DriverFields, DriverId, Field};
use crate::form::DriverForm;

use super::{BoardView, CardView, EMPTY_HEADLINE, EMPTY_PROMPT};

/// Class of the element the driver list is rendered into.
pub const CONTAINER_CLASS: &str = "js-driver-wrapper";

/// Class of the creation form.
pub const FORM_CLASS: &str = "js-driver-form";

/// Escape text for use in element content and quoted attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the contents of the list container.
#[must_use]
pub fn render_board(view: &BoardView) -> String {
    let mut out = String::new();

    if let Some(notice) = &view.notice {
        out.push_str(&format!(
            "<div class=\"js-notice notice\" role=\"alert\">{}</div>\n",
            escape(notice)
        ));
    }

    if view.is_empty() {
        out.push_str(&render_empty());
    } else {
        for card in &view.cards {
            out.push_str(&render_card(card));
        }
    }

    out
}

/// Render the empty-state message.
#[must_use]
pub fn render_empty() -> String {
    format!(
        "<div class=\"empty-registry-wrapper\">\n  <h1>\n    {EMPTY_HEADLINE}<br>{EMPTY_PROMPT}\n  </h1>\n</div>\n"
    )
}

/// Render one driver card.
///
/// A card being edited shows an input per field, pre-filled from its draft,
/// and a save control in place of the edit control.
#[must_use]
pub fn render_card(card: &CardView) -> String {
    let id = card.id;
    let mut out = String::new();

    out.push_str(&format!(
        "<div class=\"js-driver-item driver-item\" data-driver-id=\"{id}\">\n"
    ));

    out.push_str("  <div class=\"photo-wrapper\">\n    ");
    match &card.draft {
        Some(draft) => out.push_str(&edit_input(id, Field::PhotoUrl, draft)),
        None => out.push_str(&format!(
            "<img src=\"{}\" class=\"photoURL\" alt=\"{}\">",
            escape(&card.fields.photo_url),
            escape(&card.fields.name)
        )),
    }
    out.push_str("\n  </div>\n");

    out.push_str("  <div class=\"driver-info-wrapper\">\n");
    for (i, field) in [Field::Name, Field::RacesWon, Field::FavTrack, Field::TeamName]
        .into_iter()
        .enumerate()
    {
        let (label_class, value_class) = if i == 0 {
            ("heading-main", "heading-1")
        } else {
            ("heading-3", "heading-2")
        };
        out.push_str(&format!(
            "    <h2 class=\"{label_class}\">{}</h2>\n",
            field.label()
        ));
        match &card.draft {
            Some(draft) => out.push_str(&format!("    {}\n", edit_input(id, field, draft))),
            None => out.push_str(&format!(
                "    <h2 class=\"{} {value_class}\">{}</h2>\n",
                field.input_name(),
                escape(card.fields.get(field))
            )),
        }
        out.push_str("    <hr>\n");
    }
    out.push_str("    <h2 class=\"heading-3\">Joined The Site</h2>\n");
    out.push_str(&format!(
        "    <h2 class=\"createdAt heading-2\">{}</h2>\n",
        escape(&card.created_ago)
    ));
    out.push_str("  </div>\n");

    out.push_str("  <div class=\"button-wrapper\">\n");
    out.push_str(&format!(
        "    <button class=\"button button-delete js-delete-button\" data-action=\"delete\" data-driver-id=\"{id}\">Delete</button>\n"
    ));
    if card.is_editing() {
        out.push_str(&format!(
            "    <button class=\"button button-save js-save-button\" data-action=\"save\" data-driver-id=\"{id}\">Save</button>\n"
        ));
    } else {
        out.push_str(&format!(
            "    <button class=\"button button-edit js-edit-button\" data-action=\"edit\" data-driver-id=\"{id}\">Edit</button>\n"
        ));
    }
    out.push_str("  </div>\n</div>\n");

    out
}

fn edit_input(id: DriverId, field: Field, draft: &DriverFields) -> String {
    format!(
        "<input class=\"js-edit-input\" name=\"{}\" data-action=\"input\" data-driver-id=\"{id}\" value=\"{}\">",
        field.input_name(),
        escape(draft.get(field))
    )
}

/// Render the creation form with its current values.
#[must_use]
pub fn render_form(form: &DriverForm) -> String {
    let mut out = format!("<form class=\"{FORM_CLASS} driver-form\">\n");
    for field in Field::ALL {
        out.push_str(&format!(
            "  <input type=\"text\" name=\"{}\" placeholder=\"{}\" value=\"{}\">\n",
            field.input_name(),
            field.label(),
            escape(form.value(field))
        ));
    }
    out.push_str("  <button type=\"submit\" class=\"button button-submit\">Add Driver</button>\n");
    out.push_str("</form>\n");
    out
}

/// Render a standalone page: the creation form followed by the list container.
#[must_use]
pub fn render_page(title: &str, view: &BoardView, form: &DriverForm) -> String {
    let title = escape(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1 class=\"page-title\">{title}</h1>\n{}<div class=\"{CONTAINER_CLASS} driver-wrapper\">\n{}</div>\n</body>\n</html>\n",
        render_form(form),
        render_board(view)
    )
}
