//! Rendering for driverboard.
//!
//! Rendering is a pure function of the board state: [`BoardView::build`]
//! turns the fetched records, the cards being edited, and the current notice
//! into a view model, and the [`html`] and [`text`] renderers turn that model
//! into output. Nothing here performs I/O.

pub mod html;
pub mod relative;
pub mod text;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::driver::{Driver, DriverFields, DriverId};

/// First line of the empty-state message.
pub const EMPTY_HEADLINE: &str = "Hey, the registry is empty.";

/// Second line of the empty-state message.
pub const EMPTY_PROMPT: &str = "Please add a driver!";

/// Everything needed to draw the driver list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// One card per driver, in backend order.
    pub cards: Vec<CardView>,
    /// Description of the last failed request, if any.
    pub notice: Option<String>,
}

/// One rendered driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// The driver's id, carried by the card's controls.
    pub id: DriverId,
    /// Values as displayed.
    pub fields: DriverFields,
    /// Relative creation time, e.g. "3 days ago".
    pub created_ago: String,
    /// Input values while the card is being edited.
    pub draft: Option<DriverFields>,
}

impl BoardView {
    /// Build the view model for a list of drivers.
    #[must_use]
    pub fn build(
        drivers: &[Driver],
        drafts: &HashMap<DriverId, DriverFields>,
        notice: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let cards = drivers
            .iter()
            .map(|driver| CardView {
                id: driver.id,
                fields: driver.fields(),
                created_ago: relative::time_ago(driver.created_at.instant(), now),
                draft: drafts.get(&driver.id).cloned(),
            })
            .collect();

        Self {
            cards,
            notice: notice.map(str::to_string),
        }
    }

    /// Whether the empty-state message is shown instead of cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Find the card for a driver.
    #[must_use]
    pub fn card(&self, id: DriverId) -> Option<&CardView> {
        self.cards.iter().find(|card| card.id == id)
    }
}

impl CardView {
    /// Whether the card shows inputs instead of values.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }
}
