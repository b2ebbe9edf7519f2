//! Interactive controls attached to requests and replies

use crate::request::Request;
use crate::roles::RoleCandidate;
use crate::types::{ActionRow, ActionRowComponent, Button, ButtonStyle, StringSelectMenu};

/// Button clearing the note of a request
pub const REMOVE_NOTE_CUSTOM_ID: &str = "removeWinnerRequestNote";
pub const REMOVE_NOTE_LABEL: &str = "Remove Note";

/// Button deleting the bot reply it is attached to
pub const DISMISS_REPLY_CUSTOM_ID: &str = "deleteMessage";
pub const DISMISS_REPLY_LABEL: &str = "Delete Reply";

/// Role picker on a winner request
pub const SELECT_ROLE_CUSTOM_ID: &str = "selectWinnerRole";
pub const SELECT_ROLE_PLACEHOLDER: &str = "Select a role to award...";

/// Discord rejects select menus with more options than this
pub const MAX_SELECT_OPTIONS: usize = 25;

pub fn remove_note_button() -> Button {
    Button::new(REMOVE_NOTE_CUSTOM_ID, REMOVE_NOTE_LABEL, ButtonStyle::Secondary)
}

/// Single-button row used on error replies
pub fn dismiss_row() -> ActionRow {
    ActionRow::with(ActionRowComponent::Button(Button::new(
        DISMISS_REPLY_CUSTOM_ID,
        DISMISS_REPLY_LABEL,
        ButtonStyle::Danger,
    )))
}

/// Role picker row. Candidates past [`MAX_SELECT_OPTIONS`] are left out.
pub fn role_select_row(candidates: &[RoleCandidate]) -> ActionRow {
    ActionRow::with(ActionRowComponent::StringSelect(StringSelectMenu {
        custom_id: SELECT_ROLE_CUSTOM_ID.to_string(),
        options: candidates
            .iter()
            .take(MAX_SELECT_OPTIONS)
            .map(Into::into)
            .collect(),
        placeholder: Some(SELECT_ROLE_PLACEHOLDER.to_string()),
        ..StringSelectMenu::default()
    }))
}

/// Count components with `custom_id` across all rows
pub fn count_components(rows: &[ActionRow], custom_id: &str) -> usize {
    rows.iter()
        .flat_map(|r| r.components.iter())
        .filter(|c| c.custom_id() == Some(custom_id))
        .count()
}

impl Request {
    pub fn has_remove_button(&self) -> bool {
        count_components(&self.components, REMOVE_NOTE_CUSTOM_ID) > 0
    }

    /// Attach the Remove Note button unless it is already present.
    ///
    /// A request without body content (or without rows) gets a fresh row;
    /// otherwise the button joins the first row when that row can take it.
    /// Returns true if the button was added.
    pub fn ensure_remove_button(&mut self) -> bool {
        if self.has_remove_button() {
            return false;
        }

        let button = ActionRowComponent::Button(remove_note_button());
        let join_first = !self.content.is_empty()
            && self.components.first().is_some_and(ActionRow::accepts_button);
        if join_first {
            self.components[0].components.push(button);
        } else {
            self.components.push(ActionRow::with(button));
        }
        true
    }
}
