//! Note annotations on requests

use crate::components::REMOVE_NOTE_CUSTOM_ID;
use crate::request::{note_field_name, FieldKind, Request, RequestField};

/// What [`Request::merge_note`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMerge {
    /// No note existed; a note field was inserted
    Added,
    /// The existing note was overwritten
    Replaced,
}

impl Request {
    /// Insert or replace the note.
    ///
    /// The note lands directly after the primary field so it is recognised
    /// again when the message is read back. Text is stored verbatim.
    pub fn merge_note(&mut self, note: &str, actor_tag: &str) -> NoteMerge {
        let name = note_field_name(actor_tag);

        if let Some(i) = self.note_index() {
            let field = &mut self.fields[i];
            field.name = name;
            field.value = note.to_string();
            field.inline = false;
            return NoteMerge::Replaced;
        }

        let at = self.fields.len().min(1);
        self.fields.insert(
            at,
            RequestField {
                kind: FieldKind::Note,
                name,
                value: note.to_string(),
                inline: false,
            },
        );
        NoteMerge::Added
    }

    /// Drop the note field and its remove button. Returns false if there
    /// was nothing to remove.
    pub fn remove_note(&mut self) -> bool {
        let had_note = match self.note_index() {
            Some(i) => {
                self.fields.remove(i);
                true
            }
            None => false,
        };

        let buttons_before: usize = self.components.iter().map(|r| r.components.len()).sum();
        for row in &mut self.components {
            row.components
                .retain(|c| c.custom_id() != Some(REMOVE_NOTE_CUSTOM_ID));
        }
        let buttons_after: usize = self.components.iter().map(|r| r.components.len()).sum();
        self.components.retain(|r| !r.components.is_empty());

        had_note || buttons_before != buttons_after
    }
}
