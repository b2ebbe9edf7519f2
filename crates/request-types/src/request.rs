//! Request model
//!
//! A request is a bot-authored queue message whose first embed carries the
//! request payload. Fields are tagged with a [`FieldKind`] when the message
//! is read back, so note handling never depends on raw positions after that.

use serde::{Deserialize, Serialize};

use crate::roles::RoleCandidate;
use crate::types::{
    ActionRow, DiscordUser, Embed, EmbedAuthor, EmbedField, EmbedFooter, FetchedMessage,
    GuildMember, OutgoingMessage,
};

/// Substring identifying a note field name
pub const NOTE_MARKER: &str = "Note";

/// Name of the primary field listing the members to award
pub const WINNERS_FIELD_NAME: &str = "Winners";

/// Separator between role id and message URL in a relayed request
pub const RELAY_SEPARATOR: &str = " | ";

/// Build the note field name for an annotating actor
pub fn note_field_name(actor_tag: &str) -> String {
    format!("{} (By {})", NOTE_MARKER, actor_tag)
}

/// Role of a field inside a request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// The request payload (winner list)
    Primary,
    /// Free-text annotation
    Note,
    /// Anything else found on the message
    Other,
}

/// A tagged embed field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestField {
    pub kind: FieldKind,
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl RequestField {
    fn into_embed_field(self) -> EmbedField {
        EmbedField {
            name: self.name,
            value: self.value,
            inline: self.inline,
        }
    }
}

/// A request message read back from the queue channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub id: u64,
    pub channel_id: u64,
    pub author: DiscordUser,
    /// Plain message content outside the embed
    pub content: String,
    pub fields: Vec<RequestField>,
    pub components: Vec<ActionRow>,
    /// First embed with its fields taken out
    pub frame: Embed,
    /// Embeds after the first, written back untouched
    #[serde(default)]
    pub trailing_embeds: Vec<Embed>,
}

impl Request {
    /// Interpret a fetched message as a request.
    ///
    /// Returns `None` when the message has no embed or its first embed has
    /// no fields. Authorship is not checked here; callers decide whose
    /// messages count as requests.
    pub fn from_fetched(msg: FetchedMessage) -> Option<Self> {
        let mut embeds = msg.embeds.into_iter();
        let mut frame = embeds.next()?;
        if frame.fields.is_empty() {
            return None;
        }

        let fields = std::mem::take(&mut frame.fields)
            .into_iter()
            .enumerate()
            .map(|(i, f)| RequestField {
                kind: classify_field(i, &f.name),
                name: f.name,
                value: f.value,
                inline: f.inline,
            })
            .collect();

        Some(Self {
            id: msg.id,
            channel_id: msg.channel_id,
            author: msg.author,
            content: msg.content,
            fields,
            components: msg.components,
            frame,
            trailing_embeds: embeds.collect(),
        })
    }

    /// The primary payload field, if present
    pub fn primary(&self) -> Option<&RequestField> {
        self.fields.iter().find(|f| f.kind == FieldKind::Primary)
    }

    /// The note field, if present
    pub fn note(&self) -> Option<&RequestField> {
        self.fields.iter().find(|f| f.kind == FieldKind::Note)
    }

    pub(crate) fn note_index(&self) -> Option<usize> {
        self.fields.iter().position(|f| f.kind == FieldKind::Note)
    }

    /// Render the request back into embeds, first embed first
    pub fn to_embeds(&self) -> Vec<Embed> {
        let first = Embed {
            fields: self
                .fields
                .iter()
                .cloned()
                .map(RequestField::into_embed_field)
                .collect(),
            ..self.frame.clone()
        };
        std::iter::once(first)
            .chain(self.trailing_embeds.iter().cloned())
            .collect()
    }
}

fn classify_field(index: usize, name: &str) -> FieldKind {
    match index {
        0 => FieldKind::Primary,
        1 if name.contains(NOTE_MARKER) => FieldKind::Note,
        _ => FieldKind::Other,
    }
}

/// Reference to an earlier request whose award partially failed.
///
/// The bot posts `"<roleId> | <messageUrl>"` into the queue channel,
/// mentioning the members that still need the role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayNote {
    pub role_id: String,
    pub message_url: String,
}

impl RelayNote {
    /// Parse relayed content; `None` when the separator is missing.
    /// Segments after the URL are ignored.
    pub fn parse(content: &str) -> Option<Self> {
        let mut parts = content.split(RELAY_SEPARATOR);
        let role_id = parts.next()?;
        let message_url = parts.next()?;
        Some(Self {
            role_id: role_id.trim().to_string(),
            message_url: message_url.trim().to_string(),
        })
    }

    pub fn describe(&self) -> String {
        format!(
            "Members that were unable to receive the <@&{}> role in [another request]({}).",
            self.role_id, self.message_url
        )
    }
}

/// Everything needed to post a new winner request
#[derive(Debug, Clone)]
pub struct WinnerRequestDraft<'a> {
    pub requester: &'a DiscordUser,
    pub requester_display_name: &'a str,
    pub members: &'a [GuildMember],
    pub candidates: &'a [RoleCandidate],
    /// Set for bot-relayed requests, with the bot's tag
    pub relay: Option<(RelayNote, &'a str)>,
    pub timestamp: &'a str,
}

impl WinnerRequestDraft<'_> {
    /// One line per member: mention followed by the raw id
    pub fn member_list(&self) -> String {
        self.members
            .iter()
            .map(|m| format!("<@{}> (`{}`)", m.id, m.id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_message(self) -> OutgoingMessage {
        let mut fields = vec![EmbedField {
            name: WINNERS_FIELD_NAME.to_string(),
            value: self.member_list(),
            inline: false,
        }];

        if let Some((note, bot_tag)) = &self.relay {
            fields.push(EmbedField {
                name: note_field_name(bot_tag),
                value: note.describe(),
                inline: false,
            });
        }

        let embed = Embed {
            author: Some(EmbedAuthor {
                name: format!(
                    "Requested by {} ({})",
                    self.requester.tag, self.requester_display_name
                ),
                url: None,
                icon_url: self.requester.avatar_url.clone(),
            }),
            fields,
            footer: Some(EmbedFooter::new(format!("ID: {}", self.requester.id))),
            timestamp: Some(self.timestamp.to_string()),
            ..Embed::default()
        };

        OutgoingMessage {
            content: String::new(),
            embed: Some(embed),
            components: vec![crate::components::role_select_row(self.candidates)],
        }
    }
}
