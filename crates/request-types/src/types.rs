//! Platform-neutral Discord domain types

use serde::{Deserialize, Serialize};

/// Discord user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscordUser {
    pub id: u64,
    pub username: String,
    /// `name#discriminator` or the bare username for migrated accounts
    pub tag: String,
    pub bot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Message attachment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub id: u64,
    pub filename: String,
    pub url: String,
}

/// Guild role as returned by the role directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuildRole {
    pub id: u64,
    pub name: String,
}

/// Guild member as returned by the member directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuildMember {
    pub id: u64,
    pub display_name: String,
    #[serde(default)]
    pub roles: Vec<u64>,
}

impl GuildMember {
    /// True if the member holds any of `role_ids`
    pub fn has_any_role(&self, role_ids: &[u64]) -> bool {
        self.roles.iter().any(|r| role_ids.contains(r))
    }
}

/// Emoji used for a reaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ReactionEmoji {
    /// Guild emoji by id
    Custom(u64),
    Unicode(String),
}

/// Emoji shown on a button or select option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentEmoji {
    Custom {
        id: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        animated: bool,
    },
    Unicode { name: String },
}

/// Embed field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed author
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Embed footer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl EmbedFooter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon_url: None,
        }
    }
}

/// Message embed.
///
/// Covers everything a bot can set on a rich embed, so a message read back
/// and written again keeps its appearance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// RGB colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// ISO 8601 timestamp string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Style of an interactive button
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// A button that sends an interaction when clicked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Button {
    pub custom_id: String,
    /// Empty for emoji-only buttons
    pub label: String,
    pub style: ButtonStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<ComponentEmoji>,
    #[serde(default)]
    pub disabled: bool,
}

impl Button {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
            style,
            emoji: None,
            disabled: false,
        }
    }
}

/// A button opening a URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkButton {
    pub url: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<ComponentEmoji>,
    #[serde(default)]
    pub disabled: bool,
}

/// A button offering an SKU for purchase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PremiumButton {
    pub sku_id: u64,
    #[serde(default)]
    pub disabled: bool,
}

/// One option in a string select menu
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<ComponentEmoji>,
    /// Pre-selected when the menu renders
    #[serde(default)]
    pub default: bool,
}

/// A string select menu component
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StringSelectMenu {
    pub custom_id: String,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_values: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_values: Option<u8>,
    #[serde(default)]
    pub disabled: bool,
}

/// What an [`EntitySelectMenu`] picks from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntitySelectKind {
    User,
    Role,
    Mentionable,
    Channel,
}

/// A select menu whose options are filled in by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntitySelectMenu {
    pub kind: EntitySelectKind,
    pub custom_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_values: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_values: Option<u8>,
    #[serde(default)]
    pub disabled: bool,
    /// Raw channel type numbers, channel selects only
    #[serde(default)]
    pub channel_types: Vec<u8>,
}

/// A component inside an action row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionRowComponent {
    Button(Button),
    LinkButton(LinkButton),
    PremiumButton(PremiumButton),
    StringSelect(StringSelectMenu),
    EntitySelect(EntitySelectMenu),
}

impl ActionRowComponent {
    /// Developer id of the component; link and premium buttons have none
    pub fn custom_id(&self) -> Option<&str> {
        match self {
            Self::Button(b) => Some(&b.custom_id),
            Self::StringSelect(s) => Some(&s.custom_id),
            Self::EntitySelect(s) => Some(&s.custom_id),
            Self::LinkButton(_) | Self::PremiumButton(_) => None,
        }
    }

    pub fn is_button(&self) -> bool {
        matches!(
            self,
            Self::Button(_) | Self::LinkButton(_) | Self::PremiumButton(_)
        )
    }
}

/// An action row: up to 5 buttons or a single select menu
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionRow {
    #[serde(default)]
    pub components: Vec<ActionRowComponent>,
}

/// Maximum number of buttons Discord accepts in one row
pub const MAX_BUTTONS_PER_ROW: usize = 5;

impl ActionRow {
    pub fn with(component: ActionRowComponent) -> Self {
        Self {
            components: vec![component],
        }
    }

    /// True if another button can be appended to this row
    pub fn accepts_button(&self) -> bool {
        self.components.len() < MAX_BUTTONS_PER_ROW
            && self
                .components
                .iter()
                .all(ActionRowComponent::is_button)
    }
}

/// Inbound gateway message, as seen by the dispatcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InboundMessage {
    pub id: u64,
    pub channel_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<u64>,
    pub author: DiscordUser,
    /// Guild nickname when known, otherwise the user's display name
    pub author_display_name: String,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_message_id: Option<u64>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_party_id: Option<String>,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub created_at_secs: i64,
}

impl InboundMessage {
    pub fn is_reply(&self) -> bool {
        self.referenced_message_id.is_some()
    }
}

/// A message returned by a fetch request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchedMessage {
    pub id: u64,
    pub channel_id: u64,
    pub author: DiscordUser,
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    #[serde(default)]
    pub components: Vec<ActionRow>,
}

/// Outgoing message body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutgoingMessage {
    #[serde(default)]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    #[serde(default)]
    pub components: Vec<ActionRow>,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}
