//! Conversion between serenity models and the request domain types

#[path = "convert_tests.rs"]
mod convert_tests;

use request_types::{
    ActionRow, ActionRowComponent, Attachment, Button, ButtonStyle, ComponentEmoji, DiscordUser,
    Embed, EmbedAuthor, EmbedField, EmbedFooter, EntitySelectKind, EntitySelectMenu,
    FetchedMessage, GuildMember, InboundMessage, LinkButton, OutgoingMessage, PremiumButton,
    ReactionEmoji, SelectOption, StringSelectMenu,
};
use serenity::model::application::{
    ActionRow as SerenityActionRow, ActionRowComponent as SerenityComponent,
    Button as SerenityButton, ButtonKind as SerenityButtonKind,
    ButtonStyle as SerenityButtonStyle, ComponentType, SelectMenu as SerenitySelectMenu,
};
use serenity::builder::{
    CreateActionRow, CreateButton, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter,
    CreateMessage, CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption,
};
use serenity::model::channel::{
    ChannelType, Embed as SerenityEmbed, Message as SerenityMessage, ReactionType,
};
use serenity::model::guild::Member as SerenityMember;
use serenity::model::id::{EmojiId, SkuId};
use serenity::model::user::User as SerenityUser;
use serenity::model::Timestamp;

// ── Inbound ─────────────────────────────────────────────────────────────────

pub fn discord_user(user: &SerenityUser) -> DiscordUser {
    DiscordUser {
        id: user.id.get(),
        username: user.name.clone(),
        tag: user.tag(),
        bot: user.bot,
        avatar_url: Some(user.face()),
    }
}

pub fn inbound_message(msg: &SerenityMessage) -> InboundMessage {
    let author_display_name = msg
        .member
        .as_ref()
        .and_then(|m| m.nick.clone())
        .or_else(|| msg.author.global_name.clone())
        .unwrap_or_else(|| msg.author.name.clone());

    let referenced_message_id = msg
        .message_reference
        .as_ref()
        .and_then(|r| r.message_id)
        .or_else(|| msg.referenced_message.as_ref().map(|m| m.id))
        .map(|id| id.get());

    InboundMessage {
        id: msg.id.get(),
        channel_id: msg.channel_id.get(),
        guild_id: msg.guild_id.map(|g| g.get()),
        author: discord_user(&msg.author),
        author_display_name,
        content: msg.content.clone(),
        mentions: msg.mentions.iter().map(|u| u.id.get()).collect(),
        referenced_message_id,
        attachments: msg
            .attachments
            .iter()
            .map(|a| Attachment {
                id: a.id.get(),
                filename: a.filename.clone(),
                url: a.url.clone(),
            })
            .collect(),
        activity_party_id: msg.activity.as_ref().and_then(|a| a.party_id.clone()),
        timestamp: msg.timestamp.to_rfc3339().unwrap_or_default(),
        created_at_secs: msg.timestamp.unix_timestamp(),
    }
}

pub fn fetched_message(msg: &SerenityMessage) -> FetchedMessage {
    FetchedMessage {
        id: msg.id.get(),
        channel_id: msg.channel_id.get(),
        author: discord_user(&msg.author),
        content: msg.content.clone(),
        embeds: msg.embeds.iter().map(embed).collect(),
        components: msg.components.iter().map(action_row).collect(),
    }
}

pub fn guild_member(member: &SerenityMember) -> GuildMember {
    GuildMember {
        id: member.user.id.get(),
        display_name: member.display_name().to_string(),
        roles: member.roles.iter().map(|r| r.get()).collect(),
    }
}

fn embed(e: &SerenityEmbed) -> Embed {
    Embed {
        title: e.title.clone(),
        description: e.description.clone(),
        url: e.url.clone(),
        color: e.colour.map(|c| c.0),
        author: e.author.as_ref().map(|a| EmbedAuthor {
            name: a.name.clone(),
            url: a.url.clone(),
            icon_url: a.icon_url.clone(),
        }),
        fields: e
            .fields
            .iter()
            .map(|f| EmbedField {
                name: f.name.clone(),
                value: f.value.clone(),
                inline: f.inline,
            })
            .collect(),
        footer: e.footer.as_ref().map(|f| EmbedFooter {
            text: f.text.clone(),
            icon_url: f.icon_url.clone(),
        }),
        image_url: e.image.as_ref().map(|i| i.url.clone()),
        thumbnail_url: e.thumbnail.as_ref().map(|t| t.url.clone()),
        timestamp: e.timestamp.and_then(|t| t.to_rfc3339()),
    }
}

/// Modal-only components never appear on messages and are dropped
fn action_row(row: &SerenityActionRow) -> ActionRow {
    let components = row
        .components
        .iter()
        .filter_map(|c| match c {
            SerenityComponent::Button(b) => Some(button(b)),
            SerenityComponent::SelectMenu(menu) => select_menu(menu),
            _ => None,
        })
        .collect();
    ActionRow { components }
}

fn button(b: &SerenityButton) -> ActionRowComponent {
    let label = b.label.clone().unwrap_or_default();
    let emoji = b.emoji.as_ref().and_then(component_emoji);
    match &b.data {
        SerenityButtonKind::Link { url } => ActionRowComponent::LinkButton(LinkButton {
            url: url.clone(),
            label,
            emoji,
            disabled: b.disabled,
        }),
        SerenityButtonKind::Premium { sku_id } => {
            ActionRowComponent::PremiumButton(PremiumButton {
                sku_id: sku_id.get(),
                disabled: b.disabled,
            })
        }
        SerenityButtonKind::NonLink { custom_id, style } => ActionRowComponent::Button(Button {
            custom_id: custom_id.clone(),
            label,
            style: button_style(*style),
            emoji,
            disabled: b.disabled,
        }),
    }
}

fn select_menu(menu: &SerenitySelectMenu) -> Option<ActionRowComponent> {
    let custom_id = menu.custom_id.clone().unwrap_or_default();
    let kind = match menu.kind {
        ComponentType::StringSelect => {
            return Some(ActionRowComponent::StringSelect(StringSelectMenu {
                custom_id,
                options: menu
                    .options
                    .iter()
                    .map(|o| SelectOption {
                        label: o.label.clone(),
                        value: o.value.clone(),
                        description: o.description.clone(),
                        emoji: o.emoji.as_ref().and_then(component_emoji),
                        default: o.default,
                    })
                    .collect(),
                placeholder: menu.placeholder.clone(),
                min_values: menu.min_values,
                max_values: menu.max_values,
                disabled: menu.disabled,
            }));
        }
        ComponentType::UserSelect => EntitySelectKind::User,
        ComponentType::RoleSelect => EntitySelectKind::Role,
        ComponentType::MentionableSelect => EntitySelectKind::Mentionable,
        ComponentType::ChannelSelect => EntitySelectKind::Channel,
        _ => return None,
    };
    Some(ActionRowComponent::EntitySelect(EntitySelectMenu {
        kind,
        custom_id,
        placeholder: menu.placeholder.clone(),
        min_values: menu.min_values,
        max_values: menu.max_values,
        disabled: menu.disabled,
        channel_types: menu.channel_types.iter().map(|t| u8::from(*t)).collect(),
    }))
}

fn button_style(style: SerenityButtonStyle) -> ButtonStyle {
    match style {
        SerenityButtonStyle::Primary => ButtonStyle::Primary,
        SerenityButtonStyle::Success => ButtonStyle::Success,
        SerenityButtonStyle::Danger => ButtonStyle::Danger,
        _ => ButtonStyle::Secondary,
    }
}

fn component_emoji(emoji: &ReactionType) -> Option<ComponentEmoji> {
    match emoji {
        ReactionType::Custom { animated, id, name } => Some(ComponentEmoji::Custom {
            id: id.get(),
            name: name.clone(),
            animated: *animated,
        }),
        ReactionType::Unicode(name) => Some(ComponentEmoji::Unicode { name: name.clone() }),
        _ => None,
    }
}

// ── Outbound ────────────────────────────────────────────────────────────────

pub fn create_message(message: &OutgoingMessage) -> CreateMessage {
    let mut builder = CreateMessage::new();
    if !message.content.is_empty() {
        builder = builder.content(&message.content);
    }
    if let Some(embed) = &message.embed {
        builder = builder.embed(create_embed(embed));
    }
    if !message.components.is_empty() {
        builder = builder.components(create_action_rows(&message.components));
    }
    builder
}

pub fn create_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    if let Some(url) = &embed.url {
        builder = builder.url(url);
    }
    if let Some(color) = embed.color {
        builder = builder.colour(color);
    }
    if let Some(author) = &embed.author {
        let mut a = CreateEmbedAuthor::new(&author.name);
        if let Some(url) = &author.url {
            a = a.url(url);
        }
        if let Some(icon) = &author.icon_url {
            a = a.icon_url(icon);
        }
        builder = builder.author(a);
    }
    for f in &embed.fields {
        builder = builder.field(&f.name, &f.value, f.inline);
    }
    if let Some(footer) = &embed.footer {
        let mut f = CreateEmbedFooter::new(&footer.text);
        if let Some(icon) = &footer.icon_url {
            f = f.icon_url(icon);
        }
        builder = builder.footer(f);
    }
    if let Some(image) = &embed.image_url {
        builder = builder.image(image);
    }
    if let Some(thumbnail) = &embed.thumbnail_url {
        builder = builder.thumbnail(thumbnail);
    }
    if let Some(ts) = embed
        .timestamp
        .as_deref()
        .and_then(|t| Timestamp::parse(t).ok())
    {
        builder = builder.timestamp(ts);
    }
    builder
}

/// Rows that would be empty on the wire are skipped
pub fn create_action_rows(rows: &[ActionRow]) -> Vec<CreateActionRow> {
    rows.iter().filter_map(create_action_row).collect()
}

fn create_action_row(row: &ActionRow) -> Option<CreateActionRow> {
    match row.components.first() {
        Some(ActionRowComponent::StringSelect(menu)) => {
            // Discord rejects a string select without options
            if menu.options.is_empty() {
                return None;
            }
            return Some(CreateActionRow::SelectMenu(create_string_select(menu)));
        }
        Some(ActionRowComponent::EntitySelect(menu)) => {
            return Some(CreateActionRow::SelectMenu(create_entity_select(menu)));
        }
        _ => {}
    }

    let buttons: Vec<CreateButton> = row.components.iter().filter_map(create_button).collect();
    (!buttons.is_empty()).then_some(CreateActionRow::Buttons(buttons))
}

/// `None` for select menus, which cannot share a row with buttons
fn create_button(component: &ActionRowComponent) -> Option<CreateButton> {
    let (builder, label, emoji, disabled) = match component {
        ActionRowComponent::Button(b) => {
            let style = match b.style {
                ButtonStyle::Primary => SerenityButtonStyle::Primary,
                ButtonStyle::Secondary => SerenityButtonStyle::Secondary,
                ButtonStyle::Success => SerenityButtonStyle::Success,
                ButtonStyle::Danger => SerenityButtonStyle::Danger,
            };
            let builder = CreateButton::new(&b.custom_id).style(style);
            (builder, b.label.as_str(), b.emoji.as_ref(), b.disabled)
        }
        ActionRowComponent::LinkButton(b) => (
            CreateButton::new_link(&b.url),
            b.label.as_str(),
            b.emoji.as_ref(),
            b.disabled,
        ),
        ActionRowComponent::PremiumButton(b) => {
            let builder = CreateButton::new_premium(SkuId::new(b.sku_id));
            return Some(builder.disabled(b.disabled));
        }
        ActionRowComponent::StringSelect(_) | ActionRowComponent::EntitySelect(_) => {
            return None;
        }
    };

    let mut builder = builder.disabled(disabled);
    if !label.is_empty() {
        builder = builder.label(label);
    }
    if let Some(emoji) = emoji {
        builder = builder.emoji(emoji_reaction_type(emoji));
    }
    Some(builder)
}

fn create_string_select(menu: &StringSelectMenu) -> CreateSelectMenu {
    let options = menu
        .options
        .iter()
        .map(|o| {
            let mut option =
                CreateSelectMenuOption::new(&o.label, &o.value).default_selection(o.default);
            if let Some(d) = &o.description {
                option = option.description(d);
            }
            if let Some(emoji) = &o.emoji {
                option = option.emoji(emoji_reaction_type(emoji));
            }
            option
        })
        .collect();
    let builder = CreateSelectMenu::new(&menu.custom_id, CreateSelectMenuKind::String { options });
    select_limits(
        builder,
        menu.placeholder.as_deref(),
        menu.min_values,
        menu.max_values,
        menu.disabled,
    )
}

fn create_entity_select(menu: &EntitySelectMenu) -> CreateSelectMenu {
    let kind = match menu.kind {
        EntitySelectKind::User => CreateSelectMenuKind::User { default_users: None },
        EntitySelectKind::Role => CreateSelectMenuKind::Role { default_roles: None },
        EntitySelectKind::Mentionable => CreateSelectMenuKind::Mentionable {
            default_users: None,
            default_roles: None,
        },
        EntitySelectKind::Channel => CreateSelectMenuKind::Channel {
            channel_types: (!menu.channel_types.is_empty())
                .then(|| menu.channel_types.iter().map(|t| ChannelType::from(*t)).collect()),
            default_channels: None,
        },
    };
    select_limits(
        CreateSelectMenu::new(&menu.custom_id, kind),
        menu.placeholder.as_deref(),
        menu.min_values,
        menu.max_values,
        menu.disabled,
    )
}

fn select_limits(
    mut builder: CreateSelectMenu,
    placeholder: Option<&str>,
    min_values: Option<u8>,
    max_values: Option<u8>,
    disabled: bool,
) -> CreateSelectMenu {
    if let Some(p) = placeholder {
        builder = builder.placeholder(p);
    }
    if let Some(min) = min_values {
        builder = builder.min_values(min);
    }
    if let Some(max) = max_values {
        builder = builder.max_values(max);
    }
    builder.disabled(disabled)
}

fn emoji_reaction_type(emoji: &ComponentEmoji) -> ReactionType {
    match emoji {
        ComponentEmoji::Custom { id, name, animated } => ReactionType::Custom {
            animated: *animated,
            id: EmojiId::new(*id),
            name: name.clone(),
        },
        ComponentEmoji::Unicode { name } => ReactionType::Unicode(name.clone()),
    }
}

pub fn reaction_type(emoji: &ReactionEmoji) -> ReactionType {
    match emoji {
        // Discord matches custom emoji by id; the name part is not checked
        ReactionEmoji::Custom(id) => ReactionType::Custom {
            animated: false,
            id: EmojiId::new(*id),
            name: Some("_".to_string()),
        },
        ReactionEmoji::Unicode(s) => ReactionType::Unicode(s.clone()),
    }
}
