//! Chat platform capabilities used by a dispatch pass.
//!
//! [`Platform`] is the only way the dispatcher and its channel policies reach
//! Discord. [`SerenityPlatform`] implements it over serenity's HTTP client;
//! tests substitute a recording mock.

use std::sync::Arc;

use async_trait::async_trait;
use request_types::{
    Attachment, FetchedMessage, GuildMember, GuildRole, InboundMessage, OutgoingMessage,
    ReactionEmoji, Request,
};
use serenity::builder::{CreateAttachment, CreateMessage, EditMessage};
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use tracing::debug;

use crate::convert;
use crate::errors::{PlatformError, Result};

#[async_trait]
pub trait Platform: Send + Sync {
    async fn fetch_message(&self, channel_id: u64, message_id: u64) -> Result<FetchedMessage>;

    /// All guild roles in the order the platform lists them
    async fn fetch_roles(&self, guild_id: u64) -> Result<Vec<GuildRole>>;

    /// Resolve user ids to members. Users who are not members are left out.
    async fn fetch_members(&self, guild_id: u64, user_ids: &[u64]) -> Result<Vec<GuildMember>> {
        resolve_members(self, guild_id, user_ids).await
    }

    async fn fetch_member(&self, guild_id: u64, user_id: u64) -> Result<GuildMember>;

    /// Send a message and return its id
    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<u64>;

    /// Overwrite the embeds and components of an existing request message
    async fn edit_message(&self, request: &Request) -> Result<()>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()>;

    /// Send `message` as a reply to `to`, returning the reply id
    async fn reply(&self, to: &InboundMessage, message: &OutgoingMessage) -> Result<u64>;

    async fn react(&self, channel_id: u64, message_id: u64, emoji: &ReactionEmoji) -> Result<()>;

    /// Re-upload `attachments` to `channel_id` under `header`. Returns the
    /// URLs of the re-uploaded copies.
    async fn relay_attachments(
        &self,
        channel_id: u64,
        header: &str,
        attachments: &[Attachment],
    ) -> Result<Vec<String>>;
}

/// Look up each distinct user id once, in order.
///
/// Users the guild does not know are skipped; any other failure ends the
/// lookup.
pub async fn resolve_members<P: Platform + ?Sized>(
    platform: &P,
    guild_id: u64,
    user_ids: &[u64],
) -> Result<Vec<GuildMember>> {
    let mut members: Vec<GuildMember> = Vec::with_capacity(user_ids.len());
    let mut seen: Vec<u64> = Vec::with_capacity(user_ids.len());
    for &user_id in user_ids {
        if seen.contains(&user_id) {
            continue;
        }
        seen.push(user_id);
        match platform.fetch_member(guild_id, user_id).await {
            Ok(member) => members.push(member),
            Err(PlatformError::NotFound { .. }) => {
                debug!("User {} is not a member of guild {}", user_id, guild_id);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(members)
}

/// [`Platform`] backed by serenity's HTTP client
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn fetch_message(&self, channel_id: u64, message_id: u64) -> Result<FetchedMessage> {
        let msg = ChannelId::new(channel_id)
            .message(&*self.http, MessageId::new(message_id))
            .await?;
        Ok(convert::fetched_message(&msg))
    }

    async fn fetch_roles(&self, guild_id: u64) -> Result<Vec<GuildRole>> {
        let roles = self.http.get_guild_roles(GuildId::new(guild_id)).await?;
        Ok(roles
            .iter()
            .map(|r| GuildRole {
                id: r.id.get(),
                name: r.name.clone(),
            })
            .collect())
    }

    async fn fetch_member(&self, guild_id: u64, user_id: u64) -> Result<GuildMember> {
        let member = GuildId::new(guild_id)
            .member(&*self.http, UserId::new(user_id))
            .await?;
        Ok(convert::guild_member(&member))
    }

    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<u64> {
        let builder = convert::create_message(message);
        let sent = ChannelId::new(channel_id)
            .send_message(&*self.http, builder)
            .await?;
        Ok(sent.id.get())
    }

    async fn edit_message(&self, request: &Request) -> Result<()> {
        let builder = EditMessage::new()
            .embeds(
                request
                    .to_embeds()
                    .iter()
                    .map(convert::create_embed)
                    .collect(),
            )
            .components(convert::create_action_rows(&request.components));
        ChannelId::new(request.channel_id)
            .edit_message(&*self.http, MessageId::new(request.id), builder)
            .await?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        ChannelId::new(channel_id)
            .delete_message(&*self.http, MessageId::new(message_id))
            .await?;
        Ok(())
    }

    async fn reply(&self, to: &InboundMessage, message: &OutgoingMessage) -> Result<u64> {
        let channel = ChannelId::new(to.channel_id);
        let builder =
            convert::create_message(message).reference_message((channel, MessageId::new(to.id)));
        let sent = channel.send_message(&*self.http, builder).await?;
        Ok(sent.id.get())
    }

    async fn react(&self, channel_id: u64, message_id: u64, emoji: &ReactionEmoji) -> Result<()> {
        let reaction = convert::reaction_type(emoji);
        self.http
            .create_reaction(ChannelId::new(channel_id), MessageId::new(message_id), &reaction)
            .await?;
        Ok(())
    }

    async fn relay_attachments(
        &self,
        channel_id: u64,
        header: &str,
        attachments: &[Attachment],
    ) -> Result<Vec<String>> {
        if attachments.is_empty() {
            return Err(PlatformError::InvalidInput("nothing to relay".to_string()));
        }

        let mut files = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            files.push(CreateAttachment::url(&*self.http, &attachment.url).await?);
        }

        let builder = CreateMessage::new().content(header).add_files(files);
        let sent = ChannelId::new(channel_id)
            .send_message(&*self.http, builder)
            .await?;
        Ok(sent.attachments.iter().map(|a| a.url.clone()).collect())
    }
}
