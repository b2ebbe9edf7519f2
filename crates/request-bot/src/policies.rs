//! One-shot channel policies that share the message entry point with the
//! request workflow.

use request_types::{InboundMessage, OutgoingMessage};
use tracing::{debug, info, warn};

use crate::config::{ChannelMap, GalleryConfig, PrivilegedRoles};
use crate::errors::Result;
use crate::platform::Platform;

/// Activity party ids containing this are removed from unprivileged members
pub const BLOCKED_ACTIVITY: &str = "spotify";

/// Log header placed above relayed media
pub fn media_log_header(msg: &InboundMessage) -> String {
    format!(
        "<t:{}:F> :park: {} (`{}`)",
        msg.created_at_secs, msg.author.tag, msg.author.id
    )
}

pub fn media_links_reply(author_id: u64, links: &[String]) -> String {
    let list: String = links.iter().map(|l| format!("{}\n", l)).collect();
    format!("<@{}> Your media links: \n {}", author_id, list)
}

/// Move attachments posted in the commands channel into the media log.
///
/// The author gets the new links back in the source channel and the
/// original message is deleted. Nothing is deleted unless the links were
/// delivered.
pub async fn relay_media<P: Platform>(
    platform: &P,
    channels: &ChannelMap,
    msg: &InboundMessage,
) -> Result<()> {
    if msg.author.bot || msg.attachments.is_empty() {
        return Ok(());
    }
    let Some(media_logs) = channels.media_logs else {
        warn!(
            "Attachments from {} not relayed: media_logs is not set",
            msg.author.id
        );
        return Ok(());
    };

    let links = platform
        .relay_attachments(media_logs, &media_log_header(msg), &msg.attachments)
        .await?;
    info!(
        "Relayed {} attachment(s) from {} to media log",
        links.len(),
        msg.author.id
    );

    platform
        .send_message(
            msg.channel_id,
            &OutgoingMessage::text(media_links_reply(msg.author.id, &links)),
        )
        .await?;
    platform.delete_message(msg.channel_id, msg.id).await
}

/// React to gallery posts. Stops quietly at the first rejected reaction.
pub async fn decorate_gallery<P: Platform>(
    platform: &P,
    gallery: &GalleryConfig,
    msg: &InboundMessage,
) {
    if msg.author.bot {
        return;
    }
    for emoji in gallery.reactions() {
        if let Err(e) = platform.react(msg.channel_id, msg.id, &emoji).await {
            debug!("Gallery reaction on {} stopped: {}", msg.id, e);
            break;
        }
    }
}

pub fn has_blocked_activity(msg: &InboundMessage) -> bool {
    msg.activity_party_id
        .as_deref()
        .is_some_and(|p| p.contains(BLOCKED_ACTIVITY))
}

/// Delete activity invites from members without a privileged role
pub async fn moderate_activity<P: Platform>(
    platform: &P,
    roles: &PrivilegedRoles,
    msg: &InboundMessage,
) -> Result<()> {
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };

    let member = platform.fetch_member(guild_id, msg.author.id).await?;
    if member.has_any_role(&roles.ids()) {
        debug!("Activity invite {} kept: author is privileged", msg.id);
        return Ok(());
    }

    platform.delete_message(msg.channel_id, msg.id).await?;
    info!(
        "Deleted activity invite {} from {} in channel {}",
        msg.id, msg.author.id, msg.channel_id
    );
    Ok(())
}
