//! Request dispatcher: the single entry point for inbound messages.
//!
//! Each gateway message runs one dispatch pass. Messages in the winner queue
//! channel take exactly one of three paths:
//!
//! - **Reply to a request**: the reply text becomes the request's note and
//!   the reply is deleted once the request was edited.
//! - **New request**: a message mentioning guild members is replaced by a
//!   structured request carrying a role picker.
//! - **Rejection**: a human message without resolvable mentions gets a
//!   dismissable error reply.
//!
//! Other configured channels are handed to their policy in [`crate::policies`].
//! Platform failures end the pass and are logged; nothing is retried.

#[path = "dispatcher_tests.rs"]
mod dispatcher_tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use request_types::components::{dismiss_row, MAX_SELECT_OPTIONS};
use request_types::{
    build_candidates, InboundMessage, NoteMerge, OutgoingMessage, RelayNote, Request,
    WinnerRequestDraft,
};
use serde::{Deserialize, Serialize};
use serenity::prelude::TypeMapKey;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{ChannelRole, Config};
use crate::errors::{log_error, Result};
use crate::locks::RequestLocks;
use crate::platform::Platform;
use crate::policies;
use crate::validator::ValidateBanRequest;

/// Reply sent when a queue message mentions nobody
pub const NO_MENTIONS_REPLY: &str = "There are no mentions in your message!";

/// The bot's own account, known once the gateway is ready
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: u64,
    pub tag: String,
}

/// Counters exposed on the health endpoint
#[derive(Debug, Default)]
pub struct DispatchStats {
    pub requests_created: AtomicU64,
    pub notes_merged: AtomicU64,
    pub replies_rejected: AtomicU64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub requests_created: u64,
    pub notes_merged: u64,
    pub replies_rejected: u64,
}

impl DispatchStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests_created: self.requests_created.load(Ordering::Relaxed),
            notes_merged: self.notes_merged.load(Ordering::Relaxed),
            replies_rejected: self.replies_rejected.load(Ordering::Relaxed),
        }
    }
}

pub struct RequestDispatcher<P> {
    pub(crate) platform: P,
    config: Arc<Config>,
    validator: Arc<dyn ValidateBanRequest>,
    identity: RwLock<Option<BotIdentity>>,
    pub(crate) locks: RequestLocks,
    stats: Arc<DispatchStats>,
}

impl<P: Platform + 'static> TypeMapKey for RequestDispatcher<P> {
    type Value = Arc<RequestDispatcher<P>>;
}

impl<P: Platform> RequestDispatcher<P> {
    pub fn new(platform: P, config: Arc<Config>, validator: Arc<dyn ValidateBanRequest>) -> Self {
        Self {
            platform,
            config,
            validator,
            identity: RwLock::new(None),
            locks: RequestLocks::new(),
            stats: Arc::new(DispatchStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<DispatchStats> {
        self.stats.clone()
    }

    pub async fn set_identity(&self, identity: BotIdentity) {
        *self.identity.write().await = Some(identity);
    }

    pub async fn identity(&self) -> Option<BotIdentity> {
        self.identity.read().await.clone()
    }

    /// Run one dispatch pass for a newly created message.
    pub async fn on_message_created(&self, msg: &InboundMessage) {
        let channels = &self.config.channels;
        match channels.classify(msg.channel_id) {
            Some(ChannelRole::WinnerQueue) => {
                if let Err(e) = self.route_queue_message(msg).await {
                    log_error(&format!("Winner queue message {} failed", msg.id), &e);
                }
            }
            Some(ChannelRole::Commands) => {
                if let Err(e) = policies::relay_media(&self.platform, channels, msg).await {
                    log_error(&format!("Media relay for {} failed", msg.id), &e);
                }
            }
            Some(ChannelRole::Creations | ChannelRole::Avatars) => {
                policies::decorate_gallery(&self.platform, &self.config.gallery, msg).await;
            }
            Some(ChannelRole::BanRequestsQueue) => self.validator.validate(msg).await,
            Some(ChannelRole::MediaLogs) | None => {}
        }

        if policies::has_blocked_activity(msg) {
            if let Err(e) =
                policies::moderate_activity(&self.platform, &self.config.roles, msg).await
            {
                log_error(&format!("Activity moderation for {} failed", msg.id), &e);
            }
        }
    }

    async fn route_queue_message(&self, msg: &InboundMessage) -> Result<()> {
        match msg.referenced_message_id {
            Some(target_id) => self.annotate_request(msg, target_id).await,
            None => self.create_request(msg).await,
        }
    }

    /// Merge the reply into the referenced request as its note.
    async fn annotate_request(&self, reply: &InboundMessage, target_id: u64) -> Result<()> {
        let _guard = self.locks.acquire(target_id).await;

        let target = self
            .platform
            .fetch_message(reply.channel_id, target_id)
            .await?;
        if !target.author.bot {
            debug!(
                "Reply {} targets message {} by a user, ignoring",
                reply.id, target_id
            );
            return Ok(());
        }
        let Some(mut request) = Request::from_fetched(target) else {
            debug!(
                "Reply {} targets message {} without request fields, ignoring",
                reply.id, target_id
            );
            return Ok(());
        };

        let merge = request.merge_note(&reply.content, &reply.author.tag);
        if merge == NoteMerge::Added {
            request.ensure_remove_button();
        }

        self.platform.edit_message(&request).await?;
        self.stats.notes_merged.fetch_add(1, Ordering::Relaxed);
        info!(
            "Note on request {} {} by {}",
            request.id,
            match merge {
                NoteMerge::Added => "added",
                NoteMerge::Replaced => "replaced",
            },
            reply.author.tag
        );

        if let Err(e) = self
            .platform
            .delete_message(reply.channel_id, reply.id)
            .await
        {
            log_error(&format!("Failed to delete merged reply {}", reply.id), &e);
        }
        Ok(())
    }

    /// Turn a queue message into a winner request.
    async fn create_request(&self, msg: &InboundMessage) -> Result<()> {
        let Some(guild_id) = msg.guild_id else {
            return Ok(());
        };

        let members = if msg.mentions.is_empty() {
            Vec::new()
        } else {
            self.platform.fetch_members(guild_id, &msg.mentions).await?
        };

        if members.is_empty() {
            return self.reject(msg).await;
        }

        let roles = self.platform.fetch_roles(guild_id).await?;
        let candidates = build_candidates(&roles);
        if candidates.len() > MAX_SELECT_OPTIONS {
            warn!(
                "{} award roles found, only the first {} fit the picker",
                candidates.len(),
                MAX_SELECT_OPTIONS
            );
        } else if candidates.is_empty() {
            warn!("No award roles found in guild {}", guild_id);
        }

        let identity = self.identity().await;
        let relay = match identity {
            Some(bot) if bot.id == msg.author.id => match RelayNote::parse(&msg.content) {
                Some(note) => Some((note, bot.tag)),
                None => {
                    warn!(
                        "Relayed request {} has malformed content {:?}, posting without note",
                        msg.id, msg.content
                    );
                    None
                }
            },
            _ => None,
        };

        let draft = WinnerRequestDraft {
            requester: &msg.author,
            requester_display_name: &msg.author_display_name,
            members: &members,
            candidates: &candidates,
            relay: relay.as_ref().map(|(note, tag)| (note.clone(), tag.as_str())),
            timestamp: &msg.timestamp,
        };

        let request_id = self
            .platform
            .send_message(msg.channel_id, &draft.into_message())
            .await?;
        self.stats.requests_created.fetch_add(1, Ordering::Relaxed);
        info!(
            "Created request {} for {} member(s) from {}",
            request_id,
            members.len(),
            msg.author.tag
        );

        if let Err(e) = self.platform.delete_message(msg.channel_id, msg.id).await {
            log_error(&format!("Failed to delete request source {}", msg.id), &e);
        }
        Ok(())
    }

    async fn reject(&self, msg: &InboundMessage) -> Result<()> {
        if msg.author.bot {
            debug!("Bot message {} without mentions, ignoring", msg.id);
            return Ok(());
        }

        let reply = OutgoingMessage {
            content: NO_MENTIONS_REPLY.to_string(),
            embed: None,
            components: vec![dismiss_row()],
        };
        self.platform.reply(msg, &reply).await?;
        self.stats.replies_rejected.fetch_add(1, Ordering::Relaxed);
        debug!("Rejected message {} from {}: no mentions", msg.id, msg.author.tag);
        Ok(())
    }
}
