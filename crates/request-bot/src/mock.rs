//! In-memory platform for unit testing without a Discord connection.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use request_types::errors::DiscordErrorCode;
use request_types::{
    Attachment, DiscordUser, FetchedMessage, GuildMember, GuildRole, InboundMessage,
    OutgoingMessage, ReactionEmoji, Request,
};

use crate::errors::{PlatformError, Result};
use crate::platform::Platform;

/// One recorded platform call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchMessage { channel_id: u64, message_id: u64 },
    FetchRoles { guild_id: u64 },
    FetchMember { guild_id: u64, user_id: u64 },
    Send { channel_id: u64, message: OutgoingMessage },
    Edit { request: Request },
    Delete { channel_id: u64, message_id: u64 },
    Reply { to: u64, message: OutgoingMessage },
    React { channel_id: u64, message_id: u64, emoji: ReactionEmoji },
    Relay { channel_id: u64, header: String, attachments: Vec<Attachment> },
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FetchMember,
    Send,
    Edit,
    Delete,
    Reply,
    React,
    Relay,
}

struct State {
    messages: HashMap<u64, FetchedMessage>,
    roles: Vec<GuildRole>,
    members: HashMap<u64, GuildMember>,
    failing: HashSet<Op>,
    next_id: u64,
}

/// Platform that records every call and keeps sent messages in memory.
///
/// Sent messages are stored as authored by `bot`, so a later fetch sees
/// them the way Discord would return them. Fetches and edits yield to the
/// scheduler once, which lets concurrent passes interleave.
#[derive(Clone)]
pub struct MockPlatform {
    bot: DiscordUser,
    calls: Arc<Mutex<Vec<Call>>>,
    state: Arc<Mutex<State>>,
}

impl MockPlatform {
    pub fn new(bot: DiscordUser) -> Self {
        Self {
            bot,
            calls: Arc::new(Mutex::new(Vec::new())),
            state: Arc::new(Mutex::new(State {
                messages: HashMap::new(),
                roles: Vec::new(),
                members: HashMap::new(),
                failing: HashSet::new(),
                next_id: 1000,
            })),
        }
    }

    pub fn with_message(self, msg: FetchedMessage) -> Self {
        self.state.lock().unwrap().messages.insert(msg.id, msg);
        self
    }

    pub fn with_roles(self, roles: Vec<GuildRole>) -> Self {
        self.state.lock().unwrap().roles = roles;
        self
    }

    pub fn with_member(self, member: GuildMember) -> Self {
        self.state.lock().unwrap().members.insert(member.id, member);
        self
    }

    pub fn failing(self, op: Op) -> Self {
        self.state.lock().unwrap().failing.insert(op);
        self
    }

    /// Snapshot of all calls in the order they were made
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(u64, OutgoingMessage)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { channel_id, message } => Some((channel_id, message)),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<Request> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit { request } => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn replies(&self) -> Vec<OutgoingMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }

    /// Current stored state of a message
    pub fn stored(&self, message_id: u64) -> Option<FetchedMessage> {
        self.state.lock().unwrap().messages.get(&message_id).cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn not_found(code: DiscordErrorCode, what: String) -> PlatformError {
        PlatformError::NotFound {
            code,
            message: what,
        }
    }

    fn forbidden(code: DiscordErrorCode, what: &str) -> PlatformError {
        PlatformError::Forbidden {
            code,
            message: what.to_string(),
        }
    }

    fn check(&self, op: Op, err: impl FnOnce() -> PlatformError) -> Result<()> {
        if self.state.lock().unwrap().failing.contains(&op) {
            Err(err())
        } else {
            Ok(())
        }
    }

    fn store_sent(&self, channel_id: u64, message: &OutgoingMessage) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.messages.insert(
            id,
            FetchedMessage {
                id,
                channel_id,
                author: self.bot.clone(),
                content: message.content.clone(),
                embeds: message.embed.clone().into_iter().collect(),
                components: message.components.clone(),
            },
        );
        id
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn fetch_message(&self, channel_id: u64, message_id: u64) -> Result<FetchedMessage> {
        self.record(Call::FetchMessage {
            channel_id,
            message_id,
        });
        tokio::task::yield_now().await;
        self.stored(message_id)
            .ok_or_else(|| {
                Self::not_found(DiscordErrorCode::UnknownMessage, format!("message {}", message_id))
            })
    }

    async fn fetch_roles(&self, guild_id: u64) -> Result<Vec<GuildRole>> {
        self.record(Call::FetchRoles { guild_id });
        Ok(self.state.lock().unwrap().roles.clone())
    }

    async fn fetch_member(&self, guild_id: u64, user_id: u64) -> Result<GuildMember> {
        self.record(Call::FetchMember { guild_id, user_id });
        self.check(Op::FetchMember, || {
            Self::forbidden(DiscordErrorCode::MissingPermissions, "fetch member")
        })?;
        self.state
            .lock()
            .unwrap()
            .members
            .get(&user_id)
            .cloned()
            .ok_or_else(|| {
                Self::not_found(DiscordErrorCode::UnknownMember, format!("member {}", user_id))
            })
    }

    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<u64> {
        self.record(Call::Send {
            channel_id,
            message: message.clone(),
        });
        self.check(Op::Send, || Self::forbidden(DiscordErrorCode::MissingPermissions, "send"))?;
        Ok(self.store_sent(channel_id, message))
    }

    async fn edit_message(&self, request: &Request) -> Result<()> {
        self.record(Call::Edit {
            request: request.clone(),
        });
        tokio::task::yield_now().await;
        self.check(Op::Edit, || {
            Self::forbidden(DiscordErrorCode::CannotEditByOtherUser, "edit")
        })?;
        let mut state = self.state.lock().unwrap();
        let stored = state
            .messages
            .get_mut(&request.id)
            .ok_or_else(|| {
                Self::not_found(DiscordErrorCode::UnknownMessage, format!("message {}", request.id))
            })?;
        stored.embeds = request.to_embeds();
        stored.components = request.components.clone();
        Ok(())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        self.record(Call::Delete {
            channel_id,
            message_id,
        });
        self.check(Op::Delete, || Self::forbidden(DiscordErrorCode::MissingPermissions, "delete"))?;
        self.state.lock().unwrap().messages.remove(&message_id);
        Ok(())
    }

    async fn reply(&self, to: &InboundMessage, message: &OutgoingMessage) -> Result<u64> {
        self.record(Call::Reply {
            to: to.id,
            message: message.clone(),
        });
        self.check(Op::Reply, || Self::forbidden(DiscordErrorCode::MissingPermissions, "reply"))?;
        Ok(self.store_sent(to.channel_id, message))
    }

    async fn react(&self, channel_id: u64, message_id: u64, emoji: &ReactionEmoji) -> Result<()> {
        self.record(Call::React {
            channel_id,
            message_id,
            emoji: emoji.clone(),
        });
        self.check(Op::React, || Self::forbidden(DiscordErrorCode::MissingPermissions, "react"))
    }

    async fn relay_attachments(
        &self,
        channel_id: u64,
        header: &str,
        attachments: &[Attachment],
    ) -> Result<Vec<String>> {
        self.record(Call::Relay {
            channel_id,
            header: header.to_string(),
            attachments: attachments.to_vec(),
        });
        self.check(Op::Relay, || Self::forbidden(DiscordErrorCode::MissingPermissions, "relay"))?;
        Ok(attachments
            .iter()
            .map(|a| format!("https://cdn.example/relay/{}", a.filename))
            .collect())
    }
}
