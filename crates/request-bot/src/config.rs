//! Configuration management for request-bot

#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{Context, Result};
use request_types::ReactionEmoji;
use serde::{Deserialize, Serialize};
use std::fs;

/// Custom emoji the gallery channels have always been decorated with
const DEFAULT_GALLERY_EMOJI_ID: u64 = 275832913025564682;

/// Unicode reactions added after the custom emoji, in order
const GALLERY_UNICODE_REACTIONS: [&str; 2] = ["♥️", "😎"];

/// Source of environment variables
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Process environment
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord: DiscordBotConfig,
    #[serde(default)]
    pub channels: ChannelMap,
    #[serde(default)]
    pub roles: PrivilegedRoles,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

/// Discord bot specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordBotConfig {
    /// Bot token from the Discord developer portal
    #[serde(default = "default_bot_token")]
    pub bot_token: String,
}

/// Channels the bot gives a meaning to. Any of them may be left unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelMap {
    pub winner_queue: Option<u64>,
    pub ban_requests_queue: Option<u64>,
    pub commands: Option<u64>,
    pub media_logs: Option<u64>,
    pub creations: Option<u64>,
    pub avatars: Option<u64>,
}

/// What a configured channel is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRole {
    WinnerQueue,
    BanRequestsQueue,
    Commands,
    MediaLogs,
    Creations,
    Avatars,
}

impl ChannelMap {
    /// Role of `channel_id`, if it is one of the configured channels.
    ///
    /// When the same id is configured twice the first matching role in
    /// declaration order wins.
    pub fn classify(&self, channel_id: u64) -> Option<ChannelRole> {
        [
            (self.winner_queue, ChannelRole::WinnerQueue),
            (self.ban_requests_queue, ChannelRole::BanRequestsQueue),
            (self.commands, ChannelRole::Commands),
            (self.media_logs, ChannelRole::MediaLogs),
            (self.creations, ChannelRole::Creations),
            (self.avatars, ChannelRole::Avatars),
        ]
        .into_iter()
        .find_map(|(id, role)| (id == Some(channel_id)).then_some(role))
    }
}

/// Staff roles exempt from activity moderation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrivilegedRoles {
    pub trial_moderator: Option<u64>,
    pub moderator: Option<u64>,
    pub senior_moderator: Option<u64>,
    pub manager: Option<u64>,
}

impl PrivilegedRoles {
    pub fn ids(&self) -> Vec<u64> {
        [
            self.trial_moderator,
            self.moderator,
            self.senior_moderator,
            self.manager,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryConfig {
    /// Guild emoji reacted first; `None` skips it
    #[serde(default = "default_gallery_emoji")]
    pub custom_emoji_id: Option<u64>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            custom_emoji_id: default_gallery_emoji(),
        }
    }
}

impl GalleryConfig {
    /// Reactions in the order they are added
    pub fn reactions(&self) -> Vec<ReactionEmoji> {
        self.custom_emoji_id
            .map(ReactionEmoji::Custom)
            .into_iter()
            .chain(
                GALLERY_UNICODE_REACTIONS
                    .iter()
                    .map(|e| ReactionEmoji::Unicode(e.to_string())),
            )
            .collect()
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_impl(&SystemEnv)
    }

    pub(crate) fn from_env_impl<E: ReadEnv>(env: &E) -> Result<Self> {
        let bot_token = env
            .var("DISCORD_BOT_TOKEN")
            .context("DISCORD_BOT_TOKEN not set")?;

        let id = |key: &str| env.var(key).as_deref().and_then(parse_id);

        let custom_emoji_id = match env.var("GALLERY_EMOJI_ID") {
            Some(v) if v.trim().eq_ignore_ascii_case("none") => None,
            Some(v) => parse_id(&v).or_else(default_gallery_emoji),
            None => default_gallery_emoji(),
        };

        Ok(Config {
            discord: DiscordBotConfig { bot_token },
            channels: ChannelMap {
                winner_queue: id("WINNER_QUEUE_CHANNEL_ID"),
                ban_requests_queue: id("BAN_REQUESTS_CHANNEL_ID"),
                commands: id("COMMANDS_CHANNEL_ID"),
                media_logs: id("MEDIA_LOGS_CHANNEL_ID"),
                creations: id("CREATIONS_CHANNEL_ID"),
                avatars: id("AVATARS_CHANNEL_ID"),
            },
            roles: PrivilegedRoles {
                trial_moderator: id("TRIAL_MODERATOR_ROLE_ID"),
                moderator: id("MODERATOR_ROLE_ID"),
                senior_moderator: id("SENIOR_MODERATOR_ROLE_ID"),
                manager: id("MANAGER_ROLE_ID"),
            },
            gallery: GalleryConfig { custom_emoji_id },
        })
    }

    /// Settings that load fine but leave part of the bot inert
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let channels = &self.channels;

        if channels.winner_queue.is_none() {
            warnings.push("winner_queue is not set; winner requests are disabled".to_string());
        }
        if channels.commands.is_some() && channels.media_logs.is_none() {
            warnings.push(
                "commands is set without media_logs; attachments will not be relayed".to_string(),
            );
        }
        if self.roles.ids().is_empty() {
            warnings.push(
                "no privileged roles set; activity moderation exempts nobody".to_string(),
            );
        }
        warnings
    }
}

fn default_bot_token() -> String {
    std::env::var("DISCORD_BOT_TOKEN").unwrap_or_default()
}

fn default_gallery_emoji() -> Option<u64> {
    Some(DEFAULT_GALLERY_EMOJI_ID)
}

fn parse_id(s: &str) -> Option<u64> {
    s.trim().parse::<u64>().ok()
}
