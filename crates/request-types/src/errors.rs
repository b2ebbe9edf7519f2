//! Discord error taxonomy used to decide how loudly a failed call is logged.
//!
//! None of these drive retries: every platform call made by the bot is
//! single-attempt.

use serde::{Deserialize, Serialize};

/// High-level category of a Discord API error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Rate limit hit.
    RateLimit,
    /// Target resource (channel, message, member …) not found.
    NotFound,
    /// Insufficient bot permissions for the requested action.
    PermissionDenied,
    /// Request payload too large (attachments).
    PayloadTooLarge,
    /// Malformed or semantically invalid input.
    InvalidInput,
    /// Network or I/O error.
    Network,
    /// Unknown or uncategorised error.
    Unknown,
}

/// Discord JSON error codes the bot can run into.
///
/// See <https://discord.com/developers/docs/topics/opcodes-and-status-codes#json>;
/// everything else maps to [`DiscordErrorCode::Unknown`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscordErrorCode {
    // ── Not found ─────────────────────────────────────────────────────────────
    /// 10003: Unknown channel.
    UnknownChannel,
    /// 10004: Unknown guild.
    UnknownGuild,
    /// 10007: Unknown member.
    UnknownMember,
    /// 10008: Unknown message (likely deleted).
    UnknownMessage,
    /// 10011: Unknown role.
    UnknownRole,
    /// 10013: Unknown user.
    UnknownUser,
    /// 10014: Unknown emoji.
    UnknownEmoji,

    // ── Permission errors ──────────────────────────────────────────────────────
    /// 50001: Missing access.
    MissingAccess,
    /// 50013: Missing permissions.
    MissingPermissions,
    /// 50005: Cannot edit a message authored by another user.
    CannotEditByOtherUser,
    /// 90001: Reaction was blocked.
    ReactionBlocked,

    // ── Rate limiting ──────────────────────────────────────────────────────────
    /// HTTP 429: Global or per-route rate limit.
    RateLimited,
    /// 20016: Action blocked by channel slowmode.
    SlowmodeRateLimit,

    // ── Input errors ───────────────────────────────────────────────────────────
    /// 50006: Cannot send an empty message.
    CannotSendEmptyMessage,
    /// 50035: Invalid form body (validation failed).
    InvalidFormBody,
    /// 30010: Maximum number of reactions reached.
    MaxReactionsReached,
    /// 40005 / HTTP 413: Request entity too large.
    RequestEntityTooLarge,

    // ── Server / client ────────────────────────────────────────────────────────
    /// 130000: API resource overloaded.
    ApiOverloaded,
    /// Network or I/O error on the client side.
    NetworkError,

    /// Any Discord JSON error code not listed above.
    Unknown,
}

impl DiscordErrorCode {
    /// Derive the code from a raw Discord JSON error code integer.
    pub fn from_raw(code: u32) -> Self {
        match code {
            10003 => Self::UnknownChannel,
            10004 => Self::UnknownGuild,
            10007 => Self::UnknownMember,
            10008 => Self::UnknownMessage,
            10011 => Self::UnknownRole,
            10013 => Self::UnknownUser,
            10014 => Self::UnknownEmoji,
            20016 => Self::SlowmodeRateLimit,
            30010 => Self::MaxReactionsReached,
            40005 => Self::RequestEntityTooLarge,
            50001 => Self::MissingAccess,
            50005 => Self::CannotEditByOtherUser,
            50006 => Self::CannotSendEmptyMessage,
            50013 => Self::MissingPermissions,
            50035 => Self::InvalidFormBody,
            90001 => Self::ReactionBlocked,
            130000 => Self::ApiOverloaded,
            _ => Self::Unknown,
        }
    }

    /// The high-level category for this code.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownChannel
            | Self::UnknownGuild
            | Self::UnknownMember
            | Self::UnknownMessage
            | Self::UnknownRole
            | Self::UnknownUser
            | Self::UnknownEmoji => ErrorCategory::NotFound,

            Self::MissingAccess
            | Self::MissingPermissions
            | Self::CannotEditByOtherUser
            | Self::ReactionBlocked => ErrorCategory::PermissionDenied,

            Self::RateLimited | Self::SlowmodeRateLimit => ErrorCategory::RateLimit,

            Self::RequestEntityTooLarge => ErrorCategory::PayloadTooLarge,

            Self::CannotSendEmptyMessage | Self::InvalidFormBody | Self::MaxReactionsReached => {
                ErrorCategory::InvalidInput
            }

            Self::NetworkError => ErrorCategory::Network,

            Self::ApiOverloaded | Self::Unknown => ErrorCategory::Unknown,
        }
    }

    /// True if repeating the same call could never succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::NotFound | ErrorCategory::PermissionDenied | ErrorCategory::InvalidInput
        )
    }
}
