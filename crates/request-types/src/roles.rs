//! Awardable role catalog
//!
//! Derives select-menu candidates from the guild role list. A role is
//! awardable when its name contains one of [`AWARD_KEYWORDS`]; the label is
//! the name with every digit run removed, and the first four-digit run (the
//! season year) becomes the description.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{GuildRole, SelectOption};

/// Case-sensitive name fragments marking an awardable role
pub const AWARD_KEYWORDS: [&str; 3] = ["Winner", "Champion", "Master"];

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("year pattern is valid"));
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

/// A selectable award role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleCandidate {
    pub label: String,
    /// Role id
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleCandidate {
    /// Derive a candidate from a role, without checking the keyword filter
    pub fn from_role(role: &GuildRole) -> Self {
        Self {
            label: DIGIT_RUN.replace_all(&role.name, "").trim().to_string(),
            value: role.id.to_string(),
            description: YEAR.find(&role.name).map(|m| m.as_str().to_string()),
        }
    }
}

impl From<&RoleCandidate> for SelectOption {
    fn from(c: &RoleCandidate) -> Self {
        SelectOption {
            label: c.label.clone(),
            value: c.value.clone(),
            description: c.description.clone(),
            emoji: None,
            default: false,
        }
    }
}

/// True if the role name marks it as awardable
pub fn is_award_role(name: &str) -> bool {
    AWARD_KEYWORDS.iter().any(|k| name.contains(k))
}

/// Build candidates in directory order. Empty labels are kept.
pub fn build_candidates<'a>(roles: impl IntoIterator<Item = &'a GuildRole>) -> Vec<RoleCandidate> {
    roles
        .into_iter()
        .filter(|r| is_award_role(&r.name))
        .map(RoleCandidate::from_role)
        .collect()
}
