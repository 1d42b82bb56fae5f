//! Premium access evaluation
//!
//! Decides whether a content item is currently behind the paywall. Premium
//! items lift their gate a fixed number of days after publication; anything
//! the evaluator does not understand stays gated.

pub mod timestamp;

pub use timestamp::{parse_timestamp, PublishedAt};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Per-item access flag as stored by the CMS
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessMode {
    /// "Free", any case
    Free,
    /// "Premium", any case
    Premium,
    /// "premium_window", exact match only
    PremiumWindow,
    /// No access mode recorded
    Missing,
    Unrecognized(String),
}

impl AccessMode {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("free") {
            AccessMode::Free
        } else if value.eq_ignore_ascii_case("premium") {
            AccessMode::Premium
        } else if value == "premium_window" {
            AccessMode::PremiumWindow
        } else {
            AccessMode::Unrecognized(value.to_string())
        }
    }

    pub fn from_field(value: Option<&str>) -> Self {
        value.map_or(AccessMode::Missing, AccessMode::parse)
    }
}

/// Window lengths after which premium content becomes free
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicy {
    pub premium_window_days: u32,
    /// Window for items still tagged with the legacy "premium_window" mode
    pub legacy_window_days: u32,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        AccessPolicy {
            premium_window_days: 30,
            legacy_window_days: 14,
        }
    }
}

/// The fields of a CMS record that access depends on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(default)]
    pub access_mode: Option<String>,
    #[serde(default)]
    pub published_at: Option<PublishedAt>,
}

impl ContentItem {
    pub fn new(access_mode: &str) -> Self {
        ContentItem {
            access_mode: Some(access_mode.to_string()),
            published_at: None,
        }
    }

    pub fn with_published_at(mut self, published_at: impl Into<PublishedAt>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn mode(&self) -> AccessMode {
        AccessMode::from_field(self.access_mode.as_deref())
    }

    fn published_instant(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_ref().and_then(PublishedAt::instant)
    }
}

/// Outcome of evaluating an item's access at some instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AccessDecision {
    /// Never gated
    Free,
    /// Behind the paywall; `unlocks_at` is `None` when the gate never lifts
    /// on its own
    #[serde(rename_all = "camelCase")]
    Gated { unlocks_at: Option<DateTime<Utc>> },
    /// Premium content whose window has elapsed
    Lapsed { since: DateTime<Utc> },
}

impl AccessDecision {
    pub fn is_gated(&self) -> bool {
        matches!(self, AccessDecision::Gated { .. })
    }
}

fn windowed(published: Option<DateTime<Utc>>, days: u32, now: DateTime<Utc>) -> AccessDecision {
    let Some(published) = published else {
        return AccessDecision::Gated { unlocks_at: None };
    };

    let unlock_ms = published
        .timestamp_millis()
        .saturating_add(i64::from(days) * MS_PER_DAY);
    let unlocks_at = Utc.timestamp_millis_opt(unlock_ms).single();

    if now.timestamp_millis() < unlock_ms {
        AccessDecision::Gated { unlocks_at }
    } else {
        AccessDecision::Lapsed {
            since: unlocks_at.unwrap_or(now),
        }
    }
}

/// Evaluate access under a specific policy
pub fn evaluate_access_with(
    policy: &AccessPolicy,
    item: Option<&ContentItem>,
    now: DateTime<Utc>,
) -> AccessDecision {
    let Some(item) = item else {
        return AccessDecision::Gated { unlocks_at: None };
    };

    match item.mode() {
        AccessMode::Free => AccessDecision::Free,
        AccessMode::Premium => windowed(item.published_instant(), policy.premium_window_days, now),
        AccessMode::PremiumWindow => {
            windowed(item.published_instant(), policy.legacy_window_days, now)
        }
        AccessMode::Missing | AccessMode::Unrecognized(_) => {
            AccessDecision::Gated { unlocks_at: None }
        }
    }
}

/// Evaluate access under the default 30/14-day policy
pub fn evaluate_access(item: Option<&ContentItem>, now: DateTime<Utc>) -> AccessDecision {
    evaluate_access_with(&AccessPolicy::default(), item, now)
}

/// Is the item gated at `now`? Missing items are gated.
pub fn is_premium_now(item: Option<&ContentItem>, now: DateTime<Utc>) -> bool {
    evaluate_access(item, now).is_gated()
}

/// [`is_premium_now`] against the system clock
pub fn is_premium(item: Option<&ContentItem>) -> bool {
    is_premium_now(item, Utc::now())
}
