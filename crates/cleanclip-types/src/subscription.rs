//! Subscription types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ParseEnumError;

/// Local subscription status
///
/// Lifecycle: `trialing -> active -> {past_due, canceled}`,
/// `past_due -> active | canceled`, and any state may move to `canceled`,
/// which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// In trial period (initial state on signup)
    #[default]
    Trialing,
    /// Subscription is active
    Active,
    /// Payment is past due
    PastDue,
    /// Subscription was canceled
    Canceled,
}

impl SubscriptionStatus {
    /// Storage / wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trialing => "trialing",
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
        }
    }

    /// Map a payment processor subscription status to the local status.
    ///
    /// Unknown processor states (`incomplete_expired`, `paused`, ...) are
    /// treated as canceled.
    pub fn from_processor_status(status: &str) -> Self {
        match status {
            "active" => Self::Active,
            "past_due" | "unpaid" => Self::PastDue,
            "trialing" => Self::Trialing,
            _ => Self::Canceled,
        }
    }

    /// Whether a subscription in this state may use gated features
    pub const fn grants_access(&self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }

    /// Whether `next` is a legal transition from this state.
    ///
    /// Re-applying the current state is always legal so that replayed events
    /// are harmless.
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match (*self, next) {
            (Self::Trialing, Self::Trialing)
            | (Self::Active, Self::Active)
            | (Self::PastDue, Self::PastDue)
            | (Self::Canceled, Self::Canceled) => true,
            (_, Self::Canceled) => true,
            (Self::Canceled, _) => false,
            (Self::Trialing, Self::Active)
            | (Self::Active, Self::PastDue)
            | (Self::PastDue, Self::Active) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trialing" => Ok(Self::Trialing),
            "active" => Ok(Self::Active),
            "past_due" => Ok(Self::PastDue),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseEnumError::new("subscription status", s)),
        }
    }
}

/// Subscription summary shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    /// Current status
    pub status: SubscriptionStatus,
    /// When the paid subscription started
    pub started_at: Option<DateTime<Utc>>,
    /// When access ends (set once canceled)
    pub ends_at: Option<DateTime<Utc>>,
    /// Whether a self-serve refund is currently possible
    pub can_refund: bool,
}
