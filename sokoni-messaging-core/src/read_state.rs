//! Read-State Classification
//!
//! Maps a message's raw `status`/`read` fields onto the three-state
//! delivery model and the four-state display indicator. The classifier is
//! total: every combination of status-present and read-flag maps to
//! exactly one outcome.
//!
//! Display status is monotonic. A record with no `status` but `read =
//! true` is treated as at least delivered, so an upgrade of the store that
//! starts sending `status` never makes an indicator regress.

use serde::{Deserialize, Serialize};

use crate::model::Message;

/// Delivery status of a message as tracked by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    /// Accepted by the store, not yet seen by the recipient's device
    Sent,
    /// Reached the recipient's device
    Delivered,
    /// Opened by the recipient
    Read,
}

impl DeliveryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            "read" => Some(Self::Read),
            _ => None,
        }
    }
}

/// Check-mark indicator rendered next to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadIndicator {
    /// Not the current user's message; no indicator
    None,
    /// Sent, not yet delivered
    SingleCheck,
    /// Delivered, not yet read
    DoubleCheckGray,
    /// Read by the counterpart
    DoubleCheckBlue,
}

/// Effective delivery state of a message, never regressing
///
/// With `status` absent, `read = true` counts as delivered; a `sent`
/// status accompanied by `read = true` is likewise lifted to delivered.
pub fn effective_state(message: &Message) -> DeliveryState {
    match message.status {
        Some(DeliveryState::Read) => DeliveryState::Read,
        Some(DeliveryState::Delivered) => DeliveryState::Delivered,
        Some(DeliveryState::Sent) | None => {
            if message.read {
                DeliveryState::Delivered
            } else {
                DeliveryState::Sent
            }
        }
    }
}

/// Classify the indicator for a message
///
/// `is_own` is whether the current user sent the message; messages from
/// the counterpart carry no indicator.
pub fn classify(message: &Message, is_own: bool) -> ReadIndicator {
    if !is_own {
        return ReadIndicator::None;
    }
    match effective_state(message) {
        DeliveryState::Read => ReadIndicator::DoubleCheckBlue,
        DeliveryState::Delivered => ReadIndicator::DoubleCheckGray,
        DeliveryState::Sent => ReadIndicator::SingleCheck,
    }
}
