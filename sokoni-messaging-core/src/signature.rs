//! Conversation Content Signature
//!
//! A small derived value used to cheaply detect whether two conversation
//! snapshots differ without deep comparison: the message count plus the
//! last message's id, read flag, status and timestamp. The conversation
//! poller compares signatures before replacing the displayed snapshot, so
//! an unchanged poll result never re-renders the transcript or disturbs
//! scroll position.
//!
//! The last message covers the interesting transitions: appends change
//! the count and the last id, read receipts and delivery upgrades change
//! the last message's flags.

use chrono::{DateTime, Utc};

use crate::model::Message;
use crate::read_state::DeliveryState;

/// Signature over an ordered message sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationSignature {
    count: usize,
    last_id: Option<String>,
    last_read: bool,
    last_status: Option<DeliveryState>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl ConversationSignature {
    /// Compute the signature of a message sequence
    pub fn of(messages: &[Message]) -> Self {
        let last = messages.last();
        Self {
            count: messages.len(),
            last_id: last.map(|m| m.id.clone()),
            last_read: last.map(|m| m.read).unwrap_or(false),
            last_status: last.and_then(|m| m.status),
            last_timestamp: last.map(|m| m.created_at),
        }
    }

    /// Number of messages the signature was computed over
    pub fn count(&self) -> usize {
        self.count
    }
}
