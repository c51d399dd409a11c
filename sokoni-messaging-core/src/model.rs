//! Wire records for the messaging surface
//!
//! Threads, messages, profiles and listings as the remote store serves
//! them. Field names follow the store's conventions (`_id`, camelCase);
//! everything the store may omit is defaulted so a partially populated
//! record still decodes.
//!
//! Display helpers degrade to deterministic fallback strings; the UI
//! never sees an undefined label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::RawRef;
use crate::read_state::DeliveryState;
use crate::Result;

/// Fallback title for a listing with no title of its own
pub const FALLBACK_TITLE: &str = "Listing";

/// Fallback location label
pub const FALLBACK_LOCATION: &str = "Location not specified";

/// Fallback price label
pub const FALLBACK_PRICE: &str = "Contact for price";

/// Summary record of the most recent exchange with one counterpart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    #[serde(rename = "_id")]
    pub id: String,

    /// Body of the most recent message in the thread
    #[serde(rename = "lastMessage", default)]
    pub last_message: String,

    /// Timestamp of the most recent message
    #[serde(rename = "lastMessageAt", default)]
    pub last_message_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub from: Option<RawRef>,

    #[serde(default)]
    pub to: Option<RawRef>,

    /// Explicit counterpart reference, when the store provides one
    #[serde(default)]
    pub counterpart: Option<RawRef>,

    #[serde(rename = "unreadCount", default)]
    pub unread_count: u32,
}

impl Thread {
    /// Decode a thread from a raw JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// A single message within a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,

    pub from: RawRef,

    pub to: RawRef,

    #[serde(default)]
    pub body: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub read: bool,

    /// Tri-state delivery status; absent on older records
    #[serde(default)]
    pub status: Option<DeliveryState>,

    /// Listing referenced by this message, bare id or populated object
    #[serde(default)]
    pub listing: Option<RawRef>,
}

impl Message {
    /// Decode a message from a raw JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Whether this message was sent by `user_id`
    pub fn is_from(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.from.canonical_id() == user_id
    }

    /// Canonical id of the listing this message references, if any
    pub fn listing_id(&self) -> Option<String> {
        let id = self.listing.as_ref()?.canonical_id();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }
}

/// Display-name-bearing user record, used only for labeling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
}

impl Profile {
    /// Best available display name, falling back to a placeholder
    /// derived from the id
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.phone_number.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| placeholder_name(&self.id))
    }
}

/// Deterministic placeholder name for an unresolvable user id
///
/// # Examples
///
/// ```rust
/// use sokoni_messaging_core::placeholder_name;
///
/// assert_eq!(placeholder_name("64a71f09c2e4"), "Trader c2e4");
/// assert_eq!(placeholder_name(""), "Trader");
/// ```
pub fn placeholder_name(user_id: &str) -> String {
    let tail: String = user_id
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if tail.is_empty() {
        "Trader".to_string()
    } else {
        format!("Trader {}", tail)
    }
}

/// Listing metadata as served by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub county: Option<String>,

    #[serde(default)]
    pub ward: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub images: Vec<String>,
}

/// Small preview of a listing for rendering inside a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPreview {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    pub price_label: String,
    pub image: Option<String>,
}

impl ListingPreview {
    /// Build a preview, substituting fallback labels for absent fields
    pub fn from_listing(listing: &Listing) -> Self {
        let title =
            non_empty(listing.title.as_deref()).unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let category = non_empty(listing.category.as_deref()).unwrap_or_default();
        let location = match (
            non_empty(listing.ward.as_deref()),
            non_empty(listing.county.as_deref()),
        ) {
            (Some(ward), Some(county)) => format!("{}, {}", ward, county),
            (Some(place), None) | (None, Some(place)) => place,
            (None, None) => FALLBACK_LOCATION.to_string(),
        };
        let price_label = listing
            .price
            .filter(|p| *p > 0.0)
            .map(format_price)
            .unwrap_or_else(|| FALLBACK_PRICE.to_string());
        let image = listing.images.first().cloned();

        Self {
            id: listing.id.clone(),
            title,
            category,
            location,
            price_label,
            image,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Format a price with thousands grouping and the platform currency
fn format_price(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("KSh -{}", grouped)
    } else {
        format!("KSh {}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thread_decodes_with_missing_fields() {
        let thread = Thread::from_value(json!({"_id": "t1"})).unwrap();
        assert_eq!(thread.id, "t1");
        assert!(thread.from.is_none());
        assert_eq!(thread.unread_count, 0);
    }

    #[test]
    fn test_message_decodes_heterogeneous_refs() {
        let message = Message::from_value(json!({
            "_id": "m1",
            "from": "u1",
            "to": {"_id": "u2"},
            "body": "hello",
            "createdAt": "2026-03-01T08:30:00Z",
            "listing": {"_id": "l9", "title": "Grade cow"},
        }))
        .unwrap();
        assert!(message.is_from("u1"));
        assert!(!message.is_from("u2"));
        assert_eq!(message.listing_id(), Some("l9".to_string()));
        assert!(!message.read);
        assert!(message.status.is_none());
    }

    #[test]
    fn test_message_status_decodes_lowercase() {
        let message = Message::from_value(json!({
            "_id": "m1",
            "from": "u1",
            "to": "u2",
            "createdAt": "2026-03-01T08:30:00Z",
            "status": "delivered",
        }))
        .unwrap();
        assert_eq!(message.status, Some(DeliveryState::Delivered));
    }

    #[test]
    fn test_profile_display_name_fallbacks() {
        let profile: Profile =
            serde_json::from_value(json!({"_id": "abcd1234", "name": "Wanjiku"})).unwrap();
        assert_eq!(profile.display_name(), "Wanjiku");

        let profile: Profile =
            serde_json::from_value(json!({"_id": "abcd1234", "username": "  wanjiku_k "}))
                .unwrap();
        assert_eq!(profile.display_name(), "wanjiku_k");

        let profile: Profile = serde_json::from_value(json!({"_id": "abcd1234"})).unwrap();
        assert_eq!(profile.display_name(), "Trader 1234");
    }

    #[test]
    fn test_listing_preview_fallbacks() {
        let listing: Listing = serde_json::from_value(json!({"_id": "l1"})).unwrap();
        let preview = ListingPreview::from_listing(&listing);
        assert_eq!(preview.title, FALLBACK_TITLE);
        assert_eq!(preview.location, FALLBACK_LOCATION);
        assert_eq!(preview.price_label, FALLBACK_PRICE);
        assert!(preview.image.is_none());
    }

    #[test]
    fn test_listing_preview_populated() {
        let listing: Listing = serde_json::from_value(json!({
            "_id": "l1",
            "title": "5 acres farmland",
            "category": "Farmland",
            "county": "Nakuru",
            "ward": "Bahati",
            "price": 1250000.0,
            "images": ["a.jpg", "b.jpg"],
        }))
        .unwrap();
        let preview = ListingPreview::from_listing(&listing);
        assert_eq!(preview.title, "5 acres farmland");
        assert_eq!(preview.location, "Bahati, Nakuru");
        assert_eq!(preview.price_label, "KSh 1,250,000");
        assert_eq!(preview.image, Some("a.jpg".to_string()));
    }

    #[test]
    fn test_format_price_grouping() {
        assert_eq!(format_price(500.0), "KSh 500");
        assert_eq!(format_price(12500.0), "KSh 12,500");
        assert_eq!(format_price(1000000.0), "KSh 1,000,000");
    }
}
