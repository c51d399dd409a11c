//! Remote Message Store Boundary
//!
//! The engine consumes the marketplace backend through this trait at the
//! semantic level; transport, URLs and authentication are an external
//! collaborator's concern. All operations are fallible and independently
//! retriable request/response calls.
//!
//! Contract notes:
//! - `list_threads` returns threads most-recent-first; the engine does
//!   not re-sort.
//! - `conversation` returns the full history oldest-first, no pagination.
//! - `send_message` must not partially apply on failure.
//! - `mark_read` is idempotent and safe to retry.
//! - `profile` and `listing` are used only for labeling and preview
//!   rendering, never for authorization.

use async_trait::async_trait;

use sokoni_messaging_core::{Listing, Message, Profile, Thread};

use crate::error::Result;

/// Remote operations of the marketplace message store
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// Ordered thread list for the current user, most recent first
    async fn list_threads(&self) -> Result<Vec<Thread>>;

    /// Full message history with one counterpart, oldest first
    async fn conversation(&self, counterpart_id: &str) -> Result<Vec<Message>>;

    /// Send a message, optionally referencing a listing
    async fn send_message(
        &self,
        counterpart_id: &str,
        body: &str,
        listing_id: Option<&str>,
    ) -> Result<Message>;

    /// Mark the conversation with `counterpart_id` as read
    async fn mark_read(&self, counterpart_id: &str) -> Result<()>;

    /// Resolve a user id to a display-name-bearing record
    async fn profile(&self, user_id: &str) -> Result<Profile>;

    /// Resolve a listing id to its metadata
    async fn listing(&self, listing_id: &str) -> Result<Listing>;
}
