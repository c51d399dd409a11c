//! Sokoni Messaging Engine
//!
//! Keeps the marketplace two-pane inbox (thread list plus the active
//! conversation) in sync against the remote message store using periodic
//! polling. The engine owns two independent timers: a coarse one for the
//! thread list and a fine one for the selected conversation. Conversation
//! snapshots are replaced only when a content signature differs, so an
//! unchanged poll never disturbs the transcript or the reader's scroll
//! position.
//!
//! The remote store is consumed through the [`MarketApi`] trait; nothing
//! in this crate speaks a wire protocol of its own. UI integration is a
//! stream of [`UiEvent`]s plus state accessors on [`MessagingEngine`].

pub mod config;
pub mod conversation;
pub mod engine;
pub mod events;
pub mod listing_cache;
pub mod outbound;
pub mod poller;
pub mod scroll;
pub mod store;
pub mod test_utils;
pub mod threads;

mod error;

pub use config::MessagingConfig;
pub use conversation::{ConversationState, ConversationSynchronizer};
pub use engine::MessagingEngine;
pub use error::{MessagingError, Result};
pub use events::{NotificationType, ScrollCommand, UiEvent};
pub use listing_cache::{ListingPreviewCache, PreviewState};
pub use outbound::{Composer, OutboundPipeline, SendOutcome};
pub use poller::Poller;
pub use scroll::{ScrollAnchor, ScrollMetrics};
pub use store::MarketApi;
pub use threads::ThreadListSynchronizer;

// Re-export the data model for consumers of the engine.
pub use sokoni_messaging_core as core_model;
