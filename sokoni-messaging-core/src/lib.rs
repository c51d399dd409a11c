//! Sokoni Messaging Core
//!
//! Data model and pure primitives for the marketplace messaging engine:
//! wire records for threads, messages, profiles and listings; canonical
//! participant identity resolution; the delivery/read-state classifier;
//! and the conversation content signature used to gate snapshot
//! replacement.
//!
//! Everything in this crate is side-effect free so it can be unit tested
//! against crafted fixtures. Network access, polling and UI eventing live
//! in the `sokoni-messaging` crate.

pub mod identity;
pub mod model;
pub mod read_state;
pub mod signature;

mod error;

pub use error::{ModelError, Result};
pub use identity::{counterpart_of, RawRef, RefObject};
pub use model::{
    placeholder_name, Listing, ListingPreview, Message, Profile, Thread, FALLBACK_LOCATION,
    FALLBACK_PRICE, FALLBACK_TITLE,
};
pub use read_state::{classify, effective_state, DeliveryState, ReadIndicator};
pub use signature::ConversationSignature;
