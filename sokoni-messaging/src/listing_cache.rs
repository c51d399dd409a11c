//! Listing Preview Cache
//!
//! Messages may reference a marketplace listing; the transcript renders a
//! small preview card for it. Previews are resolved lazily: the first
//! probe for an id inserts a `Pending` sentinel and spawns the fetch, so
//! a render loop probing every frame never issues a duplicate concurrent
//! fetch. A failed or missing lookup is cached as `Unavailable` and not
//! retried on every render.
//!
//! Entries live for the messaging session; there is no TTL or
//! invalidation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use sokoni_messaging_core::ListingPreview;

use crate::events::UiEvent;
use crate::store::MarketApi;

/// Cache entry for one listing id
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewState {
    /// Fetch in flight
    Pending,
    /// Resolved preview
    Ready(ListingPreview),
    /// Fetch failed or listing missing; negative-cached
    Unavailable,
}

/// Session-scoped preview cache over the remote listing lookup
pub struct ListingPreviewCache {
    api: Arc<dyn MarketApi>,
    entries: Arc<Mutex<HashMap<String, PreviewState>>>,
    events: UnboundedSender<UiEvent>,
}

impl ListingPreviewCache {
    pub fn new(api: Arc<dyn MarketApi>, events: UnboundedSender<UiEvent>) -> Self {
        Self {
            api,
            entries: Arc::new(Mutex::new(HashMap::new())),
            events,
        }
    }

    /// Resolve a listing id, synchronously
    ///
    /// Returns the cached state when present; otherwise records the id as
    /// `Pending`, spawns the fetch, and returns `Pending`. The cache
    /// emits [`UiEvent::ListingPreviewResolved`] when the fetch settles.
    pub fn resolve(&self, listing_id: &str) -> PreviewState {
        if listing_id.is_empty() {
            return PreviewState::Unavailable;
        }

        {
            let mut entries = self.entries.lock().expect("listing cache poisoned");
            if let Some(state) = entries.get(listing_id) {
                return state.clone();
            }
            entries.insert(listing_id.to_string(), PreviewState::Pending);
        }

        let api = self.api.clone();
        let entries = self.entries.clone();
        let events = self.events.clone();
        let id = listing_id.to_string();
        tokio::spawn(async move {
            let state = match api.listing(&id).await {
                Ok(listing) => {
                    debug!("resolved listing preview for {}", id);
                    PreviewState::Ready(ListingPreview::from_listing(&listing))
                }
                Err(e) => {
                    warn!("listing {} unavailable: {}", id, e);
                    PreviewState::Unavailable
                }
            };
            entries
                .lock()
                .expect("listing cache poisoned")
                .insert(id.clone(), state);
            let _ = events.send(UiEvent::ListingPreviewResolved { listing_id: id });
        });

        PreviewState::Pending
    }

    /// Look up the current state without triggering a fetch
    pub fn peek(&self, listing_id: &str) -> Option<PreviewState> {
        self.entries
            .lock()
            .expect("listing cache poisoned")
            .get(listing_id)
            .cloned()
    }
}
