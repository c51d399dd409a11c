//! Conversation Synchronization
//!
//! Owns the active conversation: the full message history with one
//! counterpart, refreshed on a fine polling interval while selected.
//! Each refresh fetches the history, marks the conversation read as a
//! side effect (failure logged, never blocking display), and replaces
//! the displayed snapshot only when its content signature differs from
//! what is already shown. Unchanged polls are no-ops, so the transcript
//! is not re-rendered and the reader's scroll position survives.
//!
//! Selection changes bump a generation counter; an in-flight refresh
//! that resolves after the switch sees a stale generation and drops its
//! result instead of applying it to the wrong conversation.
//!
//! State machine: unselected -> (select) -> loading -> (fetch settles)
//! -> displaying; poll ticks keep it displaying, replacing content only
//! on signature change; selecting another thread discards all
//! per-conversation state, scroll anchor included.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use sokoni_messaging_core::{ConversationSignature, Message};

use crate::events::{NotificationType, UiEvent};
use crate::scroll::{ScrollAnchor, ScrollMetrics};
use crate::store::MarketApi;

/// Lifecycle of the conversation pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// No thread selected
    Unselected,
    /// Selected, first fetch not yet applied
    Loading,
    /// Snapshot on screen
    Displaying,
}

struct ActiveConversation {
    counterpart_id: String,
    generation: u64,
    messages: Vec<Message>,
    signature: ConversationSignature,
    scroll: ScrollAnchor,
    loading: bool,
}

/// Poll-driven owner of the active conversation snapshot
pub struct ConversationSynchronizer {
    api: Arc<dyn MarketApi>,
    active: RwLock<Option<ActiveConversation>>,
    generation: AtomicU64,
    events: UnboundedSender<UiEvent>,
    pin_threshold_px: f32,
}

impl ConversationSynchronizer {
    pub fn new(
        api: Arc<dyn MarketApi>,
        events: UnboundedSender<UiEvent>,
        pin_threshold_px: f32,
    ) -> Self {
        Self {
            api,
            active: RwLock::new(None),
            generation: AtomicU64::new(0),
            events,
            pin_threshold_px,
        }
    }

    /// Select a conversation, discarding all prior per-conversation state
    ///
    /// Emits [`UiEvent::ConversationLoading`] and performs the initial
    /// fetch with a visible loading indicator. The caller restarts the
    /// fine poll timer for the new counterpart.
    pub async fn select(&self, counterpart_id: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut active = self.active.write().await;
            *active = Some(ActiveConversation {
                counterpart_id: counterpart_id.to_string(),
                generation,
                messages: Vec::new(),
                signature: ConversationSignature::default(),
                scroll: ScrollAnchor::new(self.pin_threshold_px),
                loading: true,
            });
        }
        let _ = self.events.send(UiEvent::ConversationLoading {
            counterpart_id: counterpart_id.to_string(),
        });
        self.refresh(true).await;
    }

    /// Close the conversation pane
    pub async fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.active.write().await = None;
    }

    /// Poll the active conversation once
    ///
    /// No-op when nothing is selected. Fetches the history, marks it
    /// read, and applies the snapshot if it is still current and its
    /// signature changed (or this is the first load).
    pub async fn refresh(&self, show_loading: bool) {
        let (counterpart_id, generation) = {
            let active = self.active.read().await;
            match active.as_ref() {
                Some(conv) => (conv.counterpart_id.clone(), conv.generation),
                None => return,
            }
        };

        let fetched = match self.api.conversation(&counterpart_id).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!("conversation fetch for {} failed: {}", counterpart_id, e);
                let _ = self.events.send(UiEvent::Banner {
                    kind: NotificationType::Error,
                    text: e.user_message(),
                });
                return;
            }
        };

        // Read-marking is a side effect of every refresh; its failure
        // must not gate display of the fetched messages.
        if let Err(e) = self.api.mark_read(&counterpart_id).await {
            warn!("failed to mark conversation {} read: {}", counterpart_id, e);
        }

        let mut active = self.active.write().await;
        let Some(conv) = active.as_mut() else {
            debug!("conversation closed while refresh was in flight");
            return;
        };
        if conv.generation != generation {
            debug!(
                "dropping stale conversation response for {} (generation {})",
                counterpart_id, generation
            );
            return;
        }

        let signature = ConversationSignature::of(&fetched);
        let first_load = conv.loading;
        if !first_load && signature == conv.signature {
            debug!("conversation {} unchanged, keeping snapshot", counterpart_id);
            return;
        }

        debug!(
            "replacing conversation snapshot for {} ({} messages, show_loading={})",
            counterpart_id,
            fetched.len(),
            show_loading
        );
        conv.messages = fetched;
        conv.signature = signature;
        conv.loading = false;
        let scroll = conv.scroll.on_snapshot_replaced();
        let _ = self.events.send(UiEvent::ConversationReplaced {
            counterpart_id,
            scroll,
        });
    }

    /// Current pane state
    pub async fn state(&self) -> ConversationState {
        match self.active.read().await.as_ref() {
            None => ConversationState::Unselected,
            Some(conv) if conv.loading => ConversationState::Loading,
            Some(_) => ConversationState::Displaying,
        }
    }

    /// Counterpart id of the selected conversation, if any
    pub async fn selected_counterpart(&self) -> Option<String> {
        self.active
            .read()
            .await
            .as_ref()
            .map(|conv| conv.counterpart_id.clone())
    }

    /// Copy of the displayed snapshot
    pub async fn messages(&self) -> Vec<Message> {
        self.active
            .read()
            .await
            .as_ref()
            .map(|conv| conv.messages.clone())
            .unwrap_or_default()
    }

    /// Feed a transcript scroll event into the anchor
    pub async fn observe_scroll(&self, metrics: ScrollMetrics) {
        if let Some(conv) = self.active.write().await.as_mut() {
            conv.scroll.observe_scroll(metrics);
        }
    }

    /// Whether the reader is pinned to the newest message
    pub async fn is_pinned(&self) -> bool {
        self.active
            .read()
            .await
            .as_ref()
            .map(|conv| conv.scroll.is_pinned())
            .unwrap_or(true)
    }

    /// Force the next snapshot decision to scroll to the bottom
    pub async fn request_force_scroll(&self) {
        if let Some(conv) = self.active.write().await.as_mut() {
            conv.scroll.request_force_scroll();
        }
    }
}
