//! Messaging Engine Facade
//!
//! Wires the thread list and conversation synchronizers, the listing
//! preview cache, the composer and the two poll timers into one object
//! the messaging screen drives. Lifecycle:
//!
//! - `start` does a loud initial thread list load and starts the coarse
//!   poller; it runs for the life of the screen.
//! - `select_conversation` discards prior per-conversation state, does a
//!   loud initial conversation load, and restarts the fine poller for
//!   the new counterpart.
//! - `close_conversation` cancels the fine poller and clears the pane.
//! - `shutdown` cancels both timers.
//!
//! The two pollers are independent; they share no mutable state beyond
//! the append-only display-name cache inside the thread synchronizer.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::info;

use sokoni_messaging_core::{Message, Thread};

use crate::config::MessagingConfig;
use crate::conversation::{ConversationState, ConversationSynchronizer};
use crate::events::UiEvent;
use crate::listing_cache::{ListingPreviewCache, PreviewState};
use crate::outbound::{Composer, OutboundPipeline, SendOutcome};
use crate::poller::Poller;
use crate::scroll::ScrollMetrics;
use crate::store::MarketApi;
use crate::threads::ThreadListSynchronizer;

/// The conversation synchronization engine for one messaging session
pub struct MessagingEngine {
    config: MessagingConfig,
    threads: Arc<ThreadListSynchronizer>,
    conversation: Arc<ConversationSynchronizer>,
    listings: ListingPreviewCache,
    outbound: OutboundPipeline,
    composer: Mutex<Composer>,
    thread_poller: Poller,
    conversation_poller: Poller,
    events_tx: UnboundedSender<UiEvent>,
    events_rx: Option<UnboundedReceiver<UiEvent>>,
}

impl MessagingEngine {
    pub fn new(
        api: Arc<dyn MarketApi>,
        current_user_id: impl Into<String>,
        config: MessagingConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let threads = Arc::new(ThreadListSynchronizer::new(
            api.clone(),
            current_user_id,
            events_tx.clone(),
        ));
        let conversation = Arc::new(ConversationSynchronizer::new(
            api.clone(),
            events_tx.clone(),
            config.pin_threshold_px,
        ));
        let listings = ListingPreviewCache::new(api.clone(), events_tx.clone());
        let outbound = OutboundPipeline::new(api, events_tx.clone(), config.max_body_len);

        Self {
            config,
            threads,
            conversation,
            listings,
            outbound,
            composer: Mutex::new(Composer::default()),
            thread_poller: Poller::new("thread-list"),
            conversation_poller: Poller::new("conversation"),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Take the UI event stream; callable once
    pub fn take_events(&mut self) -> Option<UnboundedReceiver<UiEvent>> {
        self.events_rx.take()
    }

    /// Load the inbox and start the coarse thread list poll
    pub async fn start(&mut self) {
        info!("starting messaging engine");
        self.threads.refresh(true).await;

        let threads = self.threads.clone();
        self.thread_poller
            .start(self.config.thread_poll_interval(), move || {
                let threads = threads.clone();
                async move {
                    threads.refresh(false).await;
                }
            });
    }

    /// Select a conversation and start (or restart) the fine poll for it
    pub async fn select_conversation(&mut self, counterpart_id: &str) {
        info!("selecting conversation with {}", counterpart_id);
        self.conversation.select(counterpart_id).await;

        let conversation = self.conversation.clone();
        self.conversation_poller
            .start(self.config.conversation_poll_interval(), move || {
                let conversation = conversation.clone();
                async move {
                    conversation.refresh(false).await;
                }
            });
    }

    /// Close the conversation pane and cancel its timer
    pub async fn close_conversation(&mut self) {
        self.conversation_poller.stop();
        self.conversation.clear().await;
    }

    /// Cancel both timers; the engine can be restarted afterwards
    pub async fn shutdown(&mut self) {
        info!("shutting down messaging engine");
        self.conversation_poller.stop();
        self.thread_poller.stop();
    }

    /// Send the composer's draft to the selected counterpart
    ///
    /// Sets the force-scroll flag up front; on success the conversation
    /// is refreshed immediately, bypassing the poll cadence.
    pub async fn send_draft(&self, listing_id: Option<&str>) -> SendOutcome {
        let counterpart = self
            .conversation
            .selected_counterpart()
            .await
            .unwrap_or_default();

        {
            let composer = self.composer.lock().await;
            if composer.draft().trim().is_empty() || counterpart.is_empty() {
                return SendOutcome::Ignored;
            }
        }

        self.conversation.request_force_scroll().await;
        let outcome = {
            let mut composer = self.composer.lock().await;
            self.outbound
                .send(&counterpart, &mut composer, listing_id)
                .await
        };
        if outcome == SendOutcome::Sent {
            self.conversation.refresh(false).await;
        }
        outcome
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.composer.lock().await.set_draft(text);
    }

    pub async fn draft(&self) -> String {
        self.composer.lock().await.draft().to_string()
    }

    /// Feed a transcript scroll event into the active scroll anchor
    pub async fn observe_scroll(&self, metrics: ScrollMetrics) {
        self.conversation.observe_scroll(metrics).await;
    }

    pub async fn thread_list(&self) -> Vec<Thread> {
        self.threads.threads().await
    }

    pub async fn display_name(&self, counterpart_id: &str) -> String {
        self.threads.display_name(counterpart_id).await
    }

    pub fn counterpart(&self, thread: &Thread) -> String {
        self.threads.counterpart(thread)
    }

    pub async fn conversation_state(&self) -> ConversationState {
        self.conversation.state().await
    }

    pub async fn conversation_messages(&self) -> Vec<Message> {
        self.conversation.messages().await
    }

    pub async fn is_pinned(&self) -> bool {
        self.conversation.is_pinned().await
    }

    /// Resolve a listing preview for a message card
    pub fn listing_preview(&self, listing_id: &str) -> PreviewState {
        self.listings.resolve(listing_id)
    }

    /// Sender half of the event channel, for components the UI builds
    pub fn events_sender(&self) -> UnboundedSender<UiEvent> {
        self.events_tx.clone()
    }
}
