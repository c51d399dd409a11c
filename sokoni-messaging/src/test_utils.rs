//! Test Support
//!
//! A scriptable in-memory implementation of [`MarketApi`] shared by the
//! unit tests and the integration suite. Cloning shares the underlying
//! state, so a test can keep a handle for scripting failures and
//! inspecting call counts while the engine owns another clone.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::Mutex;

use sokoni_messaging_core::{DeliveryState, Listing, Message, Profile, RawRef, Thread};

use crate::error::{MessagingError, Result};
use crate::store::MarketApi;

#[derive(Default)]
struct Inner {
    threads: Vec<Thread>,
    conversations: HashMap<String, Vec<Message>>,
    profiles: HashMap<String, Profile>,
    listings: HashMap<String, Listing>,

    fail_list_threads: bool,
    fail_conversation: bool,
    fail_send: bool,
    fail_mark_read: bool,
    fail_profile: bool,
    fail_listing: bool,

    list_threads_calls: usize,
    conversation_calls: usize,
    send_calls: usize,
    mark_read_calls: usize,
    profile_calls: usize,
    listing_calls: usize,

    next_message_seq: u64,
}

/// In-memory remote store double
#[derive(Clone)]
pub struct MemoryMarketApi {
    current_user_id: String,
    inner: Arc<Mutex<Inner>>,
}

impl MemoryMarketApi {
    pub fn new(current_user_id: impl Into<String>) -> Self {
        Self {
            current_user_id: current_user_id.into(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// A handle sharing this store's state
    pub fn handle(&self) -> Self {
        self.clone()
    }

    /// Add a thread summary to the list response
    pub async fn put_thread(&self, id: &str, from: &str, to: &str, last_message: &str) {
        let mut inner = self.inner.lock().await;
        inner.threads.push(Thread {
            id: id.to_string(),
            last_message: last_message.to_string(),
            last_message_at: Some(Utc::now()),
            from: Some(RawRef::id(from)),
            to: Some(RawRef::object(to)),
            counterpart: None,
            unread_count: 0,
        });
    }

    /// Register a profile for the name lookup
    pub async fn put_profile(&self, id: &str, name: &str) {
        let mut inner = self.inner.lock().await;
        inner.profiles.insert(
            id.to_string(),
            Profile {
                id: id.to_string(),
                name: Some(name.to_string()),
                username: None,
                phone_number: None,
            },
        );
    }

    /// Register a listing; empty title and missing price exercise the
    /// preview fallbacks
    pub async fn put_listing(&self, id: &str, title: &str, price: Option<f64>) {
        let mut inner = self.inner.lock().await;
        inner.listings.insert(
            id.to_string(),
            Listing {
                id: id.to_string(),
                title: if title.is_empty() {
                    None
                } else {
                    Some(title.to_string())
                },
                category: None,
                county: None,
                ward: None,
                price,
                images: Vec::new(),
            },
        );
    }

    /// Append an incoming (counterpart -> current user) message
    pub async fn push_incoming(&self, counterpart_id: &str, body: &str) {
        let current_user = self.current_user_id.clone();
        let mut inner = self.inner.lock().await;
        inner.next_message_seq += 1;
        let seq = inner.next_message_seq;
        let message = Message {
            id: format!("m{}", seq),
            from: RawRef::id(counterpart_id),
            to: RawRef::id(current_user),
            body: body.to_string(),
            created_at: Utc::now() + ChronoDuration::milliseconds(seq as i64),
            read: false,
            status: None,
            listing: None,
        };
        inner
            .conversations
            .entry(counterpart_id.to_string())
            .or_default()
            .push(message);
    }

    /// Messages currently stored for a counterpart
    pub async fn messages_with(&self, counterpart_id: &str) -> Vec<Message> {
        self.inner
            .lock()
            .await
            .conversations
            .get(counterpart_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn fail_list_threads(&self, fail: bool) {
        self.inner.lock().await.fail_list_threads = fail;
    }

    pub async fn fail_conversation(&self, fail: bool) {
        self.inner.lock().await.fail_conversation = fail;
    }

    pub async fn fail_send(&self, fail: bool) {
        self.inner.lock().await.fail_send = fail;
    }

    pub async fn fail_mark_read(&self, fail: bool) {
        self.inner.lock().await.fail_mark_read = fail;
    }

    pub async fn fail_profile(&self, fail: bool) {
        self.inner.lock().await.fail_profile = fail;
    }

    pub async fn fail_listing(&self, fail: bool) {
        self.inner.lock().await.fail_listing = fail;
    }

    pub async fn list_threads_calls(&self) -> usize {
        self.inner.lock().await.list_threads_calls
    }

    pub async fn conversation_calls(&self) -> usize {
        self.inner.lock().await.conversation_calls
    }

    pub async fn send_calls(&self) -> usize {
        self.inner.lock().await.send_calls
    }

    pub async fn mark_read_calls(&self) -> usize {
        self.inner.lock().await.mark_read_calls
    }

    pub async fn profile_calls(&self) -> usize {
        self.inner.lock().await.profile_calls
    }

    pub async fn listing_calls(&self) -> usize {
        self.inner.lock().await.listing_calls
    }
}

#[async_trait]
impl MarketApi for MemoryMarketApi {
    async fn list_threads(&self) -> Result<Vec<Thread>> {
        let mut inner = self.inner.lock().await;
        inner.list_threads_calls += 1;
        if inner.fail_list_threads {
            return Err(MessagingError::Api("thread list unavailable".to_string()));
        }
        Ok(inner.threads.clone())
    }

    async fn conversation(&self, counterpart_id: &str) -> Result<Vec<Message>> {
        let mut inner = self.inner.lock().await;
        inner.conversation_calls += 1;
        if inner.fail_conversation {
            return Err(MessagingError::Api("conversation unavailable".to_string()));
        }
        Ok(inner
            .conversations
            .get(counterpart_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(
        &self,
        counterpart_id: &str,
        body: &str,
        listing_id: Option<&str>,
    ) -> Result<Message> {
        let current_user = self.current_user_id.clone();
        let mut inner = self.inner.lock().await;
        inner.send_calls += 1;
        if inner.fail_send {
            return Err(MessagingError::Api("send rejected".to_string()));
        }
        inner.next_message_seq += 1;
        let seq = inner.next_message_seq;
        let message = Message {
            id: format!("m{}", seq),
            from: RawRef::id(current_user),
            to: RawRef::id(counterpart_id),
            body: body.to_string(),
            created_at: Utc::now() + ChronoDuration::milliseconds(seq as i64),
            read: false,
            status: Some(DeliveryState::Sent),
            listing: listing_id.map(RawRef::id),
        };
        inner
            .conversations
            .entry(counterpart_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn mark_read(&self, counterpart_id: &str) -> Result<()> {
        let current_user = self.current_user_id.clone();
        let mut inner = self.inner.lock().await;
        inner.mark_read_calls += 1;
        if inner.fail_mark_read {
            return Err(MessagingError::Api("mark read rejected".to_string()));
        }
        if let Some(messages) = inner.conversations.get_mut(counterpart_id) {
            for message in messages {
                if message.to.canonical_id() == current_user {
                    message.read = true;
                }
            }
        }
        Ok(())
    }

    async fn profile(&self, user_id: &str) -> Result<Profile> {
        let mut inner = self.inner.lock().await;
        inner.profile_calls += 1;
        if inner.fail_profile {
            return Err(MessagingError::Api("profile service down".to_string()));
        }
        inner
            .profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| MessagingError::Api(format!("profile {} not found", user_id)))
    }

    async fn listing(&self, listing_id: &str) -> Result<Listing> {
        let mut inner = self.inner.lock().await;
        inner.listing_calls += 1;
        if inner.fail_listing {
            return Err(MessagingError::Api("listing service down".to_string()));
        }
        inner
            .listings
            .get(listing_id)
            .cloned()
            .ok_or_else(|| MessagingError::Api(format!("listing {} not found", listing_id)))
    }
}
