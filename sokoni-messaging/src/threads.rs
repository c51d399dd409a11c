//! Thread List Synchronization
//!
//! Polls the inbox thread list on a coarse interval, independent of
//! whether a conversation is open. Thread lists are cheap and small, so
//! the local slice is replaced unconditionally on every successful fetch
//! with no change detection. After each replacement the distinct set of
//! counterpart ids is resolved to display names through the profile
//! lookup; results land in an append-only name cache keyed by canonical
//! id, and an individual failure falls back to a placeholder derived
//! from the id without failing the batch.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use sokoni_messaging_core::{counterpart_of, placeholder_name, Thread};

use crate::events::{NotificationType, UiEvent};
use crate::store::MarketApi;

/// Poll-driven owner of the thread list and the display-name cache
pub struct ThreadListSynchronizer {
    api: Arc<dyn MarketApi>,
    current_user_id: String,
    threads: RwLock<Vec<Thread>>,
    name_cache: RwLock<HashMap<String, String>>,
    events: UnboundedSender<UiEvent>,
}

impl ThreadListSynchronizer {
    pub fn new(
        api: Arc<dyn MarketApi>,
        current_user_id: impl Into<String>,
        events: UnboundedSender<UiEvent>,
    ) -> Self {
        Self {
            api,
            current_user_id: current_user_id.into(),
            threads: RwLock::new(Vec::new()),
            name_cache: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Fetch the thread list and resolve any unknown display names
    ///
    /// `show_loading` drives the visible indicator for user-initiated
    /// loads; background ticks pass `false`. A fetch failure raises a
    /// dismissible banner and leaves the previous slice in place; the
    /// poll cadence is unaffected.
    pub async fn refresh(&self, show_loading: bool) {
        if show_loading {
            let _ = self.events.send(UiEvent::ThreadListLoading(true));
        }

        let fetched = self.api.list_threads().await;
        if show_loading {
            let _ = self.events.send(UiEvent::ThreadListLoading(false));
        }

        let fetched = match fetched {
            Ok(threads) => threads,
            Err(e) => {
                warn!("thread list fetch failed: {}", e);
                let _ = self.events.send(UiEvent::Banner {
                    kind: NotificationType::Error,
                    text: e.user_message(),
                });
                return;
            }
        };

        debug!("replacing thread list ({} threads)", fetched.len());
        let counterparts: Vec<String> = {
            let mut seen = Vec::new();
            for thread in &fetched {
                let id = counterpart_of(thread, &self.current_user_id);
                if !id.is_empty() && !seen.contains(&id) {
                    seen.push(id);
                }
            }
            seen
        };

        *self.threads.write().await = fetched;
        let _ = self.events.send(UiEvent::ThreadListUpdated);

        self.resolve_names(counterparts).await;
    }

    /// Resolve display names for ids not yet in the cache
    async fn resolve_names(&self, counterpart_ids: Vec<String>) {
        let unknown: Vec<String> = {
            let cache = self.name_cache.read().await;
            counterpart_ids
                .into_iter()
                .filter(|id| !cache.contains_key(id))
                .collect()
        };
        if unknown.is_empty() {
            return;
        }

        let mut resolved = HashMap::new();
        for id in unknown {
            match self.api.profile(&id).await {
                Ok(profile) => {
                    resolved.insert(id, profile.display_name());
                }
                Err(e) => {
                    warn!("profile lookup for {} failed: {}", id, e);
                    resolved.insert(id.clone(), placeholder_name(&id));
                }
            }
        }

        debug!("resolved {} display names", resolved.len());
        self.name_cache.write().await.extend(resolved);
        let _ = self.events.send(UiEvent::ThreadListUpdated);
    }

    /// Copy of the current thread list, store order preserved
    pub async fn threads(&self) -> Vec<Thread> {
        self.threads.read().await.clone()
    }

    /// Display name for a counterpart id, placeholder when unresolved
    pub async fn display_name(&self, counterpart_id: &str) -> String {
        self.name_cache
            .read()
            .await
            .get(counterpart_id)
            .cloned()
            .unwrap_or_else(|| placeholder_name(counterpart_id))
    }

    /// Counterpart id for a thread, relative to the current user
    pub fn counterpart(&self, thread: &Thread) -> String {
        counterpart_of(thread, &self.current_user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryMarketApi;
    use tokio::sync::mpsc;

    fn synchronizer(
        api: MemoryMarketApi,
    ) -> (ThreadListSynchronizer, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ThreadListSynchronizer::new(Arc::new(api), "u1", tx), rx)
    }

    #[tokio::test]
    async fn test_refresh_replaces_list_and_resolves_names() {
        let api = MemoryMarketApi::new("u1");
        api.put_thread("t1", "u1", "u2", "bei gani?").await;
        api.put_profile("u2", "Wanjiku").await;
        let (sync, mut rx) = synchronizer(api);

        sync.refresh(false).await;

        assert_eq!(sync.threads().await.len(), 1);
        assert_eq!(sync.display_name("u2").await, "Wanjiku");
        // Two updates: the list replacement, then the name batch.
        assert_eq!(rx.recv().await.unwrap(), UiEvent::ThreadListUpdated);
        assert_eq!(rx.recv().await.unwrap(), UiEvent::ThreadListUpdated);
    }

    #[tokio::test]
    async fn test_profile_failure_falls_back_to_placeholder() {
        let api = MemoryMarketApi::new("u1");
        api.put_thread("t1", "u1", "u2abcd", "bei gani?").await;
        api.fail_profile(true).await;
        let (sync, _rx) = synchronizer(api);

        sync.refresh(false).await;
        assert_eq!(sync.display_name("u2abcd").await, "Trader abcd");
    }

    #[tokio::test]
    async fn test_name_cache_is_append_only() {
        let api = MemoryMarketApi::new("u1");
        api.put_thread("t1", "u1", "u2", "bei gani?").await;
        api.put_profile("u2", "Wanjiku").await;
        let handle = api.handle();
        let (sync, _rx) = synchronizer(api);

        sync.refresh(false).await;
        sync.refresh(false).await;
        sync.refresh(false).await;

        // Cached names are not re-fetched on later polls.
        assert_eq!(handle.profile_calls().await, 1);
        assert_eq!(sync.display_name("u2").await, "Wanjiku");
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_slice() {
        let api = MemoryMarketApi::new("u1");
        api.put_thread("t1", "u1", "u2", "bei gani?").await;
        let handle = api.handle();
        let (sync, mut rx) = synchronizer(api);

        sync.refresh(false).await;
        assert_eq!(sync.threads().await.len(), 1);

        handle.fail_list_threads(true).await;
        sync.refresh(false).await;

        let saw_banner = loop {
            match rx.recv().await.unwrap() {
                UiEvent::Banner { kind, .. } => break kind == NotificationType::Error,
                _ => continue,
            }
        };
        assert!(saw_banner);
        assert_eq!(sync.threads().await.len(), 1);
    }

    #[tokio::test]
    async fn test_loading_indicator_only_when_requested() {
        let api = MemoryMarketApi::new("u1");
        let (sync, mut rx) = synchronizer(api);

        sync.refresh(true).await;
        assert_eq!(rx.recv().await.unwrap(), UiEvent::ThreadListLoading(true));
        assert_eq!(rx.recv().await.unwrap(), UiEvent::ThreadListLoading(false));
    }

    #[tokio::test]
    async fn test_duplicate_counterparts_resolved_once() {
        let api = MemoryMarketApi::new("u1");
        api.put_thread("t1", "u1", "u2", "bei gani?").await;
        api.put_thread("t2", "u2", "u1", "iko wapi?").await;
        api.put_profile("u2", "Wanjiku").await;
        let handle = api.handle();
        let (sync, _rx) = synchronizer(api);

        sync.refresh(false).await;
        assert_eq!(handle.profile_calls().await, 1);
    }
}
