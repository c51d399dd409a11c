//! Outbound Message Pipeline
//!
//! Sending is an optimistic command with a compensating action: the
//! composer is cleared before the request is issued, and restored
//! verbatim if the request fails. On success the caller triggers an
//! immediate conversation refresh so the sent message appears without
//! waiting for the next poll tick.
//!
//! A send with a blank body or no selected counterpart is silently
//! ignored; the composer is expected to be disabled without a selection,
//! so no error is surfaced.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::events::UiEvent;
use crate::store::MarketApi;

/// Draft text being edited for the active conversation
#[derive(Debug, Clone, Default)]
pub struct Composer {
    draft: String,
}

impl Composer {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Clear the composer, returning the prior draft verbatim
    pub fn clear(&mut self) -> String {
        std::mem::take(&mut self.draft)
    }

    /// Compensating action for a failed send
    pub fn restore(&mut self, draft: String) {
        self.draft = draft;
    }
}

/// Result of a send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Message accepted by the store
    Sent,
    /// Blank body or no counterpart; nothing was done
    Ignored,
    /// Body exceeds the configured length cap; composer untouched
    TooLong,
    /// Store rejected the send; composer restored
    Failed,
}

/// Optimistic send command over the remote store
pub struct OutboundPipeline {
    api: Arc<dyn MarketApi>,
    events: UnboundedSender<UiEvent>,
    max_body_len: usize,
}

impl OutboundPipeline {
    pub fn new(
        api: Arc<dyn MarketApi>,
        events: UnboundedSender<UiEvent>,
        max_body_len: usize,
    ) -> Self {
        Self {
            api,
            events,
            max_body_len,
        }
    }

    /// Send the composer's draft to `counterpart_id`
    ///
    /// The composer is cleared before the request goes out and restored
    /// verbatim on failure. The caller is responsible for setting the
    /// force-scroll flag before calling and for refreshing the
    /// conversation on [`SendOutcome::Sent`].
    pub async fn send(
        &self,
        counterpart_id: &str,
        composer: &mut Composer,
        listing_id: Option<&str>,
    ) -> SendOutcome {
        let body = composer.draft().trim().to_string();
        if body.is_empty() || counterpart_id.is_empty() {
            debug!("ignoring send with empty body or no selected counterpart");
            return SendOutcome::Ignored;
        }
        if body.chars().count() > self.max_body_len {
            let _ = self.events.send(UiEvent::SendFailed {
                text: format!("Message is too long (limit {} characters).", self.max_body_len),
                restored_draft: composer.draft().to_string(),
            });
            return SendOutcome::TooLong;
        }

        let original = composer.clear();
        match self
            .api
            .send_message(counterpart_id, &body, listing_id)
            .await
        {
            Ok(message) => {
                debug!("sent message {} to {}", message.id, counterpart_id);
                let _ = self.events.send(UiEvent::MessageSent {
                    counterpart_id: counterpart_id.to_string(),
                });
                SendOutcome::Sent
            }
            Err(e) => {
                warn!("send to {} failed: {}", counterpart_id, e);
                composer.restore(original.clone());
                let _ = self.events.send(UiEvent::SendFailed {
                    text: e.user_message(),
                    restored_draft: original,
                });
                SendOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryMarketApi;
    use tokio::sync::mpsc;

    const MAX_BODY: usize = 2000;

    fn pipeline(api: MemoryMarketApi) -> (OutboundPipeline, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (OutboundPipeline::new(Arc::new(api), tx, MAX_BODY), rx)
    }

    #[tokio::test]
    async fn test_send_clears_composer_and_reports() {
        let api = MemoryMarketApi::new("u1");
        let handle = api.handle();
        let (pipeline, mut rx) = pipeline(api);
        let mut composer = Composer::default();
        composer.set_draft("  hi  ");

        let outcome = pipeline.send("u2", &mut composer, None).await;
        assert_eq!(outcome, SendOutcome::Sent);
        assert_eq!(composer.draft(), "");
        assert_eq!(
            rx.recv().await.unwrap(),
            UiEvent::MessageSent {
                counterpart_id: "u2".to_string()
            }
        );
        // Body is trimmed before sending.
        let messages = handle.messages_with("u2").await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "hi");
    }

    #[tokio::test]
    async fn test_failed_send_restores_composer_verbatim() {
        let api = MemoryMarketApi::new("u1");
        api.fail_send(true).await;
        let (pipeline, mut rx) = pipeline(api);
        let mut composer = Composer::default();
        composer.set_draft("hello");

        let outcome = pipeline.send("u2", &mut composer, None).await;
        assert_eq!(outcome, SendOutcome::Failed);
        assert_eq!(composer.draft(), "hello");
        match rx.recv().await.unwrap() {
            UiEvent::SendFailed { restored_draft, .. } => {
                assert_eq!(restored_draft, "hello");
            }
            other => panic!("expected SendFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_body_is_silently_ignored() {
        let api = MemoryMarketApi::new("u1");
        let handle = api.handle();
        let (pipeline, _rx) = pipeline(api);
        let mut composer = Composer::default();
        composer.set_draft("   \n ");

        let outcome = pipeline.send("u2", &mut composer, None).await;
        assert_eq!(outcome, SendOutcome::Ignored);
        assert_eq!(handle.send_calls().await, 0);
        // Whitespace draft is left alone.
        assert_eq!(composer.draft(), "   \n ");
    }

    #[tokio::test]
    async fn test_no_counterpart_is_silently_ignored() {
        let api = MemoryMarketApi::new("u1");
        let handle = api.handle();
        let (pipeline, _rx) = pipeline(api);
        let mut composer = Composer::default();
        composer.set_draft("hello");

        let outcome = pipeline.send("", &mut composer, None).await;
        assert_eq!(outcome, SendOutcome::Ignored);
        assert_eq!(handle.send_calls().await, 0);
        assert_eq!(composer.draft(), "hello");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_without_clearing() {
        let api = MemoryMarketApi::new("u1");
        let handle = api.handle();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pipeline = OutboundPipeline::new(Arc::new(api), tx, 5);
        let mut composer = Composer::default();
        composer.set_draft("this is too long");

        let outcome = pipeline.send("u2", &mut composer, None).await;
        assert_eq!(outcome, SendOutcome::TooLong);
        assert_eq!(composer.draft(), "this is too long");
        assert_eq!(handle.send_calls().await, 0);
        assert!(matches!(
            rx.recv().await.unwrap(),
            UiEvent::SendFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_send_with_listing_reference() {
        let api = MemoryMarketApi::new("u1");
        let handle = api.handle();
        let (pipeline, _rx) = pipeline(api);
        let mut composer = Composer::default();
        composer.set_draft("is this still available?");

        let outcome = pipeline.send("u2", &mut composer, Some("l7")).await;
        assert_eq!(outcome, SendOutcome::Sent);
        let messages = handle.messages_with("u2").await;
        assert_eq!(messages[0].listing_id(), Some("l7".to_string()));
    }
}
