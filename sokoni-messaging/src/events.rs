//! UI Event Surface
//!
//! The engine reports state changes to the UI over an unbounded channel.
//! Events carry the minimum the view layer needs to react; current state
//! is read back through the engine's accessors.

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Error,
    Success,
    Info,
}

/// How the transcript should move after a snapshot replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCommand {
    /// Leave the reader's position untouched
    None,
    /// Jump to the newest message instantly
    JumpToBottom,
    /// Animate to the newest message
    SmoothToBottom,
}

/// Engine-to-UI notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The thread list slice was replaced (or display names resolved)
    ThreadListUpdated,

    /// The thread list is fetching with a visible indicator
    ThreadListLoading(bool),

    /// A conversation was selected and is loading
    ConversationLoading { counterpart_id: String },

    /// The displayed conversation snapshot was replaced
    ConversationReplaced {
        counterpart_id: String,
        scroll: ScrollCommand,
    },

    /// A listing preview finished resolving (success or unavailable)
    ListingPreviewResolved { listing_id: String },

    /// Dismissible banner, used for background fetch failures
    Banner {
        kind: NotificationType,
        text: String,
    },

    /// A send failed; the composer was restored to `restored_draft`
    SendFailed {
        text: String,
        restored_draft: String,
    },

    /// A message was accepted by the store
    MessageSent { counterpart_id: String },
}
