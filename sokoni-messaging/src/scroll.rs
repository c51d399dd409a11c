//! Scroll Anchor Control
//!
//! Tracks whether the reader is pinned to the bottom of the transcript
//! and decides, for each snapshot replacement, whether to auto-scroll.
//! The anchor is an explicit per-conversation state object: a pinned flag
//! mutated only by scroll observations, and a force flag set on thread
//! switch or send and consumed by exactly one decision.

use crate::events::ScrollCommand;

/// Geometry of the transcript container at the moment of a scroll event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Total scrollable content height, in px
    pub scroll_height: f32,
    /// Current scroll offset from the top, in px
    pub scroll_top: f32,
    /// Visible viewport height, in px
    pub client_height: f32,
}

impl ScrollMetrics {
    /// Distance between the viewport bottom edge and the content bottom
    pub fn distance_from_bottom(&self) -> f32 {
        (self.scroll_height - self.scroll_top - self.client_height).max(0.0)
    }
}

/// Per-conversation scroll anchor state
#[derive(Debug, Clone)]
pub struct ScrollAnchor {
    pinned: bool,
    force_next: bool,
    threshold_px: f32,
}

impl ScrollAnchor {
    /// A fresh anchor starts pinned with a forced first scroll, so a
    /// newly opened conversation lands on its newest message.
    pub fn new(threshold_px: f32) -> Self {
        Self {
            pinned: true,
            force_next: true,
            threshold_px,
        }
    }

    /// Recompute pinned-ness from a scroll event in the transcript
    pub fn observe_scroll(&mut self, metrics: ScrollMetrics) {
        self.pinned = metrics.distance_from_bottom() <= self.threshold_px;
    }

    /// Whether the reader is at (or near) the newest message
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Force the next snapshot decision to scroll, used on send
    pub fn request_force_scroll(&mut self) {
        self.force_next = true;
    }

    /// Decide the scroll reaction to a snapshot replacement
    ///
    /// Consumes the force flag. Any scroll-to-bottom re-asserts pinned.
    pub fn on_snapshot_replaced(&mut self) -> ScrollCommand {
        if self.force_next {
            self.force_next = false;
            self.pinned = true;
            ScrollCommand::SmoothToBottom
        } else if self.pinned {
            ScrollCommand::JumpToBottom
        } else {
            ScrollCommand::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 120.0;

    fn metrics(scroll_top: f32) -> ScrollMetrics {
        ScrollMetrics {
            scroll_height: 1000.0,
            scroll_top,
            client_height: 400.0,
        }
    }

    #[test]
    fn test_pinned_within_threshold() {
        let mut anchor = ScrollAnchor::new(THRESHOLD);
        // distance from bottom = 1000 - 520 - 400 = 80 <= 120
        anchor.observe_scroll(metrics(520.0));
        assert!(anchor.is_pinned());
    }

    #[test]
    fn test_unpinned_beyond_threshold() {
        let mut anchor = ScrollAnchor::new(THRESHOLD);
        // distance from bottom = 1000 - 300 - 400 = 300 > 120
        anchor.observe_scroll(metrics(300.0));
        assert!(!anchor.is_pinned());
    }

    #[test]
    fn test_fresh_anchor_forces_smooth_scroll_once() {
        let mut anchor = ScrollAnchor::new(THRESHOLD);
        assert_eq!(anchor.on_snapshot_replaced(), ScrollCommand::SmoothToBottom);
        // Force flag consumed; still pinned, so subsequent updates jump.
        assert_eq!(anchor.on_snapshot_replaced(), ScrollCommand::JumpToBottom);
    }

    #[test]
    fn test_unpinned_reader_keeps_position() {
        let mut anchor = ScrollAnchor::new(THRESHOLD);
        let _ = anchor.on_snapshot_replaced();
        anchor.observe_scroll(metrics(100.0));
        assert_eq!(anchor.on_snapshot_replaced(), ScrollCommand::None);
    }

    #[test]
    fn test_force_scroll_overrides_unpinned_and_repins() {
        let mut anchor = ScrollAnchor::new(THRESHOLD);
        let _ = anchor.on_snapshot_replaced();
        anchor.observe_scroll(metrics(100.0));
        anchor.request_force_scroll();
        assert_eq!(anchor.on_snapshot_replaced(), ScrollCommand::SmoothToBottom);
        assert!(anchor.is_pinned());
        assert_eq!(anchor.on_snapshot_replaced(), ScrollCommand::JumpToBottom);
    }

    #[test]
    fn test_distance_from_bottom_clamps_at_zero() {
        let m = ScrollMetrics {
            scroll_height: 300.0,
            scroll_top: 0.0,
            client_height: 400.0,
        };
        assert_eq!(m.distance_from_bottom(), 0.0);
    }
}
