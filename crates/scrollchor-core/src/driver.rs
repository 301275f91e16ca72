#![forbid(unsafe_code)]

//! Host scroll facility.
//!
//! The engine never scrolls or measures the page itself. A [`ScrollDriver`]
//! reports the current scroll offset, the total scrollable extent and the
//! viewport, hands out scroll-settle subscriptions, and performs the smooth
//! scroll animation the snap coordinator asks for.
//!
//! [`SimulatedDriver`] is a deterministic, host-driven implementation: the
//! caller sets offsets and sizes explicitly, animations complete instantly
//! and are recorded for inspection. It backs the test suites and the
//! diagnostics CLI.

use std::time::Duration;

use tracing::trace;

use crate::easing::Ease;
use crate::value::Viewport;

/// Handle for one scroll-settle subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettleSubscription(u64);

impl SettleSubscription {
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// A smooth scroll the host is asked to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from_px: f64,
    pub to_px: f64,
    /// Wait before starting.
    pub delay: Duration,
    pub duration: Duration,
    pub ease: Ease,
}

/// Contract the engine requires from the host scroll/animation facility.
pub trait ScrollDriver {
    /// Current scroll offset in pixels.
    fn scroll_offset(&self) -> f64;

    /// Maximum scroll offset in pixels; `None` before layout has settled.
    fn total_scrollable_extent(&self) -> Option<f64>;

    fn viewport(&self) -> Viewport;

    /// Start delivering scroll-settle notifications.
    fn subscribe_settle(&mut self) -> SettleSubscription;

    /// Stop delivering notifications. Returns `false` for unknown handles.
    fn unsubscribe_settle(&mut self, subscription: SettleSubscription) -> bool;

    /// Smoothly scroll to `animation.to_px`.
    fn animate_to(&mut self, animation: ScrollAnimation);
}

/// Deterministic driver controlled by the caller.
#[derive(Debug, Clone)]
pub struct SimulatedDriver {
    viewport: Viewport,
    offset: f64,
    extent: Option<f64>,
    next_subscription: u64,
    subscriptions: Vec<SettleSubscription>,
    animations: Vec<ScrollAnimation>,
}

impl SimulatedDriver {
    /// A driver at offset 0 with an unknown extent.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            offset: 0.0,
            extent: None,
            next_subscription: 0,
            subscriptions: Vec::new(),
            animations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn set_extent(&mut self, extent: Option<f64>) {
        self.extent = extent;
        self.offset = self.clamp(self.offset);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Jump to `px`, clamped to `[0, extent]`. Returns the applied offset.
    pub fn scroll_to(&mut self, px: f64) -> f64 {
        self.offset = self.clamp(px);
        self.offset
    }

    /// Jump to a fraction of the extent. No-op while the extent is unknown.
    pub fn scroll_to_fraction(&mut self, fraction: f64) -> f64 {
        if let Some(extent) = self.extent {
            self.scroll_to(fraction * extent);
        }
        self.offset
    }

    /// Subscriptions that have not been released.
    #[must_use]
    pub fn active_subscriptions(&self) -> &[SettleSubscription] {
        &self.subscriptions
    }

    /// Every animation requested so far, oldest first.
    #[must_use]
    pub fn animations(&self) -> &[ScrollAnimation] {
        &self.animations
    }

    #[must_use]
    pub fn last_animation(&self) -> Option<&ScrollAnimation> {
        self.animations.last()
    }

    pub fn take_animations(&mut self) -> Vec<ScrollAnimation> {
        std::mem::take(&mut self.animations)
    }

    fn clamp(&self, px: f64) -> f64 {
        let px = if px.is_finite() { px.max(0.0) } else { 0.0 };
        match self.extent {
            Some(extent) if extent.is_finite() => px.min(extent.max(0.0)),
            _ => px,
        }
    }
}

impl ScrollDriver for SimulatedDriver {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn total_scrollable_extent(&self) -> Option<f64> {
        self.extent
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn subscribe_settle(&mut self) -> SettleSubscription {
        let subscription = SettleSubscription(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(subscription);
        subscription
    }

    fn unsubscribe_settle(&mut self, subscription: SettleSubscription) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| *s != subscription);
        self.subscriptions.len() != before
    }

    fn animate_to(&mut self, animation: ScrollAnimation) {
        trace!(from = animation.from_px, to = animation.to_px, "simulated scroll animation");
        self.offset = self.clamp(animation.to_px);
        self.animations.push(animation);
    }
}
