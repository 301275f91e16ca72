#![forbid(unsafe_code)]

//! Snap coordinator: owns the installed snap rule and its settle subscription.
//!
//! The coordinator reads the shared [`RegistryHandle`] but never mutates it.
//! Each build takes a fresh snapshot and replaces the previous rule
//! wholesale; there is no incremental patching.
//!
//! # Lifecycle
//!
//! ```text
//!   Idle ──build──▶ Active (rule installed, settle subscription held)
//!     ▲        └──▶ Inert  (empty registry or unknown/zero extent)
//!     └──teardown── Active | Inert
//! ```
//!
//! A build always tears down first, so a rebuild after a registry change or
//! a resize never leaves a second subscription behind.
//!
//! # Staleness
//!
//! The coordinator remembers the registry generation and the scroll extent
//! it was built for. [`is_stale`](SnapCoordinator::is_stale) compares them
//! against the current values; [`refresh`](SnapCoordinator::refresh)
//! rebuilds when they differ.

use tracing::{debug, info};

use crate::driver::{ScrollAnimation, ScrollDriver, SettleSubscription};
use crate::registry::RegistryHandle;
use crate::snap::{SnapDecision, SnapPolicy, SnapRule};

/// What the coordinator is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Never built, or torn down.
    Idle,
    /// Built, but there is nothing to snap to.
    Inert,
    /// A snap rule is installed.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BuildKey {
    generation: u64,
    extent: Option<f64>,
}

/// Installs and maintains the page-wide snap rule.
#[derive(Debug)]
pub struct SnapCoordinator {
    registry: RegistryHandle,
    policy: SnapPolicy,
    rule: Option<SnapRule>,
    built_for: Option<BuildKey>,
    subscription: Option<SettleSubscription>,
}

impl SnapCoordinator {
    #[must_use]
    pub fn new(registry: RegistryHandle, policy: SnapPolicy) -> Self {
        Self {
            registry,
            policy,
            rule: None,
            built_for: None,
            subscription: None,
        }
    }

    /// Tear down any previous rule, then build a new one from a fresh
    /// registry snapshot and the driver's current extent.
    pub fn build<D: ScrollDriver + ?Sized>(&mut self, driver: &mut D) -> CoordinatorState {
        self.teardown(driver);

        let extent = driver.total_scrollable_extent();
        let snapshot = self.registry.snapshot();
        self.built_for = Some(BuildKey {
            generation: self.registry.generation(),
            extent,
        });
        self.rule = SnapRule::build(&snapshot, extent, self.policy);

        if let Some(rule) = &self.rule {
            self.subscription = Some(driver.subscribe_settle());
            info!(ranges = rule.ranges().len(), ?extent, "snap rule installed");
        } else {
            info!(ranges = snapshot.len(), ?extent, "snap coordinator inert");
        }
        self.state()
    }

    /// Release the settle subscription and discard the cached rule.
    pub fn teardown<D: ScrollDriver + ?Sized>(&mut self, driver: &mut D) {
        if let Some(subscription) = self.subscription.take() {
            driver.unsubscribe_settle(subscription);
        }
        self.rule = None;
        if self.built_for.take().is_some() {
            debug!("snap rule torn down");
        }
    }

    /// Whether the registry or the extent changed since the last build.
    /// An unbuilt coordinator is never stale.
    #[must_use]
    pub fn is_stale<D: ScrollDriver + ?Sized>(&self, driver: &D) -> bool {
        self.built_for.is_some_and(|key| {
            key.generation != self.registry.generation()
                || key.extent != driver.total_scrollable_extent()
        })
    }

    /// Rebuild if stale. Returns `true` if a rebuild happened.
    pub fn refresh<D: ScrollDriver + ?Sized>(&mut self, driver: &mut D) -> bool {
        if self.is_stale(driver) {
            self.build(driver);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        match (&self.built_for, &self.rule) {
            (None, _) => CoordinatorState::Idle,
            (Some(_), None) => CoordinatorState::Inert,
            (Some(_), Some(_)) => CoordinatorState::Active,
        }
    }

    /// Target fraction for candidate `v`; `v` unchanged unless active.
    #[must_use]
    pub fn snap(&self, v: f64) -> f64 {
        self.rule.as_ref().map_or(v, |rule| rule.snap(v))
    }

    #[must_use]
    pub fn decide(&self, v: f64) -> SnapDecision {
        match &self.rule {
            Some(rule) => rule.decide(v),
            None => SnapDecision::Free { position: v },
        }
    }

    /// Handle a scroll-settle event: decide on the driver's current offset
    /// and, if redirected, ask the driver to animate there. Without a usable
    /// extent the decision is [`SnapDecision::Unmeasured`].
    pub fn on_scroll_settle<D: ScrollDriver + ?Sized>(&mut self, driver: &mut D) -> SnapDecision {
        self.refresh(driver);

        let offset = driver.scroll_offset();
        let Some(extent) = driver
            .total_scrollable_extent()
            .filter(|e| e.is_finite() && *e > 0.0)
        else {
            return SnapDecision::Unmeasured { offset_px: offset };
        };

        let decision = self.decide(offset / extent);
        if let SnapDecision::Snap {
            target,
            range,
            duration,
            ease,
            ..
        } = &decision
        {
            debug!(%range, from = offset / extent, to = *target, ?duration, "snapping to pinned section");
            driver.animate_to(ScrollAnimation {
                from_px: offset,
                to_px: target * extent,
                delay: self.policy.delay,
                duration: *duration,
                ease: *ease,
            });
        }
        decision
    }

    #[must_use]
    pub fn rule(&self) -> Option<&SnapRule> {
        self.rule.as_ref()
    }

    #[must_use]
    pub fn policy(&self) -> &SnapPolicy {
        &self.policy
    }

    #[must_use]
    pub fn subscription(&self) -> Option<SettleSubscription> {
        self.subscription
    }
}
