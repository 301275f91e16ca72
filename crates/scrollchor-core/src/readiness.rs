#![forbid(unsafe_code)]

//! Readiness barrier gating the first snap-rule build.
//!
//! Sections register their pinned ranges asynchronously relative to the page
//! root. Building the snap rule before every section has registered would
//! silently exclude the late ones, so the coordinator waits on this barrier
//! instead of a timer.
//!
//! The barrier opens when either:
//! - the number of distinct sections that reported reaches the expected
//!   count given at construction, or
//! - the page root calls [`finalize`](ReadinessBarrier::finalize) after it
//!   has mounted every section.
//!
//! Once open, the barrier stays open. Later registrations (re-layout,
//! late mounts) are handled by the coordinator's staleness check.

use std::collections::BTreeSet;

use crate::registry::TriggerId;

/// Counted handshake between sections and the page root.
#[derive(Debug, Clone, Default)]
pub struct ReadinessBarrier {
    expected: Option<usize>,
    reported: BTreeSet<TriggerId>,
    opened: bool,
}

impl ReadinessBarrier {
    /// A barrier that opens after `expected` distinct reports.
    #[must_use]
    pub fn expecting(expected: usize) -> Self {
        Self {
            expected: Some(expected),
            reported: BTreeSet::new(),
            opened: expected == 0,
        }
    }

    /// A barrier that opens only on [`finalize`](Self::finalize).
    #[must_use]
    pub fn manual() -> Self {
        Self::default()
    }

    /// Record that a section registered. Duplicate reports count once.
    ///
    /// Returns `true` if this report opened the barrier.
    pub fn report(&mut self, id: impl Into<TriggerId>) -> bool {
        self.reported.insert(id.into());
        self.check_open()
    }

    /// Forget a section that unmounted before the barrier opened.
    pub fn withdraw(&mut self, id: &str) {
        self.reported.remove(id);
    }

    /// Open the barrier unconditionally.
    ///
    /// Returns `true` if this call opened it.
    pub fn finalize(&mut self) -> bool {
        let was_open = self.opened;
        self.opened = true;
        !was_open
    }

    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.opened
    }

    #[must_use]
    pub fn reported(&self) -> usize {
        self.reported.len()
    }

    #[must_use]
    pub fn expected(&self) -> Option<usize> {
        self.expected
    }

    fn check_open(&mut self) -> bool {
        if self.opened {
            return false;
        }
        match self.expected {
            Some(expected) if self.reported.len() >= expected => {
                self.opened = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_on_expected_count() {
        let mut barrier = ReadinessBarrier::expecting(2);
        assert!(!barrier.report("hero"));
        assert!(!barrier.is_open());
        assert!(barrier.report("about"));
        assert!(barrier.is_open());
        // Already open: further reports do not "open" it again.
        assert!(!barrier.report("contact"));
    }

    #[test]
    fn duplicate_reports_count_once() {
        let mut barrier = ReadinessBarrier::expecting(2);
        barrier.report("hero");
        barrier.report("hero");
        assert!(!barrier.is_open());
        assert_eq!(barrier.reported(), 1);
    }

    #[test]
    fn withdrawn_sections_do_not_count() {
        let mut barrier = ReadinessBarrier::expecting(2);
        barrier.report("hero");
        barrier.withdraw("hero");
        barrier.report("about");
        assert!(!barrier.is_open());
    }

    #[test]
    fn manual_barrier_waits_for_finalize() {
        let mut barrier = ReadinessBarrier::manual();
        for id in ["a", "b", "c", "d"] {
            assert!(!barrier.report(id));
        }
        assert!(!barrier.is_open());
        assert!(barrier.finalize());
        assert!(barrier.is_open());
        assert!(!barrier.finalize());
    }

    #[test]
    fn zero_expected_is_open_immediately() {
        let barrier = ReadinessBarrier::expecting(0);
        assert!(barrier.is_open());
    }

    #[test]
    fn finalize_short_circuits_count() {
        let mut barrier = ReadinessBarrier::expecting(5);
        barrier.report("hero");
        assert!(barrier.finalize());
        assert!(barrier.is_open());
    }
}
