#![forbid(unsafe_code)]

//! Registry of pinned section ranges.
//!
//! Pinned sections register their scroll-pixel range when their pin behavior
//! activates and unregister on teardown. The snap coordinator reads a
//! start-sorted [`snapshot`](PinnedSectionRegistry::snapshot) whenever it
//! rebuilds.
//!
//! # Invariants
//!
//! 1. At most one entry per [`TriggerId`]; registering an existing id
//!    replaces its range and keeps its original registration order.
//! 2. Every stored range satisfies `end >= start`.
//! 3. Snapshots are sorted by `start`, ties broken by registration order.
//! 4. [`generation`](PinnedSectionRegistry::generation) changes on every
//!    mutation that alters the stored ranges, so readers can detect staleness
//!    without diffing.
//!
//! # Sharing
//!
//! The registry is an explicit object, not process-global state. Sections
//! and the coordinator of one page share it through a [`RegistryHandle`];
//! separate pages (or tests) own separate registries. All access happens on
//! the UI thread, so the handle is `Rc<RefCell<_>>` and borrows are never
//! held across calls.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::phase::clamp_unit;

/// Identifier of a section trigger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TriggerId(String);

impl TriggerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TriggerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TriggerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::borrow::Borrow<str> for TriggerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A scroll range in pixels with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedRange {
    start: f64,
    end: f64,
}

impl PinnedRange {
    /// Build a range. A non-finite start reads as 0; an end that is
    /// non-finite or before the start collapses to the start.
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        let start = if start.is_finite() { start } else { 0.0 };
        let end = if end.is_finite() && end >= start {
            end
        } else {
            start
        };
        Self { start, end }
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn center(&self) -> f64 {
        self.start + (self.end - self.start) / 2.0
    }

    #[must_use]
    pub fn contains(&self, px: f64) -> bool {
        self.start <= px && px <= self.end
    }

    /// Local progress of a scroll offset through this range, in `[0, 1]`.
    ///
    /// A zero-width range is a step: 0 before its start, 1 from it onward.
    #[must_use]
    pub fn progress(&self, px: f64) -> f64 {
        let len = self.len();
        if len > 0.0 {
            clamp_unit((px - self.start) / len)
        } else if px >= self.start {
            1.0
        } else {
            0.0
        }
    }
}

/// One snapshot entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredRange {
    pub id: TriggerId,
    pub range: PinnedRange,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TriggerId,
    range: PinnedRange,
    seq: u64,
}

/// Start-ordered collection of pinned ranges keyed by trigger id.
#[derive(Debug, Default)]
pub struct PinnedSectionRegistry {
    entries: Vec<Entry>,
    next_seq: u64,
    generation: u64,
}

impl PinnedSectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) a range in scroll pixels.
    ///
    /// Returns `true` if the id was not registered before.
    pub fn register(&mut self, id: impl Into<TriggerId>, start: f64, end: f64) -> bool {
        let id = id.into();
        if end < start {
            warn!(%id, start, end, "pinned range ends before it starts; collapsing");
        }
        self.register_range(id, PinnedRange::new(start, end))
    }

    /// Register (or re-register) an already-built range.
    pub fn register_range(&mut self, id: impl Into<TriggerId>, range: PinnedRange) -> bool {
        let id = id.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            if entry.range != range {
                debug!(%id, start = range.start, end = range.end, "pinned range updated");
                entry.range = range;
                self.generation += 1;
            }
            return false;
        }

        debug!(%id, start = range.start, end = range.end, "pinned range registered");
        self.entries.push(Entry {
            id,
            range,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.generation += 1;
        true
    }

    /// Remove a range. Returns `true` if it was registered.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id.as_str() != id);
        let removed = self.entries.len() != before;
        if removed {
            debug!(id, "pinned range unregistered");
            self.generation += 1;
        }
        removed
    }

    /// Ranges sorted ascending by start; ties keep registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RegisteredRange> {
        let mut ordered: Vec<&Entry> = self.entries.iter().collect();
        ordered.sort_by(|a, b| {
            a.range
                .start
                .total_cmp(&b.range.start)
                .then(a.seq.cmp(&b.seq))
        });
        ordered
            .into_iter()
            .map(|e| RegisteredRange {
                id: e.id.clone(),
                range: e.range,
            })
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<PinnedRange> {
        self.entries
            .iter()
            .find(|e| e.id.as_str() == id)
            .map(|e| e.range)
    }

    /// Counter bumped by every mutation that changes stored ranges.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared, single-threaded handle to one page's registry.
#[derive(Debug, Clone, Default)]
pub struct RegistryHandle(Rc<RefCell<PinnedSectionRegistry>>);

impl RegistryHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: impl Into<TriggerId>, start: f64, end: f64) -> bool {
        self.0.borrow_mut().register(id, start, end)
    }

    pub fn register_range(&self, id: impl Into<TriggerId>, range: PinnedRange) -> bool {
        self.0.borrow_mut().register_range(id, range)
    }

    pub fn unregister(&self, id: &str) -> bool {
        self.0.borrow_mut().unregister(id)
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<RegisteredRange> {
        self.0.borrow().snapshot()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<PinnedRange> {
        self.0.borrow().get(id)
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.0.borrow().generation()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Whether two handles point at the same registry.
    #[must_use]
    pub fn same_registry(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(snapshot: &[RegisteredRange]) -> Vec<&str> {
        snapshot.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn degenerate_range_collapses_to_start() {
        let range = PinnedRange::new(0.4, 0.2);
        assert_eq!(range, PinnedRange::new(0.4, 0.4));
        assert_eq!(range.center(), 0.4);
        assert_eq!(range.len(), 0.0);
    }

    #[test]
    fn non_finite_bounds_are_sanitized() {
        assert_eq!(PinnedRange::new(f64::NAN, 10.0), PinnedRange::new(0.0, 10.0));
        assert_eq!(PinnedRange::new(5.0, f64::INFINITY), PinnedRange::new(5.0, 5.0));
    }

    #[test]
    fn center_is_midpoint() {
        assert_eq!(PinnedRange::new(300.0, 550.0).center(), 425.0);
    }

    #[test]
    fn progress_through_range() {
        let range = PinnedRange::new(1000.0, 2000.0);
        assert_eq!(range.progress(500.0), 0.0);
        assert_eq!(range.progress(1250.0), 0.25);
        assert_eq!(range.progress(2600.0), 1.0);

        let step = PinnedRange::new(100.0, 100.0);
        assert_eq!(step.progress(99.0), 0.0);
        assert_eq!(step.progress(100.0), 1.0);
    }

    #[test]
    fn register_is_idempotent_per_id() {
        let mut registry = PinnedSectionRegistry::new();
        assert!(registry.register("hero", 0.0, 1000.0));
        assert!(!registry.register("hero", 0.0, 1200.0));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("hero"), Some(PinnedRange::new(0.0, 1200.0)));
    }

    #[test]
    fn snapshot_sorted_by_start() {
        let mut registry = PinnedSectionRegistry::new();
        registry.register("about", 5000.0, 6000.0);
        registry.register("hero", 0.0, 1000.0);
        registry.register("brand", 2000.0, 3000.0);
        assert_eq!(ids(&registry.snapshot()), vec!["hero", "brand", "about"]);
    }

    #[test]
    fn ties_keep_registration_order() {
        let mut registry = PinnedSectionRegistry::new();
        registry.register("first", 100.0, 200.0);
        registry.register("second", 100.0, 300.0);
        registry.register("third", 100.0, 150.0);
        assert_eq!(ids(&registry.snapshot()), vec!["first", "second", "third"]);

        // Re-layout keeps the original order.
        registry.register("first", 100.0, 250.0);
        assert_eq!(ids(&registry.snapshot()), vec!["first", "second", "third"]);
    }

    #[test]
    fn unregister_removes_entry() {
        let mut registry = PinnedSectionRegistry::new();
        registry.register("hero", 0.0, 1000.0);
        assert!(registry.unregister("hero"));
        assert!(!registry.unregister("hero"));
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn generation_tracks_changes_only() {
        let mut registry = PinnedSectionRegistry::new();
        let g0 = registry.generation();
        registry.register("hero", 0.0, 1000.0);
        let g1 = registry.generation();
        assert_ne!(g0, g1);

        registry.register("hero", 0.0, 1000.0);
        assert_eq!(registry.generation(), g1, "identical re-register is not a change");

        registry.register("hero", 0.0, 900.0);
        let g2 = registry.generation();
        assert_ne!(g1, g2);

        registry.unregister("missing");
        assert_eq!(registry.generation(), g2);
    }

    #[test]
    fn handles_share_one_registry() {
        let page = RegistryHandle::new();
        let section_view = page.clone();
        section_view.register("hero", 0.0, 1000.0);
        assert_eq!(page.len(), 1);
        assert!(page.same_registry(&section_view));
    }

    #[test]
    fn handle_reads_through_shared_cell() {
        let page = RegistryHandle::new();
        page.register("hero", 0.0, 1000.0);
        page.register("about", 2000.0, 2500.0);
        assert_eq!(page.snapshot().len(), 2);
        assert_eq!(page.get("about"), Some(PinnedRange::new(2000.0, 2500.0)));
        assert!(!page.is_empty());
        assert_eq!(page.generation(), 2);
    }

    #[test]
    fn trigger_id_borrows_as_str() {
        use std::collections::HashSet;
        let ids: HashSet<TriggerId> = [TriggerId::new("hero")].into_iter().collect();
        assert!(ids.contains("hero"));
    }

    #[test]
    fn separate_pages_do_not_interfere() {
        let a = RegistryHandle::new();
        let b = RegistryHandle::new();
        a.register("hero", 0.0, 1000.0);
        assert!(b.is_empty());
        assert!(!a.same_registry(&b));
    }
}
