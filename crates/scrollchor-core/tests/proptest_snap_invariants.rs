//! Property-based invariant tests for snapping and timeline evaluation.
//!
//! 1. Candidates outside every widened range are returned unchanged.
//! 2. Every range center is a fixed point of `snap`.
//! 3. A snapped target is always the center of a range containing `v`.
//! 4. `snap` is idempotent.
//! 5. Inverted ranges behave exactly like zero-width ranges at their start.
//! 6. Snap durations stay within the policy bounds.
//! 7. Timeline evaluation is total: any progress, including out-of-range,
//!    yields the same frame as its clamped value.

use proptest::prelude::*;
use scrollchor_core::snap::DEFAULT_SNAP_MARGIN;
use scrollchor_core::*;

// ── Strategies ────────────────────────────────────────────────────────────

const EXTENT: f64 = 10_000.0;

/// Up to six pixel ranges inside the extent, possibly inverted.
fn ranges() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0..EXTENT, 0.0..EXTENT), 1..6)
}

fn candidate() -> impl Strategy<Value = f64> {
    (0u32..=1000).prop_map(|v| f64::from(v) / 1000.0)
}

fn build(ranges: &[(f64, f64)]) -> SnapRule {
    let mut registry = PinnedSectionRegistry::new();
    for (i, &(start, end)) in ranges.iter().enumerate() {
        registry.register(format!("s{i}"), start, end);
    }
    SnapRule::build(&registry.snapshot(), Some(EXTENT), SnapPolicy::default())
        .expect("non-empty registry builds")
}

// ═══════════════════════════════════════════════════════════════════════════
// Snap rule
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_op_outside_ranges(ranges in ranges(), v in candidate()) {
        let rule = build(&ranges);
        let inside = rule
            .ranges()
            .iter()
            .any(|r| r.contains(v, DEFAULT_SNAP_MARGIN));
        if !inside {
            prop_assert_eq!(rule.snap(v), v);
        }
    }

    #[test]
    fn centers_are_fixed_points(ranges in ranges()) {
        let rule = build(&ranges);
        for r in rule.ranges() {
            prop_assert_eq!(rule.snap(r.center), r.center);
        }
    }

    #[test]
    fn target_is_center_of_containing_range(ranges in ranges(), v in candidate()) {
        let rule = build(&ranges);
        if let SnapDecision::Snap { target, range, .. } = rule.decide(v) {
            let chosen = rule
                .ranges()
                .iter()
                .find(|r| r.id == range)
                .expect("decision names a known range");
            prop_assert_eq!(chosen.center, target);
            prop_assert!(chosen.contains(v, DEFAULT_SNAP_MARGIN));
            for other in rule.ranges().iter().filter(|r| r.contains(v, DEFAULT_SNAP_MARGIN)) {
                prop_assert!((chosen.center - v).abs() <= (other.center - v).abs() + 1e-9);
            }
        }
    }

    #[test]
    fn snap_is_idempotent(ranges in ranges(), v in candidate()) {
        let rule = build(&ranges);
        let once = rule.snap(v);
        prop_assert_eq!(rule.snap(once), once);
    }

    #[test]
    fn inverted_range_is_zero_width(start in 0.0..EXTENT, back in 0.0..EXTENT, v in candidate()) {
        let inverted = build(&[(start, (start - back).max(0.0))]);
        let flat = build(&[(start, start)]);
        prop_assert_eq!(inverted.snap(v), flat.snap(v));
    }

    #[test]
    fn durations_within_bounds(ranges in ranges(), v in candidate()) {
        let rule = build(&ranges);
        if let SnapDecision::Snap { duration, .. } = rule.decide(v) {
            let bounds = rule.policy().duration;
            prop_assert!(duration >= bounds.min());
            prop_assert!(duration <= bounds.max());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Timeline
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn evaluation_clamps_progress(t in -10.0f64..10.0) {
        let timeline = PhaseTimeline::new()
            .from_to("card", 0.0, &[(Property::Opacity, Value::number(0.0), Value::number(1.0))], Ease::Linear)
            .from_to("card", 0.7, &[(Property::Opacity, Value::number(1.0), Value::number(0.0))], Ease::POWER2_IN);
        let clamped = t.clamp(0.0, 1.0);
        prop_assert_eq!(timeline.evaluate(t), timeline.evaluate(clamped));

        let opacity = timeline
            .evaluate(t)
            .get("card", Property::Opacity)
            .map(|v| v.amount)
            .unwrap_or(f64::NAN);
        prop_assert!((0.0..=1.0).contains(&opacity));
    }
}
