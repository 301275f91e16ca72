//! Integration tests: snapping and timelines driven through a whole page.

use scrollchor_core::presets::showcase_page;
use scrollchor_core::*;

const VIEWPORT: Viewport = Viewport::new(1280.0, 800.0);

fn rule_for(ranges: &[(&str, f64, f64)], extent: f64) -> SnapRule {
    let registry = RegistryHandle::new();
    for &(id, start, end) in ranges {
        registry.register(id, start, end);
    }
    SnapRule::build(&registry.snapshot(), Some(extent), SnapPolicy::default())
        .expect("rule with ranges and extent")
}

fn showcase() -> Choreographer<SimulatedDriver> {
    let page = showcase_page().build().expect("showcase is valid");
    let layout = page.layout(VIEWPORT);
    let driver = SimulatedDriver::new(VIEWPORT).with_extent(layout.total_scrollable_extent());
    page.mount(driver)
}

// ---------------------------------------------------------------------------
// Snap properties
// ---------------------------------------------------------------------------

#[test]
fn no_op_outside_pinned_regions() {
    let rule = rule_for(&[("a", 100.0, 200.0), ("b", 600.0, 700.0)], 1000.0);
    for v in [0.0, 0.05, 0.25, 0.35, 0.5, 0.55, 0.75, 0.9, 1.0] {
        assert_eq!(rule.snap(v), v, "v = {v}");
    }
}

#[test]
fn snap_to_center_with_margin() {
    let rule = rule_for(&[("about", 300.0, 550.0)], 1000.0);
    assert_eq!(rule.snap(0.40), 0.425);
    assert_eq!(rule.snap(0.28), 0.425);
    assert_eq!(rule.snap(0.20), 0.20);
}

#[test]
fn tie_break_prefers_earlier_range() {
    let rule = rule_for(&[("b", 400.0, 600.0), ("a", 200.0, 400.0)], 1000.0);
    assert_eq!(rule.snap(0.40), 0.30);
}

#[test]
fn empty_registry_is_inert() {
    let registry = RegistryHandle::new();
    let mut driver = SimulatedDriver::new(VIEWPORT).with_extent(1000.0);
    let mut coordinator = SnapCoordinator::new(registry, SnapPolicy::default());
    assert_eq!(coordinator.build(&mut driver), CoordinatorState::Inert);
    for v in [0.0, 0.25, 0.5, 0.75, 1.0] {
        assert_eq!(coordinator.snap(v), v);
    }
}

#[test]
fn degenerate_range_equals_zero_width_range() {
    let inverted = rule_for(&[("x", 400.0, 200.0)], 1000.0);
    let flat = rule_for(&[("x", 400.0, 400.0)], 1000.0);
    assert_eq!(inverted.ranges(), flat.ranges());
    for i in 0..=100 {
        let v = f64::from(i) / 100.0;
        assert_eq!(inverted.snap(v), flat.snap(v), "v = {v}");
    }
}

// ---------------------------------------------------------------------------
// Timeline properties
// ---------------------------------------------------------------------------

#[test]
fn timeline_entrance_settle_exit() {
    let timeline = PhaseTimeline::new()
        .from_to(
            "card",
            0.0,
            &[(Property::Opacity, Value::number(0.0), Value::number(1.0))],
            Ease::Linear,
        )
        .from_to(
            "card",
            0.7,
            &[(Property::Opacity, Value::number(1.0), Value::number(0.0))],
            Ease::POWER2_IN,
        );
    let opacity = |t: f64| timeline.evaluate(t).get("card", Property::Opacity);
    assert_eq!(opacity(0.0), Some(Value::number(0.0)));
    assert_eq!(opacity(0.5), Some(Value::number(1.0)));
    assert_eq!(opacity(1.0), Some(Value::number(0.0)));
}

// ---------------------------------------------------------------------------
// Whole page
// ---------------------------------------------------------------------------

#[test]
fn showcase_registers_every_pinned_section() {
    let page = showcase();
    assert_eq!(page.coordinator().state(), CoordinatorState::Active);
    let ids: Vec<String> = page
        .registry()
        .snapshot()
        .into_iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(ids, ["hero", "brand", "group", "corporate", "about"]);
}

#[test]
fn settling_inside_a_section_centers_it() {
    let mut page = showcase();
    let about = page.registry().get("about").expect("about is pinned");

    page.driver_mut().scroll_to(about.start() + 10.0);
    let decision = page.on_scroll_settle();
    match decision {
        SnapDecision::Snap { range, .. } => assert_eq!(range.as_str(), "about"),
        other => panic!("expected snap, got {other:?}"),
    }
    assert!((page.driver().scroll_offset() - about.center()).abs() < 1e-6);

    // Settling again at the center is a no-move snap.
    let again = page.on_scroll_settle();
    let extent = page.driver().total_scrollable_extent().expect("extent known");
    let target = again.target().expect("measured settle");
    assert!((target * extent - about.center()).abs() < 1e-6);
}

#[test]
fn settling_in_flowing_content_stays_put() {
    let mut page = showcase();
    let extent = page.driver().total_scrollable_extent().expect("extent known");
    page.driver_mut().scroll_to(extent);
    let decision = page.on_scroll_settle();
    assert!(!decision.is_snap());
    assert_eq!(page.driver().scroll_offset(), extent);
}

#[test]
fn scrolling_through_a_section_walks_its_phases() {
    let mut page = showcase();
    page.on_scroll();
    let about = page.registry().get("about").expect("about is pinned");

    let mut phases = Vec::new();
    for step in 0..=10 {
        let px = about.start() + about.len() * f64::from(step) / 10.0;
        page.driver_mut().scroll_to(px);
        for frame in page.on_scroll() {
            if frame.section.as_str() == "about" {
                phases.push(frame.phase);
            }
        }
    }
    assert_eq!(phases.first(), Some(&Phase::Entrance));
    assert!(phases.contains(&Phase::Settle));
    assert_eq!(phases.last(), Some(&Phase::Exit));
}

#[test]
fn resize_rebuilds_against_new_geometry() {
    let mut page = showcase();
    let before = page.registry().get("about").expect("about is pinned");

    let viewport = Viewport::new(800.0, 600.0);
    let layout = showcase_page()
        .build()
        .expect("showcase is valid")
        .layout(viewport);
    page.driver_mut().set_viewport(viewport);
    page.driver_mut().set_extent(Some(layout.total_scrollable_extent()));
    let ids: Vec<String> = page.section_ids().map(ToString::to_string).collect();
    page.relayout(
        ids.iter()
            .map(String::as_str)
            .zip(layout.placements().iter().map(|p| p.geometry)),
    );

    let after = page.registry().get("about").expect("still pinned");
    assert!(after.start() < before.start());
    assert_eq!(page.coordinator().state(), CoordinatorState::Active);
    assert_eq!(page.driver().active_subscriptions().len(), 1);
}

#[test]
fn pages_do_not_share_registries() {
    let a = showcase();
    let b = showcase();
    assert!(!a.registry().same_registry(b.registry()));
    let driver = a.teardown();
    assert!(driver.active_subscriptions().is_empty());
    assert_eq!(b.registry().len(), 5);
}
