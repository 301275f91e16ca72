#![forbid(unsafe_code)]

//! Ready-made tweens and a showcase page.
//!
//! Entrance presets are linear (`"none"`), the motion being carried by the
//! scrub lag; exit presets ease in so elements accelerate out of view.
//! All presets return [`TweenDefinition`]s, so they compose with hand-written
//! definitions and serialize like them.

use crate::definition::{PageDefinition, SectionDefinition, TriggerDefinition, TweenDefinition};
use crate::easing::Ease;
use crate::phase::EXIT_START;
use crate::timeline::Property;
use crate::value::Value;

const ZERO: Value = Value::number(0.0);
const ONE: Value = Value::number(1.0);

/// Slide in horizontally from `x` while fading in.
#[must_use]
pub fn slide_fade_in<I, S>(targets: I, at: f64, x: Value) -> TweenDefinition
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TweenDefinition::new(targets, at)
        .animate(Property::X, x, ZERO)
        .animate(Property::Opacity, ZERO, ONE)
}

/// Rise from `y` below while fading in.
#[must_use]
pub fn rise_in<I, S>(targets: I, at: f64, y: Value) -> TweenDefinition
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TweenDefinition::new(targets, at)
        .animate(Property::Y, y, ZERO)
        .animate(Property::Opacity, ZERO, ONE)
}

/// Slide out horizontally to `x` while fading out, starting at the exit phase.
#[must_use]
pub fn slide_fade_out<I, S>(targets: I, x: Value) -> TweenDefinition
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TweenDefinition::new(targets, EXIT_START)
        .animate(Property::X, ZERO, x)
        .animate(Property::Opacity, ONE, ZERO)
        .ease(Ease::POWER2_IN)
}

/// Drop by a tenth of the viewport while fading out.
#[must_use]
pub fn sink_out<I, S>(targets: I) -> TweenDefinition
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TweenDefinition::new(targets, EXIT_START)
        .animate(Property::Y, ZERO, Value::vh(10.0))
        .animate(Property::Opacity, ONE, ZERO)
        .ease(Ease::POWER2_IN)
}

/// Slow background zoom and pan through the exit phase.
#[must_use]
pub fn background_drift(target: &str, scale: f64, x: Value) -> TweenDefinition {
    TweenDefinition::new([target], EXIT_START)
        .animate(Property::Scale, ONE, Value::number(scale))
        .animate(Property::X, ZERO, x)
}

fn pinned(id: &str) -> SectionDefinition {
    SectionDefinition::new(id, TriggerDefinition::pinned("+=130%"))
}

/// Marketing page: a pinned hero that only exits, four pinned content
/// sections, then two free-flowing sections that never snap.
#[must_use]
pub fn showcase_page() -> PageDefinition {
    let hero = pinned("hero").tweens([
        slide_fade_out(["hero-line-0", "hero-line-1", "hero-line-2"], Value::vw(-55.0)),
        sink_out(["hero-cta"]),
        background_drift("hero-bg", 1.05, Value::vw(-6.0)),
    ]);

    let brand = pinned("brand").tweens([
        slide_fade_in(["brand-headline"], 0.0, Value::vw(60.0))
            .animate(Property::Scale, Value::number(0.96), ONE),
        rise_in(["brand-tagline"], 0.1, Value::px(20.0)),
        rise_in(["brand-pill"], 0.15, Value::px(20.0)),
        TweenDefinition::new(["brand-bg"], 0.0)
            .animate(Property::Scale, Value::number(1.08), ONE)
            .animate(Property::Opacity, Value::number(0.7), ONE),
        slide_fade_out(["brand-headline"], Value::vw(40.0)),
        sink_out(["brand-tagline", "brand-pill"]),
        background_drift("brand-bg", 1.05, Value::vw(-6.0)),
    ]);

    let group = pinned("group").tweens([
        slide_fade_in(["group-headline"], 0.0, Value::vw(60.0)),
        slide_fade_in(["group-subheadline"], 0.05, Value::vw(40.0)),
        rise_in(["group-chip-0", "group-chip-1", "group-chip-2"], 0.1, Value::px(24.0))
            .stagger(0.02),
        rise_in(["group-cta"], 0.15, Value::px(20.0)),
        TweenDefinition::new(["group-bg"], 0.0).animate(Property::Scale, Value::number(1.06), ONE),
        slide_fade_out(["group-headline", "group-subheadline"], Value::vw(35.0)),
        sink_out(["group-chip-0", "group-chip-1", "group-chip-2", "group-cta"]),
        background_drift("group-bg", 1.05, ZERO),
    ]);

    let corporate = pinned("corporate").tweens([
        slide_fade_in(["corporate-headline", "corporate-body"], 0.0, Value::vw(-60.0))
            .stagger(0.05),
        slide_fade_in(["corporate-card"], 0.05, Value::vw(60.0)),
        slide_fade_out(["corporate-headline", "corporate-body"], Value::vw(-35.0)),
        slide_fade_out(["corporate-card"], Value::vw(35.0)),
        background_drift("corporate-bg", 1.06, Value::vw(6.0)),
    ]);

    let about = pinned("about").tweens([
        slide_fade_in(["about-portrait"], 0.0, Value::vw(-60.0))
            .animate(Property::Scale, Value::number(0.98), ONE),
        slide_fade_in(["about-headline"], 0.05, Value::vw(60.0)),
        rise_in(["about-body"], 0.1, Value::px(18.0)),
        rise_in(["about-cta"], 0.15, Value::px(18.0)),
        slide_fade_out(["about-portrait"], Value::vw(-35.0)),
        slide_fade_out(["about-headline"], Value::vw(35.0)),
        sink_out(["about-body", "about-cta"]),
    ]);

    let approach = SectionDefinition::new(
        "approach",
        TriggerDefinition::flowing("top 80%", "top 50%"),
    )
    .height(Value::vh(150.0))
    .tweens([
        slide_fade_in(["approach-headline"], 0.0, Value::vw(-8.0)).ending_at(1.0),
        slide_fade_in(["approach-step-0", "approach-step-1", "approach-step-2"], 0.1, Value::vw(-8.0))
            .stagger(0.15)
            .ending_at(1.0),
    ]);

    let contact = SectionDefinition::new(
        "contact",
        TriggerDefinition::flowing("top 80%", "top 50%"),
    )
    .tweens([
        rise_in(["contact-headline"], 0.0, Value::px(24.0)).ending_at(1.0),
        rise_in(["contact-form"], 0.2, Value::px(24.0)).ending_at(1.0),
    ]);

    PageDefinition {
        sections: vec![hero, brand, group, corporate, about, approach, contact],
        snap: None,
    }
}
