#![forbid(unsafe_code)]

//! Core: scroll choreography for pinned, scroll-scrubbed page sections.
//!
//! # Role
//! A page is a vertical stack of sections. Some sections *pin*: they stay
//! fixed on screen while the user keeps scrolling, and their local scroll
//! progress drives entrance, settle, and exit animations. When scrolling
//! comes to rest inside a pinned section, the page snaps to that section's
//! center.
//!
//! # Primary responsibilities
//! - **PhaseTimeline**: maps local progress in `[0, 1]` to interpolated
//!   property values across entrance / settle / exit phases.
//! - **PinnedSectionRegistry**: start-sorted pixel ranges of pinned sections.
//! - **SnapCoordinator**: decides whether a resting scroll fraction should be
//!   redirected to a pinned section's center.
//! - **Choreographer**: wires sections, registry, readiness barrier, and
//!   coordinator to a host [`ScrollDriver`](driver::ScrollDriver).
//!
//! # How it fits
//! The host (browser glue, a test harness, or the `scrollchor-doctor` CLI)
//! owns layout measurement and the actual scroll animation. It pushes pixel
//! numbers in and receives property frames and snap targets back. Nothing in
//! this crate blocks, spawns, or touches I/O.

pub mod choreographer;
pub mod coordinator;
pub mod definition;
pub mod driver;
pub mod easing;
pub mod layout;
pub mod phase;
pub mod presets;
pub mod readiness;
pub mod registry;
pub mod section;
pub mod snap;
pub mod timeline;
pub mod trigger;
pub mod value;

pub use choreographer::Choreographer;
pub use coordinator::{CoordinatorState, SnapCoordinator};
pub use definition::{
    DefinitionError, Page, PageDefinition, SectionDefinition, SnapDefinition, TriggerDefinition,
    TweenDefinition,
};
pub use driver::{ScrollAnimation, ScrollDriver, SettleSubscription, SimulatedDriver};
pub use easing::Ease;
pub use layout::{Placement, StackLayout};
pub use phase::Phase;
pub use readiness::ReadinessBarrier;
pub use registry::{PinnedRange, PinnedSectionRegistry, RegisteredRange, RegistryHandle, TriggerId};
pub use section::{Section, SectionFrame};
pub use snap::{DurationRange, NormalizedRange, SnapDecision, SnapPolicy, SnapRule};
pub use timeline::{Frame, PhaseSpec, PhaseTimeline, Property};
pub use trigger::{Anchor, ElementGeometry, TriggerEnd, TriggerSpec};
pub use value::{Unit, Value, Viewport};
