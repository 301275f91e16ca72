#![forbid(unsafe_code)]

//! Page-level wiring of sections, registry, readiness barrier and snap
//! coordinator around one [`ScrollDriver`].
//!
//! # Event flow
//!
//! | Host event | Call | Effect |
//! |------------|------|--------|
//! | section mounted | [`mount`](Choreographer::mount) | lay out, register pinned range, report readiness |
//! | all sections mounted | [`finalize`](Choreographer::finalize) | open the barrier, build the snap rule |
//! | section unmounted | [`unmount`](Choreographer::unmount) | unregister, withdraw readiness |
//! | resize | [`relayout`](Choreographer::relayout) | re-register every range, rebuild from scratch |
//! | scroll frame | [`on_scroll`](Choreographer::on_scroll) | frames for sections whose progress moved |
//! | scroll settled | [`on_scroll_settle`](Choreographer::on_scroll_settle) | snap decision, driver animation |
//! | page unmounted | [`teardown`](Choreographer::teardown) | release everything, return the driver |
//!
//! The snap rule is never built before the barrier opens. After that, any
//! registry change is picked up by the coordinator's staleness check.

use tracing::{info, warn};

use crate::coordinator::{CoordinatorState, SnapCoordinator};
use crate::driver::ScrollDriver;
use crate::readiness::ReadinessBarrier;
use crate::registry::{RegistryHandle, TriggerId};
use crate::section::{Section, SectionFrame};
use crate::snap::{SnapDecision, SnapPolicy};
use crate::trigger::ElementGeometry;

#[derive(Debug)]
pub struct Choreographer<D: ScrollDriver> {
    driver: D,
    registry: RegistryHandle,
    barrier: ReadinessBarrier,
    coordinator: SnapCoordinator,
    sections: Vec<Section>,
}

impl<D: ScrollDriver> Choreographer<D> {
    /// A page with its own, fresh registry.
    #[must_use]
    pub fn new(driver: D, policy: SnapPolicy, barrier: ReadinessBarrier) -> Self {
        Self::with_registry(driver, RegistryHandle::new(), policy, barrier)
    }

    /// A page sharing an existing registry.
    #[must_use]
    pub fn with_registry(
        driver: D,
        registry: RegistryHandle,
        policy: SnapPolicy,
        barrier: ReadinessBarrier,
    ) -> Self {
        let coordinator = SnapCoordinator::new(registry.clone(), policy);
        let mut page = Self {
            driver,
            registry,
            barrier,
            coordinator,
            sections: Vec::new(),
        };
        page.sync_coordinator();
        page
    }

    /// Lay out and attach a section. A section with the same id is replaced,
    /// and its pinned range goes with it if the replacement does not pin.
    pub fn mount(&mut self, mut section: Section, geometry: ElementGeometry) {
        let range = section.layout(geometry, self.driver.viewport());
        let id = section.id().clone();
        let pinned = section.is_pinned();

        let was_pinned = match self.sections.iter_mut().find(|s| s.id() == &id) {
            Some(existing) => std::mem::replace(existing, section).is_pinned(),
            None => {
                self.sections.push(section);
                false
            }
        };

        if was_pinned && !pinned {
            self.registry.unregister(id.as_str());
            self.barrier.withdraw(id.as_str());
        }
        if pinned {
            self.registry.register_range(id.clone(), range);
            if self.barrier.report(id) {
                info!(sections = self.barrier.reported(), "all pinned sections registered");
            }
        }
        self.sync_coordinator();
    }

    /// Detach a section, unregistering its range. Unknown ids are ignored.
    pub fn unmount(&mut self, id: &str) -> Option<Section> {
        let Some(index) = self.sections.iter().position(|s| s.id().as_str() == id) else {
            warn!(section = id, "unmount of unknown section ignored");
            return None;
        };
        let section = self.sections.remove(index);
        self.registry.unregister(id);
        self.barrier.withdraw(id);
        self.sync_coordinator();
        Some(section)
    }

    /// Declare that every section has been mounted.
    pub fn finalize(&mut self) {
        if self.barrier.finalize() {
            info!(sections = self.sections.len(), "page finalized");
        }
        self.sync_coordinator();
    }

    /// Re-measure after a viewport change. Sections without a new geometry
    /// keep their previous one. The coordinator is torn down and rebuilt.
    pub fn relayout<'a, I>(&mut self, geometries: I)
    where
        I: IntoIterator<Item = (&'a str, ElementGeometry)>,
    {
        let viewport = self.driver.viewport();
        for (id, geometry) in geometries {
            let Some(section) = self.sections.iter_mut().find(|s| s.id().as_str() == id) else {
                warn!(section = id, "relayout of unknown section ignored");
                continue;
            };
            let range = section.layout(geometry, viewport);
            if section.is_pinned() {
                self.registry.register_range(section.id().clone(), range);
            }
        }

        self.coordinator.teardown(&mut self.driver);
        self.sync_coordinator();
    }

    /// Per-frame update: one frame for each section whose progress moved.
    pub fn on_scroll(&mut self) -> Vec<SectionFrame> {
        let offset = self.driver.scroll_offset();
        self.sections
            .iter_mut()
            .filter_map(|section| section.update(offset))
            .collect()
    }

    /// Scroll came to rest: snap if the position lies in a pinned section.
    pub fn on_scroll_settle(&mut self) -> SnapDecision {
        if self.barrier.is_open() {
            return self.coordinator.on_scroll_settle(&mut self.driver);
        }
        let offset = self.driver.scroll_offset();
        match self.driver.total_scrollable_extent() {
            Some(extent) if extent.is_finite() && extent > 0.0 => SnapDecision::Free {
                position: offset / extent,
            },
            _ => SnapDecision::Unmeasured { offset_px: offset },
        }
    }

    /// Unmount the page: release the coordinator and every pinned range.
    pub fn teardown(mut self) -> D {
        self.coordinator.teardown(&mut self.driver);
        for section in self.sections.drain(..) {
            self.registry.unregister(section.id().as_str());
        }
        info!("page torn down");
        self.driver
    }

    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[must_use]
    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    #[must_use]
    pub fn coordinator(&self) -> &SnapCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn barrier(&self) -> &ReadinessBarrier {
        &self.barrier
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id().as_str() == id)
    }

    /// Ids of mounted sections, in mount order.
    pub fn section_ids(&self) -> impl Iterator<Item = &TriggerId> {
        self.sections.iter().map(Section::id)
    }

    fn sync_coordinator(&mut self) {
        if !self.barrier.is_open() {
            return;
        }
        if self.coordinator.state() == CoordinatorState::Idle {
            self.coordinator.build(&mut self.driver);
        } else {
            self.coordinator.refresh(&mut self.driver);
        }
    }
}
