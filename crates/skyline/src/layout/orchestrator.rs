//! Hierarchy walk that drives the three placers.
//!
//! Domains are placed on a grid, each domain's teams are packed inside the
//! domain's box, and each team's services are stacked above the team's box.
//! Parents without children are skipped at that level.

use log::{debug, info, trace, warn};

use skyline_core::{
    geometry::{Position3D, Size3D},
    item::LayoutItem,
    positions::LayoutPositions,
};

use crate::{
    config::LayoutConfig,
    layout::{pack_treemap, place_grid, stack_services, verify::find_overlaps},
    store::{EntityStore, StoreError},
};

/// Computes the full layout from an [`EntityStore`].
///
/// The orchestrator holds only placement constants. Its output depends solely
/// on those constants and on what the store returns, so an unchanged store
/// always yields the same layout.
#[derive(Debug, Clone)]
pub struct LayoutOrchestrator {
    domain_spacing: f32,
    service_spacing: f32,
    domain_footprint: Size3D,
    team_footprint: Size3D,
    verify: bool,
}

impl Default for LayoutOrchestrator {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl LayoutOrchestrator {
    /// Create an orchestrator with the default placement constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an orchestrator from a layout configuration section
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            domain_spacing: config.domain_spacing(),
            service_spacing: config.service_spacing(),
            domain_footprint: config.domain_footprint(),
            team_footprint: config.team_footprint(),
            verify: config.verify(),
        }
    }

    /// Set the distance between domain grid cells
    pub fn with_domain_spacing(mut self, spacing: f32) -> Self {
        self.domain_spacing = spacing;
        self
    }

    /// Set the vertical gap between stacked services
    pub fn with_service_spacing(mut self, spacing: f32) -> Self {
        self.service_spacing = spacing;
        self
    }

    /// Set the box allocated to each domain
    pub fn with_domain_footprint(mut self, footprint: Size3D) -> Self {
        self.domain_footprint = footprint;
        self
    }

    /// Set the box allocated to each team
    pub fn with_team_footprint(mut self, footprint: Size3D) -> Self {
        self.team_footprint = footprint;
        self
    }

    /// Log a warning for each pair of colliding sibling teams
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Walk the hierarchy in `store` and compute every position.
    ///
    /// # Errors
    ///
    /// Returns the store's error untouched if any read fails; no partial
    /// layout is returned.
    pub fn compute<S: EntityStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<LayoutPositions, StoreError> {
        let domains = store.list_domains()?;
        info!(domains = domains.len(); "Computing layout");

        let mut positions = LayoutPositions::new();
        let domain_positions = place_grid(&domains, self.domain_spacing);

        for (domain, domain_position) in domains.iter().zip(domain_positions) {
            positions.insert_domain(domain.id(), domain_position);
            self.place_teams(store, domain, domain_position, &mut positions)?;
        }

        info!(
            domains = positions.domains().len(),
            teams = positions.teams().len(),
            services = positions.services().len();
            "Layout computed"
        );
        trace!(positions:?; "Computed positions");

        Ok(positions)
    }

    /// Pack the teams of one domain inside the domain's box
    fn place_teams<S: EntityStore + ?Sized>(
        &self,
        store: &S,
        domain: &LayoutItem,
        domain_position: Position3D,
        positions: &mut LayoutPositions,
    ) -> Result<(), StoreError> {
        let teams = store.list_teams_of(domain.id())?;
        if teams.is_empty() {
            debug!(domain_id = domain.id(); "Domain has no teams, skipping");
            return Ok(());
        }

        let domain_box = domain_position.to_box(self.domain_footprint);
        for team in teams.iter().filter(|team| team.footprint() > domain_box.width()) {
            warn!(
                domain_id = domain.id(),
                team_id = team.id(),
                team_size = team.footprint(),
                domain_width = domain_box.width();
                "Team is wider than its domain and will protrude"
            );
        }

        let team_positions = pack_treemap(&teams, domain_box);

        if self.verify {
            self.report_overlaps(domain, &teams, &team_positions);
        }

        for (team, team_position) in teams.iter().zip(team_positions) {
            positions.insert_team(team.id(), team_position);
            self.place_services(store, team, team_position, positions)?;
        }

        Ok(())
    }

    /// Stack the services of one team above the team's box
    fn place_services<S: EntityStore + ?Sized>(
        &self,
        store: &S,
        team: &LayoutItem,
        team_position: Position3D,
        positions: &mut LayoutPositions,
    ) -> Result<(), StoreError> {
        let services = store.list_services_of(team.id())?;
        if services.is_empty() {
            debug!(team_id = team.id(); "Team has no services, skipping");
            return Ok(());
        }

        let team_box = team_position.to_box(self.team_footprint);
        let service_positions = stack_services(&services, team_box, self.service_spacing);

        for (service, service_position) in services.iter().zip(service_positions) {
            positions.insert_service(service.id(), service_position);
        }

        Ok(())
    }

    fn report_overlaps(&self, domain: &LayoutItem, teams: &[LayoutItem], team_positions: &[Position3D]) {
        let boxes = teams.iter().zip(team_positions).map(|(team, position)| {
            let size = team.footprint();
            (
                team.id(),
                position.to_box(Size3D::new(size, size, self.team_footprint.depth())),
            )
        });

        for overlap in find_overlaps(boxes) {
            warn!(
                domain_id = domain.id(),
                first = overlap.first(),
                second = overlap.second();
                "Sibling teams overlap"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use skyline_core::geometry::{BoundingBox, collides};

    use super::*;
    use crate::store::InMemoryEntityStore;

    fn sample_store() -> InMemoryEntityStore {
        let mut store = InMemoryEntityStore::new();
        for (domain_id, name) in [("d-pay", "Payments"), ("d-id", "Identity"), ("d-ops", "Operations")] {
            store.add_domain(LayoutItem::new(domain_id, name));
        }

        store.add_team("d-pay", LayoutItem::new("t-checkout", "Checkout").with_size(40.0));
        store.add_team("d-pay", LayoutItem::new("t-refunds", "Refunds").with_size(30.0));
        store.add_team("d-pay", LayoutItem::new("t-fraud", "Fraud"));
        store.add_team("d-id", LayoutItem::new("t-auth", "Auth"));

        store.add_service("t-checkout", LayoutItem::new("s-cart", "Cart"));
        store.add_service("t-checkout", LayoutItem::new("s-pay", "Pay"));
        store.add_service("t-checkout", LayoutItem::new("s-receipt", "Receipt"));
        store.add_service("t-auth", LayoutItem::new("s-login", "Login").with_tier("critical"));

        store
    }

    /// Store that fails on the first team lookup.
    struct FailingTeams(InMemoryEntityStore);

    impl EntityStore for FailingTeams {
        fn list_domains(&self) -> Result<Vec<LayoutItem>, StoreError> {
            self.0.list_domains()
        }

        fn list_teams_of(&self, _domain_id: &str) -> Result<Vec<LayoutItem>, StoreError> {
            Err(StoreError::backend("connection reset"))
        }

        fn list_services_of(&self, team_id: &str) -> Result<Vec<LayoutItem>, StoreError> {
            self.0.list_services_of(team_id)
        }
    }

    /// Store that counts service lookups.
    struct CountingServices {
        inner: InMemoryEntityStore,
        service_reads: Cell<usize>,
    }

    impl EntityStore for CountingServices {
        fn list_domains(&self) -> Result<Vec<LayoutItem>, StoreError> {
            self.inner.list_domains()
        }

        fn list_teams_of(&self, domain_id: &str) -> Result<Vec<LayoutItem>, StoreError> {
            self.inner.list_teams_of(domain_id)
        }

        fn list_services_of(&self, team_id: &str) -> Result<Vec<LayoutItem>, StoreError> {
            self.service_reads.set(self.service_reads.get() + 1);
            self.inner.list_services_of(team_id)
        }
    }

    #[test]
    fn test_empty_store() {
        let positions = LayoutOrchestrator::new().compute(&InMemoryEntityStore::new()).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn test_every_entity_is_placed() {
        let positions = LayoutOrchestrator::new().compute(&sample_store()).unwrap();

        assert_eq!(positions.domains().len(), 3);
        assert_eq!(positions.teams().len(), 4);
        assert_eq!(positions.services().len(), 4);
    }

    #[test]
    fn test_domains_follow_store_order() {
        let positions = LayoutOrchestrator::new().compute(&sample_store()).unwrap();

        // Name order: Identity, Operations, Payments on a 2-column grid.
        assert_eq!(positions.domains()["d-id"], Position3D::new(0.0, 0.0, 0.0));
        assert_eq!(positions.domains()["d-ops"], Position3D::new(150.0, 0.0, 0.0));
        assert_eq!(positions.domains()["d-pay"], Position3D::new(0.0, 150.0, 0.0));
    }

    #[test]
    fn test_teams_packed_inside_their_domain() {
        let store = sample_store();
        let positions = LayoutOrchestrator::new().compute(&store).unwrap();

        let domain_origin = positions.domains()["d-pay"];
        let domain_box = domain_origin.to_box(Size3D::new(100.0, 100.0, 50.0));

        let teams = store.list_teams_of("d-pay").unwrap();
        let boxes: Vec<BoundingBox> = teams
            .iter()
            .map(|team| {
                let position = positions.teams()[team.id()];
                assert!(domain_box.contains_footprint_of(position));
                assert_eq!(position.z(), domain_origin.z() + 5.0);
                let size = team.footprint();
                position.to_box(Size3D::new(size, size, 50.0))
            })
            .collect();

        for i in 0..boxes.len() {
            for j in i + 1..boxes.len() {
                assert!(!collides(&boxes[i], &boxes[j]));
            }
        }
    }

    #[test]
    fn test_services_stacked_over_team_center() {
        let positions = LayoutOrchestrator::new().compute(&sample_store()).unwrap();
        let team = positions.teams()["t-checkout"];

        // Name order: Cart, Pay, Receipt.
        let stack: Vec<Position3D> = ["s-cart", "s-pay", "s-receipt"]
            .iter()
            .map(|id| positions.services()[*id])
            .collect();

        for (level, service) in stack.iter().enumerate() {
            assert_eq!(service.x(), team.x() + 20.0);
            assert_eq!(service.y(), team.y() + 20.0);
            assert_eq!(service.z(), team.z() + 10.0 + level as f32 * 10.0);
        }
    }

    #[test]
    fn test_custom_constants() {
        let orchestrator = LayoutOrchestrator::new()
            .with_domain_spacing(300.0)
            .with_service_spacing(25.0)
            .with_domain_footprint(Size3D::new(200.0, 200.0, 50.0))
            .with_team_footprint(Size3D::new(60.0, 60.0, 50.0));
        let positions = orchestrator.compute(&sample_store()).unwrap();

        assert_eq!(positions.domains()["d-ops"].x(), 300.0);

        let team = positions.teams()["t-checkout"];
        let cart = positions.services()["s-cart"];
        let pay = positions.services()["s-pay"];
        assert_eq!(cart.x(), team.x() + 30.0);
        assert_eq!(pay.z() - cart.z(), 25.0);
    }

    #[test]
    fn test_childless_parents_skip_lookups() {
        let store = CountingServices {
            inner: sample_store(),
            service_reads: Cell::new(0),
        };
        let positions = LayoutOrchestrator::new().compute(&store).unwrap();

        // Operations has no teams, so only the four teams are asked for services.
        assert_eq!(store.service_reads.get(), 4);
        assert!(positions.domains().contains_key("d-ops"));
        assert!(!positions.services().contains_key("t-refunds"));
    }

    #[test]
    fn test_store_failure_propagates() {
        let store = FailingTeams(sample_store());
        let err = LayoutOrchestrator::new().compute(&store).unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn test_deterministic_output() {
        let store = sample_store();
        let orchestrator = LayoutOrchestrator::new().with_verification(true);

        let first = orchestrator.compute(&store).unwrap();
        let second = orchestrator.compute(&store).unwrap();

        assert_eq!(first, second);
        assert!(first.teams().keys().eq(second.teams().keys()));
    }

    #[test]
    fn test_oversized_team_is_tolerated() {
        let mut store = InMemoryEntityStore::new();
        store.add_domain(LayoutItem::new("d", "Domain"));
        store.add_team("d", LayoutItem::new("t-huge", "Huge").with_size(250.0));
        store.add_team("d", LayoutItem::new("t-small", "Small").with_size(10.0));

        let positions = LayoutOrchestrator::new()
            .with_verification(true)
            .compute(&store)
            .unwrap();

        assert_eq!(positions.teams().len(), 2);
    }
}
