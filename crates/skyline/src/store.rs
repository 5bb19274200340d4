//! Read access to the domain → team → service hierarchy.
//!
//! The layout engine never owns entity data. It reads flat, name-ordered lists
//! through the [`EntityStore`] trait. [`InMemoryEntityStore`] is the bundled
//! implementation, usually built from an [`Organization`] document.

use std::{
    collections::{HashMap, HashSet},
    error::Error,
};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use skyline_core::item::LayoutItem;

/// Errors reported by an entity store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be read.
    #[error("{0}")]
    Backend(Box<dyn Error + Send + Sync>),

    /// Two entities share the same id.
    #[error("duplicate entity id `{0}`")]
    DuplicateId(String),
}

impl StoreError {
    /// Wraps a backend failure.
    pub fn backend(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }
}

/// Read interface over the entity hierarchy.
///
/// Every list must be stable across calls for an unchanged data set; the
/// layout is only deterministic if its input order is. Implementations return
/// lists ordered by name.
pub trait EntityStore {
    /// Lists all domains.
    fn list_domains(&self) -> Result<Vec<LayoutItem>, StoreError>;

    /// Lists the teams of a domain. An unknown domain has no teams.
    fn list_teams_of(&self, domain_id: &str) -> Result<Vec<LayoutItem>, StoreError>;

    /// Lists the services of a team. An unknown team has no services.
    fn list_services_of(&self, team_id: &str) -> Result<Vec<LayoutItem>, StoreError>;
}

impl<T: EntityStore + ?Sized> EntityStore for &T {
    fn list_domains(&self) -> Result<Vec<LayoutItem>, StoreError> {
        (**self).list_domains()
    }

    fn list_teams_of(&self, domain_id: &str) -> Result<Vec<LayoutItem>, StoreError> {
        (**self).list_teams_of(domain_id)
    }

    fn list_services_of(&self, team_id: &str) -> Result<Vec<LayoutItem>, StoreError> {
        (**self).list_services_of(team_id)
    }
}

/// An entity store held entirely in memory.
///
/// # Examples
///
/// ```
/// # use skyline::store::{EntityStore, InMemoryEntityStore};
/// # use skyline_core::item::LayoutItem;
/// let mut store = InMemoryEntityStore::new();
/// store.add_domain(LayoutItem::new("d2", "Payments"));
/// store.add_domain(LayoutItem::new("d1", "Identity"));
///
/// let names: Vec<_> = store
///     .list_domains()
///     .unwrap()
///     .iter()
///     .map(|d| d.name().to_string())
///     .collect();
/// assert_eq!(names, ["Identity", "Payments"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityStore {
    domains: Vec<LayoutItem>,
    teams: HashMap<String, Vec<LayoutItem>>,
    services: HashMap<String, Vec<LayoutItem>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_domain(&mut self, domain: LayoutItem) {
        self.domains.push(domain);
    }

    pub fn add_team(&mut self, domain_id: impl Into<String>, team: LayoutItem) {
        self.teams.entry(domain_id.into()).or_default().push(team);
    }

    pub fn add_service(&mut self, team_id: impl Into<String>, service: LayoutItem) {
        self.services.entry(team_id.into()).or_default().push(service);
    }

    /// Returns a copy of `items` ordered by name, then id.
    fn sorted(items: Option<&Vec<LayoutItem>>) -> Vec<LayoutItem> {
        let mut items = items.cloned().unwrap_or_default();
        items.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
        items
    }
}

impl EntityStore for InMemoryEntityStore {
    fn list_domains(&self) -> Result<Vec<LayoutItem>, StoreError> {
        Ok(Self::sorted(Some(&self.domains)))
    }

    fn list_teams_of(&self, domain_id: &str) -> Result<Vec<LayoutItem>, StoreError> {
        Ok(Self::sorted(self.teams.get(domain_id)))
    }

    fn list_services_of(&self, team_id: &str) -> Result<Vec<LayoutItem>, StoreError> {
        Ok(Self::sorted(self.services.get(team_id)))
    }
}

/// A nested description of an organization, as loaded from a document.
///
/// ```toml
/// [[domains]]
/// id = "payments"
/// name = "Payments"
///
/// [[domains.teams]]
/// id = "checkout"
/// name = "Checkout"
/// size = 60
///
/// [[domains.teams.services]]
/// id = "cart-api"
/// name = "Cart API"
/// tier = "critical"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Organization {
    #[serde(default)]
    domains: Vec<DomainRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct DomainRecord {
    id: String,
    name: String,
    #[serde(default)]
    teams: Vec<TeamRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct TeamRecord {
    id: String,
    name: String,
    size: Option<f32>,
    #[serde(default)]
    services: Vec<ServiceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceRecord {
    id: String,
    name: String,
    size: Option<f32>,
    tier: Option<String>,
}

fn to_item(id: &str, name: &str, size: Option<f32>, tier: Option<&str>) -> LayoutItem {
    let mut item = LayoutItem::new(id, name);
    if let Some(size) = size {
        item = item.with_size(size);
    }
    if let Some(tier) = tier {
        item = item.with_tier(tier);
    }
    item
}

impl TryFrom<Organization> for InMemoryEntityStore {
    type Error = StoreError;

    /// Flattens the organization into a store.
    ///
    /// Ids must be unique across all three levels.
    fn try_from(organization: Organization) -> Result<Self, Self::Error> {
        let mut store = Self::new();
        let mut seen = HashSet::new();
        let mut claim = |id: &str| {
            if seen.insert(id.to_string()) {
                Ok(())
            } else {
                Err(StoreError::DuplicateId(id.to_string()))
            }
        };

        for domain in &organization.domains {
            claim(&domain.id)?;
            store.add_domain(to_item(&domain.id, &domain.name, None, None));

            for team in &domain.teams {
                claim(&team.id)?;
                store.add_team(&domain.id, to_item(&team.id, &team.name, team.size, None));

                for service in &team.services {
                    claim(&service.id)?;
                    store.add_service(
                        &team.id,
                        to_item(&service.id, &service.name, service.size, service.tier.as_deref()),
                    );
                }
            }
        }

        debug!(entities = seen.len(); "Organization loaded into entity store");

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORGANIZATION: &str = r#"
        [[domains]]
        id = "payments"
        name = "Payments"

        [[domains.teams]]
        id = "refunds"
        name = "Refunds"

        [[domains.teams]]
        id = "checkout"
        name = "Checkout"
        size = 60

        [[domains.teams.services]]
        id = "cart-api"
        name = "Cart API"
        tier = "critical"

        [[domains]]
        id = "identity"
        name = "Identity"
    "#;

    fn organization_store() -> InMemoryEntityStore {
        let organization: Organization = toml::from_str(ORGANIZATION).unwrap();
        InMemoryEntityStore::try_from(organization).unwrap()
    }

    fn ids(items: &[LayoutItem]) -> Vec<&str> {
        items.iter().map(LayoutItem::id).collect()
    }

    #[test]
    fn test_lists_are_name_ordered() {
        let store = organization_store();
        assert_eq!(ids(&store.list_domains().unwrap()), ["identity", "payments"]);
        assert_eq!(ids(&store.list_teams_of("payments").unwrap()), ["checkout", "refunds"]);
    }

    #[test]
    fn test_optional_fields_carried_over() {
        let store = organization_store();
        let teams = store.list_teams_of("payments").unwrap();
        assert_eq!(teams[0].size(), Some(60.0));
        assert_eq!(teams[1].size(), None);

        let services = store.list_services_of("checkout").unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].tier(), Some("critical"));
    }

    #[test]
    fn test_unknown_parents_have_no_children() {
        let store = organization_store();
        assert!(store.list_teams_of("identity").unwrap().is_empty());
        assert!(store.list_teams_of("missing").unwrap().is_empty());
        assert!(store.list_services_of("refunds").unwrap().is_empty());
    }

    #[test]
    fn test_name_ties_fall_back_to_id() {
        let mut store = InMemoryEntityStore::new();
        store.add_domain(LayoutItem::new("b", "Same"));
        store.add_domain(LayoutItem::new("a", "Same"));
        assert_eq!(ids(&store.list_domains().unwrap()), ["a", "b"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let organization: Organization = toml::from_str(
            r#"
            [[domains]]
            id = "shared"
            name = "Domain"

            [[domains.teams]]
            id = "shared"
            name = "Team"
            "#,
        )
        .unwrap();

        let err = InMemoryEntityStore::try_from(organization).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == "shared"));
    }

    #[test]
    fn test_store_usable_through_reference() {
        fn count_domains(store: impl EntityStore) -> usize {
            store.list_domains().unwrap().len()
        }

        let store = organization_store();
        assert_eq!(count_domains(&store), 2);
    }
}
