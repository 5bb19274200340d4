//! The computed layout: one position per entity, grouped by hierarchy level.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::Position3D;

/// Ordered map from entity id to its computed position.
///
/// Iteration follows insertion order, which is the order the layout was
/// computed in.
pub type PositionMap = IndexMap<String, Position3D>;

/// The complete computed layout.
///
/// Serializes to the storage shape
/// `{"domains": {id: {x, y, z}}, "teams": {...}, "services": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPositions {
    #[serde(default)]
    domains: PositionMap,
    #[serde(default)]
    teams: PositionMap,
    #[serde(default)]
    services: PositionMap,
}

impl LayoutPositions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domains(&self) -> &PositionMap {
        &self.domains
    }

    pub fn teams(&self) -> &PositionMap {
        &self.teams
    }

    pub fn services(&self) -> &PositionMap {
        &self.services
    }

    pub fn insert_domain(&mut self, id: impl Into<String>, position: Position3D) {
        self.domains.insert(id.into(), position);
    }

    pub fn insert_team(&mut self, id: impl Into<String>, position: Position3D) {
        self.teams.insert(id.into(), position);
    }

    pub fn insert_service(&mut self, id: impl Into<String>, position: Position3D) {
        self.services.insert(id.into(), position);
    }

    /// Total number of positioned entities across all levels
    pub fn len(&self) -> usize {
        self.domains.len() + self.teams.len() + self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
