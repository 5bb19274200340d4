//! Input descriptors for placeable entities.

use serde::{Deserialize, Serialize};

/// Footprint side length used for an item that does not declare a size.
pub const DEFAULT_ITEM_SIZE: f32 = 50.0;

/// A placeable entity as read from the entity store.
///
/// Items are built per request and carry only what the placers need: an
/// identity, a display name, an optional footprint size, and an optional tier
/// label passed through for callers.
///
/// # Examples
///
/// ```
/// # use skyline_core::item::{LayoutItem, DEFAULT_ITEM_SIZE};
/// let team = LayoutItem::new("team-1", "Checkout");
/// assert_eq!(team.footprint(), DEFAULT_ITEM_SIZE);
///
/// let big = team.with_size(80.0);
/// assert_eq!(big.footprint(), 80.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tier: Option<String>,
}

impl LayoutItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size: None,
            tier: None,
        }
    }

    /// Sets the footprint size (builder style)
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the tier label (builder style)
    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared size, if any
    pub fn size(&self) -> Option<f32> {
        self.size
    }

    pub fn tier(&self) -> Option<&str> {
        self.tier.as_deref()
    }

    /// Returns the side length of the square footprint used for packing,
    /// falling back to [`DEFAULT_ITEM_SIZE`] when no finite size is set.
    pub fn footprint(&self) -> f32 {
        self.size
            .filter(|size| size.is_finite())
            .unwrap_or(DEFAULT_ITEM_SIZE)
    }
}
