//! Vertical stacking of leaf entities above their parent.

use skyline_core::{
    geometry::{BoundingBox, Position3D},
    item::LayoutItem,
};

/// Height above the parent's base at which the first stacked item sits.
pub const STACK_BASE_OFFSET: f32 = 10.0;

/// Stacks `items` in a vertical column centered over the footprint of `bounds`.
///
/// All items share the footprint center; the first sits at
/// `bounds.z + 10` and each following item `spacing` higher, in input order.
/// The returned positions are aligned by index with `items`.
///
/// # Examples
///
/// ```
/// # use skyline::layout::stack_services;
/// # use skyline_core::{geometry::{BoundingBox, Position3D, Size3D}, item::LayoutItem};
/// let team = BoundingBox::new(Position3D::default(), Size3D::new(100.0, 100.0, 50.0));
/// let positions = stack_services(&[LayoutItem::new("api", "API")], team, 10.0);
/// assert_eq!(positions, [Position3D::new(50.0, 50.0, 10.0)]);
/// ```
pub fn stack_services(items: &[LayoutItem], bounds: BoundingBox, spacing: f32) -> Vec<Position3D> {
    let center = bounds.center();
    let base = bounds.z() + STACK_BASE_OFFSET;

    (0..items.len())
        .map(|level| center.with_z(base + level as f32 * spacing))
        .collect()
}
