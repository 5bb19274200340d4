//! Greedy row-based packing of middle-level entities inside a parent box.

use skyline_core::{
    geometry::{BoundingBox, Position3D},
    item::LayoutItem,
};

/// Gap left between packed items, both within a row and between rows.
pub const TREEMAP_PADDING: f32 = 5.0;

/// Height above the parent's base at which packed items sit.
pub const TREEMAP_LIFT: f32 = 5.0;

/// Packs `items` as square footprints inside `bounds`, row by row.
///
/// Items are placed largest first (see [`LayoutItem::footprint`]); equal sizes
/// keep their input order. A new row starts whenever the next item would
/// cross the right edge of `bounds`. The returned positions are aligned with
/// the *input* order of `items`, not the packing order.
///
/// An item wider than `bounds` is not rejected: it is placed at the start of
/// a fresh row and protrudes past the right edge.
///
/// # Examples
///
/// ```
/// # use skyline::layout::pack_treemap;
/// # use skyline_core::{geometry::{BoundingBox, Position3D, Size3D}, item::LayoutItem};
/// let bounds = BoundingBox::new(Position3D::default(), Size3D::new(100.0, 100.0, 50.0));
/// let items = [
///     LayoutItem::new("small", "Small").with_size(20.0),
///     LayoutItem::new("large", "Large").with_size(60.0),
/// ];
///
/// let positions = pack_treemap(&items, bounds);
/// // The large item is packed first, at the corner.
/// assert_eq!(positions[1], Position3D::new(0.0, 0.0, 5.0));
/// assert_eq!(positions[0], Position3D::new(65.0, 0.0, 5.0));
/// ```
pub fn pack_treemap(items: &[LayoutItem], bounds: BoundingBox) -> Vec<Position3D> {
    // Packing order as indices into `items`, so results map straight back.
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].footprint().total_cmp(&items[a].footprint()));

    let right_edge = bounds.x() + bounds.width();
    let z = bounds.z() + TREEMAP_LIFT;

    let mut positions = vec![Position3D::default(); items.len()];
    let mut current_x = bounds.x();
    let mut current_y = bounds.y();
    let mut row_height: f32 = 0.0;

    for index in order {
        let size = items[index].footprint();

        if current_x + size > right_edge {
            current_x = bounds.x();
            current_y += row_height + TREEMAP_PADDING;
            row_height = 0.0;
        }

        positions[index] = Position3D::new(current_x, current_y, z);

        current_x += size + TREEMAP_PADDING;
        row_height = row_height.max(size);
    }

    positions
}
