//! Uniform grid placement for top-level entities.

use skyline_core::{geometry::Position3D, item::LayoutItem};

/// Places `items` on a square-ish grid on the ground plane.
///
/// The grid has `ceil(sqrt(n))` columns; item `i` lands in row
/// `i / columns`, column `i % columns`, at `(col * spacing, row * spacing, 0)`.
/// The returned positions are aligned by index with `items`.
///
/// Cells are exactly `spacing` apart, so no collision check is needed as long
/// as `spacing` is at least the footprint the caller allocates per item.
pub fn place_grid(items: &[LayoutItem], spacing: f32) -> Vec<Position3D> {
    let columns = grid_columns(items.len());

    (0..items.len())
        .map(|index| {
            let row = index / columns;
            let col = index % columns;
            Position3D::new(col as f32 * spacing, row as f32 * spacing, 0.0)
        })
        .collect()
}

/// Number of grid columns for `count` items, `ceil(sqrt(count))`.
fn grid_columns(count: usize) -> usize {
    let mut columns = (count as f64).sqrt().ceil() as usize;
    // Guard against float rounding on perfect squares.
    while columns * columns < count {
        columns += 1;
    }
    columns.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<LayoutItem> {
        (0..count)
            .map(|i| LayoutItem::new(format!("d{i}"), format!("Domain {i}")))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(place_grid(&[], 150.0).is_empty());
    }

    #[test]
    fn test_single_item_at_origin() {
        assert_eq!(place_grid(&items(1), 150.0), [Position3D::default()]);
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(2), 2);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(9), 3);
        assert_eq!(grid_columns(10), 4);
    }

    #[test]
    fn test_five_items_fill_rows_first() {
        let positions = place_grid(&items(5), 100.0);
        assert_eq!(
            positions,
            [
                Position3D::new(0.0, 0.0, 0.0),
                Position3D::new(100.0, 0.0, 0.0),
                Position3D::new(200.0, 0.0, 0.0),
                Position3D::new(0.0, 100.0, 0.0),
                Position3D::new(100.0, 100.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_four_domains_are_pairwise_separated() {
        let spacing = 150.0;
        let positions = place_grid(&items(4), spacing);

        let mut pairs = 0;
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(a.distance_2d(*b) >= spacing);
                pairs += 1;
            }
        }
        assert_eq!(pairs, 6);
    }

    #[test]
    fn test_all_on_ground_plane() {
        assert!(place_grid(&items(7), 150.0).iter().all(|p| p.z() == 0.0));
    }

    #[test]
    fn test_deterministic() {
        let input = items(11);
        assert_eq!(place_grid(&input, 150.0), place_grid(&input, 150.0));
    }
}
