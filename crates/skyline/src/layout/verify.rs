//! Post-hoc overlap checks over placed sibling entities.

use skyline_core::geometry::{BoundingBox, collides};

/// Two sibling entities whose boxes collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    first: String,
    second: String,
}

impl Overlap {
    /// Id of the entity that comes first in the checked sequence
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Id of the entity that comes second in the checked sequence
    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Returns every colliding pair among `boxes`, in sequence order.
///
/// # Examples
///
/// ```
/// # use skyline::layout::verify::find_overlaps;
/// # use skyline_core::geometry::{Position3D, Size3D};
/// let size = Size3D::new(50.0, 50.0, 50.0);
/// let boxes = [
///     ("a", Position3D::new(0.0, 0.0, 0.0).to_box(size)),
///     ("b", Position3D::new(55.0, 0.0, 0.0).to_box(size)),
///     ("c", Position3D::new(20.0, 20.0, 0.0).to_box(size)),
/// ];
///
/// let overlaps = find_overlaps(boxes);
/// assert_eq!(overlaps.len(), 2);
/// assert_eq!((overlaps[0].first(), overlaps[0].second()), ("a", "c"));
/// assert_eq!((overlaps[1].first(), overlaps[1].second()), ("b", "c"));
/// ```
pub fn find_overlaps<'a>(boxes: impl IntoIterator<Item = (&'a str, BoundingBox)>) -> Vec<Overlap> {
    let boxes: Vec<_> = boxes.into_iter().collect();
    let mut overlaps = Vec::new();

    for (i, (first, a)) in boxes.iter().enumerate() {
        for (second, b) in &boxes[i + 1..] {
            if collides(a, b) {
                overlaps.push(Overlap {
                    first: (*first).to_string(),
                    second: (*second).to_string(),
                });
            }
        }
    }

    overlaps
}
