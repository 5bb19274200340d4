//! Geometric primitives for 3D layout and collision checks.
//!
//! This module provides the fundamental geometric types used throughout Skyline
//! for calculating positions, footprints, and bounding boxes of placed entities.
//!
//! # Overview
//!
//! - [`Position3D`] - A 3D coordinate in layout space
//! - [`Size3D`] - Width, height and depth extents
//! - [`BoundingBox`] - An axis-aligned box defined by an origin corner and a size
//! - [`collides`] - The inclusive overlap predicate between two boxes
//!
//! # Coordinate System
//!
//! The ground plane is spanned by X and Y; Z grows upward:
//!
//! ```text
//!        +Z
//!         ▲
//!         │   ▲ +Y
//!         │  ╱
//!         │ ╱
//!   (0,0,0)────────► +X
//! ```
//!
//! - **Origin**: Domains are placed on the ground plane at `z = 0`
//! - **Width**: Extent along X
//! - **Height**: Extent along Y
//! - **Depth**: Extent along Z (vertical)
//!
//! A box's origin is its minimum corner on every axis.

use serde::{Deserialize, Serialize};

/// A 3D point representing a position in layout space.
///
/// # Examples
///
/// ```
/// # use skyline_core::geometry::Position3D;
/// let p = Position3D::new(10.0, 20.0, 5.0);
/// let q = p.offset(1.0, 2.0, 3.0);
///
/// assert_eq!(q.x(), 11.0);
/// assert_eq!(q.y(), 22.0);
/// assert_eq!(q.z(), 8.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    x: f32,
    y: f32,
    z: f32,
}

impl Position3D {
    /// Creates a new position with the specified coordinates
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns the x-coordinate of the position
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the position
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the z-coordinate (height) of the position
    pub fn z(self) -> f32 {
        self.z
    }

    /// Creates a new position with the specified z-coordinate
    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    /// Returns a new position moved by the given amounts on each axis
    pub fn offset(self, dx: f32, dy: f32, dz: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Euclidean distance to `other`, ignoring the z axis.
    ///
    /// # Examples
    ///
    /// ```
    /// # use skyline_core::geometry::Position3D;
    /// let a = Position3D::new(0.0, 0.0, 0.0);
    /// let b = Position3D::new(3.0, 4.0, 100.0);
    /// assert_eq!(a.distance_2d(b), 5.0);
    /// ```
    pub fn distance_2d(self, other: Position3D) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Creates a bounding box with this position as its minimum corner
    pub fn to_box(self, size: Size3D) -> BoundingBox {
        BoundingBox::new(self, size)
    }
}

/// Represents the extents of a volume along the three axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size3D {
    width: f32,
    height: f32,
    depth: f32,
}

impl Size3D {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Returns the X extent
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the Y extent
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the Z extent
    pub fn depth(self) -> f32 {
        self.depth
    }
}

/// An axis-aligned 3D volume owned by one placed entity.
///
/// The box is stored as its minimum corner plus non-negative extents.
///
/// # Examples
///
/// ```
/// # use skyline_core::geometry::{BoundingBox, Position3D, Size3D};
/// let domain = BoundingBox::new(Position3D::new(150.0, 0.0, 0.0), Size3D::new(100.0, 100.0, 50.0));
///
/// assert_eq!(domain.max_x(), 250.0);
/// assert_eq!(domain.center().x(), 200.0);
/// assert_eq!(domain.center().y(), 50.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    origin: Position3D,
    size: Size3D,
}

impl BoundingBox {
    /// Creates a new box from its minimum corner and size
    pub fn new(origin: Position3D, size: Size3D) -> Self {
        Self { origin, size }
    }

    /// Returns the minimum corner of the box
    pub fn origin(self) -> Position3D {
        self.origin
    }

    /// Returns the extents of the box
    pub fn size(self) -> Size3D {
        self.size
    }

    pub fn x(self) -> f32 {
        self.origin.x
    }

    pub fn y(self) -> f32 {
        self.origin.y
    }

    pub fn z(self) -> f32 {
        self.origin.z
    }

    pub fn width(self) -> f32 {
        self.size.width
    }

    pub fn height(self) -> f32 {
        self.size.height
    }

    pub fn depth(self) -> f32 {
        self.size.depth
    }

    /// Returns the maximum x-coordinate of the box
    pub fn max_x(self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Returns the maximum y-coordinate of the box
    pub fn max_y(self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Returns the maximum z-coordinate of the box
    pub fn max_z(self) -> f32 {
        self.origin.z + self.size.depth
    }

    /// Returns the center of the box's footprint, at the box's base height
    pub fn center(self) -> Position3D {
        Position3D::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
            self.origin.z,
        )
    }

    /// Checks whether the ground-plane footprint of `position` lies inside this box.
    ///
    /// The minimum edges are inclusive and the maximum edges exclusive, so a
    /// position sitting exactly on the far edge is outside.
    pub fn contains_footprint_of(self, position: Position3D) -> bool {
        position.x >= self.origin.x
            && position.x < self.max_x()
            && position.y >= self.origin.y
            && position.y < self.max_y()
    }

    /// Checks whether this box overlaps or touches `other`.
    ///
    /// See [`collides`].
    pub fn collides_with(&self, other: &BoundingBox) -> bool {
        collides(self, other)
    }
}

/// Returns true iff the two boxes overlap or exactly touch on all three axes.
///
/// Bounds are inclusive: two boxes sharing only a face, edge, or corner
/// collide.
///
/// # Examples
///
/// ```
/// # use skyline_core::geometry::{collides, BoundingBox, Position3D, Size3D};
/// let size = Size3D::new(10.0, 10.0, 10.0);
/// let a = BoundingBox::new(Position3D::new(0.0, 0.0, 0.0), size);
/// let touching = BoundingBox::new(Position3D::new(10.0, 0.0, 0.0), size);
/// let apart = BoundingBox::new(Position3D::new(15.0, 0.0, 0.0), size);
///
/// assert!(collides(&a, &touching));
/// assert!(!collides(&a, &apart));
/// ```
pub fn collides(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.x() <= b.max_x()
        && a.max_x() >= b.x()
        && a.y() <= b.max_y()
        && a.max_y() >= b.y()
        && a.z() <= b.max_z()
        && a.max_z() >= b.z()
}
