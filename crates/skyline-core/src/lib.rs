//! Skyline Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Skyline layout
//! engine. It includes:
//!
//! - **Geometry**: Positions, sizes, bounding boxes and the collision predicate ([`geometry`] module)
//! - **Items**: Input descriptors for placeable entities ([`item::LayoutItem`])
//! - **Positions**: The computed layout grouped by hierarchy level ([`positions::LayoutPositions`])

pub mod geometry;
pub mod item;
pub mod positions;
