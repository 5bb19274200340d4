//! Placement algorithms and the hierarchy walk that combines them.
//!
//! Each placer is a pure function from an ordered item list to an
//! index-aligned list of positions:
//!
//! - [`place_grid`] - domains on a uniform ground-plane grid
//! - [`pack_treemap`] - teams packed row by row inside their domain
//! - [`stack_services`] - services stacked vertically above their team
//!
//! [`LayoutOrchestrator`] reads the hierarchy from an entity store and drives
//! the placers in dependency order.

mod grid;
mod orchestrator;
mod stack;
mod treemap;

pub mod verify;

pub use grid::place_grid;
pub use orchestrator::LayoutOrchestrator;
pub use stack::{STACK_BASE_OFFSET, stack_services};
pub use treemap::{TREEMAP_LIFT, TREEMAP_PADDING, pack_treemap};
