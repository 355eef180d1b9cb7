//! Route ordering.
//!
//! - [`optimize_route`]: greedy nearest-neighbor, O(n²)
//! - [`try_optimize_route`]: the same after coordinate validation
//! - [`optimize_batch`]: many independent routes on the rayon pool

pub mod batch;
pub mod nearest_neighbor;

pub use batch::optimize_batch;
pub use nearest_neighbor::{optimize_route, try_optimize_route};
