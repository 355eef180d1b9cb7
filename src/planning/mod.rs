pub mod access;
pub mod planner;

pub use access::{authorize, Action};
pub use planner::RoutePlanner;
