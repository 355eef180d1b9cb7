pub mod solution;
pub mod types;

pub use solution::{stops_from_route, CurrentRoute, Route, RouteMetrics, RouteStop, StopStatus};
pub use types::{Actor, BinLocation, BinRecord, GeoPoint, Role};
