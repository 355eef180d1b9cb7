//! Great-circle distances between coordinates.

pub mod haversine;

pub use haversine::haversine_distance_km;
