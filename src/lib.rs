pub mod config;
pub mod database;
pub mod datasource;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod planning;
pub mod runner;
pub mod setup;
pub mod solver;
pub mod utils;

pub use error::{Error, Result};
