pub mod export;
pub mod init;
pub mod init_types;

pub use export::{save_routes_to_csv, write_routes_csv};
pub use init::{load_bins, read_bins_csv, read_bins_json};
