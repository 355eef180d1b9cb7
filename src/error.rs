use thiserror::Error as ThisError;

use crate::domain::types::Role;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid coordinate{}: ({latitude}, {longitude})", bin_label(.bin_id))]
    InvalidCoordinate {
        bin_id: Option<String>,
        latitude: f64,
        longitude: f64,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{role} is not allowed to {action}")]
    Forbidden { role: Role, action: &'static str },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("every data source failed for {operation}: {}", .failures.join("; "))]
    SourcesExhausted {
        operation: &'static str,
        failures: Vec<String>,
    },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

fn bin_label(bin_id: &Option<String>) -> String {
    match bin_id {
        Some(id) => format!(" for bin {id}"),
        None => String::new(),
    }
}
