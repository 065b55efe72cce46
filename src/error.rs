//! Error types shared by the audit pipeline stages.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XrayError {
    #[error("Failed to connect to Neo4j: {0}")]
    Connection(String),

    #[error("Query failed: {message}\n  query: {query}")]
    Query { query: String, message: String },

    #[error("Diagram rendering failed: {0}")]
    Render(String),

    #[error("Failed to write '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid URI: {0}")]
    Uri(String),
}

impl XrayError {
    pub fn query(query: &str, err: impl std::fmt::Display) -> Self {
        Self::Query {
            query: query.trim().to_string(),
            message: err.to_string(),
        }
    }

    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Errors that stop the run. Rendering is the only soft failure.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Render(_))
    }
}

pub type Result<T> = std::result::Result<T, XrayError>;
