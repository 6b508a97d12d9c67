//! Error types for the PostureCheck workspace.
//!
//! Scoring itself never fails; these errors surface only at the edges:
//! pose ingestion, configuration and the sampling loop.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Duplicate keypoint in pose: {name}")]
    DuplicateKeypoint { name: String },

    #[error("Unknown keypoint name: {0}")]
    UnknownKeypoint(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pose source error: {0}")]
    PoseSource(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
