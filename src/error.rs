// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use crate::http::HttpError;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// The step of a pass that must succeed before any mirror is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    ListingSource,
    ResolvingMirrorAccount,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupStage::ListingSource => f.write_str("listing source repositories"),
            SetupStage::ResolvingMirrorAccount => f.write_str("resolving mirror account"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Setup failed while {stage}: {source}")]
    Setup {
        stage: SetupStage,
        #[source]
        source: Box<SyncError>,
    },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    pub fn setup(stage: SetupStage, source: SyncError) -> Self {
        SyncError::Setup {
            stage,
            source: Box::new(source),
        }
    }
}
