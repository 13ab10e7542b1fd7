//! Error types for umlblock operations.
//!
//! This module provides the main error type [`UmlBlockError`], which separates
//! configuration problems, renderer failures, unsupported formats and I/O
//! failures so hosts can match on the kind of failure.

use std::{io, time::Duration};

use thiserror::Error;

use umlblock_core::format::UnsupportedFormatError;

/// The main error type for umlblock operations.
///
/// Every variant aborts the current block only. Nothing is retried or
/// downgraded; the host decides what a failed block means for the document.
#[derive(Debug, Error)]
pub enum UmlBlockError {
    /// A required setting is missing or invalid. Raised before any process
    /// is spawned or file touched.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl UmlBlockError {
    /// Create a new `Config` error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Failures reported by the rendering engine or while driving it.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The engine process exited with a non-zero status.
    #[error("PlantUML exited with code {code}")]
    Exit { code: i32 },

    /// The engine process was terminated without an exit code.
    #[error("PlantUML was terminated before it could exit")]
    Terminated,

    /// The engine process did not finish within the configured timeout.
    #[error("PlantUML did not finish within {0:?}")]
    Timeout(Duration),

    /// The engine process could not be started or talked to.
    #[error("Failed to run PlantUML: {0}")]
    Spawn(#[source] io::Error),

    /// The embedded engine reported a failure.
    #[error("PlantUML engine failure: {0}")]
    Engine(String),
}

impl RenderError {
    /// Returns the exit code, if the engine process exited with one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RenderError::Exit { code } => Some(*code),
            _ => None,
        }
    }
}
