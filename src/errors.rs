/*!
 * Error types for the multilogue crate.
 *
 * This module contains custom error types for different parts of the library,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Structural mismatches inside well-typed input (a block that is not a
 * `speaker: utterance` pair, a dialogue node without a speaker) are never
 * errors; the codecs skip them. Only contract violations surface here.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Input handed to the transcoder was not text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid input: {operation} expects text, got {found}")]
pub struct InvalidInputError {
    /// Operation that rejected the input ("encode" or "decode")
    pub operation: &'static str,

    /// Short description of what was supplied instead
    pub found: String,
}

impl InvalidInputError {
    pub fn new(operation: &'static str, found: impl Into<String>) -> Self {
        Self {
            operation,
            found: found.into(),
        }
    }
}

/// Errors raised by script stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error reported by SQLite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Error touching the filesystem around the store
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No usable location for the default database
    #[error("Could not determine store location: {0}")]
    Location(String),

    /// Stored schema is newer or older than this build understands
    #[error("Unsupported store schema version: {0}")]
    Schema(i32),
}

/// Errors raised by the workspace controller
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Saving was requested while the dialogue is blank
    #[error("Dialogue is empty. Nothing to save.")]
    EmptyDialogue,

    /// File does not carry one of the accepted script extensions
    #[error("Unsupported script file: {0:?} (expected .txt, .md, .text or .plato)")]
    UnsupportedFile(PathBuf),

    /// Error from the backing store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Non-text input reached the transcoder
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    /// Error from a store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from the workspace
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) => 2,
            _ => 1,
        }
    }
}

// Typed errors carried inside an anyhow chain keep their variant
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<InvalidInputError>() {
            Ok(e) => return Self::InvalidInput(e),
            Err(error) => error,
        };
        let error = match error.downcast::<WorkspaceError>() {
            Ok(e) => return Self::Workspace(e),
            Err(error) => error,
        };
        let error = match error.downcast::<StoreError>() {
            Ok(e) => return Self::Store(e),
            Err(error) => error,
        };
        match error.downcast::<std::io::Error>() {
            Ok(e) => Self::File(e.to_string()),
            Err(error) => Self::Unknown(format!("{:#}", error)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
