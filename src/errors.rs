//! Unified application error type.
//! All modules (db, core, app, cli) return AppError to keep the error
//! handling consistent across the engine and the maintenance tools.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    /// Retryable storage condition (busy/locked). Recovered by the retry
    /// layer in `db::retry`; never shown to the UI.
    #[error("Transient storage error: {0}")]
    StorageTransient(String),

    #[error("Storage unavailable after retries")]
    StorageUnavailable,

    // ---------------------------
    // Clocking / registration
    // ---------------------------
    #[error("No active employee for tag {0}")]
    UnknownTag(String),

    #[error("RFID tag {0} is already assigned")]
    DuplicateTag(String),

    #[error("Cannot record time for inactive employee {0}")]
    InactiveEmployee(String),

    #[error("The first registered employee must be an administrator")]
    FirstUserMustBeAdmin,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The primary write committed but the alternation rewrite failed.
    /// Callers log and continue; the entry itself is safe.
    #[error("Action recalculation failed: {0}")]
    RecalculationFailed(String),

    #[error("Scanned badge does not match the employee being edited")]
    PendingIdentificationMismatch,

    // ---------------------------
    // Config / export
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
