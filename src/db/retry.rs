//! Retry layer for transient SQLite failures (busy/locked).

use crate::errors::{AppError, AppResult};
use rusqlite::ErrorCode;
use std::thread;
use std::time::Duration;
use tracing::warn;

const BACKOFF_MS: [u64; 4] = [50, 100, 200, 400];

pub fn is_transient_db(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::DatabaseBusy || e.code == ErrorCode::DatabaseLocked
    )
}

fn is_retryable(err: &AppError) -> bool {
    match err {
        AppError::StorageTransient(_) => true,
        AppError::Db(db) => is_transient_db(db),
        _ => false,
    }
}

/// Classify an error raised while opening or committing a transaction.
pub fn classify(err: rusqlite::Error) -> AppError {
    if is_transient_db(&err) {
        AppError::StorageTransient(err.to_string())
    } else {
        AppError::Db(err)
    }
}

/// Run `op`, retrying transient storage failures with exponential backoff
/// (50, 100, 200, 400 ms). Once the budget is exhausted the caller sees
/// `StorageUnavailable`.
pub fn with_retry<T, F>(mut op: F) -> AppResult<T>
where
    F: FnMut() -> AppResult<T>,
{
    let mut attempt = 0;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if is_retryable(&e) => {
                if attempt >= BACKOFF_MS.len() {
                    warn!(
                        "storage still busy after {} retries: {}",
                        BACKOFF_MS.len(),
                        e
                    );
                    return Err(AppError::StorageUnavailable);
                }
                thread::sleep(Duration::from_millis(BACKOFF_MS[attempt]));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
