//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{SessionError, TestId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while entering or driving an attempt.
///
/// Everything here is fatal to the attempt screen: the engine refuses to
/// start on a partial load. Non-fatal persistence hiccups never surface as
/// errors; they are logged and the attempt continues in memory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("test {0} does not exist")]
    TestNotFound(TestId),

    #[error("saved attempt no longer matches the test: {0}")]
    CorruptSavedSession(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the submit step.
///
/// A failed submit leaves both the in-memory state and the durable session
/// slot untouched, so the same call can be retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while starting a practice run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("test {0} does not exist")]
    TestNotFound(TestId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted when looking up persisted results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultLookupError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
