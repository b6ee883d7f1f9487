use std::{io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole judge run.
/// Everything recoverable (crashes, timeouts, wrong answers) becomes an [`Outcome`] instead.
///
/// [`Outcome`]: super::Outcome
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot enumerate testcases in '{0}': {1}")]
    EnumerateCases(PathBuf, #[source] fsutil::Error),

    #[error("No reference output is configured for testcase '{0}'")]
    MissingReference(String),

    #[error("Cannot read reference output for testcase '{0}': {1}")]
    ReadReference(String, #[source] fsutil::Error),

    #[error("Cannot stage candidate output for the checker: {0}")]
    StageCandidate(#[source] fsutil::Error),

    #[error("Cannot remove scratch file: {0}")]
    RemoveScratch(#[source] fsutil::Error),

    #[error("Failed to emit record: {0}")]
    EmitRecord(#[source] io::Error),
}
