use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::MetricResult;

// ---------------------------------------------------------------------------
// Error kinds
// ---------------------------------------------------------------------------

/// Everything that can go wrong while locating, loading or comparing traces,
/// or while running the example that produces them.
#[derive(Debug, Error)]
pub enum Error {
    /// A directory or a candidate counterpart of a reference file is missing.
    #[error("missing file: {}", .path.display())]
    MissingFile { path: PathBuf },

    /// A file could not be parsed into a numeric table of two or more columns.
    #[error("{}:{line}: {reason}", .path.display())]
    MalformedData {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Matched traces have a different number of samples.
    #[error("{name}: reference has {reference} samples but candidate has {candidate}")]
    ShapeMismatch {
        name: String,
        reference: usize,
        candidate: usize,
    },

    /// A metric is undefined for this pair (zero norm or zero variance).
    #[error("{name}: {reason}")]
    DegenerateVector { name: String, reason: String },

    /// The example script could not be started or exited unsuccessfully.
    #[error("example runner {}: {reason}", .script.display())]
    RunnerFailure { script: PathBuf, reason: String },

    #[error("invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(
        path: impl Into<PathBuf>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedData {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(name: &str, reason: impl Into<String>) -> Self {
        Error::DegenerateVector {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Aborted comparison
// ---------------------------------------------------------------------------

/// A comparison stopped at its first failing pair.
///
/// `completed` holds the rows computed before the failure so callers can still
/// print them.
#[derive(Debug, Error)]
#[error("comparison aborted after {} pair(s)", .completed.len())]
pub struct Aborted {
    pub completed: Vec<MetricResult>,
    #[source]
    pub source: Error,
}

impl From<Error> for Aborted {
    fn from(source: Error) -> Self {
        Aborted {
            completed: Vec::new(),
            source,
        }
    }
}
