use ndarray_npy::{ReadNpyError, WriteNpyError};
use thiserror::Error;

/// Errors that abort a run.
///
/// Numeric degeneracies (empty vocabulary, zero-total rows, zero-norm vectors)
/// are not errors, they resolve to fixed fallback values where they occur.
#[derive(Error, Debug)]
pub enum VsmError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("shape mismatch for {what}: expected {expected}, found {actual}")]
    ShapeMismatch {
        what: String,
        expected: String,
        actual: String,
    },

    #[error("could not parse {path} at line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    ReadNpy(#[from] ReadNpyError),

    #[error(transparent)]
    WriteNpy(#[from] WriteNpyError),

    #[error("could not build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl VsmError {
    pub(crate) fn shape(what: &str, expected: impl ToString, actual: impl ToString) -> Self {
        VsmError::ShapeMismatch {
            what: what.to_owned(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VsmError>;
