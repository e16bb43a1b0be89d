use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading or splitting a matrix.
///
/// All variants are fatal; the binary reports them once and exits non-zero.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Bad configuration detected before any file is touched.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file length does not fit `rows * columns` elements of the declared width.
    #[error(
        "binary size mismatch. File has {bytes} bytes -> {implied} values of {width} bytes; \
         expected {expected} ({rows}×{columns}). Check rows/columns or element width."
    )]
    SizeMismatch {
        bytes: u64,
        implied: usize,
        expected: usize,
        rows: usize,
        columns: usize,
        width: usize,
    },

    #[error(
        "loaded matrix is {}×{}, expected {}×{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl SplitError {
    /// Wrap an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        SplitError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;
