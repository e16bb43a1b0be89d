//! Split a flat row-major binary matrix of `f32`/`f64` values into one text
//! file per column.
//!
//! [`run`] loads the file described by a [`SplitConfig`], picks the first byte
//! order whose element count matches the declared shape, then writes
//! `<dir>/extracted/<name>.<column>` files with one `%.9g` value per line.

pub mod config;
pub mod data;
pub mod error;

use std::path::PathBuf;

pub use config::SplitConfig;
pub use data::model::{ByteOrder, ByteOrderPreference, ElementWidth, MatrixSpec, RawMatrix};
pub use data::splitter::SplitProgress;
pub use error::{Result, SplitError};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    pub rows: usize,
    pub columns: usize,
    pub element_width: ElementWidth,
    pub byte_order: ByteOrder,
    pub files_written: usize,
    pub output_dir: PathBuf,
}

/// Load the configured matrix and write its columns.
///
/// `on_loaded` fires once the matrix is in memory, before the output
/// directory is touched; `progress` fires after each column file.
pub fn run<L, P>(config: &SplitConfig, on_loaded: L, progress: P) -> Result<SplitReport>
where
    L: FnOnce(&RawMatrix, &SplitConfig),
    P: FnMut(&SplitProgress),
{
    let spec = config.matrix_spec()?;
    let base_name = config.base_name()?;

    let matrix = data::loader::load(&config.file_path, &spec, config.byte_order)?;
    if matrix.shape() != (spec.rows(), spec.columns()) {
        return Err(SplitError::ShapeMismatch {
            expected: (spec.rows(), spec.columns()),
            actual: matrix.shape(),
        });
    }
    on_loaded(&matrix, config);

    let output_dir = data::splitter::output_dir_for(&config.file_path);
    let files_written = data::splitter::split(&matrix, &output_dir, &base_name, progress)?;

    Ok(SplitReport {
        rows: matrix.rows(),
        columns: matrix.columns(),
        element_width: spec.element_width(),
        byte_order: matrix.byte_order(),
        files_written,
        output_dir,
    })
}
