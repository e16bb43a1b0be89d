use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::{ByteOrderPreference, ElementWidth, MatrixSpec};
use crate::error::SplitError;

/// Everything one run needs. Built from defaults, an optional JSON file and
/// command-line overrides, then passed to [`crate::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    pub file_path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub element_width: ElementWidth,
    pub byte_order: ByteOrderPreference,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            file_path: PathBuf::from("data/startup.$516"),
            rows: 30002,
            columns: 223,
            element_width: ElementWidth::F32,
            byte_order: ByteOrderPreference::Auto,
        }
    }
}

impl SplitConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    ///
    /// ```json
    /// { "file_path": "data/run.bin", "rows": 100, "columns": 4, "element_width": "f64" }
    /// ```
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Validate the declared shape.
    pub fn matrix_spec(&self) -> Result<MatrixSpec, SplitError> {
        MatrixSpec::new(self.rows, self.columns, self.element_width)
    }

    /// Input file name used as the prefix of every column file. Kept as raw
    /// OS bytes so non-UTF-8 names survive unchanged.
    pub fn base_name(&self) -> Result<OsString, SplitError> {
        self.file_path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| {
                SplitError::Configuration(format!(
                    "input path '{}' has no file name",
                    self.file_path.display()
                ))
            })
    }
}
