use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};

// ---------------------------------------------------------------------------
// ElementWidth – the declared IEEE-754 width of each stored value
// ---------------------------------------------------------------------------

/// Width of one stored value. Only binary32 and binary64 are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementWidth {
    F32,
    F64,
}

impl ElementWidth {
    /// Map a byte count onto a supported width.
    pub fn from_bytes(bytes: usize) -> Result<Self> {
        match bytes {
            4 => Ok(ElementWidth::F32),
            8 => Ok(ElementWidth::F64),
            other => Err(SplitError::Configuration(format!(
                "unsupported element width of {other} bytes; use 4 (f32) or 8 (f64)"
            ))),
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            ElementWidth::F32 => 4,
            ElementWidth::F64 => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementWidth::F32 => "f32",
            ElementWidth::F64 => "f64",
        }
    }
}

impl fmt::Display for ElementWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementWidth {
    type Err = SplitError;

    /// Accepts `f32`/`f64` or the byte counts `4`/`8`, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f32" | "4" => Ok(ElementWidth::F32),
            "f64" | "8" => Ok(ElementWidth::F64),
            other => Err(SplitError::Configuration(format!(
                "invalid float type '{other}'; use 'f32' or 'f64'"
            ))),
        }
    }
}

impl TryFrom<String> for ElementWidth {
    type Error = SplitError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ElementWidth> for String {
    fn from(width: ElementWidth) -> Self {
        width.name().to_string()
    }
}

// ---------------------------------------------------------------------------
// Byte order
// ---------------------------------------------------------------------------

/// A concrete byte order a file can be decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => f.write_str("little-endian"),
            ByteOrder::Big => f.write_str("big-endian"),
        }
    }
}

/// Which byte orders the loader may try, and in what order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrderPreference {
    /// Little-endian first, then big-endian.
    #[default]
    Auto,
    Little,
    Big,
}

impl ByteOrderPreference {
    pub fn candidates(self) -> &'static [ByteOrder] {
        match self {
            ByteOrderPreference::Auto => &[ByteOrder::Little, ByteOrder::Big],
            ByteOrderPreference::Little => &[ByteOrder::Little],
            ByteOrderPreference::Big => &[ByteOrder::Big],
        }
    }
}

impl FromStr for ByteOrderPreference {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ByteOrderPreference::Auto),
            "little" | "le" => Ok(ByteOrderPreference::Little),
            "big" | "be" => Ok(ByteOrderPreference::Big),
            other => Err(SplitError::Configuration(format!(
                "invalid byte order '{other}'; use 'auto', 'little' or 'big'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// MatrixSpec – caller-declared shape
// ---------------------------------------------------------------------------

/// The shape and width the caller expects the file to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixSpec {
    rows: usize,
    columns: usize,
    element_width: ElementWidth,
}

impl MatrixSpec {
    /// Validate a declared shape. Rows and columns must be positive and
    /// their product (in bytes) must fit in `usize`.
    pub fn new(rows: usize, columns: usize, element_width: ElementWidth) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(SplitError::Configuration(format!(
                "rows and columns must be positive, got {rows}×{columns}"
            )));
        }
        rows.checked_mul(columns)
            .and_then(|n| n.checked_mul(element_width.bytes()))
            .ok_or_else(|| {
                SplitError::Configuration(format!("matrix {rows}×{columns} is too large"))
            })?;
        Ok(MatrixSpec {
            rows,
            columns,
            element_width,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn element_width(&self) -> ElementWidth {
        self.element_width
    }

    /// Number of values the file must contain.
    pub fn expected_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn expected_bytes(&self) -> usize {
        self.expected_count() * self.element_width.bytes()
    }
}

// ---------------------------------------------------------------------------
// RawMatrix – the fully loaded matrix
// ---------------------------------------------------------------------------

/// A dense row-major matrix. Always fully populated:
/// `values.len() == rows * columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatrix {
    rows: usize,
    columns: usize,
    values: Vec<f64>,
    byte_order: ByteOrder,
}

impl RawMatrix {
    /// Build from row-major values. Fails with `ShapeMismatch` when the value
    /// count does not fill the shape exactly.
    pub fn from_row_major(
        rows: usize,
        columns: usize,
        values: Vec<f64>,
        byte_order: ByteOrder,
    ) -> Result<Self> {
        if rows == 0 || columns == 0 || rows.checked_mul(columns) != Some(values.len()) {
            return Err(SplitError::ShapeMismatch {
                expected: (rows, columns),
                actual: (values.len() / columns.max(1), columns),
            });
        }
        Ok(RawMatrix {
            rows,
            columns,
            values,
            byte_order,
        })
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Byte order the file was decoded with.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row < self.rows && column < self.columns {
            Some(self.values[row * self.columns + column])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.values[row * self.columns..(row + 1) * self.columns])
    }

    /// Values of one column in row order. Empty if `column` is out of range.
    pub fn column(&self, column: usize) -> impl Iterator<Item = f64> + '_ {
        let take = if column < self.columns { self.rows } else { 0 };
        self.values
            .iter()
            .skip(column)
            .step_by(self.columns)
            .take(take)
            .copied()
    }
}
