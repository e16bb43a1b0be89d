use std::path::Path;

use super::model::{ByteOrder, ByteOrderPreference, ElementWidth, MatrixSpec, RawMatrix};
use crate::error::{Result, SplitError};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a matrix from a raw width in bytes.
///
/// The width and shape are validated before the file is looked at, so an
/// unsupported width is reported as a configuration error even when the path
/// does not exist.
pub fn load_matrix(path: &Path, rows: usize, columns: usize, width_bytes: usize) -> Result<RawMatrix> {
    let width = ElementWidth::from_bytes(width_bytes)?;
    let spec = MatrixSpec::new(rows, columns, width)?;
    load(path, &spec, ByteOrderPreference::Auto)
}

/// Read the whole file and decode it against `spec`, trying the byte orders
/// allowed by `preference` in sequence.
pub fn load(path: &Path, spec: &MatrixSpec, preference: ByteOrderPreference) -> Result<RawMatrix> {
    if !path.is_file() {
        return Err(SplitError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| SplitError::io(format!("reading {}", path.display()), e))?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());

    decode(&bytes, spec, preference.candidates())
}

/// Interpret `bytes` as a row-major matrix, returning on the first candidate
/// byte order whose element count equals `rows * columns`.
///
/// Selection is purely by count. A file that happens to have the right size
/// is accepted under the first candidate even if its values are nonsense.
pub fn decode(bytes: &[u8], spec: &MatrixSpec, candidates: &[ByteOrder]) -> Result<RawMatrix> {
    let width = spec.element_width();
    let expected = spec.expected_count();

    for (attempt, &order) in candidates.iter().enumerate() {
        let values = decode_values(bytes, width, order);
        log::debug!(
            "{width} {order}: {} values (expected {expected})",
            values.as_ref().map_or(bytes.len() / width.bytes(), Vec::len)
        );

        let Some(values) = values else { continue };
        if values.len() != expected {
            continue;
        }

        if attempt > 0 {
            log::warn!("falling back to {order} interpretation");
        }
        log::info!(
            "decoded {}×{} {width} matrix as {order}",
            spec.rows(),
            spec.columns()
        );
        return RawMatrix::from_row_major(spec.rows(), spec.columns(), values, order);
    }

    Err(SplitError::SizeMismatch {
        bytes: bytes.len() as u64,
        implied: bytes.len() / width.bytes(),
        expected,
        rows: spec.rows(),
        columns: spec.columns(),
        width: width.bytes(),
    })
}

// ---------------------------------------------------------------------------
// Decoding helpers
// ---------------------------------------------------------------------------

/// Decode every element, widening binary32 to `f64`. `None` when the buffer
/// ends in a partial element.
fn decode_values(bytes: &[u8], width: ElementWidth, order: ByteOrder) -> Option<Vec<f64>> {
    if bytes.len() % width.bytes() != 0 {
        return None;
    }

    let values = match width {
        ElementWidth::F32 => bytes
            .chunks_exact(4)
            .filter_map(|c| <[u8; 4]>::try_from(c).ok())
            .map(|raw| {
                let v = match order {
                    ByteOrder::Little => f32::from_le_bytes(raw),
                    ByteOrder::Big => f32::from_be_bytes(raw),
                };
                f64::from(v)
            })
            .collect(),
        ElementWidth::F64 => bytes
            .chunks_exact(8)
            .filter_map(|c| <[u8; 8]>::try_from(c).ok())
            .map(|raw| match order {
                ByteOrder::Little => f64::from_le_bytes(raw),
                ByteOrder::Big => f64::from_be_bytes(raw),
            })
            .collect(),
    };
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f32_bytes(values: &[f32], order: ByteOrder) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| match order {
                ByteOrder::Little => v.to_le_bytes(),
                ByteOrder::Big => v.to_be_bytes(),
            })
            .collect()
    }

    fn f64_bytes(values: &[f64], order: ByteOrder) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| match order {
                ByteOrder::Little => v.to_le_bytes(),
                ByteOrder::Big => v.to_be_bytes(),
            })
            .collect()
    }

    #[test]
    fn test_decode_little_endian_f32() {
        let values: Vec<f32> = (1..=10).map(|i| i as f32).collect();
        let bytes = f32_bytes(&values, ByteOrder::Little);
        let spec = MatrixSpec::new(5, 2, ElementWidth::F32).unwrap();

        let m = decode(&bytes, &spec, ByteOrderPreference::Auto.candidates()).unwrap();
        assert_eq!(m.shape(), (5, 2));
        assert_eq!(m.byte_order(), ByteOrder::Little);
        assert_eq!(m.row(0), Some(&[1.0, 2.0][..]));
        assert_eq!(m.get(4, 1), Some(10.0));
    }

    #[test]
    fn test_decode_f32_widens_exactly() {
        let values = [0.1f32, -3.75, f32::MAX, f32::MIN_POSITIVE];
        let bytes = f32_bytes(&values, ByteOrder::Little);
        let spec = MatrixSpec::new(2, 2, ElementWidth::F32).unwrap();

        let m = decode(&bytes, &spec, &[ByteOrder::Little]).unwrap();
        let widened: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
        assert_eq!(m.values(), widened.as_slice());
    }

    #[test]
    fn test_decode_big_endian_f64() {
        let values = [1.5, -2.25, 1e300, 6.02214076e23, 0.0, -7.0];
        let bytes = f64_bytes(&values, ByteOrder::Big);
        let spec = MatrixSpec::new(3, 2, ElementWidth::F64).unwrap();

        let m = decode(&bytes, &spec, ByteOrderPreference::Big.candidates()).unwrap();
        assert_eq!(m.byte_order(), ByteOrder::Big);
        assert_eq!(m.values(), &values[..]);
    }

    #[test]
    fn test_auto_prefers_little_endian_on_ambiguous_size() {
        // Same byte count is valid under both orders; the first candidate wins.
        let bytes = f64_bytes(&[1.0, 2.0], ByteOrder::Big);
        let spec = MatrixSpec::new(1, 2, ElementWidth::F64).unwrap();

        let m = decode(&bytes, &spec, ByteOrderPreference::Auto.candidates()).unwrap();
        assert_eq!(m.byte_order(), ByteOrder::Little);
        assert_ne!(m.values(), &[1.0, 2.0][..]);
    }

    #[test]
    fn test_size_mismatch_reports_sizes() {
        let bytes = vec![0u8; 36];
        let spec = MatrixSpec::new(5, 2, ElementWidth::F32).unwrap();

        match decode(&bytes, &spec, ByteOrderPreference::Auto.candidates()) {
            Err(SplitError::SizeMismatch {
                bytes,
                implied,
                expected,
                ..
            }) => {
                assert_eq!(bytes, 36);
                assert_eq!(implied, 9);
                assert_eq!(expected, 10);
            }
            other => panic!("expected SizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_partial_element_is_rejected() {
        let mut bytes = f32_bytes(&[1.0, 2.0], ByteOrder::Little);
        bytes.push(0);
        let spec = MatrixSpec::new(1, 2, ElementWidth::F32).unwrap();

        let err = decode(&bytes, &spec, ByteOrderPreference::Auto.candidates()).unwrap_err();
        assert!(matches!(err, SplitError::SizeMismatch { bytes: 9, implied: 2, .. }));
    }

    #[test]
    fn test_unsupported_width_fails_before_io() {
        let missing = Path::new("/definitely/not/here.bin");
        let err = load_matrix(missing, 2, 2, 2).unwrap_err();
        assert!(matches!(err, SplitError::Configuration(_)));

        let err = load_matrix(missing, 2, 2, 4).unwrap_err();
        assert!(matches!(err, SplitError::NotFound(_)));
    }
}
