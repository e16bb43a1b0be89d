/// Data layer: matrix types, binary loading, column splitting.
///
/// Architecture:
/// ```text
///  raw .bin (f32 / f64, LE or BE)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bytes → RawMatrix (first matching byte order)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ RawMatrix │  row-major Vec<f64>, rows × columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ splitter  │  wipe extracted/, one %.9g text file per column
///   └──────────┘
/// ```

pub mod format;
pub mod loader;
pub mod model;
pub mod splitter;
