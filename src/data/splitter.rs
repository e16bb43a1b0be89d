use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::format::{format_general, COLUMN_PRECISION};
use super::model::RawMatrix;
use crate::error::{Result, SplitError};

/// Name of the directory, next to the input file, that receives column files.
pub const OUTPUT_DIR_NAME: &str = "extracted";

/// Reported after each column file is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitProgress {
    /// 1-based column index.
    pub index: usize,
    pub total: usize,
    /// Display form of the file name; `path` holds the exact one.
    pub file_name: String,
    pub path: PathBuf,
}

/// `<parent of input>/extracted`. A bare file name resolves to `./extracted`.
pub fn output_dir_for(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(OUTPUT_DIR_NAME),
        _ => PathBuf::from(OUTPUT_DIR_NAME),
    }
}

/// File name of the `index`-th (1-based) column file.
pub fn column_file_name(base_name: &OsStr, index: usize) -> OsString {
    let mut name = base_name.to_os_string();
    name.push(format!(".{index}"));
    name
}

/// Wipe `output_dir`, recreate it and write one text file per column.
///
/// Any I/O failure aborts immediately; files already written stay on disk.
/// Returns the number of files written.
pub fn split<F>(
    matrix: &RawMatrix,
    output_dir: &Path,
    base_name: &OsStr,
    mut progress: F,
) -> Result<usize>
where
    F: FnMut(&SplitProgress),
{
    recreate_dir(output_dir)?;

    let total = matrix.columns();
    for c in 0..total {
        let file_name = column_file_name(base_name, c + 1);
        let path = output_dir.join(&file_name);
        write_column(&path, matrix.column(c))?;
        log::debug!("wrote {} ({} lines)", path.display(), matrix.rows());

        progress(&SplitProgress {
            index: c + 1,
            total,
            file_name: file_name.to_string_lossy().into_owned(),
            path,
        });
    }

    log::info!("wrote {total} column files into {}", output_dir.display());
    Ok(total)
}

fn recreate_dir(dir: &Path) -> Result<()> {
    // symlink_metadata so a dangling link is also treated as existing
    match fs::symlink_metadata(dir) {
        Ok(meta) => {
            log::info!("removing existing {}", dir.display());
            let removed = if meta.is_dir() {
                fs::remove_dir_all(dir)
            } else {
                fs::remove_file(dir)
            };
            removed.map_err(|e| SplitError::io(format!("removing {}", dir.display()), e))?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(SplitError::io(format!("inspecting {}", dir.display()), e)),
    }

    fs::create_dir_all(dir).map_err(|e| SplitError::io(format!("creating {}", dir.display()), e))
}

fn write_column(path: &Path, values: impl Iterator<Item = f64>) -> Result<()> {
    let wrap = |e: std::io::Error| SplitError::io(format!("writing {}", path.display()), e);

    let file = File::create(path).map_err(wrap)?;
    let mut out = BufWriter::new(file);
    for v in values {
        writeln!(out, "{}", format_general(v, COLUMN_PRECISION)).map_err(wrap)?;
    }
    out.flush().map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ByteOrder;

    fn matrix(rows: usize, columns: usize) -> RawMatrix {
        let values = (1..=rows * columns).map(|v| v as f64).collect();
        RawMatrix::from_row_major(rows, columns, values, ByteOrder::Little).unwrap()
    }

    #[test]
    fn test_output_dir_for() {
        assert_eq!(
            output_dir_for(Path::new("data/startup.$516")),
            PathBuf::from("data/extracted")
        );
        assert_eq!(output_dir_for(Path::new("m.bin")), PathBuf::from("extracted"));
        assert_eq!(column_file_name(OsStr::new("m.bin"), 3), OsString::from("m.bin.3"));
    }

    #[test]
    fn test_split_writes_one_file_per_column() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("extracted");
        let m = matrix(4, 3);

        let mut seen = Vec::new();
        let written = split(&m, &out, OsStr::new("m.bin"), |p| seen.push(p.clone())).unwrap();
        assert_eq!(written, 3);

        let indices: Vec<usize> = seen.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(seen.iter().all(|p| p.total == 3));
        assert_eq!(seen[2].file_name, "m.bin.3");

        let col2 = fs::read_to_string(out.join("m.bin.2")).unwrap();
        assert_eq!(col2, "2\n5\n8\n11\n");
        for p in &seen {
            let text = fs::read_to_string(&p.path).unwrap();
            assert_eq!(text.lines().count(), 4);
        }
    }

    #[test]
    fn test_split_wipes_previous_output() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("extracted");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("sentinel.txt"), "stale").unwrap();
        fs::write(out.join("m.bin.9"), "stale").unwrap();

        split(&matrix(2, 2), &out, OsStr::new("m.bin"), |_| {}).unwrap();

        let mut names: Vec<String> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["m.bin.1", "m.bin.2"]);
    }

    #[test]
    fn test_split_replaces_plain_file() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("extracted");
        fs::write(&out, "not a directory").unwrap();

        split(&matrix(1, 1), &out, OsStr::new("x"), |_| {}).unwrap();
        assert!(out.is_dir());
        assert_eq!(fs::read_to_string(out.join("x.1")).unwrap(), "1\n");
    }

    #[test]
    fn test_split_creates_missing_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("a").join("b").join("extracted");

        assert_eq!(split(&matrix(3, 1), &out, OsStr::new("x"), |_| {}).unwrap(), 1);
        assert!(out.join("x.1").is_file());
    }

    #[test]
    fn test_split_fails_when_parent_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "plain file").unwrap();
        let out = blocker.join("extracted");

        let mut calls = 0;
        let err = split(&matrix(2, 2), &out, OsStr::new("m.bin"), |_| calls += 1).unwrap_err();

        assert_eq!(calls, 0);
        assert!(err.to_string().contains(&out.display().to_string()));
        match &err {
            SplitError::Io { source, .. } => assert!(source.raw_os_error().is_some()),
            other => panic!("expected Io, got {other:?}"),
        }
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_split_keeps_non_utf8_base_name() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("extracted");
        let base = OsStr::from_bytes(b"\xffrun.bin");

        let mut seen = Vec::new();
        split(&matrix(1, 2), &out, base, |p| seen.push(p.clone())).unwrap();

        assert!(out.join(OsStr::from_bytes(b"\xffrun.bin.1")).is_file());
        assert!(out.join(OsStr::from_bytes(b"\xffrun.bin.2")).is_file());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
        assert_eq!(seen[0].path, out.join(OsStr::from_bytes(b"\xffrun.bin.1")));
        assert_eq!(seen[0].file_name, "\u{FFFD}run.bin.1");
    }
}
