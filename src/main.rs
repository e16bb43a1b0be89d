use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use rusty_columns::{ByteOrderPreference, ElementWidth, SplitConfig};

/// Split a row-major binary float matrix into one text file per column.
///
/// Output goes to `<input dir>/extracted/<input name>.<column>`; the
/// `extracted` directory is deleted and recreated on every run.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Binary matrix file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Number of rows in the matrix
    #[arg(long)]
    rows: Option<usize>,

    /// Number of columns in the matrix
    #[arg(long)]
    cols: Option<usize>,

    /// Element type: f32 or f64
    #[arg(long)]
    float_type: Option<String>,

    /// Byte orders to try: auto, little or big
    #[arg(long)]
    byte_order: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<SplitConfig> {
        let mut config = match &self.config {
            Some(path) => SplitConfig::from_json_file(path)?,
            None => SplitConfig::default(),
        };

        if let Some(file) = self.file {
            config.file_path = file;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.columns = cols;
        }
        if let Some(float_type) = self.float_type {
            config.element_width = float_type.parse::<ElementWidth>()?;
        }
        if let Some(order) = self.byte_order {
            config.byte_order = order.parse::<ByteOrderPreference>()?;
        }
        Ok(config)
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.into_config()?;
    log::debug!("config: {config:?}");

    let report = rusty_columns::run(
        &config,
        |matrix, cfg| {
            let (rows, cols) = matrix.shape();
            println!(
                "Parsed matrix shape: {rows}×{cols} ({}, {})",
                cfg.element_width,
                matrix.byte_order()
            );
            println!("Splitting {} into {cols} columns...", cfg.file_path.display());
        },
        |p| println!("  [{:3}/{}] wrote {}", p.index, p.total, p.file_name),
    )?;

    println!(
        "Done: wrote {} files into {}",
        report.files_written,
        report.output_dir.display()
    );
    Ok(())
}
