use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rusty_columns::{ByteOrder, ElementWidth, MatrixSpec};

/// Write a synthetic row-major binary matrix for trying out `rusty-columns`.
///
/// Each column is a Gaussian peak over the row axis with its own centre and
/// width, plus deterministic noise.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output file
    #[arg(long, default_value = "sample_data.bin")]
    output: PathBuf,

    #[arg(long, default_value_t = 1000)]
    rows: usize,

    #[arg(long, default_value_t = 8)]
    cols: usize,

    /// Element type: f32 or f64
    #[arg(long, default_value = "f32")]
    float_type: String,

    /// Write big-endian values instead of little-endian
    #[arg(long)]
    big_endian: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn encode(value: f64, width: ElementWidth, order: ByteOrder) -> Vec<u8> {
    match (width, order) {
        (ElementWidth::F32, ByteOrder::Little) => (value as f32).to_le_bytes().to_vec(),
        (ElementWidth::F32, ByteOrder::Big) => (value as f32).to_be_bytes().to_vec(),
        (ElementWidth::F64, ByteOrder::Little) => value.to_le_bytes().to_vec(),
        (ElementWidth::F64, ByteOrder::Big) => value.to_be_bytes().to_vec(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let width: ElementWidth = args.float_type.parse()?;
    let spec = MatrixSpec::new(args.rows, args.cols, width)?;
    let order = if args.big_endian {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };
    let mut rng = SimpleRng::new(args.seed);

    // One peak per column, spread across the row axis
    let rows = spec.rows() as f64;
    let peaks: Vec<(f64, f64, f64)> = (0..spec.columns())
        .map(|c| {
            let mu = rows * (c as f64 + 1.0) / (spec.columns() as f64 + 1.0);
            let sigma = rows / 20.0 + rng.next_f64() * rows / 10.0;
            let amplitude = 0.5 + rng.next_f64();
            (mu, sigma, amplitude)
        })
        .collect();

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    for r in 0..spec.rows() {
        for &(mu, sigma, amplitude) in &peaks {
            let v = gaussian(r as f64, mu, sigma, amplitude) + rng.gauss(0.0, 0.005);
            out.write_all(&encode(v, width, order))
                .with_context(|| format!("writing {}", args.output.display()))?;
        }
    }
    out.flush()
        .with_context(|| format!("writing {}", args.output.display()))?;

    log::info!("sample written with seed {}", args.seed);
    println!(
        "Wrote {}×{} {width} {order} matrix ({} bytes) to {}",
        spec.rows(),
        spec.columns(),
        spec.expected_bytes(),
        args.output.display()
    );
    Ok(())
}
